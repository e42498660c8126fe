use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    TogglePause,
    ToggleHud,
}

pub(crate) fn collect_actions_nonblocking() -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();
    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                if let Some(action) = map_key(k) {
                    out.push(action);
                }
            }
        }
        if out.len() >= 32 {
            break;
        }
    }
    Ok(out)
}

pub(crate) fn map_key(k: KeyEvent) -> Option<Action> {
    match (k.code, k.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        (KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc, _) => Some(Action::Quit),
        (KeyCode::Char(' '), _) => Some(Action::TogglePause),
        (KeyCode::Char('h') | KeyCode::Char('H'), _) => Some(Action::ToggleHud),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_the_few_keys_we_use() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Action::TogglePause));
        assert_eq!(map_key(key(KeyCode::Char('H'))), Some(Action::ToggleHud));
        assert_eq!(map_key(key(KeyCode::Char('x'))), None);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }
}
