use std::time::Instant;

/// One display-frame event from the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tick {
    /// Milliseconds since the previous frame, absent on the very first frame.
    pub delta_ms: Option<f64>,
}

impl Tick {
    pub fn first() -> Self {
        Self { delta_ms: None }
    }

    pub fn from_ms(ms: f64) -> Self {
        Self { delta_ms: Some(ms) }
    }
}

/// Turns frame timestamps into [`Tick`]s.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn tick(&mut self, now: Instant) -> Tick {
        let delta_ms = self
            .last
            .map(|prev| now.saturating_duration_since(prev).as_secs_f64() * 1000.0);
        self.last = Some(now);
        Tick { delta_ms }
    }

    /// Forget the previous timestamp so the next tick carries no delta.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_tick_has_no_delta() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.tick(t0), Tick::first());
        let t1 = t0 + Duration::from_millis(16);
        let d = clock.tick(t1).delta_ms.unwrap_or_default();
        assert!((d - 16.0).abs() < 1e-6);
    }

    #[test]
    fn reset_drops_the_gap() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        clock.reset();
        assert_eq!(clock.tick(t0 + Duration::from_secs(5)).delta_ms, None);
    }
}
