use crate::input::{collect_actions_nonblocking, Action};
use crate::render::{canvas_to_cells, draw_scene, draw_text, Terminal};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Color;
use pipefall::config::{default_settings_path, load_settings, Settings};
use pipefall::scene::Scene;
use pipefall::{AnimationState, FrameClock, Tick, Timing};
use rand::{rngs::StdRng, SeedableRng};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(about = "A scrolling pipe grid with a character hopping down open paths")]
pub(crate) struct Args {
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// ms of wall time per row of scroll (higher = slower)
    #[arg(long)]
    slowness_ms: Option<f64>,

    /// fraction of each hop spent moving sideways, in (0, 1)
    #[arg(long)]
    horiz_timeslice: Option<f64>,

    /// frame cap
    #[arg(long)]
    fps: Option<u32>,

    /// monochrome output
    #[arg(long)]
    no_color: bool,

    /// settings file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// simulate without a terminal and write the final frame as SVG
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// seconds to simulate for --snapshot
    #[arg(long, default_value_t = 10.0)]
    snapshot_secs: f64,
}

impl Args {
    fn settings(&self) -> Settings {
        let path = self.config.clone().or_else(default_settings_path);
        let mut s = path.map(|p| load_settings(&p)).unwrap_or_default();
        if self.seed.is_some() {
            s.seed = self.seed;
        }
        if let Some(v) = self.slowness_ms {
            s.slowness_ms = v;
        }
        if let Some(v) = self.horiz_timeslice {
            s.horiz_timeslice = v;
        }
        if let Some(v) = self.fps {
            s.fps_cap = v;
        }
        if self.no_color {
            s.color = false;
        }
        if self.log_file.is_some() {
            s.log_file = self.log_file.clone();
        }
        s
    }
}

fn init_logging(settings: &Settings) -> Result<()> {
    let default_level = if settings.log_file.is_some() { "warn" } else { "error" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if let Some(path) = &settings.log_file {
        let file = File::create(path)
            .with_context(|| format!("could not open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = builder.try_init();
    Ok(())
}

pub(crate) fn run() -> Result<()> {
    let args = Args::parse();
    let settings = args.settings();
    settings.validate().context("invalid settings")?;
    init_logging(&settings)?;

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    log::info!("starting with {:?}", settings);

    match &args.snapshot {
        Some(path) => snapshot(path, args.snapshot_secs, &settings.timing(), rng),
        None => Player::new(settings, rng).run(),
    }
}

/// Headless run at a steady 60 Hz.
fn snapshot(path: &Path, secs: f64, timing: &Timing, mut rng: StdRng) -> Result<()> {
    let frame_ms = 1000.0 / 60.0;
    let steps = (secs.max(0.0) * 60.0).round() as u64;
    let mut state = AnimationState::init();
    for _ in 0..steps {
        state = state.update(Tick::from_ms(frame_ms), timing, &mut rng);
    }
    let svg = Scene::build(&state, timing).to_svg();
    fs::write(path, svg).with_context(|| format!("could not write {}", path.display()))?;
    log::info!("wrote snapshot at frame {:.3} to {}", state.frame, path.display());
    Ok(())
}

struct Player {
    settings: Settings,
    timing: Timing,
    rng: StdRng,
    state: AnimationState,
    clock: FrameClock,
    paused: bool,
    show_hud: bool,
}

impl Player {
    fn new(settings: Settings, rng: StdRng) -> Self {
        Self {
            timing: settings.timing(),
            settings,
            rng,
            state: AnimationState::init(),
            clock: FrameClock::new(),
            paused: false,
            show_hud: true,
        }
    }

    fn run(mut self) -> Result<()> {
        let fps = self.settings.fps_cap.clamp(10, 240);
        let frame_dt = Duration::from_secs_f32(1.0 / fps as f32);

        let mut term = Terminal::begin()?;
        let res = self.frame_loop(&mut term, frame_dt);
        // Always cleanup, even when the loop failed.
        let end = term.end();
        res.and(end)
    }

    fn frame_loop(&mut self, term: &mut Terminal, frame_dt: Duration) -> Result<()> {
        loop {
            let frame_start = Instant::now();
            term.resize_if_needed()?;

            for action in collect_actions_nonblocking()? {
                match action {
                    Action::Quit => return Ok(()),
                    Action::TogglePause => self.paused = !self.paused,
                    Action::ToggleHud => self.show_hud = !self.show_hud,
                }
            }

            let tick = if self.paused {
                self.clock.reset();
                Tick::first()
            } else {
                self.clock.tick(frame_start)
            };
            let state = std::mem::take(&mut self.state);
            self.state = state.update(tick, &self.timing, &mut self.rng);

            self.render(term)?;
            spin_sleep(frame_dt, frame_start);
        }
    }

    fn render(&self, term: &mut Terminal) -> Result<()> {
        let bg = Color::Black;
        term.cur.clear(bg);
        term.canvas.clear();

        let scene = Scene::build(&self.state, &self.timing);
        draw_scene(&mut term.canvas, &scene);
        canvas_to_cells(&term.canvas, &mut term.cur, self.settings.color, bg);

        if self.show_hud {
            let hop = self.state.hop;
            let line = format!(
                "pipefall | frame {:.2} | rows {} | hop {}->{}{} | {}",
                self.state.frame,
                self.state.rows.len(),
                hop.from,
                hop.to,
                if hop.spin { " tumble" } else { "" },
                if self.paused { "paused" } else { "run" }
            );
            draw_text(&mut term.cur, 0, 0, &line, Color::Grey, bg);
            draw_text(
                &mut term.cur,
                0,
                term.rows.saturating_sub(1),
                "Q quit  Space pause  H hud",
                Color::DarkGrey,
                bg,
            );
        }

        term.present()
    }
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_override_settings() {
        let args = Args::parse_from([
            "pipefall",
            "--config",
            "/nonexistent/pipefall.json",
            "--seed",
            "99",
            "--horiz-timeslice",
            "0.4",
            "--no-color",
        ]);
        let s = args.settings();
        assert_eq!(s.seed, Some(99));
        assert_eq!(s.horiz_timeslice, 0.4);
        assert!(!s.color);
        assert_eq!(s.slowness_ms, Settings::default().slowness_ms);
    }

    #[test]
    fn snapshot_writes_an_svg_document() {
        let path = std::env::temp_dir().join(format!("pipefall-snap-{}.svg", std::process::id()));
        let rng = StdRng::seed_from_u64(1);
        snapshot(&path, 3.0, &Timing::default(), rng).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("um.png"));
    }
}
