use crate::clock::Tick;
use crate::motion::{position_at, Pose};
use crate::navigator::{maybe_advance, Hop};
use crate::pipe::PipeRow;
use crate::window::advance_rows;
use rand::Rng;

/// Time scaling shared by the update and the interpolator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Wall-clock milliseconds per frame unit (one row of scroll).
    pub slowness_ms: f64,
    /// Fraction of each hop spent moving sideways.
    pub horiz_timeslice: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            slowness_ms: 2500.0,
            horiz_timeslice: 0.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    pub frame: f64,
    pub rows: Vec<PipeRow>,
    pub hop: Hop,
}

impl AnimationState {
    pub fn init() -> Self {
        Self {
            frame: 0.0,
            rows: Vec::new(),
            hop: Hop::default(),
        }
    }

    /// Advance by one clock tick. A tick without a usable delta leaves the
    /// state as it was.
    pub fn update<R: Rng + ?Sized>(self, tick: Tick, timing: &Timing, rng: &mut R) -> Self {
        let Some(delta) = tick.delta_ms.filter(|d| d.is_finite() && *d >= 0.0) else {
            return self;
        };
        let frame = self.frame + delta / timing.slowness_ms;
        let rows = advance_rows(frame, self.rows, rng);
        let hop = maybe_advance(frame, &rows, self.hop, rng);
        Self { frame, rows, hop }
    }

    pub fn pose(&self, timing: &Timing) -> Pose {
        position_at(self.frame, &self.hop, timing.horiz_timeslice)
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn missing_delta_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(9);
        let timing = Timing::default();
        let st = AnimationState::init();
        let next = st.clone().update(Tick::first(), &timing, &mut rng);
        assert_eq!(next, st);
        let next = st.clone().update(Tick::from_ms(-4.0), &timing, &mut rng);
        assert_eq!(next, st);
    }

    #[test]
    fn first_real_tick_seeds_grid_and_first_hop() {
        let mut rng = StdRng::seed_from_u64(9);
        let timing = Timing::default();
        let st = AnimationState::init().update(Tick::from_ms(16.0), &timing, &mut rng);
        assert!((st.frame - 16.0 / 2500.0).abs() < 1e-12);
        assert_eq!(st.rows.len(), 1);
        // Too few rows to navigate: tumble in place from the middle column.
        assert_eq!(st.hop.from, 2);
        assert_eq!(st.hop.to, 2);
        assert!(st.hop.spin);
        assert_eq!(st.hop.end_frame, 1.0);
    }

    #[test]
    fn same_seed_replays_the_same_run() {
        let timing = Timing::default();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut st = AnimationState::init();
            for _ in 0..2000 {
                st = st.update(Tick::from_ms(16.7), &timing, &mut rng);
            }
            st
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn frame_never_goes_backwards() {
        let mut rng = StdRng::seed_from_u64(3);
        let timing = Timing::default();
        let mut st = AnimationState::init();
        let mut last = st.frame;
        for ms in [16.0, 0.0, -10.0, 33.0, f64::NAN, 250.0] {
            st = st.update(Tick::from_ms(ms), &timing, &mut rng);
            assert!(st.frame >= last);
            last = st.frame;
        }
    }
}
