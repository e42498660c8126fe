use crate::navigator::Hop;

/// Where the character is drawn, in grid units relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
}

/// Progress through `hop`: 0 when it begins, 1 at `end_frame`.
pub fn hop_param(frame: f64, hop: &Hop) -> f64 {
    1.0 + frame - hop.end_frame
}

/// Linear blend from `a` to `b` that saturates once `t` reaches `s`.
/// Not clamped below zero.
pub fn interp(a: f64, b: f64, t: f64, s: f64) -> f64 {
    let tt = (t / s).min(1.0);
    b * tt + a * (1.0 - tt)
}

pub fn position_at(frame: f64, hop: &Hop, horiz_timeslice: f64) -> Pose {
    let s = horiz_timeslice;
    let t = hop_param(frame, hop);

    let x = interp(hop.from as f64, hop.to as f64, t, s);
    let y = if t < s {
        1.0 - t
    } else {
        (1.0 - 2.0 * s + s * t) / (1.0 - s)
    };
    let rotation = if hop.spin {
        360.0 * ((1.0 + s) * t - s).max(0.0)
    } else {
        0.0
    };
    Pose { x, y, rotation }
}
