use crate::pipe::{Pipe, PipeRow, WIDTH};
use rand::Rng;

/// Build a fresh row at `y`, consistent with `prev` (the row directly above)
/// and with itself.
pub fn generate_row<R: Rng + ?Sized>(y: i64, prev: Option<&PipeRow>, rng: &mut R) -> PipeRow {
    let mut row = PipeRow::new(y, std::array::from_fn(|_| Pipe::random(rng)));
    reconcile_v(&mut row, prev);
    reconcile_h(&mut row);
    log::trace!("generated row y={} masks={:?}", y, row.pipes.map(Pipe::mask));
    row
}

/// North sides follow the south sides of the row above. The first row keeps
/// its random north sides.
pub fn reconcile_v(row: &mut PipeRow, prev: Option<&PipeRow>) {
    if let Some(prev) = prev {
        for (pipe, above) in row.pipes.iter_mut().zip(prev.pipes.iter()) {
            pipe.n = above.s;
        }
    }
}

/// Each east side copies its right neighbour's west side. The outer west of
/// column 0 and east of the last column are left alone.
pub fn reconcile_h(row: &mut PipeRow) {
    for i in 0..WIDTH - 1 {
        row.pipes[i].e = row.pipes[i + 1].w;
    }
}
