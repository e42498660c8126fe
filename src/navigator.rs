use crate::pipe::{Pipe, PipeRow, WIDTH};
use rand::Rng;

/// Upper bound (exclusive) of the raw draw used to pick among candidates.
pub const TARGET_RANGE: u32 = 60;

/// Index of the row the character is about to pass through.
pub const REFERENCE_ROW: usize = 2;

/// One hop of the character between two columns.
///
/// The hop occupies the frame interval `[end_frame - 1, end_frame]`; a new
/// hop is chosen once the frame moves past `end_frame`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hop {
    pub from: usize,
    pub to: usize,
    pub end_frame: f64,
    pub spin: bool,
}

impl Hop {
    pub fn start_frame(&self) -> f64 {
        self.end_frame - 1.0
    }
}

impl Default for Hop {
    fn default() -> Self {
        Self {
            from: 2,
            to: 2,
            end_frame: 0.0,
            spin: false,
        }
    }
}

/// Every edge strictly between `start` and `end` is open.
pub fn connected(pipes: &[Pipe; WIDTH], start: usize, end: usize) -> bool {
    if start == end {
        true
    } else if start < end {
        pipes[start..end].iter().all(|p| p.e)
    } else {
        pipes[end + 1..=start].iter().all(|p| p.w)
    }
}

/// Columns reachable from `start` along open horizontal edges, in order.
pub fn find_connected(start: usize, pipes: &[Pipe; WIDTH]) -> Vec<usize> {
    (0..WIDTH).filter(|&i| connected(pipes, start, i)).collect()
}

/// Pick the next column given a raw draw `target` in `0..TARGET_RANGE`.
///
/// Returns the destination and whether the hop tumbles.
pub fn select_goal(rows: &[PipeRow], current: usize, target: u32) -> (usize, bool) {
    let Some(row) = rows.get(REFERENCE_ROW) else {
        return (current, true);
    };
    let connected = find_connected(current, &row.pipes);
    if connected.is_empty() {
        // Tumble in the void.
        return (current, true);
    }

    let unblocked: Vec<usize> = connected
        .iter()
        .copied()
        .filter(|&i| row.pipes[i].s)
        .collect();
    let (candidates, spin) = if unblocked.is_empty() {
        (connected, true)
    } else {
        (unblocked, false)
    };
    let pick = candidates[target as usize % candidates.len()];
    log::debug!(
        "candidates {:?} target {} mod {} -> column {} (spin={})",
        candidates,
        target,
        candidates.len(),
        pick,
        spin
    );
    (pick, spin)
}

/// Keep `hop` until it has elapsed, then draw the next one.
pub fn maybe_advance<R: Rng + ?Sized>(frame: f64, rows: &[PipeRow], hop: Hop, rng: &mut R) -> Hop {
    if frame <= hop.end_frame {
        return hop;
    }
    let target = rng.gen_range(0..TARGET_RANGE);
    let (to, spin) = select_goal(rows, hop.to, target);
    let next = Hop {
        from: hop.to,
        to,
        end_frame: frame.ceil(),
        spin,
    };
    log::debug!("frame {:.3}: {:?} -> {:?}", frame, hop, next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn window(reference: PipeRow) -> Vec<PipeRow> {
        vec![
            PipeRow::uniform(0, Pipe::OPEN),
            PipeRow::uniform(1, Pipe::OPEN),
            reference,
        ]
    }

    #[test]
    fn fully_open_row_reaches_everything() {
        let row = PipeRow::uniform(2, Pipe::OPEN);
        assert_eq!(find_connected(0, &row.pipes), vec![0, 1, 2, 3, 4]);
        let rows = window(row);
        for target in 0..TARGET_RANGE {
            assert_eq!(select_goal(&rows, 0, target), (target as usize % 5, false));
        }
    }

    #[test]
    fn closed_column_splits_the_row() {
        let mut row = PipeRow::uniform(2, Pipe::OPEN);
        row.pipes[2] = Pipe::CLOSED;
        row.pipes[1].e = false;
        row.pipes[3].w = false;
        assert_eq!(find_connected(0, &row.pipes), vec![0, 1]);
        assert_eq!(find_connected(2, &row.pipes), vec![2]);
        assert_eq!(find_connected(4, &row.pipes), vec![3, 4]);
    }

    #[test]
    fn connectivity_is_reflexive_and_symmetric() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let row = crate::grid::generate_row(0, None, &mut rng);
            for a in 0..WIDTH {
                assert!(connected(&row.pipes, a, a));
                for b in 0..WIDTH {
                    assert_eq!(connected(&row.pipes, a, b), connected(&row.pipes, b, a));
                }
            }
        }
    }

    #[test]
    fn short_window_tumbles_in_place() {
        let rows = vec![PipeRow::uniform(0, Pipe::OPEN)];
        assert_eq!(select_goal(&rows, 3, 17), (3, true));
    }

    #[test]
    fn falls_back_to_connected_set_when_every_floor_is_closed() {
        let row = PipeRow::uniform(2, Pipe { s: false, ..Pipe::OPEN });
        let rows = window(row);
        for target in 0..TARGET_RANGE {
            let (to, spin) = select_goal(&rows, 1, target);
            assert!(spin);
            assert_eq!(to, target as usize % 5);
        }
    }

    #[test]
    fn prefers_columns_with_an_open_floor() {
        let mut row = PipeRow::uniform(2, Pipe { s: false, ..Pipe::OPEN });
        row.pipes[3].s = true;
        let rows = window(row);
        for target in 0..TARGET_RANGE {
            assert_eq!(select_goal(&rows, 0, target), (3, false));
        }
    }

    #[test]
    fn hop_holds_until_end_frame() {
        let mut rng = StdRng::seed_from_u64(5);
        let rows = window(PipeRow::uniform(2, Pipe::OPEN));
        let hop = Hop {
            from: 1,
            to: 4,
            end_frame: 3.0,
            spin: false,
        };
        assert_eq!(maybe_advance(2.5, &rows, hop, &mut rng), hop);
        assert_eq!(maybe_advance(3.0, &rows, hop, &mut rng), hop);

        let next = maybe_advance(3.2, &rows, hop, &mut rng);
        assert_eq!(next.from, 4);
        assert_eq!(next.end_frame, 4.0);
        assert!(!next.spin);
        assert!(next.to < WIDTH);
    }
}
