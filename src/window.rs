use crate::grid::generate_row;
use crate::pipe::PipeRow;
use rand::Rng;

/// Rows at or above this box position have scrolled off the top.
pub const VISIBILITY_FLOOR: f64 = -2.0;

/// Once the last row sits below this box position the window is stocked.
pub const STOCK_CEILING: f64 = 6.0;

/// Screen-space offset of a row at `y` at time `frame`.
pub fn box_y(y: i64, frame: f64) -> f64 {
    y as f64 - frame
}

/// Evict rows that have scrolled away and append at most one new row.
pub fn advance_rows<R: Rng + ?Sized>(frame: f64, rows: Vec<PipeRow>, rng: &mut R) -> Vec<PipeRow> {
    let before = rows.len();
    let mut visible: Vec<PipeRow> = rows
        .into_iter()
        .filter(|row| box_y(row.y, frame) > VISIBILITY_FLOOR)
        .collect();
    if visible.len() != before {
        log::trace!("evicted {} row(s) at frame {:.3}", before - visible.len(), frame);
    }

    let next = match visible.last() {
        None => Some(generate_row(frame.floor() as i64, None, rng)),
        Some(last) if box_y(last.y, frame) <= STOCK_CEILING => {
            Some(generate_row(last.y + 1, Some(last), rng))
        }
        Some(_) => None,
    };
    visible.extend(next);
    visible
}
