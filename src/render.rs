use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use pipefall::scene::{grid_origin, grid_scale, Scene, CELL_BOX, GRID_VIEW_H, VIEW_H, VIEW_W};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        self.cells.fill(Cell {
            bg,
            ..Cell::default()
        });
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

const PIPE_INK: Pixel = Pixel {
    r: 40,
    g: 170,
    b: 255,
    a: 255,
};

const SPRITE_INK: Pixel = Pixel {
    r: 250,
    g: 230,
    b: 80,
    a: 255,
};

/// Braille subpixel canvas: 2×4 pixels per terminal cell.
pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }
    fn plot(&mut self, x: f64, y: f64, ink: Pixel) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        self.px[i] = ink;
    }
    fn line(&mut self, a: (f64, f64), b: (f64, f64), clip: (f64, f64), ink: Pixel) {
        let len = (b.0 - a.0).hypot(b.1 - a.1);
        let steps = (len * 2.0).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            if y >= clip.0 && y < clip.1 {
                self.plot(x, y, ink);
            }
        }
    }
}

/// Maps viewport pixels onto the canvas, preserving aspect.
#[derive(Clone, Copy, Debug)]
struct Fit {
    k: f64,
    ox: f64,
    oy: f64,
}

impl Fit {
    fn new(canvas: &PixelCanvas) -> Self {
        // Braille dots are about twice as tall as they are wide.
        let k = (canvas.w as f64 / VIEW_W).min(canvas.h as f64 * 2.0 / VIEW_H);
        let ox = (canvas.w as f64 - VIEW_W * k) / 2.0;
        let oy = (canvas.h as f64 - VIEW_H * k / 2.0) / 2.0;
        Self { k, ox, oy }
    }
    fn map(&self, p: (f64, f64)) -> (f64, f64) {
        (self.ox + p.0 * self.k, self.oy + p.1 * self.k / 2.0)
    }
}

pub(crate) fn draw_scene(canvas: &mut PixelCanvas, scene: &Scene) {
    let fit = Fit::new(canvas);
    let unit = grid_scale();
    let (gx, gy) = grid_origin();
    // The grid is clipped to its own view box.
    let clip = (fit.map((0.0, gy)).1, fit.map((0.0, gy + GRID_VIEW_H * unit)).1);
    let per_box = unit / CELL_BOX;

    for cell in &scene.cells {
        let x0 = gx + cell.x * unit;
        let y0 = gy + cell.y * unit;
        for shape in &cell.shapes {
            let pts = shape.polyline();
            for pair in pts.windows(2) {
                let a = fit.map((x0 + pair[0].0 * per_box, y0 + pair[0].1 * per_box));
                let b = fit.map((x0 + pair[1].0 * per_box, y0 + pair[1].1 * per_box));
                canvas.line(a, b, clip, PIPE_INK);
            }
        }
    }

    let s = &scene.sprite;
    let r = s.size / 2.0;
    let (sin, cos) = s.rotation.to_radians().sin_cos();
    let rotate = |p: (f64, f64)| {
        let (dx, dy) = (p.0 - s.pivot.0, p.1 - s.pivot.1);
        (s.pivot.0 + dx * cos - dy * sin, s.pivot.1 + dx * sin + dy * cos)
    };
    let centre = rotate((s.x + r, s.y + r));
    let full = (0.0, f64::INFINITY);

    // Wheel with one spoke so the tumble is visible.
    let segments = 48;
    for i in 0..segments {
        let a0 = i as f64 / segments as f64 * std::f64::consts::TAU;
        let a1 = (i + 1) as f64 / segments as f64 * std::f64::consts::TAU;
        let p0 = (centre.0 + r * 0.8 * a0.cos(), centre.1 + r * 0.8 * a0.sin());
        let p1 = (centre.0 + r * 0.8 * a1.cos(), centre.1 + r * 0.8 * a1.sin());
        canvas.line(fit.map(p0), fit.map(p1), full, SPRITE_INK);
    }
    let tip = (centre.0 + r * 0.8 * sin, centre.1 - r * 0.8 * cos);
    canvas.line(fit.map(centre), fit.map(tip), full, SPRITE_INK);
}

/* -----------------------------
   Braille encoding: 2×4 pixels -> U+2800..U+28FF
------------------------------ */

const BRAILLE_BITS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // left column
    [0x08, 0x10, 0x20, 0x80], // right column
];

pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, color: bool, bg: Color) {
    for cy in 0..out.h as u32 {
        for cx in 0..out.w as u32 {
            let mut mask: u8 = 0;
            let mut ink = None;

            for dy in 0..4 {
                for dx in 0..2 {
                    let (x, y) = (cx * 2 + dx, cy * 4 + dy);
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[canvas.idx(x, y)];
                    if p.a >= 32 {
                        mask |= BRAILLE_BITS[dx as usize][dy as usize];
                        // Sprite wins over pipes when they share a cell.
                        if ink != Some(SPRITE_INK) {
                            ink = Some(p);
                        }
                    }
                }
            }

            let ch = char::from_u32(0x2800 + mask as u32).unwrap_or(' ');
            let fg = match ink {
                Some(p) if color => Color::Rgb {
                    r: p.r,
                    g: p.g,
                    b: p.b,
                },
                _ => Color::White,
            };
            out.set(cx as u16, cy as u16, Cell { ch, fg, bg });
        }
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

/// Owns raw mode and the alternate screen; both are released on drop.
pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
    active: bool,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            canvas: PixelCanvas::new(cols as u32 * 2, rows as u32 * 4),
            active: true,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        log::debug!("terminal resized to {c}x{r}");
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.canvas = PixelCanvas::new(c as u32 * 2, r as u32 * 4);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipefall::{AnimationState, Pipe, PipeRow, Timing};

    #[test]
    fn open_row_leaves_ink_on_the_canvas() {
        let mut st = AnimationState::init();
        st.rows.push(PipeRow::uniform(1, Pipe::OPEN));
        let scene = Scene::build(&st, &Timing::default());

        let mut canvas = PixelCanvas::new(160, 96);
        draw_scene(&mut canvas, &scene);
        assert!(canvas.px.iter().any(|p| *p == PIPE_INK));
        assert!(canvas.px.iter().any(|p| *p == SPRITE_INK));

        let mut cells = CellBuffer::new(80, 24);
        canvas_to_cells(&canvas, &mut cells, true, Color::Black);
        assert!(cells.cells.iter().any(|c| c.ch != '\u{2800}'));
    }

    #[test]
    fn rows_outside_the_grid_box_are_clipped() {
        let mut st = AnimationState::init();
        st.rows.push(PipeRow::uniform(5, Pipe::OPEN));
        let mut scene = Scene::build(&st, &Timing::default());
        scene.sprite.size = 0.0;

        let mut canvas = PixelCanvas::new(160, 96);
        draw_scene(&mut canvas, &scene);
        assert!(!canvas.px.iter().any(|p| *p == PIPE_INK));
    }
}
