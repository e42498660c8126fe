//! Declarative description of one frame.
//!
//! The host decides how to draw it: [`Scene::to_svg`] produces a standalone
//! SVG document, the terminal host rasterizes the polylines.

use crate::motion::Pose;
use crate::pipe::Pipe;
use crate::state::{AnimationState, Timing};
use crate::window::box_y;
use std::fmt::Write;

pub const VIEW_W: f64 = 480.0;
pub const VIEW_H: f64 = 400.0;

/// Grid units visible across and down the viewport.
pub const GRID_VIEW_W: f64 = 6.0;
pub const GRID_VIEW_H: f64 = 3.0;

/// Side of the square a pipe shape is drawn in.
pub const CELL_BOX: f64 = 10.0;

pub const SPRITE_SIZE: f64 = 80.0;
pub const SPRITE_IMAGE: &str = "um.png";

/// Pixels per grid unit once the grid view box is fitted into the viewport.
pub fn grid_scale() -> f64 {
    (VIEW_W / GRID_VIEW_W).min(VIEW_H / GRID_VIEW_H)
}

/// Pixel offset of the grid origin (the view box is centred).
pub fn grid_origin() -> (f64, f64) {
    let k = grid_scale();
    ((VIEW_W - GRID_VIEW_W * k) / 2.0, (VIEW_H - GRID_VIEW_H * k) / 2.0)
}

/// Stroke primitives a cell may be drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipeShape {
    Ne,
    Es,
    Sw,
    Wn,
    Ns,
    Sn,
    We,
    Ew,
    NeOffset,
    EsOffset,
    SwOffset,
    WnOffset,
    NStub,
    EStub,
    SStub,
    WStub,
}

impl PipeShape {
    /// Table order is also draw order.
    pub const ALL: [PipeShape; 16] = [
        PipeShape::Ne,
        PipeShape::Es,
        PipeShape::Sw,
        PipeShape::Wn,
        PipeShape::Ns,
        PipeShape::Sn,
        PipeShape::We,
        PipeShape::Ew,
        PipeShape::NeOffset,
        PipeShape::EsOffset,
        PipeShape::SwOffset,
        PipeShape::WnOffset,
        PipeShape::NStub,
        PipeShape::EStub,
        PipeShape::SStub,
        PipeShape::WStub,
    ];

    pub fn applies(self, p: Pipe) -> bool {
        let Pipe { n, e, s, w } = p;
        match self {
            PipeShape::Ne => n && e,
            PipeShape::Es => e && s,
            PipeShape::Sw => s && w,
            PipeShape::Wn => w && n,
            PipeShape::Ns => n && s && !e,
            PipeShape::Sn => s && n && !w,
            PipeShape::We => w && e && !n,
            PipeShape::Ew => e && w && !s,
            PipeShape::NeOffset => n && e && !s && !w,
            PipeShape::EsOffset => e && s && !w && !n,
            PipeShape::SwOffset => s && w && !n && !e,
            PipeShape::WnOffset => w && n && !e && !s,
            PipeShape::NStub => n && !e && !s && !w,
            PipeShape::EStub => e && !s && !w && !n,
            PipeShape::SStub => s && !w && !n && !e,
            PipeShape::WStub => w && !n && !e && !s,
        }
    }

    /// SVG path data in a `CELL_BOX` square.
    pub fn path(self) -> &'static str {
        match self {
            PipeShape::Ne => "M 6 0 L 6 3 A 1 1 0 0 0 7 4 L 10 4",
            PipeShape::Es => "M 6 10 L 6 7 A 1 1 0 0 1 7 6 L 10 6",
            PipeShape::Sw => "M 0 6 L 3 6 A 1 1 0 0 1 4 7 L 4 10",
            PipeShape::Wn => "M 0 4 L 3 4 A 1 1 0 0 0 4 3 L 4 0",
            PipeShape::Ns => "M 6 0 L 6 10",
            PipeShape::Sn => "M 4 0 L 4 10",
            PipeShape::We => "M 0 4 L 10 4",
            PipeShape::Ew => "M 0 6 L 10 6",
            PipeShape::NeOffset => "M 4 0 L 4 5 A 1 1 0 0 0 5 6 L 10 6",
            PipeShape::EsOffset => "M 4 10 L 4 5 A 1 1 0 0 1 5 4 L 10 4",
            PipeShape::SwOffset => "M 0 4 L 5 4 A 1 1 0 0 1 6 5 L 6 10",
            PipeShape::WnOffset => "M 0 6 L 5 6 A 1 1 0 0 0 6 5 L 6 0",
            PipeShape::NStub => "M 4 0 L 4 3 L 6 3 L 6 0",
            PipeShape::EStub => "M 10 4 L 7 4 L 7 6 L 10 6",
            PipeShape::SStub => "M 6 10 L 6 7 L 4 7 L 4 10",
            PipeShape::WStub => "M 0 6 L 3 6 L 3 4 L 0 4",
        }
    }

    /// Same stroke as [`PipeShape::path`] with each quarter arc replaced by
    /// its chord.
    pub fn polyline(self) -> &'static [(f64, f64)] {
        match self {
            PipeShape::Ne => &[(6.0, 0.0), (6.0, 3.0), (7.0, 4.0), (10.0, 4.0)],
            PipeShape::Es => &[(6.0, 10.0), (6.0, 7.0), (7.0, 6.0), (10.0, 6.0)],
            PipeShape::Sw => &[(0.0, 6.0), (3.0, 6.0), (4.0, 7.0), (4.0, 10.0)],
            PipeShape::Wn => &[(0.0, 4.0), (3.0, 4.0), (4.0, 3.0), (4.0, 0.0)],
            PipeShape::Ns => &[(6.0, 0.0), (6.0, 10.0)],
            PipeShape::Sn => &[(4.0, 0.0), (4.0, 10.0)],
            PipeShape::We => &[(0.0, 4.0), (10.0, 4.0)],
            PipeShape::Ew => &[(0.0, 6.0), (10.0, 6.0)],
            PipeShape::NeOffset => &[(4.0, 0.0), (4.0, 5.0), (5.0, 6.0), (10.0, 6.0)],
            PipeShape::EsOffset => &[(4.0, 10.0), (4.0, 5.0), (5.0, 4.0), (10.0, 4.0)],
            PipeShape::SwOffset => &[(0.0, 4.0), (5.0, 4.0), (6.0, 5.0), (6.0, 10.0)],
            PipeShape::WnOffset => &[(0.0, 6.0), (5.0, 6.0), (6.0, 5.0), (6.0, 0.0)],
            PipeShape::NStub => &[(4.0, 0.0), (4.0, 3.0), (6.0, 3.0), (6.0, 0.0)],
            PipeShape::EStub => &[(10.0, 4.0), (7.0, 4.0), (7.0, 6.0), (10.0, 6.0)],
            PipeShape::SStub => &[(6.0, 10.0), (6.0, 7.0), (4.0, 7.0), (4.0, 10.0)],
            PipeShape::WStub => &[(0.0, 6.0), (3.0, 6.0), (3.0, 4.0), (0.0, 4.0)],
        }
    }
}

/// Shapes for one cell, in draw order.
pub fn shapes_for(pipe: Pipe) -> Vec<PipeShape> {
    PipeShape::ALL
        .into_iter()
        .filter(|shape| shape.applies(pipe))
        .collect()
}

/// A cell placed in grid units; its box spans `(x, y)..(x + 1, y + 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct CellNode {
    pub x: f64,
    pub y: f64,
    pub shapes: Vec<PipeShape>,
}

/// The character image, in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
    pub pivot: (f64, f64),
    pub pose: Pose,
}

impl Sprite {
    pub fn place(pose: Pose) -> Self {
        let x = 40.0 + 80.0 * pose.x;
        let y = 70.0 + 80.0 * pose.y;
        Self {
            x,
            y,
            size: SPRITE_SIZE,
            rotation: pose.rotation,
            pivot: (x + 45.0, 175.0),
            pose,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub cells: Vec<CellNode>,
    pub sprite: Sprite,
}

impl Scene {
    pub fn build(state: &AnimationState, timing: &Timing) -> Self {
        let cells = state
            .rows
            .iter()
            .flat_map(|row| {
                let y = box_y(row.y, state.frame);
                row.pipes.iter().enumerate().map(move |(i, &pipe)| CellNode {
                    x: i as f64 + 0.5,
                    y,
                    shapes: shapes_for(pipe),
                })
            })
            .collect();
        Self {
            width: VIEW_W,
            height: VIEW_H,
            cells,
            sprite: Sprite::place(state.pose(timing)),
        }
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_svg(&mut out);
        out
    }

    fn write_svg(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(
            out,
            r#"<svg x="0" y="0" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, GRID_VIEW_W, GRID_VIEW_H
        )?;
        for cell in &self.cells {
            if cell.shapes.is_empty() {
                continue;
            }
            writeln!(
                out,
                r#"<svg x="{}" y="{}" width="1" height="1" viewBox="0 0 {b} {b}">"#,
                cell.x,
                cell.y,
                b = CELL_BOX
            )?;
            for shape in &cell.shapes {
                writeln!(
                    out,
                    r#"<path d="{}" stroke="blue" fill="none" stroke-width="0.2" />"#,
                    shape.path()
                )?;
            }
            writeln!(out, "</svg>")?;
        }
        writeln!(out, "</svg>")?;
        let s = &self.sprite;
        writeln!(
            out,
            r#"<image href="{}" x="{}" y="{}" width="{size}" height="{size}" transform="rotate({}, {}, {})" />"#,
            SPRITE_IMAGE,
            s.x,
            s.y,
            s.rotation,
            s.pivot.0,
            s.pivot.1,
            size = s.size
        )?;
        writeln!(out, "</svg>")
    }
}
