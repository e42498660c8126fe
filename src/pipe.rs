use rand::Rng;

/// Number of cells in every row of the grid.
pub const WIDTH: usize = 5;

/// One grid cell. Each flag says whether that side is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pipe {
    pub n: bool,
    pub e: bool,
    pub s: bool,
    pub w: bool,
}

impl Pipe {
    pub const OPEN: Pipe = Pipe {
        n: true,
        e: true,
        s: true,
        w: true,
    };

    pub const CLOSED: Pipe = Pipe {
        n: false,
        e: false,
        s: false,
        w: false,
    };

    /// Fair coin per side.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            n: rng.gen_bool(0.5),
            e: rng.gen_bool(0.5),
            s: rng.gen_bool(0.5),
            w: rng.gen_bool(0.5),
        }
    }

    /// 4-bit open-sides pattern: n=1, e=2, s=4, w=8.
    pub fn mask(self) -> u8 {
        (self.n as u8) | (self.e as u8) << 1 | (self.s as u8) << 2 | (self.w as u8) << 3
    }

    pub fn from_mask(mask: u8) -> Self {
        Self {
            n: mask & 1 != 0,
            e: mask & 2 != 0,
            s: mask & 4 != 0,
            w: mask & 8 != 0,
        }
    }

    pub fn open_sides(self) -> u32 {
        self.mask().count_ones()
    }
}

/// A horizontal slice of the grid at vertical coordinate `y`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipeRow {
    pub y: i64,
    pub pipes: [Pipe; WIDTH],
}

impl PipeRow {
    pub fn new(y: i64, pipes: [Pipe; WIDTH]) -> Self {
        Self { y, pipes }
    }

    pub fn uniform(y: i64, pipe: Pipe) -> Self {
        Self {
            y,
            pipes: [pipe; WIDTH],
        }
    }
}
