//! A scrolling grid of pipe cells and a character hopping along open paths.
//!
//! Every tick the host hands [`state::AnimationState::update`] a
//! [`clock::Tick`]; the result is turned into a [`scene::Scene`] for drawing.

pub mod clock;
pub mod config;
pub mod error;
pub mod grid;
pub mod motion;
pub mod navigator;
pub mod pipe;
pub mod scene;
pub mod state;
pub mod window;

pub use clock::{FrameClock, Tick};
pub use pipe::{Pipe, PipeRow, WIDTH};
pub use state::{AnimationState, Timing};
