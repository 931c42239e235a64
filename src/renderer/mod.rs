//! Rendering module
//!
//! The simulation never draws. Each presented frame is described as an
//! ordered list of sprite draws that a host-side rasterizer consumes.

pub mod draw_list;

pub use draw_list::{DrawCommand, Frame, SpriteKind, build_frame, ship_visible};
