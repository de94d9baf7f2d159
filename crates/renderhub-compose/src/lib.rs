//! # renderhub-compose
//!
//! The frame compositor: draws resolved layers in declared order onto an
//! RGBA canvas and encodes the result as a single PNG or a multi-frame
//! GIF. Asset fan-out is bounded by [`par::bounded_map`].

pub mod canvas;
pub mod compositor;
pub mod par;

pub use canvas::Canvas;
pub use compositor::{Composed, Compositor, ResolvedFrame, ResolvedLayer};
