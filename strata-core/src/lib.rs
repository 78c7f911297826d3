//! Strata compositor core
//!
//! This crate provides the platform-independent compositing model:
//! - Point/Rect geometry with half-open rectangles
//! - Character cells with colors and an attribute mask
//! - A surface arena: rectangular cell buffers linked into a tree
//! - Incremental dirty-region tracking and Z-ordered rendering
//!
//! This crate has NO terminal or I/O dependencies and can be used
//! headlessly for testing. Output happens through the [`RenderSink`]
//! capability handed to [`Stage::render`].

pub mod cell;
pub mod error;
pub mod geometry;
pub mod sink;
pub mod stage;
pub mod surface;

pub use cell::{Cell, CellAttrs};
pub use error::Error;
pub use geometry::{Point, Rect};
pub use sink::{NullSink, RenderSink};
pub use stage::{Stage, SurfaceId};
pub use surface::Surface;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;
