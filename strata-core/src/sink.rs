//! Render-completion capability.
//!
//! When a render pass reaches the root of a surface tree, the final
//! dirty region (the true union of all changes, in root coordinates)
//! is handed to a [`RenderSink`] exactly once. The terminal output
//! sink lives in `strata-term`; tests and headless use pass
//! [`NullSink`].

use crate::geometry::Rect;
use crate::surface::Surface;

/// Consumes the completed region of a root surface.
pub trait RenderSink {
    /// Called once per render pass that reached the root with work to
    /// do. `dirty` is valid and lies inside `root.bounds()`.
    ///
    /// Keep processing minimal; the stage is mid-traversal bookkeeping
    /// and must not be re-entered from here.
    fn region_done(&mut self, root: &Surface, dirty: Rect);
}

/// A sink that discards the completed region.
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn region_done(&mut self, _root: &Surface, _dirty: Rect) {}
}

/// Records completed regions; test helper.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub regions: Vec<Rect>,
}

impl RenderSink for RecordingSink {
    fn region_done(&mut self, _root: &Surface, dirty: Rect) {
        self.regions.push(dirty);
    }
}
