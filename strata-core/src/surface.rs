//! Surface: one node of the compositing tree.
//!
//! A surface owns a contiguous row-major cell buffer plus the state the
//! compositor needs: local bounds, position inside the parent, the
//! accumulated dirty region, a visibility flag, its parent link, and
//! its child layers bucketed by Z. Surfaces live in a [`Stage`] arena
//! and are addressed by [`SurfaceId`] handles; all mutation goes
//! through the stage so tree bookkeeping stays consistent.
//!
//! A surface that hosts layers should only receive structural changes
//! (move, visibility, layer management): its buffer is recomposited
//! from the children on every render, so direct content writes to it
//! are lost. Paint content on leaf surfaces.
//!
//! [`Stage`]: crate::Stage
//! [`SurfaceId`]: crate::SurfaceId

use std::collections::{BTreeMap, BTreeSet};

use crate::cell::Cell;
use crate::geometry::{Point, Rect};
use crate::stage::SurfaceId;

/// A rectangular cell buffer participating in the compositing tree.
#[derive(Debug)]
pub struct Surface {
    /// Local bounds: origin (0,0), size = width x height.
    pub(crate) bounds: Rect,
    /// Row-major cell storage; `cells.len() == bounds.size()` always.
    pub(crate) cells: Vec<Cell>,
    /// Placement inside the parent's coordinate space.
    pub(crate) pos: Point,
    /// Accumulated not-yet-rendered region, in local coordinates.
    /// Invalid means clean.
    pub(crate) dirty: Rect,
    pub(crate) visible: bool,
    pub(crate) parent: Option<SurfaceId>,
    /// Child layers bucketed by Z. Iteration order (ascending Z, then
    /// handle order inside a bucket) is the paint order.
    pub(crate) layers: BTreeMap<i32, BTreeSet<SurfaceId>>,
}

impl Surface {
    pub(crate) fn new(bounds: Rect, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), bounds.size());
        Surface {
            bounds,
            cells,
            pos: Point::default(),
            // Fresh surfaces are fully dirty so a first render paints
            // them completely.
            dirty: bounds,
            visible: true,
            parent: None,
            layers: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.bounds.width()
    }

    pub fn height(&self) -> usize {
        self.bounds.height()
    }

    /// Area in cells.
    pub fn size(&self) -> usize {
        self.bounds.size()
    }

    /// Local bounds (top at the origin).
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Position inside the parent's coordinate space.
    pub fn pos(&self) -> Point {
        self.pos
    }

    /// The unclipped region this surface occupies in its parent.
    pub fn bounds_in_parent(&self) -> Rect {
        self.bounds.at(self.pos)
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    /// The accumulated dirty region; invalid when clean.
    pub fn dirty(&self) -> Rect {
        self.dirty
    }

    /// Read access to the cell buffer, row-major over `bounds`.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at a local point, if inside bounds.
    pub fn cell_at(&self, p: Point) -> Option<&Cell> {
        if self.bounds.contains(p) {
            self.cells.get(self.bounds.index_for(p))
        } else {
            None
        }
    }

    /// True if this surface hosts child layers.
    pub fn has_layers(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Accumulate `region` (clipped to bounds) into the dirty rect.
    ///
    /// Monotone and idempotent: the dirty region only ever grows until
    /// a render pass consumes it. Regions that miss the surface
    /// entirely are ignored.
    pub(crate) fn mark_dirty(&mut self, region: Rect) -> Rect {
        let clipped = Rect::intersect(self.bounds, region);
        self.dirty = Rect::bounding(self.dirty, clipped);
        self.dirty
    }
}
