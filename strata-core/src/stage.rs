//! Surface arena and compositing operations.
//!
//! The [`Stage`] owns every surface and hands out generational
//! [`SurfaceId`] handles. Parent/child links are stored as handles, so
//! the tree carries no owning back-references: a surface can only be
//! destroyed after it has been detached, and a handle that outlives
//! its surface is detected as stale instead of dangling.
//!
//! All tree mutation goes through the stage. The render traversal in
//! [`Stage::render`] walks from the mutated surface up to the root,
//! folding child dirty regions into each ancestor and recompositing
//! layers in ascending Z (painter's algorithm), then hands the final
//! region to the caller-supplied [`RenderSink`].
//!
//! Single-threaded by contract: no operation may run concurrently with
//! a render traversal over the same tree.

use std::collections::BTreeSet;

use log::{debug, trace, warn};

use crate::cell::Cell;
use crate::error::Error;
use crate::geometry::{Point, Rect};
use crate::sink::RenderSink;
use crate::surface::Surface;
use crate::Result;

/// Stable handle to a surface slot.
///
/// Ordering is (slot, generation); inside a Z bucket children paint in
/// handle order, which makes sibling paint order deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    surface: Option<Surface>,
}

/// Arena of surfaces forming one or more compositing trees.
#[derive(Debug, Default)]
pub struct Stage {
    slots: Vec<Slot>,
}

impl Stage {
    pub fn new() -> Self {
        Stage { slots: Vec::new() }
    }

    /// Number of live surfaces.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.surface.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate a blank `width x height` surface.
    pub fn create(&mut self, width: u16, height: u16) -> Result<SurfaceId> {
        let bounds = Rect::sized(width, height);
        let cells = alloc_cells(bounds.size())?;
        let surface = Surface::new(bounds, cells);

        // Reuse a free slot if one exists.
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.surface.is_none() {
                slot.surface = Some(surface);
                return Ok(SurfaceId {
                    index: index as u32,
                    generation: slot.generation,
                });
            }
        }

        self.slots.push(Slot {
            generation: 0,
            surface: Some(surface),
        });
        Ok(SurfaceId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        })
    }

    /// Free a surface slot.
    ///
    /// The surface must be fully detached: no parent and no remaining
    /// layers. The handle (and any copy of it) becomes stale.
    pub fn destroy(&mut self, id: SurfaceId) -> Result<()> {
        let surface = self.get(id)?;
        if surface.parent.is_some() || !surface.layers.is_empty() {
            return Err(Error::StillAttached);
        }
        let slot = &mut self.slots[id.index as usize];
        slot.surface = None;
        slot.generation = slot.generation.wrapping_add(1);
        debug!("destroyed surface {:?}", id);
        Ok(())
    }

    /// Shared access to a surface.
    pub fn get(&self, id: SurfaceId) -> Result<&Surface> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.surface.as_ref())
            .ok_or(Error::StaleHandle)
    }

    fn get_mut(&mut self, id: SurfaceId) -> Result<&mut Surface> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.surface.as_mut())
            .ok_or(Error::StaleHandle)
    }

    /// Mutable access to one surface plus shared access to another.
    fn get_pair_mut(&mut self, a: SurfaceId, b: SurfaceId) -> Result<(&mut Surface, &Surface)> {
        if a.index == b.index {
            return Err(Error::NoOverlap);
        }
        // Validate before splitting so stale handles fail cleanly.
        self.get(a)?;
        self.get(b)?;
        let (ai, bi) = (a.index as usize, b.index as usize);
        if ai < bi {
            let (left, right) = self.slots.split_at_mut(bi);
            Ok((
                left[ai].surface.as_mut().ok_or(Error::StaleHandle)?,
                right[0].surface.as_ref().ok_or(Error::StaleHandle)?,
            ))
        } else {
            let (left, right) = self.slots.split_at_mut(ai);
            Ok((
                right[0].surface.as_mut().ok_or(Error::StaleHandle)?,
                left[bi].surface.as_ref().ok_or(Error::StaleHandle)?,
            ))
        }
    }

    /// Direct write access to a surface's cell buffer, row-major.
    ///
    /// Callers painting through this must mark the modified region with
    /// [`invalidate_rect`](Self::invalidate_rect) or
    /// [`invalidate_span`](Self::invalidate_span) afterwards.
    pub fn cells_mut(&mut self, id: SurfaceId) -> Result<&mut [Cell]> {
        Ok(&mut self.get_mut(id)?.cells)
    }

    // ── Content mutation ────────────────────────────────────────────

    /// Reallocate a surface to `width x height`.
    ///
    /// Prior content is discarded (the new buffer is blank). If the
    /// surface is attached, the region it occupied in the parent is
    /// invalidated before the new bounds take effect.
    pub fn resize(&mut self, id: SurfaceId, width: u16, height: u16) -> Result<()> {
        let bounds = Rect::sized(width, height);
        let cells = alloc_cells(bounds.size())?;

        let (old_occupied, parent) = {
            let surface = self.get(id)?;
            (surface.bounds_in_parent(), surface.parent)
        };
        if let Some(pid) = parent {
            self.get_mut(pid)?.mark_dirty(old_occupied);
        }

        let surface = self.get_mut(id)?;
        surface.bounds = bounds;
        surface.cells = cells;
        surface.dirty = bounds;
        debug_assert_eq!(surface.cells.len(), surface.bounds.size());
        trace!("resized {:?} to {}x{}", id, width, height);
        Ok(())
    }

    /// Write `pattern` to every cell in `intersect(bounds, crop)`, or
    /// the whole surface when no valid crop is given, and mark the
    /// region dirty.
    pub fn fill(&mut self, id: SurfaceId, pattern: Cell, crop: Option<Rect>) -> Result<()> {
        let surface = self.get_mut(id)?;
        let region = match crop {
            Some(c) if c.is_valid() => {
                let clipped = Rect::intersect(surface.bounds, c);
                if !clipped.is_valid() {
                    return Err(Error::NoOverlap);
                }
                clipped
            }
            _ => surface.bounds,
        };

        fill_cells(surface, region, pattern);
        surface.mark_dirty(region);
        Ok(())
    }

    /// Fill with the blank cell.
    pub fn clear(&mut self, id: SurfaceId, crop: Option<Rect>) -> Result<()> {
        self.fill(id, Cell::default(), crop)
    }

    /// Blend `src` onto `dst` with the source placed at `pos` in
    /// `dst`'s coordinate space. Cells carrying the TRANSPARENT
    /// attribute are not copied. Both the clipped source crop and the
    /// clipped destination region must be non-empty.
    pub fn blend(
        &mut self,
        dst: SurfaceId,
        src: SurfaceId,
        src_crop: Option<Rect>,
        pos: Point,
    ) -> Result<()> {
        let (dst_surface, src_surface) = self.get_pair_mut(dst, src)?;
        let s_crop = match src_crop {
            Some(c) => Rect::intersect(src_surface.bounds, c),
            None => src_surface.bounds,
        };
        if !s_crop.is_valid() {
            return Err(Error::NoOverlap);
        }
        let d_crop = blend_cells(dst_surface, src_surface, s_crop, pos)?;
        dst_surface.mark_dirty(d_crop);
        Ok(())
    }

    // ── Position, visibility, Z order ───────────────────────────────

    /// Move a surface inside its parent's coordinate space.
    ///
    /// Attached surfaces invalidate their full contents and the region
    /// they occupied before the move; detached surfaces just take the
    /// new position.
    pub fn move_to(&mut self, id: SurfaceId, pos: Point) -> Result<()> {
        self.invalidate_occupied(id)?;
        self.get_mut(id)?.pos = pos;
        Ok(())
    }

    /// Move a surface to a new position and Z bucket in one step.
    /// The Z change is skipped silently when the surface is detached.
    pub fn move_to_z(&mut self, id: SurfaceId, pos: Point, z: i32) -> Result<()> {
        self.invalidate_occupied(id)?;
        if let Some(pid) = self.get(id)?.parent {
            self.move_layer(pid, id, z)?;
        }
        self.get_mut(id)?.pos = pos;
        Ok(())
    }

    /// Move an attached surface to a new Z bucket.
    pub fn move_z(&mut self, id: SurfaceId, z: i32) -> Result<()> {
        let parent = self.get(id)?.parent.ok_or(Error::Detached)?;
        let surface = self.get_mut(id)?;
        surface.dirty = surface.bounds;
        self.move_layer(parent, id, z)
    }

    /// Make a surface visible again. Its full contents are invalidated
    /// so the next render repaints it.
    pub fn show(&mut self, id: SurfaceId) -> Result<()> {
        let surface = self.get_mut(id)?;
        surface.dirty = surface.bounds;
        surface.visible = true;
        Ok(())
    }

    /// Hide a surface. Its own bounds are invalidated, and if it is
    /// attached, the region it occupied in the parent as well, so the
    /// parent repaints the now-absent area.
    pub fn hide(&mut self, id: SurfaceId) -> Result<()> {
        self.invalidate_occupied(id)?;
        let surface = self.get_mut(id)?;
        surface.dirty = surface.bounds;
        surface.visible = false;
        Ok(())
    }

    /// For attached surfaces: invalidate own full bounds and the
    /// occupied region in the parent. No effect when detached.
    fn invalidate_occupied(&mut self, id: SurfaceId) -> Result<()> {
        let (occupied, parent) = {
            let surface = self.get(id)?;
            (surface.bounds_in_parent(), surface.parent)
        };
        if let Some(pid) = parent {
            let surface = self.get_mut(id)?;
            surface.dirty = surface.bounds;
            self.get_mut(pid)?.mark_dirty(occupied);
        }
        Ok(())
    }

    // ── Layer management ────────────────────────────────────────────

    /// Attach `child` as a layer of `parent` under Z bucket `z`.
    pub fn add_layer(&mut self, parent: SurfaceId, child: SurfaceId, z: i32) -> Result<()> {
        if parent == child {
            return Err(Error::AlreadyAttached);
        }
        if self.get(child)?.parent.is_some() {
            return Err(Error::AlreadyAttached);
        }
        self.get(parent)?;

        let occupied = {
            let c = self.get_mut(child)?;
            c.parent = Some(parent);
            c.bounds_in_parent()
        };
        let p = self.get_mut(parent)?;
        p.layers.entry(z).or_insert_with(BTreeSet::new).insert(child);
        p.mark_dirty(occupied);
        debug!("attached {:?} to {:?} at z={}", child, parent, z);
        Ok(())
    }

    /// Attach `child` at position `pos` under Z bucket `z`.
    pub fn add_layer_at(
        &mut self,
        parent: SurfaceId,
        child: SurfaceId,
        pos: Point,
        z: i32,
    ) -> Result<()> {
        if self.get(child)?.parent.is_some() {
            return Err(Error::AlreadyAttached);
        }
        self.get_mut(child)?.pos = pos;
        self.add_layer(parent, child, z)
    }

    /// Detach `child` from `parent`, pruning its Z bucket if it was
    /// the last occupant.
    pub fn remove_layer(&mut self, parent: SurfaceId, child: SurfaceId) -> Result<()> {
        if self.get(child)?.parent != Some(parent) {
            return Err(Error::NotAChild);
        }
        let occupied = self.get(child)?.bounds_in_parent();

        let p = self.get_mut(parent)?;
        let bucket = p
            .layers
            .iter()
            .find(|(_, set)| set.contains(&child))
            .map(|(&z, _)| z)
            .ok_or(Error::NotAChild)?;
        let set = p.layers.get_mut(&bucket).ok_or(Error::NotAChild)?;
        set.remove(&child);
        if set.is_empty() {
            p.layers.remove(&bucket);
        }
        p.mark_dirty(occupied);

        self.get_mut(child)?.parent = None;
        debug!("detached {:?} from {:?}", child, parent);
        Ok(())
    }

    /// Relocate an attached `child` to a different Z bucket.
    pub fn move_layer(&mut self, parent: SurfaceId, child: SurfaceId, z: i32) -> Result<()> {
        if self.get(child)?.parent != Some(parent) {
            return Err(Error::NotAChild);
        }
        let occupied = self.get(child)?.bounds_in_parent();

        let p = self.get_mut(parent)?;
        let old_z = p
            .layers
            .iter()
            .find(|(_, set)| set.contains(&child))
            .map(|(&zk, _)| zk)
            .ok_or(Error::NotAChild)?;
        if old_z != z {
            let set = p.layers.get_mut(&old_z).ok_or(Error::NotAChild)?;
            set.remove(&child);
            if set.is_empty() {
                p.layers.remove(&old_z);
            }
            p.layers.entry(z).or_insert_with(BTreeSet::new).insert(child);
        }
        p.mark_dirty(occupied);
        Ok(())
    }

    /// True if `child` is currently a layer of `parent`.
    pub fn contains_layer(&self, parent: SurfaceId, child: SurfaceId) -> bool {
        self.get(parent)
            .map(|p| p.layers.values().any(|set| set.contains(&child)))
            .unwrap_or(false)
    }

    // ── Dirty tracking ──────────────────────────────────────────────

    /// Mark the entire surface dirty.
    pub fn invalidate(&mut self, id: SurfaceId) -> Result<Rect> {
        let surface = self.get_mut(id)?;
        surface.dirty = surface.bounds;
        Ok(surface.dirty)
    }

    /// Accumulate `region` (clipped to bounds) into the dirty rect.
    /// Idempotent and monotone; returns the new dirty region.
    pub fn invalidate_rect(&mut self, id: SurfaceId, region: Rect) -> Result<Rect> {
        Ok(self.get_mut(id)?.mark_dirty(region))
    }

    /// Mark the linear buffer range `[start, end)` dirty.
    ///
    /// A range inside one row dirties exactly that sub-row span; a
    /// range spanning rows widens to full-width bands, a conservative
    /// approximation that keeps the region a single rectangle.
    pub fn invalidate_span(&mut self, id: SurfaceId, start: usize, end: usize) -> Result<Rect> {
        let surface = self.get_mut(id)?;
        let end = end.min(surface.bounds.size());
        if start >= end {
            return Ok(surface.dirty);
        }

        let start_p = surface.bounds.point_for(start);
        let end_p = surface.bounds.point_for(end - 1);
        let region = if start_p.y == end_p.y {
            Rect::new(start_p.x, start_p.y, end_p.x + 1, end_p.y + 1)
        } else {
            Rect::new(0, start_p.y, surface.bounds.width() as i32, end_p.y + 1)
        };
        Ok(surface.mark_dirty(region))
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Propagate and composite changes from `id` up to its root.
    ///
    /// At every level: fold the dirty regions of visible children into
    /// the surface, blank the region if the surface hosts layers, then
    /// blend the children back in ascending Z so higher layers paint
    /// over lower ones. Each child's dirty state is consumed exactly
    /// once per pass. When the traversal reaches a surface with no
    /// parent, the final dirty region is handed to `sink`, and every
    /// surface the pass visited is marked clean.
    pub fn render(&mut self, id: SurfaceId, sink: &mut dyn RenderSink) -> Result<()> {
        self.get(id)?;
        let mut chain: Vec<SurfaceId> = Vec::new();
        let mut cur = id;

        loop {
            if chain.contains(&cur) {
                warn!("surface tree contains a cycle at {:?}; render aborted", cur);
                break;
            }

            self.fold_layer_dirt(cur)?;

            let dirty = self.get(cur)?.dirty;
            if !dirty.is_valid() {
                // Nothing to redraw at this level or above.
                break;
            }
            trace!("render {:?} dirty {:?}", cur, dirty);

            // Layered surfaces are recomposited from their children,
            // so the stale region must be blanked first. Leaves hold
            // caller-painted content and are left alone.
            if self.get(cur)?.has_layers() {
                let surface = self.get_mut(cur)?;
                fill_cells(surface, dirty, Cell::default());
            }

            self.blend_layers(cur, dirty)?;

            chain.push(cur);
            match self.get(cur)?.parent {
                Some(pid) => cur = pid,
                None => {
                    let root = self.get(cur)?;
                    sink.region_done(root, root.dirty);
                    break;
                }
            }
        }

        for sid in chain {
            self.get_mut(sid)?.dirty = Rect::EMPTY;
        }
        Ok(())
    }

    /// Paint-ordered child handles: ascending Z, handle order within a
    /// bucket.
    fn layer_order(&self, id: SurfaceId) -> Result<Vec<SurfaceId>> {
        Ok(self
            .get(id)?
            .layers
            .values()
            .flat_map(|set| set.iter().copied())
            .collect())
    }

    /// Render step 1: fold each visible child's dirty region,
    /// translated into this surface's coordinates, into our own.
    fn fold_layer_dirt(&mut self, id: SurfaceId) -> Result<()> {
        for child in self.layer_order(id)? {
            let (child_dirty, child_pos, child_visible) = {
                let c = self.get(child)?;
                (c.dirty, c.pos, c.visible)
            };
            if child_visible && child_dirty.is_valid() {
                let translated = child_dirty.translated(child_pos.x, child_pos.y);
                self.get_mut(id)?.mark_dirty(translated);
            }
        }
        Ok(())
    }

    /// Render step 4: blend visible children intersecting `dirty` back
    /// into this surface, ascending Z, consuming their dirty state.
    fn blend_layers(&mut self, id: SurfaceId, dirty: Rect) -> Result<()> {
        for child in self.layer_order(id)? {
            let (child_bounds_in_parent, child_pos, child_visible, child_bounds) = {
                let c = self.get(child)?;
                (c.bounds_in_parent(), c.pos, c.visible, c.bounds)
            };
            if !child_visible || !child_bounds.is_valid() {
                continue;
            }

            let overlap = Rect::intersect(dirty, child_bounds_in_parent);
            if overlap.is_valid() {
                let pos = overlap.top;
                let src_crop = overlap.translated(-child_pos.x, -child_pos.y);
                let (dst, src) = self.get_pair_mut(id, child)?;
                let d_crop = blend_cells(dst, src, src_crop, pos)?;
                dst.mark_dirty(d_crop);
            }

            // Consumed exactly once per render pass.
            self.get_mut(child)?.dirty = Rect::EMPTY;
        }
        Ok(())
    }
}

/// Allocate `len` blank cells, reporting allocation failure as an
/// error instead of aborting.
fn alloc_cells(len: usize) -> Result<Vec<Cell>> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(len)?;
    cells.resize(len, Cell::default());
    Ok(cells)
}

/// Write `pattern` over `region` of `surface`. `region` must lie
/// inside the surface bounds.
fn fill_cells(surface: &mut Surface, region: Rect, pattern: Cell) {
    if region == surface.bounds {
        surface.cells.fill(pattern);
        return;
    }
    let bounds = surface.bounds;
    for y in region.top.y..region.bottom.y {
        let row_start = bounds.index_for(Point::new(region.top.x, y));
        let row = &mut surface.cells[row_start..row_start + region.width()];
        row.fill(pattern);
    }
}

/// Copy non-transparent cells of `src`'s `s_crop` into `dst` with the
/// crop's top placed at `pos`. Returns the clipped destination region.
fn blend_cells(dst: &mut Surface, src: &Surface, s_crop: Rect, pos: Point) -> Result<Rect> {
    let s_crop = Rect::intersect(src.bounds, s_crop);
    let d_crop = Rect::intersect(dst.bounds, s_crop.at(pos));
    if !s_crop.is_valid() || !d_crop.is_valid() {
        return Err(Error::NoOverlap);
    }

    // Destination clipping may have trimmed the top-left; advance the
    // source origin by the same amount so cells stay aligned.
    let skew_x = d_crop.top.x - pos.x;
    let skew_y = d_crop.top.y - pos.y;

    for y in 0..d_crop.height() as i32 {
        for x in 0..d_crop.width() as i32 {
            let src_p = Point::new(
                s_crop.top.x + skew_x + x,
                s_crop.top.y + skew_y + y,
            );
            let dst_p = Point::new(d_crop.top.x + x, d_crop.top.y + y);
            let cell = src.cells[src.bounds.index_for(src_p)];
            if !cell.is_transparent() {
                dst.cells[dst.bounds.index_for(dst_p)] = cell;
            }
        }
    }

    Ok(d_crop)
}
