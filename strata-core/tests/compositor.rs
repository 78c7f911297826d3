//! Tree-level compositing scenarios.

use strata_core::cell::color;
use strata_core::sink::RecordingSink;
use strata_core::{Cell, CellAttrs, NullSink, Point, Rect, Stage};

fn ch(stage: &Stage, id: strata_core::SurfaceId, x: i32, y: i32) -> char {
    stage
        .get(id)
        .unwrap()
        .cell_at(Point::new(x, y))
        .unwrap()
        .ch
}

/// The documentation example: a window with a background and two
/// children, attached to a root screen surface.
#[test]
fn window_with_background_and_children() {
    let mut stage = Stage::new();
    let screen = stage.create(40, 20).unwrap();
    let window = stage.create(10, 10).unwrap();
    let window_bg = stage.create(10, 10).unwrap();
    let child1 = stage.create(2, 2).unwrap();
    let child2 = stage.create(2, 2).unwrap();

    stage
        .fill(window_bg, Cell::new('.').with_fg(color::GREEN), None)
        .unwrap();
    stage
        .fill(child1, Cell::new('a').with_fg(color::YELLOW), None)
        .unwrap();
    stage
        .fill(child2, Cell::new('b').with_fg(color::BLUE), None)
        .unwrap();

    stage.add_layer(window, window_bg, 0).unwrap();
    stage
        .add_layer_at(window, child1, Point::new(1, 1), 1)
        .unwrap();
    stage
        .add_layer_at(window, child2, Point::new(2, 2), 2)
        .unwrap();
    stage
        .add_layer_at(screen, window, Point::new(10, 5), 0)
        .unwrap();

    stage.render(window, &mut NullSink).unwrap();

    // Background dots where no child covers.
    assert_eq!(ch(&stage, screen, 10, 5), '.');
    // child1 at window-local (1,1), screen (11,6).
    assert_eq!(ch(&stage, screen, 11, 6), 'a');
    // child2 overlaps child1 at window-local (2,2) and wins on Z.
    assert_eq!(ch(&stage, screen, 12, 7), 'b');
    assert_eq!(ch(&stage, screen, 13, 8), 'b');
    // Outside the window the screen stays blank.
    assert_eq!(ch(&stage, screen, 25, 5), ' ');
}

/// A transparent overlay lets the layer below show through while its
/// opaque cells paint on top.
#[test]
fn transparent_overlay_composites() {
    let mut stage = Stage::new();
    let root = stage.create(8, 4).unwrap();
    let base = stage.create(8, 4).unwrap();
    let overlay = stage.create(8, 4).unwrap();

    stage.fill(base, Cell::new('-'), None).unwrap();
    stage
        .fill(
            overlay,
            Cell::new(' ').with_attrs(CellAttrs::TRANSPARENT),
            None,
        )
        .unwrap();
    // One opaque glyph in the middle of the overlay.
    stage
        .fill(overlay, Cell::new('X'), Some(Rect::new(3, 1, 4, 2)))
        .unwrap();

    stage.add_layer(root, base, 0).unwrap();
    stage.add_layer(root, overlay, 1).unwrap();
    stage.render(root, &mut NullSink).unwrap();

    assert_eq!(ch(&stage, root, 0, 0), '-');
    assert_eq!(ch(&stage, root, 3, 1), 'X');
    assert_eq!(ch(&stage, root, 4, 1), '-');
}

/// Repeated small mutations produce minimal dirty regions at the root,
/// not full-screen redraws.
#[test]
fn incremental_updates_stay_minimal() {
    let mut stage = Stage::new();
    let root = stage.create(80, 24).unwrap();
    let status = stage.create(80, 1).unwrap();
    stage
        .add_layer_at(root, status, Point::new(0, 23), 0)
        .unwrap();

    // Initial attach dirtied the root; flush it.
    stage.render(root, &mut NullSink).unwrap();

    let mut sink = RecordingSink::default();
    stage
        .fill(status, Cell::new('s'), Some(Rect::new(0, 0, 12, 1)))
        .unwrap();
    stage.render(status, &mut sink).unwrap();

    assert_eq!(sink.regions, vec![Rect::new(0, 23, 12, 24)]);
}

/// Sibling surfaces under different parents update independently.
#[test]
fn unrelated_subtree_is_untouched() {
    let mut stage = Stage::new();
    let root = stage.create(20, 20).unwrap();
    let left = stage.create(5, 5).unwrap();
    let right = stage.create(5, 5).unwrap();
    stage.add_layer_at(root, left, Point::new(0, 0), 0).unwrap();
    stage
        .add_layer_at(root, right, Point::new(10, 10), 0)
        .unwrap();
    stage.fill(right, Cell::new('r'), None).unwrap();
    stage.render(root, &mut NullSink).unwrap();

    stage.fill(left, Cell::new('l'), None).unwrap();
    let mut sink = RecordingSink::default();
    stage.render(left, &mut sink).unwrap();

    // Only the left child's region reached the sink; the right child
    // kept its content.
    assert_eq!(sink.regions, vec![Rect::new(0, 0, 5, 5)]);
    assert_eq!(ch(&stage, root, 10, 10), 'r');
}

/// Detached surfaces can be mutated and rendered without a sink ever
/// firing for an ancestor.
#[test]
fn detached_surface_renders_locally() {
    let mut stage = Stage::new();
    let lone = stage.create(4, 4).unwrap();
    stage.fill(lone, Cell::new('z'), None).unwrap();

    let mut sink = RecordingSink::default();
    stage.render(lone, &mut sink).unwrap();

    // The lone surface is its own root.
    assert_eq!(sink.regions, vec![Rect::new(0, 0, 4, 4)]);
    assert!(!stage.get(lone).unwrap().dirty().is_valid());
}

/// Moving a detached surface has no invalidation side effects.
#[test]
fn detached_move_is_silent() {
    let mut stage = Stage::new();
    let lone = stage.create(4, 4).unwrap();
    stage.render(lone, &mut NullSink).unwrap();

    stage.move_to(lone, Point::new(7, 7)).unwrap();
    assert_eq!(stage.get(lone).unwrap().pos(), Point::new(7, 7));
    assert!(!stage.get(lone).unwrap().dirty().is_valid());
}
