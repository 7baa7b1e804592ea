//! Edge and center setters
//!
//! Setting an edge moves the object's center so that edge lands on the given
//! coordinate. Edge results are snapped toward the object's own side of the
//! line, so a snapped edge never crosses the coordinate it was set to.

use serde::Deserialize;

use crate::error::EngineError;
use crate::scene::{Axis, Effect, Grid, Label, SceneObject, SceneStore};

use super::update_object;

pub fn set_left(object: &mut SceneObject, grid: Grid, left: f64) {
    object.x = grid.snap_up(left + object.w / 2.0);
}

pub fn set_right(object: &mut SceneObject, grid: Grid, right: f64) {
    object.x = grid.snap_down(right - object.w / 2.0);
}

pub fn set_top(object: &mut SceneObject, grid: Grid, top: f64) {
    object.y = grid.snap_up(top + object.h / 2.0);
}

pub fn set_bottom(object: &mut SceneObject, grid: Grid, bottom: f64) {
    object.y = grid.snap_down(bottom - object.h / 2.0);
}

/// Set the left (x) or top (y) edge
pub fn set_near_edge(object: &mut SceneObject, grid: Grid, axis: Axis, value: f64) {
    match axis {
        Axis::X => set_left(object, grid, value),
        Axis::Y => set_top(object, grid, value),
    }
}

/// Set the right (x) or bottom (y) edge
pub fn set_far_edge(object: &mut SceneObject, grid: Grid, axis: Axis, value: f64) {
    match axis {
        Axis::X => set_right(object, grid, value),
        Axis::Y => set_bottom(object, grid, value),
    }
}

pub fn set_center(object: &mut SceneObject, grid: Grid, axis: Axis, value: f64) {
    match axis {
        Axis::X => object.x = grid.snap(value),
        Axis::Y => object.y = grid.snap(value),
    }
}

/// Canvas boundary an object can be pushed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsSide {
    Left,
    Right,
    Top,
    Bottom,
    CenterX,
    CenterY,
}

/// Push an object against a canvas side, half a step in from the border
pub fn align_to_bounds(
    store: &mut SceneStore,
    target: &Label,
    side: BoundsSide,
) -> Result<Effect, EngineError> {
    let (grid_w, grid_h) = (store.scene().grid_w, store.scene().grid_h);
    let inset = store.grid().step() / 2.0;
    update_object(store, target, |object, grid| match side {
        BoundsSide::Left => set_left(object, grid, inset),
        BoundsSide::Right => set_right(object, grid, grid_w - inset),
        BoundsSide::Top => set_top(object, grid, inset),
        BoundsSide::Bottom => set_bottom(object, grid, grid_h - inset),
        BoundsSide::CenterX => set_center(object, grid, Axis::X, grid_w / 2.0),
        BoundsSide::CenterY => set_center(object, grid, Axis::Y, grid_h / 2.0),
    })
}

/// Which target edge goes to which reference edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefEdge {
    LeftToRight,
    RightToLeft,
    LeftToLeft,
    RightToRight,
    TopToBottom,
    BottomToTop,
    TopToTop,
    BottomToBottom,
    CenterX,
    CenterY,
}

/// Put one of the target's edges on a reference edge, offset by `gap`.
///
/// A positive gap always points away from the reference's interior for the
/// opposing-edge variants and inward for the same-edge ones.
pub fn align_to_ref(
    store: &mut SceneStore,
    target: &Label,
    reference: &Label,
    edge: RefEdge,
    gap: f64,
) -> Result<Effect, EngineError> {
    let r = store.get(reference)?.clone();
    store.get(target)?;
    let gap = store.snap(gap);
    update_object(store, target, |object, grid| match edge {
        RefEdge::LeftToRight => set_left(object, grid, r.right() + gap),
        RefEdge::RightToLeft => set_right(object, grid, r.left() - gap),
        RefEdge::LeftToLeft => set_left(object, grid, r.left() + gap),
        RefEdge::RightToRight => set_right(object, grid, r.right() - gap),
        RefEdge::TopToBottom => set_top(object, grid, r.bottom() + gap),
        RefEdge::BottomToTop => set_bottom(object, grid, r.top() - gap),
        RefEdge::TopToTop => set_top(object, grid, r.top() + gap),
        RefEdge::BottomToBottom => set_bottom(object, grid, r.bottom() - gap),
        RefEdge::CenterX => set_center(object, grid, Axis::X, r.x),
        RefEdge::CenterY => set_center(object, grid, Axis::Y, r.y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::scene::NewObject;

    fn label(s: &str) -> Label {
        Label::new(s).unwrap()
    }

    fn store() -> SceneStore {
        let mut store = SceneStore::new(EngineConfig::default());
        store
            .add(NewObject::new(label("A")).at(10.0, 10.0).sized(2.0, 2.0))
            .unwrap();
        store
            .add(NewObject::new(label("B")).at(20.0, 20.0).sized(1.5, 1.0))
            .unwrap();
        store
    }

    #[test]
    fn test_edge_snaps_never_cross_the_line() {
        let grid = Grid::new(0.5);
        let mut store = store();
        let b = store.get_mut(&label("B")).unwrap();
        set_right(b, grid, 5.0);
        assert_eq!(b.x, 4.0);
        assert!(b.right() <= 5.0);
        set_left(b, grid, 5.0);
        assert_eq!(b.x, 6.0);
        assert!(b.left() >= 5.0);
    }

    #[test]
    fn test_align_to_bounds() {
        let mut store = store();
        align_to_bounds(&mut store, &label("A"), BoundsSide::Left).unwrap();
        assert_eq!(store.get(&label("A")).unwrap().x, 1.5);
        align_to_bounds(&mut store, &label("A"), BoundsSide::Bottom).unwrap();
        assert_eq!(store.get(&label("A")).unwrap().y, 28.5);
        let effect = align_to_bounds(&mut store, &label("A"), BoundsSide::Bottom).unwrap();
        assert_eq!(effect, Effect::Unchanged);
    }

    #[test]
    fn test_align_to_ref_with_gap() {
        let mut store = store();
        align_to_ref(&mut store, &label("B"), &label("A"), RefEdge::LeftToRight, 1.0).unwrap();
        let b = store.get(&label("B")).unwrap();
        // A's right edge is 11, plus the gap
        assert!(b.left() >= 12.0);
        assert_eq!(b.x, 13.0);
        assert_eq!(b.y, 20.0);
    }

    #[test]
    fn test_align_to_ref_missing_reference() {
        let mut store = store();
        let err = align_to_ref(&mut store, &label("B"), &label("Z"), RefEdge::CenterX, 0.0)
            .unwrap_err();
        assert_eq!(err.code(), "E_NOT_FOUND");
    }
}
