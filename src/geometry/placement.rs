//! Moving, mirroring, stacking and relative placement

use serde::Deserialize;

use crate::error::EngineError;
use crate::scene::{Axis, Effect, Label, Point, Primitive, SceneObject, SceneStore};

use super::edges::{set_bottom, set_center, set_left, set_right, set_top};
use super::update_object;

/// Translate one object by a snapped offset
pub fn move_object(
    store: &mut SceneStore,
    target: &Label,
    dx: f64,
    dy: f64,
) -> Result<Effect, EngineError> {
    update_object(store, target, |object, grid| {
        object.x = grid.snap(object.x + dx);
        object.y = grid.snap(object.y + dy);
    })
}

/// Center a reflection is taken about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorPivot {
    #[default]
    GridCenter,
    /// Center of the bounding box around all targets
    SelectionCenter,
}

fn pivot_point(
    store: &SceneStore,
    targets: &[Label],
    pivot: MirrorPivot,
) -> Result<Point, EngineError> {
    match pivot {
        MirrorPivot::GridCenter => Ok(store.scene().center()),
        MirrorPivot::SelectionCenter => {
            let mut rects = targets.iter().map(|l| store.get(l).map(|o| o.rect()));
            let first = rects.next().ok_or_else(|| {
                EngineError::invalid_args("E_ARGS_MIRROR", "no targets to take a center from")
            })??;
            let union = rects.try_fold(first, |acc, r| r.map(|r| acc.union(&r)))?;
            Ok(union.center())
        }
    }
}

/// Translate several objects, optionally mirroring them across the pivot's
/// vertical line first
pub fn move_group(
    store: &mut SceneStore,
    targets: &[Label],
    dx: f64,
    dy: f64,
    symmetric: bool,
    pivot: MirrorPivot,
) -> Result<Effect, EngineError> {
    if targets.is_empty() {
        return Err(EngineError::invalid_args("E_ARGS_MOVE", "targets must not be empty"));
    }
    store.require(targets)?;
    let center = pivot_point(store, targets, pivot)?;
    let mut effect = Effect::Unchanged;
    for label in targets {
        let changed = update_object(store, label, |object, grid| {
            let x = if symmetric {
                2.0 * center.x - object.x
            } else {
                object.x
            };
            object.x = grid.snap(x + dx);
            object.y = grid.snap(object.y + dy);
        })?;
        effect = effect.or(changed);
    }
    Ok(effect)
}

/// Reflect objects across the pivot on one axis
pub fn mirror(
    store: &mut SceneStore,
    targets: &[Label],
    axis: Axis,
    pivot: MirrorPivot,
) -> Result<Effect, EngineError> {
    if targets.is_empty() {
        return Err(EngineError::invalid_args("E_ARGS_MIRROR", "targets must not be empty"));
    }
    store.require(targets)?;
    let center = pivot_point(store, targets, pivot)?;
    let line = match axis {
        Axis::X => center.x,
        Axis::Y => center.y,
    };
    let mut effect = Effect::Unchanged;
    for label in targets {
        let changed = update_object(store, label, |object, grid| {
            let mirrored = 2.0 * line - object.center_on(axis);
            set_center(object, grid, axis, mirrored);
        })?;
        effect = effect.or(changed);
    }
    Ok(effect)
}

/// Vertical side for [`stack`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackDirection {
    Above,
    Below,
}

/// Put `target` on top of (or under) `reference` with a vertical gap
pub fn stack(
    store: &mut SceneStore,
    target: &Label,
    reference: &Label,
    direction: StackDirection,
    gap: f64,
    center_xy: bool,
) -> Result<Effect, EngineError> {
    if !(gap.is_finite() && gap >= 0.0) {
        return Err(EngineError::invalid_args(
            "E_ARGS_STACK",
            format!("gap must not be negative, got {}", gap),
        ));
    }
    if target == reference {
        return Err(EngineError::invalid_args(
            "E_ARGS_STACK",
            "cannot stack an object on itself",
        ));
    }
    let r = store.get(reference)?.clone();
    update_object(store, target, |object, grid| {
        let offset = r.height / 2.0 + gap + object.height / 2.0;
        object.z_offset = match direction {
            StackDirection::Above => grid.snap(r.z_offset + offset),
            StackDirection::Below => grid.snap(r.z_offset - offset),
        };
        if center_xy {
            object.x = grid.snap(r.x);
            object.y = grid.snap(r.y);
        }
    })
}

/// Planar direction relative to a reference object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[serde(alias = "west", alias = "left")]
    LeftOf,
    #[serde(alias = "east", alias = "right")]
    RightOf,
    /// Toward smaller y
    #[serde(alias = "north", alias = "up", alias = "front")]
    Above,
    #[serde(alias = "south", alias = "down", alias = "back")]
    Below,
}

/// Move an existing object next to a reference with an edge gap of
/// `distance`, centered on the other axis
pub fn place_relative(
    store: &mut SceneStore,
    target: &Label,
    reference: &Label,
    direction: Direction,
    distance: f64,
) -> Result<Effect, EngineError> {
    if !(distance.is_finite() && distance >= 0.0) {
        return Err(EngineError::invalid_args(
            "E_ARGS_REL",
            format!("distance must not be negative, got {}", distance),
        ));
    }
    if target == reference {
        return Err(EngineError::invalid_args(
            "E_ARGS_REL",
            "an object cannot be placed relative to itself",
        ));
    }
    let r = store.get(reference)?.clone();
    let distance = store.snap(distance);
    update_object(store, target, |object, grid| match direction {
        Direction::LeftOf => {
            set_right(object, grid, r.left() - distance);
            set_center(object, grid, Axis::Y, r.y);
        }
        Direction::RightOf => {
            set_left(object, grid, r.right() + distance);
            set_center(object, grid, Axis::Y, r.y);
        }
        Direction::Above => {
            set_bottom(object, grid, r.top() - distance);
            set_center(object, grid, Axis::X, r.x);
        }
        Direction::Below => {
            set_top(object, grid, r.bottom() + distance);
            set_center(object, grid, Axis::X, r.x);
        }
    })
}

/// Where [`place_beside`] puts the new object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Below,
    /// Stacked on top of the reference
    Above,
}

/// Create `new_label` next to `reference`.
///
/// The new block copies the reference's size unless `size` is given.
/// `Above` stacks it on the reference's top face instead of placing it in
/// the plane.
pub fn place_beside(
    store: &mut SceneStore,
    reference: &Label,
    new_label: &Label,
    side: Side,
    gap: f64,
    size: Option<(f64, f64)>,
) -> Result<Effect, EngineError> {
    if !(gap.is_finite() && gap >= 0.0) {
        return Err(EngineError::invalid_args(
            "E_ARGS_PLACE",
            format!("gap must not be negative, got {}", gap),
        ));
    }
    let r = store.get(reference)?.clone();
    if store.contains(new_label) {
        return Err(EngineError::duplicate(new_label.as_str()));
    }
    let grid = store.grid();
    let gap = grid.snap(gap);
    let (w, h) = size.unwrap_or((r.w, r.h));
    let mut object = SceneObject {
        label: new_label.clone(),
        x: r.x,
        y: r.y,
        w: grid.snap_size(w),
        h: grid.snap_size(h),
        primitive: Primitive::Cube,
        height: r.height,
        z_offset: r.z_offset,
        tilt: None,
        ramp: None,
    };
    match side {
        Side::Left => set_right(&mut object, grid, r.left() - gap),
        Side::Right => set_left(&mut object, grid, r.right() + gap),
        Side::Below => set_top(&mut object, grid, r.bottom() + gap),
        Side::Above => object.z_offset = r.top_z() + gap + object.height / 2.0,
    }
    store.insert(object)?;
    Ok(Effect::Changed)
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
            .add(NewObject::new(label("A")).at(10.0, 10.0).sized(2.0, 2.0).with_height(2.0))
            .unwrap();
        store
            .add(NewObject::new(label("B")).at(4.0, 6.0).sized(1.0, 1.0))
            .unwrap();
        store
    }

    #[test]
    fn test_move_snaps_and_zero_move_is_noop() {
        let mut store = store();
        move_object(&mut store, &label("B"), 1.2, -0.3).unwrap();
        let b = store.get(&label("B")).unwrap();
        assert_eq!((b.x, b.y), (5.0, 5.5));
        let effect = move_object(&mut store, &label("B"), 0.0, 0.0).unwrap();
        assert_eq!(effect, Effect::Unchanged);
    }

    #[test]
    fn test_mirror_about_grid_center() {
        let mut store = store();
        mirror(&mut store, &[label("B")], Axis::X, MirrorPivot::GridCenter).unwrap();
        assert_eq!(store.get(&label("B")).unwrap().x, 36.0);
    }

    #[test]
    fn test_mirror_about_selection_center() {
        let mut store = store();
        let targets = [label("A"), label("B")];
        mirror(&mut store, &targets, Axis::X, MirrorPivot::SelectionCenter).unwrap();
        // selection spans x 3.5..11, center 7.25
        assert_eq!(store.get(&label("A")).unwrap().x, 4.5);
        assert_eq!(store.get(&label("B")).unwrap().x, 10.5);
    }

    #[test]
    fn test_move_group_symmetric() {
        let mut store = store();
        move_group(
            &mut store,
            &[label("B")],
            1.0,
            0.0,
            true,
            MirrorPivot::GridCenter,
        )
        .unwrap();
        assert_eq!(store.get(&label("B")).unwrap().x, 37.0);
    }

    #[test]
    fn test_stack_above_uses_center_heights() {
        let mut store = store();
        stack(
            &mut store,
            &label("B"),
            &label("A"),
            StackDirection::Above,
            0.0,
            true,
        )
        .unwrap();
        let b = store.get(&label("B")).unwrap();
        assert_eq!(b.z_offset, 2.5);
        assert_eq!(b.bottom_z(), 2.0);
        assert_eq!((b.x, b.y), (10.0, 10.0));
    }

    #[test]
    fn test_place_relative_directions() {
        let mut store = store();
        place_relative(&mut store, &label("B"), &label("A"), Direction::RightOf, 0.5).unwrap();
        let b = store.get(&label("B")).unwrap().clone();
        assert_eq!(b.left(), 11.5);
        assert_eq!(b.y, 10.0);

        place_relative(&mut store, &label("B"), &label("A"), Direction::Above, 1.0).unwrap();
        let b = store.get(&label("B")).unwrap();
        assert_eq!(b.bottom(), 8.0);
        assert_eq!(b.x, 10.0);
    }

    #[test]
    fn test_direction_synonyms() {
        let d: Direction = serde_json::from_str("\"east\"").unwrap();
        assert_eq!(d, Direction::RightOf);
        let d: Direction = serde_json::from_str("\"north\"").unwrap();
        assert_eq!(d, Direction::Above);
    }

    #[test]
    fn test_place_beside_copies_size() {
        let mut store = store();
        place_beside(&mut store, &label("A"), &label("C"), Side::Left, 1.0, None).unwrap();
        let c = store.get(&label("C")).unwrap();
        assert_eq!((c.w, c.h), (2.0, 2.0));
        assert_eq!(c.right(), 8.0);

        place_beside(&mut store, &label("A"), &label("D"), Side::Above, 0.0, None).unwrap();
        assert_eq!(store.get(&label("D")).unwrap().bottom_z(), 2.0);

        let err = place_beside(&mut store, &label("A"), &label("C"), Side::Right, 0.0, None)
            .unwrap_err();
        assert_eq!(err.code(), "E_DUPLICATE_LABEL");
    }
}
