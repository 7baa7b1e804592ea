//! Scaling, scale-to-touch and height changes

use serde::Deserialize;
use tracing::debug;

use crate::error::EngineError;
use crate::scene::{Axis, Effect, Label, SceneStore};

use super::update_object;

/// Axes a scale factor applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleAxis {
    X,
    Y,
    #[default]
    Both,
}

impl ScaleAxis {
    /// Planar axis used when a single axis is needed; `Both` means x
    pub fn primary(self) -> Axis {
        match self {
            ScaleAxis::Y => Axis::Y,
            ScaleAxis::X | ScaleAxis::Both => Axis::X,
        }
    }
}

/// Multiply an object's planar extent by `factor`
pub fn scale(
    store: &mut SceneStore,
    target: &Label,
    axis: ScaleAxis,
    factor: f64,
) -> Result<Effect, EngineError> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(EngineError::invalid_args(
            "E_ARGS_SCALE",
            format!("scale factor must be positive, got {}", factor),
        ));
    }
    store.get(target)?;
    if (factor - 1.0).abs() < 1e-9 {
        return Ok(Effect::Unchanged);
    }
    update_object(store, target, |object, grid| {
        if matches!(axis, ScaleAxis::X | ScaleAxis::Both) {
            object.w = grid.snap_size(object.w * factor);
        }
        if matches!(axis, ScaleAxis::Y | ScaleAxis::Both) {
            object.h = grid.snap_size(object.h * factor);
        }
    })
}

/// Resize `target` along `axis` so it touches the references `a` and `b`.
///
/// A reference whose center lies strictly before the target's center bounds
/// the near side with its far edge; one strictly after bounds the far side
/// with its near edge. When several references bound a side, the one closest
/// to the target wins. With both sides bounded the target spans exactly
/// between them and the result is deliberately left unsnapped. With one side
/// bounded the target grows symmetrically about its center and is snapped.
pub fn scale_to_touch(
    store: &mut SceneStore,
    target: &Label,
    a: &Label,
    b: &Label,
    axis: Axis,
) -> Result<Effect, EngineError> {
    let object = store.get(target)?.clone();
    let refs = [store.get(a)?.clone(), store.get(b)?.clone()];
    let min_size = store.config().touch_min_size;
    let center = object.center_on(axis);

    let near = refs
        .iter()
        .filter(|r| r.center_on(axis) < center)
        .map(|r| r.far_edge(axis))
        .reduce(f64::max);
    let far = refs
        .iter()
        .filter(|r| r.center_on(axis) > center)
        .map(|r| r.near_edge(axis))
        .reduce(f64::min);

    let grid = store.grid();
    let (extent, new_center) = match (near, far) {
        (Some(lo), Some(hi)) => {
            let extent = (hi - lo).max(min_size);
            (extent, lo + extent / 2.0)
        }
        (Some(lo), None) => (grid.snap_size((2.0 * (center - lo)).max(min_size)), center),
        (None, Some(hi)) => (grid.snap_size((2.0 * (hi - center)).max(min_size)), center),
        (None, None) => {
            return Err(EngineError::under_specified(
                target.as_str(),
                format!(
                    "neither {} nor {} lies to either side along {:?}",
                    a, b, axis
                ),
            ))
        }
    };
    debug!(target = %target, extent, center = new_center, "scale to touch");

    update_object(store, target, |object, _| match axis {
        Axis::X => {
            object.w = extent;
            object.x = new_center;
        }
        Axis::Y => {
            object.h = extent;
            object.y = new_center;
        }
    })
}

/// New extrusion height for [`set_height`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeightChange {
    Absolute(f64),
    Factor(f64),
}

/// Change an object's extrusion while its bottom face stays put
pub fn set_height(
    store: &mut SceneStore,
    target: &Label,
    change: HeightChange,
) -> Result<Effect, EngineError> {
    let value = match change {
        HeightChange::Absolute(v) | HeightChange::Factor(v) => v,
    };
    if !(value.is_finite() && value > 0.0) {
        return Err(EngineError::invalid_args(
            "E_ARGS_HEIGHT",
            format!("height and factor must be positive, got {}", value),
        ));
    }
    update_object(store, target, |object, grid| {
        let bottom = object.bottom_z();
        let height = match change {
            HeightChange::Absolute(h) => h,
            HeightChange::Factor(f) => object.height * f,
        };
        object.height = grid.snap_size(height);
        object.z_offset = bottom + object.height / 2.0;
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
        // A spans x 0..2, B spans 6..8, C sits between them
        store.add(NewObject::new(label("A")).at(1.0, 5.0).sized(2.0, 2.0)).unwrap();
        store.add(NewObject::new(label("B")).at(7.0, 5.0).sized(2.0, 2.0)).unwrap();
        store.add(NewObject::new(label("C")).at(4.0, 5.0).sized(1.0, 1.0)).unwrap();
        store
    }

    #[test]
    fn test_scale_snaps_and_clamps() {
        let mut store = store();
        scale(&mut store, &label("A"), ScaleAxis::X, 1.3).unwrap();
        assert_eq!(store.get(&label("A")).unwrap().w, 2.5);
        assert_eq!(store.get(&label("A")).unwrap().h, 2.0);
        scale(&mut store, &label("C"), ScaleAxis::Both, 0.01).unwrap();
        assert_eq!(store.get(&label("C")).unwrap().w, 0.5);
    }

    #[test]
    fn test_scale_rejects_bad_factor() {
        let mut store = store();
        let err = scale(&mut store, &label("A"), ScaleAxis::X, 0.0).unwrap_err();
        assert_eq!(err.code(), "E_ARGS_SCALE");
        let effect = scale(&mut store, &label("A"), ScaleAxis::X, 1.0).unwrap();
        assert_eq!(effect, Effect::Unchanged);
    }

    #[test]
    fn test_touch_both_sides_is_exact() {
        let mut store = store();
        scale_to_touch(&mut store, &label("C"), &label("A"), &label("B"), Axis::X).unwrap();
        let c = store.get(&label("C")).unwrap();
        assert_eq!(c.w, 4.0);
        assert_eq!(c.x, 4.0);
        assert_eq!(c.left(), 2.0);
        assert_eq!(c.right(), 6.0);
    }

    #[test]
    fn test_touch_one_side_expands_symmetrically() {
        let mut store = store();
        // both references now sit left of C; A's far edge (2.0) is the nearest
        store.get_mut(&label("B")).unwrap().x = 0.5;
        scale_to_touch(&mut store, &label("C"), &label("A"), &label("B"), Axis::X).unwrap();
        let c = store.get(&label("C")).unwrap();
        assert_eq!(c.x, 4.0);
        assert_eq!(c.w, 4.0);
        assert_eq!(c.left(), 2.0);
    }

    #[test]
    fn test_touch_under_specified() {
        let mut store = store();
        store.get_mut(&label("A")).unwrap().x = 4.0;
        store.get_mut(&label("B")).unwrap().x = 4.0;
        let err = scale_to_touch(&mut store, &label("C"), &label("A"), &label("B"), Axis::X)
            .unwrap_err();
        assert_eq!(err.code(), "E_UNDER_SPECIFIED");
    }

    #[test]
    fn test_set_height_keeps_bottom() {
        let mut store = store();
        set_height(&mut store, &label("A"), HeightChange::Absolute(3.0)).unwrap();
        let a = store.get(&label("A")).unwrap();
        assert_eq!(a.height, 3.0);
        assert_eq!(a.bottom_z(), 0.0);
        set_height(&mut store, &label("A"), HeightChange::Factor(2.0)).unwrap();
        assert_eq!(store.get(&label("A")).unwrap().height, 6.0);
    }
}
