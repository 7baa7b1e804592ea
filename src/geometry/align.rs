//! Multi-object alignment

use serde::Deserialize;

use crate::error::EngineError;
use crate::scene::{Axis, Effect, Label, SceneObject, SceneStore};

use super::edges::{set_center, set_far_edge, set_near_edge};
use super::update_object;

const ARGS: &str = "E_ARGS_ALIGN";

/// Which feature of each target is lined up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    #[serde(alias = "center")]
    Centers,
    #[serde(alias = "left")]
    Lefts,
    #[serde(alias = "right")]
    Rights,
    #[serde(alias = "top")]
    Tops,
    #[serde(alias = "bottom")]
    Bottoms,
}

impl AlignMode {
    fn fits(self, axis: Axis) -> bool {
        match self {
            AlignMode::Centers => true,
            AlignMode::Lefts | AlignMode::Rights => axis == Axis::X,
            AlignMode::Tops | AlignMode::Bottoms => axis == Axis::Y,
        }
    }

    fn feature(self, object: &SceneObject, axis: Axis) -> f64 {
        match self {
            AlignMode::Centers => object.center_on(axis),
            AlignMode::Lefts | AlignMode::Tops => object.near_edge(axis),
            AlignMode::Rights | AlignMode::Bottoms => object.far_edge(axis),
        }
    }
}

/// Align targets on one axis.
///
/// Centers go to the snapped mean center; edges go to the outermost edge of
/// the selection. A single target aligned by centers is centered on the
/// canvas instead.
pub fn align(
    store: &mut SceneStore,
    targets: &[Label],
    axis: Axis,
    mode: AlignMode,
) -> Result<Effect, EngineError> {
    if !mode.fits(axis) {
        return Err(EngineError::invalid_args(
            ARGS,
            format!("mode {:?} does not apply to axis {:?}", mode, axis),
        ));
    }
    store.require(targets)?;

    if let [only] = targets {
        if mode != AlignMode::Centers {
            return Err(EngineError::invalid_args(
                ARGS,
                "aligning edges needs at least two targets",
            ));
        }
        let middle = store.scene().span(axis) / 2.0;
        return update_object(store, only, |object, grid| {
            set_center(object, grid, axis, middle)
        });
    }
    if targets.len() < 2 {
        return Err(EngineError::invalid_args(ARGS, "align needs at least two targets"));
    }

    let grid = store.grid();
    let features = targets
        .iter()
        .map(|label| store.get(label).map(|o| mode.feature(o, axis)))
        .collect::<Result<Vec<_>, _>>()?;
    let reference = match mode {
        AlignMode::Centers => grid.snap(features.iter().sum::<f64>() / features.len() as f64),
        AlignMode::Lefts | AlignMode::Tops => features.iter().copied().fold(f64::INFINITY, f64::min),
        AlignMode::Rights | AlignMode::Bottoms => {
            features.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        }
    };
    if features.iter().all(|&f| grid.approx_eq(f, reference)) {
        return Ok(Effect::Unchanged);
    }

    let mut effect = Effect::Unchanged;
    for label in targets {
        let changed = update_object(store, label, |object, grid| match mode {
            AlignMode::Centers => set_center(object, grid, axis, reference),
            AlignMode::Lefts | AlignMode::Tops => set_near_edge(object, grid, axis, reference),
            AlignMode::Rights | AlignMode::Bottoms => set_far_edge(object, grid, axis, reference),
        })?;
        effect = effect.or(changed);
    }
    Ok(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::scene::NewObject;

    fn label(s: &str) -> Label {
        Label::new(s).unwrap()
    }

    fn labels(names: &[&str]) -> Vec<Label> {
        names.iter().map(|n| label(n)).collect()
    }

    fn store() -> SceneStore {
        let mut store = SceneStore::new(EngineConfig::default());
        store.add(NewObject::new(label("A")).at(2.0, 3.0).sized(2.0, 2.0)).unwrap();
        store.add(NewObject::new(label("B")).at(6.0, 5.0).sized(1.0, 1.0)).unwrap();
        store.add(NewObject::new(label("C")).at(9.0, 8.0).sized(3.0, 1.0)).unwrap();
        store
    }

    #[test]
    fn test_align_centers_uses_snapped_mean() {
        let mut store = store();
        align(&mut store, &labels(&["A", "B", "C"]), Axis::Y, AlignMode::Centers).unwrap();
        for name in ["A", "B", "C"] {
            assert_eq!(store.get(&label(name)).unwrap().y, 5.5);
        }
    }

    #[test]
    fn test_align_lefts_uses_min_edge() {
        let mut store = store();
        align(&mut store, &labels(&["A", "B", "C"]), Axis::X, AlignMode::Lefts).unwrap();
        for name in ["A", "B", "C"] {
            assert_eq!(store.get(&label(name)).unwrap().left(), 1.0);
        }
    }

    #[test]
    fn test_align_is_idempotent() {
        let mut store = store();
        let targets = labels(&["A", "B", "C"]);
        align(&mut store, &targets, Axis::X, AlignMode::Rights).unwrap();
        let once = store.scene().clone();
        let effect = align(&mut store, &targets, Axis::X, AlignMode::Rights).unwrap();
        assert_eq!(effect, Effect::Unchanged);
        assert_eq!(store.scene(), &once);
    }

    #[test]
    fn test_single_target_centers_on_canvas() {
        let mut store = store();
        align(&mut store, &labels(&["B"]), Axis::X, AlignMode::Centers).unwrap();
        assert_eq!(store.get(&label("B")).unwrap().x, 20.0);
    }

    #[test]
    fn test_mode_must_match_axis() {
        let mut store = store();
        let err = align(&mut store, &labels(&["A", "B"]), Axis::X, AlignMode::Tops).unwrap_err();
        assert_eq!(err.code(), "E_ARGS_ALIGN");
    }

    #[test]
    fn test_missing_target() {
        let mut store = store();
        let err = align(&mut store, &labels(&["A", "Q"]), Axis::X, AlignMode::Lefts).unwrap_err();
        assert_eq!(err.code(), "E_NOT_FOUND");
    }
}
