//! Even spacing of three or more objects along an axis

use crate::error::EngineError;
use crate::scene::{Axis, Effect, Label, SceneObject, SceneStore};

use super::edges::set_center;
use super::update_object;

const ARGS: &str = "E_ARGS_DISTRIBUTE";

/// How the edge-to-edge gaps are chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributeMode {
    /// Keep the outer edges fixed and make every gap equal (gaps may be negative)
    EqualGaps,
    /// Start at the leading edge and use this gap (snapped, at least zero)
    FixedSpacing(f64),
}

/// Space targets along `axis` in order of their centers
pub fn distribute(
    store: &mut SceneStore,
    targets: &[Label],
    axis: Axis,
    mode: DistributeMode,
) -> Result<Effect, EngineError> {
    if targets.len() < 3 {
        return Err(EngineError::invalid_args(
            ARGS,
            "distribute needs at least three targets",
        ));
    }
    let grid = store.grid();
    let mut objects = targets
        .iter()
        .map(|label| store.get(label).cloned())
        .collect::<Result<Vec<SceneObject>, _>>()?;
    objects.sort_by(|a, b| a.center_on(axis).total_cmp(&b.center_on(axis)));

    let start = objects
        .iter()
        .map(|o| o.near_edge(axis))
        .fold(f64::INFINITY, f64::min);
    let end = objects
        .iter()
        .map(|o| o.far_edge(axis))
        .fold(f64::NEG_INFINITY, f64::max);
    let total: f64 = objects.iter().map(|o| o.extent(axis)).sum();

    let gap = match mode {
        DistributeMode::EqualGaps => (end - start - total) / (objects.len() - 1) as f64,
        DistributeMode::FixedSpacing(spacing) => grid.snap(spacing.max(0.0)),
    };

    let gaps = current_gaps(&objects, axis);
    let settled = match mode {
        DistributeMode::EqualGaps => {
            let first = round6(gaps[0]);
            gaps.iter().all(|g| round6(*g) == first)
        }
        DistributeMode::FixedSpacing(_) => gaps.iter().all(|g| (g - gap).abs() < 1e-6),
    };
    if settled {
        return Ok(Effect::Unchanged);
    }

    let mut cursor = start;
    let mut effect = Effect::Unchanged;
    for object in &objects {
        let extent = object.extent(axis);
        let center = cursor + extent / 2.0;
        let changed = update_object(store, &object.label, |o, grid| {
            set_center(o, grid, axis, center)
        })?;
        effect = effect.or(changed);
        cursor += extent + gap;
    }
    Ok(effect)
}

/// Edge gaps between consecutive objects (already sorted by center)
fn current_gaps(objects: &[SceneObject], axis: Axis) -> Vec<f64> {
    objects
        .windows(2)
        .map(|pair| pair[1].near_edge(axis) - pair[0].far_edge(axis))
        .collect()
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
