//! Constraint solver
//!
//! A deliberately small relaxation scheme: anchors are applied first, then a
//! fixed number of passes walk the constraint list in order and snap each
//! constrained object to the position its constraint asks for. There is no
//! convergence test; conflicting constraints simply settle on whichever is
//! applied last in the final pass.

use tracing::{debug, trace};

use crate::error::EngineError;
use crate::geometry::edges::{set_bottom, set_center, set_left, set_right, set_top};
use crate::scene::{Anchor, Axis, Constraint, ConstraintKind, Effect, Label, SceneStore};

const CONSTRAINT_ARGS: &str = "E_ARGS_CONSTRAINT";
const ANCHOR_ARGS: &str = "E_ARGS_ANCHOR";

// ============================================================================
// Solving
// ============================================================================

/// Re-apply anchors and run `iterations` relaxation passes
pub fn solve(store: &mut SceneStore, iterations: usize) {
    apply_anchors(store);
    let constraints = store.scene().constraints.clone();
    if constraints.is_empty() {
        return;
    }
    for pass in 0..iterations {
        for constraint in &constraints {
            apply_constraint(store, constraint);
        }
        trace!(pass, "constraint pass complete");
    }
    debug!(
        constraints = constraints.len(),
        iterations, "constraints solved"
    );
}

/// Place every anchored object at its fractional canvas position
fn apply_anchors(store: &mut SceneStore) {
    let grid = store.grid();
    let scene = store.scene_mut();
    let (grid_w, grid_h) = (scene.grid_w, scene.grid_h);
    let anchors: Vec<(Label, Anchor)> = scene
        .anchors
        .iter()
        .map(|(label, anchor)| (label.clone(), *anchor))
        .collect();
    for (label, anchor) in anchors {
        let Some(object) = scene.objects.get_mut(&label) else {
            continue;
        };
        if let Some(pct) = anchor.x_pct {
            set_center(object, grid, Axis::X, pct * grid_w);
        }
        if let Some(pct) = anchor.y_pct {
            set_center(object, grid, Axis::Y, pct * grid_h);
        }
    }
}

/// Apply one constraint; constraints naming missing objects are skipped
fn apply_constraint(store: &mut SceneStore, constraint: &Constraint) {
    let grid = store.grid();
    let objects = &mut store.scene_mut().objects;
    let lookup = |label: &Option<Label>| label.as_ref().and_then(|l| objects.get(l)).cloned();
    let (Some(a), target, b) = (
        lookup(&constraint.a),
        lookup(&constraint.target),
        lookup(&constraint.b),
    ) else {
        return;
    };

    match constraint.kind {
        ConstraintKind::EdgeGapX | ConstraintKind::EdgeGapY => {
            let Some(b) = b else { return };
            let gap = grid.snap(constraint.gap.unwrap_or(0.0));
            if let Some(object) = objects.get_mut(&b.label) {
                if constraint.kind == ConstraintKind::EdgeGapX {
                    set_left(object, grid, a.right() + gap);
                } else {
                    set_top(object, grid, a.bottom() + gap);
                }
            }
        }
        kind => {
            let Some(target) = target else { return };
            let Some(object) = objects.get_mut(&target.label) else {
                return;
            };
            match kind {
                ConstraintKind::AlignLeft => set_left(object, grid, a.left()),
                ConstraintKind::AlignRight => set_right(object, grid, a.right()),
                ConstraintKind::AlignCentersX => set_center(object, grid, Axis::X, a.x),
                ConstraintKind::AlignCentersY => set_center(object, grid, Axis::Y, a.y),
                ConstraintKind::AlignTops => set_top(object, grid, a.top()),
                ConstraintKind::AlignBottoms => set_bottom(object, grid, a.bottom()),
                ConstraintKind::BetweenX | ConstraintKind::BetweenY => {
                    let Some(b) = b else { return };
                    let axis = if kind == ConstraintKind::BetweenX {
                        Axis::X
                    } else {
                        Axis::Y
                    };
                    let mid = (a.center_on(axis) + b.center_on(axis)) / 2.0;
                    set_center(object, grid, axis, mid);
                }
                ConstraintKind::EdgeGapX | ConstraintKind::EdgeGapY => {}
            }
        }
    }
}

// ============================================================================
// Constraint management
// ============================================================================

/// Check that a constraint carries the fields its kind needs
fn validate(constraint: &Constraint) -> Result<(), EngineError> {
    let kind = constraint.kind;
    let missing = |field: &str| {
        EngineError::invalid_args(
            CONSTRAINT_ARGS,
            format!("{} constraint requires '{}'", kind.name(), field),
        )
    };
    match kind {
        ConstraintKind::EdgeGapX | ConstraintKind::EdgeGapY => {
            let a = constraint.a.as_ref().ok_or_else(|| missing("a"))?;
            let b = constraint.b.as_ref().ok_or_else(|| missing("b"))?;
            let gap = constraint.gap.ok_or_else(|| missing("gap"))?;
            if a == b {
                return Err(EngineError::invalid_args(
                    CONSTRAINT_ARGS,
                    "edge gap needs two different objects",
                ));
            }
            if !gap.is_finite() {
                return Err(EngineError::invalid_args(CONSTRAINT_ARGS, "gap must be finite"));
            }
        }
        ConstraintKind::BetweenX | ConstraintKind::BetweenY => {
            let target = constraint.target.as_ref().ok_or_else(|| missing("target"))?;
            let a = constraint.a.as_ref().ok_or_else(|| missing("a"))?;
            let b = constraint.b.as_ref().ok_or_else(|| missing("b"))?;
            if target == a || target == b {
                return Err(EngineError::invalid_args(
                    CONSTRAINT_ARGS,
                    "an object cannot sit between itself and another",
                ));
            }
        }
        _ => {
            let target = constraint.target.as_ref().ok_or_else(|| missing("target"))?;
            let a = constraint.a.as_ref().ok_or_else(|| missing("a"))?;
            if target == a {
                return Err(EngineError::invalid_args(
                    CONSTRAINT_ARGS,
                    "an object cannot be aligned to itself",
                ));
            }
        }
    }
    Ok(())
}

/// Append a constraint.
///
/// Exact duplicates are ignored. For last-wins kinds an existing constraint
/// of the same kind on the same target is replaced.
pub fn add_constraint(store: &mut SceneStore, constraint: Constraint) -> Result<Effect, EngineError> {
    validate(&constraint)?;
    store.require(constraint.labels())?;

    let constraints = &mut store.scene_mut().constraints;
    if constraints.contains(&constraint) {
        return Ok(Effect::Unchanged);
    }
    if constraint.kind.is_last_wins() {
        constraints.retain(|c| !(c.kind == constraint.kind && c.target == constraint.target));
    }
    debug!(kind = constraint.kind.name(), "constraint added");
    constraints.push(constraint);
    Ok(Effect::Changed)
}

/// Remove the constraint at `index`
pub fn remove_constraint(store: &mut SceneStore, index: usize) -> Result<Effect, EngineError> {
    let constraints = &mut store.scene_mut().constraints;
    if index >= constraints.len() {
        return Err(EngineError::invalid_args(
            CONSTRAINT_ARGS,
            format!(
                "constraint index {} out of range ({} defined)",
                index,
                constraints.len()
            ),
        ));
    }
    constraints.remove(index);
    Ok(Effect::Changed)
}

pub fn clear_constraints(store: &mut SceneStore) -> Effect {
    let constraints = &mut store.scene_mut().constraints;
    if constraints.is_empty() {
        return Effect::Unchanged;
    }
    constraints.clear();
    Effect::Changed
}

// ============================================================================
// Anchors
// ============================================================================

/// Pin an object to a fractional canvas position; unset axes keep any
/// previous anchor value
pub fn set_anchor(
    store: &mut SceneStore,
    target: &Label,
    x_pct: Option<f64>,
    y_pct: Option<f64>,
) -> Result<Effect, EngineError> {
    if x_pct.is_none() && y_pct.is_none() {
        return Err(EngineError::invalid_args(
            ANCHOR_ARGS,
            "at least one of x_pct or y_pct is required",
        ));
    }
    for pct in [x_pct, y_pct].into_iter().flatten() {
        if !(0.0..=1.0).contains(&pct) {
            return Err(EngineError::invalid_args(
                ANCHOR_ARGS,
                format!("anchor fractions must lie in [0, 1], got {}", pct),
            ));
        }
    }
    store.get(target)?;

    let anchors = &mut store.scene_mut().anchors;
    let previous = anchors.get(target).copied();
    let mut anchor = previous.unwrap_or_default();
    if x_pct.is_some() {
        anchor.x_pct = x_pct;
    }
    if y_pct.is_some() {
        anchor.y_pct = y_pct;
    }
    if previous == Some(anchor) {
        return Ok(Effect::Unchanged);
    }
    anchors.insert(target.clone(), anchor);
    Ok(Effect::Changed)
}

pub fn remove_anchor(store: &mut SceneStore, target: &Label) -> Result<Effect, EngineError> {
    store.get(target)?;
    Ok(match store.scene_mut().anchors.remove(target) {
        Some(_) => Effect::Changed,
        None => Effect::Unchanged,
    })
}
