//! Geometric editing operations
//!
//! Every operation takes the scene context explicitly, validates its labels
//! before touching anything, snaps its results to the grid and reports whether
//! it changed the scene. Operations whose requested state already holds return
//! [`Effect::Unchanged`] without modifying the store.

pub mod align;
pub mod distribute;
pub mod edges;
pub mod merge;
pub mod placement;
pub mod rename;
pub mod scale;

pub use align::{align, AlignMode};
pub use distribute::{distribute, DistributeMode};
pub use edges::{align_to_bounds, align_to_ref, BoundsSide, RefEdge};
pub use merge::{merge, move_into_bbox};
pub use placement::{
    mirror, move_group, move_object, place_beside, place_relative, stack, Direction,
    MirrorPivot, Side, StackDirection,
};
pub use rename::batch_rename;
pub use scale::{scale, scale_to_touch, set_height, HeightChange, ScaleAxis};

use crate::error::EngineError;
use crate::scene::{Effect, Grid, Label, SceneObject, SceneStore};

/// Apply `edit` to one object and report whether anything moved
pub(crate) fn update_object(
    store: &mut SceneStore,
    label: &Label,
    edit: impl FnOnce(&mut SceneObject, Grid),
) -> Result<Effect, EngineError> {
    let grid = store.grid();
    let object = store.get_mut(label)?;
    let before = object.clone();
    edit(object, grid);
    let effect = if *object == before {
        Effect::Unchanged
    } else {
        Effect::Changed
    };
    if effect.is_changed() {
        store.touch(label);
    }
    Ok(effect)
}
