//! Merging objects and re-filling removed footprints

use crate::error::EngineError;
use crate::scene::{BoxRecord, Effect, Label, SceneStore};

use super::update_object;

/// Grow `keep` to cover both footprints and delete `remove`
pub fn merge(store: &mut SceneStore, keep: &Label, remove: &Label) -> Result<Effect, EngineError> {
    if keep == remove {
        return Err(EngineError::invalid_args(
            "E_ARGS_MERGE",
            "cannot merge an object into itself",
        ));
    }
    let kept = store.get(keep)?.clone();
    let removed = store.get(remove)?.clone();
    let union = kept.rect().union(&removed.rect());

    update_object(store, keep, |object, grid| {
        let center = union.center();
        object.w = grid.snap_size(union.width());
        object.h = grid.snap_size(union.height());
        object.x = grid.snap(center.x);
        object.y = grid.snap(center.y);
        let bottom = object.bottom_z();
        object.height = object.height.max(removed.height);
        object.z_offset = bottom + object.height / 2.0;
    })?;
    store.scene_mut().objects.remove(remove);
    store.touch(keep);
    Ok(Effect::Changed)
}

/// Fit an object to an explicit box or, failing that, the last removed one
pub fn move_into_bbox(
    store: &mut SceneStore,
    target: &Label,
    bbox: Option<BoxRecord>,
) -> Result<Effect, EngineError> {
    store.get(target)?;
    let bbox = bbox.or(store.last_removed()).ok_or_else(|| {
        EngineError::invalid_args(
            "E_ARGS_MIB",
            "no bbox given and nothing has been removed yet",
        )
    })?;
    update_object(store, target, |object, grid| {
        object.x = grid.snap(bbox.x);
        object.y = grid.snap(bbox.y);
        object.w = grid.snap_size(bbox.w);
        object.h = grid.snap_size(bbox.h);
        if let Some(height) = bbox.height {
            let bottom = object.bottom_z();
            object.height = grid.snap_size(height);
            object.z_offset = bottom + object.height / 2.0;
        }
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
            .add(NewObject::new(label("A")).at(2.0, 2.0).sized(2.0, 2.0).with_height(1.0))
            .unwrap();
        store
            .add(NewObject::new(label("B")).at(6.0, 3.0).sized(2.0, 2.0).with_height(3.0))
            .unwrap();
        store
    }

    #[test]
    fn test_merge_takes_union_and_max_height() {
        let mut store = store();
        merge(&mut store, &label("A"), &label("B")).unwrap();
        let a = store.get(&label("A")).unwrap();
        assert_eq!((a.w, a.h), (6.0, 3.0));
        assert_eq!((a.x, a.y), (4.0, 2.5));
        assert_eq!(a.height, 3.0);
        assert!(!store.contains(&label("B")));
    }

    #[test]
    fn test_merge_into_self_rejected() {
        let mut store = store();
        let err = merge(&mut store, &label("A"), &label("A")).unwrap_err();
        assert_eq!(err.code(), "E_ARGS_MERGE");
    }

    #[test]
    fn test_move_into_last_removed_bbox() {
        let mut store = store();
        store.remove(&label("B")).unwrap();
        move_into_bbox(&mut store, &label("A"), None).unwrap();
        let a = store.get(&label("A")).unwrap();
        assert_eq!((a.x, a.y, a.w, a.h), (6.0, 3.0, 2.0, 2.0));
        assert_eq!(a.height, 3.0);
    }

    #[test]
    fn test_move_into_bbox_without_source() {
        let mut store = store();
        let err = move_into_bbox(&mut store, &label("A"), None).unwrap_err();
        assert_eq!(err.code(), "E_ARGS_MIB");
    }
}
