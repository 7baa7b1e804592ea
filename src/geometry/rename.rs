//! Batch renaming

use std::collections::HashSet;

use crate::error::EngineError;
use crate::scene::{Effect, Label, SceneStore};

const ARGS: &str = "E_ARGS_BRENAME";

/// Rename several objects at once.
///
/// The pairs are applied as a single transaction, so chains such as
/// `E→D, F→E, C→F` work in any order. An object that already holds a
/// requested name without being renamed itself takes over one of the names
/// the batch frees.
pub fn batch_rename(store: &mut SceneStore, pairs: &[(Label, Label)]) -> Result<Effect, EngineError> {
    if pairs.is_empty() {
        return Err(EngineError::invalid_args(ARGS, "pairs must not be empty"));
    }
    let mut olds = HashSet::new();
    let mut news = HashSet::new();
    for (old, new) in pairs {
        if !olds.insert(old) {
            return Err(EngineError::invalid_args(
                ARGS,
                format!("'{}' is renamed more than once", old),
            ));
        }
        if !news.insert(new) {
            return Err(EngineError::invalid_args(
                ARGS,
                format!("'{}' is the target of more than one rename", new),
            ));
        }
    }
    store.require(pairs.iter().map(|(old, _)| old))?;
    if pairs.iter().all(|(old, new)| old == new) {
        return Ok(Effect::Unchanged);
    }
    store.relabel(pairs)?;
    Ok(Effect::Changed)
}
