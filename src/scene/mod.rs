//! Scene data model and the store that owns it
//!
//! A scene is a canvas plus a set of labelled objects, the constraints that
//! relate them, and optional canvas anchors.

mod grid;
mod label;
pub mod seed;
mod store;
mod types;

pub use grid::Grid;
pub use label::{Label, LabelError};
pub use seed::{create_scene, Placement, SeedSpec};
pub use store::{Effect, NewObject, SceneStore};
pub use types::{
    Anchor, Axis, BoxRecord, Constraint, ConstraintKind, Point, Primitive, RampMeta, Rect, Scene,
    SceneObject, Tilt,
};
