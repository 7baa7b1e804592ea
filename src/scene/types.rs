//! Core types for the scene model
//!
//! Coordinates are top-down and y grows downward: an object's "top" edge is
//! `y - h/2` and "above" means toward smaller y. Vertical placement uses the
//! object's center height `z_offset`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::label::Label;
use crate::error::EngineError;

/// A 2D point in grid units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Planar axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Axis-aligned planar rectangle given by its edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn from_center(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            left: x - w / 2.0,
            top: y - h / 2.0,
            right: x + w / 2.0,
            bottom: y + h / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Length of the shared interval along `axis` (negative when apart)
    pub fn overlap(&self, other: &Rect, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.right.min(other.right) - self.left.max(other.left),
            Axis::Y => self.bottom.min(other.bottom) - self.top.max(other.top),
        }
    }
}

/// Shape of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    #[default]
    #[serde(alias = "box", alias = "square", alias = "rect")]
    Cube,
    Plane,
    Ramp,
}

/// Orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tilt {
    /// Rotation about the planar x axis (ramp incline)
    pub pitch: f64,
    pub roll: f64,
    /// Heading in the plane
    pub yaw: f64,
}

/// How a ramp was synthesized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampMeta {
    pub start_height: f64,
    pub end_height: f64,
    pub start: Point,
    pub end: Point,
}

/// A block, plane or ramp in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub label: Label,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub primitive: Primitive,
    pub height: f64,
    pub z_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<Tilt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp: Option<RampMeta>,
}

impl SceneObject {
    pub fn left(&self) -> f64 {
        self.x - self.w / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.h / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Height of the upper face
    pub fn top_z(&self) -> f64 {
        self.z_offset + self.height / 2.0
    }

    /// Height of the lower face
    pub fn bottom_z(&self) -> f64 {
        self.z_offset - self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center_on(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.w,
            Axis::Y => self.h,
        }
    }

    /// Leading (left or top) edge along `axis`
    pub fn near_edge(&self, axis: Axis) -> f64 {
        self.center_on(axis) - self.extent(axis) / 2.0
    }

    /// Trailing (right or bottom) edge along `axis`
    pub fn far_edge(&self, axis: Axis) -> f64 {
        self.center_on(axis) + self.extent(axis) / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.x, self.y, self.w, self.h)
    }

    pub fn bbox(&self) -> BoxRecord {
        BoxRecord {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
            height: Some(self.height),
        }
    }
}

/// A planar box with optional height, used for remove/move-into-bbox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Relationship maintained by the constraint solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    AlignLeft,
    AlignRight,
    #[serde(alias = "align_center_x")]
    AlignCentersX,
    #[serde(alias = "align_center_y")]
    AlignCentersY,
    #[serde(alias = "align_top")]
    AlignTops,
    #[serde(alias = "align_bottom")]
    AlignBottoms,
    BetweenX,
    BetweenY,
    EdgeGapX,
    EdgeGapY,
}

impl ConstraintKind {
    /// Kinds where a newer constraint on the same target replaces the older one
    pub fn is_last_wins(self) -> bool {
        matches!(
            self,
            Self::BetweenX | Self::BetweenY | Self::AlignTops | Self::AlignBottoms
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::AlignLeft => "align_left",
            Self::AlignRight => "align_right",
            Self::AlignCentersX => "align_centers_x",
            Self::AlignCentersY => "align_centers_y",
            Self::AlignTops => "align_tops",
            Self::AlignBottoms => "align_bottoms",
            Self::BetweenX => "between_x",
            Self::BetweenY => "between_y",
            Self::EdgeGapX => "edge_gap_x",
            Self::EdgeGapY => "edge_gap_y",
        }
    }
}

/// A declarative relationship between objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub kind: ConstraintKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            target: None,
            a: None,
            b: None,
            gap: None,
        }
    }

    pub fn with_target(mut self, target: Label) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_a(mut self, a: Label) -> Self {
        self.a = Some(a);
        self
    }

    pub fn with_b(mut self, b: Label) -> Self {
        self.b = Some(b);
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = Some(gap);
        self
    }

    /// Every label this constraint refers to
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.target.iter().chain(self.a.iter()).chain(self.b.iter())
    }
}

/// Fractional canvas position pinned to an object
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_pct: Option<f64>,
}

/// The complete editable state: canvas, objects, constraints and anchors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub grid_w: f64,
    pub grid_h: f64,
    pub grid_step: f64,
    #[serde(default)]
    pub objects: BTreeMap<Label, SceneObject>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub anchors: BTreeMap<Label, Anchor>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(grid_w: f64, grid_h: f64, grid_step: f64) -> Self {
        Self {
            grid_w,
            grid_h,
            grid_step,
            objects: BTreeMap::new(),
            constraints: Vec::new(),
            anchors: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Canvas center point
    pub fn center(&self) -> Point {
        Point::new(self.grid_w / 2.0, self.grid_h / 2.0)
    }

    /// Canvas extent along `axis`
    pub fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.grid_w,
            Axis::Y => self.grid_h,
        }
    }

    pub fn get(&self, label: &Label) -> Option<&SceneObject> {
        self.objects.get(label)
    }

    /// Check that a loaded snapshot has a usable grid and finite geometry
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: String| Err(EngineError::InvalidScene { reason });
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return invalid(format!("grid_step must be positive, got {}", self.grid_step));
        }
        for (name, value) in [("grid_w", self.grid_w), ("grid_h", self.grid_h)] {
            if !(value.is_finite() && value >= self.grid_step) {
                return invalid(format!("{} must be at least one grid step, got {}", name, value));
            }
        }
        for object in self.objects.values() {
            let values = [object.x, object.y, object.w, object.h, object.height, object.z_offset];
            if values.iter().any(|v| !v.is_finite()) {
                return invalid(format!("object '{}' has a non-finite value", object.label));
            }
            if object.w <= 0.0 || object.h <= 0.0 || object.height <= 0.0 {
                return invalid(format!("object '{}' has a non-positive size", object.label));
            }
        }
        Ok(())
    }

    /// Serialize to the pretty-printed snapshot format
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a snapshot produced by [`Scene::to_json`]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
