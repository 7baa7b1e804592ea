//! Command batches and their typed, validated form
//!
//! A batch arrives as JSON: `{"commands": [{"tool": "...", "arguments": {...}}]}`.
//! Each raw command is turned into a [`Command`] before anything touches the
//! scene. Label normalization and per-tool argument checks happen here; any
//! failure is reported with the tool's `E_ARGS_*` code.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::geometry::{
    AlignMode, BoundsSide, Direction, DistributeMode, HeightChange, MirrorPivot, RefEdge,
    ScaleAxis, Side, StackDirection,
};
use crate::ramp::{RampRequest, RampSide};
use crate::scene::{Axis, BoxRecord, Constraint, Label, NewObject, Placement, Primitive};

/// An ordered list of tool invocations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandBatch {
    pub commands: Vec<RawCommand>,
}

impl CommandBatch {
    pub fn new(commands: Vec<RawCommand>) -> Self {
        Self { commands }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One tool invocation as received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCommand {
    pub tool: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl RawCommand {
    /// Build a command from a tool name and a JSON object of arguments.
    /// Non-object argument values are treated as no arguments.
    pub fn new(tool: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            tool: tool.into(),
            arguments,
        }
    }
}

// ============================================================================
// Argument structs
// ============================================================================

/// Tool arguments that can be decoded from a raw command
trait Arguments: DeserializeOwned {
    /// Error code used for malformed arguments
    const CODE: &'static str;

    fn validate(&self) -> Result<(), EngineError> {
        Ok(())
    }
}

fn positive(code: &'static str, name: &str, value: Option<f64>) -> Result<(), EngineError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(EngineError::invalid_args(
            code,
            format!("{} must be positive, got {}", name, v),
        )),
        _ => Ok(()),
    }
}

fn finite(code: &'static str, name: &str, value: Option<f64>) -> Result<(), EngineError> {
    match value {
        Some(v) if !v.is_finite() => Err(EngineError::invalid_args(
            code,
            format!("{} must be a finite number", name),
        )),
        _ => Ok(()),
    }
}

/// Most objects a single `create_scene` may seed
pub const MAX_SEED_OBJECTS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateSceneArgs {
    #[serde(default)]
    pub labels: Vec<Label>,
    pub count: Option<usize>,
    #[serde(default)]
    pub primitive: Primitive,
    #[serde(default)]
    pub placement: Placement,
    pub size: Option<f64>,
    pub margin: Option<f64>,
    #[serde(default)]
    pub seed: u64,
    pub grid_w: Option<f64>,
    pub grid_h: Option<f64>,
    /// Allow replacing a populated scene
    #[serde(default)]
    pub reset: bool,
}

impl CreateSceneArgs {
    /// Explicit labels, or `count` generated ones
    pub fn resolved_labels(&self) -> Vec<Label> {
        if self.labels.is_empty() {
            (0..self.count.unwrap_or(0)).map(Label::sequence).collect()
        } else {
            self.labels.clone()
        }
    }
}

impl Arguments for CreateSceneArgs {
    const CODE: &'static str = "E_ARGS_CREATE";

    fn validate(&self) -> Result<(), EngineError> {
        if self.labels.is_empty() && self.count.unwrap_or(0) == 0 {
            return Err(EngineError::invalid_args(Self::CODE, "labels or count required"));
        }
        let requested = self.labels.len().max(self.count.unwrap_or(0));
        if requested > MAX_SEED_OBJECTS {
            return Err(EngineError::invalid_args(
                Self::CODE,
                format!("at most {} objects per scene, got {}", MAX_SEED_OBJECTS, requested),
            ));
        }
        for (i, label) in self.labels.iter().enumerate() {
            if self.labels[..i].contains(label) {
                return Err(EngineError::invalid_args(
                    Self::CODE,
                    format!("label '{}' listed twice", label),
                ));
            }
        }
        if self.primitive == Primitive::Ramp {
            return Err(EngineError::invalid_args(
                Self::CODE,
                "ramps are created with add_ramp",
            ));
        }
        positive(Self::CODE, "size", self.size)?;
        finite(Self::CODE, "margin", self.margin)?;
        positive(Self::CODE, "grid_w", self.grid_w)?;
        positive(Self::CODE, "grid_h", self.grid_h)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResetSceneArgs {
    pub grid_w: Option<f64>,
    pub grid_h: Option<f64>,
}

impl Arguments for ResetSceneArgs {
    const CODE: &'static str = "E_ARGS_RESET";

    fn validate(&self) -> Result<(), EngineError> {
        positive(Self::CODE, "grid_w", self.grid_w)?;
        positive(Self::CODE, "grid_h", self.grid_h)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddObjectArgs {
    pub label: Label,
    #[serde(default)]
    pub primitive: Primitive,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    /// Shorthand for `w` (and `h` when unset)
    pub size: Option<f64>,
    pub height: Option<f64>,
    pub z_offset: Option<f64>,
}

impl AddObjectArgs {
    pub fn to_new_object(&self) -> NewObject {
        NewObject {
            label: self.label.clone(),
            primitive: self.primitive,
            x: self.x,
            y: self.y,
            w: self.w.or(self.size),
            h: self.h.or(self.size),
            height: self.height,
            z_offset: self.z_offset,
        }
    }
}

impl Arguments for AddObjectArgs {
    const CODE: &'static str = "E_ARGS_ADD";

    fn validate(&self) -> Result<(), EngineError> {
        if self.primitive == Primitive::Ramp {
            return Err(EngineError::invalid_args(
                Self::CODE,
                "ramps are created with add_ramp",
            ));
        }
        finite(Self::CODE, "x", self.x)?;
        finite(Self::CODE, "y", self.y)?;
        finite(Self::CODE, "z_offset", self.z_offset)?;
        positive(Self::CODE, "w", self.w)?;
        positive(Self::CODE, "h", self.h)?;
        positive(Self::CODE, "size", self.size)?;
        positive(Self::CODE, "height", self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoveObjectArgs {
    pub target: Label,
}

impl Arguments for RemoveObjectArgs {
    const CODE: &'static str = "E_ARGS_REMOVE";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenameArgs {
    #[serde(alias = "label")]
    pub target: Label,
    pub new_label: Label,
}

impl Arguments for RenameArgs {
    const CODE: &'static str = "E_ARGS_RENAME";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchRenameArgs {
    pub pairs: Vec<(Label, Label)>,
}

impl Arguments for BatchRenameArgs {
    const CODE: &'static str = "E_ARGS_BRENAME";

    fn validate(&self) -> Result<(), EngineError> {
        if self.pairs.is_empty() {
            return Err(EngineError::invalid_args(Self::CODE, "pairs must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoveArgs {
    pub target: Option<Label>,
    #[serde(default)]
    pub targets: Vec<Label>,
    pub dx: Option<f64>,
    pub dy: Option<f64>,
    /// Mirror the group across x before translating
    #[serde(default)]
    pub symmetric: bool,
    #[serde(default)]
    pub pivot: MirrorPivot,
}

impl MoveArgs {
    pub fn delta(&self) -> (f64, f64) {
        (self.dx.unwrap_or(0.0), self.dy.unwrap_or(0.0))
    }
}

impl Arguments for MoveArgs {
    const CODE: &'static str = "E_ARGS_MOVE";

    fn validate(&self) -> Result<(), EngineError> {
        if self.target.is_none() && self.targets.is_empty() {
            return Err(EngineError::invalid_args(Self::CODE, "target required"));
        }
        if self.dx.is_none() && self.dy.is_none() && !self.symmetric {
            return Err(EngineError::invalid_args(Self::CODE, "dx/dy required"));
        }
        finite(Self::CODE, "dx", self.dx)?;
        finite(Self::CODE, "dy", self.dy)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlignArgs {
    pub targets: Vec<Label>,
    pub axis: Axis,
    pub mode: AlignMode,
}

impl Arguments for AlignArgs {
    const CODE: &'static str = "E_ARGS_ALIGN";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributeKind {
    EqualGaps,
    FixedSpacing,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistributeArgs {
    pub targets: Vec<Label>,
    pub axis: Axis,
    pub mode: DistributeKind,
    pub spacing: Option<f64>,
}

impl DistributeArgs {
    pub fn distribute_mode(&self) -> DistributeMode {
        match self.mode {
            DistributeKind::EqualGaps => DistributeMode::EqualGaps,
            DistributeKind::FixedSpacing => DistributeMode::FixedSpacing(self.spacing.unwrap_or(0.0)),
        }
    }
}

impl Arguments for DistributeArgs {
    const CODE: &'static str = "E_ARGS_DISTRIBUTE";

    fn validate(&self) -> Result<(), EngineError> {
        if self.mode == DistributeKind::FixedSpacing && self.spacing.is_none() {
            return Err(EngineError::invalid_args(
                Self::CODE,
                "spacing required for fixed_spacing",
            ));
        }
        finite(Self::CODE, "spacing", self.spacing)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScaleArgs {
    pub target: Label,
    #[serde(default)]
    pub axis: ScaleAxis,
    pub factor: Option<f64>,
    /// References for scale-to-touch
    pub a: Option<Label>,
    pub b: Option<Label>,
}

impl ScaleArgs {
    /// Both touch references, when given
    pub fn touch(&self) -> Option<(&Label, &Label)> {
        self.a.as_ref().zip(self.b.as_ref())
    }
}

impl Arguments for ScaleArgs {
    const CODE: &'static str = "E_ARGS_SCALE";

    fn validate(&self) -> Result<(), EngineError> {
        if self.a.is_some() != self.b.is_some() {
            return Err(EngineError::invalid_args(
                Self::CODE,
                "scale-to-touch needs both a and b",
            ));
        }
        if self.factor.is_none() && self.touch().is_none() {
            return Err(EngineError::invalid_args(Self::CODE, "factor required"));
        }
        positive(Self::CODE, "factor", self.factor)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SetHeightArgs {
    /// Falls back to the most recently created or edited object
    pub target: Option<Label>,
    pub height: Option<f64>,
    pub factor: Option<f64>,
}

impl SetHeightArgs {
    pub fn change(&self) -> HeightChange {
        match (self.factor, self.height) {
            (Some(factor), _) => HeightChange::Factor(factor),
            (None, height) => HeightChange::Absolute(height.unwrap_or(0.0)),
        }
    }
}

impl Arguments for SetHeightArgs {
    const CODE: &'static str = "E_ARGS_HEIGHT";

    fn validate(&self) -> Result<(), EngineError> {
        if self.height.is_none() && self.factor.is_none() {
            return Err(EngineError::invalid_args(Self::CODE, "height or factor required"));
        }
        positive(Self::CODE, "height", self.height)?;
        positive(Self::CODE, "factor", self.factor)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MirrorArgs {
    pub target: Option<Label>,
    #[serde(default)]
    pub targets: Vec<Label>,
    pub axis: Option<Axis>,
    #[serde(default)]
    pub pivot: MirrorPivot,
}

impl MirrorArgs {
    /// `targets`, or the single `target`
    pub fn all_targets(&self) -> Vec<Label> {
        let mut all = self.targets.clone();
        if let Some(target) = &self.target {
            if !all.contains(target) {
                all.insert(0, target.clone());
            }
        }
        all
    }
}

impl Arguments for MirrorArgs {
    const CODE: &'static str = "E_ARGS_MIRROR";

    fn validate(&self) -> Result<(), EngineError> {
        if self.target.is_none() && self.targets.is_empty() {
            return Err(EngineError::invalid_args(Self::CODE, "target required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StackArgs {
    pub target: Label,
    #[serde(rename = "ref")]
    pub reference: Label,
    #[serde(default, alias = "distance")]
    pub gap: f64,
    /// Copy the reference's planar center
    pub center: Option<bool>,
}

impl Arguments for StackArgs {
    const CODE: &'static str = "E_ARGS_STACK";

    fn validate(&self) -> Result<(), EngineError> {
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(EngineError::invalid_args(Self::CODE, "gap must be >= 0"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaceRelativeArgs {
    /// Falls back to the most recently created or edited object
    pub target: Option<Label>,
    #[serde(rename = "ref")]
    pub reference: Label,
    pub direction: Direction,
    /// Edge-to-edge gap; one grid step when unset
    #[serde(alias = "gap")]
    pub distance: Option<f64>,
}

impl Arguments for PlaceRelativeArgs {
    const CODE: &'static str = "E_ARGS_REL";

    fn validate(&self) -> Result<(), EngineError> {
        match self.distance {
            Some(d) if !(d.is_finite() && d >= 0.0) => Err(EngineError::invalid_args(
                Self::CODE,
                format!("distance must be >= 0, got {}", d),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlaceBesideArgs {
    /// The existing reference object
    #[serde(alias = "ref")]
    pub target: Label,
    pub new_label: Label,
    #[serde(default)]
    pub gap: f64,
    pub size: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
}

impl PlaceBesideArgs {
    /// Explicit footprint, or `None` to copy the reference
    pub fn footprint(&self) -> Option<(f64, f64)> {
        match (self.w.or(self.size), self.h.or(self.size)) {
            (Some(w), Some(h)) => Some((w, h)),
            (Some(v), None) | (None, Some(v)) => Some((v, v)),
            (None, None) => None,
        }
    }
}

impl Arguments for PlaceBesideArgs {
    const CODE: &'static str = "E_ARGS_PLACE";

    fn validate(&self) -> Result<(), EngineError> {
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(EngineError::invalid_args(Self::CODE, "gap must be >= 0"));
        }
        positive(Self::CODE, "size", self.size)?;
        positive(Self::CODE, "w", self.w)?;
        positive(Self::CODE, "h", self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MergeArgs {
    pub keep: Label,
    pub remove: Label,
}

impl Arguments for MergeArgs {
    const CODE: &'static str = "E_ARGS_MERGE";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoveIntoBboxArgs {
    pub target: Label,
    pub bbox: Option<BoxRecord>,
}

impl Arguments for MoveIntoBboxArgs {
    const CODE: &'static str = "E_ARGS_MIB";

    fn validate(&self) -> Result<(), EngineError> {
        if let Some(bbox) = &self.bbox {
            finite(Self::CODE, "bbox.x", Some(bbox.x))?;
            finite(Self::CODE, "bbox.y", Some(bbox.y))?;
            positive(Self::CODE, "bbox.w", Some(bbox.w))?;
            positive(Self::CODE, "bbox.h", Some(bbox.h))?;
            positive(Self::CODE, "bbox.height", bbox.height)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlignToBoundsArgs {
    pub target: Label,
    pub side: BoundsSide,
}

impl Arguments for AlignToBoundsArgs {
    const CODE: &'static str = "E_ARGS_ATB";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlignToRefArgs {
    pub target: Label,
    #[serde(rename = "ref")]
    pub reference: Label,
    pub edge: RefEdge,
    #[serde(default)]
    pub gap: f64,
}

impl Arguments for AlignToRefArgs {
    const CODE: &'static str = "E_ARGS_ATR";

    fn validate(&self) -> Result<(), EngineError> {
        finite(Self::CODE, "gap", Some(self.gap))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampMode {
    Between,
    Side,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddRampArgs {
    pub mode: RampMode,
    pub from: Option<Label>,
    pub to: Option<Label>,
    pub of: Option<Label>,
    pub side: Option<RampSide>,
    pub length: Option<f64>,
    pub slope_ratio: Option<f64>,
    pub label: Option<Label>,
}

impl AddRampArgs {
    fn request(&self) -> Result<RampRequest, EngineError> {
        let missing =
            |field: &str| EngineError::invalid_args(Self::CODE, format!("{} required", field));
        Ok(match self.mode {
            RampMode::Between => RampRequest::Between {
                from: self.from.clone().ok_or_else(|| missing("from"))?,
                to: self.to.clone().ok_or_else(|| missing("to"))?,
                label: self.label.clone(),
            },
            RampMode::Side => RampRequest::Side {
                of: self.of.clone().ok_or_else(|| missing("of"))?,
                side: self.side.ok_or_else(|| missing("side"))?,
                length: self.length,
                slope_ratio: self.slope_ratio,
                label: self.label.clone(),
            },
        })
    }
}

impl Arguments for AddRampArgs {
    const CODE: &'static str = "E_ARGS_RAMP";

    fn validate(&self) -> Result<(), EngineError> {
        positive(Self::CODE, "length", self.length)?;
        positive(Self::CODE, "slope_ratio", self.slope_ratio)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SetAnchorArgs {
    pub target: Label,
    pub x_pct: Option<f64>,
    pub y_pct: Option<f64>,
}

impl Arguments for SetAnchorArgs {
    const CODE: &'static str = "E_ARGS_ANCHOR";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoveAnchorArgs {
    pub target: Label,
}

impl Arguments for RemoveAnchorArgs {
    const CODE: &'static str = "E_ARGS_ANCHOR";
}

impl Arguments for Constraint {
    const CODE: &'static str = "E_ARGS_CONSTRAINT";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoveConstraintArgs {
    pub index: usize,
}

impl Arguments for RemoveConstraintArgs {
    const CODE: &'static str = "E_ARGS_CONSTRAINT";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResizeCanvasArgs {
    pub grid_w: f64,
    pub grid_h: f64,
    #[serde(default)]
    pub scale_sizes: bool,
}

impl Arguments for ResizeCanvasArgs {
    const CODE: &'static str = "E_ARGS_RESIZE";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderArgs {
    pub view: Option<String>,
    pub grid: Option<bool>,
}

impl Arguments for RenderArgs {
    const CODE: &'static str = "E_ARGS_RENDER";
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportArgs {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl Arguments for ReportArgs {
    const CODE: &'static str = "E_ARGS_REPORT";
}

// ============================================================================
// Typed commands
// ============================================================================

/// A validated tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateScene(CreateSceneArgs),
    ResetScene(ResetSceneArgs),
    AddObject(AddObjectArgs),
    RemoveObject(RemoveObjectArgs),
    RenameObject(RenameArgs),
    BatchRename(BatchRenameArgs),
    Move(MoveArgs),
    Align(AlignArgs),
    Distribute(DistributeArgs),
    Scale(ScaleArgs),
    SetHeight(SetHeightArgs),
    Mirror(MirrorArgs),
    Stack(StackDirection, StackArgs),
    PlaceRelative(PlaceRelativeArgs),
    PlaceBeside(Side, PlaceBesideArgs),
    Merge(MergeArgs),
    MoveIntoBbox(MoveIntoBboxArgs),
    AlignToBounds(AlignToBoundsArgs),
    AlignToRef(AlignToRefArgs),
    AddRamp(RampRequest),
    SetAnchor(SetAnchorArgs),
    RemoveAnchor(RemoveAnchorArgs),
    AddConstraint(Constraint),
    RemoveConstraint(RemoveConstraintArgs),
    ClearConstraints,
    SolveConstraints,
    ResizeCanvas(ResizeCanvasArgs),
    Undo,
    Redo,
    RenderSvg(RenderArgs),
    ExportState,
    ReportError(ReportArgs),
}

fn decode<A: Arguments>(raw: &RawCommand) -> Result<A, EngineError> {
    let args: A = serde_json::from_value(Value::Object(raw.arguments.clone()))
        .map_err(|e| EngineError::invalid_args(A::CODE, format!("{}: {}", raw.tool, e)))?;
    args.validate()?;
    Ok(args)
}

impl Command {
    /// Decode and validate a raw command
    pub fn parse(raw: &RawCommand) -> Result<Self, EngineError> {
        let command = match raw.tool.as_str() {
            "create_scene" => Command::CreateScene(decode(raw)?),
            "reset_scene" => Command::ResetScene(decode(raw)?),
            "add_object" => Command::AddObject(decode(raw)?),
            "remove_object" => Command::RemoveObject(decode(raw)?),
            "rename_object" => Command::RenameObject(decode(raw)?),
            "batch_rename" => Command::BatchRename(decode(raw)?),
            "move" => Command::Move(decode(raw)?),
            "align" => Command::Align(decode(raw)?),
            "distribute" => Command::Distribute(decode(raw)?),
            "scale" => Command::Scale(decode(raw)?),
            "set_height" => Command::SetHeight(decode(raw)?),
            "mirror_object" => Command::Mirror(decode(raw)?),
            "stack_above" => Command::Stack(StackDirection::Above, decode(raw)?),
            "stack_below" => Command::Stack(StackDirection::Below, decode(raw)?),
            "place_relative" => Command::PlaceRelative(decode(raw)?),
            "place_left_of" => Command::PlaceBeside(Side::Left, decode(raw)?),
            "place_right_of" => Command::PlaceBeside(Side::Right, decode(raw)?),
            "place_below" => Command::PlaceBeside(Side::Below, decode(raw)?),
            "place_above" => Command::PlaceBeside(Side::Above, decode(raw)?),
            "merge_objects" => Command::Merge(decode(raw)?),
            "move_into_bbox" => Command::MoveIntoBbox(decode(raw)?),
            "align_to_bounds" => Command::AlignToBounds(decode(raw)?),
            "align_to_ref" => Command::AlignToRef(decode(raw)?),
            "add_ramp" => Command::AddRamp(decode::<AddRampArgs>(raw)?.request()?),
            "set_anchor" => Command::SetAnchor(decode(raw)?),
            "remove_anchor" => Command::RemoveAnchor(decode(raw)?),
            "add_constraint" => Command::AddConstraint(decode(raw)?),
            "remove_constraint" => Command::RemoveConstraint(decode(raw)?),
            "clear_constraints" => Command::ClearConstraints,
            "solve_constraints" => Command::SolveConstraints,
            "resize_canvas" => Command::ResizeCanvas(decode(raw)?),
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "render_svg" => Command::RenderSvg(decode(raw)?),
            "export_state" => Command::ExportState,
            "report_error" => Command::ReportError(decode(raw)?),
            other => return Err(EngineError::UnknownTool(other.to_string())),
        };
        Ok(command)
    }

    /// Commands that only read the scene
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::RenderSvg(_) | Command::ExportState | Command::ReportError(_)
        )
    }

    /// Commands that manage history themselves instead of being recorded
    pub fn is_history(&self) -> bool {
        matches!(self, Command::Undo | Command::Redo)
    }
}
