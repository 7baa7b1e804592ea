//! Batch dispatcher
//!
//! [`Engine`] owns the scene context and its history and executes command
//! batches in order. A batch is all-or-nothing: the first failing command
//! stops it and the scene and history are put back the way they were before
//! the batch started.

pub mod command;

pub use command::{Command, CommandBatch, RawCommand};

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, ErrorReport};
use crate::geometry;
use crate::history::History;
use crate::ramp;
use crate::renderer::{render_svg_with_stylesheet, SvgConfig};
use crate::scene::{create_scene, Axis, Effect, Label, Scene, SceneStore, SeedSpec};
use crate::solver;
use crate::stylesheet::Stylesheet;

/// Output of a successful batch
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchOutput {
    /// Last rendered SVG, if the batch rendered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    /// Last exported snapshot, if the batch exported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// What a caller receives for one batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchResponse {
    Ok(BatchOutput),
    Err(ErrorReport),
}

impl From<Result<BatchOutput, ErrorReport>> for BatchResponse {
    fn from(result: Result<BatchOutput, ErrorReport>) -> Self {
        match result {
            Ok(output) => BatchResponse::Ok(output),
            Err(report) => BatchResponse::Err(report),
        }
    }
}

/// Input accepted by the CLI: one batch or a list of them
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BatchInput {
    One(CommandBatch),
    Many(Vec<CommandBatch>),
}

impl BatchInput {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn into_batches(self) -> Vec<CommandBatch> {
        match self {
            BatchInput::One(batch) => vec![batch],
            BatchInput::Many(batches) => batches,
        }
    }
}

/// Scene context, history and rendering settings
#[derive(Debug, Clone)]
pub struct Engine {
    store: SceneStore,
    history: History,
    svg: SvgConfig,
    stylesheet: Stylesheet,
}

impl Engine {
    /// Create an engine with an empty canvas
    pub fn new(config: EngineConfig) -> Self {
        let history = History::new(config.history_limit);
        Self {
            store: SceneStore::new(config),
            history,
            svg: SvgConfig::default(),
            stylesheet: Stylesheet::default(),
        }
    }

    /// Create an engine around an existing scene, e.g. a loaded snapshot
    pub fn with_scene(config: EngineConfig, scene: Scene) -> Result<Self, EngineError> {
        let history = History::new(config.history_limit);
        Ok(Self {
            store: SceneStore::with_scene(config, scene)?,
            history,
            svg: SvgConfig::default(),
            stylesheet: Stylesheet::default(),
        })
    }

    /// Set the SVG output configuration
    pub fn with_svg(mut self, svg: SvgConfig) -> Self {
        self.svg = svg;
        self
    }

    /// Set the stylesheet for rendering
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        self.store.scene()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Execute a batch transactionally
    pub fn execute(&mut self, batch: &CommandBatch) -> Result<BatchOutput, ErrorReport> {
        info!(commands = batch.commands.len(), "executing batch");
        let mut run = BatchRun::default();
        let mut output = BatchOutput::default();

        for (index, raw) in batch.commands.iter().enumerate() {
            let _span = debug_span!("command", index, tool = %raw.tool).entered();
            if let Err(error) = self.step(raw, &mut run, &mut output) {
                warn!(index, tool = %raw.tool, code = error.code(), "batch aborted: {}", error);
                if let Some((store, history)) = run.checkpoint.take() {
                    self.store = store;
                    self.history = history;
                }
                return Err(error.into());
            }
        }
        info!(objects = self.store.scene().len(), "batch complete");
        Ok(output)
    }

    fn step(
        &mut self,
        raw: &RawCommand,
        run: &mut BatchRun,
        output: &mut BatchOutput,
    ) -> Result<(), EngineError> {
        let command = Command::parse(raw)?;
        if command.is_read_only() {
            return self.read(&command, output);
        }
        if run.checkpoint.is_none() {
            run.checkpoint = Some((self.store.clone(), self.history.clone()));
        }

        if command.is_history() {
            let effect = match command {
                Command::Undo => self.history.undo(&mut self.store)?,
                _ => self.history.redo(&mut self.store)?,
            };
            debug!(?effect, "history step");
            return Ok(());
        }

        let before = (!run.recorded).then(|| self.store.scene().clone());
        let effect = self.apply(command)?;
        if effect.is_changed() {
            self.solve();
            match before {
                Some(before) => {
                    self.history.record(before);
                    run.recorded = true;
                }
                None => self.history.clear_redo(),
            }
        }
        debug!(?effect, "command done");
        Ok(())
    }

    fn solve(&mut self) {
        let iterations = self.store.config().solver_iterations;
        solver::solve(&mut self.store, iterations);
    }

    fn read(&self, command: &Command, output: &mut BatchOutput) -> Result<(), EngineError> {
        match command {
            Command::RenderSvg(args) => {
                let view = args.view.as_deref().unwrap_or("topdown");
                if view != "topdown" {
                    return Err(EngineError::ToolUnavailable {
                        tool: "render_svg".to_string(),
                        reason: format!("view '{}' is not supported; use 'topdown'", view),
                    });
                }
                let config = self.svg.clone().with_grid(args.grid.unwrap_or(self.svg.show_grid));
                output.svg = Some(render_svg_with_stylesheet(
                    self.store.scene(),
                    &config,
                    &self.stylesheet,
                ));
            }
            Command::ExportState => {
                let json = self.store.scene().to_json().map_err(|e| EngineError::ToolUnavailable {
                    tool: "export_state".to_string(),
                    reason: e.to_string(),
                })?;
                output.state = Some(json);
            }
            Command::ReportError(args) => {
                return Err(EngineError::Reported {
                    code: args.code.clone().unwrap_or_else(|| "E_MODEL".to_string()),
                    message: args.message.clone().unwrap_or_else(|| "model error".to_string()),
                });
            }
            _ => {}
        }
        Ok(())
    }

    /// Fall back to the most recently edited object
    fn target_or_last(&self, target: Option<Label>, code: &'static str) -> Result<Label, EngineError> {
        target
            .or_else(|| self.store.last_edited().cloned())
            .ok_or_else(|| EngineError::invalid_args(code, "no target given and nothing edited yet"))
    }

    fn apply(&mut self, command: Command) -> Result<Effect, EngineError> {
        let store = &mut self.store;
        match command {
            Command::CreateScene(args) => {
                if !store.scene().is_empty() && !args.reset {
                    return Err(EngineError::EditOnly {
                        count: store.scene().len(),
                    });
                }
                let config = store.config();
                let spec = SeedSpec {
                    labels: args.resolved_labels(),
                    primitive: args.primitive,
                    placement: args.placement,
                    size: args.size.unwrap_or(config.default_block_size),
                    margin: args.margin.unwrap_or(config.default_margin),
                    seed: args.seed,
                    grid_w: args.grid_w.unwrap_or(store.scene().grid_w),
                    grid_h: args.grid_h.unwrap_or(store.scene().grid_h),
                };
                create_scene(store, &spec)?;
                Ok(Effect::Changed)
            }
            Command::ResetScene(args) => {
                let grid_w = args.grid_w.unwrap_or(store.scene().grid_w);
                let grid_h = args.grid_h.unwrap_or(store.scene().grid_h);
                if *store.scene() == Scene::new(grid_w, grid_h, store.scene().grid_step) {
                    return Ok(Effect::Unchanged);
                }
                store.reset(grid_w, grid_h);
                Ok(Effect::Changed)
            }
            Command::AddObject(args) => {
                store.add(args.to_new_object())?;
                Ok(Effect::Changed)
            }
            Command::RemoveObject(args) => {
                store.remove(&args.target)?;
                Ok(Effect::Changed)
            }
            Command::RenameObject(args) => store.rename(&args.target, &args.new_label),
            Command::BatchRename(args) => geometry::batch_rename(store, &args.pairs),
            Command::Move(args) => {
                let (dx, dy) = args.delta();
                if args.targets.is_empty() {
                    let target = args.target.as_ref().ok_or_else(|| {
                        EngineError::invalid_args("E_ARGS_MOVE", "target required")
                    })?;
                    if !args.symmetric {
                        return geometry::move_object(store, target, dx, dy);
                    }
                    geometry::move_group(store, std::slice::from_ref(target), dx, dy, true, args.pivot)
                } else {
                    geometry::move_group(store, &args.targets, dx, dy, args.symmetric, args.pivot)
                }
            }
            Command::Align(args) => geometry::align(store, &args.targets, args.axis, args.mode),
            Command::Distribute(args) => {
                geometry::distribute(store, &args.targets, args.axis, args.distribute_mode())
            }
            Command::Scale(args) => {
                let mut effect = Effect::Unchanged;
                if let Some(factor) = args.factor {
                    effect = geometry::scale(store, &args.target, args.axis, factor)?;
                }
                if let Some((a, b)) = args.touch() {
                    let touched =
                        geometry::scale_to_touch(store, &args.target, a, b, args.axis.primary())?;
                    effect = effect.or(touched);
                }
                Ok(effect)
            }
            Command::SetHeight(args) => {
                let change = args.change();
                let target = self.target_or_last(args.target, "E_ARGS_HEIGHT")?;
                geometry::set_height(&mut self.store, &target, change)
            }
            Command::Mirror(args) => geometry::mirror(
                store,
                &args.all_targets(),
                args.axis.unwrap_or(Axis::X),
                args.pivot,
            ),
            Command::Stack(direction, args) => geometry::stack(
                store,
                &args.target,
                &args.reference,
                direction,
                args.gap,
                args.center.unwrap_or(true),
            ),
            Command::PlaceRelative(args) => {
                let distance = args.distance.unwrap_or(store.grid().step());
                let target = self.target_or_last(args.target, "E_ARGS_REL")?;
                geometry::place_relative(
                    &mut self.store,
                    &target,
                    &args.reference,
                    args.direction,
                    distance,
                )
            }
            Command::PlaceBeside(side, args) => geometry::place_beside(
                store,
                &args.target,
                &args.new_label,
                side,
                args.gap,
                args.footprint(),
            ),
            Command::Merge(args) => geometry::merge(store, &args.keep, &args.remove),
            Command::MoveIntoBbox(args) => geometry::move_into_bbox(store, &args.target, args.bbox),
            Command::AlignToBounds(args) => geometry::align_to_bounds(store, &args.target, args.side),
            Command::AlignToRef(args) => {
                geometry::align_to_ref(store, &args.target, &args.reference, args.edge, args.gap)
            }
            Command::AddRamp(request) => {
                ramp::add_ramp(store, &request)?;
                Ok(Effect::Changed)
            }
            Command::SetAnchor(args) => solver::set_anchor(store, &args.target, args.x_pct, args.y_pct),
            Command::RemoveAnchor(args) => solver::remove_anchor(store, &args.target),
            Command::AddConstraint(constraint) => solver::add_constraint(store, constraint),
            Command::RemoveConstraint(args) => solver::remove_constraint(store, args.index),
            Command::ClearConstraints => Ok(solver::clear_constraints(store)),
            Command::SolveConstraints => {
                let before = store.scene().clone();
                let iterations = store.config().solver_iterations;
                solver::solve(store, iterations);
                Ok(if *store.scene() == before {
                    Effect::Unchanged
                } else {
                    Effect::Changed
                })
            }
            Command::ResizeCanvas(args) => store.resize_canvas(args.grid_w, args.grid_h, args.scale_sizes),
            Command::Undo
            | Command::Redo
            | Command::RenderSvg(_)
            | Command::ExportState
            | Command::ReportError(_) => Ok(Effect::Unchanged),
        }
    }
}

/// Per-batch bookkeeping
#[derive(Default)]
struct BatchRun {
    /// State to roll back to, taken before the first non-read command
    checkpoint: Option<(SceneStore, History)>,
    /// Whether this batch already pushed its undo entry
    recorded: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
