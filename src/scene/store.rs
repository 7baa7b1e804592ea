//! The scene context
//!
//! [`SceneStore`] owns the scene plus the scratch state editing commands share
//! (the last removed box and the last edited label). It is passed by `&mut`
//! into every operation; there is no global state.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;

use super::grid::Grid;
use super::label::Label;
use super::types::{BoxRecord, Primitive, Scene, SceneObject};

/// Whether an operation changed the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Changed,
    /// The requested state already held; nothing was touched
    Unchanged,
}

impl Effect {
    pub fn is_changed(self) -> bool {
        self == Effect::Changed
    }

    /// `Changed` if either effect changed something
    pub fn or(self, other: Effect) -> Effect {
        if self.is_changed() || other.is_changed() {
            Effect::Changed
        } else {
            Effect::Unchanged
        }
    }
}

/// Request to create a single object; unset fields use defaults
#[derive(Debug, Clone, PartialEq)]
pub struct NewObject {
    pub label: Label,
    pub primitive: Primitive,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub height: Option<f64>,
    pub z_offset: Option<f64>,
}

impl NewObject {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            primitive: Primitive::Cube,
            x: None,
            y: None,
            w: None,
            h: None,
            height: None,
            z_offset: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn sized(mut self, w: f64, h: f64) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_z_offset(mut self, z_offset: f64) -> Self {
        self.z_offset = Some(z_offset);
        self
    }

    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = primitive;
        self
    }
}

/// Explicit scene context shared by all editing operations
#[derive(Debug, Clone)]
pub struct SceneStore {
    scene: Scene,
    config: EngineConfig,
    last_removed: Option<BoxRecord>,
    last_edited: Option<Label>,
}

impl SceneStore {
    /// Create a store holding an empty scene sized from `config`
    pub fn new(config: EngineConfig) -> Self {
        let scene = Scene::new(config.canvas_width, config.canvas_height, config.grid_step);
        Self {
            scene,
            config,
            last_removed: None,
            last_edited: None,
        }
    }

    /// Create a store around an existing scene snapshot
    pub fn with_scene(config: EngineConfig, scene: Scene) -> Result<Self, EngineError> {
        scene.validate()?;
        Ok(Self {
            scene,
            config,
            last_removed: None,
            last_edited: None,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub(crate) fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snap grid of the current scene
    pub fn grid(&self) -> Grid {
        Grid::new(self.scene.grid_step)
    }

    pub fn snap(&self, value: f64) -> f64 {
        self.grid().snap(value)
    }

    pub fn last_removed(&self) -> Option<BoxRecord> {
        self.last_removed
    }

    /// Label most recently created or edited, used as a default target
    pub fn last_edited(&self) -> Option<&Label> {
        self.last_edited.as_ref()
    }

    pub(crate) fn touch(&mut self, label: &Label) {
        self.last_edited = Some(label.clone());
    }

    /// Deep copy of the current scene
    pub fn snapshot(&self) -> Scene {
        self.scene.clone()
    }

    /// Replace the whole scene, keeping scratch state that still applies
    pub fn restore(&mut self, scene: Scene) {
        self.scene = scene;
        let stale = self
            .last_edited
            .as_ref()
            .is_some_and(|label| !self.scene.objects.contains_key(label));
        if stale {
            self.last_edited = None;
        }
    }

    /// Clear the scene and set a new canvas size
    pub fn reset(&mut self, grid_w: f64, grid_h: f64) {
        self.scene = Scene::new(grid_w, grid_h, self.scene.grid_step);
        self.last_edited = None;
        debug!(grid_w, grid_h, "scene reset");
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.scene.objects.contains_key(label)
    }

    pub fn get(&self, label: &Label) -> Result<&SceneObject, EngineError> {
        self.scene
            .objects
            .get(label)
            .ok_or_else(|| EngineError::not_found(label.as_str()))
    }

    pub fn get_mut(&mut self, label: &Label) -> Result<&mut SceneObject, EngineError> {
        self.scene
            .objects
            .get_mut(label)
            .ok_or_else(|| EngineError::not_found(label.as_str()))
    }

    /// Fail with `E_NOT_FOUND` on the first missing label
    pub fn require<'a>(
        &self,
        labels: impl IntoIterator<Item = &'a Label>,
    ) -> Result<(), EngineError> {
        for label in labels {
            self.get(label)?;
        }
        Ok(())
    }

    /// Add a block, snapping every value to the grid
    pub fn add(&mut self, spec: NewObject) -> Result<&SceneObject, EngineError> {
        if self.contains(&spec.label) {
            return Err(EngineError::duplicate(spec.label.as_str()));
        }
        let grid = self.grid();
        let w = grid.snap_size(spec.w.unwrap_or(1.0));
        let h = grid.snap_size(spec.h.unwrap_or(w));
        let height = grid.snap_size(spec.height.unwrap_or(w));
        let object = SceneObject {
            label: spec.label.clone(),
            x: grid.snap(spec.x.unwrap_or(self.scene.grid_w / 2.0)),
            y: grid.snap(spec.y.unwrap_or(self.scene.grid_h / 2.0)),
            w,
            h,
            primitive: spec.primitive,
            height,
            z_offset: spec.z_offset.map(|z| grid.snap(z)).unwrap_or(height / 2.0),
            tilt: None,
            ramp: None,
        };
        debug!(label = %object.label, x = object.x, y = object.y, "object added");
        self.insert(object)?;
        self.get(&spec.label)
    }

    /// Insert a fully formed object as-is
    pub(crate) fn insert(&mut self, object: SceneObject) -> Result<(), EngineError> {
        if self.contains(&object.label) {
            return Err(EngineError::duplicate(object.label.as_str()));
        }
        self.last_edited = Some(object.label.clone());
        self.scene.objects.insert(object.label.clone(), object);
        Ok(())
    }

    /// Remove an object and remember its box for a later move-into-bbox
    pub fn remove(&mut self, label: &Label) -> Result<BoxRecord, EngineError> {
        let object = self
            .scene
            .objects
            .remove(label)
            .ok_or_else(|| EngineError::not_found(label.as_str()))?;
        let bbox = object.bbox();
        self.last_removed = Some(bbox);
        if self.last_edited.as_ref() == Some(label) {
            self.last_edited = None;
        }
        debug!(label = %label, "object removed");
        Ok(bbox)
    }

    /// Rename one object; a holder of `new` swaps into `old`
    pub fn rename(&mut self, old: &Label, new: &Label) -> Result<Effect, EngineError> {
        self.get(old)?;
        if old == new {
            return Ok(Effect::Unchanged);
        }
        self.relabel(&[(old.clone(), new.clone())])?;
        Ok(Effect::Changed)
    }

    /// Apply a set of renames as one transaction.
    ///
    /// Sources must exist and both sides must be free of duplicates. Objects
    /// that already hold a requested name without being renamed themselves
    /// move into the names the batch frees up. Every moving object is parked
    /// under a staging label first, so chains and cycles cannot collide.
    pub(crate) fn relabel(&mut self, pairs: &[(Label, Label)]) -> Result<(), EngineError> {
        for (old, _) in pairs {
            self.get(old)?;
        }
        let olds: Vec<&Label> = pairs.iter().map(|(old, _)| old).collect();
        let news: Vec<&Label> = pairs.iter().map(|(_, new)| new).collect();

        let displaced = news
            .iter()
            .filter(|new| self.contains(new) && !olds.contains(new))
            .map(|new| (*new).clone());
        let freed = olds.iter().filter(|old| !news.contains(old)).map(|old| (*old).clone());
        let mut moves: Vec<(Label, Label)> = pairs
            .iter()
            .filter(|(old, new)| old != new)
            .cloned()
            .collect();
        moves.extend(displaced.zip(freed));

        let mut staged = Vec::with_capacity(moves.len());
        for (slot, (from, to)) in moves.iter().enumerate() {
            let object = self
                .scene
                .objects
                .remove(from)
                .ok_or_else(|| EngineError::not_found(from.as_str()))?;
            let parking = Label::staging(slot);
            self.scene.objects.insert(parking.clone(), object);
            staged.push((parking, to.clone()));
        }
        for (parking, to) in staged {
            if let Some(mut object) = self.scene.objects.remove(&parking) {
                object.label = to.clone();
                self.scene.objects.insert(to, object);
            }
        }

        let mapping: HashMap<Label, Label> = moves.into_iter().collect();
        self.follow_renames(&mapping);
        debug!(count = mapping.len(), "labels reassigned");
        Ok(())
    }

    /// Point anchors, constraints and scratch labels at renamed objects
    fn follow_renames(&mut self, mapping: &HashMap<Label, Label>) {
        let rename = |label: &Label| mapping.get(label).cloned().unwrap_or_else(|| label.clone());

        let anchors = std::mem::take(&mut self.scene.anchors);
        self.scene.anchors = anchors
            .into_iter()
            .map(|(label, anchor)| (rename(&label), anchor))
            .collect::<BTreeMap<_, _>>();

        for constraint in &mut self.scene.constraints {
            for slot in [&mut constraint.target, &mut constraint.a, &mut constraint.b] {
                if let Some(label) = slot.as_mut() {
                    *label = rename(label);
                }
            }
        }
        self.last_edited = self.last_edited.as_ref().map(|label| rename(label));
    }

    /// First free label of the form `base`, `base_NN`, ... starting at `first_suffix`
    pub fn unique_label(&self, base: &str, first_suffix: usize) -> Result<Label, EngineError> {
        let label_space = || EngineError::LabelSpace {
            base: base.to_string(),
        };
        let candidate = Label::new(base).map_err(|_| label_space())?;
        if !self.contains(&candidate) {
            return Ok(candidate);
        }
        for k in first_suffix..1000 {
            let candidate = Label::new(&format!("{}_{:02}", base, k)).map_err(|_| label_space())?;
            if !self.contains(&candidate) {
                return Ok(candidate);
            }
        }
        Err(label_space())
    }

    /// Change the canvas size, keeping every object at the same fractional
    /// position. With `scale_sizes`, extents follow the mean scale factor.
    /// Anchors and constraints are re-solved afterwards.
    pub fn resize_canvas(
        &mut self,
        grid_w: f64,
        grid_h: f64,
        scale_sizes: bool,
    ) -> Result<Effect, EngineError> {
        let grid = self.grid();
        for (name, value) in [("grid_w", grid_w), ("grid_h", grid_h)] {
            if !(value.is_finite() && value >= grid.step()) {
                return Err(EngineError::invalid_args(
                    "E_ARGS_RESIZE",
                    format!("{} must be at least one grid step, got {}", name, value),
                ));
            }
        }
        if grid_w == self.scene.grid_w && grid_h == self.scene.grid_h {
            return Ok(Effect::Unchanged);
        }

        let sx = grid_w / self.scene.grid_w;
        let sy = grid_h / self.scene.grid_h;
        let size_factor = (sx + sy) / 2.0;
        for object in self.scene.objects.values_mut() {
            object.x = grid.snap(object.x * sx);
            object.y = grid.snap(object.y * sy);
            if scale_sizes {
                object.w = grid.snap_size(object.w * size_factor);
                object.h = grid.snap_size(object.h * size_factor);
            }
            if let Some(meta) = object.ramp.as_mut() {
                meta.start.x *= sx;
                meta.start.y *= sy;
                meta.end.x *= sx;
                meta.end.y *= sy;
            }
        }
        self.scene.grid_w = grid_w;
        self.scene.grid_h = grid_h;
        debug!(grid_w, grid_h, scale_sizes, "canvas resized");

        let iterations = self.config.solver_iterations;
        crate::solver::solve(self, iterations);
        Ok(Effect::Changed)
    }
}
