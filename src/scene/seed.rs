//! Scene seeding
//!
//! Builds a fresh scene of equally sized blocks, either on a regular grid or
//! scattered at seeded random positions that keep a margin between blocks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::EngineError;

use super::label::Label;
use super::store::SceneStore;
use super::types::{Primitive, SceneObject};

/// Random draws tried per block before falling back to a row slot
const PLACEMENT_ATTEMPTS: usize = 5000;

/// How seeded blocks are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Square-ish grid starting at the top-left corner
    Grid,
    /// One horizontal row
    Row,
    #[default]
    #[serde(alias = "random")]
    RandomNonoverlap,
}

/// Parameters for [`create_scene`]
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSpec {
    pub labels: Vec<Label>,
    pub primitive: Primitive,
    pub placement: Placement,
    pub size: f64,
    pub margin: f64,
    pub seed: u64,
    pub grid_w: f64,
    pub grid_h: f64,
}

/// Reset the store and populate it according to `spec`.
///
/// The same spec always yields the same scene. Returns the created labels in
/// placement order.
pub fn create_scene(store: &mut SceneStore, spec: &SeedSpec) -> Result<Vec<Label>, EngineError> {
    store.reset(spec.grid_w, spec.grid_h);
    let grid = store.grid();
    let size = grid.snap_size(spec.size);
    let margin = spec.margin.max(0.0);

    let positions = match spec.placement {
        Placement::Grid => {
            let cols = (spec.labels.len() as f64).sqrt().ceil().max(1.0) as usize;
            lattice(spec.labels.len(), cols, size, margin, grid.step())
        }
        Placement::Row => lattice(
            spec.labels.len(),
            spec.labels.len().max(1),
            size,
            margin,
            grid.step(),
        ),
        Placement::RandomNonoverlap => scatter(store, spec.labels.len(), size, margin, spec.seed),
    };

    for (label, (x, y)) in spec.labels.iter().zip(positions) {
        store.insert(SceneObject {
            label: label.clone(),
            x: grid.snap(x),
            y: grid.snap(y),
            w: size,
            h: size,
            primitive: spec.primitive,
            height: size,
            z_offset: size / 2.0,
            tilt: None,
            ramp: None,
        })?;
    }
    debug!(count = spec.labels.len(), placement = ?spec.placement, "scene seeded");
    Ok(spec.labels.clone())
}

fn lattice(n: usize, cols: usize, size: f64, margin: f64, step: f64) -> Vec<(f64, f64)> {
    let pitch = (size + margin).max(step);
    (0..n)
        .map(|i| {
            (
                size + (i % cols) as f64 * pitch,
                size + (i / cols) as f64 * pitch,
            )
        })
        .collect()
}

fn scatter(store: &SceneStore, n: usize, size: f64, margin: f64, seed: u64) -> Vec<(f64, f64)> {
    let grid = store.grid();
    let scene = store.scene();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut placed: Vec<(f64, f64)> = Vec::with_capacity(n);
    let clearance = size + margin;
    let x_range = size..=(scene.grid_w - size);
    let y_range = size..=(scene.grid_h - size);
    let drawable = !x_range.is_empty() && !y_range.is_empty();

    for i in 0..n {
        let mut spot = None;
        if drawable {
            for _ in 0..PLACEMENT_ATTEMPTS {
                let x = grid.snap(rng.gen_range(x_range.clone()));
                let y = grid.snap(rng.gen_range(y_range.clone()));
                let clear = placed
                    .iter()
                    .all(|&(px, py)| (x - px).hypot(y - py) >= clearance);
                if clear {
                    spot = Some((x, y));
                    break;
                }
            }
        }
        let spot = spot.unwrap_or_else(|| {
            warn!(index = i, "no free random spot; using fallback row");
            (
                grid.snap(size + placed.len() as f64 * clearance),
                grid.snap(size * 1.5),
            )
        });
        placed.push(spot);
    }
    placed
}
