//! Ramp synthesis
//!
//! Ramps are thin slabs described by two planar endpoints and the heights at
//! each end. Their pose (length, center, tilt) is computed exactly from those
//! endpoints and is not snapped, so a ramp between two blocks meets both
//! facing edges precisely.

use serde::Deserialize;
use tracing::debug;

use crate::error::EngineError;
use crate::scene::{Axis, Grid, Label, Point, Primitive, RampMeta, SceneObject, SceneStore, Tilt};

const ARGS: &str = "E_ARGS_RAMP";

/// Overlap below this is treated as no overlap
const OVERLAP_EPS: f64 = 1e-6;

/// Side of a block a ramp leaves from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampSide {
    Left,
    Right,
    /// Toward smaller y
    Front,
    /// Toward larger y
    Back,
}

impl RampSide {
    fn name(self) -> &'static str {
        match self {
            RampSide::Left => "LEFT",
            RampSide::Right => "RIGHT",
            RampSide::Front => "FRONT",
            RampSide::Back => "BACK",
        }
    }
}

/// What kind of ramp to build
#[derive(Debug, Clone, PartialEq)]
pub enum RampRequest {
    /// Connect the facing edges of two blocks
    Between {
        from: Label,
        to: Label,
        label: Option<Label>,
    },
    /// Leave one side of a block at a fixed slope
    Side {
        of: Label,
        side: RampSide,
        length: Option<f64>,
        slope_ratio: Option<f64>,
        label: Option<Label>,
    },
}

/// Build a ramp and insert it; returns the label it was stored under
pub fn add_ramp(store: &mut SceneStore, request: &RampRequest) -> Result<Label, EngineError> {
    let ramp = match request {
        RampRequest::Between { from, to, label } => between(store, from, to, label.as_ref())?,
        RampRequest::Side {
            of,
            side,
            length,
            slope_ratio,
            label,
        } => side_ramp(store, of, *side, *length, *slope_ratio, label.as_ref())?,
    };
    let label = ramp.label.clone();
    debug!(label = %label, length = ramp.w, "ramp added");
    store.insert(ramp)?;
    Ok(label)
}

fn between(
    store: &SceneStore,
    from: &Label,
    to: &Label,
    label: Option<&Label>,
) -> Result<SceneObject, EngineError> {
    if from == to {
        return Err(EngineError::invalid_args(
            ARGS,
            "a ramp needs two different blocks",
        ));
    }
    let a = store.get(from)?;
    let b = store.get(to)?;
    let grid = store.grid();
    let (ra, rb) = (a.rect(), b.rect());
    let overlap_x = ra.overlap(&rb, Axis::X);
    let overlap_y = ra.overlap(&rb, Axis::Y);

    let axis = if overlap_y > OVERLAP_EPS && overlap_x <= OVERLAP_EPS {
        Axis::X
    } else if overlap_x > OVERLAP_EPS && overlap_y <= OVERLAP_EPS {
        Axis::Y
    } else if (b.x - a.x).abs() >= (b.y - a.y).abs() {
        Axis::X
    } else {
        Axis::Y
    };
    let across = axis.other();

    let forward = b.center_on(axis) >= a.center_on(axis);
    let start_along = if forward { a.far_edge(axis) } else { a.near_edge(axis) };
    let mut end_along = if forward { b.near_edge(axis) } else { b.far_edge(axis) };
    if (end_along - start_along).abs() < 1e-9 {
        end_along = start_along + if forward { grid.step() } else { -grid.step() };
    }
    let mid_across = (a.center_on(across) + b.center_on(across)) / 2.0;
    let point = |along: f64| match axis {
        Axis::X => Point::new(along, mid_across),
        Axis::Y => Point::new(mid_across, along),
    };

    let shared = ra.overlap(&rb, across);
    let width = if shared > OVERLAP_EPS {
        shared
    } else {
        a.extent(across).min(b.extent(across))
    };

    let label = match label {
        Some(label) => store.unique_label(label.as_str(), 1)?,
        None => store.unique_label(&format!("RAMP_{}_{}", from, to), 1)?,
    };
    Ok(expand(
        label,
        point(start_along),
        point(end_along),
        grid.snap_size(width),
        a.top_z(),
        b.top_z(),
        store.config().ramp_thickness,
        grid,
    ))
}

fn side_ramp(
    store: &SceneStore,
    of: &Label,
    side: RampSide,
    length: Option<f64>,
    slope_ratio: Option<f64>,
    label: Option<&Label>,
) -> Result<SceneObject, EngineError> {
    let slope = slope_ratio.unwrap_or(store.config().slope_ratio);
    if !(slope.is_finite() && slope > 0.0) {
        return Err(EngineError::invalid_args(
            ARGS,
            format!("slope_ratio must be positive, got {}", slope),
        ));
    }
    if let Some(length) = length {
        if !(length.is_finite() && length > 0.0) {
            return Err(EngineError::invalid_args(
                ARGS,
                format!("length must be positive, got {}", length),
            ));
        }
    }
    let block = store.get(of)?;
    let grid = store.grid();
    let reach = match side {
        RampSide::Left | RampSide::Right => block.w,
        RampSide::Front | RampSide::Back => block.h,
    };
    let length = grid.snap_size(length.unwrap_or(reach * 2.0));

    let (start, end) = match side {
        RampSide::Left => {
            let start = Point::new(grid.snap(block.left()), grid.snap(block.y));
            (start, Point::new(grid.snap(start.x - length), start.y))
        }
        RampSide::Right => {
            let start = Point::new(grid.snap(block.right()), grid.snap(block.y));
            (start, Point::new(grid.snap(start.x + length), start.y))
        }
        RampSide::Front => {
            let start = Point::new(grid.snap(block.x), grid.snap(block.top()));
            (start, Point::new(start.x, grid.snap(start.y - length)))
        }
        RampSide::Back => {
            let start = Point::new(grid.snap(block.x), grid.snap(block.bottom()));
            (start, Point::new(start.x, grid.snap(start.y + length)))
        }
    };
    let width = match side {
        RampSide::Left | RampSide::Right => block.h,
        RampSide::Front | RampSide::Back => block.w,
    };
    let start_height = block.top_z();
    let end_height = start_height + start.distance(end) / slope;

    let label = match label {
        Some(label) => store.unique_label(label.as_str(), 2)?,
        None => store.unique_label(&format!("RAMP_{}_{}", of, side.name()), 2)?,
    };
    Ok(expand(
        label,
        start,
        end,
        grid.snap_size(width),
        start_height,
        end_height,
        store.config().ramp_thickness,
        grid,
    ))
}

/// Turn endpoints and end heights into a posed slab
#[allow(clippy::too_many_arguments)]
fn expand(
    label: Label,
    start: Point,
    end: Point,
    width: f64,
    start_height: f64,
    end_height: f64,
    thickness: f64,
    grid: Grid,
) -> SceneObject {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy).max(grid.step());
    let yaw = (-dy).atan2(dx);
    let pitch = (end_height - start_height).atan2(length);
    SceneObject {
        label,
        x: (start.x + end.x) / 2.0,
        y: (start.y + end.y) / 2.0,
        w: length,
        h: width,
        primitive: Primitive::Ramp,
        height: thickness,
        z_offset: (start_height + end_height) / 2.0 - thickness / 2.0 * pitch.cos(),
        tilt: Some(Tilt {
            pitch: pitch.to_degrees(),
            roll: 0.0,
            yaw: yaw.to_degrees(),
        }),
        ramp: Some(RampMeta {
            start_height,
            end_height,
            start,
            end,
        }),
    }
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
        // A: x 0..2, top at 1.0; B: x 6..8, top at 2.0
        store
            .add(NewObject::new(label("A")).at(1.0, 5.0).sized(2.0, 2.0).with_height(1.0))
            .unwrap();
        store
            .add(NewObject::new(label("B")).at(7.0, 5.0).sized(2.0, 2.0).with_height(2.0))
            .unwrap();
        store
    }

    fn between_request(label: Option<&str>) -> RampRequest {
        RampRequest::Between {
            from: Label::new("A").unwrap(),
            to: Label::new("B").unwrap(),
            label: label.map(|l| Label::new(l).unwrap()),
        }
    }

    #[test]
    fn test_between_meets_facing_edges() {
        let mut store = store();
        let name = add_ramp(&mut store, &between_request(None)).unwrap();
        assert_eq!(name.as_str(), "RAMP_A_B");
        let ramp = store.get(&name).unwrap();
        let meta = ramp.ramp.unwrap();
        assert_eq!(meta.start, Point::new(2.0, 5.0));
        assert_eq!(meta.end, Point::new(6.0, 5.0));
        assert_eq!((meta.start_height, meta.end_height), (1.0, 2.0));
        assert!((ramp.w - 4.0).abs() < 1e-12);
        assert_eq!(ramp.h, 2.0);
        let tilt = ramp.tilt.unwrap();
        assert!((tilt.pitch - 1.0f64.atan2(4.0).to_degrees()).abs() < 1e-9);
        assert_eq!(tilt.yaw, 0.0);
        assert_eq!(ramp.primitive, Primitive::Ramp);
    }

    #[test]
    fn test_between_labels_disambiguate() {
        let mut store = store();
        add_ramp(&mut store, &between_request(None)).unwrap();
        let second = add_ramp(&mut store, &between_request(None)).unwrap();
        assert_eq!(second.as_str(), "RAMP_A_B_01");
        let named = add_ramp(&mut store, &between_request(Some("bridge"))).unwrap();
        assert_eq!(named.as_str(), "BRIDGE");
    }

    #[test]
    fn test_between_vertical_run() {
        let mut store = store();
        store.get_mut(&label("B")).unwrap().x = 1.5;
        store.get_mut(&label("B")).unwrap().y = 12.0;
        let name = add_ramp(&mut store, &between_request(None)).unwrap();
        let meta = store.get(&name).unwrap().ramp.unwrap();
        // x extents overlap (0..2 and 0.5..2.5), so the ramp runs along y
        assert_eq!(meta.start, Point::new(1.25, 6.0));
        assert_eq!(meta.end, Point::new(1.25, 11.0));
        assert_eq!(store.get(&name).unwrap().h, 1.5);
    }

    #[test]
    fn test_touching_blocks_get_nudged() {
        let mut store = store();
        store.get_mut(&label("B")).unwrap().x = 3.0;
        let name = add_ramp(&mut store, &between_request(None)).unwrap();
        let meta = store.get(&name).unwrap().ramp.unwrap();
        assert_eq!(meta.end.x - meta.start.x, 0.5);
    }

    #[test]
    fn test_side_ramp_rises_by_slope() {
        let mut store = store();
        let request = RampRequest::Side {
            of: label("A"),
            side: RampSide::Left,
            length: Some(6.0),
            slope_ratio: None,
            label: None,
        };
        let name = add_ramp(&mut store, &request).unwrap();
        assert_eq!(name.as_str(), "RAMP_A_LEFT");
        let ramp = store.get(&name).unwrap();
        let meta = ramp.ramp.unwrap();
        assert_eq!(meta.start, Point::new(0.0, 5.0));
        assert_eq!(meta.end, Point::new(-6.0, 5.0));
        assert!((meta.end_height - 1.5).abs() < 1e-12);
        assert!((ramp.tilt.unwrap().yaw.abs() - 180.0).abs() < 1e-9);

        let again = add_ramp(&mut store, &request).unwrap();
        assert_eq!(again.as_str(), "RAMP_A_LEFT_02");
    }

    #[test]
    fn test_side_ramp_rejects_bad_slope() {
        let mut store = store();
        let request = RampRequest::Side {
            of: label("A"),
            side: RampSide::Back,
            length: None,
            slope_ratio: Some(0.0),
            label: None,
        };
        assert_eq!(add_ramp(&mut store, &request).unwrap_err().code(), "E_ARGS_RAMP");
    }
}
