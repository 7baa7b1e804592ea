//! Graybox - a grid-snapped scene engine for blocky level layouts
//!
//! Scenes are edited through ordered command batches. Every batch is
//! validated, applied atomically, re-solved against its constraints and
//! recorded for undo. Scenes render to a top-down SVG and export as JSON
//! snapshots.
//!
//! # Example
//!
//! ```rust
//! use graybox::{CommandBatch, Engine};
//!
//! let mut engine = Engine::default();
//! let batch = CommandBatch::from_json(
//!     r#"{"commands": [
//!         {"tool": "create_scene", "arguments": {"labels": ["A", "B"], "placement": "grid"}},
//!         {"tool": "render_svg", "arguments": {"view": "topdown"}}
//!     ]}"#,
//! )
//! .unwrap();
//! let output = engine.execute(&batch).unwrap();
//! assert!(output.svg.unwrap().contains("<svg"));
//! assert_eq!(engine.scene().len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod ramp;
pub mod renderer;
pub mod router;
pub mod scene;
pub mod solver;
pub mod stylesheet;

pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, ErrorReport};
pub use history::History;
pub use ramp::{add_ramp, RampRequest, RampSide};
pub use renderer::{render_svg, render_svg_with_stylesheet, SvgConfig};
pub use router::{BatchInput, BatchOutput, BatchResponse, Command, CommandBatch, Engine, RawCommand};
pub use scene::{Effect, Grid, Label, Scene, SceneObject, SceneStore};

// Re-export Stylesheet for public API
pub use stylesheet::{Stylesheet, StylesheetError};
