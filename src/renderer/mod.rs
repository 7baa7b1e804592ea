//! SVG renderer for scenes
//!
//! Produces a top-down view of the canvas with grid lines, labeled blocks and
//! dashed ramp footprints.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{ramp_corners, render_svg, render_svg_with_stylesheet, SvgBuilder};
