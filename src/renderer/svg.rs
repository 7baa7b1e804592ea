//! Top-down SVG generation from a scene

use crate::scene::{Point, Primitive, Scene, SceneObject};
use crate::stylesheet::Stylesheet;

use super::SvgConfig;

/// Dash pattern that marks ramps apart from solid blocks
const RAMP_DASH: &str = "6 4";

const LABEL_FONT_SIZE: f64 = 14.0;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    background: Vec<String>,
    elements: Vec<String>,
    labels: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            background: vec![],
            elements: vec![],
            labels: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn class_list(&self, kind: &str, classes: &[String]) -> String {
        let prefix = self.prefix();
        std::iter::once(format!("{}{}", prefix, kind))
            .chain(classes.iter().map(|c| format!("{}{}", prefix, c)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fill the whole viewport
    pub fn add_background(&mut self, fill: &str) {
        self.background.push(format!(
            r#"{}<rect class="{}background" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.indent_str(),
            self.prefix(),
            num(self.config.width_px),
            num(self.config.height_px),
            fill
        ));
    }

    /// Add a grid line
    pub fn add_grid_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) {
        self.background.push(format!(
            r#"{}<line class="{}grid" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
            self.indent_str(),
            self.prefix(),
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            stroke
        ));
    }

    /// Add a rectangle element
    #[allow(clippy::too_many_arguments)]
    pub fn add_rect(
        &mut self,
        id: Option<&str>,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        classes: &[String],
        styles: &str,
    ) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        self.elements.push(format!(
            r#"{}<rect{} class="{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            id_attr,
            self.class_list("block", classes),
            num(x),
            num(y),
            num(w),
            num(h),
            styles
        ));
    }

    /// Add a polygon element
    pub fn add_polygon(
        &mut self,
        id: Option<&str>,
        points: &[Point],
        classes: &[String],
        styles: &str,
    ) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        let points_str: String = points
            .iter()
            .map(|p| format!("{},{}", num(p.x), num(p.y)))
            .collect::<Vec<_>>()
            .join(" ");

        self.elements.push(format!(
            r#"{}<polygon{} class="{}" points="{}"{}/>"#,
            self.indent_str(),
            id_attr,
            self.class_list("ramp", classes),
            points_str,
            styles
        ));
    }

    /// Add a label centered on a point
    pub fn add_label(&mut self, text: &str, x: f64, y: f64, fill: &str) {
        self.labels.push(format!(
            r#"{}<text class="{}label" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}" fill="{}">{}</text>"#,
            self.indent_str(),
            self.prefix(),
            num(x),
            num(y),
            num(LABEL_FONT_SIZE),
            fill,
            escape_xml(text)
        ));
    }

    /// Build the final SVG string
    pub fn build(self) -> String {
        let nl = self.newline();
        let (w, h) = (num(self.config.width_px), num(self.config.height_px));

        let mut svg = String::new();
        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ));
        svg.push_str(nl);

        // Labels go last so they sit on top of every shape
        for elem in self
            .background
            .iter()
            .chain(&self.elements)
            .chain(&self.labels)
        {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Render a scene with the default stylesheet
pub fn render_svg(scene: &Scene, config: &SvgConfig) -> String {
    render_svg_with_stylesheet(scene, config, &Stylesheet::default())
}

/// Render a scene top-down
///
/// The canvas is stretched onto the configured pixel viewport. Blocks are
/// drawn as rectangles, ramps as dashed quadrilaterals rotated by their yaw.
pub fn render_svg_with_stylesheet(
    scene: &Scene,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    let sx = config.width_px / scene.grid_w;
    let sy = config.height_px / scene.grid_h;

    builder.add_background(&stylesheet.resolve_or_default("background"));
    if config.show_grid && scene.grid_step > 0.0 {
        let stroke = stylesheet.resolve_or_default("grid-line");
        let columns = (scene.grid_w / scene.grid_step + 1e-9).floor() as usize;
        for i in 0..=columns {
            let x = i as f64 * scene.grid_step * sx;
            builder.add_grid_line(x, 0.0, x, config.height_px, &stroke);
        }
        let rows = (scene.grid_h / scene.grid_step + 1e-9).floor() as usize;
        for j in 0..=rows {
            let y = j as f64 * scene.grid_step * sy;
            builder.add_grid_line(0.0, y, config.width_px, y, &stroke);
        }
    }

    let block_styles = format!(
        r#" fill="{}" stroke="{}" stroke-width="1.5""#,
        stylesheet.resolve_or_default("block-fill"),
        stylesheet.resolve_or_default("block-stroke")
    );
    let ramp_styles = format!(
        r#" fill="{}" fill-opacity="0.8" stroke="{}" stroke-width="1.5" stroke-dasharray="{}""#,
        stylesheet.resolve_or_default("ramp-fill"),
        stylesheet.resolve_or_default("ramp-stroke"),
        RAMP_DASH
    );
    let text_fill = stylesheet.resolve_or_default("label-text");

    let (ramps, blocks): (Vec<&SceneObject>, Vec<&SceneObject>) = scene
        .objects
        .values()
        .partition(|o| o.primitive == Primitive::Ramp);

    for object in blocks {
        let classes = match object.primitive {
            Primitive::Plane => vec!["plane".to_string()],
            _ => vec![],
        };
        builder.add_rect(
            Some(object.label.as_str()),
            object.left() * sx,
            object.top() * sy,
            object.w * sx,
            object.h * sy,
            &classes,
            &block_styles,
        );
        builder.add_label(object.label.as_str(), object.x * sx, object.y * sy, &text_fill);
    }

    for ramp in ramps {
        let corners: Vec<Point> = ramp_corners(ramp)
            .iter()
            .map(|p| Point::new(p.x * sx, p.y * sy))
            .collect();
        builder.add_polygon(Some(ramp.label.as_str()), &corners, &[], &ramp_styles);
        builder.add_label(ramp.label.as_str(), ramp.x * sx, ramp.y * sy, &text_fill);
    }

    builder.build()
}

/// Footprint corners of a ramp in canvas units.
///
/// `w` runs along the ramp's direction and `h` across it. The direction comes
/// from the yaw, measured counter-clockwise with y pointing down.
pub fn ramp_corners(ramp: &SceneObject) -> [Point; 4] {
    let yaw = ramp.tilt.map(|t| t.yaw).unwrap_or(0.0).to_radians();
    let (ux, uy) = (yaw.cos(), -yaw.sin());
    let (nx, ny) = (-uy, ux);
    let (hl, hw) = (ramp.w / 2.0, ramp.h / 2.0);
    let corner = |a: f64, b: f64| {
        Point::new(
            ramp.x + a * hl * ux + b * hw * nx,
            ramp.y + a * hl * uy + b * hw * ny,
        )
    };
    [
        corner(-1.0, -1.0),
        corner(1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, 1.0),
    ]
}

/// Format a coordinate with at most two decimals
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{}", rounded)
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Label, Tilt};
    use std::collections::BTreeMap;

    fn block(label: &str, x: f64, y: f64, w: f64, h: f64) -> SceneObject {
        SceneObject {
            label: Label::new(label).unwrap(),
            x,
            y,
            w,
            h,
            primitive: Primitive::Cube,
            height: 1.0,
            z_offset: 0.5,
            tilt: None,
            ramp: None,
        }
    }

    fn scene(objects: Vec<SceneObject>) -> Scene {
        Scene {
            grid_w: 40.0,
            grid_h: 30.0,
            grid_step: 0.5,
            objects: objects
                .into_iter()
                .map(|o| (o.label.clone(), o))
                .collect::<BTreeMap<_, _>>(),
            constraints: vec![],
            anchors: BTreeMap::new(),
        }
    }

    #[test]
    fn test_num_trims_noise() {
        assert_eq!(num(20.0), "20");
        assert_eq!(num(266.666666), "266.67");
        assert_eq!(num(-0.0), "0");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
    }

    #[test]
    fn test_block_maps_to_pixels() {
        let svg = render_svg(
            &scene(vec![block("A", 2.0, 3.0, 2.0, 2.0)]),
            &SvgConfig::default().with_grid(false),
        );
        // 20 px per unit on both axes
        assert!(svg.contains(r#"id="A" class="gb-block" x="20" y="40" width="40" height="40""#));
        assert!(svg.contains(r#"x="40" y="60" text-anchor="middle""#));
        assert!(!svg.contains("gb-grid"));
    }

    #[test]
    fn test_grid_lines_every_step() {
        let svg = render_svg(&scene(vec![]), &SvgConfig::default());
        // 81 vertical and 61 horizontal lines
        assert_eq!(svg.matches("gb-grid").count(), 81 + 61);
    }

    #[test]
    fn test_ramp_corners_follow_yaw() {
        let mut ramp = block("R", 5.0, 5.0, 4.0, 2.0);
        ramp.primitive = Primitive::Ramp;
        ramp.tilt = Some(Tilt {
            pitch: 10.0,
            roll: 0.0,
            yaw: 90.0,
        });
        // Yaw 90 points toward smaller y, so the long side is vertical
        let corners = ramp_corners(&ramp);
        let xs: Vec<f64> = corners.iter().map(|p| (p.x * 1e9).round() / 1e9).collect();
        let ys: Vec<f64> = corners.iter().map(|p| (p.y * 1e9).round() / 1e9).collect();
        assert_eq!(xs.iter().cloned().fold(f64::MIN, f64::max), 6.0);
        assert_eq!(xs.iter().cloned().fold(f64::MAX, f64::min), 4.0);
        assert_eq!(ys.iter().cloned().fold(f64::MIN, f64::max), 7.0);
        assert_eq!(ys.iter().cloned().fold(f64::MAX, f64::min), 3.0);
    }

    #[test]
    fn test_ramp_is_dashed_polygon() {
        let mut ramp = block("RAMP_A_B", 10.0, 10.0, 4.0, 2.0);
        ramp.primitive = Primitive::Ramp;
        let svg = render_svg(&scene(vec![ramp]), &SvgConfig::default().with_grid(false));
        assert!(svg.contains(r#"<polygon id="RAMP_A_B" class="gb-ramp""#));
        assert!(svg.contains(r#"points="160,180 240,180 240,220 160,220""#));
        assert!(svg.contains("stroke-dasharray=\"6 4\""));
    }

    #[test]
    fn test_compact_output() {
        let config = SvgConfig::default()
            .with_grid(false)
            .with_pretty_print(false)
            .with_standalone(false);
        let svg = render_svg(&scene(vec![]), &config);
        insta::assert_snapshot!(svg, @r##"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600" viewBox="0 0 800 600"><rect class="gb-background" x="0" y="0" width="800" height="600" fill="#ffffff"/></svg>"##);
    }
}
