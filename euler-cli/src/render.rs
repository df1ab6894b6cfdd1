//! SVG rendering for concrete diagrams.

use std::fmt::Write;

use euler_core::{concrete::ConcreteDiagram, geometry::contour::Shape, R2};

/// SVG rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Padding around the diagram's bounding box (fraction of its size)
    pub padding: f64,
    /// Stroke width for contour outlines
    pub stroke_width: f64,
    /// Whether to fill contours
    pub fill: bool,
    /// Fill opacity (0.0 - 1.0)
    pub fill_opacity: f64,
    /// Fill for zones drawn but not requested
    pub shade_color: String,
    /// Whether to show contour labels
    pub show_labels: bool,
    /// Whether to mark each zone's center with its label
    pub show_zones: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: 0.05,
            stroke_width: 2.0,
            fill: true,
            fill_opacity: 0.15,
            shade_color: "#bbbbbb".to_string(),
            show_labels: true,
            show_zones: false,
        }
    }
}

/// Color palette for contours, indexed by curve label
const COLORS: &[&str] = &[
    "#e41a1c", // red
    "#377eb8", // blue
    "#4daf4a", // green
    "#984ea3", // purple
    "#ff7f00", // orange
    "#a65628", // brown
    "#f781bf", // pink
    "#999999", // gray
];

fn color(label: char) -> &'static str {
    COLORS[label as usize % COLORS.len()]
}

fn path_data(points: &[R2<f64>]) -> Option<String> {
    let (first, rest) = points.split_first()?;
    let mut d = format!("M {} {}", first.x, first.y);
    for p in rest {
        write!(&mut d, " L {} {}", p.x, p.y).unwrap();
    }
    d.push_str(" Z");
    Some(d)
}

/// Render a diagram to an SVG string sized to its bounding box
pub fn render_svg(diagram: &ConcreteDiagram, config: &RenderConfig) -> String {
    let bbox = diagram.bounding_box();
    let pad = bbox.w.max(bbox.h) * config.padding;
    let (view_x, view_y) = (bbox.x - pad, bbox.y - pad);
    let (view_w, view_h) = (bbox.w + 2.0 * pad, bbox.h + 2.0 * pad);
    let font_size = config.stroke_width * 8.0;

    let mut svg = String::new();

    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        view_w, view_h, view_x, view_y, view_w, view_h
    ).unwrap();

    writeln!(
        &mut svg,
        r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="white"/>"#,
        view_x, view_y, view_w, view_h
    ).unwrap();

    // Shaded zones underneath the contours
    for zone in diagram.shaded_zones() {
        for polygon in zone.shape().polygons() {
            if let Some(d) = path_data(&polygon) {
                writeln!(
                    &mut svg,
                    r#"  <path class="shaded" d="{}" fill="{}" stroke="none"/>"#,
                    d, config.shade_color
                ).unwrap();
            }
        }
    }

    for contour in diagram.contours() {
        let color = color(contour.curve.label);
        let fill = if config.fill {
            format!(r#"fill="{}" fill-opacity="{}""#, color, config.fill_opacity)
        } else {
            r#"fill="none""#.to_string()
        };

        // Label just above the contour's top edge
        let label_at = match &contour.shape {
            Shape::Circle(c) => {
                writeln!(
                    &mut svg,
                    r#"  <circle cx="{}" cy="{}" r="{}" {} stroke="{}" stroke-width="{}"/>"#,
                    c.c.x, c.c.y, c.r, fill, color, config.stroke_width
                ).unwrap();
                R2::new(c.c.x, c.c.y - c.r - font_size * 0.25)
            }
            Shape::Path(p) => {
                let Some(d) = path_data(&p.points) else { continue };
                writeln!(
                    &mut svg,
                    r#"  <path d="{}" {} stroke="{}" stroke-width="{}"/>"#,
                    d, fill, color, config.stroke_width
                ).unwrap();
                let bounds = contour.bounds();
                R2::new(bounds.center().x, bounds.y - font_size * 0.25)
            }
        };

        if config.show_labels {
            writeln!(
                &mut svg,
                r#"  <text x="{}" y="{}" font-size="{}" text-anchor="middle" fill="{}">{}</text>"#,
                label_at.x, label_at.y, font_size, color, contour.curve
            ).unwrap();
        }
    }

    if config.show_zones {
        for zone in diagram.zones() {
            let Some(center) = zone.try_center() else { continue };
            writeln!(
                &mut svg,
                r#"  <text class="zone" x="{}" y="{}" font-size="{}" text-anchor="middle" fill="black">{}</text>"#,
                center.x, center.y, font_size * 0.75, zone.zone.label()
            ).unwrap();
        }
    }

    writeln!(&mut svg, "</svg>").unwrap();

    svg
}
