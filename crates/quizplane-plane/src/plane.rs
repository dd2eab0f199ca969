//! Personality-plane renderer.
//!
//! Draws points onto a square data space (default −6..6 on both axes) with
//! a grid, arrowed axes, directional captions and per-point labels. Points
//! outside the data space are drawn hollow and dashed at their true
//! position, joined to the plot edge by a dashed connector.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizplane_core::model::QuizResult;

use crate::error::PlaneError;
use crate::geometry::{get_align, Align, PlaneMapping};
use crate::svg::{Document, Element};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const GRID_STROKE: &str = "#eee";
const AXIS_STROKE: &str = "#555";
const ARROW_LENGTH: f64 = 10.0;
const DEFAULT_FILL: &str = "#333";
const DEFAULT_POINT_SIZE: f64 = 6.0;
const OUT_OF_BOUNDS_SCALE: f64 = 0.7;

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneOptions {
    pub width: f64,
    pub height: f64,
    /// Margin between the data square and the image edge.
    pub padding: f64,
    pub show_grid: bool,
    /// Lower bound of the data space on both axes.
    pub min: f64,
    /// Upper bound of the data space on both axes.
    pub max: f64,
    pub captions: AxisCaptions,
}

impl Default for PlaneOptions {
    fn default() -> Self {
        Self {
            width: 680.0,
            height: 680.0,
            padding: 100.0,
            show_grid: true,
            min: -6.0,
            max: 6.0,
            captions: AxisCaptions::default(),
        }
    }
}

impl PlaneOptions {
    /// Replace zero, negative or non-finite dimensions, and a range that is
    /// empty or too wide or too far out to grid, with the defaults.
    fn normalized(&self) -> Self {
        let defaults = Self::default();
        let pick = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };
        let (min, max) = if PlaneMapping::is_drawable_range(self.min, self.max) {
            (self.min, self.max)
        } else {
            (defaults.min, defaults.max)
        };
        Self {
            width: pick(self.width, defaults.width),
            height: pick(self.height, defaults.height),
            padding: pick(self.padding, defaults.padding),
            show_grid: self.show_grid,
            min,
            max,
            captions: self.captions.clone(),
        }
    }
}

/// Fixed captions at the four axis extremes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisCaptions {
    pub positive_x: String,
    pub negative_x: String,
    pub positive_y: String,
    pub negative_y: String,
}

impl Default for AxisCaptions {
    fn default() -> Self {
        Self {
            positive_x: "外向".into(),
            negative_x: "內向".into(),
            positive_y: "神經質".into(),
            negative_y: "穩定".into(),
        }
    }
}

/// A data point to plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
    /// Marker radius; defaults to 6.
    #[serde(default)]
    pub size: Option<f64>,
}

impl PlanePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: None,
            fill: None,
            size: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Point for a result carrying numeric `x` and `y`, labelled with the
    /// result's `label`.
    pub fn from_result(result: &QuizResult) -> Option<Self> {
        let point = Self::new(result.number("x")?, result.number("y")?);
        Some(match result.label() {
            Some(label) => point.with_label(label),
            None => point,
        })
    }

    fn caption(&self) -> String {
        match self.label.as_deref().filter(|l| !l.is_empty()) {
            Some(label) => format!("{label} ({},{})", self.x, self.y),
            None => format!("({},{})", self.x, self.y),
        }
    }
}

/// Styling for a text label.
struct TextStyle<'a> {
    align: Align,
    font_size: f64,
    margin: f64,
    font_weight: u32,
    fill: &'a str,
    stroke: &'a str,
    stroke_width: f64,
}

impl Default for TextStyle<'_> {
    fn default() -> Self {
        Self {
            align: Align::Center,
            font_size: 13.0,
            margin: 6.5,
            font_weight: 600,
            fill: "#000",
            stroke: "",
            stroke_width: 0.0,
        }
    }
}

fn text_label(x: f64, y: f64, text: &str, style: &TextStyle<'_>) -> Element {
    let (dx, dy) = style.align.offset(style.margin);
    Element::new("text")
        .attr("x", x + dx)
        .attr("y", y + dy)
        .attr("text-anchor", style.align.text_anchor())
        .attr("dominant-baseline", style.align.dominant_baseline())
        .attr("font-size", style.font_size)
        .attr("font-weight", style.font_weight)
        .attr("fill", style.fill)
        .attr("stroke", style.stroke)
        .attr("stroke-width", style.stroke_width)
        .text(text)
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
    Element::new("line")
        .attr("x1", x1)
        .attr("y1", y1)
        .attr("x2", x2)
        .attr("y2", y2)
}

fn signed(v: f64) -> String {
    if v > 0.0 {
        format!("+{v}")
    } else {
        format!("{v}")
    }
}

/// Build a standalone `<svg>` element for `points`.
pub fn render_plane(points: &[PlanePoint], options: &PlaneOptions) -> Element {
    let opts = options.normalized();
    let m = PlaneMapping::new(opts.min, opts.max, opts.width, opts.height, opts.padding);
    let inner = m.inner;

    let mut svg = Element::new("svg")
        .attr("xmlns", SVG_NS)
        .attr("viewBox", format!("0 0 {} {}", opts.width, opts.height))
        .attr("width", "100%")
        .attr("height", "100%")
        .attr("preserveAspectRatio", "xMidYMid meet");

    svg.push(
        Element::new("rect")
            .attr("x", 0)
            .attr("y", 0)
            .attr("width", opts.width)
            .attr("height", opts.height)
            .attr("fill", "transparent"),
    );

    if opts.show_grid {
        for xi in m.grid_values() {
            let x = m.map_x(xi);
            svg.push(
                line(x, inner.bottom, x, inner.top)
                    .attr("stroke", GRID_STROKE)
                    .attr("stroke-width", if xi == 0.0 { 2 } else { 1 }),
            );
            if xi != 0.0 {
                svg.push(
                    Element::new("text")
                        .attr("x", x)
                        .attr("y", inner.bottom + 16.0)
                        .attr("text-anchor", "middle")
                        .attr("font-size", 11)
                        .text(xi.to_string()),
                );
            }
        }
        for yi in m.grid_values() {
            let y = m.map_y(yi);
            svg.push(
                line(inner.left, y, inner.right, y)
                    .attr("stroke", GRID_STROKE)
                    .attr("stroke-width", if yi == 0.0 { 2 } else { 1 }),
            );
            if yi != 0.0 {
                svg.push(
                    Element::new("text")
                        .attr("x", inner.left - 10.0)
                        .attr("y", y + 4.0)
                        .attr("text-anchor", "end")
                        .attr("font-size", 11)
                        .text(yi.to_string()),
                );
            }
        }
    }

    // Axes through the data origin
    let axis = |el: Element| {
        el.attr("stroke", AXIS_STROKE)
            .attr("stroke-width", 2)
            .attr("stroke-linecap", "butt")
    };
    svg.push(axis(line(inner.left, m.map_y(0.0), inner.right, m.map_y(0.0))));
    svg.push(axis(line(m.map_x(0.0), inner.top, m.map_x(0.0), inner.bottom)));

    svg.push(
        Element::new("defs").child(
            Element::new("marker")
                .attr("id", "arrow")
                .attr("markerWidth", 10)
                .attr("markerHeight", 10)
                .attr("refX", 5)
                .attr("refY", 5)
                .attr("orient", "auto")
                .child(
                    Element::new("path")
                        .attr("d", "M0,0 L10,5 L0,10 L2,5 z")
                        .attr("fill", "#333"),
                ),
        ),
    );

    let arrow = |x1: f64, y1: f64, x2: f64, y2: f64| {
        line(x1, y1, x2, y2)
            .attr("stroke", AXIS_STROKE)
            .attr("stroke-width", 2)
            .attr("marker-end", "url(#arrow)")
    };
    let (x_min, x_max, x_zero) = (m.map_x(opts.min), m.map_x(opts.max), m.map_x(0.0));
    let (y_min, y_max, y_zero) = (m.map_y(opts.min), m.map_y(opts.max), m.map_y(0.0));
    svg.push(arrow(x_max, y_zero, x_max + ARROW_LENGTH, y_zero));
    svg.push(arrow(x_min, y_zero, x_min - ARROW_LENGTH, y_zero));
    svg.push(arrow(x_zero, y_min, x_zero, y_min + ARROW_LENGTH));
    svg.push(arrow(x_zero, y_max, x_zero, y_max - ARROW_LENGTH));

    let caption = |align| TextStyle {
        align,
        font_size: 20.0,
        margin: 24.0,
        fill: AXIS_STROKE,
        ..TextStyle::default()
    };
    let captions = &opts.captions;
    svg.push(text_label(
        x_max,
        y_zero,
        &format!("{} {}", captions.positive_x, signed(opts.max)),
        &caption(Align::Right),
    ));
    svg.push(text_label(
        x_min,
        y_zero,
        &format!("{} {}", captions.negative_x, signed(opts.min)),
        &caption(Align::Left),
    ));
    svg.push(text_label(
        x_zero,
        y_max,
        &format!("{} {}", captions.positive_y, signed(opts.max)),
        &caption(Align::Top),
    ));
    svg.push(text_label(
        x_zero,
        y_min,
        &format!("{} {}", captions.negative_y, signed(opts.min)),
        &caption(Align::Bottom),
    ));

    let label_size = m.label_size();
    let bounds = m.plot_bounds();
    for point in points {
        let fill = point
            .fill
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILL);
        let size = point
            .size
            .filter(|s| *s != 0.0 && s.is_finite())
            .unwrap_or(DEFAULT_POINT_SIZE);
        let shown = m.map(m.clamp(point.x), m.clamp(point.y));
        let actual = m.map(point.x, point.y);

        if m.contains(point.x, point.y) {
            svg.push(
                Element::new("circle")
                    .attr("cx", shown.x)
                    .attr("cy", shown.y)
                    .attr("r", size)
                    .attr("fill", fill)
                    .attr("stroke", "#fff")
                    .attr("stroke-width", 1.5),
            );
        } else {
            tracing::debug!(x = point.x, y = point.y, "point outside plane");
            svg.push(
                line(shown.x, shown.y, actual.x, actual.y)
                    .attr("stroke", fill)
                    .attr("stroke-width", 1)
                    .attr("stroke-dasharray", "4 4"),
            );
            svg.push(
                Element::new("circle")
                    .attr("stroke-dasharray", "2 2")
                    .attr("stroke", fill)
                    .attr("fill", "none")
                    .attr("cx", actual.x)
                    .attr("cy", actual.y)
                    .attr("r", size * OUT_OF_BOUNDS_SCALE),
            );
        }

        let style = TextStyle {
            align: get_align(label_size, shown, bounds),
            font_size: 20.0,
            margin: size + 2.0,
            font_weight: 700,
            stroke: "#fff",
            stroke_width: 0.1,
            ..TextStyle::default()
        };
        svg.push(text_label(shown.x, shown.y, &point.caption(), &style));
    }

    svg
}

/// Render into `container`, replacing everything it held.
pub fn draw_plane(container: &mut Element, points: &[PlanePoint], options: &PlaneOptions) {
    container.clear_children();
    container.push(render_plane(points, options));
}

/// Render into the element matching `selector`.
pub fn draw_plane_at(
    doc: &mut Document,
    selector: &str,
    points: &[PlanePoint],
    options: &PlaneOptions,
) -> Result<(), PlaneError> {
    let container = doc
        .query_selector_mut(selector)
        .ok_or_else(|| PlaneError::MountNotFound(selector.to_string()))?;
    draw_plane(container, points, options);
    Ok(())
}

/// Render `points` and write a standalone SVG file.
pub fn write_svg(points: &[PlanePoint], options: &PlaneOptions, path: &Path) -> Result<()> {
    let svg = render_plane(points, options);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, svg.to_markup() + "\n")
        .with_context(|| format!("failed to write SVG to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashed_lines(svg: &Element) -> Vec<&Element> {
        svg.find_all("line")
            .into_iter()
            .filter(|l| l.get_attr("stroke-dasharray") == Some("4 4"))
            .collect()
    }

    fn hollow_circles(svg: &Element) -> Vec<&Element> {
        svg.find_all("circle")
            .into_iter()
            .filter(|c| c.get_attr("stroke-dasharray") == Some("2 2"))
            .collect()
    }

    fn solid_circles(svg: &Element) -> Vec<&Element> {
        svg.find_all("circle")
            .into_iter()
            .filter(|c| c.get_attr("stroke-dasharray").is_none())
            .collect()
    }

    #[test]
    fn out_of_bounds_point_is_dashed_and_hollow() {
        let svg = render_plane(
            &[PlanePoint::new(7.2, -7.0).with_label("超出邊界")],
            &PlaneOptions::default(),
        );
        assert_eq!(dashed_lines(&svg).len(), 1);
        let hollow = hollow_circles(&svg);
        assert_eq!(hollow.len(), 1);
        assert_eq!(hollow[0].get_attr("fill"), Some("none"));
        assert!(solid_circles(&svg).is_empty());

        // Connector runs from the clamped corner to the true position
        let connector = dashed_lines(&svg)[0];
        assert_eq!(connector.get_attr("x1"), Some("580"));
        assert_eq!(connector.get_attr("y1"), Some("580"));
        assert_eq!(hollow[0].get_attr("cx"), connector.get_attr("x2"));
        assert_eq!(hollow[0].get_attr("cy"), connector.get_attr("y2"));
        assert_eq!(hollow[0].get_attr("r"), Some(&*(6.0 * 0.7).to_string()));
    }

    #[test]
    fn in_bounds_point_is_solid() {
        let svg = render_plane(&[PlanePoint::new(4.5, 3.2)], &PlaneOptions::default());
        assert!(dashed_lines(&svg).is_empty());
        assert!(hollow_circles(&svg).is_empty());
        let solid = solid_circles(&svg);
        assert_eq!(solid.len(), 1);
        assert_eq!(solid[0].get_attr("r"), Some("6"));
        assert_eq!(solid[0].get_attr("stroke"), Some("#fff"));
        assert_eq!(solid[0].get_attr("fill"), Some("#333"));
    }

    #[test]
    fn boundary_points_are_in_bounds() {
        let svg = render_plane(
            &[PlanePoint::new(6.0, -6.0), PlanePoint::new(-6.0, 0.0)],
            &PlaneOptions::default(),
        );
        assert_eq!(solid_circles(&svg).len(), 2);
        assert!(dashed_lines(&svg).is_empty());
    }

    #[test]
    fn mixed_points_get_matching_styles() {
        let points = vec![
            PlanePoint::new(4.5, 3.2).with_label("P1"),
            PlanePoint::new(-5.5, 5.8).with_label("P2").with_fill("#e67e22"),
            PlanePoint::new(0.0, 9.0).with_label("P3"),
        ];
        let svg = render_plane(&points, &PlaneOptions::default());
        assert_eq!(solid_circles(&svg).len(), 2);
        assert_eq!(hollow_circles(&svg).len(), 1);
        assert_eq!(dashed_lines(&svg).len(), 1);
        assert!(solid_circles(&svg)
            .iter()
            .any(|c| c.get_attr("fill") == Some("#e67e22")));
    }

    #[test]
    fn labels_show_caption_and_raw_coordinates() {
        let svg = render_plane(
            &[
                PlanePoint::new(7.2, -7.0).with_label("超出邊界"),
                PlanePoint::new(1.0, 2.5),
            ],
            &PlaneOptions::default(),
        );
        let texts: Vec<String> = svg.find_all("text").iter().map(|t| t.text_content()).collect();
        assert!(texts.contains(&"超出邊界 (7.2,-7)".to_string()));
        assert!(texts.contains(&"(1,2.5)".to_string()));
    }

    #[test]
    fn label_corner_follows_available_space() {
        let svg = render_plane(
            &[PlanePoint::new(0.0, 0.0).with_label("mid")],
            &PlaneOptions::default(),
        );
        let label = svg
            .find_all("text")
            .into_iter()
            .find(|t| t.text_content().starts_with("mid"))
            .unwrap();
        // top-right: start anchor, above the point by size + 2
        assert_eq!(label.get_attr("text-anchor"), Some("start"));
        assert_eq!(label.get_attr("dominant-baseline"), Some("text-after-edge"));
        assert_eq!(label.get_attr("x"), Some("348"));
        assert_eq!(label.get_attr("y"), Some("332"));
    }

    #[test]
    fn grid_lines_and_ticks() {
        let svg = render_plane(&[], &PlaneOptions::default());
        let grid: Vec<&Element> = svg
            .find_all("line")
            .into_iter()
            .filter(|l| l.get_attr("stroke") == Some("#eee"))
            .collect();
        assert_eq!(grid.len(), 26);
        assert_eq!(
            grid.iter()
                .filter(|l| l.get_attr("stroke-width") == Some("2"))
                .count(),
            2
        );
        let ticks = svg
            .find_all("text")
            .into_iter()
            .filter(|t| t.get_attr("font-size") == Some("11"))
            .count();
        assert_eq!(ticks, 24);
    }

    #[test]
    fn grid_can_be_disabled() {
        let opts = PlaneOptions {
            show_grid: false,
            ..PlaneOptions::default()
        };
        let svg = render_plane(&[], &opts);
        assert!(svg
            .find_all("line")
            .iter()
            .all(|l| l.get_attr("stroke") != Some("#eee")));
    }

    #[test]
    fn axes_arrows_and_captions() {
        let svg = render_plane(&[], &PlaneOptions::default());
        let arrows = svg
            .find_all("line")
            .into_iter()
            .filter(|l| l.get_attr("marker-end") == Some("url(#arrow)"))
            .count();
        assert_eq!(arrows, 4);
        assert_eq!(svg.find_all("marker").len(), 1);
        let texts: Vec<String> = svg.find_all("text").iter().map(|t| t.text_content()).collect();
        for caption in ["外向 +6", "內向 -6", "神經質 +6", "穩定 -6"] {
            assert!(texts.contains(&caption.to_string()), "missing {caption}");
        }
    }

    #[test]
    fn zero_dimensions_fall_back_to_defaults() {
        let opts = PlaneOptions {
            width: 0.0,
            height: 0.0,
            padding: 0.0,
            ..PlaneOptions::default()
        };
        let svg = render_plane(&[], &opts);
        assert_eq!(svg.get_attr("viewBox"), Some("0 0 680 680"));
    }

    #[test]
    fn ungriddable_ranges_fall_back_to_defaults() {
        for (min, max) in [(1e16, 1.0000000000000004e16), (-1e12, 1e12)] {
            let opts = PlaneOptions {
                min,
                max,
                ..PlaneOptions::default()
            };
            let svg = render_plane(&[], &opts);
            let texts: Vec<String> =
                svg.find_all("text").iter().map(|t| t.text_content()).collect();
            assert!(texts.contains(&"外向 +6".to_string()));
        }
    }

    #[test]
    fn custom_range_changes_bounds() {
        let opts = PlaneOptions {
            min: -3.0,
            max: 3.0,
            ..PlaneOptions::default()
        };
        let svg = render_plane(&[PlanePoint::new(4.0, 0.0)], &opts);
        assert_eq!(hollow_circles(&svg).len(), 1);
        let texts: Vec<String> = svg.find_all("text").iter().map(|t| t.text_content()).collect();
        assert!(texts.contains(&"外向 +3".to_string()));
    }

    #[test]
    fn draw_replaces_previous_children() {
        let mut doc = Document::new().with_mount("plane");
        doc.query_selector_mut("#plane")
            .unwrap()
            .push(Element::new("p").text("old"));

        let points = [PlanePoint::new(1.0, 1.0)];
        draw_plane_at(&mut doc, "#plane", &points, &PlaneOptions::default()).unwrap();
        let first = doc.to_markup();
        draw_plane_at(&mut doc, "#plane", &points, &PlaneOptions::default()).unwrap();

        let mount = doc.query_selector("#plane").unwrap();
        assert_eq!(mount.elements().count(), 1);
        assert_eq!(mount.elements().next().unwrap().name(), "svg");
        assert!(mount.find_all("p").is_empty());
        assert_eq!(doc.to_markup(), first);
    }

    #[test]
    fn missing_mount_is_an_error() {
        let mut doc = Document::new();
        let err = draw_plane_at(&mut doc, "#plane", &[], &PlaneOptions::default()).unwrap_err();
        assert!(matches!(err, PlaneError::MountNotFound(ref s) if s == "#plane"));
    }

    #[test]
    fn point_from_result() {
        let result = QuizResult::new()
            .with("x", 2.0)
            .with("y", -1.5)
            .with("label", "熱情");
        let point = PlanePoint::from_result(&result).unwrap();
        assert_eq!((point.x, point.y), (2.0, -1.5));
        assert_eq!(point.label.as_deref(), Some("熱情"));
        assert!(PlanePoint::from_result(&QuizResult::new().with("score", 1.0)).is_none());
    }

    #[test]
    fn write_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/plane.svg");
        write_svg(&[PlanePoint::new(1.0, 1.0)], &PlaneOptions::default(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(content.contains("<circle"));
    }
}
