//! SVG rendering of chart specifications in the house style
//!
//! White background, bold title, only the left and bottom axes, light
//! horizontal grid lines, palette colours. The illustrative caption is
//! decided by the caller from the data provenance, never by the model.

use super::spec::{ChartSpec, ChartType, DataPoint};
use crate::config::BrandPalette;
use crate::error::GraphicsError;
use std::fmt::Write;

/// Caption added under the title when the values are invented
pub const ILLUSTRATIVE_CAPTION: &str = "(Illustrative example data)";

const FONT: &str = "Helvetica, Arial, sans-serif";
const GRID_COLOUR: &str = "#E5E5E5";
const Y_TICKS: f64 = 5.0;
const MAX_GRID_LINES: f64 = 50.0;

/// Rendering inputs besides the spec
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    /// Canvas width in px
    pub width: u32,
    /// Canvas height in px
    pub height: u32,
    /// Colours
    pub palette: &'a BrandPalette,
    /// Whether to add [`ILLUSTRATIVE_CAPTION`]
    pub illustrative: bool,
}

struct Plot {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
}

impl Plot {
    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Render `spec` to an SVG document
pub fn render_svg(spec: &ChartSpec, options: &RenderOptions<'_>) -> Result<String, GraphicsError> {
    spec.validate()?;
    if options.width < 200 || options.height < 200 {
        return Err(GraphicsError::Render(format!(
            "canvas {}x{} is too small",
            options.width, options.height
        )));
    }

    let (w, h) = (f64::from(options.width), f64::from(options.height));
    let palette = options.palette;
    let mut svg = String::new();

    write_line(
        &mut svg,
        format_args!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"{FONT}\">"
        ),
    );
    write_line(&mut svg, format_args!("<rect width=\"{w}\" height=\"{h}\" fill=\"#FFFFFF\"/>"));
    write_line(
        &mut svg,
        format_args!(
            "<text x=\"{}\" y=\"70\" font-size=\"40\" font-weight=\"bold\" text-anchor=\"middle\" fill=\"{}\">{}</text>",
            w / 2.0,
            palette.dark,
            escape_xml(spec.title.trim())
        ),
    );
    if options.illustrative {
        write_line(
            &mut svg,
            format_args!(
                "<text x=\"{}\" y=\"112\" font-size=\"26\" font-style=\"italic\" text-anchor=\"middle\" fill=\"{}\">{}</text>",
                w / 2.0,
                palette.neutral,
                ILLUSTRATIVE_CAPTION
            ),
        );
    }

    let plot = Plot {
        left: 150.0,
        right: w - 90.0,
        top: 160.0,
        bottom: h - 150.0,
    };

    match spec.chart_type {
        ChartType::Bar => draw_bars(&mut svg, spec, &plot, palette),
        ChartType::Line => draw_line(&mut svg, spec, &plot, palette),
        ChartType::Pie => draw_pie(&mut svg, &spec.points, &plot, palette),
        ChartType::Flow => draw_flow(&mut svg, &spec.steps, &plot, palette),
    }

    if let Some(note) = spec.source_note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        write_line(
            &mut svg,
            format_args!(
                "<text x=\"40\" y=\"{}\" font-size=\"20\" fill=\"{}\">Source: {}</text>",
                h - 24.0,
                palette.neutral,
                escape_xml(note)
            ),
        );
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn write_line(svg: &mut String, args: std::fmt::Arguments<'_>) {
    // Writing into a String cannot fail
    let _ = svg.write_fmt(args);
    svg.push('\n');
}

/// Escape text for use in SVG content and attributes
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Round `raw` up to 1, 2 or 5 times a power of ten
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn format_value(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{}", rounded)
}

struct Axis {
    min: f64,
    max: f64,
    step: f64,
}

impl Axis {
    fn for_points(points: &[DataPoint]) -> Self {
        let lo = points.iter().map(|p| p.value).fold(0.0, f64::min);
        let mut hi = points.iter().map(|p| p.value).fold(0.0, f64::max);
        if hi <= lo {
            hi = lo + 1.0;
        }
        let step = nice_step((hi - lo) / Y_TICKS);
        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    fn y(&self, value: f64, plot: &Plot) -> f64 {
        plot.bottom - (value - self.min) / (self.max - self.min) * plot.height()
    }
}

fn draw_axes(svg: &mut String, spec: &ChartSpec, axis: &Axis, plot: &Plot, palette: &BrandPalette) {
    let intervals = ((axis.max - axis.min) / axis.step).round().clamp(0.0, MAX_GRID_LINES) as usize;
    for i in 0..=intervals {
        let tick = axis.min + i as f64 * axis.step;
        let y = axis.y(tick, plot);
        write_line(
            svg,
            format_args!(
                "<line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"{GRID_COLOUR}\" stroke-width=\"1\"/>",
                plot.left, plot.right
            ),
        );
        write_line(
            svg,
            format_args!(
                "<text x=\"{}\" y=\"{}\" font-size=\"20\" text-anchor=\"end\" fill=\"{}\">{}</text>",
                plot.left - 12.0,
                y + 7.0,
                palette.neutral,
                format_value(tick)
            ),
        );
    }

    // left and bottom spines only
    write_line(
        svg,
        format_args!(
            "<line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\" stroke=\"{c}\" stroke-width=\"2\"/>",
            l = plot.left,
            t = plot.top,
            b = plot.bottom,
            c = palette.neutral
        ),
    );
    let baseline = axis.y(0.0, plot);
    write_line(
        svg,
        format_args!(
            "<line x1=\"{}\" y1=\"{baseline}\" x2=\"{}\" y2=\"{baseline}\" stroke=\"{}\" stroke-width=\"2\"/>",
            plot.left, plot.right, palette.neutral
        ),
    );

    if !spec.x_label.trim().is_empty() {
        write_line(
            svg,
            format_args!(
                "<text x=\"{}\" y=\"{}\" font-size=\"24\" text-anchor=\"middle\" fill=\"{}\">{}</text>",
                (plot.left + plot.right) / 2.0,
                plot.bottom + 90.0,
                palette.neutral,
                escape_xml(spec.x_label.trim())
            ),
        );
    }
    if !spec.y_label.trim().is_empty() {
        let (x, y) = (50.0, (plot.top + plot.bottom) / 2.0);
        write_line(
            svg,
            format_args!(
                "<text x=\"{x}\" y=\"{y}\" font-size=\"24\" text-anchor=\"middle\" fill=\"{}\" transform=\"rotate(-90 {x} {y})\">{}</text>",
                palette.neutral,
                escape_xml(spec.y_label.trim())
            ),
        );
    }
}

fn category_label(svg: &mut String, x: f64, plot: &Plot, label: &str, palette: &BrandPalette) {
    write_line(
        svg,
        format_args!(
            "<text x=\"{x}\" y=\"{}\" font-size=\"20\" text-anchor=\"middle\" fill=\"{}\">{}</text>",
            plot.bottom + 36.0,
            palette.neutral,
            escape_xml(label.trim())
        ),
    );
}

fn draw_bars(svg: &mut String, spec: &ChartSpec, plot: &Plot, palette: &BrandPalette) {
    let axis = Axis::for_points(&spec.points);
    draw_axes(svg, spec, &axis, plot, palette);

    let slot = plot.width() / spec.points.len() as f64;
    let bar_width = slot * 0.6;
    let baseline = axis.y(0.0, plot);
    for (i, point) in spec.points.iter().enumerate() {
        let x = plot.left + i as f64 * slot + slot * 0.2;
        let y = axis.y(point.value, plot);
        let (top, height) = if y < baseline { (y, baseline - y) } else { (baseline, y - baseline) };
        write_line(
            svg,
            format_args!(
                "<rect x=\"{x}\" y=\"{top}\" width=\"{bar_width}\" height=\"{height}\" fill=\"{}\"/>",
                palette.primary
            ),
        );
        write_line(
            svg,
            format_args!(
                "<text x=\"{}\" y=\"{}\" font-size=\"20\" font-weight=\"bold\" text-anchor=\"middle\" fill=\"{}\">{}</text>",
                x + bar_width / 2.0,
                top - 10.0,
                palette.dark,
                format_value(point.value)
            ),
        );
        category_label(svg, x + bar_width / 2.0, plot, &point.label, palette);
    }
}

fn draw_line(svg: &mut String, spec: &ChartSpec, plot: &Plot, palette: &BrandPalette) {
    let axis = Axis::for_points(&spec.points);
    draw_axes(svg, spec, &axis, plot, palette);

    let slot = plot.width() / spec.points.len() as f64;
    let coords: Vec<(f64, f64)> = spec
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (plot.left + (i as f64 + 0.5) * slot, axis.y(p.value, plot)))
        .collect();

    let path = coords
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ");
    write_line(
        svg,
        format_args!(
            "<polyline points=\"{path}\" fill=\"none\" stroke=\"{}\" stroke-width=\"4\"/>",
            palette.primary
        ),
    );
    for ((x, y), point) in coords.iter().zip(&spec.points) {
        write_line(
            svg,
            format_args!("<circle cx=\"{x}\" cy=\"{y}\" r=\"7\" fill=\"{}\"/>", palette.dark),
        );
        category_label(svg, *x, plot, &point.label, palette);
    }
}

fn draw_pie(svg: &mut String, points: &[DataPoint], plot: &Plot, palette: &BrandPalette) {
    let colours = palette.series();
    let total: f64 = points.iter().map(|p| p.value).sum();
    let radius = plot.height() / 2.0;
    let (cx, cy) = (plot.left + plot.width() * 0.3, plot.top + radius);
    let legend_x = plot.left + plot.width() * 0.6;

    let mut angle = -std::f64::consts::FRAC_PI_2;
    for (i, point) in points.iter().enumerate() {
        let colour = colours[i % colours.len()];
        let share = point.value / total;
        let sweep = share * std::f64::consts::TAU;

        if share >= 0.9999 {
            write_line(
                svg,
                format_args!("<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{radius}\" fill=\"{colour}\"/>"),
            );
        } else if share > 0.0 {
            let (x1, y1) = (cx + radius * angle.cos(), cy + radius * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + radius * end.cos(), cy + radius * end.sin());
            let large_arc = u8::from(sweep > std::f64::consts::PI);
            write_line(
                svg,
                format_args!(
                    "<path d=\"M {cx} {cy} L {x1} {y1} A {radius} {radius} 0 {large_arc} 1 {x2} {y2} Z\" fill=\"{colour}\" stroke=\"#FFFFFF\" stroke-width=\"3\"/>"
                ),
            );
        }
        angle += sweep;

        let ly = plot.top + 20.0 + i as f64 * 46.0;
        write_line(
            svg,
            format_args!("<rect x=\"{legend_x}\" y=\"{ly}\" width=\"28\" height=\"28\" fill=\"{colour}\"/>"),
        );
        write_line(
            svg,
            format_args!(
                "<text x=\"{}\" y=\"{}\" font-size=\"22\" fill=\"{}\">{} ({}%)</text>",
                legend_x + 42.0,
                ly + 22.0,
                palette.dark,
                escape_xml(point.label.trim()),
                format_value(share * 100.0)
            ),
        );
    }
}

/// Greedy word wrap to at most `max_chars` per line
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn draw_flow(svg: &mut String, steps: &[String], plot: &Plot, palette: &BrandPalette) {
    write_line(
        svg,
        format_args!(
            "<defs><marker id=\"arrow\" markerWidth=\"12\" markerHeight=\"12\" refX=\"10\" refY=\"6\" orient=\"auto\">\
             <path d=\"M0,0 L12,6 L0,12 Z\" fill=\"{}\"/></marker></defs>",
            palette.neutral
        ),
    );

    let count = steps.len() as f64;
    let gap = 60.0;
    let box_width = (plot.width() - gap * (count - 1.0)) / count;
    let box_height = (plot.height() * 0.45).min(240.0);
    let top = plot.top + (plot.height() - box_height) / 2.0;
    let max_chars = ((box_width - 24.0) / 12.0).max(4.0) as usize;

    for (i, step) in steps.iter().enumerate() {
        let x = plot.left + i as f64 * (box_width + gap);
        let fill = if i == 0 || i + 1 == steps.len() { &palette.dark } else { &palette.primary };
        write_line(
            svg,
            format_args!(
                "<rect x=\"{x}\" y=\"{top}\" width=\"{box_width}\" height=\"{box_height}\" rx=\"14\" fill=\"{fill}\"/>"
            ),
        );

        let lines = wrap_words(step, max_chars);
        let line_height = 28.0;
        let first_y = top + box_height / 2.0 - (lines.len() as f64 - 1.0) * line_height / 2.0 + 8.0;
        for (n, line) in lines.iter().enumerate() {
            write_line(
                svg,
                format_args!(
                    "<text x=\"{}\" y=\"{}\" font-size=\"22\" font-weight=\"bold\" text-anchor=\"middle\" fill=\"#FFFFFF\">{}</text>",
                    x + box_width / 2.0,
                    first_y + n as f64 * line_height,
                    escape_xml(line)
                ),
            );
        }

        if i + 1 < steps.len() {
            let y = top + box_height / 2.0;
            write_line(
                svg,
                format_args!(
                    "<line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"{}\" stroke-width=\"3\" marker-end=\"url(#arrow)\"/>",
                    x + box_width + 6.0,
                    x + box_width + gap - 8.0,
                    palette.neutral
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> ChartSpec {
        ChartSpec::parse(json).unwrap()
    }

    fn options(palette: &BrandPalette, illustrative: bool) -> RenderOptions<'_> {
        RenderOptions {
            width: 1800,
            height: 1012,
            palette,
            illustrative,
        }
    }

    #[test]
    fn test_bar_chart_svg() {
        let palette = BrandPalette::default();
        let svg = render_svg(
            &spec(r#"{"type": "bar", "title": "Q&A <fill>", "points": [{"label": "Q1", "value": 100}, {"label": "Q2", "value": 120}], "source_note": "Gartner"}"#),
            &options(&palette, false),
        )
        .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Q&amp;A &lt;fill&gt;"));
        assert!(svg.contains("fill=\"#0077B5\""));
        assert!(svg.contains(">120<"));
        assert!(svg.contains("Source: Gartner"));
        assert!(!svg.contains(ILLUSTRATIVE_CAPTION));
    }

    #[test]
    fn test_illustrative_caption() {
        let palette = BrandPalette::default();
        let chart = spec(r#"{"type": "line", "title": "t", "points": [{"label": "Jan", "value": 3}, {"label": "Feb", "value": 5}]}"#);
        let svg = render_svg(&chart, &options(&palette, true)).unwrap();
        assert!(svg.contains(ILLUSTRATIVE_CAPTION));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn test_pie_and_flow() {
        let palette = BrandPalette::default();
        let pie = spec(r#"{"type": "pie", "points": [{"label": "A", "value": 1}, {"label": "B", "value": 3}]}"#);
        let svg = render_svg(&pie, &options(&palette, false)).unwrap();
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("B (75%)"));

        let flow = spec(r#"{"type": "flow", "steps": ["Receive returns", "Inspect", "Restock"]}"#);
        let svg = render_svg(&flow, &options(&palette, false)).unwrap();
        assert_eq!(svg.matches("marker-end").count(), 2);
        assert!(svg.contains(">Receive returns<"));
    }

    #[test]
    fn test_rejects_tiny_canvas() {
        let palette = BrandPalette::default();
        let chart = spec(r#"{"type": "bar", "points": [{"label": "A", "value": 1}]}"#);
        let mut opts = options(&palette, false);
        opts.width = 10;
        assert!(matches!(render_svg(&chart, &opts), Err(GraphicsError::Render(_))));
    }

    #[test]
    fn test_grid_lines_are_bounded() {
        let palette = BrandPalette::default();
        let chart = ChartSpec {
            chart_type: ChartType::Bar,
            title: "Extremes".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            points: vec![
                DataPoint { label: "a".to_string(), value: 1.7e308 },
                DataPoint { label: "b".to_string(), value: -1.7e308 },
            ],
            steps: Vec::new(),
            source_note: None,
        };
        let axis = Axis::for_points(&chart.points);
        let mut svg = String::new();
        let plot = Plot { left: 150.0, right: 1710.0, top: 160.0, bottom: 862.0 };
        draw_axes(&mut svg, &chart, &axis, &plot, &palette);
        assert!(svg.matches(GRID_COLOUR).count() <= 51);

        // validation turns the same spec away before drawing
        assert!(matches!(
            render_svg(&chart, &options(&palette, false)),
            Err(GraphicsError::InvalidChartSpec(_))
        ));
    }

    #[test]
    fn test_tick_count_matches_axis() {
        let palette = BrandPalette::default();
        let svg = render_svg(
            &spec(r#"{"type": "bar", "points": [{"label": "A", "value": 100}, {"label": "B", "value": 120}]}"#),
            &options(&palette, false),
        )
        .unwrap();
        // 0 to 150 in steps of 50
        assert_eq!(svg.matches(GRID_COLOUR).count(), 4);
        assert!(svg.contains(">150<"));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(nice_step(24.0), 50.0);
        assert_eq!(nice_step(0.3), 0.5);
        assert_eq!(format_value(120.0), "120");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(wrap_words("one two three four", 9), vec!["one two", "three", "four"]);
    }
}
