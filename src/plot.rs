use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{Chart, ChartSurface, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ChartFormat {
    /// Standalone SVG line chart
    #[default]
    Svg,
    /// The chart data as JSON, for an external plotting tool
    Json,
}

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 160.0;
const MARGIN_Y: f64 = 50.0;
const FALLBACK_COLOR: &str = "black";

/// Writes one file per chart into a directory, named after the chart title.
#[derive(Debug)]
pub struct FileChartWriter {
    dir: PathBuf,
    format: ChartFormat,
    written: Vec<PathBuf>,
}

impl FileChartWriter {
    pub fn new(dir: impl Into<PathBuf>, format: ChartFormat) -> Result<Self, Error> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            format,
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, title: &str) -> PathBuf {
        let stem: String = title
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let ext = match self.format {
            ChartFormat::Svg => "svg",
            ChartFormat::Json => "json",
        };
        self.dir.join(Path::new(&stem).with_extension(ext))
    }
}

impl ChartSurface for FileChartWriter {
    fn render(&mut self, chart: &Chart) -> Result<(), Error> {
        let body = match self.format {
            ChartFormat::Svg => to_svg(chart)?,
            ChartFormat::Json => serde_json::to_string_pretty(chart)
                .map_err(|e| Error::Chart(e.to_string()))?,
        };
        let path = self.path_for(&chart.title);
        fs::write(&path, body)?;
        info!(path = %path.display(), series = chart.series.len(), "chart written");
        self.written.push(path);
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders a chart as SVG. Points outside the axis ranges are clipped to
/// the plot area.
pub fn to_svg(chart: &Chart) -> Result<String, Error> {
    let mut svg = String::new();
    write_svg(chart, &mut svg).map_err(|e| Error::Chart(e.to_string()))?;
    Ok(svg)
}

fn write_svg(chart: &Chart, svg: &mut String) -> fmt::Result {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - 2.0 * MARGIN_Y;
    let (x_min, x_max) = chart.x_range;
    let (y_min, y_max) = chart.y_range;
    let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
    let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };
    let px = |x: f64| MARGIN_LEFT + (x - x_min) / x_span * plot_w;
    let py = |y: f64| MARGIN_Y + plot_h - (y - y_min) / y_span * plot_h;

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" font-family="sans-serif" font-size="12">"#
    )?;
    writeln!(
        svg,
        r#"<clipPath id="plot"><rect x="{MARGIN_LEFT}" y="{MARGIN_Y}" width="{plot_w}" height="{plot_h}"/></clipPath>"#
    )?;
    writeln!(
        svg,
        r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_Y}" width="{plot_w}" height="{plot_h}" fill="none" stroke="black"/>"#
    )?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        MARGIN_Y / 2.0,
        escape(&chart.title)
    )?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 10.0,
        escape(&chart.x_label)
    )?;
    writeln!(
        svg,
        r#"<text x="15" y="{y}" text-anchor="middle" transform="rotate(-90 15 {y})">{}</text>"#,
        escape(&chart.y_label),
        y = MARGIN_Y + plot_h / 2.0
    )?;
    for (label, x, y) in [
        (x_min, px(x_min), HEIGHT - MARGIN_Y + 15.0),
        (x_max, px(x_max), HEIGHT - MARGIN_Y + 15.0),
    ] {
        writeln!(svg, r#"<text x="{x}" y="{y}" text-anchor="middle">{label}</text>"#)?;
    }
    for (label, y) in [(y_min, py(y_min)), (y_max, py(y_max))] {
        writeln!(
            svg,
            r#"<text x="{}" y="{y}" text-anchor="end">{label}</text>"#,
            MARGIN_LEFT - 5.0
        )?;
    }

    for (i, series) in chart.series.iter().enumerate() {
        let color = if series.color.is_empty() {
            FALLBACK_COLOR
        } else {
            series.color.as_str()
        };
        let points = series
            .points
            .iter()
            .enumerate()
            .map(|(tick, &value)| format!("{:.2},{:.2}", px(tick as f64), py(value)))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            svg,
            r#"<polyline clip-path="url(#plot)" fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            escape(color),
            points
        )?;

        let legend_y = MARGIN_Y + 10.0 + i as f64 * 18.0;
        let legend_x = WIDTH - MARGIN_RIGHT + 15.0;
        writeln!(
            svg,
            r#"<line x1="{legend_x}" y1="{legend_y}" x2="{}" y2="{legend_y}" stroke="{}" stroke-width="2"/>"#,
            legend_x + 20.0,
            escape(color)
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}">{}</text>"#,
            legend_x + 25.0,
            legend_y + 4.0,
            escape(&series.label)
        )?;
    }
    writeln!(svg, "</svg>")
}
