use serde::Serialize;

pub const X_LABEL: &str = "Simulation Ticks";
pub const Y_LABEL: &str = "Balances";

/// Smallest upper bound of the x axis, whatever the tick count.
pub const MIN_X_MAX: usize = 10;

/// One account's snapshot history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub points: Vec<f64>,
}

/// A line chart with caller-fixed axes.
///
/// Points outside the axis ranges are clipped by whatever draws the chart;
/// the ranges are never derived from the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub series: Vec<Series>,
}

impl Chart {
    pub fn new(title: impl Into<String>, ticks: usize, y_max: f64) -> Self {
        let x_max = ticks.saturating_sub(1).max(MIN_X_MAX);
        Self {
            title: title.into(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            x_range: (0.0, x_max as f64),
            y_range: (0.0, y_max),
            series: Vec::new(),
        }
    }

    pub fn legend(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.label.as_str())
    }
}
