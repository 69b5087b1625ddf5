//! Declarative chart model, serialized in the charting library's camelCase shape.

use scrobstats_common::CategorySeries;
use serde::{Deserialize, Serialize};

/// A chart: its series and its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Data series.
    pub series: Vec<ChartSeries>,
    /// Rendering options.
    pub chart_options: ChartOptions,
}

/// One data series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Legend label; single-series charts leave it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Values.
    pub data: SeriesData,
}

/// Series values: plain numbers aligned to the x axis, or labelled points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesData {
    /// One value per x-axis category.
    Values(Vec<i64>),
    /// Self-labelled points, used by treemaps.
    Points(Vec<DataPoint>),
}

impl SeriesData {
    /// Number of values or points.
    pub fn len(&self) -> usize {
        match self {
            Self::Values(values) => values.len(),
            Self::Points(points) => points.len(),
        }
    }

    /// True when there is no data.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Labelled point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Label.
    pub x: String,
    /// Value.
    pub y: i64,
}

/// Chart options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// Labels; unused by the bar and treemap kinds but always present.
    pub labels: Vec<String>,
    /// Colour theme.
    pub theme: Theme,
    /// Tooltip styling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    /// Title.
    pub title: Title,
    /// Chart kind and stacking.
    pub chart: ChartKind,
    /// Per-kind plot options.
    pub plot_options: PlotOptions,
    /// Value labels on the plot.
    pub data_labels: DataLabels,
    /// Legend.
    pub legend: Legend,
    /// X axis.
    pub xaxis: XAxis,
    /// Y axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<YAxis>,
}

/// Colour theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Named palette.
    pub palette: String,
}

/// Tooltip styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooltip {
    /// `dark` or `light`.
    pub theme: String,
}

/// Chart title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Text.
    pub text: String,
    /// Alignment.
    pub align: String,
    /// Font styling.
    pub style: TitleStyle,
}

/// Title font styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleStyle {
    /// CSS colour.
    pub color: String,
    /// CSS font size.
    pub font_size: String,
}

/// Chart kind and stacking mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartKind {
    /// `bar` or `treemap`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Stack the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacked: Option<bool>,
    /// Stacking mode, `100%` for proportional stacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_type: Option<String>,
}

/// Per-kind plot options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Bar options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar: Option<BarOptions>,
    /// Treemap options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treemap: Option<TreemapOptions>,
}

/// Bar plot options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarOptions {
    /// Bar width relative to the slot.
    pub column_width: String,
    /// One colour per bar instead of per series.
    pub distributed: bool,
}

/// Treemap plot options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreemapOptions {
    /// One colour per cell.
    pub distributed: bool,
    /// Shade cells by value.
    pub enable_shades: bool,
}

/// Value labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLabels {
    /// Show them.
    pub enabled: bool,
}

/// Legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    /// Show it.
    pub show: bool,
    /// Label styling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LegendLabels>,
}

/// Legend label styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendLabels {
    /// CSS colour.
    pub colors: String,
}

/// X axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XAxis {
    /// Category labels, one per value of each series.
    pub categories: Vec<String>,
    /// Label styling.
    pub labels: AxisLabels,
}

/// Axis label styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLabels {
    /// Font styling.
    pub style: AxisStyle,
    /// Label rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<i32>,
}

/// Axis font styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisStyle {
    /// CSS colour.
    pub colors: String,
    /// CSS font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

/// Y axis: a single axis or a list of axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YAxis {
    /// One axis.
    Single(YAxisOptions),
    /// Several axes.
    Multiple(Vec<YAxisOptions>),
}

/// One y axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YAxisOptions {
    /// Axis title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Label styling.
    pub labels: AxisLabels,
}

impl ChartConfig {
    /// The x-axis category labels.
    pub fn categories(&self) -> &[String] {
        &self.chart_options.xaxis.categories
    }

    /// Replace the x-axis category labels.
    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.chart_options.xaxis.categories = categories;
    }

    /// Replace every series with named multi-period series.
    pub fn set_category_series(&mut self, series: Vec<CategorySeries>) {
        self.series = series
            .into_iter()
            .map(|s| ChartSeries {
                name: Some(s.name),
                data: SeriesData::Values(s.data),
            })
            .collect();
    }

    /// Replace the data of the first series, keeping its name.
    pub fn set_primary_data(&mut self, data: SeriesData) {
        match self.series.first_mut() {
            Some(first) => first.data = data,
            None => self.series.push(ChartSeries { name: None, data }),
        }
    }

    /// Palette in use.
    pub fn palette(&self) -> &str {
        &self.chart_options.theme.palette
    }
}
