//! Chart configuration factory.
//!
//! Six charts make up the dashboard: a single-year and an all-years variant
//! for each of decades, country of origin and tags. Single-year charts are
//! plain bars (a treemap for tags); all-years charts are bars stacked to 100%.

use crate::types::*;
use scrobstats_common::StatisticKind;
use serde::{Deserialize, Serialize};

/// Palette used by bar charts when none is given.
pub const DEFAULT_BAR_PALETTE: &str = "palette10";
/// Palette used by the tag treemap when none is given.
pub const DEFAULT_TREEMAP_PALETTE: &str = "palette7";

/// Decade chart title.
pub const DECADES_TITLE: &str = "Albums' Decades";
/// Country-of-origin chart title.
pub const ORIGIN_TITLE: &str = "Artists' Country of Origin";
/// Single-year tag chart title.
pub const TAGS_TITLE: &str = "Music Main Tags";
/// All-years tag chart title.
pub const FULL_TAGS_TITLE: &str = "Top 10 Main Tags by Year";

const TITLE_COLOR: &str = "#f0f0f0";
const TITLE_FONT_SIZE: &str = "18px";
const AXIS_COLOR: &str = "#fff";
const AXIS_FONT_SIZE: &str = "12px";
const COLUMN_WIDTH: &str = "70%";

fn palette_or(palette: &str, fallback: &str) -> String {
    if palette.is_empty() {
        fallback.to_string()
    } else {
        palette.to_string()
    }
}

fn title(text: &str) -> Title {
    Title {
        text: text.to_string(),
        align: "center".to_string(),
        style: TitleStyle {
            color: TITLE_COLOR.to_string(),
            font_size: TITLE_FONT_SIZE.to_string(),
        },
    }
}

fn x_axis() -> XAxis {
    XAxis {
        categories: Vec::new(),
        labels: AxisLabels {
            style: AxisStyle {
                colors: AXIS_COLOR.to_string(),
                font_size: Some(AXIS_FONT_SIZE.to_string()),
            },
            rotate: None,
        },
    }
}

fn y_axis_options(title: Option<&str>) -> YAxisOptions {
    YAxisOptions {
        title: title.map(str::to_string),
        labels: AxisLabels {
            style: AxisStyle {
                colors: AXIS_COLOR.to_string(),
                font_size: None,
            },
            rotate: None,
        },
    }
}

fn bar_options(title_text: &str, palette: &str) -> ChartOptions {
    ChartOptions {
        labels: Vec::new(),
        theme: Theme {
            palette: palette_or(palette, DEFAULT_BAR_PALETTE),
        },
        tooltip: None,
        title: title(title_text),
        chart: ChartKind {
            kind: "bar".to_string(),
            stacked: None,
            stack_type: None,
        },
        plot_options: PlotOptions {
            bar: Some(BarOptions {
                column_width: COLUMN_WIDTH.to_string(),
                distributed: true,
            }),
            treemap: None,
        },
        data_labels: DataLabels { enabled: true },
        legend: Legend {
            show: false,
            labels: None,
        },
        xaxis: x_axis(),
        yaxis: Some(YAxis::Single(y_axis_options(None))),
    }
}

fn stacked_bar_options(title_text: &str, palette: &str) -> ChartOptions {
    ChartOptions {
        labels: Vec::new(),
        theme: Theme {
            palette: palette_or(palette, DEFAULT_BAR_PALETTE),
        },
        tooltip: Some(Tooltip {
            theme: "dark".to_string(),
        }),
        title: title(title_text),
        chart: ChartKind {
            kind: "bar".to_string(),
            stacked: Some(true),
            stack_type: Some("100%".to_string()),
        },
        plot_options: PlotOptions {
            bar: Some(BarOptions {
                column_width: COLUMN_WIDTH.to_string(),
                distributed: false,
            }),
            treemap: None,
        },
        data_labels: DataLabels { enabled: true },
        legend: Legend {
            show: true,
            labels: Some(LegendLabels {
                colors: TITLE_COLOR.to_string(),
            }),
        },
        xaxis: x_axis(),
        yaxis: Some(YAxis::Multiple(vec![y_axis_options(Some("bar"))])),
    }
}

fn empty_single_series() -> Vec<ChartSeries> {
    vec![ChartSeries {
        name: None,
        data: SeriesData::Values(Vec::new()),
    }]
}

fn empty_named_series() -> Vec<ChartSeries> {
    vec![ChartSeries {
        name: Some(String::new()),
        data: SeriesData::Values(Vec::new()),
    }]
}

/// Single-year decade bar chart.
pub fn decades_chart(palette: &str) -> ChartConfig {
    ChartConfig {
        series: empty_single_series(),
        chart_options: bar_options(DECADES_TITLE, palette),
    }
}

/// Single-year country-of-origin bar chart with small, unrotated labels.
pub fn origin_chart(palette: &str) -> ChartConfig {
    let mut options = bar_options(ORIGIN_TITLE, palette);
    options.xaxis.labels.style.font_size = Some("10px".to_string());
    options.xaxis.labels.rotate = Some(0);
    ChartConfig {
        series: empty_single_series(),
        chart_options: options,
    }
}

/// Single-year tag treemap.
pub fn tag_chart(palette: &str) -> ChartConfig {
    ChartConfig {
        series: empty_single_series(),
        chart_options: ChartOptions {
            labels: Vec::new(),
            theme: Theme {
                palette: palette_or(palette, DEFAULT_TREEMAP_PALETTE),
            },
            tooltip: None,
            title: title(TAGS_TITLE),
            chart: ChartKind {
                kind: "treemap".to_string(),
                stacked: None,
                stack_type: None,
            },
            plot_options: PlotOptions {
                bar: None,
                treemap: Some(TreemapOptions {
                    distributed: true,
                    enable_shades: false,
                }),
            },
            data_labels: DataLabels { enabled: true },
            legend: Legend {
                show: false,
                labels: None,
            },
            xaxis: x_axis(),
            yaxis: None,
        },
    }
}

/// All-years decade chart.
pub fn full_decades_chart(palette: &str) -> ChartConfig {
    ChartConfig {
        series: empty_named_series(),
        chart_options: stacked_bar_options(DECADES_TITLE, palette),
    }
}

/// All-years country-of-origin chart.
pub fn full_origin_chart(palette: &str) -> ChartConfig {
    ChartConfig {
        series: empty_named_series(),
        chart_options: stacked_bar_options(ORIGIN_TITLE, palette),
    }
}

/// All-years tag chart.
pub fn full_tags_chart(palette: &str) -> ChartConfig {
    ChartConfig {
        series: empty_named_series(),
        chart_options: stacked_bar_options(FULL_TAGS_TITLE, palette),
    }
}

/// The six dashboard charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSet {
    /// All-years decades.
    pub full_decades_chart: ChartConfig,
    /// All-years country of origin.
    pub full_origin_chart: ChartConfig,
    /// All-years tags.
    pub full_tags_chart: ChartConfig,
    /// Single-year decades.
    pub decades_chart: ChartConfig,
    /// Single-year country of origin.
    pub origin_chart: ChartConfig,
    /// Single-year tags.
    pub tag_chart: ChartConfig,
}

impl ChartSet {
    /// Build every chart with one palette.
    pub fn new(palette: &str) -> Self {
        Self {
            full_decades_chart: full_decades_chart(palette),
            full_origin_chart: full_origin_chart(palette),
            full_tags_chart: full_tags_chart(palette),
            decades_chart: decades_chart(palette),
            origin_chart: origin_chart(palette),
            tag_chart: tag_chart(palette),
        }
    }

    /// The all-years chart of a distribution.
    pub fn full_chart_mut(&mut self, kind: StatisticKind) -> &mut ChartConfig {
        match kind {
            StatisticKind::Decade => &mut self.full_decades_chart,
            StatisticKind::Origin => &mut self.full_origin_chart,
            StatisticKind::Tag => &mut self.full_tags_chart,
        }
    }

    /// The single-year chart of a distribution.
    pub fn single_chart_mut(&mut self, kind: StatisticKind) -> &mut ChartConfig {
        match kind {
            StatisticKind::Decade => &mut self.decades_chart,
            StatisticKind::Origin => &mut self.origin_chart,
            StatisticKind::Tag => &mut self.tag_chart,
        }
    }

    /// Every chart, in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = &ChartConfig> {
        [
            &self.full_decades_chart,
            &self.full_origin_chart,
            &self.full_tags_chart,
            &self.decades_chart,
            &self.origin_chart,
            &self.tag_chart,
        ]
        .into_iter()
    }
}

impl Default for ChartSet {
    fn default() -> Self {
        Self::new(DEFAULT_BAR_PALETTE)
    }
}
