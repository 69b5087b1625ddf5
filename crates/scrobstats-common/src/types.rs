//! Common type definitions for the category/period statistics model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel value of the selected year meaning "aggregate across all known years".
pub const ALL_YEARS: i32 = -1;

/// One observed count of a named category (decade label, country, tag) within one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category name.
    pub category: String,
    /// Observed count. Passed through uninterpreted.
    pub count: i64,
}

impl CategoryCount {
    /// Creates a new category count.
    pub fn new(category: impl Into<String>, count: i64) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// One period's full breakdown across categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Period identifier, one calendar year in practice.
    pub period_id: String,
    /// Counts observed in this period.
    pub categories: Vec<CategoryCount>,
}

impl PeriodBucket {
    /// Creates a new bucket.
    pub fn new(period_id: impl Into<String>, categories: Vec<CategoryCount>) -> Self {
        Self {
            period_id: period_id.into(),
            categories,
        }
    }
}

/// One category's count at each period index of a shared axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeries {
    /// Category name, used as the legend label.
    pub name: String,
    /// Count per period; always as long as the axis.
    pub data: Vec<i64>,
}

/// The three category distributions the statistics backend precomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticKind {
    /// Release decade of albums.
    Decade,
    /// Artists' country of origin.
    Origin,
    /// Main genre tags.
    Tag,
}

impl StatisticKind {
    /// All kinds, in the order the dashboard fetches them.
    pub const ALL: [Self; 3] = [Self::Decade, Self::Origin, Self::Tag];

    /// Short lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Decade => "decade",
            Self::Origin => "origin",
            Self::Tag => "tag",
        }
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which slice of history a fetch covers, derived from the selected year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearScope {
    /// Every known year, one bucket per year.
    AllYears,
    /// A single calendar year.
    Year(i32),
}

impl YearScope {
    /// Interprets a selected-year value. `-1` is all years, positive values are a
    /// single year and anything else has no scope.
    pub const fn from_selected(selected_year: i32) -> Option<Self> {
        if selected_year == ALL_YEARS {
            Some(Self::AllYears)
        } else if selected_year > 0 {
            Some(Self::Year(selected_year))
        } else {
            None
        }
    }

    /// The year query parameter to send, if any.
    pub const fn year(self) -> Option<i32> {
        match self {
            Self::AllYears => None,
            Self::Year(year) => Some(year),
        }
    }
}

impl fmt::Display for YearScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllYears => f.write_str("all years"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}
