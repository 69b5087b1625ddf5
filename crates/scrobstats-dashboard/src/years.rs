//! Year tabs and the selected year.

use scrobstats_api::{ClientStorage, ProfileStore};
use scrobstats_common::ALL_YEARS;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Holds the years the dashboard shows tabs for and which one is selected.
///
/// The selected year starts at [`ALL_YEARS`] and is never a member of the
/// year list. The list only grows, through [`YearManager::add_year`], or is
/// replaced wholesale through [`YearManager::set_years`].
pub struct YearManager {
    selected_year: i32,
    years: Vec<i32>,
    default_year: i32,
    profile: Arc<dyn ProfileStore>,
    storage: ClientStorage,
}

impl std::fmt::Debug for YearManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YearManager")
            .field("selected_year", &self.selected_year)
            .field("years", &self.years)
            .field("default_year", &self.default_year)
            .finish_non_exhaustive()
    }
}

impl YearManager {
    /// Create a manager. An empty `initial_years` starts with `[default_year]`.
    pub fn new(
        initial_years: Vec<i32>,
        default_year: i32,
        profile: Arc<dyn ProfileStore>,
        storage: ClientStorage,
    ) -> Self {
        let years = if initial_years.is_empty() {
            vec![default_year]
        } else {
            dedup_preserving_order(initial_years)
        };

        Self {
            selected_year: ALL_YEARS,
            years,
            default_year,
            profile,
            storage,
        }
    }

    /// The selected year; [`ALL_YEARS`] means every year.
    pub const fn selected_year(&self) -> i32 {
        self.selected_year
    }

    /// The year tabs, in display order.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Select a year. Any value is accepted.
    pub fn select_year(&mut self, year: i32) {
        debug!(year, "Selecting year");
        self.selected_year = year;
    }

    /// Replace the year tabs, keeping the caller's order. The selection is untouched.
    pub fn set_years(&mut self, years: Vec<i32>) {
        debug!(?years, "Replacing years");
        self.years = years;
    }

    /// Add the year before the earliest tab and persist the list.
    ///
    /// Does nothing for an empty user, or when there is no year before the
    /// earliest tab. Persistence goes to the remote profile and to client
    /// storage; failures of either are logged and otherwise ignored. Returns
    /// the added year.
    #[instrument(skip(self))]
    pub async fn add_year(&mut self, user: &str) -> Option<i32> {
        if user.is_empty() {
            debug!("No user, not adding a year");
            return None;
        }

        let year = match self.years.iter().min() {
            Some(earliest) => {
                let Some(year) = earliest.checked_sub(1) else {
                    warn!(earliest, "No year before the earliest tab, not adding a year");
                    return None;
                };
                year
            }
            None => self.default_year,
        };
        self.years.push(year);
        info!(year, "Added year");

        if let Err(e) = self.profile.update_years(user, &self.years).await {
            warn!(error = %e, "Failed to store years on the user profile");
        }
        if let Err(e) = self.storage.set_years(&self.years) {
            warn!(error = %e, "Failed to store years locally");
        }

        Some(year)
    }
}

fn dedup_preserving_order(years: Vec<i32>) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    years.into_iter().filter(|y| seen.insert(*y)).collect()
}
