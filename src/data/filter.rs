use chrono::NaiveDate;
use serde::Serialize;

use super::error::CriteriaError;
use super::model::{Dataset, Observation, SeasonFilter};

// ---------------------------------------------------------------------------
// Filter criteria: inclusive date range plus season selector
// ---------------------------------------------------------------------------

/// User-selected filter. `start_date <= end_date` holds for every value.
///
/// Both dates are inclusive calendar days: an observation at 23:59 on
/// `end_date` is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    start_date: NaiveDate,
    end_date: NaiveDate,
    season: SeasonFilter,
}

impl FilterCriteria {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        season: SeasonFilter,
    ) -> Result<Self, CriteriaError> {
        if start_date > end_date {
            return Err(CriteriaError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
            season,
        })
    }

    /// The widest criteria for a dataset: its full date range, every season.
    pub fn spanning(dataset: &Dataset) -> Self {
        Self {
            start_date: dataset.min_date(),
            end_date: dataset.max_date(),
            season: SeasonFilter::All,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn season(&self) -> SeasonFilter {
        self.season
    }

    pub fn with_season(self, season: SeasonFilter) -> Self {
        Self { season, ..self }
    }

    /// Whether a single observation passes both the date and season test.
    pub fn matches(&self, observation: &Observation) -> bool {
        let date = observation.date();
        date >= self.start_date && date <= self.end_date && self.season.matches(observation.season)
    }
}

// ---------------------------------------------------------------------------
// Filtered set: borrowed rows in source order
// ---------------------------------------------------------------------------

/// Observations passing a [`FilterCriteria`], in their original order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredSet<'a> {
    rows: Vec<&'a Observation>,
}

impl<'a> FilteredSet<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a Observation> + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// An empty set is the "no data" state, not a failure.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> FromIterator<&'a Observation> for FilteredSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Observation>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'s, 'a> IntoIterator for &'s FilteredSet<'a> {
    type Item = &'a Observation;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, &'a Observation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter().copied()
    }
}

/// Retain the observations matching `criteria`, preserving order.
///
/// Accepts anything yielding observation references, so both a dataset's
/// rows and an earlier [`FilteredSet`] can be filtered.
pub fn filter_observations<'a, I>(observations: I, criteria: &FilterCriteria) -> FilteredSet<'a>
where
    I: IntoIterator<Item = &'a Observation>,
{
    observations
        .into_iter()
        .filter(|obs| criteria.matches(obs))
        .collect()
}
