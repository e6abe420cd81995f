use serde::Serialize;

use crate::data::aggregate::{
    aggregate_by_hour_and_season, aggregate_by_year, AggregateRow, HourSeason, Year,
    HOURLY_POLLUTANTS, YEARLY_POLLUTANTS,
};
use crate::data::filter::{filter_observations, FilterCriteria};
use crate::data::model::{Column, Dataset};
use crate::data::summary::{scatter_points, season_boxplots, BoxplotStats, ScatterPoint};

pub const NO_DATA_MESSAGE: &str = "No data available for the selected range.";

// ---------------------------------------------------------------------------
// Dashboard view – the data behind every panel for one set of criteria
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub criteria: FilterCriteria,
    /// Number of observations passing the filter.
    pub row_count: usize,
    pub status: Option<&'static str>,

    // Seasonal distribution of particulate matter.
    pub pm25_by_season: Vec<BoxplotStats>,
    pub pm10_by_season: Vec<BoxplotStats>,

    // Wind speed against PM2.5, coloured by season.
    pub wind_vs_pm25: Vec<ScatterPoint>,

    // SO2 / NO2 / CO per hour of day and season.
    pub hourly: Vec<AggregateRow<HourSeason>>,

    // Rainfall against particulate matter.
    pub rain_vs_pm25: Vec<ScatterPoint>,
    pub rain_vs_pm10: Vec<ScatterPoint>,

    // PM2.5 / PM10 trend per year.
    pub yearly: Vec<AggregateRow<Year>>,
}

impl DashboardView {
    /// Filter `dataset` and derive every panel from the filtered rows.
    pub fn compute(dataset: &Dataset, criteria: &FilterCriteria) -> Self {
        let filtered = filter_observations(dataset.observations(), criteria);
        log::debug!(
            "{} of {} observations match {} to {} ({})",
            filtered.len(),
            dataset.len(),
            criteria.start_date(),
            criteria.end_date(),
            criteria.season()
        );

        Self {
            criteria: *criteria,
            row_count: filtered.len(),
            status: filtered.is_empty().then_some(NO_DATA_MESSAGE),
            pm25_by_season: season_boxplots(&filtered, Column::Pm25),
            pm10_by_season: season_boxplots(&filtered, Column::Pm10),
            wind_vs_pm25: scatter_points(&filtered, Column::Wspm, Column::Pm25),
            hourly: aggregate_by_hour_and_season(&filtered, &HOURLY_POLLUTANTS),
            rain_vs_pm25: scatter_points(&filtered, Column::Rain, Column::Pm25),
            rain_vs_pm10: scatter_points(&filtered, Column::Rain, Column::Pm10),
            yearly: aggregate_by_year(&filtered, &YEARLY_POLLUTANTS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}
