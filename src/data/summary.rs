use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredSet;
use super::model::{Column, Season};

// ---------------------------------------------------------------------------
// Boxplot statistics per season
// ---------------------------------------------------------------------------

/// Distribution summary of one column within one season.
///
/// Whiskers reach the most extreme values within 1.5 x IQR of the quartiles;
/// anything beyond is listed in `outliers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxplotStats {
    pub season: Season,
    pub column: Column,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

const WHISKER_IQR_FACTOR: f64 = 1.5;

impl BoxplotStats {
    /// `sorted` must be non-empty and ascending.
    fn from_sorted(season: Season, column: Column, sorted: &[f64]) -> Self {
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let q1 = quantile(sorted, 0.25);
        let median = quantile(sorted, 0.5);
        let q3 = quantile(sorted, 0.75);

        let reach = WHISKER_IQR_FACTOR * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(min);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(max);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Self {
            season,
            column,
            count: sorted.len(),
            min,
            q1,
            median,
            q3,
            max,
            whisker_low,
            whisker_high,
            outliers,
        }
    }
}

/// Quantile with linear interpolation between the closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// One [`BoxplotStats`] per season that has at least one value of `column`.
pub fn season_boxplots(filtered: &FilteredSet<'_>, column: Column) -> Vec<BoxplotStats> {
    let mut by_season: BTreeMap<Season, Vec<f64>> = BTreeMap::new();
    for obs in filtered {
        if let Some(value) = obs.value(column) {
            by_season.entry(obs.season).or_default().push(value);
        }
    }

    by_season
        .into_iter()
        .map(|(season, mut values)| {
            values.sort_by(f64::total_cmp);
            BoxplotStats::from_sorted(season, column, &values)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub season: Season,
}

/// Pair `x` and `y` for every row where both are present, keeping row order.
pub fn scatter_points(filtered: &FilteredSet<'_>, x: Column, y: Column) -> Vec<ScatterPoint> {
    filtered
        .iter()
        .filter_map(|obs| {
            Some(ScatterPoint {
                x: obs.value(x)?,
                y: obs.value(y)?,
                season: obs.season,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_observations, FilterCriteria};
    use crate::data::model::{Dataset, Observation};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn winter_pm25(values: &[f64]) -> Dataset {
        let rows = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Observation::new(at(1, i as u32 + 1), Season::Winter).with(Column::Pm25, v)
            })
            .collect();
        Dataset::from_observations(rows).unwrap()
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn boxplot_separates_outliers_from_whiskers() {
        let ds = winter_pm25(&[5.0, 1.0, 100.0, 3.0, 2.0, 4.0]);
        let all = filter_observations(ds.observations(), &FilterCriteria::spanning(&ds));

        let stats = season_boxplots(&all, Column::Pm25);

        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.season, Season::Winter);
        assert_eq!(s.count, 6);
        assert_eq!((s.min, s.max), (1.0, 100.0));
        assert_eq!(s.q1, 2.25);
        assert_eq!(s.median, 3.5);
        assert_eq!(s.q3, 4.75);
        assert_eq!((s.whisker_low, s.whisker_high), (1.0, 5.0));
        assert_eq!(s.outliers, vec![100.0]);
    }

    #[test]
    fn boxplots_skip_missing_values_and_empty_seasons() {
        let mut rows = vec![
            Observation::new(at(1, 1), Season::Winter).with(Column::Pm10, 10.0),
            Observation::new(at(4, 1), Season::Spring).with(Column::Pm10, 20.0),
            Observation::new(at(7, 1), Season::Summer),
        ];
        rows.push(Observation::new(at(4, 2), Season::Spring).with(Column::Pm10, 30.0));
        let ds = Dataset::from_observations(rows).unwrap();
        let all = filter_observations(ds.observations(), &FilterCriteria::spanning(&ds));

        let stats = season_boxplots(&all, Column::Pm10);

        let seasons: Vec<Season> = stats.iter().map(|s| s.season).collect();
        assert_eq!(seasons, vec![Season::Winter, Season::Spring]);
        assert_eq!(stats[1].median, 25.0);
    }

    #[test]
    fn scatter_keeps_only_complete_pairs() {
        let ds = Dataset::from_observations(vec![
            Observation::new(at(1, 1), Season::Winter)
                .with(Column::Wspm, 1.5)
                .with(Column::Pm25, 90.0),
            Observation::new(at(1, 2), Season::Winter).with(Column::Wspm, 3.0),
            Observation::new(at(7, 1), Season::Summer)
                .with(Column::Wspm, 4.0)
                .with(Column::Pm25, 20.0),
        ])
        .unwrap();
        let all = filter_observations(ds.observations(), &FilterCriteria::spanning(&ds));

        let points = scatter_points(&all, Column::Wspm, Column::Pm25);

        assert_eq!(
            points,
            vec![
                ScatterPoint {
                    x: 1.5,
                    y: 90.0,
                    season: Season::Winter
                },
                ScatterPoint {
                    x: 4.0,
                    y: 20.0,
                    season: Season::Summer
                },
            ]
        );
    }
}
