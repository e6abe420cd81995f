use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredSet;
use super::model::{Column, Observation, Season};

/// Pollutants averaged per hour of day and season.
pub const HOURLY_POLLUTANTS: [Column; 3] = [Column::So2, Column::No2, Column::Co];

/// Pollutants averaged per calendar year.
pub const YEARLY_POLLUTANTS: [Column; 2] = [Column::Pm25, Column::Pm10];

// ---------------------------------------------------------------------------
// Group keys
// ---------------------------------------------------------------------------

/// Ordered by hour first, then season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HourSeason {
    pub hour: u32,
    pub season: Season,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Year {
    pub year: i32,
}

// ---------------------------------------------------------------------------
// Result rows
// ---------------------------------------------------------------------------

/// One group: its key and the mean of every requested column.
///
/// A mean is `None` when the group had no non-missing value for that column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow<K> {
    #[serde(flatten)]
    pub key: K,
    pub means: BTreeMap<Column, Option<f64>>,
}

impl<K> AggregateRow<K> {
    pub fn mean(&self, column: Column) -> Option<f64> {
        self.means.get(&column).copied().flatten()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Group `rows` by `key_of` and average each of `columns` per group.
///
/// Missing values are skipped per column, so a row still contributes to the
/// other columns of its group. Output is ascending by key.
pub fn aggregate_by<'a, K, I, F>(rows: I, columns: &[Column], key_of: F) -> Vec<AggregateRow<K>>
where
    K: Ord,
    I: IntoIterator<Item = &'a Observation>,
    F: Fn(&Observation) -> K,
{
    let mut groups: BTreeMap<K, Vec<Mean>> = BTreeMap::new();

    for obs in rows {
        let means = groups
            .entry(key_of(obs))
            .or_insert_with(|| vec![Mean::default(); columns.len()]);
        for (mean, &column) in means.iter_mut().zip(columns) {
            if let Some(value) = obs.value(column) {
                mean.push(value);
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, means)| AggregateRow {
            key,
            means: columns
                .iter()
                .copied()
                .zip(means.iter().map(Mean::value))
                .collect(),
        })
        .collect()
}

/// Means of `columns` per (hour of day, season).
pub fn aggregate_by_hour_and_season(
    filtered: &FilteredSet<'_>,
    columns: &[Column],
) -> Vec<AggregateRow<HourSeason>> {
    aggregate_by(filtered, columns, |obs| HourSeason {
        hour: obs.hour(),
        season: obs.season,
    })
}

/// Means of `columns` per calendar year.
pub fn aggregate_by_year(
    filtered: &FilteredSet<'_>,
    columns: &[Column],
) -> Vec<AggregateRow<Year>> {
    aggregate_by(filtered, columns, |obs| Year { year: obs.year() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_observations, FilterCriteria};
    use crate::data::model::{Dataset, SeasonFilter};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn everything(ds: &Dataset) -> FilteredSet<'_> {
        filter_observations(ds.observations(), &FilterCriteria::spanning(ds))
    }

    #[test]
    fn yearly_groups_are_ascending() {
        let ds = Dataset::from_observations(vec![
            Observation::new(at(2017, 1, 5, 3), Season::Winter)
                .with(Column::Pm25, 80.0)
                .with(Column::Pm10, 120.0),
            Observation::new(at(2013, 3, 1, 0), Season::Spring)
                .with(Column::Pm25, 10.0)
                .with(Column::Pm10, 20.0),
            Observation::new(at(2013, 6, 1, 0), Season::Summer)
                .with(Column::Pm25, 30.0)
                .with(Column::Pm10, 40.0),
        ])
        .unwrap();

        let rows = aggregate_by_year(&everything(&ds), &YEARLY_POLLUTANTS);

        let years: Vec<i32> = rows.iter().map(|r| r.key.year).collect();
        assert_eq!(years, vec![2013, 2017]);
        assert_eq!(rows[0].mean(Column::Pm25), Some(20.0));
        assert_eq!(rows[0].mean(Column::Pm10), Some(30.0));
        assert_eq!(rows[1].mean(Column::Pm25), Some(80.0));
    }

    #[test]
    fn single_record_group_mean_is_its_value() {
        let reading = Observation::new(at(2014, 1, 10, 3), Season::Winter)
            .with(Column::Pm25, 50.0)
            .with(Column::Pm10, 100.0);
        let ds = Dataset::from_observations(vec![reading]).unwrap();

        let rows = aggregate_by_hour_and_season(&everything(&ds), &[Column::Pm25, Column::Pm10]);

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].key,
            HourSeason {
                hour: 3,
                season: Season::Winter
            }
        );
        assert_eq!(rows[0].mean(Column::Pm25), Some(50.0));
        assert_eq!(rows[0].mean(Column::Pm10), Some(100.0));
    }

    #[test]
    fn hourly_groups_order_by_hour_then_season() {
        let ds = Dataset::from_observations(vec![
            Observation::new(at(2014, 10, 1, 5), Season::Autumn).with(Column::So2, 1.0),
            Observation::new(at(2014, 1, 1, 5), Season::Winter).with(Column::So2, 2.0),
            Observation::new(at(2014, 7, 1, 1), Season::Summer).with(Column::So2, 3.0),
            Observation::new(at(2014, 4, 1, 5), Season::Spring).with(Column::So2, 4.0),
        ])
        .unwrap();

        let rows = aggregate_by_hour_and_season(&everything(&ds), &HOURLY_POLLUTANTS);
        let keys: Vec<(u32, Season)> = rows.iter().map(|r| (r.key.hour, r.key.season)).collect();

        assert_eq!(
            keys,
            vec![
                (1, Season::Summer),
                (5, Season::Winter),
                (5, Season::Spring),
                (5, Season::Autumn),
            ]
        );
    }

    #[test]
    fn missing_values_are_excluded_per_column() {
        let mut partial =
            Observation::new(at(2014, 1, 1, 8), Season::Winter).with(Column::No2, 40.0);
        partial.set(Column::So2, None);
        let ds = Dataset::from_observations(vec![
            Observation::new(at(2014, 1, 2, 8), Season::Winter)
                .with(Column::So2, 10.0)
                .with(Column::No2, 20.0),
            partial,
        ])
        .unwrap();

        let rows = aggregate_by_hour_and_season(&everything(&ds), &HOURLY_POLLUTANTS);

        assert_eq!(rows.len(), 1);
        // SO2 only from the first row, NO2 from both.
        assert_eq!(rows[0].mean(Column::So2), Some(10.0));
        assert_eq!(rows[0].mean(Column::No2), Some(30.0));
        // No CO anywhere: the group stays, the mean is undefined.
        assert_eq!(rows[0].mean(Column::Co), None);
        assert!(rows[0].means.contains_key(&Column::Co));
    }

    #[test]
    fn empty_filtered_set_gives_empty_aggregates() {
        let reading = Observation::new(at(2014, 1, 1, 0), Season::Winter).with(Column::Pm25, 1.0);
        let ds = Dataset::from_observations(vec![reading]).unwrap();
        let outside = FilterCriteria::new(
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2019, 2, 1).unwrap(),
            SeasonFilter::All,
        )
        .unwrap();
        let filtered = filter_observations(ds.observations(), &outside);

        assert!(aggregate_by_year(&filtered, &YEARLY_POLLUTANTS).is_empty());
        assert!(aggregate_by_hour_and_season(&filtered, &HOURLY_POLLUTANTS).is_empty());
    }

    #[test]
    fn rows_serialize_with_flattened_key_and_column_names() {
        let row = AggregateRow {
            key: Year { year: 2015 },
            means: [(Column::Pm25, Some(12.5)), (Column::Pm10, None)].into_iter().collect(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["year"], 2015);
        assert_eq!(json["means"]["PM2.5"], 12.5);
        assert!(json["means"]["PM10"].is_null());
    }
}
