use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::error::CriteriaError;
use crate::data::filter::FilterCriteria;
use crate::data::model::{Dataset, SeasonFilter};

pub const DEFAULT_DATA_PATH: &str = "data/clean/all-data.csv";

/// Overrides [`DEFAULT_DATA_PATH`] when `--data` is not given.
pub const DATA_PATH_ENV: &str = "AIR_QUALITY_DATA";

/// Date- and season-filtered air quality summaries, printed as JSON.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "air-quality-dashboard", version, about)]
pub struct Config {
    /// Dataset to load (.csv or .json)
    #[arg(long, env = DATA_PATH_ENV, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// First day to include, YYYY-MM-DD (default: first day in the data)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day to include, YYYY-MM-DD (default: last day in the data)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// All, Winter, Spring, Summer or Autumn
    #[arg(long, default_value = "All")]
    pub season: SeasonFilter,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Config {
    /// Resolve the selected dates against the dataset bounds.
    ///
    /// Each given date must lie within the dataset; omitted ones default to
    /// its first and last day.
    pub fn criteria(&self, dataset: &Dataset) -> Result<FilterCriteria, CriteriaError> {
        for date in [self.start, self.end].into_iter().flatten() {
            dataset.check_date(date)?;
        }
        FilterCriteria::new(
            self.start.unwrap_or(dataset.min_date()),
            self.end.unwrap_or(dataset.max_date()),
            self.season,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Observation, Season};
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("air-quality-dashboard").chain(args.iter().copied()))
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::from_observations(vec![
            Observation::new(day(2013, 3, 1).and_hms_opt(0, 0, 0).unwrap(), Season::Spring),
            Observation::new(day(2017, 2, 28).and_hms_opt(23, 0, 0).unwrap(), Season::Winter),
        ])
        .unwrap()
    }

    #[test]
    fn defaults_select_everything() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.season, SeasonFilter::All);
        assert_eq!((config.start, config.end), (None, None));
        assert!(!config.pretty);

        let ds = dataset();
        assert_eq!(config.criteria(&ds).unwrap(), FilterCriteria::spanning(&ds));
    }

    #[test]
    fn flags_are_parsed() {
        let config = parse(&[
            "--data",
            "x.json",
            "--start",
            "2014-01-01",
            "--end",
            "2014-03-31",
            "--season",
            "winter",
            "--pretty",
        ])
        .unwrap();

        assert_eq!(config.data, PathBuf::from("x.json"));
        assert_eq!(config.start, Some(day(2014, 1, 1)));
        assert_eq!(config.end, Some(day(2014, 3, 31)));
        assert_eq!(config.season, SeasonFilter::Only(Season::Winter));
        assert!(config.pretty);
    }

    #[test]
    fn bad_arguments_are_reported() {
        let kind = |args: &[&str]| parse(args).unwrap_err().kind();
        assert_eq!(kind(&["--end", "31/12/2014"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["--season", "Monsoon"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["--verbose"]), ErrorKind::UnknownArgument);
        assert!(parse(&["--start"]).is_err());
    }

    #[test]
    fn dates_outside_the_dataset_are_out_of_bounds() {
        let ds = dataset();

        let late_start = parse(&["--start", "2018-01-01"]).unwrap();
        assert_eq!(
            late_start.criteria(&ds),
            Err(CriteriaError::DateOutOfBounds {
                date: day(2018, 1, 1),
                min: day(2013, 3, 1),
                max: day(2017, 2, 28),
            })
        );

        let early_end = parse(&["--end", "2012-06-30"]).unwrap();
        assert!(matches!(
            early_end.criteria(&ds),
            Err(CriteriaError::DateOutOfBounds { date, .. }) if date == day(2012, 6, 30)
        ));

        let reversed = parse(&["--start", "2016-01-01", "--end", "2015-01-01"]).unwrap();
        assert!(matches!(
            reversed.criteria(&ds),
            Err(CriteriaError::InvalidDateRange { .. })
        ));
    }
}
