use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

use super::error::{CriteriaError, LoadError, ParseError};

// ---------------------------------------------------------------------------
// Season – categorical label attached to every observation
// ---------------------------------------------------------------------------

/// Coarse grouping of the calendar year.
///
/// The derived `Ord` follows declaration order, which is also the order
/// seasons appear in grouped output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Winter,
        Season::Spring,
        Season::Summer,
        Season::Autumn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }

    /// Meteorological season of a calendar month (1 = January).
    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Season::ALL
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::UnknownSeason(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SeasonFilter – "All" or one specific season
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonFilter {
    #[default]
    All,
    Only(Season),
}

impl SeasonFilter {
    pub fn matches(self, season: Season) -> bool {
        match self {
            SeasonFilter::All => true,
            SeasonFilter::Only(wanted) => wanted == season,
        }
    }

    /// Selector options in the order the dashboard offers them.
    pub fn options() -> Vec<SeasonFilter> {
        std::iter::once(SeasonFilter::All)
            .chain(Season::ALL.into_iter().map(SeasonFilter::Only))
            .collect()
    }
}

impl From<Season> for SeasonFilter {
    fn from(season: Season) -> Self {
        SeasonFilter::Only(season)
    }
}

impl fmt::Display for SeasonFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonFilter::All => f.write_str("All"),
            SeasonFilter::Only(season) => fmt::Display::fmt(season, f),
        }
    }
}

impl FromStr for SeasonFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(SeasonFilter::All)
        } else {
            s.parse().map(SeasonFilter::Only)
        }
    }
}

impl Serialize for SeasonFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Column – the numeric measurement columns
// ---------------------------------------------------------------------------

/// A numeric column of the source file, serialized under its header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Column {
    #[serde(rename = "PM2.5")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "SO2")]
    So2,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "WSPM")]
    Wspm,
    #[serde(rename = "RAIN")]
    Rain,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Pm25,
        Column::Pm10,
        Column::So2,
        Column::No2,
        Column::Co,
        Column::Wspm,
        Column::Rain,
    ];

    /// Header name as it appears in the dataset.
    pub fn name(self) -> &'static str {
        match self {
            Column::Pm25 => "PM2.5",
            Column::Pm10 => "PM10",
            Column::So2 => "SO2",
            Column::No2 => "NO2",
            Column::Co => "CO",
            Column::Wspm => "WSPM",
            Column::Rain => "RAIN",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Column::ALL
            .into_iter()
            .find(|column| column.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseError::UnknownColumn(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the source file
// ---------------------------------------------------------------------------

/// One timestamped station reading. Missing measurements are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub datetime: NaiveDateTime,
    pub season: Season,
    /// Station label, when the source carries one.
    pub station: Option<String>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub co: Option<f64>,
    pub wspm: Option<f64>,
    pub rain: Option<f64>,
}

impl Observation {
    /// An observation with every measurement missing.
    pub fn new(datetime: NaiveDateTime, season: Season) -> Self {
        Self {
            datetime,
            season,
            station: None,
            pm25: None,
            pm10: None,
            so2: None,
            no2: None,
            co: None,
            wspm: None,
            rain: None,
        }
    }

    /// Builder-style setter for a single measurement.
    pub fn with(mut self, column: Column, value: f64) -> Self {
        self.set(column, Some(value));
        self
    }

    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Pm25 => self.pm25,
            Column::Pm10 => self.pm10,
            Column::So2 => self.so2,
            Column::No2 => self.no2,
            Column::Co => self.co,
            Column::Wspm => self.wspm,
            Column::Rain => self.rain,
        }
    }

    pub fn set(&mut self, column: Column, value: Option<f64>) {
        let slot = match column {
            Column::Pm25 => &mut self.pm25,
            Column::Pm10 => &mut self.pm10,
            Column::So2 => &mut self.so2,
            Column::No2 => &mut self.no2,
            Column::Co => &mut self.co,
            Column::Wspm => &mut self.wspm,
            Column::Rain => &mut self.rain,
        };
        *slot = value;
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    pub fn hour(&self) -> u32 {
        self.datetime.hour()
    }

    pub fn year(&self) -> i32 {
        self.datetime.year()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// The parsed dataset with its observed date bounds. Immutable after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl Dataset {
    /// Compute the date bounds of the loaded observations.
    ///
    /// Fails with [`LoadError::EmptyDataset`] when there is nothing to bound.
    pub fn from_observations(observations: Vec<Observation>) -> Result<Self, LoadError> {
        let mut dates = observations.iter().map(Observation::date);
        let first = dates.next().ok_or(LoadError::EmptyDataset)?;
        let (min_date, max_date) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

        Ok(Dataset {
            observations,
            min_date,
            max_date,
        })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Earliest calendar date in the dataset.
    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    /// Latest calendar date in the dataset.
    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        (self.min_date..=self.max_date).contains(&date)
    }

    /// [`CriteriaError::DateOutOfBounds`] unless `date` lies within the dataset.
    pub fn check_date(&self, date: NaiveDate) -> Result<(), CriteriaError> {
        if self.contains_date(date) {
            Ok(())
        } else {
            Err(CriteriaError::DateOutOfBounds {
                date,
                min: self.min_date,
                max: self.max_date,
            })
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always `false` for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
