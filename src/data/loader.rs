use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{Column, Dataset, Observation, Season};

const DATETIME: &str = "datetime";
const SEASON: &str = "season";
const STATION: &str = "station";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an air-quality dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, one observation per line
/// * `.json` – `[{ "datetime": "...", "season": "...", "PM2.5": 12.0, ... }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let io_error = |source: std::io::Error| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dataset = match ext.as_str() {
        "csv" => load_csv_reader(BufReader::new(File::open(path).map_err(io_error)?))?,
        "json" => load_json_str(&std::fs::read_to_string(path).map_err(io_error)?)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} observations from {} ({} to {})",
        dataset.len(),
        path.display(),
        dataset.min_date(),
        dataset.max_date()
    );
    Ok(dataset)
}

/// Names every source must provide, in the order they are reported when missing.
fn required_columns() -> impl Iterator<Item = &'static str> {
    [DATETIME, SEASON]
        .into_iter()
        .chain(Column::ALL.into_iter().map(Column::name))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header positions of the columns we read.
struct CsvSchema {
    datetime: usize,
    season: usize,
    station: Option<usize>,
    values: Vec<(Column, usize)>,
}

impl CsvSchema {
    /// Locate every required column, reporting all missing names at once.
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = required_columns()
            .filter(|name| position(*name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        Ok(CsvSchema {
            datetime: position(DATETIME).unwrap_or_default(),
            season: position(SEASON).unwrap_or_default(),
            station: position(STATION),
            values: Column::ALL
                .into_iter()
                .filter_map(|c| position(c.name()).map(|idx| (c, idx)))
                .collect(),
        })
    }
}

/// Parse CSV from any reader. The header row must name every required column;
/// extra columns are ignored.
pub fn load_csv_reader<R: Read>(source: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let schema = CsvSchema::resolve(&headers)?;

    let mut observations = Vec::new();
    let mut malformed = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = idx + 1;
        let field = |i: usize| record.get(i).unwrap_or("");

        let mut obs = Observation::new(
            parse_datetime(row, field(schema.datetime))?,
            parse_season(row, field(schema.season))?,
        );
        obs.station = schema
            .station
            .map(field)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        for &(column, i) in &schema.values {
            obs.set(column, parse_numeric(field(i), &mut malformed));
        }
        observations.push(obs);
    }

    finish(observations, malformed)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
///
/// Numbers may be JSON numbers or numeric strings; `null` is missing.
pub fn load_json_str(text: &str) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut observations = Vec::with_capacity(records.len());
    let mut malformed = 0usize;

    for (idx, rec) in records.iter().enumerate() {
        let row = idx + 1;
        let obj = rec.as_object().ok_or(LoadError::NotAnObject { row })?;
        check_json_keys(obj)?;

        let mut obs = Observation::new(
            parse_datetime(row, &json_text(&obj[DATETIME]))?,
            parse_season(row, &json_text(&obj[SEASON]))?,
        );
        obs.station = obj
            .get(STATION)
            .map(json_text)
            .filter(|s| !s.is_empty());
        for column in Column::ALL {
            obs.set(column, json_numeric(&obj[column.name()], &mut malformed));
        }
        observations.push(obs);
    }

    finish(observations, malformed)
}

fn check_json_keys(obj: &Map<String, JsonValue>) -> Result<(), LoadError> {
    let missing: Vec<String> = required_columns()
        .filter(|name| !obj.contains_key(*name))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_numeric(val: &JsonValue, malformed: &mut usize) -> Option<f64> {
    match val {
        JsonValue::Null => None,
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => parse_numeric(s, malformed),
        _ => {
            *malformed += 1;
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Cell parsing shared by both formats
// ---------------------------------------------------------------------------

fn finish(observations: Vec<Observation>, malformed: usize) -> Result<Dataset, LoadError> {
    if malformed > 0 {
        log::warn!("{malformed} malformed numeric value(s) treated as missing");
    }
    Dataset::from_observations(observations)
}

fn parse_datetime(row: usize, raw: &str) -> Result<NaiveDateTime, LoadError> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| LoadError::InvalidDatetime {
            row,
            value: raw.to_string(),
        })
}

fn parse_season(row: usize, raw: &str) -> Result<Season, LoadError> {
    raw.parse().map_err(|_| LoadError::InvalidSeason {
        row,
        value: raw.to_string(),
    })
}

/// Blank and NA-style markers are plain missing values; anything else that
/// fails to parse is counted as malformed.
fn parse_numeric(raw: &str, malformed: &mut usize) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || ["na", "nan", "null"].iter().any(|m| raw.eq_ignore_ascii_case(m)) {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            *malformed += 1;
            None
        }
    }
}
