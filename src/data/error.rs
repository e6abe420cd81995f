use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to turn a file into a validated [`Dataset`](super::model::Dataset).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset is missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: cannot parse datetime '{value}'")]
    InvalidDatetime { row: usize, value: String },

    #[error("row {row}: unknown season '{value}'")]
    InvalidSeason { row: usize, value: String },

    #[error("expected a top-level JSON array of records")]
    NotAnArray,

    #[error("row {row}: expected a JSON object")]
    NotAnObject { row: usize },

    #[error("dataset contains no observations")]
    EmptyDataset,
}

/// Rejected filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("date {date} is outside the dataset range {min} to {max}")]
    DateOutOfBounds {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown season '{0}' (expected Winter, Spring, Summer or Autumn)")]
    UnknownSeason(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),
}
