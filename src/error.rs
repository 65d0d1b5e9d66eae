use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed record in {path}: {source}")]
    Record {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Cannot parse {column} date '{value}' on row {row} of {path}")]
    DateParse {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StatsError {
    #[error("no weeks with resolved tickets; cannot average created/resolved per week")]
    NoWeeks,

    #[error("total created tickets is zero; cannot compute average rate of closure")]
    NothingCreated,
}
