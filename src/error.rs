//! Error taxonomy for the ingestion side of the pipeline.
//!
//! Filtering, sorting, and aggregation never fail: unparseable numbers and
//! dates are treated as absent. Only reading and parsing CSV text can fail, and
//! [`crate::loader`] recovers from every [`LoadError`] by substituting sample
//! data.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CSV input contains no lines")]
    Empty,
    #[error("CSV header row is empty")]
    EmptyHeader,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No source URL configured for {dataset}")]
    Unconfigured { dataset: &'static str },
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },
    #[error("Reading input {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Input is not valid {encoding} text")]
    Decode { encoding: &'static str },
    #[error(transparent)]
    Parse(#[from] ParseError),
}
