//! Local input and export plumbing.
//!
//! - **stdin/stdout**: the `-` path convention routes through standard streams.
//! - **Encoding**: local input is decoded via `encoding_rs`, defaulting to UTF-8.
//!   Remote sheets are always UTF-8.
//! - **Quoting**: exported CSV quotes only fields that need it, matching
//!   [`crate::parser::to_csv`].

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::error::LoadError;

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Reads a whole local file (or stdin for `-`) and decodes it.
pub fn read_input(path: &Path, encoding: &'static Encoding) -> Result<String, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut bytes = Vec::new();
    if is_dash(path) {
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .map_err(io_error)?;
    } else {
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(io_error)?;
    }
    decode_bytes(&bytes, encoding)
}

/// Decodes `bytes`, honouring a byte-order mark when present.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String, LoadError> {
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(LoadError::Decode {
            encoding: actual.name(),
        })
    } else {
        Ok(text.into_owned())
    }
}

/// CSV writer over a file, or stdout when `path` is `None` or `-`.
pub fn open_csv_writer(path: Option<&Path>) -> Result<csv::Writer<Box<dyn Write>>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };

    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    Ok(builder.from_writer(base))
}
