//! CSV text to [`Record`]s and back.
//!
//! Reading splits fields with a quote-toggling scanner: a `"` anywhere in a
//! field opens or closes a quoted span and is dropped, and commas and line
//! breaks inside a span are literal. Inside a span a doubled quote is one
//! literal quote, so values written by [`to_csv`] read back unchanged. Every
//! field is trimmed. Data rows with fewer fields than the header are skipped
//! with a warning, extra trailing fields are ignored.
//!
//! Writing goes through the `csv` crate.

use anyhow::{Context, Result};
use csv::QuoteStyle;
use log::{debug, warn};

use crate::{error::ParseError, record::Record};

const BYTE_ORDER_MARK: char = '\u{feff}';

pub fn parse_csv(text: &str) -> Result<Vec<Record>, ParseError> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut rows = split_rows(text).into_iter();
    let headers = rows.next().map(|row| row.fields).unwrap_or_default();
    if headers.iter().all(|header| header.is_empty()) {
        return Err(ParseError::EmptyHeader);
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in rows {
        if row.fields.len() < headers.len() {
            warn!(
                "Skipping CSV line {}: {} field(s) but {} header(s)",
                row.line,
                row.fields.len(),
                headers.len()
            );
            skipped += 1;
            continue;
        }
        records.push(Record::from_pairs(headers.iter().cloned().zip(row.fields)));
    }
    debug!(
        "Parsed {} record(s) across {} column(s), skipped {skipped}",
        records.len(),
        headers.len()
    );
    Ok(records)
}

/// One logical row and the line it starts on.
#[derive(Debug)]
struct RawRow {
    line: usize,
    fields: Vec<String>,
}

/// Splits `text` into rows of trimmed fields. Lines holding only whitespace
/// outside quotes produce no row.
fn split_rows(text: &str) -> Vec<RawRow> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut blank = true;
    let mut line = 1usize;
    let mut row_line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => {
                in_quotes = !in_quotes;
                blank = false;
            }
            ',' if !in_quotes => {
                fields.push(take_field(&mut current));
                blank = false;
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(take_field(&mut current));
                if blank {
                    fields.clear();
                } else {
                    rows.push(RawRow {
                        line: row_line,
                        fields: std::mem::take(&mut fields),
                    });
                }
                line += 1;
                row_line = line;
                blank = true;
            }
            _ => {
                if ch == '\n' {
                    line += 1;
                }
                if !ch.is_whitespace() {
                    blank = false;
                }
                current.push(ch);
            }
        }
    }

    if in_quotes {
        warn!("Quoted field opened on line {row_line} is never closed");
    }
    if !blank {
        fields.push(take_field(&mut current));
        rows.push(RawRow {
            line: row_line,
            fields,
        });
    }
    rows
}

fn take_field(current: &mut String) -> String {
    let field = current.trim().to_string();
    current.clear();
    field
}

/// Column names across `records` in first-seen order.
pub fn collect_headers(records: &[Record]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for name in record.headers() {
            if !headers.iter().any(|existing| existing == name) {
                headers.push(name.to_string());
            }
        }
    }
    headers
}

/// Serializes records back to CSV text. Fields are quoted only when needed.
pub fn to_csv(records: &[Record]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(Vec::new());
    write_records(&mut writer, records)?;
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("Flushing CSV buffer: {}", err.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

pub fn write_records<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    records: &[Record],
) -> Result<()> {
    let headers = collect_headers(records);
    if headers.is_empty() {
        return Ok(());
    }
    writer
        .write_record(headers.iter())
        .context("Writing CSV headers")?;
    for (idx, record) in records.iter().enumerate() {
        writer
            .write_record(headers.iter().map(|name| record.get_or_empty(name)))
            .with_context(|| format!("Writing CSV row {}", idx + 2))?;
    }
    writer.flush().context("Flushing CSV writer")?;
    Ok(())
}
