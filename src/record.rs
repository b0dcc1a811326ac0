//! Generic string-keyed rows and the placeholder conventions shared by every
//! consumer of sheet data.
//!
//! A [`Record`] keeps its fields in source column order. Typed domain rows
//! ([`crate::quotation::Quotation`], [`crate::event::MaintenanceEvent`]) convert
//! to and from records through the [`Tabular`] trait.

use std::borrow::Cow;

/// Sentinel strings the sheets use for "intentionally left blank".
pub const PLACEHOLDERS: &[&str] = &["No aplica", "No especificado"];

/// Text shown in detail views when a field is absent.
pub const MISSING_LABEL: &str = "No especificado";

pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed)
}

/// Returns the trimmed value, or `None` when it is blank or a sentinel.
pub fn present(value: &str) -> Option<&str> {
    if is_placeholder(value) {
        None
    } else {
        Some(value.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Record::new();
        for (name, value) in pairs {
            record.insert(name, value);
        }
        record
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Sets `name` to `value`. Existing fields keep their position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// All field values joined by a single space and lowercased.
    pub fn search_text(&self) -> String {
        self.values().collect::<Vec<_>>().join(" ").to_lowercase()
    }
}

/// Typed rows with a fixed set of expected columns.
///
/// `from_record` never fails: a missing column becomes an empty string, and
/// columns outside [`Tabular::HEADERS`] are carried along untouched so that
/// search and export still see them.
pub trait Tabular: Clone {
    /// Singular, human readable name ("quotation").
    const NAME: &'static str;
    const HEADERS: &'static [&'static str];

    fn from_record(record: &Record) -> Self;

    fn to_record(&self) -> Record;

    fn from_records(records: &[Record]) -> Vec<Self> {
        records.iter().map(Self::from_record).collect()
    }

    fn search_text(&self) -> String {
        self.to_record().search_text()
    }
}

/// Copies every field of `record` that is not one of `known` into a new record.
pub(crate) fn extra_fields(record: &Record, known: &[&str]) -> Record {
    Record::from_pairs(
        record
            .iter()
            .filter(|(name, _)| !known.contains(name))
            .map(|(name, value)| (name.to_string(), value.to_string())),
    )
}

/// Display helper used by detail views: placeholders collapse to [`MISSING_LABEL`].
pub fn or_missing(value: &str) -> Cow<'_, str> {
    match present(value) {
        Some(text) => Cow::Borrowed(text),
        None => Cow::Borrowed(MISSING_LABEL),
    }
}
