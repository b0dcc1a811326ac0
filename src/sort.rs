use std::{cmp::Ordering, fmt, str::FromStr};

use anyhow::{Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Applies the direction to a comparator result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        if self.is_ascending() {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(anyhow!("Unknown sort direction '{other}'")),
        }
    }
}

/// Field-specific comparison semantics for a row type.
pub trait SortKey<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Returns a sorted copy of `records`.
///
/// The sort is stable and descending order negates the comparator rather than
/// reversing the output, so rows with equal keys keep their input order in
/// both directions.
pub fn sort<T, K>(records: &[T], key: K, direction: SortDirection) -> Vec<T>
where
    T: Clone,
    K: SortKey<T>,
{
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| direction.apply(key.compare(a, b)));
    sorted
}

/// A parsed `field[:asc|desc]` directive. Direction defaults to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDirective<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F> FromStr for SortDirective<F>
where
    F: FromStr<Err = anyhow::Error>,
{
    type Err = anyhow::Error;

    fn from_str(spec: &str) -> Result<Self> {
        let mut parts = spec.split(':');
        let field = parts
            .next()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("Sort directive is missing a field"))?;
        let direction = match parts.next() {
            Some(raw) => raw.parse()?,
            None => SortDirection::Asc,
        };
        if parts.next().is_some() {
            return Err(anyhow!("Sort directive '{spec}' has too many ':' separators"));
        }
        Ok(SortDirective {
            field: field.parse()?,
            direction,
        })
    }
}
