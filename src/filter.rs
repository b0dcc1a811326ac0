//! Composable record filtering and faceted option derivation.
//!
//! A criteria set is a free-text search, a list of exact-match selections on
//! facet dimensions, and optional range constraints (price, date) that are
//! not facets. Every present criterion must hold for a record to be kept.
//!
//! [`derive_options`] re-runs the same predicate with one dimension left out,
//! which yields the values still reachable in that dimension given all other
//! active criteria.

use std::{borrow::Cow, fmt::Debug};

use itertools::Itertools;

use crate::record::is_placeholder;

/// Rows that expose categorical dimensions and a free-text haystack.
pub trait Faceted {
    type Dimension: Copy + Eq + Debug + 'static;

    /// Every facet dimension, in display order.
    fn dimensions() -> &'static [Self::Dimension];

    fn dimension_value(&self, dimension: Self::Dimension) -> Cow<'_, str>;

    /// Lowercased concatenation of every field value.
    fn search_text(&self) -> String;
}

pub trait Criteria {
    type Item: Faceted;

    fn search(&self) -> Option<&str>;

    /// Active exact-match selections.
    fn selections(&self) -> Vec<(<Self::Item as Faceted>::Dimension, &str)>;

    /// Non-facet constraints such as price or date ranges.
    fn matches_ranges(&self, _item: &Self::Item) -> bool {
        true
    }
}

/// Treats `Some("")` (a cleared input) the same as `None`.
pub fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn filter<C>(records: &[C::Item], criteria: &C) -> Vec<C::Item>
where
    C: Criteria,
    C::Item: Clone,
{
    let predicate = Predicate::new(criteria, None);
    records
        .iter()
        .filter(|record| predicate.matches(record))
        .cloned()
        .collect()
}

pub fn matches<C: Criteria>(record: &C::Item, criteria: &C) -> bool {
    Predicate::new(criteria, None).matches(record)
}

/// Sorted distinct values of `dimension` across the records that satisfy every
/// criterion except the one on `dimension` itself. Search always applies.
pub fn derive_options<C: Criteria>(
    records: &[C::Item],
    dimension: <C::Item as Faceted>::Dimension,
    criteria: &C,
) -> Vec<String> {
    let predicate = Predicate::new(criteria, Some(dimension));
    records
        .iter()
        .filter(|record| predicate.matches(record))
        .map(|record| record.dimension_value(dimension))
        .filter(|value| !is_placeholder(value))
        .map(Cow::into_owned)
        .unique()
        .sorted()
        .collect()
}

/// Options for every dimension of the item type, in display order.
pub fn derive_all_options<C: Criteria>(
    records: &[C::Item],
    criteria: &C,
) -> Vec<(<C::Item as Faceted>::Dimension, Vec<String>)> {
    C::Item::dimensions()
        .iter()
        .map(|dimension| (*dimension, derive_options(records, *dimension, criteria)))
        .collect()
}

struct Predicate<'c, C: Criteria> {
    criteria: &'c C,
    needle: Option<String>,
    selections: Vec<(<C::Item as Faceted>::Dimension, &'c str)>,
}

impl<'c, C: Criteria> Predicate<'c, C> {
    fn new(criteria: &'c C, excluded: Option<<C::Item as Faceted>::Dimension>) -> Self {
        let selections = criteria
            .selections()
            .into_iter()
            .filter(|(dimension, _)| Some(*dimension) != excluded)
            .collect();
        Self {
            criteria,
            needle: criteria
                .search()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            selections,
        }
    }

    fn matches(&self, record: &C::Item) -> bool {
        if let Some(needle) = &self.needle
            && !record.search_text().contains(needle.as_str())
        {
            return false;
        }
        self.selections
            .iter()
            .all(|(dimension, expected)| record.dimension_value(*dimension) == *expected)
            && self.criteria.matches_ranges(record)
    }
}
