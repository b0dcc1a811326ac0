//! Aggregates over filtered collections: price statistics, top-N groups, the
//! price histogram, and maintenance-event statistics.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    event::{MaintenanceEvent, Status},
    filter::Faceted,
    quotation::Quotation,
    record::is_placeholder,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuotationStatistics {
    /// Every record, priced or not.
    pub total_items: usize,
    pub total_providers: usize,
    /// Records whose unit price parsed.
    pub priced_items: usize,
    pub avg_price: Decimal,
    pub total_value: Decimal,
    pub max_price: Decimal,
    pub min_price: Decimal,
}

/// Summary statistics over a quotation collection.
///
/// Price arithmetic only sees unit prices that parse; the item count still
/// includes the rest. With no parseable price every numeric aggregate is zero.
/// Sums saturate at the `Decimal` bounds instead of overflowing.
pub fn statistics(records: &[Quotation]) -> QuotationStatistics {
    let mut prices = PriceAccumulator::default();
    let mut providers: Vec<&str> = Vec::new();
    let mut total_value = Decimal::ZERO;

    for record in records {
        if let Some(price) = record.unit_price_value() {
            prices.ingest(price);
        }
        if let Some(total) = record.total_price_value() {
            total_value = total_value.saturating_add(total);
        }
        let provider = record.provider.trim();
        if !is_placeholder(provider) && !providers.contains(&provider) {
            providers.push(provider);
        }
    }

    QuotationStatistics {
        total_items: records.len(),
        total_providers: providers.len(),
        priced_items: prices.count,
        avg_price: prices.mean(),
        total_value,
        max_price: prices.max.unwrap_or(Decimal::ZERO),
        min_price: prices.min.unwrap_or(Decimal::ZERO),
    }
}

#[derive(Default)]
struct PriceAccumulator {
    count: usize,
    sum: Decimal,
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl PriceAccumulator {
    fn ingest(&mut self, value: Decimal) {
        self.count += 1;
        self.sum = self.sum.saturating_add(value);
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
    }

    fn mean(&self) -> Decimal {
        if self.count == 0 {
            Decimal::ZERO
        } else {
            self.sum / Decimal::from(self.count)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopEntry {
    pub name: String,
    pub count: usize,
}

/// The `n` most frequent non-blank values of `dimension`, most frequent first.
/// Equal counts keep the order in which the values were first seen.
pub fn top_n<T: Faceted>(records: &[T], dimension: T::Dimension, n: usize) -> Vec<TopEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<TopEntry> = Vec::new();
    for record in records {
        let value = record.dimension_value(dimension);
        if is_placeholder(&value) {
            continue;
        }
        match index.get(&*value) {
            Some(&position) => entries[position].count += 1,
            None => {
                index.insert(value.to_string(), entries.len());
                entries.push(TopEntry {
                    name: value.into_owned(),
                    count: 1,
                });
            }
        }
    }
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);
    entries
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBucket {
    pub label: &'static str,
    /// Inclusive lower bound.
    pub min: Decimal,
    /// Exclusive upper bound; `None` for the open top bucket.
    pub max: Option<Decimal>,
    pub count: usize,
}

const BUCKETS: [(&str, i64, Option<i64>); 5] = [
    ("0-10000", 0, Some(10_000)),
    ("10000-50000", 10_000, Some(50_000)),
    ("50000-100000", 50_000, Some(100_000)),
    ("100000-500000", 100_000, Some(500_000)),
    ("500000+", 500_000, None),
];

/// Counts parseable unit prices per fixed bucket. Every bucket is returned in
/// ascending order, including empty ones. Buckets are half-open `[min, max)`
/// and negative prices land in the lowest bucket.
pub fn price_histogram(records: &[Quotation]) -> Vec<PriceBucket> {
    let mut buckets: Vec<PriceBucket> = BUCKETS
        .iter()
        .map(|&(label, min, max)| PriceBucket {
            label,
            min: Decimal::from(min),
            max: max.map(Decimal::from),
            count: 0,
        })
        .collect();

    for price in records.iter().filter_map(Quotation::unit_price_value) {
        let slot = buckets
            .iter()
            .position(|bucket| bucket.max.is_none_or(|max| price < max))
            .unwrap_or(buckets.len() - 1);
        buckets[slot].count += 1;
    }
    buckets
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventStatistics {
    pub total_events: usize,
    pub completed_events: usize,
    pub pending_events: usize,
    pub in_progress_events: usize,
    /// Events whose status is none of the known labels.
    pub other_events: usize,
    /// Mean actual hours over completed events with positive actual hours.
    pub avg_completion_hours: Decimal,
    pub total_cost: Decimal,
}

pub fn event_statistics(records: &[MaintenanceEvent]) -> EventStatistics {
    let mut stats = EventStatistics {
        total_events: records.len(),
        ..EventStatistics::default()
    };
    let mut hours = PriceAccumulator::default();

    for record in records {
        match record.status_value() {
            Some(Status::Completed) => {
                stats.completed_events += 1;
                if let Some(actual) = record.actual_hours_value()
                    && actual > Decimal::ZERO
                {
                    hours.ingest(actual);
                }
            }
            Some(Status::Pending) => stats.pending_events += 1,
            Some(Status::InProgress) => stats.in_progress_events += 1,
            None => stats.other_events += 1,
        }
        stats.total_cost = stats.total_cost.saturating_add(record.effective_cost());
    }
    stats.avg_completion_hours = hours.mean();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotation::QuotationDimension;

    fn priced(price: &str) -> Quotation {
        Quotation {
            unit_price: price.to_string(),
            ..Quotation::default()
        }
    }

    fn provided(provider: &str) -> Quotation {
        Quotation {
            provider: provider.to_string(),
            ..Quotation::default()
        }
    }

    #[test]
    fn unparseable_price_counts_but_is_not_averaged() {
        let records = vec![priced("1000"), priced("NaN"), priced("50000")];
        let stats = statistics(&records);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.priced_items, 2);
        assert_eq!(stats.avg_price, Decimal::from(25_500));
        assert_eq!(stats.max_price, Decimal::from(50_000));
        assert_eq!(stats.min_price, Decimal::from(1_000));
    }

    #[test]
    fn statistics_without_prices_are_zero() {
        let stats = statistics(&[priced("n/a"), priced("")]);
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.avg_price, Decimal::ZERO);
        assert_eq!(stats.max_price, Decimal::ZERO);
        assert_eq!(stats.min_price, Decimal::ZERO);
        assert_eq!(statistics(&[]), QuotationStatistics::default());
    }

    #[test]
    fn provider_count_skips_placeholders_and_duplicates() {
        let records = vec![
            provided("ACME"),
            provided("ACME"),
            provided("No especificado"),
            provided(""),
            provided("Bosch"),
        ];
        assert_eq!(statistics(&records).total_providers, 2);
    }

    #[test]
    fn top_n_breaks_ties_by_first_seen() {
        let records = vec![
            provided("Zeta"),
            provided("Alfa"),
            provided("Alfa"),
            provided("Zeta"),
            provided("Beta"),
            provided("No aplica"),
            provided("No aplica"),
            provided("No aplica"),
        ];
        let top = top_n(&records, QuotationDimension::Provider, 2);
        assert_eq!(
            top,
            vec![
                TopEntry {
                    name: "Zeta".into(),
                    count: 2
                },
                TopEntry {
                    name: "Alfa".into(),
                    count: 2
                },
            ]
        );
        assert!(top_n(&records, QuotationDimension::Provider, 0).is_empty());
    }

    #[test]
    fn histogram_keeps_empty_buckets_and_uses_half_open_bounds() {
        let records = vec![
            priced("10000"),
            priced("9999"),
            priced("-5"),
            priced("500000"),
            priced("bad"),
        ];
        let histogram = price_histogram(&records);
        let counts: Vec<_> = histogram.iter().map(|b| (b.label, b.count)).collect();
        assert_eq!(
            counts,
            vec![
                ("0-10000", 2),
                ("10000-50000", 1),
                ("50000-100000", 0),
                ("100000-500000", 0),
                ("500000+", 1),
            ]
        );
    }

    #[test]
    fn event_statistics_group_by_status_and_fall_back_on_cost() {
        let event = |status: &str, hours: &str, estimated: &str, actual: &str| MaintenanceEvent {
            status: status.to_string(),
            actual_hours: hours.to_string(),
            estimated_cost: estimated.to_string(),
            actual_cost: actual.to_string(),
            ..MaintenanceEvent::default()
        };
        let records = vec![
            event("Completado", "3.5", "150000", "135000"),
            event("Completado", "0", "1000", ""),
            event("Completado", "4.5", "", "2000"),
            event("En Progreso", "0", "300000", "0"),
            event("Pendiente", "", "80000", "0"),
            event("Cancelado", "", "", ""),
        ];
        let stats = event_statistics(&records);
        assert_eq!(stats.total_events, 6);
        assert_eq!(stats.completed_events, 3);
        assert_eq!(stats.in_progress_events, 1);
        assert_eq!(stats.pending_events, 1);
        assert_eq!(stats.other_events, 1);
        assert_eq!(stats.avg_completion_hours, Decimal::from(4));
        assert_eq!(stats.total_cost, Decimal::from(518_000));
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let huge = Decimal::MAX.to_string();
        let records = vec![
            Quotation {
                total_price: huge.clone(),
                ..priced(&huge)
            },
            Quotation {
                total_price: huge.clone(),
                ..priced(&huge)
            },
        ];
        let stats = statistics(&records);
        assert_eq!(stats.priced_items, 2);
        assert_eq!(stats.max_price, Decimal::MAX);
        assert_eq!(stats.total_value, Decimal::MAX);
        assert!(stats.avg_price > Decimal::ZERO);

        let costly = MaintenanceEvent {
            status: "Completado".to_string(),
            actual_cost: huge,
            ..MaintenanceEvent::default()
        };
        let events = event_statistics(&[costly.clone(), costly]);
        assert_eq!(events.total_cost, Decimal::MAX);
    }
}
