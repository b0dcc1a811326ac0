mod common;

use common::{EVENTS_CSV, QUOTES_CSV};
use proptest::prelude::*;
use sheetboard::event::{EventCriteria, EventDimension, MaintenanceEvent};
use sheetboard::filter::{Faceted, derive_all_options, derive_options, filter};
use sheetboard::parser::parse_csv;
use sheetboard::quotation::{Quotation, QuotationCriteria, QuotationDimension};
use sheetboard::record::Tabular;

fn quotes() -> Vec<Quotation> {
    Quotation::from_records(&parse_csv(QUOTES_CSV).expect("parse quotes"))
}

fn events() -> Vec<MaintenanceEvent> {
    MaintenanceEvent::from_records(&parse_csv(EVENTS_CSV).expect("parse events"))
}

fn with_dates(dates: &[&str]) -> Vec<Quotation> {
    dates
        .iter()
        .map(|date| Quotation {
            date_time: date.to_string(),
            ..Quotation::default()
        })
        .collect()
}

#[test]
fn year_filter_returns_matching_year_only() {
    let records = with_dates(&["15-01-2024 10:30", "15-01-2025 10:30"]);
    let criteria = QuotationCriteria::default().with(QuotationDimension::Year, "2024");
    let matched = filter(&records, &criteria);
    assert_eq!(matched, vec![records[0].clone()]);
}

#[test]
fn empty_criteria_keep_everything_in_order() {
    let records = quotes();
    assert_eq!(filter(&records, &QuotationCriteria::default()), records);
}

#[test]
fn search_is_case_insensitive_across_columns() {
    let records = quotes();
    let criteria = QuotationCriteria::default().with_search("COT-003");
    let matched = filter(&records, &criteria);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].description, "Motor trifásico");
}

#[test]
fn price_range_excludes_unparseable_prices() {
    let records = quotes();
    let criteria = QuotationCriteria::default().with_price_range("0+".parse().unwrap());
    let matched = filter(&records, &criteria);
    assert_eq!(matched.len(), 3);
    assert!(matched.iter().all(|q| q.unit_price_value().is_some()));
}

#[test]
fn own_selection_stays_in_its_option_list() {
    let records = quotes();
    let criteria = QuotationCriteria::default()
        .with(QuotationDimension::Provider, "ACME")
        .with(QuotationDimension::Brand, "SKF");

    let providers = derive_options(&records, QuotationDimension::Provider, &criteria);
    assert_eq!(providers, vec!["ACME".to_string()]);

    let brands = derive_options(&records, QuotationDimension::Brand, &criteria);
    assert_eq!(brands, vec!["SKF".to_string(), "WEG".to_string()]);
}

#[test]
fn options_drop_placeholders_and_are_sorted() {
    let records = quotes();
    let materials = derive_options(
        &records,
        QuotationDimension::Material,
        &QuotationCriteria::default(),
    );
    assert_eq!(materials, vec!["Acero".to_string(), "Inoxidable".to_string()]);

    let years = derive_options(&records, QuotationDimension::Year, &QuotationCriteria::default());
    assert_eq!(years, vec!["2024".to_string(), "2025".to_string()]);
}

#[test]
fn search_always_narrows_options() {
    let records = quotes();
    let criteria = QuotationCriteria::default()
        .with_search("válvula")
        .with(QuotationDimension::Provider, "ACME");
    let providers = derive_options(&records, QuotationDimension::Provider, &criteria);
    assert_eq!(providers, vec!["Hidráulica Sur".to_string()]);
}

#[test]
fn event_facets_follow_other_selections() {
    let records = events();
    let criteria = EventCriteria::default().with(EventDimension::Responsible, "Juan Soto");
    let options = derive_all_options(&records, &criteria);
    let statuses = options
        .iter()
        .find(|(dimension, _)| *dimension == EventDimension::Status)
        .map(|(_, values)| values.clone())
        .unwrap();
    assert_eq!(statuses, vec!["Completado".to_string(), "Pendiente".to_string()]);
    assert_eq!(options.len(), EventDimension::ALL.len());
}

#[test]
fn event_date_range_is_inclusive() {
    let records = events();
    let criteria = EventCriteria::default().with_date_range(
        chrono::NaiveDate::from_ymd_opt(2025, 1, 12),
        chrono::NaiveDate::from_ymd_opt(2025, 1, 20),
    );
    let matched = filter(&records, &criteria);
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].location, "Bodega");
}

const PROVIDERS: [&str; 4] = ["ACME", "Bosch", "", "No especificado"];
const BRANDS: [&str; 3] = ["SKF", "WEG", "No aplica"];
const YEARS: [&str; 3] = ["2023", "2024", "2025"];

fn quotation() -> impl Strategy<Value = Quotation> {
    (0..PROVIDERS.len(), 0..BRANDS.len(), 0..YEARS.len(), 0u32..900_000).prop_map(
        |(provider, brand, year, price)| Quotation {
            provider: PROVIDERS[provider].to_string(),
            brand: BRANDS[brand].to_string(),
            date_time: format!("01-06-{} 08:00", YEARS[year]),
            unit_price: price.to_string(),
            ..Quotation::default()
        },
    )
}

fn criteria() -> impl Strategy<Value = QuotationCriteria> {
    (
        prop::option::of(0..PROVIDERS.len()),
        prop::option::of(0..BRANDS.len()),
        prop::option::of(0..YEARS.len()),
        prop::option::of(prop::sample::select(vec!["acme", "skf", "08:00", "zzz"])),
    )
        .prop_map(|(provider, brand, year, search)| QuotationCriteria {
            provider: provider.map(|idx| PROVIDERS[idx].to_string()),
            brand: brand.map(|idx| BRANDS[idx].to_string()),
            year: year.map(|idx| YEARS[idx].to_string()),
            search: search.map(str::to_string),
            ..QuotationCriteria::default()
        })
}

proptest! {
    #[test]
    fn filtering_is_idempotent(records in prop::collection::vec(quotation(), 0..40), criteria in criteria()) {
        let once = filter(&records, &criteria);
        let twice = filter(&once, &criteria);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn extra_criterion_never_grows_result(
        records in prop::collection::vec(quotation(), 0..40),
        criteria in criteria(),
        min in 0u32..900_000,
    ) {
        let base = filter(&records, &criteria);
        let narrowed = filter(
            &records,
            &criteria.clone().with_price_range(format!("{min}+").parse().unwrap()),
        );
        prop_assert!(narrowed.len() <= base.len());
        prop_assert!(narrowed.iter().all(|q| base.contains(q)));
    }

    #[test]
    fn every_option_is_reachable(
        records in prop::collection::vec(quotation(), 0..40),
        criteria in criteria(),
        dimension in prop::sample::select(QuotationDimension::ALL.to_vec()),
    ) {
        let options = derive_options(&records, dimension, &criteria);
        let mut relaxed = criteria.clone();
        match dimension {
            QuotationDimension::Provider => relaxed.provider = None,
            QuotationDimension::Brand => relaxed.brand = None,
            QuotationDimension::Year => relaxed.year = None,
            _ => {}
        }
        let reachable = filter(&records, &relaxed);
        for option in &options {
            prop_assert!(reachable.iter().any(|q| q.dimension_value(dimension) == option.as_str()));
        }
    }
}
