use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cli::{QuoteCommand, QuoteFacetsArgs, QuoteListArgs, QuoteStatsArgs},
    commands::{apply_limit, export_rows, load_from_args, print_facets},
    filter,
    format::{self, clp_amount},
    quotation::{Quotation, QuotationDimension},
    sort,
    stats::{self, PriceBucket, QuotationStatistics, TopEntry},
    table,
};

pub fn execute(command: &QuoteCommand) -> Result<()> {
    match command {
        QuoteCommand::List(args) => list(args),
        QuoteCommand::Stats(args) => statistics(args),
        QuoteCommand::Facets(args) => facets(args),
    }
}

const LIST_HEADERS: [&str; 7] = [
    "fecha",
    "descripción",
    "proveedor",
    "marca",
    "tipo",
    "precio unitario",
    "total",
];

fn list(args: &QuoteListArgs) -> Result<()> {
    let loaded = load_from_args::<Quotation>(&args.source)?;
    let matched = filter::filter(&loaded.records, &args.filters.to_criteria());
    let sorted = sort::sort(&matched, args.sort.field, args.sort.direction);
    let shown = apply_limit(sorted, args.limit);

    if let Some(path) = &args.export {
        return export_rows(path, &shown);
    }

    let rows: Vec<Vec<String>> = shown
        .iter()
        .map(|q| {
            vec![
                format::display_date(&q.date_time).to_string(),
                format::or_na(&q.description).to_string(),
                format::or_na(&q.provider).to_string(),
                format::or_na(&q.brand).to_string(),
                format::or_na(&q.component_type).to_string(),
                format::clp(&q.unit_price),
                format::clp(&q.total_price),
            ]
        })
        .collect();
    table::print_table(&LIST_HEADERS, &rows);
    info!(
        "Listed {} of {} quotation(s)",
        shown.len(),
        loaded.records.len()
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct QuoteReport {
    statistics: QuotationStatistics,
    top_providers: Vec<TopEntry>,
    histogram: Vec<PriceBucket>,
}

fn statistics(args: &QuoteStatsArgs) -> Result<()> {
    let loaded = load_from_args::<Quotation>(&args.source)?;
    let matched = filter::filter(&loaded.records, &args.filters.to_criteria());
    let report = QuoteReport {
        statistics: stats::statistics(&matched),
        top_providers: stats::top_n(&matched, QuotationDimension::Provider, args.top),
        histogram: stats::price_histogram(&matched),
    };

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Serializing quotation statistics")?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }
    info!(
        "Computed statistics for {} of {} quotation(s)",
        matched.len(),
        loaded.records.len()
    );
    Ok(())
}

fn print_report(report: &QuoteReport) {
    let s = &report.statistics;
    table::print_pairs(&[
        ("items", s.total_items.to_string()),
        ("priced items", s.priced_items.to_string()),
        ("providers", s.total_providers.to_string()),
        ("average price", clp_amount(s.avg_price)),
        ("total value", clp_amount(s.total_value)),
        ("max price", clp_amount(s.max_price)),
        ("min price", clp_amount(s.min_price)),
    ]);

    println!();
    let top: Vec<Vec<String>> = report
        .top_providers
        .iter()
        .map(|entry| vec![entry.name.clone(), entry.count.to_string()])
        .collect();
    table::print_table(&["provider", "quotations"], &top);

    println!();
    let buckets: Vec<Vec<String>> = report
        .histogram
        .iter()
        .map(|bucket| vec![bucket.label.to_string(), bucket.count.to_string()])
        .collect();
    table::print_table(&["price range", "count"], &buckets);
}

fn facets(args: &QuoteFacetsArgs) -> Result<()> {
    let loaded = load_from_args::<Quotation>(&args.source)?;
    print_facets(&loaded.records, &args.filters.to_criteria(), args.dimension);
    Ok(())
}
