use anyhow::{Context, Result, bail};
use log::info;
use serde::Serialize;

use crate::{
    cli::{EventCommand, EventFacetsArgs, EventListArgs, EventMediaArgs, EventStatsArgs},
    commands::{apply_limit, export_rows, load_from_args, print_facets},
    event::{EventDimension, MaintenanceEvent},
    filter,
    format::{self, clp_amount},
    media::{self, MediaItem, MediaKind},
    record::or_missing,
    sort,
    stats::{self, EventStatistics, TopEntry},
    table,
};

pub fn execute(command: &EventCommand) -> Result<()> {
    match command {
        EventCommand::List(args) => list(args),
        EventCommand::Stats(args) => statistics(args),
        EventCommand::Facets(args) => facets(args),
        EventCommand::Media(args) => show_media(args),
    }
}

const LIST_HEADERS: [&str; 7] = [
    "fecha",
    "tipo",
    "ubicación",
    "problema",
    "responsable",
    "estado",
    "prioridad",
];

fn list(args: &EventListArgs) -> Result<()> {
    let loaded = load_from_args::<MaintenanceEvent>(&args.source)?;
    let matched = filter::filter(&loaded.records, &args.filters.to_criteria());
    let sorted = sort::sort(&matched, args.sort.field, args.sort.direction);
    let shown = apply_limit(sorted, args.limit);

    if let Some(path) = &args.export {
        return export_rows(path, &shown);
    }

    let rows: Vec<Vec<String>> = shown
        .iter()
        .map(|e| {
            vec![
                format::or_na(&e.date).to_string(),
                format::or_na(&e.event_type).to_string(),
                format::or_na(&e.location).to_string(),
                format::or_na(&e.problem).to_string(),
                format::or_na(&e.responsible).to_string(),
                format::or_na(&e.status).to_string(),
                format::or_na(&e.priority).to_string(),
            ]
        })
        .collect();
    table::print_table(&LIST_HEADERS, &rows);
    info!("Listed {} of {} event(s)", shown.len(), loaded.records.len());
    Ok(())
}

#[derive(Debug, Serialize)]
struct EventReport {
    statistics: EventStatistics,
    top_types: Vec<TopEntry>,
    top_locations: Vec<TopEntry>,
}

fn statistics(args: &EventStatsArgs) -> Result<()> {
    let loaded = load_from_args::<MaintenanceEvent>(&args.source)?;
    let matched = filter::filter(&loaded.records, &args.filters.to_criteria());
    let report = EventReport {
        statistics: stats::event_statistics(&matched),
        top_types: stats::top_n(&matched, EventDimension::EventType, args.top),
        top_locations: stats::top_n(&matched, EventDimension::Location, args.top),
    };

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Serializing event statistics")?;
        println!("{rendered}");
    } else {
        let s = &report.statistics;
        table::print_pairs(&[
            ("events", s.total_events.to_string()),
            ("completed", s.completed_events.to_string()),
            ("in progress", s.in_progress_events.to_string()),
            ("pending", s.pending_events.to_string()),
            ("other status", s.other_events.to_string()),
            ("avg completion (h)", format::hours(s.avg_completion_hours)),
            ("total cost", clp_amount(s.total_cost)),
        ]);
        for (heading, entries) in [
            ("event type", &report.top_types),
            ("location", &report.top_locations),
        ] {
            println!();
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|entry| vec![entry.name.clone(), entry.count.to_string()])
                .collect();
            table::print_table(&[heading, "events"], &rows);
        }
    }
    info!(
        "Computed statistics for {} of {} event(s)",
        matched.len(),
        loaded.records.len()
    );
    Ok(())
}

fn facets(args: &EventFacetsArgs) -> Result<()> {
    let loaded = load_from_args::<MaintenanceEvent>(&args.source)?;
    print_facets(&loaded.records, &args.filters.to_criteria(), args.dimension);
    Ok(())
}

fn show_media(args: &EventMediaArgs) -> Result<()> {
    let loaded = load_from_args::<MaintenanceEvent>(&args.source)?;
    let matched = filter::filter(&loaded.records, &args.filters.to_criteria());
    let sorted = sort::sort(&matched, args.sort.field, args.sort.direction);
    let Some(event) = args
        .index
        .checked_sub(1)
        .and_then(|position| sorted.get(position))
    else {
        bail!(
            "Event #{} is out of range; {} event(s) match the filters",
            args.index,
            sorted.len()
        );
    };

    let references = media::event_media(event);
    if args.json {
        let rendered = serde_json::to_string_pretty(&references).context("Serializing event media")?;
        println!("{rendered}");
        return Ok(());
    }

    table::print_pairs(&[
        ("fecha", format::or_na(&event.date).to_string()),
        ("tipo", or_missing(&event.event_type).into_owned()),
        ("problema", or_missing(&event.problem).into_owned()),
        ("solución", or_missing(&event.solution).into_owned()),
    ]);
    for (heading, items) in [("antes", &references.event), ("después", &references.solution)] {
        println!();
        if items.is_empty() {
            println!("{heading}: sin registros");
            continue;
        }
        println!("{heading}:");
        table::print_pairs(&media_pairs(items));
    }
    info!(
        "Listed {} media reference(s) for event #{}",
        references.event.len() + references.solution.len(),
        args.index
    );
    Ok(())
}

fn media_pairs(items: &[MediaItem]) -> Vec<(&str, String)> {
    items
        .iter()
        .map(|item| {
            let kind = match item.kind {
                MediaKind::Image => "imagen",
                MediaKind::Video => "video",
            };
            (item.title.as_str(), format!("[{kind}] {}", item.url))
        })
        .collect()
}
