use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::{
    data::parse_naive_date,
    event::{EventCriteria, EventDimension, EventSortField},
    quotation::{PriceRange, QuotationCriteria, QuotationDimension, QuotationSortField},
    sort::SortDirective,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Browse published quotation and maintenance sheets from the terminal",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Procurement quotations sheet
    #[command(subcommand)]
    Quotes(QuoteCommand),
    /// Maintenance events sheet
    #[command(subcommand)]
    Events(EventCommand),
}

#[derive(Debug, Subcommand)]
pub enum QuoteCommand {
    /// List quotations matching the filters in a table, or export them as CSV
    List(QuoteListArgs),
    /// Price statistics, top providers, and the price histogram
    Stats(QuoteStatsArgs),
    /// Values still selectable in a dimension given the other filters
    Facets(QuoteFacetsArgs),
}

#[derive(Debug, Subcommand)]
pub enum EventCommand {
    /// List events matching the filters in a table, or export them as CSV
    List(EventListArgs),
    /// Counts by status, average completion time, and total cost
    Stats(EventStatsArgs),
    /// Values still selectable in a dimension given the other filters
    Facets(EventFacetsArgs),
    /// Before and after media references of one listed event
    Media(EventMediaArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// YAML config file (defaults to $SHEETBOARD_CONFIG, then ./sheetboard.yml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Published CSV URL, overriding the configured one
    #[arg(long)]
    pub url: Option<String>,
    /// Local CSV file to read instead of fetching ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Character encoding of --input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Request timeout in seconds, overriding the configured one
    #[arg(long = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct QuoteFilterArgs {
    /// Case-insensitive text searched across every column
    #[arg(short = 's', long)]
    pub search: Option<String>,
    #[arg(long)]
    pub provider: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long = "component-type")]
    pub component_type: Option<String>,
    /// Item type, e.g. Componente or Servicio
    #[arg(long = "item-type")]
    pub item_type: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub diameter: Option<String>,
    #[arg(long)]
    pub material: Option<String>,
    /// Year taken from the quotation date, e.g. 2024
    #[arg(long)]
    pub year: Option<String>,
    /// Unit price bounds such as `10000-50000` or `500000+`
    #[arg(long = "price-range", value_parser = parse_price_range)]
    pub price_range: Option<PriceRange>,
}

impl QuoteFilterArgs {
    pub fn to_criteria(&self) -> QuotationCriteria {
        QuotationCriteria {
            search: self.search.clone(),
            provider: self.provider.clone(),
            brand: self.brand.clone(),
            component_type: self.component_type.clone(),
            item_type: self.item_type.clone(),
            model: self.model.clone(),
            diameter: self.diameter.clone(),
            material: self.material.clone(),
            year: self.year.clone(),
            price_range: self.price_range,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct EventFilterArgs {
    /// Case-insensitive text searched across every column
    #[arg(short = 's', long)]
    pub search: Option<String>,
    /// Event type, e.g. "Orden de Trabajo"
    #[arg(long = "type")]
    pub event_type: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub responsible: Option<String>,
    /// Pendiente, En Progreso, or Completado
    #[arg(long)]
    pub status: Option<String>,
    /// Baja, Media, Alta, or Crítica
    #[arg(long)]
    pub priority: Option<String>,
    /// Earliest event date, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    /// Latest event date, inclusive (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

impl EventFilterArgs {
    pub fn to_criteria(&self) -> EventCriteria {
        EventCriteria {
            search: self.search.clone(),
            event_type: self.event_type.clone(),
            location: self.location.clone(),
            responsible: self.responsible.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            date_from: self.from,
            date_to: self.to,
        }
    }
}

#[derive(Debug, Args)]
pub struct QuoteListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: QuoteFilterArgs,
    /// Sort directive `field[:asc|desc]` (price, alphabetical, fecha)
    #[arg(long, default_value = "price:desc", value_parser = parse_quote_sort)]
    pub sort: SortDirective<QuotationSortField>,
    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
    /// Write the matching rows as CSV to this path ('-' for stdout) instead of a table
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct QuoteStatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: QuoteFilterArgs,
    /// Number of providers to rank
    #[arg(long, default_value_t = 5)]
    pub top: usize,
    /// Emit JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct QuoteFacetsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: QuoteFilterArgs,
    /// Dimension to list; every dimension when omitted
    #[arg(long, value_enum)]
    pub dimension: Option<QuotationDimension>,
}

#[derive(Debug, Args)]
pub struct EventListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: EventFilterArgs,
    /// Sort directive `field[:asc|desc]` (fecha, prioridad, estado, tipo)
    #[arg(long, default_value = "fecha:desc", value_parser = parse_event_sort)]
    pub sort: SortDirective<EventSortField>,
    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
    /// Write the matching rows as CSV to this path ('-' for stdout) instead of a table
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EventStatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: EventFilterArgs,
    /// Number of event types and locations to rank
    #[arg(long, default_value_t = 5)]
    pub top: usize,
    /// Emit JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct EventFacetsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: EventFilterArgs,
    /// Dimension to list; every dimension when omitted
    #[arg(long, value_enum)]
    pub dimension: Option<EventDimension>,
}

#[derive(Debug, Args)]
pub struct EventMediaArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub filters: EventFilterArgs,
    /// Sort directive applied before picking the event
    #[arg(long, default_value = "fecha:desc", value_parser = parse_event_sort)]
    pub sort: SortDirective<EventSortField>,
    /// 1-based position of the event in the sorted, filtered list
    #[arg(long, default_value_t = 1)]
    pub index: usize,
    /// Emit JSON instead of a listing
    #[arg(long)]
    pub json: bool,
}

pub fn parse_price_range(value: &str) -> Result<PriceRange, String> {
    value.parse().map_err(|err: anyhow::Error| err.to_string())
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_naive_date(value).map_err(|err| err.to_string())
}

pub fn parse_quote_sort(value: &str) -> Result<SortDirective<QuotationSortField>, String> {
    value.parse().map_err(|err: anyhow::Error| err.to_string())
}

pub fn parse_event_sort(value: &str) -> Result<SortDirective<EventSortField>, String> {
    value.parse().map_err(|err: anyhow::Error| err.to_string())
}
