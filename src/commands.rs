//! Plumbing shared by the `quotes` and `events` command handlers.

use std::{fmt::Display, path::Path};

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::SourceArgs,
    config::Config,
    filter::{self, Criteria, Faceted},
    io_utils,
    loader::{self, Dataset, Loaded, Loader, Source},
    parser,
    record::Tabular,
    table,
};

/// Resolves the source from flags and config, then loads it. Falls back to
/// sample rows exactly like [`loader::load`] and announces it on stderr.
pub fn load_from_args<T: Dataset>(args: &SourceArgs) -> Result<Loaded<T>> {
    let config = Config::load(args.config.as_deref())?;
    let timeout = args
        .timeout_secs
        .map_or_else(|| config.timeout(), std::time::Duration::from_secs);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let source = Source::resolve(
        args.input.clone(),
        encoding,
        args.url.clone(),
        config.url_for(T::CONFIG_KEY),
    );

    let loader = Loader::new(timeout)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Starting async runtime")?;
    let loaded = runtime.block_on(loader::load::<T>(&loader, source.as_ref()));
    if let Some(reason) = loaded.fallback_reason() {
        eprintln!("Showing sample data ({reason})");
    }
    Ok(loaded)
}

/// Writes rows as CSV to `path` (stdout for `-`).
pub fn export_rows<T: Tabular>(path: &Path, rows: &[T]) -> Result<()> {
    let records: Vec<_> = rows.iter().map(Tabular::to_record).collect();
    let mut writer = io_utils::open_csv_writer(Some(path))?;
    parser::write_records(&mut writer, &records)
        .with_context(|| format!("Exporting {} row(s) to {path:?}", records.len()))?;
    info!("Exported {} {}(s) to {path:?}", records.len(), T::NAME);
    Ok(())
}

/// Prints the options of one dimension, one per line, or of every dimension as
/// a table.
pub fn print_facets<C>(
    records: &[C::Item],
    criteria: &C,
    dimension: Option<<C::Item as Faceted>::Dimension>,
) where
    C: Criteria,
    <C::Item as Faceted>::Dimension: Display,
{
    match dimension {
        Some(dimension) => {
            let options = filter::derive_options(records, dimension, criteria);
            for option in &options {
                println!("{option}");
            }
            info!("{} option(s) available for {dimension}", options.len());
        }
        None => {
            let rows: Vec<Vec<String>> = filter::derive_all_options(records, criteria)
                .into_iter()
                .map(|(dimension, options)| {
                    vec![
                        dimension.to_string(),
                        options.len().to_string(),
                        options.join(", "),
                    ]
                })
                .collect();
            table::print_table(&["dimension", "count", "options"], &rows);
        }
    }
}

pub fn apply_limit<T>(mut rows: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}
