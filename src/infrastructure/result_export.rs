use crate::config::OutputFormat;
use crate::domain::performance::results::{ChunkRecord, ResultTable};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_date(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flatten(record: &ChunkRecord) -> Vec<String> {
    let mut cells = vec![
        record.key.clone(),
        record.start_index.to_string(),
        record.end_index.to_string(),
        format_date(record.start_date),
        format_date(record.end_date),
        record.period.to_string(),
    ];
    for metric in &record.metrics {
        cells.push(metric.value.to_string());
        cells.push(format_optional(metric.lower_threshold));
        cells.push(format_optional(metric.upper_threshold));
        cells.push(metric.alert.to_string());
    }
    cells
}

/// Writes the table as CSV, one row per chunk, columns as in [`ResultTable::column_names`].
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(table.column_names())
        .context("Failed to write CSV header")?;
    for record in table.rows() {
        wtr.write_record(flatten(record))
            .with_context(|| format!("Failed to write chunk {}", record.key))?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Writes the table as pretty-printed JSON. Undefined metric values become `null`.
pub fn write_json<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, table).context("Failed to serialize results as JSON")
}

pub fn write_results<W: Write>(table: &ResultTable, format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(table, writer),
        OutputFormat::Json => write_json(table, writer),
    }
}

/// Writes results to `path`, creating or truncating the file.
pub fn export_results(table: &ResultTable, format: OutputFormat, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_results(table, format, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} chunk rows to {}", table.len(), path.display());
    Ok(())
}
