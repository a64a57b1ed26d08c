use crate::domain::dataset::{Column, Dataset};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Cell values read as missing.
const MISSING_TOKENS: &[&str] = &["", "nan", "na", "null", "none"];

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

/// Loads a CSV file with a header row into a [`Dataset`].
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let dataset = read_csv(BufReader::new(file))
        .with_context(|| format!("Failed to read dataset from {}", path.display()))?;
    info!(
        "Loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.column_names().len(),
        path.display()
    );
    Ok(dataset)
}

/// Reads CSV with a header row. A column is numeric when every present cell parses as a float.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV record {}", line + 1))?;
        for (column, cell) in cells.iter_mut().zip(record.iter()) {
            column.push(cell.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| (name, infer_column(values)))
        .collect();
    Ok(Dataset::new(columns)?)
}

fn infer_column(values: Vec<String>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                Some(None)
            } else {
                cell.parse::<f64>().ok().map(|v| (!v.is_nan()).then_some(v))
            }
        })
        .collect();

    match parsed {
        Some(numeric) => Column::Numeric(numeric),
        None => Column::Text(
            values
                .into_iter()
                .map(|cell| if is_missing(&cell) { None } else { Some(cell) })
                .collect(),
        ),
    }
}
