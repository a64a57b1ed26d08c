use super::chunk::Chunk;
use crate::domain::dataset::Dataset;
use crate::domain::errors::CalculatorError;
use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Number of chunks produced when no chunking is configured.
pub const DEFAULT_CHUNK_COUNT: usize = 10;

/// Below this many chunks, reference thresholds are statistically weak.
const MIN_RECOMMENDED_CHUNKS: usize = 6;

/// What to do with a trailing chunk smaller than the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Incomplete {
    #[default]
    Keep,
    Drop,
    Append,
}

/// Calendar period used by the period chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodOffset {
    #[serde(alias = "D", alias = "day")]
    Day,
    #[serde(alias = "W", alias = "week")]
    Week,
    #[serde(alias = "M", alias = "month")]
    Month,
    #[serde(alias = "Q", alias = "quarter")]
    Quarter,
    #[serde(alias = "Y", alias = "year")]
    Year,
}

impl PeriodOffset {
    /// Sortable bucket id and display key for a timestamp.
    fn bucket(&self, ts: &NaiveDateTime) -> (i64, String) {
        let date = ts.date();
        match self {
            PeriodOffset::Day => (
                date.num_days_from_ce() as i64,
                date.format("%Y-%m-%d").to_string(),
            ),
            PeriodOffset::Week => {
                let start =
                    date - Duration::days(date.weekday().num_days_from_monday() as i64);
                let end = start + Duration::days(6);
                (
                    start.num_days_from_ce() as i64,
                    format!("{}/{}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d")),
                )
            }
            PeriodOffset::Month => (
                date.year() as i64 * 12 + date.month0() as i64,
                date.format("%Y-%m").to_string(),
            ),
            PeriodOffset::Quarter => {
                let quarter = date.month0() / 3 + 1;
                (
                    date.year() as i64 * 4 + quarter as i64,
                    format!("{}Q{}", date.year(), quarter),
                )
            }
            PeriodOffset::Year => (date.year() as i64, date.year().to_string()),
        }
    }
}

fn default_chunk_incomplete() -> Incomplete {
    Incomplete::Append
}

/// Strategy for splitting a dataset into ordered chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chunker {
    /// Fixed number of rows per chunk.
    Size {
        chunk_size: usize,
        #[serde(default)]
        incomplete: Incomplete,
    },
    /// Fixed number of chunks; chunk size is `rows / chunk_number`.
    Count {
        chunk_number: usize,
        #[serde(default = "default_chunk_incomplete")]
        incomplete: Incomplete,
    },
    /// One chunk per calendar period of the timestamp column.
    Period { offset: PeriodOffset },
}

impl Default for Chunker {
    fn default() -> Self {
        Chunker::Count {
            chunk_number: DEFAULT_CHUNK_COUNT,
            incomplete: Incomplete::Append,
        }
    }
}

impl Chunker {
    pub fn validate(&self) -> Result<(), CalculatorError> {
        match self {
            Chunker::Size { chunk_size: 0, .. } => Err(CalculatorError::InvalidArguments {
                reason: "chunk_size must be greater than 0".to_string(),
            }),
            Chunker::Count {
                chunk_number: 0, ..
            } => Err(CalculatorError::InvalidArguments {
                reason: "chunk_number must be greater than 0".to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Splits `data` into chunks in row order (period order for the period chunker).
    ///
    /// When `timestamp_column` is set, every chunk carries the min/max timestamp of its rows.
    pub fn split(
        &self,
        data: &Dataset,
        timestamp_column: Option<&str>,
    ) -> Result<Vec<Chunk>, CalculatorError> {
        self.validate()?;
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let timestamps = match timestamp_column {
            Some(name) => Some(data.timestamps(name)?),
            None => None,
        };

        let chunks = match self {
            Chunker::Size {
                chunk_size,
                incomplete,
            } => split_by_size(data, *chunk_size, *incomplete, timestamps.as_deref()),
            Chunker::Count {
                chunk_number,
                incomplete,
            } => {
                let chunk_size = data.len() / chunk_number;
                if chunk_size == 0 {
                    return Err(CalculatorError::InvalidArguments {
                        reason: format!(
                            "cannot split {} rows into {} chunks",
                            data.len(),
                            chunk_number
                        ),
                    });
                }
                split_by_size(data, chunk_size, *incomplete, timestamps.as_deref())
            }
            Chunker::Period { offset } => {
                let (Some(name), Some(timestamps)) = (timestamp_column, timestamps.as_deref())
                else {
                    return Err(CalculatorError::InvalidArguments {
                        reason: "period chunking requires a timestamp column".to_string(),
                    });
                };
                split_by_period(data, *offset, name, timestamps)?
            }
        };

        debug!("Split {} rows into {} chunks", data.len(), chunks.len());
        if chunks.len() < MIN_RECOMMENDED_CHUNKS {
            warn!(
                "Only {} chunks produced; consider a different chunking for reliable thresholds",
                chunks.len()
            );
        }
        Ok(chunks)
    }
}

fn time_bounds(
    timestamps: Option<&[Option<NaiveDateTime>]>,
    rows: impl IntoIterator<Item = usize>,
) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let Some(timestamps) = timestamps else {
        return (None, None);
    };
    let mut min: Option<NaiveDateTime> = None;
    let mut max: Option<NaiveDateTime> = None;
    for ts in rows.into_iter().filter_map(|row| timestamps[row]) {
        min = Some(min.map_or(ts, |m| m.min(ts)));
        max = Some(max.map_or(ts, |m| m.max(ts)));
    }
    (min, max)
}

fn split_by_size(
    data: &Dataset,
    chunk_size: usize,
    incomplete: Incomplete,
    timestamps: Option<&[Option<NaiveDateTime>]>,
) -> Vec<Chunk> {
    // [start, end) row ranges
    let mut ranges: Vec<(usize, usize)> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| (start, (start + chunk_size).min(data.len())))
        .collect();

    let trailing_is_incomplete = ranges
        .last()
        .is_some_and(|(start, end)| end - start < chunk_size);
    if trailing_is_incomplete {
        match incomplete {
            Incomplete::Keep => {}
            Incomplete::Drop => {
                ranges.pop();
            }
            Incomplete::Append => {
                if ranges.len() > 1 {
                    if let Some((_, end)) = ranges.pop() {
                        if let Some(last) = ranges.last_mut() {
                            last.1 = end;
                        }
                    }
                }
            }
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| {
            let (start_datetime, end_datetime) = time_bounds(timestamps, start..end);
            Chunk {
                key: Chunk::index_key(start, end - 1),
                data: data.slice(start, end),
                start_index: start,
                end_index: end - 1,
                start_datetime,
                end_datetime,
            }
        })
        .collect()
}

fn split_by_period(
    data: &Dataset,
    offset: PeriodOffset,
    timestamp_column: &str,
    timestamps: &[Option<NaiveDateTime>],
) -> Result<Vec<Chunk>, CalculatorError> {
    let mut buckets: BTreeMap<i64, (String, Vec<usize>)> = BTreeMap::new();
    for (row, ts) in timestamps.iter().enumerate() {
        let ts = ts.ok_or_else(|| CalculatorError::InvalidData {
            column: timestamp_column.to_string(),
            reason: format!("missing timestamp at row {}", row),
        })?;
        let (id, key) = offset.bucket(&ts);
        buckets.entry(id).or_insert_with(|| (key, Vec::new())).1.push(row);
    }

    Ok(buckets
        .into_values()
        .map(|(key, rows)| {
            let (start_datetime, end_datetime) = time_bounds(Some(timestamps), rows.iter().copied());
            Chunk {
                key,
                data: data.take(&rows),
                start_index: rows[0],
                end_index: rows[rows.len() - 1],
                start_datetime,
                end_datetime,
            }
        })
        .collect())
}
