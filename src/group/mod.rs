//! Grouping preprocessor.
//!
//! Individual measurements are reduced to one row per group label:
//!
//! ```text
//! x     = mean(x_i)
//! y     = mean(y_i)
//! sigma = std(y_i; ddof = 1) / sqrt(n)
//! ```
//!
//! i.e. the standard error of the mean of `y`. A single-member group has no
//! defined spread, so it is dropped (and reported) rather than given a fake
//! sigma. The output table is what `hubble fit` reads.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::ingest::{IngestError, build_header_map, open_reader, parse_cell, resolve_columns};

#[derive(Debug, Error)]
pub enum GroupError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Line {line}: empty group label")]
    EmptyLabel { line: usize },

    #[error("No group has at least two members; nothing left to fit")]
    NoGroups,

    #[error("Failed to write grouped CSV: {0}")]
    Write(#[from] csv::Error),
}

/// One raw measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// Header names for the raw measurement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupColumns {
    pub label: String,
    pub x: String,
    pub y: String,
}

impl Default for GroupColumns {
    fn default() -> Self {
        Self {
            label: "group".to_string(),
            x: "x".to_string(),
            y: "y".to_string(),
        }
    }
}

/// One reduced group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedRow {
    pub group: String,
    pub x: f64,
    pub y: f64,
    pub sigma: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTable {
    /// Ordered by group label.
    pub rows: Vec<GroupedRow>,
    /// Labels of groups that were filtered out.
    pub dropped: Vec<String>,
}

impl GroupedTable {
    /// Move rows whose sigma is below `min_sigma` into `dropped`.
    ///
    /// Members that agree exactly leave a zero standard error, which the
    /// weighted fit rejects.
    pub fn drop_sigma_below(&mut self, min_sigma: f64) {
        let (keep, low): (Vec<_>, Vec<_>) = self.rows.drain(..).partition(|r| r.sigma >= min_sigma);
        self.rows = keep;
        self.dropped.extend(low.into_iter().map(|r| r.group));
    }
}

/// Read `label`, `x` and `y` columns from a raw measurement table.
pub fn load_measurements(path: &Path, columns: &GroupColumns) -> Result<Vec<Measurement>, GroupError> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers().map_err(IngestError::from)?.clone();
    let header_map = build_header_map(&headers);
    let names = [columns.label.as_str(), columns.x.as_str(), columns.y.as_str()];
    let idx = resolve_columns(&headers, &header_map, &names)?;

    let mut out = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = result.map_err(IngestError::from)?;
        let label = record.get(idx[0]).unwrap_or("").to_string();
        if label.is_empty() {
            return Err(GroupError::EmptyLabel { line });
        }
        out.push(Measurement {
            label,
            x: parse_cell(&record, idx[1], line, &columns.x)?,
            y: parse_cell(&record, idx[2], line, &columns.y)?,
        });
    }
    Ok(out)
}

/// Reduce measurements to per-group means and standard errors.
pub fn group_measurements(measurements: &[Measurement]) -> Result<GroupedTable, GroupError> {
    let mut groups: BTreeMap<&str, Vec<&Measurement>> = BTreeMap::new();
    for m in measurements {
        groups.entry(m.label.as_str()).or_default().push(m);
    }

    let mut rows = Vec::with_capacity(groups.len());
    let mut dropped = Vec::new();
    for (label, members) in groups {
        let n = members.len();
        if n < 2 {
            dropped.push(label.to_string());
            continue;
        }

        let nf = n as f64;
        let x = members.iter().map(|m| m.x).sum::<f64>() / nf;
        let y = members.iter().map(|m| m.y).sum::<f64>() / nf;
        let var = members.iter().map(|m| (m.y - y).powi(2)).sum::<f64>() / (nf - 1.0);

        rows.push(GroupedRow {
            group: label.to_string(),
            x,
            y,
            sigma: var.sqrt() / nf.sqrt(),
            count: n,
        });
    }

    if rows.is_empty() {
        return Err(GroupError::NoGroups);
    }
    Ok(GroupedTable { rows, dropped })
}

/// Write `group,x,y,sigma,count` rows.
pub fn write_grouped_csv(path: &Path, table: &GroupedTable) -> Result<(), GroupError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
