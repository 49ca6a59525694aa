//! CSV ingest.
//!
//! This module turns a delimited table into the three numeric sequences the
//! fit consumes.
//!
//! Design goals:
//! - **Strict schema** for the requested columns (all missing headers reported at once)
//! - **Strict cells**: a non-numeric cell is an error naming its line and column,
//!   never a silently skipped row
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;

use crate::domain::{ColumnSpec, DatasetStats, Observations};

/// Failures at the tabular-source boundary.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File was not found: '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to open '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File headers not found in CSV: missing {} (available: {})", missing.join(", "), available.join(", "))]
    MissingHeader {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Line {line}, column `{column}`: '{value}' is not a finite number")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Ingest output: parsed observations + stats + where they came from.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Observations,
    /// `None` when the table had no data rows.
    pub stats: Option<DatasetStats>,
    pub source: PathBuf,
    pub columns: ColumnSpec,
}

/// A table that could not be read, kept so a batch can report it.
#[derive(Debug)]
pub struct LoadFailure {
    pub name: String,
    pub error: IngestError,
}

/// Load the `x`, `y` and `sigma` columns named by `columns`.
pub fn load_observations(path: &Path, columns: &ColumnSpec) -> Result<IngestedData, IngestError> {
    load_table(path, columns, SigmaColumn::Required)
}

/// Load `x` and `y`; `sigma` is read when present and set to 0 otherwise.
///
/// For the unweighted fit, which takes no uncertainties.
pub fn load_observations_xy(path: &Path, columns: &ColumnSpec) -> Result<IngestedData, IngestError> {
    load_table(path, columns, SigmaColumn::Optional)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SigmaColumn {
    Required,
    Optional,
}

fn load_table(path: &Path, columns: &ColumnSpec, sigma: SigmaColumn) -> Result<IngestedData, IngestError> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();
    let header_map = build_header_map(&headers);

    let (ix, iy, is) = match sigma {
        SigmaColumn::Required => {
            let idx = resolve_columns(&headers, &header_map, &columns.names())?;
            (idx[0], idx[1], Some(idx[2]))
        }
        SigmaColumn::Optional => {
            let idx = resolve_columns(&headers, &header_map, &[columns.x.as_str(), columns.y.as_str()])?;
            let is = header_map.get(&normalize_header_name(&columns.sigma)).copied();
            (idx[0], idx[1], is)
        }
    };

    let mut obs = Observations::default();
    for (i, result) in reader.records().enumerate() {
        // +2: records start after the header, and lines are 1-based.
        let line = i + 2;
        let record = result?;
        obs.x.push(parse_cell(&record, ix, line, &columns.x)?);
        obs.y.push(parse_cell(&record, iy, line, &columns.y)?);
        obs.sigma.push(match is {
            Some(is) => parse_cell(&record, is, line, &columns.sigma)?,
            None => 0.0,
        });
    }

    let stats = DatasetStats::from_observations(&obs);
    Ok(IngestedData {
        observations: obs,
        stats,
        source: path.to_path_buf(),
        columns: columns.clone(),
    })
}

pub(crate) fn open_reader(path: &Path) -> Result<csv::Reader<File>, IngestError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => IngestError::NotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

pub(crate) fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Column indices for `names`, or every missing name at once.
pub(crate) fn resolve_columns(
    headers: &StringRecord,
    header_map: &HashMap<String, usize>,
    names: &[&str],
) -> Result<Vec<usize>, IngestError> {
    let mut found = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        match header_map.get(&normalize_header_name(name)) {
            Some(&idx) => found.push(idx),
            None => missing.push((*name).to_string()),
        }
    }

    if missing.is_empty() {
        Ok(found)
    } else {
        Err(IngestError::MissingHeader {
            missing,
            available: headers.iter().map(str::to_string).collect(),
        })
    }
}

pub(crate) fn parse_cell(record: &StringRecord, idx: usize, line: usize, column: &str) -> Result<f64, IngestError> {
    let text = record.get(idx).unwrap_or("");
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| IngestError::InvalidNumber {
            line,
            column: column.to_string(),
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_default_columns() {
        let f = write_csv("x,y,sigma\n1.0,2.0,0.1\n2.0,4.0,0.2\n3.0,6.0,0.3\n");
        let data = load_observations(f.path(), &ColumnSpec::default()).unwrap();

        assert_eq!(data.observations.x, vec![1.0, 2.0, 3.0]);
        assert_eq!(data.observations.y, vec![2.0, 4.0, 6.0]);
        assert_eq!(data.observations.sigma, vec![0.1, 0.2, 0.3]);
        let stats = data.stats.unwrap();
        assert_eq!(stats.n_points, 3);
        assert_eq!((stats.x_min, stats.x_max), (1.0, 3.0));
    }

    #[test]
    fn header_aliases_and_extra_columns() {
        let f = write_csv(
            "\u{feff}Group,Distance (Mpc),Velocities (km/s),Standard Deviation\n\
             A,0.0,-1.0,0.1\nB,1.0,1.0,0.1\n",
        );
        let columns = ColumnSpec {
            x: "Distance (Mpc)".to_string(),
            y: "velocities (km/s)".to_string(),
            sigma: "Standard Deviation".to_string(),
        };
        let data = load_observations(f.path(), &columns).unwrap();
        assert_eq!(data.observations.x, vec![0.0, 1.0]);
        assert_eq!(data.observations.y, vec![-1.0, 1.0]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_observations(Path::new("non_existent_file.csv"), &ColumnSpec::default()).unwrap_err();
        assert!(matches!(err, IngestError::NotFound { .. }));
        assert!(err.to_string().starts_with("File was not found"));
    }

    #[test]
    fn missing_headers_are_all_listed() {
        let f = write_csv("Distance (Mpc),Velocities (km/s),sigma\n0.0,-1.0,0.1\n");
        let err = load_observations(f.path(), &ColumnSpec::default()).unwrap_err();
        match err {
            IngestError::MissingHeader { missing, available } => {
                assert_eq!(missing, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(available.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_rejected() {
        let f = write_csv("x,y,sigma\n1.0,2.0,0.1\n2.0,abc,0.2\n");
        let err = load_observations(f.path(), &ColumnSpec::default()).unwrap_err();
        match err {
            IngestError::InvalidNumber { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "y");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn xy_loader_tolerates_missing_sigma() {
        let f = write_csv("x,y\n1.0,2.0\n2.0,4.0\n");
        let data = load_observations_xy(f.path(), &ColumnSpec::default()).unwrap();
        assert_eq!(data.observations.x, vec![1.0, 2.0]);
        assert_eq!(data.observations.sigma, vec![0.0, 0.0]);

        let f = write_csv("x,y,sigma\n1.0,2.0,0.5\n");
        let data = load_observations_xy(f.path(), &ColumnSpec::default()).unwrap();
        assert_eq!(data.observations.sigma, vec![0.5]);

        let f = write_csv("x,sigma\n1.0,0.5\n");
        let err = load_observations_xy(f.path(), &ColumnSpec::default()).unwrap_err();
        assert!(matches!(err, IngestError::MissingHeader { ref missing, .. } if missing == &["y".to_string()]));
    }

    #[test]
    fn header_only_file_yields_empty_set() {
        let f = write_csv("x,y,sigma\n");
        let data = load_observations(f.path(), &ColumnSpec::default()).unwrap();
        assert!(data.observations.is_empty());
        assert!(data.stats.is_none());
    }
}
