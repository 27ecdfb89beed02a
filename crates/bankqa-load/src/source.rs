use std::path::PathBuf;

use bankqa_core::{CellValue, Frame};

use crate::errors::LoadError;

/// Where the rows of a table come from.
#[derive(Debug, Clone)]
pub enum TableSource {
    /// Rows already held in memory.
    Frame(Frame),
    /// A CSV file, given as a filesystem path or a `file://` URL.
    Csv(String),
}

impl TableSource {
    pub fn into_frame(self) -> Result<Frame, LoadError> {
        match self {
            TableSource::Frame(frame) => Ok(frame),
            TableSource::Csv(location) => read_csv_frame(&location),
        }
    }
}

impl From<Frame> for TableSource {
    fn from(frame: Frame) -> Self {
        TableSource::Frame(frame)
    }
}

/// Read a CSV with a header row into a [`Frame`].
///
/// Empty cells become nulls; other cells are parsed as integers, then floats,
/// falling back to text. Short rows are padded with nulls.
pub fn read_csv_frame(location: &str) -> Result<Frame, LoadError> {
    let path = resolve_location(location)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(LoadError::InvalidSource(format!(
            "{} has no header row",
            path.display()
        )));
    }

    let mut frame = Frame::new(columns);
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > frame.columns.len() {
            return Err(LoadError::InvalidSource(format!(
                "row {} has {} fields but header has {}",
                line + 1,
                record.len(),
                frame.columns.len()
            )));
        }
        let mut row: Vec<CellValue> = record.iter().map(parse_cell).collect();
        row.resize(frame.columns.len(), CellValue::Null);
        frame
            .push_row(row)
            .map_err(|err| LoadError::InvalidSource(err.to_string()))?;
    }

    Ok(frame)
}

fn resolve_location(location: &str) -> Result<PathBuf, LoadError> {
    if let Some(path) = location.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if let Some((scheme, _)) = location.split_once("://") {
        return Err(LoadError::InvalidSource(format!(
            "unsupported location scheme '{scheme}'"
        )));
    }
    Ok(PathBuf::from(location))
}

fn parse_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }
    if let Ok(value) = raw.parse::<i64>() {
        return CellValue::Int(value);
    }
    if let Ok(value) = raw.parse::<f64>() {
        if value.is_finite() {
            return CellValue::Float(value);
        }
    }
    CellValue::Text(raw.to_string())
}
