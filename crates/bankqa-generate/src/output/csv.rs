use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bankqa_core::Frame;

use crate::engine::BankDataset;
use crate::errors::GenerationError;
use crate::model::DatasetTable;

/// One CSV file produced by [`write_dataset_csv`].
#[derive(Debug, Clone)]
pub struct WrittenTable {
    pub table: DatasetTable,
    pub file: String,
    pub rows: u64,
    pub bytes: u64,
}

/// Write `customers.csv`, `accounts.csv` and `transactions.csv` into `dir`.
pub fn write_dataset_csv(
    dir: &Path,
    dataset: &BankDataset,
) -> Result<Vec<WrittenTable>, GenerationError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(DatasetTable::ALL.len());
    for table in DatasetTable::ALL {
        let file = table.file_name();
        let frame = dataset.frame(table);
        let bytes = write_frame_csv(&dir.join(&file), &frame)?;
        written.push(WrittenTable {
            table,
            file,
            rows: frame.len() as u64,
            bytes,
        });
    }
    Ok(written)
}

/// Write a frame as CSV, header first. Returns the number of bytes written.
pub fn write_frame_csv(path: &Path, frame: &Frame) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(&frame.columns)?;

    for row in &frame.rows {
        let record: Vec<String> = row.iter().map(|value| value.to_csv()).collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
