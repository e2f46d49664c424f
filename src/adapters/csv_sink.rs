//! CSV pose export.
//!
//! Writes a `x,y,theta` header followed by one row per snapshot, each value
//! fixed to two decimals so existing consumers of the export keep working.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Error, Result, ports::PoseSink, types::PoseRecord};

const HEADER: [&str; 3] = ["x", "y", "theta"];

/// CSV-backed [`PoseSink`].
pub struct CsvPoseSink<W: Write = BufWriter<File>> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvPoseSink {
    /// Create (or truncate) `path` and write the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        Self::from_writer(BufWriter::new(file))
    }
}

impl<W: Write> CsvPoseSink<W> {
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer, rows: 0 })
    }

    /// Number of data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io {
                operation: "flush CSV writer".to_string(),
                source: std::io::Error::new(e.error().kind(), e.error().to_string()),
            })
    }
}

impl<W: Write> PoseSink for CsvPoseSink<W> {
    fn write(&mut self, record: &PoseRecord) -> Result<()> {
        self.writer.write_record([
            format!("{:.2}", record.x),
            format!("{:.2}", record.y),
            format!("{:.2}", record.theta),
        ])?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| Error::Io {
            operation: "flush CSV output".to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn record(tick: u64, x: f64, y: f64, theta: f64) -> PoseRecord {
        PoseRecord { tick, x, y, theta }
    }

    #[test]
    fn test_header_and_two_decimal_rows() {
        let mut sink = CsvPoseSink::from_writer(Vec::new()).unwrap();
        sink.write(&record(0, 1.23456, -0.005, 3.0)).unwrap();
        sink.write(&record(1, 10.0, 2.999, -1.0 / 3.0)).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.rows(), 2);

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(text, "x,y,theta\n1.23,-0.01,3.00\n10.00,3.00,-0.33\n");
    }

    #[test]
    fn test_header_only_when_empty() {
        let sink = CsvPoseSink::from_writer(Vec::new()).unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(text, "x,y,theta\n");
    }

    #[test]
    fn test_file_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vehicle_data.csv");
        let mut sink = CsvPoseSink::create(&path).unwrap();
        sink.write(&record(100, 5.5, 0.0, 0.0)).unwrap();
        sink.finish().unwrap();
        drop(sink);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "x,y,theta\n5.50,0.00,0.00\n");
    }

    #[test]
    fn test_unwritable_path_is_resource_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = CsvPoseSink::create(&path).err().unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Resource);
    }
}
