//! In-memory pose sink for testing and embedding.

use crate::{Result, ports::PoseSink, types::PoseRecord};

/// Collects every snapshot in a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPoseSink {
    records: Vec<PoseRecord>,
    finished: bool,
}

impl InMemoryPoseSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PoseRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PoseRecord> {
        self.records
    }

    /// Whether [`PoseSink::finish`] has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl PoseSink for InMemoryPoseSink {
    fn write(&mut self, record: &PoseRecord) -> Result<()> {
        self.records.push(*record);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_records() {
        let mut sink = InMemoryPoseSink::new();
        let record = PoseRecord {
            tick: 3,
            x: 1.0,
            y: 2.0,
            theta: 0.5,
        };
        sink.write(&record).unwrap();
        assert!(!sink.is_finished());
        sink.finish().unwrap();
        assert!(sink.is_finished());
        assert_eq!(sink.into_records(), vec![record]);
    }
}
