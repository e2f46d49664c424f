//! Sink port - destination for exported pose snapshots

use crate::{Result, types::PoseRecord};

/// Accepts pose snapshots produced by a run.
///
/// Failures are reported to the caller; the simulator state that produced
/// the record is unaffected.
///
/// # Examples
///
/// ```
/// use vehicle_control::{ports::PoseSink, types::PoseRecord};
///
/// struct CountingSink(usize);
///
/// impl PoseSink for CountingSink {
///     fn write(&mut self, _record: &PoseRecord) -> vehicle_control::Result<()> {
///         self.0 += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait PoseSink {
    /// Export one snapshot.
    fn write(&mut self, record: &PoseRecord) -> Result<()>;

    /// Flush buffered output. Called once after the last snapshot.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
