//! Observer port - abstraction for run observation and data collection

use std::{cell::RefCell, rc::Rc};

use crate::{Result, pipeline::RunSummary, simulator::TickReport};

/// Observer trait for monitoring a simulation run
///
/// # Event Sequence
///
/// 1. `on_run_start(total_ticks)` - Once at the beginning
/// 2. `on_tick(report)` - After every successful tick
/// 3. `on_run_end(summary)` - Once after the last tick
///
/// A run that fails part-way never reaches `on_run_end`.
pub trait TickObserver {
    fn on_run_start(&mut self, _total_ticks: u64) -> Result<()> {
        Ok(())
    }

    fn on_tick(&mut self, _report: &TickReport) -> Result<()> {
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}

/// Lets a caller keep a handle on an observer after handing it to a run.
impl<T: TickObserver> TickObserver for Rc<RefCell<T>> {
    fn on_run_start(&mut self, total_ticks: u64) -> Result<()> {
        self.borrow_mut().on_run_start(total_ticks)
    }

    fn on_tick(&mut self, report: &TickReport) -> Result<()> {
        self.borrow_mut().on_tick(report)
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        self.borrow_mut().on_run_end(summary)
    }
}
