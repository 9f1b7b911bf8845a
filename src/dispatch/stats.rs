//! Per-outcome tick counters.

use super::dispatcher::TickOutcome;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub ticks: u64,
    pub invocations: u64,
    pub published: u64,
    pub discarded: u64,
    pub handler_failures: u64,
    pub write_failures: u64,
    pub duplicates: u64,
    pub empty_reads: u64,
    pub read_failures: u64,
    pub decode_failures: u64,
}

impl DispatchStats {
    pub fn record(&mut self, outcome: TickOutcome) {
        self.ticks += 1;
        if outcome.invoked() {
            self.invocations += 1;
        }

        match outcome {
            TickOutcome::NoData => self.empty_reads += 1,
            TickOutcome::ReadFailed => self.read_failures += 1,
            TickOutcome::DecodeFailed => self.decode_failures += 1,
            TickOutcome::Duplicate => self.duplicates += 1,
            TickOutcome::Published => self.published += 1,
            TickOutcome::Discarded => self.discarded += 1,
            TickOutcome::HandlerFailed => self.handler_failures += 1,
            TickOutcome::WriteFailed => self.write_failures += 1,
        }
    }
}
