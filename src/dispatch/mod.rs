//! # Dispatch Loop
//!
//! Single logical thread of control: ticks are strictly sequential and a
//! slow handler blocks the loop. The previous-event cache and the execution
//! context live only as long as the process.

pub mod dispatcher;
pub mod stats;

pub use dispatcher::{DispatchSettings, Dispatcher, TickOutcome};
pub use stats::DispatchStats;
