//! # Dispatcher
//!
//! Latest-value, change-triggered dispatch: each tick reads the input key,
//! and only a value that differs from the previously seen one causes an
//! invocation. Writes that land between two polls are never observed; at most
//! one of them is processed.
//!
//! Events are compared structurally. Numbers compare by value when either
//! side is a float, so `{"a": 1}` and `{"a": 1.0}` are the same event.
//!
//! No steady-state error leaves [`Dispatcher::tick`]. Every failure is logged
//! and reported as a [`TickOutcome`], and the loop carries on at the next tick.

use super::stats::DispatchStats;
use crate::execution::{BoundHandler, ExecutionContext, HandlerError};
use crate::messaging::ChannelStore;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Channel keys and pacing for the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub input_channel: String,
    pub output_channel: String,
    pub poll_interval: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            input_channel: "events".to_string(),
            output_channel: "results".to_string(),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Input key absent or empty
    NoData,
    /// Store read failed
    ReadFailed,
    /// Input was not valid JSON
    DecodeFailed,
    /// Input equal to the previous event; handler not invoked
    Duplicate,
    /// Handler returned a mapping and it was written to the output key
    Published,
    /// Handler returned something other than a mapping
    Discarded,
    /// Handler returned an error or panicked
    HandlerFailed,
    /// Result could not be encoded or written
    WriteFailed,
}

impl TickOutcome {
    /// Whether the handler was invoked during the tick
    pub fn invoked(&self) -> bool {
        matches!(
            self,
            TickOutcome::Published
                | TickOutcome::Discarded
                | TickOutcome::HandlerFailed
                | TickOutcome::WriteFailed
        )
    }
}

/// Polls the input channel and drives the bound handler
#[derive(Debug)]
pub struct Dispatcher<S: ChannelStore> {
    store: S,
    handler: BoundHandler,
    context: ExecutionContext,
    previous_event: Option<Value>,
    last_error: Option<HandlerError>,
    settings: DispatchSettings,
    stats: DispatchStats,
}

impl<S: ChannelStore> Dispatcher<S> {
    /// Create a dispatcher with a fresh context seeded from the handler's configuration
    pub fn new(store: S, handler: BoundHandler, settings: DispatchSettings) -> Self {
        let context = handler.new_context();
        Self {
            store,
            handler,
            context,
            previous_event: None,
            last_error: None,
            settings,
            stats: DispatchStats::default(),
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The most recent handler failure, including caught panics
    pub fn last_error(&self) -> Option<&HandlerError> {
        self.last_error.as_ref()
    }

    /// Poll forever: tick, then sleep for the poll interval
    ///
    /// Only external termination stops the loop.
    #[instrument(skip(self), fields(function = %self.handler.function_name))]
    pub async fn run(&mut self) {
        info!(
            input_channel = %self.settings.input_channel,
            output_channel = %self.settings.output_channel,
            poll_interval_ms = self.settings.poll_interval.as_millis() as u64,
            store = %self.store.endpoint(),
            "🚀 Starting dispatch loop"
        );

        loop {
            self.tick().await;
            sleep(self.settings.poll_interval).await;
        }
    }

    /// Perform one read → compare → invoke → write cycle
    pub async fn tick(&mut self) -> TickOutcome {
        let outcome = self.poll_once().await;
        self.stats.record(outcome);
        outcome
    }

    async fn poll_once(&mut self) -> TickOutcome {
        let input_channel = &self.settings.input_channel;

        let raw = match self.store.read(input_channel).await {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                info!(input_channel = %input_channel, "No data found on input channel");
                return TickOutcome::NoData;
            }
            Err(e) => {
                error!(input_channel = %input_channel, error = %e, "Error reading input channel");
                return TickOutcome::ReadFailed;
            }
        };

        let event: Value = match serde_json::from_slice(&raw) {
            Ok(event) => event,
            Err(e) => {
                error!(input_channel = %input_channel, error = %e, "JSON decode error");
                return TickOutcome::DecodeFailed;
            }
        };

        if self
            .previous_event
            .as_ref()
            .is_some_and(|previous| same_event(previous, &event))
        {
            debug!(input_channel = %input_channel, "No new events detected");
            return TickOutcome::Duplicate;
        }

        info!(input_channel = %input_channel, "Processing new event...");
        // The cache moves before the handler runs, so a failing event is not retried.
        self.previous_event = Some(event.clone());

        self.invoke(&event).await
    }

    async fn invoke(&mut self, event: &Value) -> TickOutcome {
        let invocation = self.context.begin_invocation();
        let handler = Arc::clone(self.handler.handler());

        let result = AssertUnwindSafe(handler.invoke(event, &mut self.context))
            .catch_unwind()
            .await;

        let result = result.unwrap_or_else(|panic| {
            Err(HandlerError::panicked(panic_message(panic.as_ref())))
        });

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                error!(invocation = invocation, error = %e, "Error while processing event");
                self.last_error = Some(e);
                return TickOutcome::HandlerFailed;
            }
        };

        if !output.is_object() {
            warn!(
                invocation = invocation,
                returned = json_kind(&output),
                "Handler did not return a mapping. Output ignored."
            );
            return TickOutcome::Discarded;
        }

        self.publish(&output, invocation).await
    }

    async fn publish(&self, output: &Value, invocation: u64) -> TickOutcome {
        let output_channel = &self.settings.output_channel;

        let payload = match serde_json::to_vec(output) {
            Ok(payload) => payload,
            Err(e) => {
                error!(invocation = invocation, error = %e, "Failed to encode handler result");
                return TickOutcome::WriteFailed;
            }
        };

        match self.store.write(output_channel, payload).await {
            Ok(()) => {
                info!(
                    invocation = invocation,
                    output_channel = %output_channel,
                    "Result stored under output channel"
                );
                TickOutcome::Published
            }
            Err(e) => {
                error!(
                    invocation = invocation,
                    output_channel = %output_channel,
                    error = %e,
                    "Failed to write result"
                );
                TickOutcome::WriteFailed
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Structural event equality with numeric comparison across int/float
fn same_event(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => {
            l == r
                || ((l.is_f64() || r.is_f64())
                    && matches!((l.as_f64(), r.as_f64()), (Some(a), Some(b)) if a == b))
        }
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| same_event(a, b))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l
                    .iter()
                    .all(|(key, a)| r.get(key).is_some_and(|b| same_event(a, b)))
        }
        _ => left == right,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
