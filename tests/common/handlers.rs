//! Test handler classes and a registry that counts factory calls.

use async_trait::async_trait;
use function_runtime::execution::{ExecutionContext, FunctionHandler, HandlerError};
use function_runtime::registry::HandlerRegistry;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Records every event it sees and returns `{"seen": <count>, "event": <event>}`
///
/// The count is kept in `context.env`, so it also shows context persistence.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub events: Mutex<Vec<Value>>,
}

impl RecordingHandler {
    pub fn calls(&self) -> usize {
        self.events.lock().len()
    }
}

#[async_trait]
impl FunctionHandler for RecordingHandler {
    async fn invoke(
        &self,
        event: &Value,
        context: &mut ExecutionContext,
    ) -> Result<Value, HandlerError> {
        self.events.lock().push(event.clone());

        let seen = context.env.get("seen").and_then(Value::as_u64).unwrap_or(0) + 1;
        context.env.insert("seen".to_string(), json!(seen));

        Ok(json!({ "seen": seen, "event": event }))
    }

    fn handler_name(&self) -> &'static str {
        "recording"
    }
}

/// Always fails with an execution error
#[derive(Debug, Default)]
pub struct FailingHandler {
    pub calls: AtomicUsize,
}

#[async_trait]
impl FunctionHandler for FailingHandler {
    async fn invoke(
        &self,
        _event: &Value,
        _context: &mut ExecutionContext,
    ) -> Result<Value, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(HandlerError::execution("boom"))
    }
}

/// Panics on every call
#[derive(Debug, Default)]
pub struct PanickingHandler;

#[async_trait]
impl FunctionHandler for PanickingHandler {
    async fn invoke(
        &self,
        _event: &Value,
        _context: &mut ExecutionContext,
    ) -> Result<Value, HandlerError> {
        panic!("handler exploded");
    }
}

/// Returns a fixed value regardless of the event
#[derive(Debug)]
pub struct FixedResultHandler {
    pub result: Value,
    pub calls: AtomicUsize,
}

impl FixedResultHandler {
    pub fn new(result: Value) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FunctionHandler for FixedResultHandler {
    async fn invoke(
        &self,
        _event: &Value,
        _context: &mut ExecutionContext,
    ) -> Result<Value, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// Rejects any configuration lacking a `required` key
#[derive(Debug, Default)]
pub struct StrictConfigHandler;

#[async_trait]
impl FunctionHandler for StrictConfigHandler {
    async fn invoke(
        &self,
        event: &Value,
        _context: &mut ExecutionContext,
    ) -> Result<Value, HandlerError> {
        Ok(event.clone())
    }

    fn validate_config(&self, config: &Map<String, Value>) -> Result<(), HandlerError> {
        if config.contains_key("required") {
            Ok(())
        } else {
            Err(HandlerError::invalid_config("missing 'required'"))
        }
    }
}

/// Registry with the `recording` and `strict` test classes plus the built-ins
///
/// The returned counter tracks how many times any test factory ran.
pub fn counting_registry() -> (HandlerRegistry, Arc<AtomicUsize>) {
    let factory_calls = Arc::new(AtomicUsize::new(0));
    let mut registry = function_runtime::handlers::builtin_registry().expect("built-ins register");

    let calls = Arc::clone(&factory_calls);
    registry
        .register("recording", "Records events", move |_config| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(RecordingHandler::default()) as Arc<dyn FunctionHandler>)
        })
        .expect("register recording");

    let calls = Arc::clone(&factory_calls);
    registry
        .register("strict", "Requires a 'required' key", move |_config| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(StrictConfigHandler) as Arc<dyn FunctionHandler>)
        })
        .expect("register strict");

    (registry, factory_calls)
}
