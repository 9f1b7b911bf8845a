//! # System Metrics Handler
//!
//! Example handler that summarises a host metrics snapshot: network egress
//! share, memory caching share and a per-CPU running utilisation average kept
//! in the execution context between calls.
//!
//! Input keys follow the `<collector>-<field>` naming of the metrics producer:
//! `cpu_percent-<n>`, `virtual_memory-{cached,buffers,total}` and
//! `net_io_counters_<iface>-bytes_{sent,recv}1`.

use crate::execution::{ExecutionContext, FunctionHandler, HandlerError};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

const CPU_PREFIX: &str = "cpu_percent-";
const AVERAGES_KEY: &str = "moving_avg_cpu";
const DEFAULT_WINDOW: u64 = 60;
const DEFAULT_INTERFACE: &str = "eth0";

#[derive(Debug, Clone)]
pub struct SystemMetricsHandler {
    window: u64,
    interface: String,
}

impl Default for SystemMetricsHandler {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            interface: DEFAULT_INTERFACE.to_string(),
        }
    }
}

impl SystemMetricsHandler {
    /// Build from module configuration (`window_seconds`, `interface`)
    pub fn from_config(config: &Map<String, Value>) -> Result<Self, HandlerError> {
        let mut handler = Self::default();

        if let Some(window) = config.get("window_seconds") {
            handler.window = window
                .as_u64()
                .filter(|w| *w > 0)
                .ok_or_else(|| {
                    HandlerError::invalid_config(format!(
                        "window_seconds must be a positive integer, got {window}"
                    ))
                })?;
        }

        if let Some(interface) = config.get("interface") {
            handler.interface = interface
                .as_str()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    HandlerError::invalid_config(format!(
                        "interface must be a non-empty string, got {interface}"
                    ))
                })?
                .to_string();
        }

        Ok(handler)
    }

    /// Running average update: `(prev * (window - 1) + current) / window`
    pub fn running_average(&self, previous: f64, current: f64) -> f64 {
        let window = self.window as f64;
        (previous * (window - 1.0) + current) / window
    }
}

fn number(event: &Map<String, Value>, key: &str, default: f64) -> Result<f64, HandlerError> {
    match event.get(key) {
        None => Ok(default),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| HandlerError::invalid_event(format!("{key} is not numeric: {value}"))),
    }
}

fn percentage(part: f64, whole: f64, what: &str) -> Result<f64, HandlerError> {
    if whole == 0.0 {
        return Err(HandlerError::execution(format!(
            "cannot compute {what}: denominator is zero"
        )));
    }
    Ok(part / whole * 100.0)
}

#[async_trait]
impl FunctionHandler for SystemMetricsHandler {
    async fn invoke(
        &self,
        event: &Value,
        context: &mut ExecutionContext,
    ) -> Result<Value, HandlerError> {
        let input = event
            .as_object()
            .ok_or_else(|| HandlerError::invalid_event("event must be a JSON object"))?;

        let sent = number(
            input,
            &format!("net_io_counters_{}-bytes_sent1", self.interface),
            0.0,
        )?;
        let recv = number(
            input,
            &format!("net_io_counters_{}-bytes_recv1", self.interface),
            1.0,
        )?;
        let egress = percentage(sent, sent + recv, "network egress")?;

        let cached = number(input, "virtual_memory-cached", 0.0)?;
        let buffers = number(input, "virtual_memory-buffers", 0.0)?;
        let total = number(input, "virtual_memory-total", 1.0)?;
        let caching = percentage(cached + buffers, total, "memory caching")?;

        let num_cpus = input.keys().filter(|k| k.starts_with(CPU_PREFIX)).count();

        let mut averages = match context.env.get(AVERAGES_KEY) {
            Some(Value::Object(existing)) => existing.clone(),
            _ => Map::new(),
        };

        let mut result = Map::new();
        result.insert("percent-network-egress".to_string(), json!(egress));
        result.insert("percent-memory-caching".to_string(), json!(caching));

        for cpu in 0..num_cpus {
            let key = format!("{CPU_PREFIX}{cpu}");
            let current = number(input, &key, 0.0)?;
            let previous = averages.get(&key).and_then(Value::as_f64).unwrap_or(0.0);
            let updated = self.running_average(previous, current);

            averages.insert(key, json!(updated));
            result.insert(
                format!("avg-util-cpu{cpu}-{}sec", self.window),
                json!(updated),
            );
        }

        context
            .env
            .insert(AVERAGES_KEY.to_string(), Value::Object(averages));

        Ok(Value::Object(result))
    }

    fn validate_config(&self, config: &Map<String, Value>) -> Result<(), HandlerError> {
        Self::from_config(config).map(|_| ())
    }

    fn handler_name(&self) -> &'static str {
        "system_metrics"
    }
}
