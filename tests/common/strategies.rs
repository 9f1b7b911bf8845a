use proptest::prelude::*;
use serde_json::{json, Value};

/// Strategy for small JSON events drawn from a narrow pool, so repeats are common
pub fn event_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0u8..4).prop_map(|n| json!({ "n": n })),
        (0u8..3).prop_map(|n| json!({ "cpu_percent-0": n, "cpu_percent-1": 100 - n })),
        Just(json!({})),
        Just(json!({ "nested": { "data": [1, 2, 3] } })),
    ]
}

/// Strategy for sequences of events observed on consecutive ticks
pub fn event_sequence_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(event_strategy(), 1..40)
}

/// Number of positions where an event differs from the one before it
pub fn distinct_transitions(events: &[Value]) -> usize {
    let mut previous: Option<&Value> = None;
    let mut count = 0;
    for event in events {
        if previous != Some(event) {
            count += 1;
        }
        previous = Some(event);
    }
    count
}
