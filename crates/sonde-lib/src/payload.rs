//! Request payload builders.
//!
//! Payloads are built fresh per call and never reused; the field names are
//! part of the wire contract the diagnostic agents expect.

use serde_json::{json, Value};

/// Payload for the synchronous probe. The agent works in one-minute steps,
/// so the requested duration is converted to `steps = max(1, duration / 60)`.
pub fn sync_payload(prompt: &str, duration_secs: u64, filler_bytes: Option<usize>) -> Value {
    let mut payload = json!({
        "prompt": prompt,
        "steps": sync_steps(duration_secs),
    });
    pad(&mut payload, filler_bytes);
    payload
}

/// Step count requested from the synchronous agent.
pub fn sync_steps(duration_secs: u64) -> u64 {
    (duration_secs / 60).max(1)
}

/// Payload for the asynchronous start call; the agent acknowledges
/// immediately and runs `duration_seconds` of background work.
pub fn start_payload(prompt: &str, duration_secs: u64, filler_bytes: Option<usize>) -> Value {
    let mut payload = json!({
        "prompt": prompt,
        "duration_seconds": duration_secs,
    });
    pad(&mut payload, filler_bytes);
    payload
}

/// Payload for the result-fetch call. The service has returned both numeric
/// and string task ids, so the id is sent as a number only when it parses as
/// one.
pub fn fetch_payload(task_id: &str) -> Value {
    let id: Value = match task_id.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(task_id),
    };
    json!({
        "action": "get_results",
        "task_id": id,
    })
}

/// Pads a payload with a `large_data` field to reach a target request size,
/// used when reproducing size-dependent retry behavior.
fn pad(payload: &mut Value, filler_bytes: Option<usize>) {
    if let Some(n) = filler_bytes {
        if n > 0 {
            payload["large_data"] = Value::from("x".repeat(n));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(59, 1)]
    #[case(60, 1)]
    #[case(120, 2)]
    #[case(420, 7)]
    fn duration_converts_to_one_minute_steps(#[case] duration: u64, #[case] steps: u64) {
        assert_eq!(sync_steps(duration), steps);
        assert_eq!(sync_payload("hi", duration, None)["steps"], steps);
    }

    #[test]
    fn start_payload_carries_duration_seconds() {
        let p = start_payload("tell me a joke", 420, None);
        assert_eq!(p["prompt"], "tell me a joke");
        assert_eq!(p["duration_seconds"], 420);
        assert!(p.get("large_data").is_none());
    }

    #[test]
    fn filler_pads_to_requested_size() {
        let p = start_payload("hi", 60, Some(50_000));
        assert_eq!(p["large_data"].as_str().unwrap().len(), 50_000);
    }

    #[test]
    fn fetch_payload_keeps_numeric_ids_numeric() {
        let p = fetch_payload("1754300000");
        assert_eq!(p["action"], "get_results");
        assert_eq!(p["task_id"], 1754300000i64);
    }

    #[test]
    fn fetch_payload_passes_opaque_ids_through() {
        let p = fetch_payload("task-8f3a");
        assert_eq!(p["task_id"], "task-8f3a");
    }
}
