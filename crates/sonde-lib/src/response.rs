//! Strict response parsing and task-state classification.
//!
//! The remote service's serialization format is observed to vary, and its
//! schema is owned by the service, not by this repository. Bodies are parsed
//! strictly as JSON; anything else is classified `Unparseable` and reported
//! raw instead of being fed to a permissive evaluator. Field access on parsed
//! bodies stays `Option`-based so schema drift degrades to an opaque report
//! rather than an error.

use serde_json::Value;

/// Classification of one response body.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskReport {
    /// `status == "completed"`: the background work finished.
    Completed {
        content: Option<String>,
        completion_time: Option<String>,
    },
    /// Any other reported status; the label is surfaced verbatim.
    Pending {
        status: Option<String>,
        message: Option<String>,
        error: Option<String>,
    },
    /// Valid JSON that carries no `status` field (or is not an object).
    Opaque(Value),
    /// Not valid JSON. Reported raw; never fatal.
    Unparseable { raw: String },
}

impl TaskReport {
    /// Classifies a raw body. This never fails: the unparseable path is an
    /// explicit outcome, not an error.
    pub fn from_body(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => {
                return Self::Unparseable {
                    raw: raw.to_string(),
                }
            }
        };

        match value.get("status").and_then(Value::as_str) {
            Some("completed") => Self::Completed {
                content: str_field(&value, "processed_data"),
                completion_time: str_field(&value, "completion_time"),
            },
            Some(status) => Self::Pending {
                status: Some(status.to_string()),
                message: str_field(&value, "message"),
                error: str_field(&value, "error"),
            },
            None => Self::Opaque(value),
        }
    }
}

/// Extracts the task identifier from a start-call acknowledgment. The service
/// has returned it both as a JSON number and as a string.
pub fn task_id(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    match value.get("task_id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completed_record_is_recognized() {
        let raw = json!({
            "status": "completed",
            "processed_data": "joke text",
            "completion_time": "2025-09-12T18:04:11Z",
        })
        .to_string();
        assert_eq!(
            TaskReport::from_body(&raw),
            TaskReport::Completed {
                content: Some("joke text".to_string()),
                completion_time: Some("2025-09-12T18:04:11Z".to_string()),
            }
        );
    }

    #[test]
    fn other_statuses_are_surfaced_verbatim() {
        let raw = json!({
            "status": "in_progress",
            "message": "still working",
        })
        .to_string();
        match TaskReport::from_body(&raw) {
            TaskReport::Pending {
                status, message, ..
            } => {
                assert_eq!(status.as_deref(), Some("in_progress"));
                assert_eq!(message.as_deref(), Some("still working"));
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn json_without_status_is_opaque() {
        let report = TaskReport::from_body(r#"{"result": 42}"#);
        assert_eq!(report, TaskReport::Opaque(json!({"result": 42})));
    }

    #[test]
    fn non_json_body_is_unparseable_not_a_panic() {
        // The shape the service sometimes returns: a Python-literal dict.
        let raw = "{'status': 'completed', 'processed_data': 'x'}";
        assert_eq!(
            TaskReport::from_body(raw),
            TaskReport::Unparseable {
                raw: raw.to_string()
            }
        );
    }

    #[test]
    fn task_id_accepts_numbers_and_strings() {
        assert_eq!(
            task_id(r#"{"task_id": 1754300000}"#).as_deref(),
            Some("1754300000")
        );
        assert_eq!(
            task_id(r#"{"task_id": "task-8f3a"}"#).as_deref(),
            Some("task-8f3a")
        );
        assert_eq!(task_id(r#"{"status": "ok"}"#), None);
        assert_eq!(task_id("not json"), None);
    }
}
