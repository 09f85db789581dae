//! Console-report rendering.
//!
//! The console is the sole product of every probe run, so the summary lines
//! are built here as plain strings and unit-tested for exactness. Reported
//! status labels from the service are surfaced verbatim.

use std::time::Duration;

use chrono::Local;
use sonde_lib::{StabilityOutcome, TaskReport};

/// Wall-clock stamp for "started/completed at" lines.
pub fn now_hms() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// The CI output line a subsequent pipeline step consumes.
pub fn ci_output(key: &str, value: &str) -> String {
    format!("::set-output name={key}::{value}")
}

/// Renders the parsed response body into the summary block.
pub fn render_task_report(report: &TaskReport) -> String {
    match report {
        TaskReport::Completed {
            content,
            completion_time,
        } => format!(
            "🎉 AGENT SUCCESS!\n📝 Generated Content: {}\n⏰ Completed at: {}",
            content.as_deref().unwrap_or("No content"),
            completion_time.as_deref().unwrap_or("Unknown"),
        ),
        TaskReport::Pending {
            status,
            message,
            error,
        } => {
            let mut lines = format!(
                "⚠️  Task Status: {}\n📝 Message: {}",
                status.as_deref().unwrap_or("Unknown"),
                message.as_deref().unwrap_or("No message"),
            );
            if let Some(error) = error {
                lines.push_str(&format!("\n❌ Error: {error}"));
            }
            lines
        }
        TaskReport::Opaque(value) => format!("📄 Response Data: {value}"),
        TaskReport::Unparseable { raw } => {
            format!("⚠️  Could not parse response, showing raw: {raw}")
        }
    }
}

/// Compares actual elapsed time against the requested duration.
pub fn timing_verdict(expected_secs: u64, actual: Duration, tolerance_secs: u64) -> String {
    let actual_secs = actual.as_secs_f64();
    if (actual_secs - expected_secs as f64).abs() <= tolerance_secs as f64 {
        format!("✅ Timing verification: PASSED ({actual_secs:.1}s ≈ {expected_secs}s)")
    } else {
        format!("⚠️  Timing difference: Expected {expected_secs}s, got {actual_secs:.1}s")
    }
}

/// Classifies a transport failure against an expected connection-drop time,
/// within a ±20 s window.
pub fn drop_verdict(expected_drop_secs: u64, actual: Duration) -> String {
    let actual_secs = actual.as_secs_f64();
    let lo = expected_drop_secs.saturating_sub(20) as f64;
    let hi = (expected_drop_secs + 20) as f64;
    if actual_secs >= lo && actual_secs <= hi {
        format!(
            "✅ CONFIRMED: connection dropped around {expected_drop_secs}s - this matches the runner's connection limit"
        )
    } else {
        format!("🔍 Connection dropped at {actual_secs:.1}s - investigate timing")
    }
}

/// Final verdict of a stability run: did the connection hold long enough?
pub fn stability_verdict(outcome: &StabilityOutcome, stable_after: Duration) -> String {
    let (held, dropped) = match outcome {
        StabilityOutcome::Stable { held } => (*held, false),
        StabilityOutcome::Dropped { after, .. } => (*after, true),
    };
    let threshold = stable_after.as_secs();
    if held >= stable_after {
        format!("✅ Connection stable for {threshold}+ seconds")
    } else if dropped {
        format!("❌ Connection dropped before {threshold} seconds - likely runner issue")
    } else {
        format!("⚠️  Observation window shorter than the {threshold}s stability threshold")
    }
}
