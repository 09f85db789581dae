//! Output-format exactness tests for the console summaries.

use std::time::Duration;

use rstest::rstest;
use serde_json::json;
use sonde_lib::{StabilityOutcome, TaskReport};
use sonde_runner::report;

#[test]
fn completed_report_shows_content_and_completion_time() {
    let rendered = report::render_task_report(&TaskReport::Completed {
        content: Some("joke text".to_string()),
        completion_time: Some("2025-09-12T18:04:11Z".to_string()),
    });
    assert!(rendered.contains("📝 Generated Content: joke text"));
    assert!(rendered.contains("⏰ Completed at: 2025-09-12T18:04:11Z"));
}

#[test]
fn pending_report_surfaces_the_status_verbatim() {
    let rendered = report::render_task_report(&TaskReport::from_body(
        &json!({"status": "HealthyBusy", "message": "still working"}).to_string(),
    ));
    assert!(rendered.contains("Task Status: HealthyBusy"));
    assert!(rendered.contains("Message: still working"));
}

#[test]
fn pending_report_includes_the_error_line_only_when_present() {
    let with_error = report::render_task_report(&TaskReport::Pending {
        status: Some("failed".to_string()),
        message: None,
        error: Some("boom".to_string()),
    });
    assert!(with_error.contains("❌ Error: boom"));

    let without_error = report::render_task_report(&TaskReport::Pending {
        status: Some("failed".to_string()),
        message: None,
        error: None,
    });
    assert!(!without_error.contains("❌ Error"));
}

#[test]
fn unparseable_report_carries_the_raw_body() {
    let raw = "{'status': 'completed'}";
    let rendered = report::render_task_report(&TaskReport::from_body(raw));
    assert!(rendered.contains(raw));
}

#[test]
fn ci_output_line_matches_the_pipeline_contract() {
    assert_eq!(
        report::ci_output("task_id", "1754300000"),
        "::set-output name=task_id::1754300000"
    );
}

#[rstest]
#[case(300, 305.0, true)]
#[case(300, 295.0, true)]
#[case(300, 310.0, true)]
#[case(300, 311.0, false)]
#[case(300, 120.0, false)]
fn timing_verdict_applies_the_tolerance(
    #[case] expected: u64,
    #[case] actual_secs: f64,
    #[case] passes: bool,
) {
    let verdict = report::timing_verdict(expected, Duration::from_secs_f64(actual_secs), 10);
    assert_eq!(verdict.contains("PASSED"), passes, "verdict: {verdict}");
}

#[rstest]
#[case(280, 300.0, true)]
#[case(280, 261.0, true)]
#[case(280, 100.0, false)]
#[case(280, 400.0, false)]
fn drop_verdict_uses_a_twenty_second_window(
    #[case] expected: u64,
    #[case] actual_secs: f64,
    #[case] confirmed: bool,
) {
    let verdict = report::drop_verdict(expected, Duration::from_secs_f64(actual_secs));
    assert_eq!(verdict.contains("CONFIRMED"), confirmed, "verdict: {verdict}");
}

#[test]
fn stability_verdicts_cover_all_three_shapes() {
    let threshold = Duration::from_secs(480);

    let stable = report::stability_verdict(
        &StabilityOutcome::Stable {
            held: Duration::from_secs(600),
        },
        threshold,
    );
    assert!(stable.contains("✅"));

    let dropped = report::stability_verdict(
        &StabilityOutcome::Dropped {
            after: Duration::from_secs(290),
            reason: "connection closed by peer".to_string(),
        },
        threshold,
    );
    assert!(dropped.contains("dropped before 480"));

    let short_window = report::stability_verdict(
        &StabilityOutcome::Stable {
            held: Duration::from_secs(60),
        },
        threshold,
    );
    assert!(short_window.contains("shorter"));
}
