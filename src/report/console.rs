use crate::fill::fill_model::FillOutcome;
use crate::report::report_model::FillReport;

/// Human-readable pass report for terminal output.
pub fn format_console_report(report: &FillReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Fill pass: {}\n", report.url));
    out.push_str(&format!(
        "Platform: {}  ({} fields, {} ms)\n",
        report.platform,
        report.total(),
        report.duration_ms
    ));
    out.push_str(&format!(
        "  filled: {}  unverified: {}  skipped: {}  failed: {}  needs-ai: {}  needs-file: {}\n\n",
        report.filled,
        report.filled_unverified,
        report.skipped,
        report.failed,
        report.needs_ai,
        report.needs_file
    ));

    for detail in &report.details {
        let marker = match detail.outcome {
            FillOutcome::Filled => "✓",
            FillOutcome::FilledUnverified => "~",
            FillOutcome::Skipped => "-",
            FillOutcome::Failed => "✗",
            FillOutcome::NeedsAi => "?",
            FillOutcome::NeedsFile => "□",
        };
        out.push_str(&format!(
            "  {} {} [{}]",
            marker, detail.label, detail.identifier
        ));
        if detail.attempts > 1 {
            out.push_str(&format!(" ({} attempts)", detail.attempts));
        }
        if let Some(message) = &detail.message {
            out.push_str(&format!(" — {}", message));
        }
        out.push('\n');
    }

    if report.failed > 0 {
        out.push_str(&format!("\n{} field(s) failed.\n", report.failed));
    }
    out
}
