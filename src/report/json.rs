use crate::report::report_model::FillReport;

/// Machine-readable report for the surrounding system.
pub fn format_json_report(report: &FillReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        format!("{{\"error\":\"failed to serialize report: {}\"}}", e)
    })
}
