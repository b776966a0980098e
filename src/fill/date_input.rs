use chrono::NaiveDate;

use crate::browser::driver::PageDriver;
use crate::dom::node::{DomIndex, DomNode, ExtractedPage};
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::{FillOutcome, MappedField};
use crate::fill::text_input::escalate_tiers;
use crate::fill::verify::verify_text;
use crate::profile::dates::{detect_convention, parse_flexible, parts, DateConvention};
use crate::scan::scan_model::ControlKind;

/// The shapes a date field comes in.
enum DateShape {
    /// `<input type="date">` / `<input type="month">`
    Native(DateConvention),
    /// Separate month/day/year inputs or selects in one container.
    Split(Vec<DatePart>),
    /// Picker widget wrapping a plain input.
    Picker(DateConvention),
    /// Plain text input with a convention hint (or the default).
    Text(DateConvention),
}

struct DatePart {
    node: crate::dom::node::NodeId,
    is_select: bool,
    component: DateComponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateComponent {
    Month,
    Day,
    Year,
}

/// Fill a date field, formatting to the detected or inferred convention
/// (default `MM/DD/YYYY`).
pub fn fill_date(
    driver: &mut dyn PageDriver,
    page: &ExtractedPage,
    field: &MappedField,
    value: &str,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let scanned = &field.classified.field;

    let Some(date) = parse_flexible(value) else {
        // Not a calendar date we understand; write it through as text.
        return escalate_tiers(driver, scanned.node, value, ctx);
    };

    match detect_shape(scanned, page) {
        DateShape::Native(convention) => {
            let formatted = convention.format(date);
            driver.set_value(scanned.node, &formatted)?;
            driver.wait(ctx.settings.step_delay_ms)?;
            if verify_text(driver, scanned.node, &formatted)? {
                Ok((FillOutcome::Filled, 1))
            } else {
                Ok((FillOutcome::FilledUnverified, 1))
            }
        }
        DateShape::Split(cluster) => fill_split(driver, date, &cluster, ctx),
        DateShape::Picker(convention) | DateShape::Text(convention) => {
            escalate_tiers(driver, scanned.node, &convention.format(date), ctx)
        }
    }
}

// ============================================================================
// Shape detection
// ============================================================================

fn detect_shape(scanned: &crate::scan::scan_model::ScannedField, page: &ExtractedPage) -> DateShape {
    if scanned.control == ControlKind::Date {
        return DateShape::Native(DateConvention::Iso);
    }
    if scanned.control == ControlKind::Month {
        return DateShape::Native(DateConvention::IsoMonth);
    }

    let index = DomIndex::build(page);
    if let Some(cluster) = split_cluster(scanned, &index) {
        return DateShape::Split(cluster);
    }

    let convention = hint_convention(scanned).unwrap_or(DateConvention::MonthDayYear);
    if in_picker(scanned) {
        DateShape::Picker(convention)
    } else {
        DateShape::Text(convention)
    }
}

fn hint_convention(scanned: &crate::scan::scan_model::ScannedField) -> Option<DateConvention> {
    for hint in [
        scanned.placeholder.as_deref(),
        scanned.attrs.get("pattern").map(|s| s.as_str()),
        scanned.label.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(c) = detect_convention(hint) {
            return Some(c);
        }
    }
    None
}

fn in_picker(scanned: &crate::scan::scan_model::ScannedField) -> bool {
    scanned
        .attrs
        .get("class")
        .map(|c| {
            let c = c.to_lowercase();
            c.contains("datepicker") || c.contains("date-picker")
        })
        .unwrap_or(false)
        || scanned.attrs.get("aria-haspopup").map(|v| v == "dialog").unwrap_or(false)
}

/// Month/day/year inputs grouped by container + hint keywords. The field
/// itself must be one of the parts, and at least month and year must be
/// identifiable.
fn split_cluster(
    scanned: &crate::scan::scan_model::ScannedField,
    index: &DomIndex<'_>,
) -> Option<Vec<DatePart>> {
    let container = index.parent_of(scanned.node)?;
    let mut cluster = Vec::new();

    collect_parts(container, &mut cluster);

    let has_self = cluster.iter().any(|p: &DatePart| p.node == scanned.node);
    let has_month = cluster.iter().any(|p| p.component == DateComponent::Month);
    let has_year = cluster.iter().any(|p| p.component == DateComponent::Year);
    if has_self && has_month && has_year && cluster.len() >= 2 {
        Some(cluster)
    } else {
        None
    }
}

fn collect_parts(container: &DomNode, cluster: &mut Vec<DatePart>) {
    for child in container.shadow.iter().chain(container.children.iter()) {
        if matches!(child.tag.as_str(), "input" | "select") {
            if let Some(component) = component_hint(child) {
                cluster.push(DatePart {
                    node: child.node_id(),
                    is_select: child.tag == "select",
                    component,
                });
            }
        }
        collect_parts(child, cluster);
    }
}

fn component_hint(node: &DomNode) -> Option<DateComponent> {
    let mut haystack = String::new();
    for piece in [
        node.name.as_deref(),
        node.placeholder.as_deref(),
        node.aria_label.as_deref(),
        node.id.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        haystack.push_str(&piece.to_lowercase());
        haystack.push(' ');
    }
    if haystack.contains("month") || haystack.contains("mm") {
        Some(DateComponent::Month)
    } else if haystack.contains("day") || haystack.contains("dd") {
        Some(DateComponent::Day)
    } else if haystack.contains("year") || haystack.contains("yyyy") || haystack.contains("yy") {
        Some(DateComponent::Year)
    } else {
        None
    }
}

// ============================================================================
// Split fill
// ============================================================================

fn fill_split(
    driver: &mut dyn PageDriver,
    date: NaiveDate,
    cluster: &[DatePart],
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let (month, day, year) = parts(date);
    let step = ctx.settings.step_delay_ms;

    for part in cluster {
        let rendered = match part.component {
            DateComponent::Month => format!("{:02}", month),
            DateComponent::Day => format!("{:02}", day),
            DateComponent::Year => year.to_string(),
        };
        if part.is_select {
            // Month selects may list numbers or names; try the number
            // first, then the month name.
            driver.select_option(part.node, &rendered)?;
            if part.component == DateComponent::Month {
                let state = driver.query_state(part.node)?;
                if state.selected_index < 0 {
                    driver.select_option(part.node, month_name(month))?;
                }
            }
        } else {
            driver.set_value(part.node, &rendered)?;
        }
        driver.wait(step)?;
    }

    Ok((FillOutcome::Filled, 1))
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];
    NAMES[(month as usize - 1).min(11)]
}
