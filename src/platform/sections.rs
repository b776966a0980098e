use log::{debug, info};

use crate::browser::driver::PageDriver;
use crate::classify::classifier;
use crate::classify::classify_model::{ClassifiedField, FieldIdentifier};
use crate::dom::node::{DomIndex, DomNode, ExtractedPage, NodeId};
use crate::dom::visit;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::executor;
use crate::fill::fill_model::{FillDetail, FillStrategy, MapStatus, MappedField};
use crate::platform::handler::subtree_text_lower;
use crate::profile::dates::{canonical, parse_flexible};
use crate::profile::profile_model::CandidateProfile;
use crate::scan::scan_model::{ControlKind, ScannedField};
use crate::scan::scanner;

/// Vertical gap separating two repeated blocks. Rows inside one block sit
/// closer than blocks sit to each other.
const BLOCK_GAP: f32 = 36.0;

/// Bounded delete loop for platform-inserted (resume-parsed) entries.
const MAX_DELETE_CLICKS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Education,
    Work,
}

impl SectionKind {
    pub fn keyword(self) -> &'static str {
        match self {
            SectionKind::Education => "education",
            SectionKind::Work => "work",
        }
    }

    /// Column order of a repeated block. Positional by necessity: newly
    /// created blocks reuse non-unique internal ids, so nothing semantic
    /// survives to match on.
    fn schema(self) -> &'static [FieldIdentifier] {
        match self {
            SectionKind::Education => &[
                FieldIdentifier::SchoolName,
                FieldIdentifier::Degree,
                FieldIdentifier::FieldOfStudy,
                FieldIdentifier::EducationStartDate,
                FieldIdentifier::EducationEndDate,
            ],
            SectionKind::Work => &[
                FieldIdentifier::EmployerName,
                FieldIdentifier::JobTitle,
                FieldIdentifier::WorkStartDate,
                FieldIdentifier::WorkEndDate,
                FieldIdentifier::WorkDescription,
            ],
        }
    }

    fn entry_count(self, profile: &CandidateProfile) -> usize {
        match self {
            SectionKind::Education => profile.education.len(),
            SectionKind::Work => profile.work_experience.len(),
        }
    }
}

/// Expand a repeatable section to the profile's entry count and fill each
/// block positionally: delete platform-inserted entries, click "Add" the
/// delta, then cluster the section's fields by vertical proximity and
/// assign columns left to right.
pub fn fill_repeatable_section(
    driver: &mut dyn PageDriver,
    profile: &CandidateProfile,
    ctx: &mut PassContext,
    kind: SectionKind,
    delete_prefilled: bool,
) -> Result<Vec<FillDetail>, EngineError> {
    let needed = kind.entry_count(profile);
    if needed == 0 {
        return Ok(Vec::new());
    }

    let mut page = driver.extract()?;
    let Some(add_button) = find_add_button(&page, kind) else {
        return Ok(Vec::new());
    };
    let Some(container) = section_container(&page, add_button, kind) else {
        return Ok(Vec::new());
    };

    // The page autosaves and its resume parser inserts entries on its own;
    // delete those before repopulating so the engine is the only actor
    // writing this section.
    if delete_prefilled {
        page = delete_inserted_entries(driver, ctx, kind)?;
    }
    // Deletes re-render the section; node ids may have changed.
    let container = section_container_refetch(&page, kind).unwrap_or(container);

    let existing = section_blocks(&page, container, ctx).len();
    let clicks = needed.saturating_sub(existing);
    info!(
        "{} section: {} entries needed, {} blocks present, {} add clicks",
        kind.keyword(),
        needed,
        existing,
        clicks
    );

    for _ in 0..clicks {
        // Re-find the button each round; re-renders reassign node ids.
        let Some(button) = find_add_button(&page, kind) else {
            break;
        };
        driver.click(button)?;
        driver.wait(ctx.settings.field_delay_ms)?;
        page = driver.extract()?;
    }
    ctx.section_counts.insert(kind.keyword().to_string(), clicks);

    let Some(container) = section_container_refetch(&page, kind) else {
        return Ok(Vec::new());
    };
    let blocks = section_blocks(&page, container, ctx);

    let mut details = Vec::new();
    for (entry_index, block) in blocks.into_iter().take(needed).enumerate() {
        details.extend(fill_block(
            driver,
            &page,
            profile,
            ctx,
            kind,
            entry_index,
            block,
        ));
    }
    Ok(details)
}

// ============================================================================
// Section location
// ============================================================================

/// The "Add"/"Add another" control for this section.
fn find_add_button(page: &ExtractedPage, kind: SectionKind) -> Option<NodeId> {
    visit::find(&page.dom, |n| {
        if !n.is_visible() {
            return false;
        }
        let clickable = matches!(n.tag.as_str(), "button" | "a")
            || n.role.as_deref() == Some("button");
        if !clickable {
            return false;
        }
        let text = subtree_text_lower(n);
        // Bounded so a section wrapper div with role=button can't match.
        text.len() < 60 && text.contains("add") && text.contains(kind.keyword())
    })
    .map(|n| n.node_id())
}

/// Nearest ancestor of the add button whose text mentions the section.
fn section_container(page: &ExtractedPage, add_button: NodeId, kind: SectionKind) -> Option<NodeId> {
    let index = DomIndex::build(page);
    index
        .ancestors(add_button)
        .into_iter()
        .find(|a| subtree_text_lower(a).contains(kind.keyword()))
        .map(|a| a.node_id())
}

fn section_container_refetch(page: &ExtractedPage, kind: SectionKind) -> Option<NodeId> {
    let add = find_add_button(page, kind)?;
    section_container(page, add, kind)
}

fn container_node<'a>(page: &'a ExtractedPage, container: NodeId) -> Option<&'a DomNode> {
    visit::find(&page.dom, |n| n.node_id() == container)
}

fn is_inside(page: &ExtractedPage, container: NodeId, node: NodeId) -> bool {
    container_node(page, container)
        .map(|c| visit::find(std::slice::from_ref(c), |n| n.node_id() == node).is_some())
        .unwrap_or(false)
}

// ============================================================================
// Pre-inserted entry cleanup
// ============================================================================

fn delete_inserted_entries(
    driver: &mut dyn PageDriver,
    ctx: &mut PassContext,
    kind: SectionKind,
) -> Result<ExtractedPage, EngineError> {
    let mut page = driver.extract()?;
    for _ in 0..MAX_DELETE_CLICKS {
        let Some(container_id) = section_container_refetch(&page, kind) else {
            break;
        };
        let delete = container_node(&page, container_id).and_then(|c| {
            visit::find(std::slice::from_ref(c), |n| {
                if !n.is_visible() {
                    return false;
                }
                let mut haystack = String::new();
                for piece in [
                    n.aria_label.as_deref(),
                    n.attr("data-automation-id"),
                    n.attr("class"),
                ]
                .into_iter()
                .flatten()
                {
                    haystack.push_str(&piece.to_lowercase());
                    haystack.push(' ');
                }
                (matches!(n.tag.as_str(), "button" | "a") || n.role.as_deref() == Some("button"))
                    && (haystack.contains("delete")
                        || haystack.contains("remove")
                        || haystack.contains("trash"))
            })
            .map(|n| n.node_id())
        });

        match delete {
            Some(button) => {
                debug!("deleting platform-inserted {} entry", kind.keyword());
                driver.click(button)?;
                driver.wait(ctx.settings.field_delay_ms)?;
                page = driver.extract()?;
                // Deletes often pop a confirmation dialog.
                if let Some(confirm) = find_confirm_button(&page) {
                    driver.click(confirm)?;
                    driver.wait(ctx.settings.field_delay_ms)?;
                    page = driver.extract()?;
                }
            }
            None => break,
        }
    }
    Ok(page)
}

/// A confirm/delete button inside an open dialog, if one is showing.
fn find_confirm_button(page: &ExtractedPage) -> Option<NodeId> {
    let dialog = visit::find(&page.dom, |n| {
        n.is_visible()
            && matches!(n.role.as_deref(), Some("dialog") | Some("alertdialog"))
    })?;
    visit::find(std::slice::from_ref(dialog), |n| {
        if !n.is_visible() || !matches!(n.tag.as_str(), "button" | "a") {
            return false;
        }
        let text = subtree_text_lower(n);
        ["delete", "remove", "confirm", "ok", "yes"]
            .iter()
            .any(|w| text == *w || text.starts_with(&format!("{} ", w)))
    })
    .map(|n| n.node_id())
}

// ============================================================================
// Positional clustering
// ============================================================================

/// Unclaimed fields inside the container, clustered into blocks by
/// vertical proximity, each block ordered row-major (y, then x).
fn section_blocks(
    page: &ExtractedPage,
    container: NodeId,
    ctx: &PassContext,
) -> Vec<Vec<ScannedField>> {
    let mut fields: Vec<ScannedField> = scanner::scan(page)
        .into_iter()
        .filter(|f| !ctx.is_claimed(f.node) && is_inside(page, container, f.node))
        .collect();
    if fields.is_empty() {
        return Vec::new();
    }

    fields.sort_by(|a, b| {
        a.rect
            .y
            .total_cmp(&b.rect.y)
            .then(a.rect.x.total_cmp(&b.rect.x))
    });

    let mut blocks: Vec<Vec<ScannedField>> = Vec::new();
    let mut current: Vec<ScannedField> = Vec::new();
    let mut last_bottom = f32::MIN;
    for field in fields {
        let gap = field.rect.y - last_bottom;
        last_bottom = last_bottom.max(field.rect.y + field.rect.height);
        if !current.is_empty() && gap > BLOCK_GAP {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(field);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    for block in &mut blocks {
        block.sort_by(|a, b| {
            let row_a = (a.rect.y / 12.0).round() as i32;
            let row_b = (b.rect.y / 12.0).round() as i32;
            row_a.cmp(&row_b).then(a.rect.x.total_cmp(&b.rect.x))
        });
    }
    blocks
}

// ============================================================================
// Per-block fill
// ============================================================================

fn fill_block(
    driver: &mut dyn PageDriver,
    page: &ExtractedPage,
    profile: &CandidateProfile,
    ctx: &mut PassContext,
    kind: SectionKind,
    entry_index: usize,
    block: Vec<ScannedField>,
) -> Vec<FillDetail> {
    let schema = kind.schema();
    let mut details = Vec::new();

    for (column, field) in block.into_iter().enumerate() {
        ctx.claim(field.node);

        let positional = schema.get(column).copied();
        let identifier = reconcile_identifier(&field, positional, schema);
        let Some(identifier) = identifier else {
            continue;
        };
        let Some(value) = entry_value(profile, kind, entry_index, identifier) else {
            continue;
        };

        let classified = ClassifiedField {
            identifier,
            category: identifier.category(),
            confidence: 0.9,
            field,
        };
        let mapped = MappedField {
            strategy: block_strategy(&classified, identifier),
            classified,
            value: Some(value),
            status: MapStatus::Ready,
            document: None,
        };
        details.push(executor::fill_field(driver, page, &mapped, ctx));
        std::thread::sleep(std::time::Duration::from_millis(ctx.settings.field_delay_ms));
    }
    details
}

/// Positional assignment, with one mitigation: when the field's own label
/// classifies to a different schema column, the label wins.
fn reconcile_identifier(
    field: &ScannedField,
    positional: Option<FieldIdentifier>,
    schema: &[FieldIdentifier],
) -> Option<FieldIdentifier> {
    let by_label = classifier::classify(field);
    if by_label.confidence >= 0.8 && schema.contains(&by_label.identifier) {
        return Some(by_label.identifier);
    }
    positional
}

fn block_strategy(classified: &ClassifiedField, identifier: FieldIdentifier) -> FillStrategy {
    use FieldIdentifier::*;
    match classified.field.control {
        ControlKind::Select => FillStrategy::Select,
        ControlKind::Radio => FillStrategy::Radio,
        ControlKind::Checkbox => FillStrategy::Checkbox,
        ControlKind::Date | ControlKind::Month => FillStrategy::Date,
        _ => match identifier {
            EducationStartDate | EducationEndDate | WorkStartDate | WorkEndDate => {
                FillStrategy::Date
            }
            _ => FillStrategy::Text,
        },
    }
}

/// Resolve one column's value from the profile entry at `entry_index`,
/// in profile array order.
fn entry_value(
    profile: &CandidateProfile,
    kind: SectionKind,
    entry_index: usize,
    identifier: FieldIdentifier,
) -> Option<String> {
    use FieldIdentifier::*;
    let date = |raw: &Option<String>| {
        raw.as_deref()
            .and_then(parse_flexible)
            .map(canonical)
            .or_else(|| raw.clone())
    };

    match kind {
        SectionKind::Education => {
            let entry = profile.education.get(entry_index)?;
            match identifier {
                SchoolName => entry.school_name.clone(),
                Degree => entry.degree.clone(),
                FieldOfStudy => entry.field_of_study.clone(),
                EducationStartDate => date(&entry.start_date),
                EducationEndDate => date(&entry.end_date),
                Gpa => entry.gpa.clone(),
                _ => None,
            }
        }
        SectionKind::Work => {
            let entry = profile.work_experience.get(entry_index)?;
            match identifier {
                EmployerName => entry.employer_name.clone(),
                JobTitle => entry.job_title.clone(),
                WorkStartDate => date(&entry.start_date),
                WorkEndDate => {
                    if entry.current {
                        None
                    } else {
                        date(&entry.end_date)
                    }
                }
                WorkDescription => entry.description.clone(),
                _ => None,
            }
        }
    }
}
