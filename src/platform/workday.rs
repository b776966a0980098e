use crate::browser::driver::PageDriver;
use crate::dom::node::ExtractedPage;
use crate::dom::visit;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::FillDetail;
use crate::platform::handler::{has_marker, hostname, PlatformHandler};
use crate::platform::sections::{fill_repeatable_section, SectionKind};
use crate::profile::profile_model::CandidateProfile;
use crate::scan::scan_model::{ControlKind, ScannedField};
use crate::scan::scanner;

/// Workday: data-automation-id conventions everywhere, native selects
/// replaced by button-triggered listbox overlays, and dynamic repeatable
/// education/work sections whose new blocks reuse non-unique ids.
pub struct WorkdayHandler;

impl PlatformHandler for WorkdayHandler {
    fn name(&self) -> &'static str {
        "workday"
    }

    fn detect(&self, page: &ExtractedPage) -> bool {
        let host = hostname(&page.url);
        host.contains("myworkdayjobs.com")
            || host.contains("workday.com")
            || has_marker(page, "data-automation-id", None)
    }

    /// Generic scan plus Workday's select substitutes: buttons with
    /// `aria-haspopup="listbox"` carrying a data-automation-id. They are
    /// not form controls, so the generic scanner never sees them.
    fn scan(&self, page: &ExtractedPage) -> Vec<ScannedField> {
        let mut fields = scanner::scan(page);

        let triggers = visit::find_all(&page.dom, |n| {
            n.is_visible()
                && n.attr("aria-haspopup").map(|v| v == "listbox").unwrap_or(false)
                && n.attr("data-automation-id").is_some()
                && !matches!(n.tag.as_str(), "input" | "select" | "textarea")
        });

        for trigger in triggers {
            if fields.iter().any(|f| f.node == trigger.node_id()) {
                continue;
            }
            let mut attrs = std::collections::HashMap::new();
            if let Some(automation_id) = trigger.attr("data-automation-id") {
                attrs.insert("data-automation-id".to_string(), automation_id.to_string());
            }
            fields.push(ScannedField {
                node: trigger.node_id(),
                control: ControlKind::Select,
                tag: trigger.tag.clone(),
                input_type: None,
                label: trigger.aria_label.clone().or_else(|| {
                    trigger.trimmed_text().map(|t| t.to_string())
                }),
                label_source: None,
                html_id: trigger.id.clone(),
                name: trigger.name.clone(),
                placeholder: None,
                autocomplete: None,
                attrs,
                // No rendered options: routes through handle_dropdown.
                options: Vec::new(),
                value: trigger.value.clone().unwrap_or_default(),
                checked: false,
                required: trigger.required,
                rect: trigger.rect,
            });
        }
        fields
    }

    fn handle_multi_step(
        &self,
        driver: &mut dyn PageDriver,
        profile: &CandidateProfile,
        ctx: &mut PassContext,
    ) -> Result<Vec<FillDetail>, EngineError> {
        let mut details = Vec::new();
        // Workday's resume parser pre-inserts entries; delete before
        // repopulating.
        details.extend(fill_repeatable_section(
            driver,
            profile,
            ctx,
            SectionKind::Education,
            true,
        )?);
        details.extend(fill_repeatable_section(
            driver,
            profile,
            ctx,
            SectionKind::Work,
            true,
        )?);
        Ok(details)
    }
}
