use crate::browser::driver::PageDriver;
use crate::dom::node::{DomNode, ExtractedPage};
use crate::dom::visit;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::executor;
use crate::fill::fill_model::{FillDetail, FillOutcome, FillStrategy, MappedField};
use crate::fill::file_upload::fill_file;
use crate::fill::select_input::fill_custom_dropdown;
use crate::profile::profile_model::CandidateProfile;
use crate::scan::scan_model::ScannedField;
use crate::scan::scanner;

/// Per-ATS strategy. Exactly one handler is active per page per pass,
/// chosen by first-match over the registry order. Defaults delegate to
/// the generic pipeline; platforms override only what their widgets need.
pub trait PlatformHandler {
    fn name(&self) -> &'static str;

    /// Does this page belong to the platform? URL/hostname first, then a
    /// characteristic DOM marker.
    fn detect(&self, page: &ExtractedPage) -> bool;

    /// Field detection, for platforms with their own ID conventions or
    /// widget substitutes for native controls.
    fn scan(&self, page: &ExtractedPage) -> Vec<ScannedField> {
        scanner::scan(page)
    }

    /// Fill one field. The default routes option-less selects through the
    /// platform's dropdown interaction and everything else through the
    /// generic executor.
    fn fill_field(
        &self,
        driver: &mut dyn PageDriver,
        page: &ExtractedPage,
        field: &MappedField,
        ctx: &mut PassContext,
    ) -> FillDetail {
        let needs_dropdown = field.strategy == FillStrategy::Select
            && field.classified.field.options.is_empty()
            && field.value.is_some();
        if needs_dropdown {
            let value = field.value.clone().unwrap_or_default();
            return match self.handle_dropdown(driver, field, &value, ctx) {
                Ok((outcome, attempts)) => FillDetail::new(field, outcome).with_attempts(attempts),
                Err(e) => FillDetail::new(field, FillOutcome::Failed).with_message(e.to_string()),
            };
        }
        executor::fill_field(driver, page, field, ctx)
    }

    /// Custom dropdown interaction (open → search → click). The generic
    /// flow handles overlay listboxes with or without a search box.
    fn handle_dropdown(
        &self,
        driver: &mut dyn PageDriver,
        field: &MappedField,
        value: &str,
        ctx: &mut PassContext,
    ) -> Result<(FillOutcome, u8), EngineError> {
        fill_custom_dropdown(driver, field.classified.field.node, value, ctx)
    }

    /// File attachment. The generic flow fetches, validates, and tries
    /// DataTransfer assignment then synthetic drag-and-drop.
    fn handle_file_upload(
        &self,
        driver: &mut dyn PageDriver,
        page: &ExtractedPage,
        field: &MappedField,
        profile: &CandidateProfile,
        ctx: &mut PassContext,
    ) -> FillDetail {
        match fill_file(driver, page, field, profile, ctx) {
            Ok((outcome, attempts)) => FillDetail::new(field, outcome).with_attempts(attempts),
            Err(e) => FillDetail::new(field, FillOutcome::Failed).with_message(e.to_string()),
        }
    }

    /// Expand and fill dynamic repeatable sections (education, work
    /// history). Platforms without them inherit the no-op.
    fn handle_multi_step(
        &self,
        _driver: &mut dyn PageDriver,
        _profile: &CandidateProfile,
        _ctx: &mut PassContext,
    ) -> Result<Vec<FillDetail>, EngineError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// Registry — ordered, first detect() wins
// ============================================================================

use crate::platform::ashby::AshbyHandler;
use crate::platform::generic::GenericHandler;
use crate::platform::greenhouse::GreenhouseHandler;
use crate::platform::icims::IcimsHandler;
use crate::platform::lever::LeverHandler;
use crate::platform::workday::WorkdayHandler;

/// Fixed priority order. More specific DOM-marker platforms come first so
/// a Workday form embedded under a vanity hostname still routes right.
pub fn registry() -> Vec<Box<dyn PlatformHandler>> {
    vec![
        Box::new(WorkdayHandler),
        Box::new(GreenhouseHandler),
        Box::new(LeverHandler),
        Box::new(IcimsHandler),
        Box::new(AshbyHandler),
    ]
}

/// First handler whose predicate matches, else the generic handler.
pub fn active_handler(page: &ExtractedPage) -> Box<dyn PlatformHandler> {
    registry()
        .into_iter()
        .find(|h| h.detect(page))
        .unwrap_or_else(|| Box::new(GenericHandler))
}

// ============================================================================
// Detection helpers
// ============================================================================

/// Hostname of a URL, without pulling in a URL crate for one field.
pub fn hostname(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

/// Any node carrying the attribute (optionally with a value fragment)?
pub fn has_marker(page: &ExtractedPage, attr: &str, contains: Option<&str>) -> bool {
    visit::find(&page.dom, |n| match n.attr(attr) {
        Some(v) => contains.map(|c| v.contains(c)).unwrap_or(true),
        None => false,
    })
    .is_some()
}

/// First visible node whose subtree text contains all given fragments
/// (lowercased).
pub fn find_by_text<'a>(
    roots: &'a [DomNode],
    tags: &[&str],
    fragments: &[&str],
) -> Option<&'a DomNode> {
    visit::find(roots, |n| {
        if !tags.is_empty() && !tags.contains(&n.tag.as_str()) {
            return false;
        }
        if !n.is_visible() {
            return false;
        }
        let text = subtree_text_lower(n);
        !text.is_empty() && fragments.iter().all(|f| text.contains(f))
    })
}

pub fn subtree_text_lower(node: &DomNode) -> String {
    let mut parts: Vec<String> = Vec::new();
    visit::visit(std::slice::from_ref(node), &mut |n| {
        if let Some(t) = n.trimmed_text() {
            parts.push(t.to_lowercase());
        }
    });
    parts.join(" ")
}
