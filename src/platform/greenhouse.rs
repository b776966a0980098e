use crate::browser::driver::PageDriver;
use crate::dom::node::ExtractedPage;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::FillDetail;
use crate::platform::handler::{has_marker, hostname, PlatformHandler};
use crate::platform::sections::{fill_repeatable_section, SectionKind};
use crate::profile::profile_model::CandidateProfile;

/// Greenhouse: mostly native controls with data-qa markers, styled file
/// dropzones, and "Add another" education blocks. No resume parser, so
/// repeatable sections expand without a delete pass.
pub struct GreenhouseHandler;

impl PlatformHandler for GreenhouseHandler {
    fn name(&self) -> &'static str {
        "greenhouse"
    }

    fn detect(&self, page: &ExtractedPage) -> bool {
        let host = hostname(&page.url);
        host.contains("greenhouse.io")
            || host.contains("boards.greenhouse")
            || has_marker(page, "data-qa", Some("application"))
    }

    fn handle_multi_step(
        &self,
        driver: &mut dyn PageDriver,
        profile: &CandidateProfile,
        ctx: &mut PassContext,
    ) -> Result<Vec<FillDetail>, EngineError> {
        fill_repeatable_section(driver, profile, ctx, SectionKind::Education, false)
    }
}
