use crate::dom::node::ExtractedPage;
use crate::platform::handler::{hostname, PlatformHandler};

/// Lever: plain native forms (inputs, textareas, native selects) under
/// jobs.lever.co. The generic pipeline covers everything; the handler
/// exists so Lever pages don't fall through to weaker marker heuristics.
pub struct LeverHandler;

impl PlatformHandler for LeverHandler {
    fn name(&self) -> &'static str {
        "lever"
    }

    fn detect(&self, page: &ExtractedPage) -> bool {
        hostname(&page.url).contains("lever.co")
    }
}
