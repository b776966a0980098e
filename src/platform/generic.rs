use crate::dom::node::ExtractedPage;
use crate::platform::handler::PlatformHandler;

/// Fallback handler for pages no platform predicate claims. Everything
/// runs through the generic pipeline defaults.
pub struct GenericHandler;

impl PlatformHandler for GenericHandler {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn detect(&self, _page: &ExtractedPage) -> bool {
        // Never auto-selected; the registry falls back to it explicitly.
        false
    }
}
