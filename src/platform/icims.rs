use crate::dom::node::{DomNode, ExtractedPage};
use crate::dom::visit;
use crate::platform::handler::{hostname, PlatformHandler};
use crate::scan::scan_model::ScannedField;
use crate::scan::scanner;

/// iCIMS: the application form lives inside a named same-origin iframe.
/// Scanning the outer chrome wastes the pass on search boxes and footer
/// inputs, so detection scopes to the frame's document.
pub struct IcimsHandler;

impl PlatformHandler for IcimsHandler {
    fn name(&self) -> &'static str {
        "icims"
    }

    fn detect(&self, page: &ExtractedPage) -> bool {
        hostname(&page.url).contains("icims.com") || content_frame(&page.dom).is_some()
    }

    fn scan(&self, page: &ExtractedPage) -> Vec<ScannedField> {
        match content_frame(&page.dom) {
            Some(frame) => {
                let scoped = ExtractedPage {
                    url: page.url.clone(),
                    title: page.title.clone(),
                    dom: frame.frame.as_ref().map(|f| f.children.clone()).unwrap_or_default(),
                };
                scanner::scan(&scoped)
            }
            None => scanner::scan(page),
        }
    }
}

fn content_frame(roots: &[DomNode]) -> Option<&DomNode> {
    visit::find(roots, |n| {
        n.tag == "iframe"
            && n.id.as_deref().map(|id| id.contains("icims_content")).unwrap_or(false)
            && n.frame.as_ref().map(|f| f.same_origin).unwrap_or(false)
    })
}
