use std::time::Duration;

use log::debug;

use crate::browser::driver::{FilePayload, PageDriver};
use crate::dom::node::{ExtractedPage, NodeId};
use crate::dom::visit;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::{DocumentKind, FillOutcome, MappedField};
use crate::profile::profile_model::CandidateProfile;

/// Smallest blob we accept as a real document.
const MIN_DOCUMENT_BYTES: usize = 1024;

/// Generic file attachment: fetch the document, validate the blob, then
/// try DataTransfer assignment and synthetic drag-and-drop against each
/// candidate input/dropzone until one verifies.
pub fn fill_file(
    driver: &mut dyn PageDriver,
    page: &ExtractedPage,
    field: &MappedField,
    profile: &CandidateProfile,
    ctx: &mut PassContext,
) -> Result<(FillOutcome, u8), EngineError> {
    let kind = field.document.unwrap_or(DocumentKind::Resume);
    let payload = fetch_document(profile, kind)?;

    let mut candidates: Vec<NodeId> = vec![field.classified.field.node];
    candidates.extend(upload_candidates(page, field.classified.field.node));

    let mut attempts = 0u8;
    for candidate in candidates {
        attempts = attempts.saturating_add(1);

        driver.upload_file(candidate, &payload)?;
        driver.wait(ctx.settings.step_delay_ms)?;
        if attached(driver, candidate, &payload)? {
            return Ok((FillOutcome::Filled, attempts));
        }

        // Secondary path: synthetic drag-and-drop onto the same target.
        driver.drag_drop_file(candidate, &payload)?;
        driver.wait(ctx.settings.step_delay_ms)?;
        if attached(driver, candidate, &payload)? {
            return Ok((FillOutcome::Filled, attempts));
        }
        debug!("file attach did not verify on candidate {}", candidate);
    }

    Ok((FillOutcome::FilledUnverified, attempts.max(1)))
}

fn attached(
    driver: &mut dyn PageDriver,
    node: NodeId,
    payload: &FilePayload,
) -> Result<bool, EngineError> {
    let state = driver.query_state(node)?;
    Ok(state.value.contains(&payload.filename) || state.text.contains(&payload.filename))
}

/// Other file inputs and dropzone-shaped containers on the page, in
/// document order.
fn upload_candidates(page: &ExtractedPage, primary: NodeId) -> Vec<NodeId> {
    visit::find_all(&page.dom, |n| {
        if n.node_id() == primary {
            return false;
        }
        if n.tag == "input" && n.r#type.as_deref() == Some("file") {
            return true;
        }
        n.attr("class")
            .map(|c| {
                let c = c.to_lowercase();
                c.contains("dropzone") || c.contains("drop-zone") || c.contains("file-upload")
            })
            .unwrap_or(false)
            || n.attr("data-qa").map(|v| v.contains("upload")).unwrap_or(false)
    })
    .into_iter()
    .map(|n| n.node_id())
    .collect()
}

// ============================================================================
// Document fetch + validation
// ============================================================================

/// Fetch the document for `kind` and validate it (>1 KB, plausible MIME).
pub fn fetch_document(
    profile: &CandidateProfile,
    kind: DocumentKind,
) -> Result<FilePayload, EngineError> {
    let (url, fallback_name) = match kind {
        DocumentKind::Resume => (
            profile.documents.resume_url.as_deref(),
            profile.documents.resume_filename.as_deref().unwrap_or("resume.pdf"),
        ),
        DocumentKind::CoverLetter => {
            (profile.documents.cover_letter_url.as_deref(), "cover_letter.pdf")
        }
    };
    let url = url.ok_or_else(|| EngineError::Document("no document URL in profile".into()))?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| EngineError::Http {
            context: "building document client".into(),
            source: e,
        })?;

    let response = client.get(url).send().map_err(|e| EngineError::Http {
        context: format!("fetching document from {}", url),
        source: e,
    })?;
    if !response.status().is_success() {
        return Err(EngineError::Document(format!(
            "document fetch returned HTTP {}",
            response.status()
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let bytes = response
        .bytes()
        .map_err(|e| EngineError::Http {
            context: "reading document body".into(),
            source: e,
        })?
        .to_vec();

    validate_blob(&bytes, content_type.as_deref())?;

    let filename = url
        .rsplit('/')
        .next()
        .filter(|n| n.contains('.'))
        .unwrap_or(fallback_name)
        .to_string();
    let mime = sniff_mime(&bytes)
        .or(content_type)
        .unwrap_or_else(|| "application/pdf".to_string());

    Ok(FilePayload { filename, mime, bytes })
}

fn validate_blob(bytes: &[u8], content_type: Option<&str>) -> Result<(), EngineError> {
    if bytes.len() < MIN_DOCUMENT_BYTES {
        return Err(EngineError::Document(format!(
            "document too small ({} bytes) — likely an error page",
            bytes.len()
        )));
    }
    let plausible = sniff_mime(bytes).is_some()
        || content_type
            .map(|c| {
                c.contains("pdf")
                    || c.contains("msword")
                    || c.contains("officedocument")
                    || c.contains("text/plain")
                    || c.contains("octet-stream")
            })
            .unwrap_or(false);
    if !plausible {
        return Err(EngineError::Document(
            "document has no recognizable type".into(),
        ));
    }
    Ok(())
}

/// Magic-byte sniff for the formats ATS portals accept.
fn sniff_mime(bytes: &[u8]) -> Option<String> {
    if bytes.starts_with(b"%PDF") {
        return Some("application/pdf".to_string());
    }
    if bytes.starts_with(b"PK\x03\x04") {
        // docx/xlsx family
        return Some(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        );
    }
    if bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) {
        return Some("application/msword".to_string());
    }
    None
}
