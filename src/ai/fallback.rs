use log::{info, warn};

use crate::ai::ai_model::{ClassifyFieldsRequest, FieldDescriptor, JobContext, OpenEndedRequest};
use crate::ai::client::AiClient;
use crate::browser::driver::PageDriver;
use crate::classify::classify_model::FieldIdentifier;
use crate::dom::node::ExtractedPage;
use crate::engine::context::PassContext;
use crate::fill::executor;
use crate::fill::fill_model::{
    FillDetail, FillOutcome, FillStrategy, MapStatus, MappedField,
};
use crate::profile::mapper::map_field;
use crate::profile::profile_model::CandidateProfile;
use crate::scan::scan_model::ControlKind;

/// Free-text answers are bounded so generated prose fits the widget.
const DEFAULT_ANSWER_MAX_LEN: usize = 1200;

/// Which mapped fields go to the remote classifier: anything deferred as
/// NeedsAi, plus Ambiguous fields whose deterministic confidence was too
/// low to act on.
pub fn unresolved_indices(mapped: &[MappedField]) -> Vec<usize> {
    mapped
        .iter()
        .enumerate()
        .filter(|(_, f)| {
            matches!(f.status, MapStatus::NeedsAi)
                || (matches!(f.status, MapStatus::Ambiguous)
                    && f.classified.identifier != FieldIdentifier::Unknown)
                || f.classified.identifier == FieldIdentifier::Unknown
        })
        .map(|(i, _)| i)
        .collect()
}

pub fn build_request(mapped: &[MappedField], indices: &[usize], job: &JobContext) -> ClassifyFieldsRequest {
    let fields = indices
        .iter()
        .filter_map(|&i| mapped.get(i).map(|f| (i, f)))
        .map(|(index, f)| {
            let scanned = &f.classified.field;
            FieldDescriptor {
                index,
                label: scanned.label.clone(),
                placeholder: scanned.placeholder.clone(),
                attributes: scanned.attrs.clone(),
                field_type: format!("{:?}", scanned.control).to_lowercase(),
                options: scanned.options.iter().map(|o| o.label.clone()).collect(),
            }
        })
        .collect();

    ClassifyFieldsRequest {
        fields,
        job_title: job.job_title.clone(),
        job_description: job.job_description.clone(),
        employer_name: job.employer_name.clone(),
    }
}

/// Batch unresolved fields to the remote classifier and fill what comes
/// back above the confidence floor. Network failure degrades to leaving
/// the batch deferred — never to failing the pass.
pub fn run_ai_fallback(
    driver: &mut dyn PageDriver,
    page: &ExtractedPage,
    mapped: &[MappedField],
    profile: &CandidateProfile,
    job: &JobContext,
    ai: &dyn AiClient,
    ctx: &mut PassContext,
) -> Vec<FillDetail> {
    let indices = unresolved_indices(mapped);
    if indices.is_empty() {
        return Vec::new();
    }
    info!("sending {} unresolved fields to AI classification", indices.len());

    let request = build_request(mapped, &indices, job);
    let response = match ai.classify_fields(&request) {
        Ok(r) => r,
        Err(e) => {
            warn!("AI classification unavailable: {}", e);
            return indices
                .iter()
                .filter_map(|&i| mapped.get(i))
                .map(|f| {
                    FillDetail::new(f, FillOutcome::NeedsAi)
                        .with_message(format!("AI unavailable: {}", e))
                })
                .collect();
        }
    };

    let mut details = Vec::new();
    let mut covered: Vec<usize> = Vec::new();
    for answer in &response.classified {
        let Some(field) = mapped.get(answer.index) else {
            continue;
        };
        if !indices.contains(&answer.index) {
            continue;
        }
        if ctx.is_claimed(field.classified.field.node) {
            continue;
        }
        covered.push(answer.index);

        // Below the floor the classification is noise; keep the field
        // deferred rather than filling a guess.
        if answer.confidence < ctx.settings.ai_floor {
            details.push(
                FillDetail::new(field, FillOutcome::NeedsAi)
                    .with_message("below AI confidence floor"),
            );
            continue;
        }

        if answer.is_question {
            details.push(fill_generated_answer(driver, page, field, answer, job, ai, ctx));
            continue;
        }

        let identifier = answer
            .identifier
            .as_deref()
            .or(answer.profile_key.as_deref())
            .map(FieldIdentifier::from_key)
            .unwrap_or(FieldIdentifier::Unknown);

        // Direct value from the classifier wins; otherwise re-map the
        // field under its new identifier.
        let remapped = match &answer.value {
            Some(value) if !value.trim().is_empty() => MappedField {
                classified: reclassified(field, identifier, answer.confidence),
                value: Some(value.clone()),
                strategy: strategy_for_control(field),
                status: MapStatus::Ready,
                document: None,
            },
            _ => {
                let mut reclassed = field.classified.clone();
                reclassed.identifier = identifier;
                reclassed.category = identifier.category();
                reclassed.confidence = answer.confidence;
                map_field(&reclassed, profile, &ctx.settings)
            }
        };

        ctx.claim(field.classified.field.node);
        details.push(executor::fill_field(driver, page, &remapped, ctx));
        std::thread::sleep(std::time::Duration::from_millis(ctx.settings.field_delay_ms));
    }

    // Every deferred field gets exactly one line in the report, even when
    // the classifier returned nothing for it.
    for &index in &indices {
        if !covered.contains(&index) {
            if let Some(field) = mapped.get(index) {
                details.push(
                    FillDetail::new(field, FillOutcome::NeedsAi).with_message("no AI result"),
                );
            }
        }
    }
    details
}

/// is_question results get AI-generated free text, never direct value
/// insertion.
fn fill_generated_answer(
    driver: &mut dyn PageDriver,
    page: &ExtractedPage,
    field: &MappedField,
    answer: &crate::ai::ai_model::ClassifiedAnswer,
    job: &JobContext,
    ai: &dyn AiClient,
    ctx: &mut PassContext,
) -> FillDetail {
    let question_text = field
        .classified
        .field
        .label
        .clone()
        .or_else(|| field.classified.field.placeholder.clone())
        .unwrap_or_default();
    let request = OpenEndedRequest {
        question_text,
        question_key: answer
            .profile_key
            .clone()
            .unwrap_or_else(|| "open_ended".to_string()),
        job_title: job.job_title.clone(),
        job_description: job.job_description.clone(),
        employer_name: job.employer_name.clone(),
        max_length: Some(DEFAULT_ANSWER_MAX_LEN),
    };

    match ai.answer_question(&request) {
        Ok(response) if !response.answer.trim().is_empty() => {
            let generated = MappedField {
                classified: reclassified(field, FieldIdentifier::OpenEndedQuestion, answer.confidence),
                value: Some(response.answer),
                strategy: FillStrategy::Text,
                status: MapStatus::Ready,
                document: None,
            };
            ctx.claim(field.classified.field.node);
            executor::fill_field(driver, page, &generated, ctx)
        }
        Ok(_) => FillDetail::new(field, FillOutcome::NeedsAi).with_message("empty AI answer"),
        Err(e) => {
            warn!("open-ended answer unavailable: {}", e);
            FillDetail::new(field, FillOutcome::NeedsAi).with_message(e.to_string())
        }
    }
}

fn reclassified(
    field: &MappedField,
    identifier: FieldIdentifier,
    confidence: f32,
) -> crate::classify::classify_model::ClassifiedField {
    let mut classified = field.classified.clone();
    classified.identifier = identifier;
    classified.category = identifier.category();
    classified.confidence = confidence;
    classified
}

fn strategy_for_control(field: &MappedField) -> FillStrategy {
    match field.classified.field.control {
        ControlKind::Select => FillStrategy::Select,
        ControlKind::Radio => FillStrategy::Radio,
        ControlKind::Checkbox => FillStrategy::Checkbox,
        ControlKind::Date | ControlKind::Month => FillStrategy::Date,
        ControlKind::File => FillStrategy::File,
        _ => FillStrategy::Text,
    }
}
