use crate::browser::driver::PageDriver;
use crate::classify::classifier::normalize;
use crate::dom::node::ExtractedPage;
use crate::dom::visit;
use crate::engine::context::PassContext;
use crate::engine::error::EngineError;
use crate::fill::fill_model::{FillOutcome, MappedField};
use crate::fill::verify::values_match;
use crate::platform::handler::{hostname, PlatformHandler};

/// Ashby: dropdowns are search-driven comboboxes — the trigger *is* the
/// text input, and options only render after typing. The generic
/// open-then-search flow clicks first, which collapses Ashby's list, so
/// the interaction order is inverted here: focus, type, then click the
/// filtered option.
pub struct AshbyHandler;

impl PlatformHandler for AshbyHandler {
    fn name(&self) -> &'static str {
        "ashby"
    }

    fn detect(&self, page: &ExtractedPage) -> bool {
        hostname(&page.url).contains("ashbyhq.com")
    }

    fn handle_dropdown(
        &self,
        driver: &mut dyn PageDriver,
        field: &MappedField,
        value: &str,
        ctx: &mut PassContext,
    ) -> Result<(FillOutcome, u8), EngineError> {
        let node = field.classified.field.node;
        let step = ctx.settings.step_delay_ms;

        driver.focus(node)?;
        driver.clear(node)?;
        driver.insert_text(node, value)?;
        driver.wait(step.max(150))?;

        let page = driver.extract()?;
        let wanted = normalize(value);
        let option = visit::find(&page.dom, |n| {
            n.is_visible()
                && n.role.as_deref() == Some("option")
                && n.trimmed_text()
                    .map(|t| {
                        let t = normalize(t);
                        t == wanted || t.contains(&wanted)
                    })
                    .unwrap_or(false)
        });

        let Some(option) = option else {
            return Ok((FillOutcome::FilledUnverified, 1));
        };
        driver.click(option.node_id())?;
        driver.wait(step)?;

        let state = driver.query_state(node)?;
        if values_match(value, &state.value) || values_match(value, &state.text) {
            Ok((FillOutcome::Filled, 1))
        } else {
            Ok((FillOutcome::FilledUnverified, 1))
        }
    }
}
