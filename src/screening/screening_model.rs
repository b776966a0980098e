use serde::Serialize;

use crate::dom::node::{NodeId, Rect};

/// How the resolved answer gets into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerInteraction {
    /// Click the matching Yes/No radio or button.
    YesNo,
    /// Type into the nearest unclaimed input.
    Text,
    /// Select from the nearest unclaimed select.
    Dropdown,
}

/// A resolved answer for one screening question.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningAnswer {
    pub key: &'static str,
    pub answer: String,
    pub interaction: AnswerInteraction,
    /// True when the answer came from the conservative default rather
    /// than the profile.
    pub defaulted: bool,
}

/// A question-shaped text block found by the visual-proximity scan.
#[derive(Debug, Clone)]
pub struct ScreeningQuestion {
    pub node: NodeId,
    pub text: String,
    pub rect: Rect,
}
