//! Calculator wizard dialogue module for handling conversation state with users.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::calculator::UnitKind;

/// Linear wizards that collect numbers one prompt at a time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardKind {
    Discount,
    Promo,
    PromoPlan,
    UnitPrice,
    ReverseDiscount,
    Margin,
}

impl WizardKind {
    /// Localization keys of the prompts, one per collected number
    pub fn prompts(self) -> &'static [&'static str] {
        match self {
            WizardKind::Discount => &["prompt-price", "prompt-discount"],
            WizardKind::Promo => &["prompt-unit-price", "prompt-promo-n", "prompt-promo-x"],
            WizardKind::PromoPlan => &[
                "prompt-target-qty",
                "prompt-promo-n",
                "prompt-promo-x",
                "prompt-unit-price",
            ],
            WizardKind::UnitPrice => &["prompt-price", "prompt-weight"],
            WizardKind::ReverseDiscount => &["prompt-discounted-price", "prompt-discount"],
            WizardKind::Margin => &["prompt-cost", "prompt-sell-price"],
        }
    }

    pub fn steps(self) -> usize {
        self.prompts().len()
    }
}

/// Represents the conversation state for calculator wizards
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum CalcDialogueState {
    #[default]
    Start,
    /// Collecting numbers for a wizard; `answers.len()` is the current step
    Collecting {
        wizard: WizardKind,
        answers: Vec<f64>,
        language_code: Option<String>,
    },
    /// Unit price wizard: numbers collected, waiting for the unit
    AwaitingUnit {
        price: f64,
        weight: f64,
        language_code: Option<String>,
    },
    AwaitingCurrencyCode {
        language_code: Option<String>,
    },
    AwaitingCurrencyAmount {
        currency: String,
        language_code: Option<String>,
    },
    AwaitingAssistantQuery {
        language_code: Option<String>,
    },
}

/// Type alias for our calculator dialogue
pub type CalcDialogue = Dialogue<CalcDialogueState, InMemStorage<CalcDialogueState>>;

/// Parse a typed number, accepting a comma as decimal separator
pub fn parse_answer(text: &str) -> Option<f64> {
    let normalized: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Outcome of feeding one answer to a wizard
#[derive(Clone, Debug, PartialEq)]
pub enum WizardStep {
    /// More numbers needed; carries the prompt key for the next one
    Ask(&'static str),
    /// Every number is in
    Complete(Vec<f64>),
    /// The answer was not a number; the wizard is abandoned
    Invalid,
}

/// Record an answer and decide what the wizard does next
pub fn advance_wizard(wizard: WizardKind, answers: &mut Vec<f64>, input: &str) -> WizardStep {
    let Some(value) = parse_answer(input) else {
        return WizardStep::Invalid;
    };
    answers.push(value);
    match wizard.prompts().get(answers.len()) {
        Some(next) => WizardStep::Ask(next),
        None => WizardStep::Complete(answers.clone()),
    }
}

/// Unit as picked from the inline keyboard (`unit_g`, `unit_kg`, ...)
pub fn unit_from_callback(data: &str) -> Option<UnitKind> {
    data.strip_prefix("unit_").and_then(UnitKind::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_accepts_comma() {
        assert_eq!(parse_answer("12,5"), Some(12.5));
        assert_eq!(parse_answer(" 1000 "), Some(1000.0));
        assert_eq!(parse_answer("1 000"), Some(1000.0));
        assert_eq!(parse_answer("-3"), Some(-3.0));
    }

    #[test]
    fn test_parse_answer_rejects_text() {
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("twenty"), None);
        assert_eq!(parse_answer("12abc"), None);
        assert_eq!(parse_answer("NaN"), None);
    }

    #[test]
    fn test_wizard_runs_to_completion() {
        let mut answers = Vec::new();
        assert_eq!(
            advance_wizard(WizardKind::Discount, &mut answers, "1000"),
            WizardStep::Ask("prompt-discount")
        );
        assert_eq!(
            advance_wizard(WizardKind::Discount, &mut answers, "20"),
            WizardStep::Complete(vec![1000.0, 20.0])
        );
    }

    #[test]
    fn test_wizard_abandons_on_invalid() {
        let mut answers = vec![100.0];
        assert_eq!(
            advance_wizard(WizardKind::Promo, &mut answers, "three"),
            WizardStep::Invalid
        );
        assert_eq!(answers, vec![100.0]);
    }

    #[test]
    fn test_unit_from_callback() {
        assert_eq!(unit_from_callback("unit_kg"), Some(UnitKind::Kilogram));
        assert_eq!(unit_from_callback("unit_ml"), Some(UnitKind::Millilitre));
        assert_eq!(unit_from_callback("kg"), None);
        assert_eq!(unit_from_callback("unit_oz"), None);
    }
}
