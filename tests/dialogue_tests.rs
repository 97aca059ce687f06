use anyhow::Result;

use shopcalc::calculator::UnitKind;
use shopcalc::dialogue::{
    advance_wizard, unit_from_callback, CalcDialogueState, WizardKind, WizardStep,
};

/// Feed answers one by one, returning the last step
fn run_wizard(wizard: WizardKind, inputs: &[&str]) -> WizardStep {
    let mut answers = Vec::new();
    let mut step = WizardStep::Invalid;
    for input in inputs {
        step = advance_wizard(wizard, &mut answers, input);
        if step == WizardStep::Invalid {
            break;
        }
    }
    step
}

/// Discount wizard asks for the percentage after the price
#[tokio::test]
async fn test_discount_wizard_flow() -> Result<()> {
    let mut answers = Vec::new();

    let step = advance_wizard(WizardKind::Discount, &mut answers, "1000");
    assert_eq!(step, WizardStep::Ask("prompt-discount"));

    let step = advance_wizard(WizardKind::Discount, &mut answers, "20");
    assert_eq!(step, WizardStep::Complete(vec![1000.0, 20.0]));

    Ok(())
}

/// Every wizard completes after exactly as many answers as it has prompts
#[tokio::test]
async fn test_wizard_lengths() -> Result<()> {
    let cases = [
        (WizardKind::Discount, 2),
        (WizardKind::Promo, 3),
        (WizardKind::PromoPlan, 4),
        (WizardKind::UnitPrice, 2),
        (WizardKind::ReverseDiscount, 2),
        (WizardKind::Margin, 2),
    ];

    for (wizard, steps) in cases {
        assert_eq!(wizard.steps(), steps);
        let inputs = vec!["3"; steps];
        assert_eq!(
            run_wizard(wizard, &inputs),
            WizardStep::Complete(vec![3.0; steps]),
            "{wizard:?}"
        );
    }

    Ok(())
}

/// A non-numeric answer abandons the wizard without recording anything
#[tokio::test]
async fn test_wizard_rejects_text() -> Result<()> {
    let mut answers = vec![100.0];
    let step = advance_wizard(WizardKind::Promo, &mut answers, "three");
    assert_eq!(step, WizardStep::Invalid);
    assert_eq!(answers, vec![100.0]);

    assert_eq!(run_wizard(WizardKind::Margin, &["80", "a lot"]), WizardStep::Invalid);
    Ok(())
}

/// Comma decimals are accepted the way users type them
#[tokio::test]
async fn test_wizard_accepts_comma_decimals() -> Result<()> {
    assert_eq!(
        run_wizard(WizardKind::UnitPrice, &["49,90", "0,5"]),
        WizardStep::Complete(vec![49.9, 0.5])
    );
    Ok(())
}

/// Plan wizard asks for the target quantity first and the price last
#[tokio::test]
async fn test_promo_plan_prompt_order() -> Result<()> {
    assert_eq!(
        WizardKind::PromoPlan.prompts(),
        ["prompt-target-qty", "prompt-promo-n", "prompt-promo-x", "prompt-unit-price"]
    );
    Ok(())
}

#[tokio::test]
async fn test_unit_callbacks() -> Result<()> {
    assert_eq!(unit_from_callback("unit_g"), Some(UnitKind::Gram));
    assert_eq!(unit_from_callback("unit_kg"), Some(UnitKind::Kilogram));
    assert_eq!(unit_from_callback("unit_ml"), Some(UnitKind::Millilitre));
    assert_eq!(unit_from_callback("unit_l"), Some(UnitKind::Litre));
    assert_eq!(unit_from_callback("unit_oz"), None);
    assert_eq!(unit_from_callback("kg"), None);
    Ok(())
}

/// Dialogue states survive a serde_json round trip
#[tokio::test]
async fn test_dialogue_state_serialization() -> Result<()> {
    let state = CalcDialogueState::Collecting {
        wizard: WizardKind::PromoPlan,
        answers: vec![8.0, 3.0],
        language_code: Some("uk".to_string()),
    };

    let json = serde_json::to_string(&state)?;
    let restored: CalcDialogueState = serde_json::from_str(&json)?;
    assert_eq!(restored, state);

    assert_eq!(CalcDialogueState::default(), CalcDialogueState::Start);
    Ok(())
}
