use shopcalc::bot::ui_builder::{escape_html, format_currency_result, format_reverse_discount_result};
use shopcalc::bot::{
    create_main_menu_keyboard, create_unit_keyboard, help_message, parse_command,
    recognize_action, unit_price_message, welcome_message, wizard_result_message, MenuAction,
};
use shopcalc::calculator::{reverse_discount, UnitKind};
use shopcalc::dialogue::WizardKind;
use shopcalc::localization::init_localization;
use shopcalc::rates::RateSnapshot;
use teloxide::types::InlineKeyboardButtonKind;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() {
        // Initialize localization if not already done
        let _ = init_localization();
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/start"), Some(MenuAction::Start));
        assert_eq!(parse_command("/menu"), Some(MenuAction::Start));
        assert_eq!(parse_command("/stop"), Some(MenuAction::Cancel));
        assert_eq!(parse_command("/promo@shop_calc_bot"), Some(MenuAction::Promo));
        assert_eq!(parse_command("  /PLAN  "), Some(MenuAction::PromoPlan));
        assert_eq!(parse_command("/ask which is cheaper"), Some(MenuAction::Assistant));
        assert_eq!(parse_command("/unknown"), None);
        assert_eq!(parse_command("discount"), None);
    }

    #[test]
    fn test_menu_labels_recognised_in_every_language() {
        setup_localization();

        assert_eq!(recognize_action("🏷 Скидка"), Some(MenuAction::Discount));
        assert_eq!(recognize_action("🏷 Знижка"), Some(MenuAction::Discount));
        assert_eq!(recognize_action("🏷 Discount"), Some(MenuAction::Discount));
        assert_eq!(recognize_action("⚖️ Цена за КГ"), Some(MenuAction::UnitPrice));
        assert_eq!(recognize_action("💱 Курс валют"), Some(MenuAction::Currency));
        assert_eq!(recognize_action("📦 План акції"), Some(MenuAction::PromoPlan));
        assert_eq!(recognize_action("50 200"), None);
    }

    #[test]
    fn test_main_menu_keyboard_layout() {
        setup_localization();

        let keyboard = create_main_menu_keyboard(Some("ru"));
        assert_eq!(keyboard.keyboard.len(), 4);
        assert!(keyboard.keyboard.iter().all(|row| row.len() == 2));
        assert_eq!(keyboard.keyboard[0][0].text, "🏷 Скидка");
        assert_eq!(keyboard.keyboard[0][1].text, "🎁 Акция N+X");
        assert!(keyboard.resize_keyboard);
    }

    #[test]
    fn test_unit_keyboard_callbacks() {
        setup_localization();

        let keyboard = create_unit_keyboard(Some("uk"));
        let buttons = &keyboard.inline_keyboard[0];
        assert_eq!(buttons.len(), 4);
        assert_eq!(buttons[1].text, "кг");

        let callbacks: Vec<String> = buttons
            .iter()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(callbacks, ["unit_g", "unit_kg", "unit_ml", "unit_l"]);
    }

    #[test]
    fn test_discount_result_message() {
        setup_localization();

        let message = wizard_result_message(WizardKind::Discount, &[1000.0, 20.0], Some("en")).unwrap();
        assert!(message.contains("Price before discount: 1000"));
        assert!(message.contains("<b>Total: 800.00</b>"));
        assert!(message.contains("You save: 200.00"));
    }

    #[test]
    fn test_promo_result_message() {
        setup_localization();

        let message = wizard_result_message(WizardKind::Promo, &[100.0, 3.0, 1.0], Some("ru")).unwrap();
        assert!(message.contains("Акция 3+1"));
        assert!(message.contains("<b>75.00</b>"));
        assert!(message.contains("<b>25.0%</b>"));
        assert!(message.contains("за 4 шт: 300.00"));
    }

    #[test]
    fn test_promo_plan_result_message() {
        setup_localization();

        let message =
            wizard_result_message(WizardKind::PromoPlan, &[10.0, 3.0, 1.0, 10.0], Some("en")).unwrap();
        assert!(message.contains("To receive 10 items you need 2.5 sets."));
        assert!(message.contains("Pay for: <b>7.5</b>"));
        assert!(message.contains("Total to pay: 75.00"));
    }

    #[test]
    fn test_margin_result_message() {
        setup_localization();

        let message = wizard_result_message(WizardKind::Margin, &[80.0, 100.0], Some("uk")).unwrap();
        assert!(message.contains("Прибуток: 20.00"));
        assert!(message.contains("Націнка: 25.0%"));
        assert!(message.contains("Маржа: 20.0%"));
    }

    #[test]
    fn test_unit_price_wizard_needs_unit() {
        setup_localization();
        assert!(wizard_result_message(WizardKind::UnitPrice, &[50.0, 200.0], Some("en")).is_none());

        let message = unit_price_message(50.0, 200.0, UnitKind::Gram, Some("en"));
        assert!(message.contains("Input: 50 for 200 g"));
        assert!(message.contains("Per kg: 250.00"));
        assert!(message.contains("Per 100 g: 25.00"));
    }

    #[test]
    fn test_reverse_discount_messages() {
        setup_localization();

        let message =
            wizard_result_message(WizardKind::ReverseDiscount, &[800.0, 20.0], Some("en")).unwrap();
        assert!(message.contains("Original price: 1000.00"));

        let message = format_reverse_discount_result(500.0, 100.0, &reverse_discount(500.0, 100.0), Some("en"));
        assert_eq!(message, "The discount must be at least 0% and below 100%.");
    }

    #[test]
    fn test_currency_result_message() {
        setup_localization();

        let snapshot = RateSnapshot {
            currency: "USD".to_string(),
            rate: 41.5,
            as_of: "19.10.2026".to_string(),
        };
        let message = format_currency_result(100.0, 4150.0, 1.0 / 41.5, &snapshot, Some("en"));
        assert!(message.contains("NBU rate on 19.10.2026: 1 USD = 41.5000 UAH"));
        assert!(message.contains("1 UAH = 0.0241 USD"));
        assert!(message.contains("100 USD = 4150.00 UAH"));
    }

    #[test]
    fn test_currency_result_escapes_bank_text() {
        setup_localization();

        let snapshot = RateSnapshot {
            currency: "EUR".to_string(),
            rate: 48.25,
            as_of: "<b>19.10&2026".to_string(),
        };
        let message = format_currency_result(2.0, 96.5, 1.0 / 48.25, &snapshot, Some("en"));
        assert!(message.contains("NBU rate on &lt;b&gt;19.10&amp;2026: 1 EUR = 48.2500 UAH"));
        assert!(!message.contains("<b>19.10"));
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn test_welcome_and_help_messages() {
        setup_localization();

        let welcome = welcome_message(Some("uk-UA"));
        assert!(welcome.contains("Привіт! Я бот-калькулятор покупок."));
        assert!(welcome.contains("Оберіть функцію:"));

        let help = help_message(None);
        assert!(help.contains("/currency"));
        assert!(help.contains("/cancel"));
    }
}
