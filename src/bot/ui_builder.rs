//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

// Import localization
use crate::localization::{get_localization_manager, t_args_lang, t_lang, SUPPORTED_LANGUAGES};

// Import calculator types
use crate::calculator::{
    format_fixed, DiscountResult, MarginResult, PromoPlanResult, PromoResult, ReverseDiscountResult,
    UnitKind, UnitPriceResult,
};
use crate::config::QUOTE_CURRENCY;
use crate::rates::RateSnapshot;

/// Things a user can ask for from the menu or with a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Help,
    Cancel,
    Discount,
    Promo,
    PromoPlan,
    UnitPrice,
    ReverseDiscount,
    Margin,
    Currency,
    Assistant,
}

/// Menu buttons in keyboard order, with their localization keys
const MENU_LAYOUT: [[(&str, MenuAction); 2]; 4] = [
    [("menu-discount", MenuAction::Discount), ("menu-promo", MenuAction::Promo)],
    [("menu-promo-plan", MenuAction::PromoPlan), ("menu-unit-price", MenuAction::UnitPrice)],
    [("menu-reverse", MenuAction::ReverseDiscount), ("menu-margin", MenuAction::Margin)],
    [("menu-currency", MenuAction::Currency), ("menu-assistant", MenuAction::Assistant)],
];

/// Recognise a slash command, with or without a `@botname` suffix
pub fn parse_command(text: &str) -> Option<MenuAction> {
    let command = text.trim().split_whitespace().next()?.strip_prefix('/')?;
    let command = command.split('@').next().unwrap_or(command);
    match command.to_lowercase().as_str() {
        "start" | "menu" => Some(MenuAction::Start),
        "help" => Some(MenuAction::Help),
        "cancel" | "stop" => Some(MenuAction::Cancel),
        "discount" => Some(MenuAction::Discount),
        "promo" => Some(MenuAction::Promo),
        "plan" => Some(MenuAction::PromoPlan),
        "unit" => Some(MenuAction::UnitPrice),
        "reverse" => Some(MenuAction::ReverseDiscount),
        "margin" => Some(MenuAction::Margin),
        "currency" => Some(MenuAction::Currency),
        "ask" => Some(MenuAction::Assistant),
        _ => None,
    }
}

/// Recognise a main-menu button label in any supported language
pub fn menu_action_from_label(text: &str) -> Option<MenuAction> {
    let manager = get_localization_manager()?;
    let text = text.trim();
    MENU_LAYOUT.iter().flatten().find_map(|(key, action)| {
        SUPPORTED_LANGUAGES
            .iter()
            .any(|lang| manager.get_message_in_language(key, lang, None) == text)
            .then_some(*action)
    })
}

/// Recognise either a command or a menu label
pub fn recognize_action(text: &str) -> Option<MenuAction> {
    parse_command(text).or_else(|| menu_action_from_label(text))
}

/// Persistent reply keyboard with one button per calculator
pub fn create_main_menu_keyboard(language_code: Option<&str>) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = MENU_LAYOUT
        .iter()
        .map(|row| {
            row.iter()
                .map(|(key, _)| KeyboardButton::new(t_lang(key, language_code)))
                .collect()
        })
        .collect();

    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Inline keyboard for picking the unit the weight was entered in
pub fn create_unit_keyboard(language_code: Option<&str>) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = UnitKind::ALL
        .iter()
        .map(|unit| {
            InlineKeyboardButton::callback(
                t_lang(&format!("unit-{}", unit.code()), language_code),
                format!("unit_{}", unit.code()),
            )
        })
        .collect();

    InlineKeyboardMarkup::new(vec![buttons])
}

fn money(value: f64) -> String {
    format_fixed(value, 2)
}

/// Escape text from outside sources before it goes into an HTML message
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn plain(value: f64) -> String {
    crate::calculator::format_amount(value)
}

pub fn format_discount_result(
    price: f64,
    discount_pct: f64,
    result: &DiscountResult,
    language_code: Option<&str>,
) -> String {
    t_args_lang(
        "result-discount",
        &[
            ("price", &plain(price)),
            ("discount", &plain(discount_pct)),
            ("final", &money(result.final_price)),
            ("saved", &money(result.saved)),
        ],
        language_code,
    )
}

pub fn format_promo_result(n: f64, x: f64, result: &PromoResult, language_code: Option<&str>) -> String {
    t_args_lang(
        "result-promo",
        &[
            ("n", &plain(n)),
            ("x", &plain(x)),
            ("unit_price", &money(result.unit_price_effective)),
            ("real_discount", &format_fixed(result.real_discount_pct, 1)),
            ("total_qty", &plain(result.total_qty)),
            ("total_cost", &money(result.total_cost)),
        ],
        language_code,
    )
}

pub fn format_promo_plan_result(
    target_qty: f64,
    n: f64,
    x: f64,
    result: &PromoPlanResult,
    language_code: Option<&str>,
) -> String {
    t_args_lang(
        "result-promo-plan",
        &[
            ("target", &plain(target_qty)),
            ("n", &plain(n)),
            ("x", &plain(x)),
            ("sets", &plain(result.sets_needed)),
            ("invoice_qty", &plain(result.invoice_qty)),
            ("free_qty", &plain(result.free_qty)),
            ("total_cost", &money(result.total_invoice_cost)),
        ],
        language_code,
    )
}

pub fn format_unit_price_result(
    price: f64,
    weight: f64,
    unit: UnitKind,
    result: &UnitPriceResult,
    language_code: Option<&str>,
) -> String {
    t_args_lang(
        "result-unit-price",
        &[
            ("price", &plain(price)),
            ("weight", &plain(weight)),
            ("unit", &t_lang(&format!("unit-{}", unit.code()), language_code)),
            ("standard_unit", unit.standard_unit()),
            ("small_unit", unit.small_unit()),
            ("per_standard", &money(result.price_per_standard_unit)),
            ("per_small", &money(result.price_per_small_unit)),
        ],
        language_code,
    )
}

pub fn format_reverse_discount_result(
    discounted_price: f64,
    discount_pct: f64,
    result: &ReverseDiscountResult,
    language_code: Option<&str>,
) -> String {
    if !(0.0..100.0).contains(&discount_pct) {
        return t_lang("result-reverse-out-of-range", language_code);
    }
    t_args_lang(
        "result-reverse",
        &[
            ("price", &plain(discounted_price)),
            ("discount", &plain(discount_pct)),
            ("original", &money(result.original_price)),
            ("saved", &money(result.saved_amount)),
        ],
        language_code,
    )
}

pub fn format_margin_result(
    cost: f64,
    sell_price: f64,
    result: &MarginResult,
    language_code: Option<&str>,
) -> String {
    t_args_lang(
        "result-margin",
        &[
            ("cost", &plain(cost)),
            ("sell", &plain(sell_price)),
            ("profit", &money(result.profit)),
            ("markup", &format_fixed(result.markup_pct, 1)),
            ("margin", &format_fixed(result.margin_pct, 1)),
        ],
        language_code,
    )
}

pub fn format_currency_result(
    amount: f64,
    converted: f64,
    inverse_rate: f64,
    snapshot: &RateSnapshot,
    language_code: Option<&str>,
) -> String {
    t_args_lang(
        "result-currency",
        &[
            ("currency", &escape_html(&snapshot.currency)),
            ("local", QUOTE_CURRENCY),
            ("rate", &format_fixed(snapshot.rate, 4)),
            ("inverse_rate", &format_fixed(inverse_rate, 4)),
            ("date", &escape_html(&snapshot.as_of)),
            ("amount", &plain(amount)),
            ("converted", &money(converted)),
        ],
        language_code,
    )
}
