//! # Calculator Module
//!
//! Pure shopping formulas: discount, promo N+X (and its planning mode),
//! unit price, reverse discount, margin and currency conversion.
//!
//! Every function is closed-form over `f64` and total: degenerate
//! denominators produce zero instead of `NaN`, infinities or panics.
//! Monetary values keep full precision; rounding happens only when
//! formatting for display.

use serde::{Deserialize, Serialize};

use crate::input::{CalculatorKind, CalculatorSession};

/// Result of applying a percentage discount
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscountResult {
    pub final_price: f64,
    pub saved: f64,
}

/// Effective pricing of a "buy N, get X free" offer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PromoResult {
    pub unit_price_effective: f64,
    pub real_discount_pct: f64,
    pub total_cost: f64,
    pub total_qty: f64,
}

/// How many paid units to invoice to end up with a target quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PromoPlanResult {
    pub sets_needed: f64,
    pub invoice_qty: f64,
    pub free_qty: f64,
    pub total_invoice_cost: f64,
}

/// Price normalised to a standard unit (kg or l) and to 100 g / 100 ml
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitPriceResult {
    pub price_per_standard_unit: f64,
    pub price_per_small_unit: f64,
}

/// Original price recovered from a discounted one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReverseDiscountResult {
    pub original_price: f64,
    pub saved_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarginResult {
    pub profit: f64,
    /// Profit over cost
    pub markup_pct: f64,
    /// Profit over selling price
    pub margin_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrencyResult {
    pub converted_amount: f64,
}

/// Unit the weight or volume was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Gram,
    Kilogram,
    Millilitre,
    Litre,
}

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        UnitKind::Gram,
        UnitKind::Kilogram,
        UnitKind::Millilitre,
        UnitKind::Litre,
    ];

    /// Multiplier from the entered unit to the standard unit
    pub fn factor(self) -> f64 {
        match self {
            UnitKind::Gram | UnitKind::Millilitre => 1000.0,
            UnitKind::Kilogram | UnitKind::Litre => 1.0,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            UnitKind::Gram => "g",
            UnitKind::Kilogram => "kg",
            UnitKind::Millilitre => "ml",
            UnitKind::Litre => "l",
        }
    }

    /// Standard unit results are quoted in ("kg" or "l")
    pub fn standard_unit(self) -> &'static str {
        match self {
            UnitKind::Gram | UnitKind::Kilogram => "kg",
            UnitKind::Millilitre | UnitKind::Litre => "l",
        }
    }

    /// Small unit results are quoted in ("100 g" or "100 ml")
    pub fn small_unit(self) -> &'static str {
        match self {
            UnitKind::Gram | UnitKind::Kilogram => "100 g",
            UnitKind::Millilitre | UnitKind::Litre => "100 ml",
        }
    }

    /// Parse a unit as typed by a user, Latin or Cyrillic
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().trim_end_matches('.') {
            "g" | "gr" | "г" | "гр" => Some(UnitKind::Gram),
            "kg" | "кг" => Some(UnitKind::Kilogram),
            "ml" | "мл" => Some(UnitKind::Millilitre),
            "l" | "л" => Some(UnitKind::Litre),
            _ => None,
        }
    }
}

/// Which way a currency amount is converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionDirection {
    /// Foreign amount into local currency (amount × rate)
    ToLocal,
    /// Local amount into foreign currency (amount ÷ rate)
    ToForeign,
}

/// Promo calculator mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromoMode {
    /// Price per unit for a given offer
    Forward,
    /// Invoice quantities needed to reach a target quantity
    Plan,
}

pub fn discount(price: f64, discount_pct: f64) -> DiscountResult {
    let final_price = price * (1.0 - discount_pct / 100.0);
    DiscountResult {
        final_price,
        saved: price - final_price,
    }
}

pub fn promo(unit_price: f64, n: f64, x: f64) -> PromoResult {
    let total_qty = n + x;
    let total_cost = unit_price * n;
    if total_qty == 0.0 {
        return PromoResult {
            unit_price_effective: 0.0,
            real_discount_pct: 0.0,
            total_cost,
            total_qty,
        };
    }
    PromoResult {
        unit_price_effective: total_cost / total_qty,
        real_discount_pct: x / total_qty * 100.0,
        total_cost,
        total_qty,
    }
}

/// Promo in reverse: how much to invoice to receive `target_qty` units
///
/// The set count is not rounded; callers offering whole sets only should
/// round `sets_needed` up themselves.
pub fn promo_plan(target_qty: f64, n: f64, x: f64, unit_price: f64) -> PromoPlanResult {
    let set_size = n + x;
    let sets_needed = if set_size == 0.0 { 0.0 } else { target_qty / set_size };
    let invoice_qty = sets_needed * n;
    PromoPlanResult {
        sets_needed,
        invoice_qty,
        free_qty: sets_needed * x,
        total_invoice_cost: invoice_qty * unit_price,
    }
}

pub fn unit_price(price: f64, weight: f64, unit: UnitKind) -> UnitPriceResult {
    if weight <= 0.0 {
        return UnitPriceResult {
            price_per_standard_unit: 0.0,
            price_per_small_unit: 0.0,
        };
    }
    let per_standard = price / weight * unit.factor();
    UnitPriceResult {
        price_per_standard_unit: per_standard,
        price_per_small_unit: per_standard / 10.0,
    }
}

/// Recover the pre-discount price
///
/// Defined for `0 <= discount_pct < 100`; a zero discount returns the
/// price unchanged. Outside that range both outputs are zero.
pub fn reverse_discount(discounted_price: f64, discount_pct: f64) -> ReverseDiscountResult {
    if !(0.0..100.0).contains(&discount_pct) {
        return ReverseDiscountResult {
            original_price: 0.0,
            saved_amount: 0.0,
        };
    }
    let original_price = discounted_price / (1.0 - discount_pct / 100.0);
    ReverseDiscountResult {
        original_price,
        saved_amount: original_price - discounted_price,
    }
}

pub fn margin(cost: f64, sell_price: f64) -> MarginResult {
    let profit = sell_price - cost;
    MarginResult {
        profit,
        markup_pct: if cost == 0.0 { 0.0 } else { profit / cost * 100.0 },
        margin_pct: if sell_price == 0.0 { 0.0 } else { profit / sell_price * 100.0 },
    }
}

pub fn convert(amount: f64, rate: f64, direction: ConversionDirection) -> CurrencyResult {
    let converted_amount = match direction {
        ConversionDirection::ToLocal => amount * rate,
        ConversionDirection::ToForeign if rate > 0.0 => amount / rate,
        ConversionDirection::ToForeign => 0.0,
    };
    CurrencyResult { converted_amount }
}

/// Output of whichever calculator a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationResult {
    Discount(DiscountResult),
    Promo(PromoResult),
    PromoPlan(PromoPlanResult),
    UnitPrice(UnitPriceResult),
    ReverseDiscount(ReverseDiscountResult),
    Margin(MarginResult),
    Currency(CurrencyResult),
}

impl CalculatorSession {
    /// Recompute the result from the current buffers
    pub fn evaluate(&self) -> CalculationResult {
        let v = |name: &str| self.value(name);
        let options = self.options();
        match self.kind() {
            CalculatorKind::Discount => {
                CalculationResult::Discount(discount(v("price"), v("discount")))
            }
            CalculatorKind::Promo => match options.promo_mode {
                PromoMode::Forward => CalculationResult::Promo(promo(v("price"), v("n"), v("x"))),
                PromoMode::Plan => CalculationResult::PromoPlan(promo_plan(
                    v("target"),
                    v("n"),
                    v("x"),
                    v("price"),
                )),
            },
            CalculatorKind::UnitPrice => {
                CalculationResult::UnitPrice(unit_price(v("price"), v("weight"), options.unit))
            }
            CalculatorKind::ReverseDiscount => {
                CalculationResult::ReverseDiscount(reverse_discount(v("price"), v("discount")))
            }
            CalculatorKind::Margin => CalculationResult::Margin(margin(v("cost"), v("sell"))),
            CalculatorKind::Currency => {
                CalculationResult::Currency(convert(v("amount"), v("rate"), options.direction))
            }
        }
    }
}

/// Display form with at most two fractional digits, trailing zeros trimmed
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Display form with exactly `digits` fractional digits
pub fn format_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return format!("{:.*}", digits, 0.0);
    }
    let formatted = format!("{:.*}", digits, value);
    // "-0.00" reads badly next to a price
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}
