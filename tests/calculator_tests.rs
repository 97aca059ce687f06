//! # Calculator Tests
//!
//! Formula behaviour for every calculator, including the degenerate inputs
//! that must produce zeros instead of NaN or infinities.

use shopcalc::calculator::{
    convert, discount, format_amount, format_fixed, margin, promo, promo_plan, reverse_discount,
    unit_price, CalculationResult, ConversionDirection, PromoMode, UnitKind,
};
use shopcalc::input::{CalculatorKind, CalculatorSession};

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_discount_basic() {
    let result = discount(1000.0, 20.0);
    assert_close(result.final_price, 800.0);
    assert_close(result.saved, 200.0);
}

#[test]
fn test_discount_saved_plus_final_is_price() {
    for (price, pct) in [(99.99, 15.0), (0.0, 50.0), (250.0, 0.0), (120.0, 100.0), (80.0, 130.0)] {
        let result = discount(price, pct);
        assert_close(result.final_price + result.saved, price);
    }
}

#[test]
fn test_discount_over_hundred_goes_negative() {
    let result = discount(100.0, 150.0);
    assert_close(result.final_price, -50.0);
    assert_close(result.saved, 150.0);
}

#[test]
fn test_promo_three_plus_one() {
    let result = promo(100.0, 3.0, 1.0);
    assert_close(result.total_qty, 4.0);
    assert_close(result.total_cost, 300.0);
    assert_close(result.unit_price_effective, 75.0);
    assert_close(result.real_discount_pct, 25.0);
}

#[test]
fn test_promo_real_discount_below_hundred_grid() {
    for n in [1.0, 2.0, 3.0, 5.0, 10.0, 0.5] {
        for x in [0.0, 1.0, 2.0, 7.0, 100.0, 0.25] {
            let result = promo(100.0, n, x);
            assert!(
                (0.0..100.0).contains(&result.real_discount_pct),
                "{n}+{x} gave {}%",
                result.real_discount_pct
            );
            assert_close(result.unit_price_effective * result.total_qty, result.total_cost);
        }
    }
}

#[test]
fn test_promo_empty_offer_is_zero() {
    let result = promo(100.0, 0.0, 0.0);
    assert_eq!(result.unit_price_effective, 0.0);
    assert_eq!(result.real_discount_pct, 0.0);
    assert_eq!(result.total_cost, 0.0);
    assert!(result.unit_price_effective.is_finite());
}

#[test]
fn test_promo_plan_whole_sets() {
    let result = promo_plan(8.0, 3.0, 1.0, 50.0);
    assert_close(result.sets_needed, 2.0);
    assert_close(result.invoice_qty, 6.0);
    assert_close(result.free_qty, 2.0);
    assert_close(result.total_invoice_cost, 300.0);
}

#[test]
fn test_promo_plan_fractional_sets_not_rounded() {
    let result = promo_plan(10.0, 3.0, 1.0, 10.0);
    assert_close(result.sets_needed, 2.5);
    assert_close(result.invoice_qty, 7.5);
    assert_close(result.free_qty, 2.5);
    assert_close(result.invoice_qty + result.free_qty, 10.0);
}

#[test]
fn test_promo_plan_zero_set_size() {
    let result = promo_plan(10.0, 0.0, 0.0, 10.0);
    assert_eq!(result.sets_needed, 0.0);
    assert_eq!(result.invoice_qty, 0.0);
    assert_eq!(result.total_invoice_cost, 0.0);
}

#[test]
fn test_unit_price_grams() {
    let result = unit_price(50.0, 200.0, UnitKind::Gram);
    assert_close(result.price_per_standard_unit, 250.0);
    assert_close(result.price_per_small_unit, 25.0);
}

#[test]
fn test_unit_price_litres_and_millilitres_agree() {
    let litres = unit_price(42.0, 1.5, UnitKind::Litre);
    let millilitres = unit_price(42.0, 1500.0, UnitKind::Millilitre);
    assert_close(litres.price_per_standard_unit, 28.0);
    assert_close(millilitres.price_per_standard_unit, litres.price_per_standard_unit);
}

#[test]
fn test_unit_price_non_positive_weight() {
    for weight in [0.0, -5.0] {
        let result = unit_price(50.0, weight, UnitKind::Kilogram);
        assert_eq!(result.price_per_standard_unit, 0.0);
        assert_eq!(result.price_per_small_unit, 0.0);
    }
}

#[test]
fn test_unit_labels() {
    assert_eq!(UnitKind::Gram.standard_unit(), "kg");
    assert_eq!(UnitKind::Millilitre.standard_unit(), "l");
    assert_eq!(UnitKind::Kilogram.small_unit(), "100 g");
    assert_eq!(UnitKind::Litre.small_unit(), "100 ml");
    assert_eq!(UnitKind::parse("КГ"), Some(UnitKind::Kilogram));
    assert_eq!(UnitKind::parse("gr."), Some(UnitKind::Gram));
    assert_eq!(UnitKind::parse("oz"), None);
}

#[test]
fn test_reverse_discount_recovers_original() {
    let result = reverse_discount(800.0, 20.0);
    assert_close(result.original_price, 1000.0);
    assert_close(result.saved_amount, 200.0);

    let forward = discount(result.original_price, 20.0);
    assert_close(forward.final_price, 800.0);
}

#[test]
fn test_reverse_discount_round_trip_grid() {
    for price in [0.0, 0.01, 1.0, 49.9, 800.0, 12345.67] {
        for pct in [0.0, 0.5, 5.0, 12.5, 33.0, 50.0, 75.0, 99.0, 99.9] {
            let reversed = reverse_discount(price, pct);
            assert!(reversed.original_price >= price, "{price} at {pct}%");

            let forward = discount(reversed.original_price, pct);
            let tolerance = EPS * reversed.original_price.max(1.0);
            assert!(
                (forward.final_price - price).abs() < tolerance,
                "{price} at {pct}%: got {}",
                forward.final_price
            );
            assert!((forward.saved - reversed.saved_amount).abs() < tolerance);
        }
    }
}

#[test]
fn test_reverse_discount_zero_percent() {
    let result = reverse_discount(123.0, 0.0);
    assert_close(result.original_price, 123.0);
    assert_close(result.saved_amount, 0.0);
}

#[test]
fn test_reverse_discount_out_of_range() {
    for pct in [100.0, 120.0, -5.0] {
        let result = reverse_discount(500.0, pct);
        assert_eq!(result.original_price, 0.0);
        assert_eq!(result.saved_amount, 0.0);
    }
}

#[test]
fn test_margin_basic() {
    let result = margin(80.0, 100.0);
    assert_close(result.profit, 20.0);
    assert_close(result.markup_pct, 25.0);
    assert_close(result.margin_pct, 20.0);
}

#[test]
fn test_margin_zero_denominators() {
    let free_goods = margin(0.0, 50.0);
    assert_close(free_goods.profit, 50.0);
    assert_eq!(free_goods.markup_pct, 0.0);
    assert_close(free_goods.margin_pct, 100.0);

    let given_away = margin(40.0, 0.0);
    assert_close(given_away.profit, -40.0);
    assert_close(given_away.markup_pct, -100.0);
    assert_eq!(given_away.margin_pct, 0.0);
}

#[test]
fn test_convert_both_directions() {
    assert_close(convert(100.0, 41.5, ConversionDirection::ToLocal).converted_amount, 4150.0);
    assert_close(convert(4150.0, 41.5, ConversionDirection::ToForeign).converted_amount, 100.0);
}

#[test]
fn test_convert_zero_rate_to_foreign() {
    assert_eq!(convert(100.0, 0.0, ConversionDirection::ToForeign).converted_amount, 0.0);
    assert_eq!(convert(100.0, 0.0, ConversionDirection::ToLocal).converted_amount, 0.0);
}

#[test]
fn test_formulas_are_repeatable() {
    let first = promo_plan(7.0, 2.0, 1.0, 19.99);
    let second = promo_plan(7.0, 2.0, 1.0, 19.99);
    assert_eq!(first, second);
}

#[test]
fn test_session_evaluate_discount() {
    let mut session = CalculatorSession::new(CalculatorKind::Discount);
    for key in "1000".chars() {
        session.press_active(key);
    }
    session.next_field();
    for key in "20".chars() {
        session.press_active(key);
    }

    match session.evaluate() {
        CalculationResult::Discount(result) => assert_close(result.final_price, 800.0),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_session_evaluate_empty_fields_read_as_zero() {
    for kind in CalculatorKind::ALL {
        let session = CalculatorSession::new(kind);
        let json = serde_json::to_value(session.evaluate()).unwrap();
        for (key, value) in json.as_object().unwrap() {
            if key == "calculator" {
                continue;
            }
            assert_eq!(value.as_f64(), Some(0.0), "{kind:?} {key} should be zero");
        }
    }
}

#[test]
fn test_session_evaluate_promo_plan_mode() {
    let mut session = CalculatorSession::new(CalculatorKind::Promo);
    session.set_promo_mode(PromoMode::Plan);
    session.set_value("target", "8");
    session.set_value("n", "3");
    session.set_value("x", "1");
    session.set_value("price", "50");

    match session.evaluate() {
        CalculationResult::PromoPlan(result) => {
            assert_close(result.invoice_qty, 6.0);
            assert_close(result.total_invoice_cost, 300.0);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_session_evaluate_unit_and_direction_options() {
    let mut session = CalculatorSession::new(CalculatorKind::UnitPrice);
    session.set_value("price", "120");
    session.set_value("weight", "1.5");
    session.set_unit(UnitKind::Kilogram);
    assert_eq!(
        session.evaluate(),
        CalculationResult::UnitPrice(unit_price(120.0, 1.5, UnitKind::Kilogram))
    );

    let mut session = CalculatorSession::new(CalculatorKind::Currency);
    session.set_value("amount", "100");
    session.set_value("rate", "40");
    session.set_direction(ConversionDirection::ToForeign);
    match session.evaluate() {
        CalculationResult::Currency(result) => assert_close(result.converted_amount, 2.5),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_format_helpers() {
    assert_eq!(format_amount(1000.0), "1000");
    assert_eq!(format_amount(12.5), "12.5");
    assert_eq!(format_amount(0.333), "0.33");
    assert_eq!(format_amount(f64::NAN), "0");
    assert_eq!(format_fixed(75.0, 2), "75.00");
    assert_eq!(format_fixed(-0.001, 2), "0.00");
    assert_eq!(format_fixed(41.53121, 4), "41.5312");
}
