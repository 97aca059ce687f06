//! # Input Collector Module
//!
//! Keypad-style accumulation of partially typed decimal numbers. Each
//! calculator declares an ordered list of named fields; one of them is the
//! active field receiving key presses. Parsing is best-effort: an empty or
//! half-typed buffer reads as zero so results can be recomputed on every
//! keystroke without surfacing errors.

use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calculator::{ConversionDirection, PromoMode, UnitKind};

/// Maximum number of characters a field buffer may hold
pub const MAX_FIELD_LEN: usize = 9;

/// Decimal separator accepted by the keypad
pub const DECIMAL_SEPARATOR: char = '.';

/// Text buffer for a single numeric field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue(String);

impl FieldValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Append a keypad character
    ///
    /// Returns `true` when the buffer changed. Rejected presses are no-ops:
    /// anything that is not an ASCII digit or `.`, a second `.`, or a press
    /// that would grow the buffer past [`MAX_FIELD_LEN`]. A `.` on an empty
    /// buffer becomes `0.`.
    pub fn press(&mut self, key: char) -> bool {
        if key == DECIMAL_SEPARATOR {
            if self.0.contains(DECIMAL_SEPARATOR) {
                return false;
            }
            let insert = if self.0.is_empty() { "0." } else { "." };
            if self.len() + insert.len() > MAX_FIELD_LEN {
                return false;
            }
            self.0.push_str(insert);
            return true;
        }

        if !key.is_ascii_digit() || self.len() + 1 > MAX_FIELD_LEN {
            return false;
        }
        self.0.push(key);
        true
    }

    /// Remove the last character
    pub fn delete(&mut self) {
        self.0.pop();
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Numeric value of the buffer, zero when unset or unparseable
    pub fn parse(&self) -> f64 {
        parse_field(&self.0)
    }

    /// Replace the buffer with externally produced text
    ///
    /// Characters that the keypad could not have produced are dropped, so
    /// the usual invariants keep holding.
    pub fn set(&mut self, text: &str) {
        self.0.clear();
        for c in text.chars() {
            self.press(c);
        }
    }
}

/// Best-effort numeric coercion used by every calculator screen
pub fn parse_field(buffer: &str) -> f64 {
    let value = buffer.trim().parse::<f64>().unwrap_or(0.0);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Next field after `current` in declaration order, wrapping around
///
/// An unknown `current` yields the first field.
pub fn advance<'a>(fields_in_order: &[&'a str], current: &str) -> Option<&'a str> {
    if fields_in_order.is_empty() {
        return None;
    }
    let next = match fields_in_order.iter().position(|f| *f == current) {
        Some(idx) => (idx + 1) % fields_in_order.len(),
        None => 0,
    };
    Some(fields_in_order[next])
}

/// Calculator screens sharing the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorKind {
    Discount,
    Promo,
    UnitPrice,
    ReverseDiscount,
    Margin,
    Currency,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 6] = [
        CalculatorKind::Discount,
        CalculatorKind::Promo,
        CalculatorKind::UnitPrice,
        CalculatorKind::ReverseDiscount,
        CalculatorKind::Margin,
        CalculatorKind::Currency,
    ];

    /// Field order for the keypad, given the promo mode
    pub fn fields(self, promo_mode: PromoMode) -> &'static [&'static str] {
        match self {
            CalculatorKind::Discount => &["price", "discount"],
            CalculatorKind::Promo => match promo_mode {
                PromoMode::Forward => &["price", "n", "x"],
                PromoMode::Plan => &["target", "n", "x", "price"],
            },
            CalculatorKind::UnitPrice => &["price", "weight"],
            CalculatorKind::ReverseDiscount => &["price", "discount"],
            CalculatorKind::Margin => &["cost", "sell"],
            CalculatorKind::Currency => &["amount", "rate"],
        }
    }
}

/// Per-calculator options that are picked rather than typed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub unit: UnitKind,
    pub direction: ConversionDirection,
    pub promo_mode: PromoMode,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            unit: UnitKind::Gram,
            direction: ConversionDirection::ToLocal,
            promo_mode: PromoMode::Forward,
        }
    }
}

/// Field buffers and active-field pointer for one open calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorSession {
    kind: CalculatorKind,
    fields: HashMap<String, FieldValue>,
    active: String,
    options: SessionOptions,
}

impl CalculatorSession {
    /// Fresh session with every field empty and the first field active
    pub fn new(kind: CalculatorKind) -> Self {
        Self::with_options(kind, SessionOptions::default())
    }

    pub fn with_options(kind: CalculatorKind, options: SessionOptions) -> Self {
        let order = kind.fields(options.promo_mode);
        Self {
            kind,
            fields: order
                .iter()
                .map(|name| (name.to_string(), FieldValue::new()))
                .collect(),
            active: order[0].to_string(),
            options,
        }
    }

    pub fn kind(&self) -> CalculatorKind {
        self.kind
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn field_order(&self) -> &'static [&'static str] {
        self.kind.fields(self.options.promo_mode)
    }

    pub fn active_field(&self) -> &str {
        &self.active
    }

    /// Current buffer for a field, `None` for fields this calculator lacks
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Parsed value of a field, zero for unknown or unset fields
    pub fn value(&self, name: &str) -> f64 {
        self.fields.get(name).map(FieldValue::parse).unwrap_or(0.0)
    }

    pub fn press(&mut self, field: &str, key: char) -> bool {
        match self.fields.get_mut(field) {
            Some(buffer) => {
                let changed = buffer.press(key);
                trace!("press {key:?} on {field}: changed={changed}");
                changed
            }
            None => false,
        }
    }

    pub fn delete(&mut self, field: &str) {
        if let Some(buffer) = self.fields.get_mut(field) {
            buffer.delete();
        }
    }

    pub fn clear(&mut self, field: &str) {
        if let Some(buffer) = self.fields.get_mut(field) {
            buffer.clear();
        }
    }

    pub fn set_value(&mut self, field: &str, text: &str) {
        if let Some(buffer) = self.fields.get_mut(field) {
            buffer.set(text);
        }
    }

    pub fn press_active(&mut self, key: char) -> bool {
        let field = self.active.clone();
        self.press(&field, key)
    }

    pub fn delete_active(&mut self) {
        let field = self.active.clone();
        self.delete(&field);
    }

    pub fn clear_active(&mut self) {
        let field = self.active.clone();
        self.clear(&field);
    }

    /// Make `field` active; unknown names are ignored
    pub fn focus(&mut self, field: &str) -> bool {
        if self.fields.contains_key(field) {
            self.active = field.to_string();
            true
        } else {
            false
        }
    }

    /// Move the active pointer to the next field and return its name
    pub fn next_field(&mut self) -> &str {
        if let Some(next) = advance(self.field_order(), &self.active) {
            self.active = next.to_string();
        }
        &self.active
    }

    pub fn set_unit(&mut self, unit: UnitKind) {
        self.options.unit = unit;
    }

    pub fn set_direction(&mut self, direction: ConversionDirection) {
        self.options.direction = direction;
    }

    /// Switch promo mode, keeping buffers for fields both modes share
    pub fn set_promo_mode(&mut self, mode: PromoMode) {
        if self.options.promo_mode == mode {
            return;
        }
        self.options.promo_mode = mode;
        let order = self.field_order();
        let mut fields = HashMap::with_capacity(order.len());
        for name in order {
            let value = self.fields.remove(*name).unwrap_or_default();
            fields.insert(name.to_string(), value);
        }
        self.fields = fields;
        if !self.fields.contains_key(&self.active) {
            self.active = order[0].to_string();
        }
    }
}
