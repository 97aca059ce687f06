//! # Shopping Calculator
//!
//! Everyday shopping arithmetic: discounts, "buy N get X free" promos, unit
//! prices, reverse discounts, margins and currency conversion at the official
//! NBU rate. The calculators are exposed through a keypad-driven Mini App
//! controller and a Telegram bot with step-by-step wizards.

pub mod analytics;
pub mod assistant;
pub mod bot;
pub mod calculator;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod input;
pub mod localization;
pub mod mini_app;
pub mod platform;
pub mod rates;
