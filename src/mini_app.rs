//! # Mini App Controller Module
//!
//! Headless controller behind the keypad front end: screen navigation,
//! settings, and the calculator session of the open screen. Rendering is
//! left to whatever front end drives it; the controller only exposes the
//! field buffers and recomputed results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analytics::AnalyticsClient;
use crate::calculator::{CalculationResult, ConversionDirection, PromoMode, UnitKind};
use crate::input::{CalculatorKind, CalculatorSession};
use crate::platform::Platform;
use crate::rates::{refresh_session_rate, RateFetcher, RateSnapshot, RateSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Header and background colors pushed to the host
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            Theme::Light => ("#f8fafc", "#f1f5f9"),
            Theme::Dark => ("#0f172a", "#0f172a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Symbol shown next to amounts
    pub currency: String,
    /// One of `uk`, `ru`, `en`
    pub language: String,
    pub theme: Theme,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            currency: "₴".to_string(),
            language: "uk".to_string(),
            theme: Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    MainMenu,
    Calculator(CalculatorKind),
    Settings,
}

pub struct MiniApp<P: Platform> {
    platform: P,
    settings: AppSettings,
    view: AppView,
    session: Option<CalculatorSession>,
    last_rate: Option<RateSnapshot>,
}

impl<P: Platform> MiniApp<P> {
    /// Bring the app up inside its host
    ///
    /// Signals readiness, expands, applies the theme colors and records the
    /// visit of the current user, if the host knows one.
    pub fn launch(platform: P, analytics: &AnalyticsClient, settings: AppSettings) -> Self {
        platform.ready();
        platform.expand();

        let (header, background) = settings.theme.colors();
        platform.set_header_color(header);
        platform.set_background_color(background);

        if let Some(user) = platform.current_user() {
            analytics.log_visit(&user, platform.platform_name());
        }

        info!(platform = %platform.platform_name(), language = %settings.language, "Mini app launched");

        Self {
            platform,
            settings,
            view: AppView::MainMenu,
            session: None,
            last_rate: None,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn view(&self) -> AppView {
        self.view
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn session(&self) -> Option<&CalculatorSession> {
        self.session.as_ref()
    }

    pub fn last_rate(&self) -> Option<&RateSnapshot> {
        self.last_rate.as_ref()
    }

    /// Open a calculator screen with a fresh session
    pub fn open(&mut self, kind: CalculatorKind) {
        debug!(calculator = ?kind, "Opening calculator");
        self.view = AppView::Calculator(kind);
        self.session = Some(CalculatorSession::new(kind));
    }

    pub fn open_settings(&mut self) {
        self.view = AppView::Settings;
        self.session = None;
    }

    /// Return to the main menu, discarding the open session
    pub fn back(&mut self) {
        self.view = AppView::MainMenu;
        self.session = None;
    }

    pub fn press(&mut self, key: char) -> bool {
        self.session.as_mut().is_some_and(|s| s.press_active(key))
    }

    pub fn delete(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.delete_active();
        }
    }

    pub fn clear(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.clear_active();
        }
    }

    pub fn focus(&mut self, field: &str) -> bool {
        self.session.as_mut().is_some_and(|s| s.focus(field))
    }

    /// Move to the next field; `None` when no calculator is open
    pub fn next_field(&mut self) -> Option<String> {
        self.session.as_mut().map(|s| s.next_field().to_string())
    }

    pub fn set_unit(&mut self, unit: UnitKind) {
        if let Some(session) = self.session.as_mut() {
            session.set_unit(unit);
        }
    }

    pub fn set_direction(&mut self, direction: ConversionDirection) {
        if let Some(session) = self.session.as_mut() {
            session.set_direction(direction);
        }
    }

    pub fn set_promo_mode(&mut self, mode: PromoMode) {
        if let Some(session) = self.session.as_mut() {
            session.set_promo_mode(mode);
        }
    }

    /// Result for the open calculator, recomputed from the buffers
    pub fn results(&self) -> Option<CalculationResult> {
        self.session.as_ref().map(CalculatorSession::evaluate)
    }

    /// Fetch the official rate into the currency calculator
    ///
    /// Does nothing unless the currency calculator is open. On failure the
    /// rate field keeps whatever the user had.
    pub async fn refresh_rate<S: RateSource>(
        &mut self,
        fetcher: &RateFetcher<S>,
        currency: &str,
        today: NaiveDate,
    ) -> Option<RateSnapshot> {
        let session = self
            .session
            .as_mut()
            .filter(|s| s.kind() == CalculatorKind::Currency)?;
        let snapshot = refresh_session_rate(session, fetcher, currency, today).await?;
        self.last_rate = Some(snapshot.clone());
        Some(snapshot)
    }

    pub fn set_language(&mut self, language: &str) {
        self.settings.language = crate::localization::detect_language(Some(language)).to_string();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
        let (header, background) = theme.colors();
        self.platform.set_header_color(header);
        self.platform.set_background_color(background);
    }
}
