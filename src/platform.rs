//! Host platform capabilities for the Mini App front end.
//!
//! The Telegram WebApp bridge is injected through [`Platform`] instead of
//! being read from globals, so the controller runs the same way inside a
//! real Mini App, in a terminal, or in tests.

use serde::{Deserialize, Serialize};

/// Telegram user as exposed by `initDataUnsafe.user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: u64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

impl From<&teloxide::types::User> for TelegramUser {
    fn from(user: &teloxide::types::User) -> Self {
        Self {
            id: user.id.0,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            language_code: user.language_code.clone(),
        }
    }
}

/// Capabilities offered by the host the app is embedded in
pub trait Platform {
    /// Signal that the app finished loading
    fn ready(&self);

    /// Ask the host to give the app its full height
    fn expand(&self);

    fn set_header_color(&self, _color: &str) {}

    fn set_background_color(&self, _color: &str) {}

    /// User that opened the app, when the host knows it
    fn current_user(&self) -> Option<TelegramUser> {
        None
    }

    /// Host platform name reported with visit analytics
    fn platform_name(&self) -> &str {
        "unknown"
    }
}

/// Platform with fixed answers and no-op lifecycle calls
#[derive(Debug, Clone, Default)]
pub struct StaticPlatform {
    pub user: Option<TelegramUser>,
    pub name: String,
}

impl StaticPlatform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            user: None,
            name: name.into(),
        }
    }

    pub fn with_user(mut self, user: TelegramUser) -> Self {
        self.user = Some(user);
        self
    }
}

impl Platform for StaticPlatform {
    fn ready(&self) {}

    fn expand(&self) {}

    fn current_user(&self) -> Option<TelegramUser> {
        self.user.clone()
    }

    fn platform_name(&self) -> &str {
        if self.name.is_empty() {
            "unknown"
        } else {
            &self.name
        }
    }
}
