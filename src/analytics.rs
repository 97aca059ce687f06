//! # Visit Analytics Module
//!
//! Best-effort visit logging to a webhook. Each user is recorded at most
//! once per client lifetime; the POST runs in a spawned task that nobody
//! awaits, and failures end up in the log only.

use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AnalyticsConfig;
use crate::platform::TelegramUser;

/// Body posted to the webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitRecord {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub language_code: String,
    pub timestamp: String,
    pub platform: String,
}

impl VisitRecord {
    pub fn new(user: &TelegramUser, platform: &str) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone().unwrap_or_default(),
            username: user.username.clone().unwrap_or_default(),
            language_code: user.language_code.clone().unwrap_or_default(),
            timestamp: Utc::now().to_rfc3339(),
            platform: platform.to_string(),
        }
    }
}

pub struct AnalyticsClient {
    http: reqwest::Client,
    webhook_url: Option<String>,
    logged: Mutex<HashSet<u64>>,
}

impl AnalyticsClient {
    pub fn new(config: &AnalyticsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            http,
            webhook_url: config.webhook_url.clone(),
            logged: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Whether a visit for this user was already sent by this client
    pub fn has_logged(&self, user_id: u64) -> bool {
        self.logged
            .lock()
            .map(|set| set.contains(&user_id))
            .unwrap_or(false)
    }

    /// Fire-and-forget visit log
    ///
    /// Returns `true` when a POST was dispatched. Outside a tokio runtime
    /// nothing is sent and the user stays unmarked.
    pub fn log_visit(&self, user: &TelegramUser, platform: &str) -> bool {
        let Some(url) = self.webhook_url.clone() else {
            debug!(user_id = user.id, "Analytics webhook not configured, skipping visit log");
            return false;
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(user_id = user.id, "No async runtime, skipping visit log");
            return false;
        };

        let record = VisitRecord::new(user, platform);
        let body = match serde_json::to_string(&record) {
            Ok(body) => body,
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Failed to serialize visit record");
                return false;
            }
        };

        match self.logged.lock() {
            Ok(mut set) => {
                if !set.insert(user.id) {
                    return false;
                }
            }
            Err(e) => {
                warn!(error = %e, "Analytics dedup set poisoned, skipping visit log");
                return false;
            }
        }

        let http = self.http.clone();
        handle.spawn(async move {
            let result = http
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(body)
                .send()
                .await;
            match result {
                Ok(_) => info!(user_id = record.id, "User visit logged"),
                Err(e) => warn!(user_id = record.id, error = %e, "Failed to log user visit"),
            }
        });

        true
    }
}
