use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::api::{CafmClient, RequestContext};
use crate::config::AppConfig;
use crate::core::categories::Locale;

use super::events::AppEvent;

/// Centralized handle to backend access.
///
/// Created once at startup, then passed by reference to views. The API
/// client is cheap to clone into spawned tasks.
pub struct Services {
    pub api: CafmClient,
    pub locale: Locale,
    /// Directory for staged image previews.
    pub preview_dir: PathBuf,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build services from config. Failure here is fatal: the client
    /// cannot run without a well-formed API endpoint.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> crate::api::Result<Self> {
        let ctx = RequestContext::parse(
            &config.api.base_url,
            &config.api.token,
            &config.api.tenant,
        )?;
        log::info!(
            "API endpoint {} (tenant {})",
            config.api.base_url,
            config.api.tenant
        );

        Ok(Self {
            api: CafmClient::new(ctx),
            locale: config.api.locale,
            preview_dir: config.preview_dir(),
            event_tx,
        })
    }
}
