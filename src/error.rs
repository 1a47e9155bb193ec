//! Unified error handling for warble.
//!
//! Only fatal conditions bubble up here; per-frame protocol noise is logged
//! and absorbed at the dispatch layer.

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::session::LoginError;
use crate::settings::SettingsError;

/// Fatal bot errors. Any of these terminates the process.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("login failed: {0}")]
    Login(#[from] LoginError),

    #[error("settings store: {0}")]
    Settings(#[from] SettingsError),

    #[error("connection: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),
}
