//! OpenPower — sequential thought ledger, model cache, and browser driver
//! behind the OpenPower tool server.

pub mod browser;
pub mod ledger;
pub mod models;
pub mod types;

pub use browser::{find_chromium, Browser, ChromiumBrowser, DEFAULT_NAVIGATION_TIMEOUT_MS};
pub use ledger::ThoughtLedger;
pub use models::{
    validate_model_id, HubLoader, ModelLoader, ModelManager, OnnxModel, TokenizerSpec,
    DEFAULT_HUB_ENDPOINT,
};
pub use types::*;
