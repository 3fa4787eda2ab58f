use std::sync::Arc;

use twilight_http::Client;
use twilight_model::id::{Id, marker::UserMarker};

use nova_database::Database;

/// Guild configuration loaded once at startup.
pub mod config;

pub use config::{Capability, GuildConfig};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub db: Database,
    pub config: Arc<GuildConfig>,
    /// Plain HTTP client for CDN downloads.
    pub web: reqwest::Client,
    /// The bot's own user, resolved at startup.
    pub bot_user_id: Id<UserMarker>,
}

impl Context {
    /// Create a new application context.
    pub fn new(
        http: Arc<Client>,
        db: Database,
        config: Arc<GuildConfig>,
        bot_user_id: Id<UserMarker>,
    ) -> Self {
        Self {
            http,
            db,
            config,
            web: reqwest::Client::new(),
            bot_user_id,
        }
    }
}
