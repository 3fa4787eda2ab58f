use std::env;
use std::sync::Arc;

use tracing::{error, info};
use twilight_gateway::{ConfigBuilder, EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::{
    event::Event,
    payload::outgoing::update_presence::UpdatePresencePayload,
    presence::{ActivityType, MinimalActivity, Status},
};

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use nova_commands::{handle_interaction, help, logs};
use nova_core::{Context, GuildConfig};
use nova_database::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let token = env::var("DISCORD_TOKEN")?;
    let database_url = env::var("DATABASE_URL")?;
    let config_path = env::var("NOVA_CONFIG").unwrap_or_else(|_| "nova.toml".to_owned());

    let config = Arc::new(GuildConfig::load(&config_path)?);
    info!(path = %config_path, "guild configuration loaded");

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(token.clone()));

    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    nova_database::MIGRATOR.run(&db_pool).await?;
    info!("PostgreSQL connection established.");
    let db = Database::new(db_pool);

    let bot_user = http.current_user().await?.model().await?;
    let ctx = Context::new(Arc::clone(&http), db, Arc::clone(&config), bot_user.id);

    // Declare which intents the bot has
    let intents =
        Intents::GUILDS | Intents::GUILD_MEMBERS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

    let presence = UpdatePresencePayload::new(
        vec![
            MinimalActivity {
                kind: ActivityType::Watching,
                name: "you. 👀".to_owned(),
                url: None,
            }
            .into(),
        ],
        false,
        None,
        Status::DoNotDisturb,
    )?;

    // A shard is one Gateway WebSocket connection to Discord
    let shard_config = ConfigBuilder::new(token, intents).presence(presence).build();
    let mut shard = Shard::with_config(ShardId::new(0, 1), shard_config);

    info!("Nova is connecting...");

    // Our ears, listens for stuff to do
    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        // A failed handler only loses its own interaction, never the loop.
        match event {
            Event::Ready(ready) => {
                info!("Nova has successfully awoken!");

                let commands = nova_commands::guild_commands();
                if let Err(source) = http
                    .interaction(ready.application.id)
                    .set_guild_commands(config.guild, &commands)
                    .await
                {
                    error!(?source, "guild command registration failed");
                }
            }

            Event::InteractionCreate(interaction) => {
                if let Err(source) = handle_interaction(ctx.clone(), interaction).await {
                    error!(?source, "interaction handler failed");
                }
            }
            Event::ThreadCreate(thread) => {
                if let Err(source) = help::thread::handle_thread_create(ctx.clone(), &thread).await
                {
                    error!(?source, "thread create handler failed");
                }
            }
            Event::MessageDelete(deletion) => {
                if let Err(source) = logs::message_deleted(&ctx, &deletion).await {
                    error!(?source, "message delete log failed");
                }
            }
            Event::MessageUpdate(update) => {
                if let Err(source) = logs::message_updated(&ctx, &update).await {
                    error!(?source, "message update log failed");
                }
            }
            Event::MemberAdd(member) => {
                if let Err(source) = logs::member_joined(&ctx, &member).await {
                    error!(?source, "member join log failed");
                }
            }
            Event::MemberRemove(member) => {
                if let Err(source) = logs::member_left(&ctx, &member).await {
                    error!(?source, "member leave log failed");
                }
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(()) // Return Success, shutdown cleanly
}
