use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::{
    gateway::payload::incoming::InteractionCreate,
    id::{Id, marker::ChannelMarker},
};

use nova_core::Context;
use nova_utils::interaction::{defer_ephemeral, update_response};

#[derive(CommandModel, CreateCommand)]
#[command(name = "slowmode", desc = "Sets the slowmode in a channel.")]
pub struct SlowmodeCommand {
    /// The amount of seconds to be set as slowmode.
    #[command(min_value = 0, max_value = 21600)]
    pub time: i64,
    /// The reason behind why you want to add slowmode.
    pub reason: Option<String>,
    /// The channel that should be slowmoded.
    #[command(channel_types = "guild_text")]
    pub channel: Option<Id<ChannelMarker>>,
}

/// Set the per-user message rate limit of a channel.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    command: SlowmodeCommand,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let reason = command.reason.as_deref().unwrap_or("N/A");

    defer_ephemeral(http, interaction).await?;

    let channel_id = match command.channel {
        Some(channel_id) => channel_id,
        None => {
            let Some(channel_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
                return update_response(http, interaction, ":x: Could not resolve this channel.")
                    .await;
            };
            channel_id
        }
    };

    if let Err(source) = http
        .update_channel(channel_id)
        .rate_limit_per_user(command.time as u16)
        .reason(reason)
        .await
    {
        error!(?source, "slowmode request failed");
        return update_response(http, interaction, ":x: Could not set the slowmode.").await;
    }

    let confirmation = format!(
        ":heavy_check_mark: <#{}>'s slowmode was set!",
        channel_id.get()
    );
    update_response(http, interaction, &confirmation).await
}
