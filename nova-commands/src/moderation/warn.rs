use tracing::error;
use twilight_interactions::command::{CommandModel, CreateCommand, ResolvedUser};
use twilight_model::gateway::payload::incoming::InteractionCreate;

use crate::moderation::audit;
use crate::moderation::embeds::{
    action_confirmation, member_action_embed, platform_failure_message, timestamps_value,
};
use nova_core::Context;
use nova_database::actions::{ActionKind, NewAction};
use nova_utils::embed::{COLOR_YELLOW, sanitize_mentions};
use nova_utils::interaction::{defer_ephemeral, update_response};

#[derive(CommandModel, CreateCommand)]
#[command(name = "warn", desc = "Warns a member in the server.")]
pub struct WarnCommand {
    /// The user you wish to warn.
    pub user: ResolvedUser,
    /// The reason behind why you want to warn them.
    pub reason: Option<String>,
}

/// Post a public warning, record the action, and notify the action log.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    moderator: &twilight_model::user::User,
    command: WarnCommand,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let target = &command.user.resolved;
    let reason = command.reason.as_deref().unwrap_or("N/A");

    defer_ephemeral(http, interaction).await?;

    let Some(channel_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
        return update_response(http, interaction, ":x: Could not resolve this channel.").await;
    };

    // The public notice is the action itself; no notice means nothing to record.
    let warning_text = format!(
        "<@{}>, you have been warned for reason: {}.",
        target.id.get(),
        sanitize_mentions(reason)
    );
    if let Err(source) = http.create_message(channel_id).content(&warning_text).await {
        error!(?source, "warn notice failed");
        let failure = platform_failure_message("warn", target.id);
        return update_response(http, interaction, &failure).await;
    }

    let joined_secs = command
        .user
        .member
        .as_ref()
        .and_then(|member| member.joined_at)
        .map(|joined| joined.as_secs());
    let timestamps = timestamps_value(joined_secs, target.id);
    let embed = member_action_embed(
        "User warned",
        COLOR_YELLOW,
        target,
        moderator,
        reason,
        Some(&timestamps),
    )?;

    let stored = audit::log_action(
        &ctx,
        NewAction {
            user_id: target.id.get(),
            kind: ActionKind::Warn,
            moderator_id: moderator.id.get(),
            reason: reason.to_owned(),
        },
        embed,
    )
    .await;

    let confirmation =
        audit::with_storage_notice(action_confirmation(target.id, "warned"), &stored);
    update_response(http, interaction, &confirmation).await
}
