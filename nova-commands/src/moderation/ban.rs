use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_interactions::command::{CommandModel, CreateCommand, ResolvedUser};
use twilight_model::gateway::payload::incoming::InteractionCreate;

use crate::moderation::audit;
use crate::moderation::embeds::{
    action_confirmation, member_action_embed, platform_failure_message, timestamps_value,
};
use nova_core::Context;
use nova_database::actions::{ActionKind, NewAction};
use nova_utils::embed::COLOR_RED;
use nova_utils::interaction::{defer_ephemeral, update_response};

#[derive(CommandModel, CreateCommand)]
#[command(name = "ban", desc = "Bans a member from the server.")]
pub struct BanCommand {
    /// The user you wish to ban.
    pub user: ResolvedUser,
    /// The reason behind why you want to ban them.
    pub reason: Option<String>,
}

/// Ban a target member, record the action, and notify the action log.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    moderator: &twilight_model::user::User,
    command: BanCommand,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let target = &command.user.resolved;
    let reason = command.reason.as_deref().unwrap_or("N/A");

    defer_ephemeral(http, interaction).await?;

    if let Err(source) = http
        .create_ban(ctx.config.guild, target.id)
        .reason(reason)
        .await
    {
        error!(?source, "ban request failed");
        let failure = platform_failure_message("ban", target.id);
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
        "User banned",
        COLOR_RED,
        target,
        moderator,
        reason,
        Some(&timestamps),
    )?;

    let stored = audit::log_action(
        &ctx,
        NewAction {
            user_id: target.id.get(),
            kind: ActionKind::Ban,
            moderator_id: moderator.id.get(),
            reason: reason.to_owned(),
        },
        embed,
    )
    .await;

    let confirmation =
        audit::with_storage_notice(action_confirmation(target.id, "banned"), &stored);
    update_response(http, interaction, &confirmation).await
}
