use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::gateway::payload::incoming::InteractionCreate;

use crate::moderation::audit;
use crate::moderation::embeds::{
    action_confirmation, member_action_embed, platform_failure_message,
};
use nova_core::Context;
use nova_database::actions::{ActionKind, NewAction};
use nova_utils::embed::COLOR_GREEN;
use nova_utils::interaction::{defer_ephemeral, update_response};
use nova_utils::parse::parse_user_id;

#[derive(CommandModel, CreateCommand)]
#[command(name = "unban", desc = "Unbans a user from the server.")]
pub struct UnbanCommand {
    /// The ID of the user you wish to unban.
    pub id: String,
    /// The reason behind why you want to unban them.
    pub reason: Option<String>,
}

/// Lift a ban by user ID, record the action, and notify the action log.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    moderator: &twilight_model::user::User,
    command: UnbanCommand,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let reason = command.reason.as_deref().unwrap_or("N/A");

    defer_ephemeral(http, interaction).await?;

    let Some(target_user_id) = parse_user_id(&command.id) else {
        return update_response(http, interaction, ":x: Invalid ID provided.").await;
    };

    // Resolve the user up front so an unknown ID is a validation error
    // rather than a failed platform call.
    let target = match http.user(target_user_id).await {
        Ok(response) => response.model().await?,
        Err(source) => {
            error!(?source, "unban target lookup failed");
            return update_response(http, interaction, ":x: Invalid ID provided.").await;
        }
    };

    if let Err(source) = http
        .delete_ban(ctx.config.guild, target_user_id)
        .reason(reason)
        .await
    {
        error!(?source, "unban request failed");
        let failure = platform_failure_message("unban", target_user_id);
        return update_response(http, interaction, &failure).await;
    }

    let embed = member_action_embed("User unbanned", COLOR_GREEN, &target, moderator, reason, None)?;

    let stored = audit::log_action(
        &ctx,
        NewAction {
            user_id: target_user_id.get(),
            kind: ActionKind::Unban,
            moderator_id: moderator.id.get(),
            reason: reason.to_owned(),
        },
        embed,
    )
    .await;

    let confirmation =
        audit::with_storage_notice(action_confirmation(target_user_id, "unbanned"), &stored);
    update_response(http, interaction, &confirmation).await
}
