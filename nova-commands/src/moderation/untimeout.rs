use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_interactions::command::{CommandModel, CreateCommand, ResolvedUser};
use twilight_model::gateway::payload::incoming::InteractionCreate;

use crate::moderation::audit;
use crate::moderation::embeds::{
    action_confirmation, member_action_embed, platform_failure_message, timestamps_value,
};
use nova_core::Context;
use nova_database::actions::{self, ActionKind, NewAction};
use nova_utils::embed::COLOR_YELLOW;
use nova_utils::interaction::{defer_ephemeral, update_response};

#[derive(CommandModel, CreateCommand)]
#[command(name = "untimeout", desc = "Removes the timeout from a member.")]
pub struct UntimeoutCommand {
    /// The user you wish to untimeout.
    pub user: ResolvedUser,
    /// The reason behind why you want to untimeout them.
    pub reason: Option<String>,
}

/// Whether a stored expiry still counts as an active timeout.
pub fn has_active_timeout(disabled_until_secs: Option<i64>, now_secs: i64) -> bool {
    disabled_until_secs.is_some_and(|until| until > now_secs)
}

/// Clear an active timeout, record the action, and notify the action log.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    moderator: &twilight_model::user::User,
    command: UntimeoutCommand,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let target = &command.user.resolved;
    let reason = command.reason.as_deref().unwrap_or("N/A");

    defer_ephemeral(http, interaction).await?;

    let member = match http.guild_member(ctx.config.guild, target.id).await {
        Ok(response) => response.model().await?,
        Err(source) => {
            error!(?source, "untimeout member lookup failed");
            let failure = platform_failure_message("untimeout", target.id);
            return update_response(http, interaction, &failure).await;
        }
    };

    let disabled_until = member
        .communication_disabled_until
        .map(|until| until.as_secs());
    if !has_active_timeout(disabled_until, actions::now_unix_secs() as i64) {
        let notice = format!(":x: <@{}> is not timed out.", target.id.get());
        return update_response(http, interaction, &notice).await;
    }

    if let Err(source) = http
        .update_guild_member(ctx.config.guild, target.id)
        .communication_disabled_until(None)
        .reason(reason)
        .await
    {
        error!(?source, "untimeout request failed");
        let failure = platform_failure_message("untimeout", target.id);
        return update_response(http, interaction, &failure).await;
    }

    let joined_secs = member.joined_at.map(|joined| joined.as_secs());
    let timestamps = timestamps_value(joined_secs, target.id);
    let embed = member_action_embed(
        "User untimed out",
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
            kind: ActionKind::Untimeout,
            moderator_id: moderator.id.get(),
            reason: reason.to_owned(),
        },
        embed,
    )
    .await;

    let confirmation =
        audit::with_storage_notice(action_confirmation(target.id, "untimed out"), &stored);
    update_response(http, interaction, &confirmation).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_expiry_means_no_timeout() {
        assert!(!has_active_timeout(None, 1_700_000_000));
    }

    #[test]
    fn past_expiry_means_no_timeout() {
        assert!(!has_active_timeout(Some(1_699_999_999), 1_700_000_000));
        assert!(!has_active_timeout(Some(1_700_000_000), 1_700_000_000));
    }

    #[test]
    fn future_expiry_is_active() {
        assert!(has_active_timeout(Some(1_700_000_600), 1_700_000_000));
    }
}
