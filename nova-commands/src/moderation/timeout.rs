use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_interactions::command::{CommandModel, CreateCommand, ResolvedUser};
use twilight_model::{gateway::payload::incoming::InteractionCreate, util::Timestamp};

use crate::moderation::audit;
use crate::moderation::embeds::{
    member_action_embed, platform_failure_message, timestamps_value,
};
use nova_core::Context;
use nova_database::actions::{self, ActionKind, NewAction};
use nova_utils::embed::COLOR_YELLOW;
use nova_utils::interaction::{defer_ephemeral, respond_ephemeral, update_response};

#[derive(CommandModel, CreateCommand)]
#[command(name = "timeout", desc = "Timeouts a member in the server.")]
pub struct TimeoutCommand {
    /// The user you wish to timeout.
    pub user: ResolvedUser,
    /// The reason behind why you want to timeout them.
    pub reason: Option<String>,
    /// How long the user should be timed out in days.
    #[command(min_value = 0, max_value = 28)]
    pub days: Option<i64>,
    /// How long the user should be timed out in hours.
    #[command(min_value = 0)]
    pub hours: Option<i64>,
    /// How long the user should be timed out in minutes.
    #[command(min_value = 0)]
    pub minutes: Option<i64>,
    /// How long the user should be timed out in seconds.
    #[command(min_value = 0)]
    pub seconds: Option<i64>,
}

/// Total timeout duration in seconds, or `None` when every part is zero.
pub fn duration_secs(
    days: Option<i64>,
    hours: Option<i64>,
    minutes: Option<i64>,
    seconds: Option<i64>,
) -> Option<u64> {
    let days = days.unwrap_or(0).max(0) as u64;
    let hours = hours.unwrap_or(0).max(0) as u64;
    let minutes = minutes.unwrap_or(0).max(0) as u64;
    let seconds = seconds.unwrap_or(0).max(0) as u64;

    let total = days * 86_400 + hours * 3_600 + minutes * 60 + seconds;
    (total > 0).then_some(total)
}

/// Time a member out, record the action, and notify the action log.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    moderator: &twilight_model::user::User,
    command: TimeoutCommand,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let target = &command.user.resolved;
    let reason = command.reason.as_deref().unwrap_or("N/A");

    // Validated before any deferral or platform call.
    let Some(duration) = duration_secs(
        command.days,
        command.hours,
        command.minutes,
        command.seconds,
    ) else {
        return respond_ephemeral(
            http,
            interaction,
            ":x: missing any indicator of timeout length!",
        )
        .await;
    };

    defer_ephemeral(http, interaction).await?;

    let expires_at_secs = actions::now_unix_secs().saturating_add(duration);
    let Ok(expires_at) = Timestamp::from_secs(expires_at_secs as i64) else {
        return update_response(
            http,
            interaction,
            ":x: Unable to compute the timeout expiration timestamp.",
        )
        .await;
    };

    if let Err(source) = http
        .update_guild_member(ctx.config.guild, target.id)
        .communication_disabled_until(Some(expires_at))
        .reason(reason)
        .await
    {
        error!(?source, "timeout request failed");
        let failure = platform_failure_message("timeout", target.id);
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
        "User timed out",
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
            kind: ActionKind::Timeout,
            moderator_id: moderator.id.get(),
            reason: reason.to_owned(),
        },
        embed,
    )
    .await;

    let confirmation = audit::with_storage_notice(
        format!(
            ":heavy_check_mark: <@{}> has been timed out until <t:{expires_at_secs}:F> (<t:{expires_at_secs}:R>).",
            target.id.get()
        ),
        &stored,
    );
    update_response(http, interaction, &confirmation).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_rejected() {
        assert_eq!(duration_secs(None, None, None, None), None);
        assert_eq!(duration_secs(Some(0), Some(0), Some(0), Some(0)), None);
    }

    #[test]
    fn parts_are_summed() {
        assert_eq!(duration_secs(Some(1), None, None, None), Some(86_400));
        assert_eq!(
            duration_secs(Some(1), Some(2), Some(3), Some(4)),
            Some(86_400 + 7_200 + 180 + 4)
        );
        assert_eq!(duration_secs(None, None, None, Some(30)), Some(30));
    }

    #[test]
    fn negative_parts_do_not_underflow() {
        assert_eq!(duration_secs(Some(-1), None, None, Some(10)), Some(10));
    }
}
