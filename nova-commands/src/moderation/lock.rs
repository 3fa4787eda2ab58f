//! Channel lock controls.
//!
//! Locking toggles the `SEND_MESSAGES` bit on the @everyone permission
//! overwrite of the invoking channel, inserting a fresh overwrite entry when
//! the channel does not carry one for that principal yet.

use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::{
    channel::permission_overwrite::{PermissionOverwrite, PermissionOverwriteType},
    gateway::payload::incoming::InteractionCreate,
    guild::Permissions,
    id::{Id, marker::GenericMarker},
};

use nova_core::Context;
use nova_utils::interaction::{defer_ephemeral, update_response};

#[derive(CommandModel, CreateCommand)]
#[command(name = "lock", desc = "Locks the current channel.")]
pub struct LockCommand {
    /// The reason of the lock.
    pub reason: Option<String>,
}

#[derive(CommandModel, CreateCommand)]
#[command(name = "unlock", desc = "Unlocks the current channel.")]
pub struct UnlockCommand {
    /// The reason of the unlock.
    pub reason: Option<String>,
}

/// Deny sending for @everyone, preserving every other overwrite.
pub fn with_send_denied(
    mut overwrites: Vec<PermissionOverwrite>,
    everyone: Id<GenericMarker>,
) -> Vec<PermissionOverwrite> {
    if let Some(overwrite) = overwrites
        .iter_mut()
        .find(|overwrite| overwrite.id == everyone)
    {
        overwrite.deny |= Permissions::SEND_MESSAGES;
    } else {
        overwrites.push(PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::SEND_MESSAGES,
            id: everyone,
            kind: PermissionOverwriteType::Role,
        });
    }

    overwrites
}

/// Re-allow sending for @everyone, preserving every other overwrite.
pub fn with_send_allowed(
    mut overwrites: Vec<PermissionOverwrite>,
    everyone: Id<GenericMarker>,
) -> Vec<PermissionOverwrite> {
    if let Some(overwrite) = overwrites
        .iter_mut()
        .find(|overwrite| overwrite.id == everyone)
    {
        overwrite.deny &= !Permissions::SEND_MESSAGES;
        overwrite.allow |= Permissions::SEND_MESSAGES;
    } else {
        overwrites.push(PermissionOverwrite {
            allow: Permissions::SEND_MESSAGES,
            deny: Permissions::empty(),
            id: everyone,
            kind: PermissionOverwriteType::Role,
        });
    }

    overwrites
}

/// Lock the invoking channel.
pub async fn run_lock(
    ctx: Context,
    interaction: &InteractionCreate,
    command: LockCommand,
) -> anyhow::Result<()> {
    apply(
        ctx,
        interaction,
        command.reason.as_deref().unwrap_or("N/A"),
        with_send_denied,
        "locked",
    )
    .await
}

/// Unlock the invoking channel.
pub async fn run_unlock(
    ctx: Context,
    interaction: &InteractionCreate,
    command: UnlockCommand,
) -> anyhow::Result<()> {
    apply(
        ctx,
        interaction,
        command.reason.as_deref().unwrap_or("N/A"),
        with_send_allowed,
        "unlocked",
    )
    .await
}

async fn apply(
    ctx: Context,
    interaction: &InteractionCreate,
    reason: &str,
    mutate: fn(Vec<PermissionOverwrite>, Id<GenericMarker>) -> Vec<PermissionOverwrite>,
    action_past_tense: &str,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    defer_ephemeral(http, interaction).await?;

    let Some(channel_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
        return update_response(http, interaction, ":x: Could not resolve this channel.").await;
    };

    // The interaction payload only carries a partial channel; the overwrite
    // list has to come from a full fetch.
    let channel = match http.channel(channel_id).await {
        Ok(response) => response.model().await?,
        Err(source) => {
            error!(?source, "channel fetch for lock toggle failed");
            return update_response(http, interaction, ":x: Could not fetch this channel.").await;
        }
    };

    let overwrites = mutate(
        channel.permission_overwrites.unwrap_or_default(),
        ctx.config.guild.cast(),
    );

    if let Err(source) = http
        .update_channel(channel_id)
        .permission_overwrites(&overwrites)
        .reason(reason)
        .await
    {
        error!(?source, "lock toggle request failed");
        return update_response(http, interaction, ":x: Could not update channel permissions.")
            .await;
    }

    let confirmation = format!(
        ":heavy_check_mark: <#{}> has been {action_past_tense}.",
        channel_id.get()
    );
    update_response(http, interaction, &confirmation).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn everyone() -> Id<GenericMarker> {
        Id::new(701347683591389185)
    }

    fn other_overwrite() -> PermissionOverwrite {
        PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL,
            deny: Permissions::empty(),
            id: Id::new(42),
            kind: PermissionOverwriteType::Member,
        }
    }

    #[test]
    fn lock_inserts_missing_overwrite() {
        let overwrites = with_send_denied(vec![other_overwrite()], everyone());

        assert_eq!(overwrites.len(), 2);
        let entry = overwrites.last().unwrap();
        assert_eq!(entry.id, everyone());
        assert!(entry.deny.contains(Permissions::SEND_MESSAGES));
        assert!(entry.allow.is_empty());
    }

    #[test]
    fn lock_amends_existing_overwrite() {
        let existing = PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::ADD_REACTIONS,
            id: everyone(),
            kind: PermissionOverwriteType::Role,
        };

        let overwrites = with_send_denied(vec![existing], everyone());

        assert_eq!(overwrites.len(), 1);
        assert!(overwrites[0].deny.contains(Permissions::SEND_MESSAGES));
        assert!(overwrites[0].deny.contains(Permissions::ADD_REACTIONS));
    }

    #[test]
    fn unlock_reverses_lock() {
        let locked = with_send_denied(Vec::new(), everyone());
        let unlocked = with_send_allowed(locked, everyone());

        assert_eq!(unlocked.len(), 1);
        assert!(!unlocked[0].deny.contains(Permissions::SEND_MESSAGES));
        assert!(unlocked[0].allow.contains(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn toggles_are_idempotent() {
        let once = with_send_denied(Vec::new(), everyone());
        let twice = with_send_denied(once.clone(), everyone());
        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].deny, twice[0].deny);

        let unlocked_once = with_send_allowed(twice, everyone());
        let unlocked_twice = with_send_allowed(unlocked_once.clone(), everyone());
        assert_eq!(unlocked_once[0].allow, unlocked_twice[0].allow);
        assert_eq!(unlocked_once[0].deny, unlocked_twice[0].deny);
    }

    #[test]
    fn unrelated_overwrites_survive() {
        let overwrites = with_send_allowed(vec![other_overwrite()], everyone());

        assert_eq!(overwrites.len(), 2);
        assert!(overwrites[0].allow.contains(Permissions::VIEW_CHANNEL));
    }
}
