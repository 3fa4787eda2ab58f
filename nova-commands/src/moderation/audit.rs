//! Audit trail for moderation actions.
//!
//! One insert and one notification embed per action, attempted at most once.
//! The notification is posted even when the insert fails; the storage outcome
//! is handed back so the handler can tell the moderator about it.

use tracing::error;
use twilight_model::channel::message::embed::Embed;

use nova_core::Context;
use nova_database::actions::{self, NewAction};

/// Persist one moderation action and post its notification embed.
pub async fn log_action(ctx: &Context, action: NewAction, embed: Embed) -> anyhow::Result<()> {
    let stored = actions::record_action(&ctx.db, &action).await;

    if let Err(source) = &stored {
        error!(
            ?source,
            kind = action.kind.as_str(),
            user_id = action.user_id,
            "failed to persist moderation action"
        );
    }

    if let Err(source) = ctx
        .http
        .create_message(ctx.config.channels.action_logs)
        .embeds(&[embed])
        .await
    {
        error!(?source, "failed to post action log notification");
    }

    stored
}

/// Append a storage notice to a confirmation when the audit insert failed.
pub fn with_storage_notice(confirmation: String, stored: &anyhow::Result<()>) -> String {
    if stored.is_ok() {
        confirmation
    } else {
        format!("{confirmation}\n:warning: The action could not be written to the audit log.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_notice_only_on_failure() {
        let ok: anyhow::Result<()> = Ok(());
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("connection refused"));

        assert_eq!(with_storage_notice("done".to_owned(), &ok), "done");

        let noticed = with_storage_notice("done".to_owned(), &err);
        assert!(noticed.starts_with("done\n"));
        assert!(noticed.contains("audit log"));
    }
}
