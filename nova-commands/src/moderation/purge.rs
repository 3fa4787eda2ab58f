use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::{
    gateway::payload::incoming::InteractionCreate,
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};

use nova_core::Context;
use nova_database::actions::now_unix_secs;
use nova_utils::interaction::{defer_ephemeral, update_response};

/// A delete call slower than this posts a public completion notice.
const SLOW_PURGE_THRESHOLD: Duration = Duration::from_secs(5);
/// How long the public notice stays up before deleting itself.
const SELF_DESTRUCT_DELAY: Duration = Duration::from_secs(30);

#[derive(CommandModel, CreateCommand)]
#[command(name = "purge", desc = "Purges an amount of messages of a channel.")]
pub struct PurgeCommand {
    /// The amount of messages you want to delete.
    #[command(min_value = 1, max_value = 100)]
    pub amount: i64,
    /// Whether bulk delete should be used, default True.
    pub bulk: Option<bool>,
    /// The reason behind why you want to purge.
    pub reason: Option<String>,
    /// The channel that should be purged.
    #[command(channel_types = "guild_text")]
    pub channel: Option<Id<ChannelMarker>>,
}

/// Whether the purge ran long enough to warrant a public notice.
pub fn is_slow_purge(elapsed: Duration) -> bool {
    elapsed >= SLOW_PURGE_THRESHOLD
}

/// Delete the latest messages of a channel.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    moderator: &twilight_model::user::User,
    command: PurgeCommand,
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

    let messages = match http
        .channel_messages(channel_id)
        .limit(command.amount as u16)
        .await
    {
        Ok(response) => response.model().await?,
        Err(source) => {
            error!(?source, "purge message listing failed");
            return update_response(http, interaction, ":x: Could not list messages to purge.")
                .await;
        }
    };

    let ids: Vec<Id<MessageMarker>> = messages.into_iter().map(|message| message.id).collect();
    if ids.is_empty() {
        return update_response(http, interaction, ":x: No messages found to delete.").await;
    }

    let started = Instant::now();
    let delete_result = if command.bulk.unwrap_or(true) && ids.len() >= 2 {
        http.delete_messages(channel_id, &ids)
            .reason(reason)
            .await
            .map(|_| ())
    } else {
        let mut failed = Ok(());
        for message_id in &ids {
            if let Err(source) = http.delete_message(channel_id, *message_id).await {
                failed = Err(source);
                break;
            }
        }
        failed
    };
    let elapsed = started.elapsed();

    if let Err(source) = delete_result {
        error!(?source, "purge delete request failed");
        return update_response(http, interaction, ":x: Could not delete messages.").await;
    }

    if is_slow_purge(elapsed) {
        // Post publicly so bystanders know why the channel just went quiet,
        // then clean up after ourselves.
        let destruct_at = now_unix_secs() + SELF_DESTRUCT_DELAY.as_secs();
        let notice = format!(
            ":heavy_check_mark: <#{}> was purged. <@{}>\n**I will self-destruct <t:{destruct_at}:R>**!",
            channel_id.get(),
            moderator.id.get()
        );

        match http.create_message(channel_id).content(&notice).await {
            Ok(response) => {
                let notice_message = response.model().await?;
                schedule_self_destruct(Arc::clone(&ctx.http), channel_id, notice_message.id);
            }
            Err(source) => error!(?source, "purge notice failed"),
        }
    }

    let confirmation = format!(":heavy_check_mark: <#{}> was purged.", channel_id.get());
    update_response(http, interaction, &confirmation).await
}

/// Fire-and-forget deletion of the public notice; no cancellation path.
fn schedule_self_destruct(
    http: Arc<twilight_http::Client>,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
) {
    tokio::spawn(async move {
        sleep(SELF_DESTRUCT_DELAY).await;
        if let Err(source) = http.delete_message(channel_id, message_id).await {
            error!(?source, "purge notice self-destruct failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_purges_stay_quiet() {
        assert!(!is_slow_purge(Duration::from_millis(800)));
        assert!(!is_slow_purge(Duration::from_secs(4)));
    }

    #[test]
    fn slow_purges_notify() {
        assert!(is_slow_purge(Duration::from_secs(5)));
        assert!(is_slow_purge(Duration::from_secs(90)));
    }
}
