//! Applied-tag edits through the pinned tag select.

use tracing::error;
use twilight_model::{
    application::interaction::message_component::MessageComponentInteractionData,
    gateway::payload::incoming::InteractionCreate,
};

use crate::help::controls::resolve_tag_selection;
use crate::member_roles;
use nova_core::{Capability, Context};
use nova_utils::interaction::{defer_ephemeral, respond_ephemeral, update_response};

/// Replace a help thread's applied tag set from a select payload.
pub async fn handle_selection(
    ctx: Context,
    interaction: &InteractionCreate,
    data: MessageComponentInteractionData,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(thread_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
        return respond_ephemeral(http, interaction, ":x: Could not resolve this thread.").await;
    };

    // Helpers can retag anything; everyone else only their own thread.
    let thread = match http.channel(thread_id).await {
        Ok(response) => response.model().await?,
        Err(source) => {
            error!(?source, "thread fetch failed");
            return respond_ephemeral(http, interaction, ":x: Could not fetch this thread.").await;
        }
    };

    let is_helper = ctx
        .config
        .authorize(member_roles(interaction), Capability::Helper);
    let is_owner = interaction.author_id().is_some() && interaction.author_id() == thread.owner_id;
    if !is_helper && !is_owner {
        return respond_ephemeral(http, interaction, ":x: You are not an advanced user.").await;
    }

    defer_ephemeral(http, interaction).await?;

    let tags = resolve_tag_selection(&data.values);
    if let Err(source) = http
        .update_thread(thread_id)
        .applied_tags(Some(&tags))
        .await
    {
        error!(?source, "applied tag update failed");
        return update_response(http, interaction, ":x: Could not update the tags.").await;
    }

    update_response(http, interaction, ":white_check_mark: Done.").await
}
