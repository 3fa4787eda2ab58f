//! Closing help threads: the pinned button and the `/archive` command.
//!
//! Archived + locked is terminal; re-closing an already archived thread just
//! re-applies the same state, which the platform accepts.

use tracing::error;
use twilight_http::Client;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::{
    gateway::payload::incoming::InteractionCreate,
    id::{Id, marker::ChannelMarker},
};

use crate::member_roles;
use nova_core::{Capability, Context};
use nova_utils::interaction::{respond_ephemeral, respond_public};

#[derive(CommandModel, CreateCommand)]
#[command(name = "archive", desc = "Archives a help thread.", dm_permission = false)]
pub struct ArchiveCommand;

async fn archive_thread(http: &Client, thread_id: Id<ChannelMarker>) -> anyhow::Result<()> {
    http.update_thread(thread_id)
        .archived(true)
        .locked(true)
        .await?;

    Ok(())
}

/// Close a thread through the pinned button.
pub async fn handle_close_button(
    ctx: Context,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(thread_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
        return respond_ephemeral(http, interaction, ":x: Could not resolve this thread.").await;
    };

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

    // Respond before locking; an archived thread rejects the followup.
    respond_public(
        http,
        interaction,
        ":white_check_mark: Closing. Thank you for using our help system.",
    )
    .await?;

    if let Err(source) = archive_thread(http, thread_id).await {
        error!(?source, "thread close failed");
    }

    Ok(())
}

/// Close a thread through the helpers-only slash command.
pub async fn run_archive(ctx: Context, interaction: &InteractionCreate) -> anyhow::Result<()> {
    let http = &ctx.http;

    if !ctx
        .config
        .authorize(member_roles(interaction), Capability::Helper)
    {
        return respond_ephemeral(http, interaction, ":x: You are not a helper.").await;
    }

    let Some(thread_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
        return respond_ephemeral(http, interaction, ":x: Could not resolve this thread.").await;
    };

    let thread = match http.channel(thread_id).await {
        Ok(response) => response.model().await?,
        Err(source) => {
            error!(?source, "thread fetch failed");
            return respond_ephemeral(http, interaction, ":x: Could not fetch this thread.").await;
        }
    };

    if thread.parent_id != Some(ctx.config.channels.help) {
        return respond_ephemeral(
            http,
            interaction,
            ":x: This command only works in help threads.",
        )
        .await;
    }

    respond_public(http, interaction, ":white_check_mark: Archiving...").await?;

    if let Err(source) = archive_thread(http, thread_id).await {
        error!(?source, "thread archive failed");
    }

    Ok(())
}
