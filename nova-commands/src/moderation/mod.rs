//! Member and channel moderation surface (`/mod …`).

use anyhow::Context as _;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::{
    application::interaction::application_command::CommandData,
    gateway::payload::incoming::InteractionCreate,
};

use crate::member_roles;
use nova_core::{Capability, Context};
use nova_utils::interaction::respond_ephemeral;

pub mod audit;
pub mod ban;
pub mod embeds;
pub mod kick;
pub mod lock;
pub mod purge;
pub mod slowmode;
pub mod timeout;
pub mod unban;
pub mod untimeout;
pub mod warn;

#[derive(CommandModel, CreateCommand)]
#[command(name = "mod", desc = "Handles all moderation aspects.", dm_permission = false)]
pub enum ModCommand {
    #[command(name = "member")]
    Member(MemberCommand),
    #[command(name = "channel")]
    Channel(ChannelCommand),
}

#[derive(CommandModel, CreateCommand)]
#[command(name = "member", desc = "Moderates a member of the server.")]
pub enum MemberCommand {
    #[command(name = "ban")]
    Ban(ban::BanCommand),
    #[command(name = "unban")]
    Unban(unban::UnbanCommand),
    #[command(name = "kick")]
    Kick(kick::KickCommand),
    #[command(name = "warn")]
    Warn(warn::WarnCommand),
    #[command(name = "timeout")]
    Timeout(timeout::TimeoutCommand),
    #[command(name = "untimeout")]
    Untimeout(untimeout::UntimeoutCommand),
}

#[derive(CommandModel, CreateCommand)]
#[command(name = "channel", desc = "Moderates a channel of the server.")]
pub enum ChannelCommand {
    #[command(name = "purge")]
    Purge(purge::PurgeCommand),
    #[command(name = "slowmode")]
    Slowmode(slowmode::SlowmodeCommand),
    #[command(name = "lock")]
    Lock(lock::LockCommand),
    #[command(name = "unlock")]
    Unlock(lock::UnlockCommand),
}

/// Gate on the moderator role, then dispatch to the action handler.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    data: CommandData,
) -> anyhow::Result<()> {
    if interaction.guild_id.is_none() {
        return respond_ephemeral(&ctx.http, interaction, embeds::guild_only_message()).await;
    }

    // One capability test covers every /mod subcommand.
    if !ctx
        .config
        .authorize(member_roles(interaction), Capability::Moderator)
    {
        return respond_ephemeral(&ctx.http, interaction, embeds::not_moderator_message()).await;
    }

    let Some(moderator) = interaction.author().cloned() else {
        return respond_ephemeral(
            &ctx.http,
            interaction,
            ":x: Could not resolve the invoking user.",
        )
        .await;
    };

    let command =
        ModCommand::from_interaction(data.into()).context("failed to parse /mod options")?;

    match command {
        ModCommand::Member(member) => match member {
            MemberCommand::Ban(command) => ban::run(ctx, interaction, &moderator, command).await,
            MemberCommand::Unban(command) => {
                unban::run(ctx, interaction, &moderator, command).await
            }
            MemberCommand::Kick(command) => kick::run(ctx, interaction, &moderator, command).await,
            MemberCommand::Warn(command) => warn::run(ctx, interaction, &moderator, command).await,
            MemberCommand::Timeout(command) => {
                timeout::run(ctx, interaction, &moderator, command).await
            }
            MemberCommand::Untimeout(command) => {
                untimeout::run(ctx, interaction, &moderator, command).await
            }
        },
        ModCommand::Channel(channel) => match channel {
            ChannelCommand::Purge(command) => {
                purge::run(ctx, interaction, &moderator, command).await
            }
            ChannelCommand::Slowmode(command) => slowmode::run(ctx, interaction, command).await,
            ChannelCommand::Lock(command) => lock::run_lock(ctx, interaction, command).await,
            ChannelCommand::Unlock(command) => lock::run_unlock(ctx, interaction, command).await,
        },
    }
}
