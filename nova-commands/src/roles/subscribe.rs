use tracing::error;
use twilight_interactions::command::{CommandModel, CommandOption, CreateCommand, CreateOption};
use twilight_model::{
    gateway::payload::incoming::InteractionCreate,
    id::{Id, marker::RoleMarker},
};

use crate::member_roles;
use nova_core::Context;
use nova_utils::interaction::{defer_ephemeral, update_response};

#[derive(CommandOption, CreateOption)]
pub enum ChangelogScope {
    #[option(name = "Only Main Library Changelogs", value = "main")]
    Main,
    #[option(name = "Only External Library Changelogs", value = "external")]
    External,
    #[option(name = "Both Changelogs", value = "both")]
    Both,
}

#[derive(CommandModel, CreateCommand)]
#[command(
    name = "subscribe",
    desc = "Adds or removes the changelog ping roles, \"subscribing\" you to release news.",
    dm_permission = false
)]
pub struct SubscribeCommand {
    /// To what changelogs do you want to subscribe? (default only main library)
    pub changelog: Option<ChangelogScope>,
}

/// Toggle one role; returns whether the role was added.
async fn toggle_role(
    ctx: &Context,
    user_id: Id<twilight_model::id::marker::UserMarker>,
    held_roles: &[Id<RoleMarker>],
    role: Id<RoleMarker>,
) -> anyhow::Result<bool> {
    if held_roles.contains(&role) {
        ctx.http
            .remove_guild_member_role(ctx.config.guild, user_id, role)
            .await?;
        Ok(false)
    } else {
        ctx.http
            .add_guild_member_role(ctx.config.guild, user_id, role)
            .await?;
        Ok(true)
    }
}

/// Toggle changelog ping roles for the invoker.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    command: SubscribeCommand,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    defer_ephemeral(http, interaction).await?;

    let Some(user_id) = interaction.author_id() else {
        return update_response(http, interaction, ":x: Could not resolve the invoking user.")
            .await;
    };
    let held_roles = member_roles(interaction).to_vec();

    let outcome = match command.changelog.unwrap_or(ChangelogScope::Main) {
        ChangelogScope::Main => {
            match toggle_role(&ctx, user_id, &held_roles, ctx.config.roles.changelog).await {
                Ok(true) => ":heavy_check_mark: Role added.".to_owned(),
                Ok(false) => ":heavy_check_mark: Role removed.".to_owned(),
                Err(source) => {
                    error!(?source, "changelog role toggle failed");
                    ":x: Could not update your roles.".to_owned()
                }
            }
        }
        ChangelogScope::External => {
            match toggle_role(
                &ctx,
                user_id,
                &held_roles,
                ctx.config.roles.external_changelog,
            )
            .await
            {
                Ok(true) => ":heavy_check_mark: Role added.".to_owned(),
                Ok(false) => ":heavy_check_mark: Role removed.".to_owned(),
                Err(source) => {
                    error!(?source, "external changelog role toggle failed");
                    ":x: Could not update your roles.".to_owned()
                }
            }
        }
        ChangelogScope::Both => {
            // Each role toggles independently; report both outcomes.
            let mut response = ":heavy_check_mark: ".to_owned();

            match toggle_role(&ctx, user_id, &held_roles, ctx.config.roles.changelog).await {
                Ok(true) => response.push_str("Changelog pings role added. "),
                Ok(false) => response.push_str("Changelog pings role removed. "),
                Err(source) => {
                    error!(?source, "changelog role toggle failed");
                    response.push_str("Changelog pings role unchanged. ");
                }
            }

            match toggle_role(
                &ctx,
                user_id,
                &held_roles,
                ctx.config.roles.external_changelog,
            )
            .await
            {
                Ok(true) => response.push_str("External changelog pings role added."),
                Ok(false) => response.push_str("External changelog pings role removed."),
                Err(source) => {
                    error!(?source, "external changelog role toggle failed");
                    response.push_str("External changelog pings role unchanged.");
                }
            }

            response
        }
    };

    update_response(http, interaction, &outcome).await
}
