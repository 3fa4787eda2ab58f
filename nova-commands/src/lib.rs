//! Interaction and gateway event handlers plus the routing glue.

pub mod help;
/// Guild activity notifications.
pub mod logs;
pub mod moderation;
pub mod roles;
pub mod utility;

use anyhow::Context as _;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::{
    application::command::{Command, CommandType},
    application::interaction::{
        InteractionData, application_command::CommandData,
        message_component::MessageComponentInteractionData, modal::ModalInteractionData,
    },
    gateway::payload::incoming::InteractionCreate,
    id::{Id, marker::RoleMarker},
};
use twilight_util::builder::command::CommandBuilder;

use nova_core::Context;
use nova_utils::token::HelpThreadOrigin;

/// Roles held by the interaction's invoker; empty outside guild contexts.
pub(crate) fn member_roles(interaction: &InteractionCreate) -> &[Id<RoleMarker>] {
    interaction
        .member
        .as_ref()
        .map(|member| member.roles.as_slice())
        .unwrap_or(&[])
}

/// Every guild command registered at startup.
pub fn guild_commands() -> Vec<Command> {
    vec![
        moderation::ModCommand::create_command().into(),
        roles::subscribe::SubscribeCommand::create_command().into(),
        roles::menu::AddRoleMenuCommand::create_command().into(),
        utility::letmegooglethat::LetmegooglethatCommand::create_command().into(),
        help::close::ArchiveCommand::create_command().into(),
        CommandBuilder::new(help::CREATE_HELP_THREAD, "", CommandType::Message).build(),
    ]
}

/// Dispatch one incoming interaction to its handler.
pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    match interaction.data.clone() {
        Some(InteractionData::ApplicationCommand(data)) => {
            handle_command(ctx, &interaction, *data).await
        }
        Some(InteractionData::MessageComponent(data)) => {
            handle_component(ctx, &interaction, *data).await
        }
        Some(InteractionData::ModalSubmit(data)) => handle_modal(ctx, &interaction, data).await,
        _ => Ok(()),
    }
}

async fn handle_command(
    ctx: Context,
    interaction: &InteractionCreate,
    data: CommandData,
) -> anyhow::Result<()> {
    match data.name.as_str() {
        "mod" => moderation::run(ctx, interaction, data).await,
        "subscribe" => {
            let command = roles::subscribe::SubscribeCommand::from_interaction(data.into())
                .context("failed to parse /subscribe options")?;
            roles::subscribe::run(ctx, interaction, command).await
        }
        "add-role-menu" => roles::menu::run(ctx, interaction).await,
        "letmegooglethat" => {
            let command =
                utility::letmegooglethat::LetmegooglethatCommand::from_interaction(data.into())
                    .context("failed to parse /letmegooglethat options")?;
            utility::letmegooglethat::run(ctx, interaction, command).await
        }
        "archive" => help::close::run_archive(ctx, interaction).await,
        help::CREATE_HELP_THREAD => help::context_menu::run(ctx, interaction, data).await,
        _ => Ok(()),
    }
}

async fn handle_component(
    ctx: Context,
    interaction: &InteractionCreate,
    data: MessageComponentInteractionData,
) -> anyhow::Result<()> {
    match data.custom_id.as_str() {
        help::controls::TAG_SELECTION_ID => help::tags::handle_selection(ctx, interaction, data).await,
        help::controls::CLOSE_THREAD_ID => help::close::handle_close_button(ctx, interaction).await,
        roles::menu::LANGUAGE_ROLE_ID => roles::menu::handle_selection(ctx, interaction, data).await,
        _ => Ok(()),
    }
}

async fn handle_modal(
    ctx: Context,
    interaction: &InteractionCreate,
    data: ModalInteractionData,
) -> anyhow::Result<()> {
    if HelpThreadOrigin::matches(&data.custom_id) {
        return help::thread::handle_submission(ctx, interaction, data).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_surface_is_registered() {
        let commands = guild_commands();
        let names: Vec<&str> = commands.iter().map(|command| command.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "mod",
                "subscribe",
                "add-role-menu",
                "letmegooglethat",
                "archive",
                help::CREATE_HELP_THREAD,
            ]
        );
    }

    #[test]
    fn context_menu_is_a_message_command() {
        let commands = guild_commands();
        let menu = commands
            .iter()
            .find(|command| command.name == help::CREATE_HELP_THREAD)
            .unwrap();

        assert_eq!(menu.kind, CommandType::Message);
    }
}
