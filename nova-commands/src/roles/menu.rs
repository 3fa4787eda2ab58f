//! Language role menu: posting the select and handling selections.

use tracing::error;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::{
    application::interaction::message_component::MessageComponentInteractionData,
    channel::message::{
        Component, EmojiReactionType,
        component::{ActionRow, SelectMenu, SelectMenuOption, SelectMenuType},
    },
    gateway::payload::incoming::InteractionCreate,
};

use crate::member_roles;
use nova_core::{Capability, Context, config::LanguageRole};
use nova_utils::interaction::{defer_ephemeral, respond_ephemeral, update_response};

/// Component custom id of the language select menu.
pub const LANGUAGE_ROLE_ID: &str = "language_role";

#[derive(CommandModel, CreateCommand)]
#[command(
    name = "add-role-menu",
    desc = "Posts the language role menu to the information channel.",
    dm_permission = false
)]
pub struct AddRoleMenuCommand;

/// Build the single-select language menu from the configured role table.
pub fn build_language_menu(languages: &[LanguageRole]) -> Component {
    let options = languages
        .iter()
        .map(|language| SelectMenuOption {
            default: false,
            description: None,
            emoji: Some(EmojiReactionType::Unicode {
                name: language.emoji.clone(),
            }),
            label: language.label.clone(),
            value: language.label.clone(),
        })
        .collect();

    Component::ActionRow(ActionRow {
        components: vec![Component::SelectMenu(SelectMenu {
            channel_types: None,
            custom_id: LANGUAGE_ROLE_ID.to_owned(),
            default_values: None,
            disabled: false,
            kind: SelectMenuType::Text,
            max_values: Some(1),
            min_values: Some(1),
            options: Some(options),
            placeholder: Some("Choose a language.".to_owned()),
        })],
    })
}

/// Post the language menu to the information channel.
pub async fn run(ctx: Context, interaction: &InteractionCreate) -> anyhow::Result<()> {
    let http = &ctx.http;

    if !ctx
        .config
        .authorize(member_roles(interaction), Capability::Moderator)
    {
        return respond_ephemeral(http, interaction, ":x: You cannot use this command.").await;
    }

    let menu = build_language_menu(&ctx.config.languages);

    if let Err(source) = http
        .create_message(ctx.config.channels.information)
        .components(&[menu])
        .await
    {
        error!(?source, "role menu post failed");
        return respond_ephemeral(http, interaction, ":x: Could not post the role menu.").await;
    }

    respond_ephemeral(http, interaction, ":heavy_check_mark:").await
}

/// Toggle the selected language role for the invoker.
pub async fn handle_selection(
    ctx: Context,
    interaction: &InteractionCreate,
    data: MessageComponentInteractionData,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    // Always show a loading state; role edits regularly take longer than the
    // client's grace period.
    defer_ephemeral(http, interaction).await?;

    let Some(user_id) = interaction.author_id() else {
        return update_response(http, interaction, ":x: Could not resolve the invoking user.")
            .await;
    };

    let Some(language) = data
        .values
        .first()
        .and_then(|label| ctx.config.language_by_label(label))
    else {
        return update_response(http, interaction, ":x: The role you selected was invalid.").await;
    };

    let result = if member_roles(interaction).contains(&language.role) {
        http.remove_guild_member_role(ctx.config.guild, user_id, language.role)
            .await
            .map(|_| ":heavy_check_mark: Role removed.")
    } else {
        http.add_guild_member_role(ctx.config.guild, user_id, language.role)
            .await
            .map(|_| ":heavy_check_mark: Role added.")
    };

    match result {
        Ok(confirmation) => update_response(http, interaction, confirmation).await,
        Err(source) => {
            error!(?source, "language role toggle failed");
            update_response(http, interaction, ":x: Could not update your roles.").await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages() -> Vec<LanguageRole> {
        vec![
            LanguageRole {
                label: "Deutsch".to_owned(),
                role: twilight_model::id::Id::new(1),
                emoji: "🇩🇪".to_owned(),
            },
            LanguageRole {
                label: "Français".to_owned(),
                role: twilight_model::id::Id::new(2),
                emoji: "🇫🇷".to_owned(),
            },
        ]
    }

    fn menu_of(component: &Component) -> &SelectMenu {
        let Component::ActionRow(row) = component else {
            panic!("expected action row");
        };
        let Component::SelectMenu(menu) = &row.components[0] else {
            panic!("expected select menu");
        };
        menu
    }

    #[test]
    fn menu_is_single_select() {
        let component = build_language_menu(&languages());
        let menu = menu_of(&component);

        assert_eq!(menu.custom_id, LANGUAGE_ROLE_ID);
        assert_eq!(menu.max_values, Some(1));
        assert_eq!(menu.min_values, Some(1));
    }

    #[test]
    fn menu_offers_every_language() {
        let component = build_language_menu(&languages());
        let options = menu_of(&component).options.as_ref().unwrap();

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].label, "Deutsch");
        assert_eq!(options[0].value, "Deutsch");
        assert!(matches!(
            options[0].emoji,
            Some(EmojiReactionType::Unicode { .. })
        ));
    }
}
