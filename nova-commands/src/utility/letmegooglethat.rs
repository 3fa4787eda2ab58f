use tracing::error;
use twilight_interactions::command::{CommandModel, CreateCommand};
use twilight_model::gateway::payload::incoming::InteractionCreate;

use crate::member_roles;
use nova_core::{Capability, Context};
use nova_utils::interaction::respond_ephemeral;

#[derive(CommandModel, CreateCommand)]
#[command(
    name = "letmegooglethat",
    desc = "Posts a pointed search link for a question.",
    dm_permission = false
)]
pub struct LetmegooglethatCommand {
    /// The thing to look for.
    pub param: String,
}

/// Build the search link with a form-encoded query.
pub fn google_link(query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("<https://letmegooglethat.com/?q={encoded}>")
}

/// Post a search link to the invoking channel.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    command: LetmegooglethatCommand,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    if !ctx
        .config
        .authorize(member_roles(interaction), Capability::Helper)
    {
        return respond_ephemeral(http, interaction, ":x: You are not a helper.").await;
    }

    let Some(channel_id) = interaction.channel.as_ref().map(|channel| channel.id) else {
        return respond_ephemeral(http, interaction, ":x: Could not resolve this channel.").await;
    };

    respond_ephemeral(http, interaction, "collecting Google things...").await?;

    let link = google_link(&command.param);
    if let Err(source) = http.create_message(channel_id).content(&link).await {
        error!(?source, "search link post failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_plus() {
        assert_eq!(
            google_link("rust borrow checker"),
            "<https://letmegooglethat.com/?q=rust+borrow+checker>"
        );
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(
            google_link("a&b=c"),
            "<https://letmegooglethat.com/?q=a%26b%3Dc>"
        );
    }
}
