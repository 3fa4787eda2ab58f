//! "Create Help Thread" message context menu.
//!
//! The response is a modal pre-filled from the flagged message; the origin
//! message's location rides along in the modal custom id.

use twilight_model::{
    application::interaction::application_command::CommandData,
    channel::Message,
    channel::message::{
        Component,
        component::{ActionRow, TextInput, TextInputStyle},
    },
    gateway::payload::incoming::InteractionCreate,
};

use crate::help::CREATE_HELP_THREAD;
use nova_core::Context;
use nova_utils::interaction::{respond_ephemeral, respond_modal};
use nova_utils::token::HelpThreadOrigin;

const TITLE_MAX_CHARS: usize = 100;
const CONTENT_MAX_CHARS: usize = 4000;

/// Suggested thread title for a flagged message.
pub fn suggested_title(author_name: &str) -> String {
    clip(&format!("[AUTO] Help thread for {author_name}"), TITLE_MAX_CHARS)
}

fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn short_input(custom_id: &str, label: &str, value: Option<String>) -> Component {
    text_input(custom_id, label, value, TextInputStyle::Short, 100, true)
}

fn paragraph_input(
    custom_id: &str,
    label: &str,
    value: Option<String>,
    max_length: u16,
    required: bool,
) -> Component {
    text_input(
        custom_id,
        label,
        value,
        TextInputStyle::Paragraph,
        max_length,
        required,
    )
}

#[allow(deprecated)]
fn text_input(
    custom_id: &str,
    label: &str,
    value: Option<String>,
    style: TextInputStyle,
    max_length: u16,
    required: bool,
) -> Component {
    Component::ActionRow(ActionRow {
        components: vec![Component::TextInput(TextInput {
            custom_id: custom_id.to_owned(),
            label: label.to_owned(),
            max_length: Some(max_length),
            min_length: Some(1),
            placeholder: None,
            required: Some(required),
            style,
            value,
        })],
    })
}

/// Modal body for creating a help thread from a message.
pub fn creation_modal_components(message: &Message) -> Vec<Component> {
    let content = (!message.content.is_empty())
        .then(|| clip(&message.content, CONTENT_MAX_CHARS));

    vec![
        short_input(
            "help_thread_name",
            "What should the thread be named?",
            Some(suggested_title(&message.author.name)),
        ),
        paragraph_input(
            "edit_content",
            "What should the question be?",
            content,
            4000,
            true,
        ),
        paragraph_input("extra_content", "Any additional information?", None, 1024, false),
    ]
}

/// Open the creation modal for the targeted message.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    data: CommandData,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let message = data.target_id.and_then(|target_id| {
        data.resolved
            .as_ref()
            .and_then(|resolved| resolved.messages.get(&target_id.cast()))
    });
    let Some(message) = message else {
        return respond_ephemeral(
            http,
            interaction,
            ":x: Could not resolve the selected message.",
        )
        .await;
    };

    let origin = HelpThreadOrigin::new(message.channel_id, message.id);
    let components = creation_modal_components(message);

    respond_modal(
        http,
        interaction,
        &origin.encode(),
        CREATE_HELP_THREAD,
        components,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggested_title_keeps_short_names() {
        assert_eq!(
            suggested_title("astro"),
            "[AUTO] Help thread for astro"
        );
    }

    #[test]
    fn suggested_title_respects_the_length_ceiling() {
        let long_name = "x".repeat(200);
        let title = suggested_title(&long_name);

        assert_eq!(title.chars().count(), TITLE_MAX_CHARS);
        assert!(title.starts_with("[AUTO] Help thread for "));
    }

    #[test]
    fn clip_is_character_aware() {
        assert_eq!(clip("héllo", 2), "hé");
        assert_eq!(clip("abc", 10), "abc");
    }
}
