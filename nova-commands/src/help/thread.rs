//! Help thread creation.
//!
//! Two entry points produce the same control surface: a modal submission
//! copies a flagged message into a fresh forum post, and a gateway
//! `ThreadCreate` for posts made by hand attaches the controls in place.

use tracing::{error, warn};
use twilight_model::{
    application::interaction::modal::ModalInteractionData,
    channel::{Attachment, Channel, Message},
    channel::message::{Component, embed::Embed},
    channel::thread::AutoArchiveDuration,
    gateway::payload::incoming::InteractionCreate,
    http::attachment::Attachment as UploadAttachment,
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, MessageMarker},
    },
};
use twilight_util::builder::embed::{EmbedBuilder, EmbedFooterBuilder};

use crate::help::controls::{build_tag_select, close_button_row, original_message_row};
use nova_core::Context;
use nova_utils::embed::COLOR_BLURPLE;
use nova_utils::interaction::{defer_ephemeral, update_response};
use nova_utils::token::HelpThreadOrigin;

/// Attachments above this size are not copied into the thread.
pub const MAX_ATTACHMENT_BYTES: u64 = 8 * 1024 * 1024;

/// Split attachments into copyable ones and an oversize count.
pub fn partition_attachments(attachments: &[Attachment]) -> (Vec<&Attachment>, usize) {
    let (kept, dropped): (Vec<&Attachment>, Vec<&Attachment>) = attachments
        .iter()
        .partition(|attachment| attachment.size <= MAX_ATTACHMENT_BYTES);

    (kept, dropped.len())
}

/// Find a submitted text-input value by custom id.
pub fn modal_value<'a>(data: &'a ModalInteractionData, custom_id: &str) -> Option<&'a str> {
    data.components
        .iter()
        .flat_map(|row| row.components.iter())
        .find(|component| component.custom_id == custom_id)
        .and_then(|component| component.value.as_deref())
        .filter(|value| !value.is_empty())
}

fn jump_url(
    guild_id: Id<GuildMarker>,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id.get(),
        channel_id.get(),
        message_id.get()
    )
}

async fn download(web: &reqwest::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let response = web.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Copy the origin message's attachments, skipping oversize and failed ones.
async fn copy_attachments(ctx: &Context, message: &Message) -> Vec<UploadAttachment> {
    let (kept, dropped) = partition_attachments(&message.attachments);
    if dropped > 0 {
        warn!(dropped, "skipping oversize attachments");
    }

    let mut uploads = Vec::with_capacity(kept.len());
    for attachment in kept {
        match download(&ctx.web, &attachment.proxy_url).await {
            Ok(bytes) => uploads.push(UploadAttachment::from_bytes(
                attachment.filename.clone(),
                bytes,
                uploads.len() as u64,
            )),
            Err(source) => {
                error!(?source, filename = %attachment.filename, "attachment download failed");
            }
        }
    }

    uploads
}

fn extra_content_embed(extra: &str) -> anyhow::Result<Embed> {
    let footer =
        EmbedFooterBuilder::new("Please create a thread in the help channel to ask questions!")
            .build();

    Ok(EmbedBuilder::new()
        .title("Additional Information")
        .description(extra)
        .color(COLOR_BLURPLE)
        .footer(footer)
        .validate()?
        .build())
}

/// Tag select + close button, built from the help channel's current tags.
async fn control_components(ctx: &Context) -> Vec<Component> {
    let tags = match ctx.http.channel(ctx.config.channels.help).await {
        Ok(response) => match response.model().await {
            Ok(channel) => channel.available_tags.unwrap_or_default(),
            Err(source) => {
                error!(?source, "help channel decode failed");
                Vec::new()
            }
        },
        Err(source) => {
            error!(?source, "help channel fetch failed");
            Vec::new()
        }
    };

    vec![build_tag_select(&tags), close_button_row()]
}

/// Create a help thread from a submitted creation modal.
pub async fn handle_submission(
    ctx: Context,
    interaction: &InteractionCreate,
    data: ModalInteractionData,
) -> anyhow::Result<()> {
    let http = &ctx.http;

    let Some(origin) = HelpThreadOrigin::parse(&data.custom_id) else {
        return Ok(());
    };
    let Some(invoker_id) = interaction.author_id() else {
        return Ok(());
    };

    defer_ephemeral(http, interaction).await?;

    let Some(name) = modal_value(&data, "help_thread_name") else {
        return update_response(http, interaction, ":x: The thread needs a name.").await;
    };
    let Some(content) = modal_value(&data, "edit_content") else {
        return update_response(http, interaction, ":x: The thread needs a question.").await;
    };

    // Both origin lookups must succeed before anything is mutated.
    if let Err(source) = http.channel(origin.channel_id).await {
        error!(?source, "origin channel fetch failed");
        return update_response(http, interaction, ":x: Could not find channel of message.").await;
    }
    let message = match http.message(origin.channel_id, origin.message_id).await {
        Ok(response) => response.model().await?,
        Err(source) => {
            error!(?source, "origin message fetch failed");
            return update_response(http, interaction, ":x: Could not fetch message.").await;
        }
    };

    let uploads = copy_attachments(&ctx, &message).await;

    let forum = match http
        .create_forum_thread(ctx.config.channels.help, name)
        .auto_archive_duration(AutoArchiveDuration::Day)
        .applied_tags(&[ctx.config.help.default_tag])
        .message()
        .content(content)
        .attachments(&uploads)
        .await
    {
        Ok(response) => response.model().await?,
        Err(source) => {
            error!(?source, "help thread creation failed");
            return update_response(http, interaction, ":x: Could not create the help thread.")
                .await;
        }
    };
    let thread_id = forum.channel.id;

    // Membership and controls are best-effort once the thread exists.
    if let Err(source) = http.add_thread_member(thread_id, invoker_id).await {
        error!(?source, "could not add invoker to thread");
    }
    if let Err(source) = http.add_thread_member(thread_id, message.author.id).await {
        error!(?source, "could not add author to thread");
    }

    let mut components = vec![original_message_row(&jump_url(
        ctx.config.guild,
        origin.channel_id,
        origin.message_id,
    ))];
    components.extend(control_components(&ctx).await);

    let embeds: Vec<Embed> = match modal_value(&data, "extra_content") {
        Some(extra) => vec![extra_content_embed(extra)?],
        None => Vec::new(),
    };

    let control_message = http
        .create_message(thread_id)
        .content(
            "This help thread was automatically generated. Read the message above for more \
             information.",
        )
        .embeds(&embeds)
        .components(&components)
        .await?
        .model()
        .await?;

    if let Err(source) = http.create_pin(thread_id, control_message.id).await {
        error!(?source, "could not pin control message");
    }

    let redirect = format!(
        "Hey, <@{}>! At this time, we only help with support-related questions in our help \
         channel. Please redirect to <#{}> in order to receive help.",
        message.author.id.get(),
        thread_id.get()
    );
    if let Err(source) = http
        .create_message(origin.channel_id)
        .reply(origin.message_id)
        .content(&redirect)
        .await
    {
        error!(?source, "redirect notice failed");
    }

    update_response(http, interaction, ":white_check_mark: Thread created.").await
}

/// Attach controls to a help thread someone opened by hand.
pub async fn handle_thread_create(ctx: Context, thread: &Channel) -> anyhow::Result<()> {
    if thread.parent_id != Some(ctx.config.channels.help) {
        return Ok(());
    }

    // Threads this bot just created already carry their controls.
    if thread.owner_id == Some(ctx.bot_user_id) {
        return Ok(());
    }

    let components = control_components(&ctx).await;
    let message = ctx
        .http
        .create_message(thread.id)
        .content("Hey! Once your issue is solved, press the button below to close this thread!")
        .components(&components)
        .await?
        .model()
        .await?;

    if let Err(source) = ctx.http.create_pin(thread.id, message.id).await {
        error!(?source, "could not pin control message");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilight_model::application::interaction::modal::{
        ModalInteractionDataActionRow, ModalInteractionDataComponent,
    };
    use twilight_model::channel::message::component::ComponentType;

    fn attachment(id: u64, filename: &str, size: u64) -> Attachment {
        Attachment {
            content_type: None,
            description: None,
            duration_secs: None,
            ephemeral: false,
            filename: filename.to_owned(),
            flags: None,
            height: None,
            id: Id::new(id),
            proxy_url: format!("https://media.example/{filename}"),
            size,
            title: None,
            url: format!("https://cdn.example/{filename}"),
            waveform: None,
            width: None,
        }
    }

    fn modal_data(fields: &[(&str, Option<&str>)]) -> ModalInteractionData {
        ModalInteractionData {
            custom_id: "help_thread_creation_1|2".to_owned(),
            components: fields
                .iter()
                .map(|(custom_id, value)| ModalInteractionDataActionRow {
                    components: vec![ModalInteractionDataComponent {
                        custom_id: (*custom_id).to_owned(),
                        kind: ComponentType::TextInput,
                        value: value.map(ToOwned::to_owned),
                    }],
                })
                .collect(),
        }
    }

    #[test]
    fn oversize_attachments_are_dropped() {
        let attachments = vec![
            attachment(1, "small.png", 1024),
            attachment(2, "big.bin", MAX_ATTACHMENT_BYTES + 1),
            attachment(3, "edge.log", MAX_ATTACHMENT_BYTES),
        ];

        let (kept, dropped) = partition_attachments(&attachments);

        assert_eq!(dropped, 1);
        let names: Vec<&str> = kept.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["small.png", "edge.log"]);
    }

    #[test]
    fn modal_value_finds_fields_across_rows() {
        let data = modal_data(&[
            ("help_thread_name", Some("Q")),
            ("edit_content", Some("help?")),
            ("extra_content", None),
        ]);

        assert_eq!(modal_value(&data, "help_thread_name"), Some("Q"));
        assert_eq!(modal_value(&data, "edit_content"), Some("help?"));
        assert_eq!(modal_value(&data, "extra_content"), None);
        assert_eq!(modal_value(&data, "missing"), None);
    }

    #[test]
    fn empty_values_count_as_absent() {
        let data = modal_data(&[("extra_content", Some(""))]);

        assert_eq!(modal_value(&data, "extra_content"), None);
    }
}
