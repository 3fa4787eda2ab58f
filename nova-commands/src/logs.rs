//! Guild activity notifications posted to the mod-log channel.

use twilight_model::{
    channel::message::embed::Embed,
    gateway::payload::incoming::{MemberAdd, MemberRemove, MessageDelete, MessageUpdate},
    user::User,
};
use twilight_util::builder::embed::{
    EmbedAuthorBuilder, EmbedBuilder, EmbedFieldBuilder, ImageSource,
};

use nova_core::Context;
use nova_utils::embed::{
    COLOR_GREEN, COLOR_RED, avatar_url, display_tag, sanitize_mentions,
};

/// Embed fields cap out at 1024 characters.
const FIELD_MAX_CHARS: usize = 1024;

const UNAVAILABLE_CONTENT: &str = "**Message could not be retrieved.**";

fn clip_content(content: &str) -> String {
    if content.is_empty() {
        return UNAVAILABLE_CONTENT.to_owned();
    }

    sanitize_mentions(content)
        .chars()
        .take(FIELD_MAX_CHARS)
        .collect()
}

fn user_embed(title: &str, color: u32, user: &User) -> anyhow::Result<EmbedBuilder> {
    let icon = ImageSource::url(avatar_url(user.id, user.avatar))?;
    let author = EmbedAuthorBuilder::new(display_tag(user))
        .icon_url(icon)
        .build();

    Ok(EmbedBuilder::new().title(title).color(color).author(author))
}

fn member_timestamps(joined_secs: Option<i64>, user: &User) -> String {
    crate::moderation::embeds::timestamps_value(joined_secs, user.id)
}

async fn post(ctx: &Context, embed: Embed) -> anyhow::Result<()> {
    ctx.http
        .create_message(ctx.config.channels.mod_logs)
        .embeds(&[embed])
        .await?;

    Ok(())
}

/// A message disappeared; delete payloads carry no content, only location.
pub async fn message_deleted(ctx: &Context, event: &MessageDelete) -> anyhow::Result<()> {
    if event.guild_id != Some(ctx.config.guild) {
        return Ok(());
    }

    let embed = EmbedBuilder::new()
        .title("Message deleted")
        .color(COLOR_RED)
        .field(
            EmbedFieldBuilder::new("Channel", format!("<#{}>", event.channel_id.get())).inline(),
        )
        .field(EmbedFieldBuilder::new("Message", UNAVAILABLE_CONTENT))
        .validate()?
        .build();

    post(ctx, embed).await
}

/// A message was edited; the gateway hands us the full new revision.
pub async fn message_updated(ctx: &Context, message: &MessageUpdate) -> anyhow::Result<()> {
    if message.guild_id != Some(ctx.config.guild) || message.author.bot {
        return Ok(());
    }

    let embed = user_embed("Message updated", COLOR_RED, &message.author)?
        .field(
            EmbedFieldBuilder::new("ID", message.author.id.get().to_string()).inline(),
        )
        .field(EmbedFieldBuilder::new(
            "After:",
            clip_content(&message.content),
        ))
        .validate()?
        .build();

    post(ctx, embed).await
}

pub async fn member_joined(ctx: &Context, event: &MemberAdd) -> anyhow::Result<()> {
    if event.guild_id != ctx.config.guild {
        return Ok(());
    }

    let user = &event.member.user;
    let joined_secs = event.member.joined_at.map(|joined| joined.as_secs());

    let embed = user_embed("User joined", COLOR_GREEN, user)?
        .field(EmbedFieldBuilder::new("ID", user.id.get().to_string()))
        .field(EmbedFieldBuilder::new(
            "Timestamps",
            member_timestamps(joined_secs, user),
        ))
        .validate()?
        .build();

    post(ctx, embed).await
}

pub async fn member_left(ctx: &Context, event: &MemberRemove) -> anyhow::Result<()> {
    if event.guild_id != ctx.config.guild {
        return Ok(());
    }

    let embed = user_embed("User left", COLOR_RED, &event.user)?
        .field(EmbedFieldBuilder::new("ID", event.user.id.get().to_string()))
        .field(EmbedFieldBuilder::new(
            "Timestamps",
            member_timestamps(None, &event.user),
        ))
        .validate()?
        .build();

    post(ctx, embed).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_gets_a_placeholder() {
        assert_eq!(clip_content(""), UNAVAILABLE_CONTENT);
    }

    #[test]
    fn long_content_is_clipped_to_field_limit() {
        let long = "a".repeat(3000);
        assert_eq!(clip_content(&long).chars().count(), FIELD_MAX_CHARS);
    }

    #[test]
    fn content_mentions_are_sanitized() {
        assert_eq!(clip_content("hi @everyone"), "hi @\u{200B}everyone");
    }
}
