//! Notification embed builders and shared messages for moderation handlers.

use twilight_model::{
    channel::message::embed::Embed,
    id::{Id, marker::UserMarker},
    user::User,
};
use twilight_util::builder::embed::{
    EmbedAuthorBuilder, EmbedBuilder, EmbedFieldBuilder, ImageSource,
};

use nova_utils::embed::{avatar_url, display_tag, sanitize_mentions, snowflake_created_secs};

/// Build an action notification embed for the action-log channel.
///
/// `timestamps` is the pre-rendered joined/created field value; member
/// actions without member data (e.g. unban of a departed user) omit it.
pub fn member_action_embed(
    title: &str,
    color: u32,
    target: &User,
    moderator: &User,
    reason: &str,
    timestamps: Option<&str>,
) -> anyhow::Result<Embed> {
    let icon = ImageSource::url(avatar_url(target.id, target.avatar))?;
    let author = EmbedAuthorBuilder::new(display_tag(target))
        .icon_url(icon)
        .build();

    let moderator_value = format!("<@{}> ({})", moderator.id.get(), moderator.name);

    let mut builder = EmbedBuilder::new()
        .title(title)
        .color(color)
        .author(author)
        .field(EmbedFieldBuilder::new("Moderator", moderator_value).inline());

    if let Some(timestamps) = timestamps {
        builder = builder.field(EmbedFieldBuilder::new("Timestamps", timestamps));
    }

    let builder = builder.field(EmbedFieldBuilder::new(
        "Reason",
        sanitize_mentions(reason),
    ));

    Ok(builder.validate()?.build())
}

/// Render the joined/created timestamps field for a guild member.
pub fn timestamps_value(joined_secs: Option<i64>, user_id: Id<UserMarker>) -> String {
    let created_secs = snowflake_created_secs(user_id.get());

    match joined_secs {
        Some(joined) => format!("Joined: <t:{joined}:R>.\nCreated: <t:{created_secs}:R>."),
        None => format!("Created: <t:{created_secs}:R>."),
    }
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn not_moderator_message() -> &'static str {
    ":x: You are not a moderator."
}

pub fn platform_failure_message(action: &str, user_id: Id<UserMarker>) -> String {
    format!(":x: Could not {action} <@{}>.", user_id.get())
}

pub fn action_confirmation(user_id: Id<UserMarker>, action_past_tense: &str) -> String {
    format!(
        ":heavy_check_mark: <@{}> has been {action_past_tense}.",
        user_id.get()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_value_omits_missing_join_date() {
        let user_id = Id::new(701347683591389185);

        let with_join = timestamps_value(Some(1650000000), user_id);
        assert!(with_join.contains("Joined: <t:1650000000:R>."));
        assert!(with_join.contains("Created: <t:1587284718:R>."));

        let without_join = timestamps_value(None, user_id);
        assert!(!without_join.contains("Joined"));
        assert!(without_join.contains("Created: <t:1587284718:R>."));
    }
}
