//! Embed colors and display helpers shared across handlers.

use twilight_model::{
    id::{Id, marker::UserMarker},
    user::User,
    util::ImageHash,
};

/// Destructive actions (ban, kick, message removal).
pub const COLOR_RED: u32 = 0xED_42_45;
/// Restorative actions (unban, member joined).
pub const COLOR_GREEN: u32 = 0x57_F2_87;
/// Advisory actions (warn, timeout).
pub const COLOR_YELLOW: u32 = 0xFE_E7_5C;
/// Neutral informational embeds.
pub const COLOR_BLURPLE: u32 = 0x58_65_F2;

/// First second of the platform epoch, used for snowflake timestamps.
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Neutralize user/role mentions in untrusted text with a zero-width space.
pub fn sanitize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// Unix seconds at which a snowflake id was created.
pub fn snowflake_created_secs(id: u64) -> u64 {
    ((id >> 22) + DISCORD_EPOCH_MS) / 1000
}

/// CDN avatar URL for a user, falling back to a default avatar.
pub fn avatar_url(user_id: Id<UserMarker>, avatar: Option<ImageHash>) -> String {
    match avatar {
        Some(hash) => format!(
            "https://cdn.discordapp.com/avatars/{}/{}.png?size=128",
            user_id.get(),
            hash
        ),
        None => {
            let default_avatar_index = (user_id.get() >> 22) % 6;
            format!(
                "https://cdn.discordapp.com/embed/avatars/{}.png",
                default_avatar_index
            )
        }
    }
}

/// Author line for a user embed: display name plus handle.
pub fn display_tag(user: &User) -> String {
    match user.global_name.as_deref() {
        Some(global_name) if global_name != user.name => {
            format!("{} ({})", global_name, user.name)
        }
        _ => user.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_breaks_mentions() {
        assert_eq!(sanitize_mentions("hi @everyone"), "hi @\u{200B}everyone");
        assert_eq!(sanitize_mentions("plain"), "plain");
    }

    #[test]
    fn snowflake_timestamp_matches_known_id() {
        // 701347683591389185 was minted 2020-04-19T08:25:18Z.
        assert_eq!(snowflake_created_secs(701347683591389185), 1587284718);
    }

    #[test]
    fn default_avatar_when_hash_missing() {
        let url = avatar_url(Id::new(701347683591389185), None);
        assert!(url.starts_with("https://cdn.discordapp.com/embed/avatars/"));
    }
}
