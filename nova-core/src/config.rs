//! Immutable guild configuration.
//!
//! All guild, channel, and role identifiers the bot operates on live in a
//! single TOML file read once at startup. The parsed value is shared through
//! [`crate::Context`] and never mutated afterwards.

use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, GuildMarker, RoleMarker, TagMarker},
};

/// Capabilities a member can hold, backed by role membership.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Capability {
    Moderator,
    Helper,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GuildConfig {
    pub guild: Id<GuildMarker>,
    pub channels: Channels,
    pub roles: Roles,
    pub help: Help,
    /// Self-assignable language roles offered through the role menu.
    pub languages: Vec<LanguageRole>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Channels {
    /// Forum channel whose posts are help threads.
    pub help: Id<ChannelMarker>,
    /// Destination for moderation action notifications.
    pub action_logs: Id<ChannelMarker>,
    /// Destination for guild activity notifications.
    pub mod_logs: Id<ChannelMarker>,
    pub staff: Id<ChannelMarker>,
    /// Channel the role menu is posted to.
    pub information: Id<ChannelMarker>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Roles {
    pub moderator: Id<RoleMarker>,
    pub helper: Id<RoleMarker>,
    pub changelog: Id<RoleMarker>,
    pub external_changelog: Id<RoleMarker>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Help {
    /// Tag applied to newly created help threads.
    pub default_tag: Id<TagMarker>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LanguageRole {
    /// Display label, also the select option value.
    pub label: String,
    pub role: Id<RoleMarker>,
    /// Unicode emoji shown next to the option.
    pub emoji: String,
}

impl GuildConfig {
    /// Load and parse the configuration file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("could not read configuration at `{}`", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("could not parse configuration at `{}`", path.display()))
    }

    /// Check whether a member's role set grants a capability.
    ///
    /// The moderator role satisfies every capability; the helper role only
    /// satisfies [`Capability::Helper`].
    pub fn authorize(&self, member_roles: &[Id<RoleMarker>], capability: Capability) -> bool {
        let is_moderator = member_roles.contains(&self.roles.moderator);

        match capability {
            Capability::Moderator => is_moderator,
            Capability::Helper => is_moderator || member_roles.contains(&self.roles.helper),
        }
    }

    /// Look up a self-assignable language role by its option label.
    pub fn language_by_label(&self, label: &str) -> Option<&LanguageRole> {
        self.languages.iter().find(|lang| lang.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
guild = 701347683591389185

[channels]
help = 996211499364262039
action_logs = 789041087149636929
mod_logs = 789041087149636930
staff = 763621040084271165
information = 827317661819402260

[roles]
moderator = 698246900558921768
helper = 818861272484806656
changelog = 789773555792740353
external_changelog = 888894497402462258

[help]
default_tag = 996215708595794071

[[languages]]
label = "Deutsch"
role = 866023445551644675
emoji = "🇩🇪"

[[languages]]
label = "Français"
role = 866023777659785216
emoji = "🇫🇷"
"#;

    fn sample() -> GuildConfig {
        toml::from_str(SAMPLE).expect("sample config parses")
    }

    #[test]
    fn parses_sample_config() {
        let config = sample();

        assert_eq!(config.guild.get(), 701347683591389185);
        assert_eq!(config.channels.help.get(), 996211499364262039);
        assert_eq!(config.languages.len(), 2);
        assert_eq!(config.languages[0].label, "Deutsch");
    }

    #[test]
    fn moderator_satisfies_helper() {
        let config = sample();
        let roles = [config.roles.moderator];

        assert!(config.authorize(&roles, Capability::Moderator));
        assert!(config.authorize(&roles, Capability::Helper));
    }

    #[test]
    fn helper_is_not_moderator() {
        let config = sample();
        let roles = [config.roles.helper];

        assert!(config.authorize(&roles, Capability::Helper));
        assert!(!config.authorize(&roles, Capability::Moderator));
    }

    #[test]
    fn no_roles_no_capabilities() {
        let config = sample();

        assert!(!config.authorize(&[], Capability::Helper));
        assert!(!config.authorize(&[], Capability::Moderator));
    }

    #[test]
    fn language_lookup_is_exact() {
        let config = sample();

        assert!(config.language_by_label("Deutsch").is_some());
        assert!(config.language_by_label("deutsch").is_none());
        assert!(config.language_by_label("Latin").is_none());
    }
}
