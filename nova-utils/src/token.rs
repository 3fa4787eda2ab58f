//! Stateless correlation token for the help-thread creation modal.
//!
//! The originating message's location is carried inside the modal custom id,
//! so the submission handler can re-fetch it without any server-side state.

use twilight_model::id::{
    Id,
    marker::{ChannelMarker, MessageMarker},
};

const PREFIX: &str = "help_thread_creation_";

/// Location of the message a help thread is being created from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HelpThreadOrigin {
    pub channel_id: Id<ChannelMarker>,
    pub message_id: Id<MessageMarker>,
}

impl HelpThreadOrigin {
    pub fn new(channel_id: Id<ChannelMarker>, message_id: Id<MessageMarker>) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }

    /// Encode the origin into a modal custom id.
    pub fn encode(&self) -> String {
        format!("{PREFIX}{}|{}", self.channel_id.get(), self.message_id.get())
    }

    /// Parse a modal custom id back into an origin.
    ///
    /// Returns `None` for custom ids that do not carry a well-formed token.
    pub fn parse(custom_id: &str) -> Option<Self> {
        let raw = custom_id.strip_prefix(PREFIX)?;
        let (channel_raw, message_raw) = raw.split_once('|')?;

        let channel_id = channel_raw.parse::<u64>().ok().filter(|id| *id != 0)?;
        let message_id = message_raw.parse::<u64>().ok().filter(|id| *id != 0)?;

        Some(Self {
            channel_id: Id::new(channel_id),
            message_id: Id::new(message_id),
        })
    }

    /// Whether a custom id belongs to this token family at all.
    pub fn matches(custom_id: &str) -> bool {
        custom_id.starts_with(PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let origin = HelpThreadOrigin::new(Id::new(996211499364262039), Id::new(1016523907164538951));
        let encoded = origin.encode();

        assert!(HelpThreadOrigin::matches(&encoded));
        assert_eq!(HelpThreadOrigin::parse(&encoded), Some(origin));
    }

    #[test]
    fn wire_format_is_stable() {
        let origin = HelpThreadOrigin::new(Id::new(10), Id::new(20));

        assert_eq!(origin.encode(), "help_thread_creation_10|20");
    }

    #[test]
    fn rejects_foreign_custom_ids() {
        assert_eq!(HelpThreadOrigin::parse("close_thread"), None);
        assert_eq!(HelpThreadOrigin::parse("TAG_SELECTION"), None);
        assert!(!HelpThreadOrigin::matches("language_role"));
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert_eq!(HelpThreadOrigin::parse("help_thread_creation_"), None);
        assert_eq!(HelpThreadOrigin::parse("help_thread_creation_123"), None);
        assert_eq!(HelpThreadOrigin::parse("help_thread_creation_123|"), None);
        assert_eq!(HelpThreadOrigin::parse("help_thread_creation_|456"), None);
        assert_eq!(HelpThreadOrigin::parse("help_thread_creation_a|b"), None);
        assert_eq!(HelpThreadOrigin::parse("help_thread_creation_0|456"), None);
        assert_eq!(HelpThreadOrigin::parse("help_thread_creation_123|456|789"), None);
    }
}
