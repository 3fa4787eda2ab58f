//! Moderation action audit records.
//!
//! Rows are inserted exactly once, immediately after the corresponding
//! platform mutation succeeded, and are never updated or deleted.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::Database;

/// Kind of moderation action taken against a user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionKind {
    Ban,
    Unban,
    Kick,
    Warn,
    Timeout,
    Untimeout,
}

impl ActionKind {
    /// Stable storage identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Unban => "unban",
            Self::Kick => "kick",
            Self::Warn => "warn",
            Self::Timeout => "timeout",
            Self::Untimeout => "untimeout",
        }
    }

    /// Parse a stored identifier back into an action kind.
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "ban" => Some(Self::Ban),
            "unban" => Some(Self::Unban),
            "kick" => Some(Self::Kick),
            "warn" => Some(Self::Warn),
            "timeout" => Some(Self::Timeout),
            "untimeout" => Some(Self::Untimeout),
            _ => None,
        }
    }
}

/// A moderation action about to be recorded.
#[derive(Clone, Debug)]
pub struct NewAction {
    pub user_id: u64,
    pub kind: ActionKind,
    pub moderator_id: u64,
    pub reason: String,
}

/// Insert one action record. At-most-once; the caller does not retry.
pub async fn record_action(db: &Database, action: &NewAction) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO moderation_actions (user_id, kind, moderator_id, created_at, reason) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(action.user_id as i64)
    .bind(action.kind.as_str())
    .bind(action.moderator_id as i64)
    .bind(now_unix_secs() as i64)
    .bind(&action.reason)
    .execute(db.pool())
    .await?;

    Ok(())
}

pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_identifiers_round_trip() {
        let kinds = [
            ActionKind::Ban,
            ActionKind::Unban,
            ActionKind::Kick,
            ActionKind::Warn,
            ActionKind::Timeout,
            ActionKind::Untimeout,
        ];

        for kind in kinds {
            assert_eq!(ActionKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(ActionKind::from_str("mute"), None);
        assert_eq!(ActionKind::from_str(""), None);
        assert_eq!(ActionKind::from_str("BAN"), None);
    }
}
