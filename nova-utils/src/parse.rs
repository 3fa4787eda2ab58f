use twilight_model::id::{Id, marker::UserMarker};

/// Parse a user from a raw argument (`<@id>`, `<@!id>`, or a plain ID).
pub fn parse_user_id(raw: &str) -> Option<Id<UserMarker>> {
    let trimmed = raw.trim();

    let numeric = if trimmed.starts_with("<@") && trimmed.ends_with('>') {
        let without_wrappers = trimmed.strip_prefix("<@")?.strip_suffix('>')?;
        without_wrappers
            .strip_prefix('!')
            .unwrap_or(without_wrappers)
    } else {
        trimmed
    };

    let id = numeric.parse::<u64>().ok().filter(|id| *id != 0)?;

    Some(Id::new(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_mention_forms() {
        let expected = Some(Id::new(242351388137488384));

        assert_eq!(parse_user_id("242351388137488384"), expected);
        assert_eq!(parse_user_id("<@242351388137488384>"), expected);
        assert_eq!(parse_user_id("<@!242351388137488384>"), expected);
        assert_eq!(parse_user_id("  242351388137488384 "), expected);
    }

    #[test]
    fn rejects_non_ids() {
        assert_eq!(parse_user_id(""), None);
        assert_eq!(parse_user_id("someone"), None);
        assert_eq!(parse_user_id("<@>"), None);
        assert_eq!(parse_user_id("0"), None);
    }
}
