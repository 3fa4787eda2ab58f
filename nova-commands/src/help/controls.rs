//! Builders for the pinned control message attached to every help thread.

use twilight_model::{
    channel::forum::ForumTag,
    channel::message::{
        Component, EmojiReactionType,
        component::{ActionRow, Button, ButtonStyle, SelectMenu, SelectMenuOption, SelectMenuType},
    },
    id::{Id, marker::TagMarker},
};

/// Component custom id of the tag select menu.
pub const TAG_SELECTION_ID: &str = "TAG_SELECTION";
/// Component custom id of the close button.
pub const CLOSE_THREAD_ID: &str = "close_thread";
/// Sentinel select value clearing the applied tag set.
pub const REMOVE_ALL_TAGS_VALUE: &str = "remove_all_tags";

fn tag_option(tag: &ForumTag) -> SelectMenuOption {
    let emoji = match (tag.emoji_id, tag.emoji_name.as_deref()) {
        (Some(id), name) => Some(EmojiReactionType::Custom {
            animated: false,
            id,
            name: name.map(ToOwned::to_owned),
        }),
        (None, Some(name)) if !name.is_empty() => Some(EmojiReactionType::Unicode {
            name: name.to_owned(),
        }),
        (None, _) => None,
    };

    SelectMenuOption {
        default: false,
        description: None,
        emoji,
        label: tag.name.clone(),
        value: tag.id.get().to_string(),
    }
}

/// Build the tag select from a forum channel's available tags.
///
/// The sentinel option is always appended last, and the selection ceiling
/// covers every option so a full retag stays a single interaction.
pub fn build_tag_select(tags: &[ForumTag]) -> Component {
    let mut options: Vec<SelectMenuOption> = tags.iter().map(tag_option).collect();
    options.push(SelectMenuOption {
        default: false,
        description: None,
        emoji: Some(EmojiReactionType::Unicode {
            name: "🗑".to_owned(),
        }),
        label: "Remove all tags".to_owned(),
        value: REMOVE_ALL_TAGS_VALUE.to_owned(),
    });

    let option_count = options.len() as u8;

    Component::ActionRow(ActionRow {
        components: vec![Component::SelectMenu(SelectMenu {
            channel_types: None,
            custom_id: TAG_SELECTION_ID.to_owned(),
            default_values: None,
            disabled: false,
            kind: SelectMenuType::Text,
            max_values: Some(option_count),
            min_values: Some(1),
            options: Some(options),
            placeholder: Some("Select the tags you want".to_owned()),
        })],
    })
}

/// Danger button that archives and locks the thread.
pub fn close_button_row() -> Component {
    Component::ActionRow(ActionRow {
        components: vec![Component::Button(Button {
            custom_id: Some(CLOSE_THREAD_ID.to_owned()),
            disabled: false,
            emoji: None,
            label: Some("Close this thread".to_owned()),
            style: ButtonStyle::Danger,
            url: None,
            sku_id: None,
        })],
    })
}

/// Link button back to the message the thread was created from.
pub fn original_message_row(jump_url: &str) -> Component {
    Component::ActionRow(ActionRow {
        components: vec![Component::Button(Button {
            custom_id: None,
            disabled: false,
            emoji: None,
            label: Some("Original message".to_owned()),
            style: ButtonStyle::Link,
            url: Some(jump_url.to_owned()),
            sku_id: None,
        })],
    })
}

/// Resolve a tag selection payload into the applied tag set.
///
/// The sentinel wins over everything else in the same payload.
pub fn resolve_tag_selection(values: &[String]) -> Vec<Id<TagMarker>> {
    if values.iter().any(|value| value == REMOVE_ALL_TAGS_VALUE) {
        return Vec::new();
    }

    values
        .iter()
        .filter_map(|value| value.parse::<u64>().ok())
        .filter(|id| *id != 0)
        .map(Id::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forum_tag(id: u64, name: &str) -> ForumTag {
        ForumTag {
            emoji_id: None,
            emoji_name: None,
            id: Id::new(id),
            moderated: false,
            name: name.to_owned(),
        }
    }

    fn menu_of(component: &Component) -> &SelectMenu {
        let Component::ActionRow(row) = component else {
            panic!("expected action row");
        };
        let Component::SelectMenu(menu) = &row.components[0] else {
            panic!("expected select menu");
        };
        menu
    }

    #[test]
    fn sentinel_is_always_last() {
        let component = build_tag_select(&[forum_tag(1, "bug"), forum_tag(2, "question")]);
        let options = menu_of(&component).options.as_ref().unwrap();

        assert_eq!(options.len(), 3);
        assert_eq!(options.last().unwrap().value, REMOVE_ALL_TAGS_VALUE);
    }

    #[test]
    fn selection_ceiling_covers_every_option() {
        let component = build_tag_select(&[forum_tag(1, "bug")]);
        let menu = menu_of(&component);

        assert_eq!(menu.min_values, Some(1));
        assert_eq!(menu.max_values, Some(2));
    }

    #[test]
    fn sentinel_clears_regardless_of_other_values() {
        let values = vec![
            "996215708595794071".to_owned(),
            REMOVE_ALL_TAGS_VALUE.to_owned(),
            "996215708595794072".to_owned(),
        ];

        assert!(resolve_tag_selection(&values).is_empty());
    }

    #[test]
    fn plain_selection_parses_every_id() {
        let values = vec!["10".to_owned(), "20".to_owned()];
        let tags = resolve_tag_selection(&values);

        assert_eq!(tags, vec![Id::new(10), Id::new(20)]);
    }

    #[test]
    fn malformed_values_are_skipped() {
        let values = vec!["10".to_owned(), "not-a-tag".to_owned(), "0".to_owned()];

        assert_eq!(resolve_tag_selection(&values), vec![Id::new(10)]);
    }
}
