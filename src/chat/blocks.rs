//! Minimal block-kit subset used by the rendered result pages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText {
        text: String,
        #[serde(default)]
        emoji: bool,
    },
    Mrkdwn {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: TextObject,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { text: TextObject },
    Divider,
    Actions { elements: Vec<Element> },
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header {
            text: TextObject::PlainText {
                text: text.into(),
                emoji: true,
            },
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::Mrkdwn { text: text.into() },
        }
    }

    /// A one-button actions row carrying `value` as its opaque payload.
    pub fn button_row(label: impl Into<String>, value: impl Into<String>) -> Self {
        Block::Actions {
            elements: vec![Element::Button {
                text: TextObject::PlainText {
                    text: label.into(),
                    emoji: true,
                },
                value: value.into(),
                url: None,
            }],
        }
    }

    fn button_value(&self) -> Option<&str> {
        match self {
            Block::Actions { elements } => elements.iter().find_map(|e| match e {
                Element::Button { value, .. } => Some(value.as_str()),
            }),
            _ => None,
        }
    }
}

/// Replacement block list marking one entry as selected: the actions
/// block whose button carries `value` becomes a "Selected" section.
/// Returns `None` when no block carries that payload.
pub fn mark_selected(blocks: &[Block], value: &str) -> Option<Vec<Block>> {
    let position = blocks
        .iter()
        .position(|block| block.button_value() == Some(value))?;

    let mut rewritten = blocks.to_vec();
    rewritten[position] = Block::mrkdwn(":white_check_mark: *Selected*");
    Some(rewritten)
}
