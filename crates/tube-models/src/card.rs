//! Rich card attached to notification messages.
//!
//! The card is platform-neutral; chat clients translate it into their own
//! embed format.

use serde::{Deserialize, Serialize};

/// Author line of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// A structured rich-content attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub url: String,
    pub description: String,
    pub author: CardAuthor,
    /// Small image shown beside the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Large image shown under the description.
    pub image_url: String,
    /// RGB color of the card accent.
    pub color: u32,
    pub footer: String,
}
