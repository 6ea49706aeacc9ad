//! Notification rendering.
//!
//! Message text comes from four fixed templates keyed by
//! (classification, mode). Placeholders are filled in a single pass, so
//! braces inside a video title are never re-expanded.

use chrono::{DateTime, Local, TimeZone};
use tube_models::{Card, CardAuthor, VideoKind, VideoSummary};

/// Card accent color.
pub const CARD_COLOR: u32 = 0xFF0000;

/// Max characters of description shown on a card.
const DESCRIPTION_LIMIT: usize = 200;

/// Description lines shown on a card.
const DESCRIPTION_LINES: usize = 2;

const NO_DESCRIPTION: &str = "Nessuna descrizione disponibile";

/// Whether a notification is a real announcement or an operator test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyMode {
    Live,
    Test,
}

const LONG_LIVE: &str = "{role} **Hey!**
:clapper: C'è un nuovo Video su {channel}

Titolo: **\"{title}\"**
Vallo a vedere **ORA!**

{url}";

const SHORT_LIVE: &str = "{role} **Hey!**
:mobile_phone: C'è un nuovo Short su {channel}

Titolo: **\"{title}\"**
Vallo a vedere **ORA!**

{url}";

const LONG_TEST: &str = "{role} **Hey!**
:clapper: C'è un nuovo Video su {channel}

Titolo: **\"{title}\"**
Vallo a vedere **ORA!**

{url}

🧪 **TEST MODE**";

const SHORT_TEST: &str = "{role} **Hey!**
:mobile_phone: C'è un nuovo Short su {channel}

Titolo: **\"{title}\"**
Vallo a vedere **ORA!**

{url}

🧪 **TEST MODE**";

/// Returns the raw template for a classification and mode.
pub fn template(kind: VideoKind, mode: NotifyMode) -> &'static str {
    match (kind, mode) {
        (VideoKind::Long, NotifyMode::Live) => LONG_LIVE,
        (VideoKind::Short, NotifyMode::Live) => SHORT_LIVE,
        (VideoKind::Long, NotifyMode::Test) => LONG_TEST,
        (VideoKind::Short, NotifyMode::Test) => SHORT_TEST,
    }
}

/// Renders the message text for `video`.
///
/// `role_mention` is the platform token for the role matching the video's
/// classification.
pub fn render_text(video: &VideoSummary, role_mention: &str, mode: NotifyMode) -> String {
    fill(
        template(video.kind(), mode),
        &[
            ("role", role_mention),
            ("channel", video.channel_title.as_str()),
            ("title", video.title.as_str()),
            ("url", video.url.as_str()),
        ],
    )
}

/// Substitutes `{name}` placeholders in one pass. Unknown names are kept.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 128);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match values.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// First two description lines, capped at 200 characters.
pub fn short_description(description: &str) -> String {
    let head = description
        .split('\n')
        .take(DESCRIPTION_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    if head.trim().is_empty() {
        return NO_DESCRIPTION.to_string();
    }

    if head.chars().count() > DESCRIPTION_LIMIT {
        let cut: String = head.chars().take(DESCRIPTION_LIMIT).collect();
        format!("{}...", cut)
    } else {
        head
    }
}

/// Formats a timestamp as `dd/mm/yyyy HH:MM` in the given zone.
pub fn format_publish_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%d/%m/%Y %H:%M").to_string()
}

/// Builds the card for `video`, dating the footer in server-local time.
pub fn build_card(video: &VideoSummary, footer_brand: &str) -> Card {
    let local = video.published_at.with_timezone(&Local);
    build_card_at(video, footer_brand, &format_publish_date(&local))
}

fn build_card_at(video: &VideoSummary, footer_brand: &str, published: &str) -> Card {
    Card {
        title: video.title.clone(),
        url: video.url.clone(),
        description: short_description(&video.description),
        author: CardAuthor {
            name: video.channel_title.clone(),
            icon_url: video.channel_icon.clone(),
        },
        thumbnail_url: video.channel_icon.clone(),
        image_url: video.thumbnail_url.clone(),
        color: CARD_COLOR,
        footer: format!("YouTube • {} • {}", footer_brand, published),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tube_models::{ChannelId, VideoId};

    fn video(duration_seconds: u64) -> VideoSummary {
        VideoSummary {
            id: VideoId::from("v1"),
            title: "My {url} Title".to_string(),
            description: "First line\nSecond line\nThird line".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap(),
            channel_id: ChannelId::from("UC1"),
            channel_title: "Chan".to_string(),
            duration_seconds,
            url: "https://www.youtube.com/watch?v=v1".to_string(),
            thumbnail_url: "https://i.ytimg.com/h.jpg".to_string(),
            channel_icon: Some("https://yt3.ggpht.com/icon.jpg".to_string()),
            view_count: 0,
        }
    }

    #[test]
    fn test_template_covers_every_combination() {
        for kind in [VideoKind::Long, VideoKind::Short] {
            for mode in [NotifyMode::Live, NotifyMode::Test] {
                let text = template(kind, mode);
                assert_eq!(text.contains("TEST MODE"), mode == NotifyMode::Test);
                assert_eq!(text.contains(":clapper:"), kind == VideoKind::Long);
                assert_eq!(text.contains(":mobile_phone:"), kind == VideoKind::Short);
            }
        }
    }

    #[test]
    fn test_render_long_live() {
        let text = render_text(&video(120), "<@&1>", NotifyMode::Live);
        assert_eq!(
            text,
            "<@&1> **Hey!**\n:clapper: C'è un nuovo Video su Chan\n\n\
             Titolo: **\"My {url} Title\"**\nVallo a vedere **ORA!**\n\n\
             https://www.youtube.com/watch?v=v1"
        );
    }

    #[test]
    fn test_render_short_test_keeps_classification() {
        let text = render_text(&video(119), "<@&2>", NotifyMode::Test);
        assert!(text.starts_with("<@&2> **Hey!**\n:mobile_phone: C'è un nuovo Short su Chan"));
        assert!(text.ends_with("https://www.youtube.com/watch?v=v1\n\n🧪 **TEST MODE**"));
    }

    #[test]
    fn test_fill_keeps_unknown_and_unclosed() {
        assert_eq!(fill("a {x} b {", &[("y", "1")]), "a {x} b {");
    }

    #[test]
    fn test_short_description() {
        assert_eq!(short_description("a\nb\nc"), "a\nb");
        assert_eq!(short_description(""), NO_DESCRIPTION);
        assert_eq!(short_description("\n"), NO_DESCRIPTION);

        let long = "x".repeat(250);
        let short = short_description(&long);
        assert_eq!(short.chars().count(), 203);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_format_publish_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_publish_date(&at), "07/03/2024 09:05");
    }

    #[test]
    fn test_card_fields() {
        let card = build_card_at(&video(300), "example.org", "07/03/2024 09:05");

        assert_eq!(card.title, "My {url} Title");
        assert_eq!(card.url, "https://www.youtube.com/watch?v=v1");
        assert_eq!(card.description, "First line\nSecond line");
        assert_eq!(card.author.name, "Chan");
        assert_eq!(card.thumbnail_url.as_deref(), Some("https://yt3.ggpht.com/icon.jpg"));
        assert_eq!(card.image_url, "https://i.ytimg.com/h.jpg");
        assert_eq!(card.color, 0xFF0000);
        assert_eq!(card.footer, "YouTube • example.org • 07/03/2024 09:05");
    }
}
