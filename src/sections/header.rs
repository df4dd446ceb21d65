//! Document header: name, professional title, contact line and photo.

use crate::color::{ColorResolver, ColorTarget};
use crate::layout::{
    Block, HeaderNode, HorizontalAlignment, ImageBlock, ImageSource, RichParagraph,
};
use crate::resume::ResumeRecord;
use crate::richtext::Span;
use crate::settings::{EffectiveSettings, LinkDisplay};

use super::display_url;

/// One entry of the contact line.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Contact {
    text: String,
    url: Option<String>,
}

impl Contact {
    fn plain(text: &str) -> Option<Contact> {
        let text = text.trim();
        (!text.is_empty()).then(|| Contact {
            text: text.to_owned(),
            url: None,
        })
    }

    fn link(text: &str, url: String) -> Option<Contact> {
        let text = text.trim();
        (!text.is_empty()).then(|| Contact {
            text: text.to_owned(),
            url: Some(url),
        })
    }
}

fn contacts(resume: &ResumeRecord, settings: &EffectiveSettings) -> Vec<Contact> {
    let basics = &resume.basics;
    let label = |url: &str| {
        if settings.show_full_url {
            url.trim().to_owned()
        } else {
            display_url(url).to_owned()
        }
    };

    let mut contacts = Vec::new();
    contacts.extend(Contact::link(
        &basics.email,
        format!("mailto:{}", basics.email.trim()),
    ));
    contacts.extend(Contact::plain(&basics.phone));
    contacts.extend(Contact::plain(&basics.location.display()));
    if !basics.url.trim().is_empty() {
        contacts.extend(Contact::link(&label(&basics.url), basics.url.trim().to_owned()));
    }
    if settings.show_profiles {
        for profile in &basics.profiles {
            let url = profile.url.trim();
            let prefer_username = !settings.show_full_url && !profile.username.trim().is_empty();
            let text = if url.is_empty() || prefer_username {
                match (profile.network.trim(), profile.username.trim()) {
                    ("", username) => username.to_owned(),
                    (network, "") => network.to_owned(),
                    (network, username) => format!("{}: {}", network, username),
                }
            } else {
                label(url)
            };
            if url.is_empty() {
                contacts.extend(Contact::plain(&text));
            } else {
                contacts.extend(Contact::link(&text, url.to_owned()));
            }
        }
    }
    contacts
}

/// Builds the header node.  The header is always present, even for an empty record.
pub fn render_header(
    resume: &ResumeRecord,
    settings: &EffectiveSettings,
    colors: &ColorResolver,
    alignment: HorizontalAlignment,
) -> HeaderNode {
    let basics = &resume.basics;
    let mut blocks = Vec::new();

    let styled = |text: &str, style: &crate::settings::TextStyle, target, fallback: &str| {
        let color = style
            .color
            .clone()
            .unwrap_or_else(|| colors.get(target, fallback).to_owned());
        let span = Span::new(text.trim())
            .with_bold(style.bold)
            .with_italic(style.italic);
        RichParagraph::new(vec![span], style.font_size, color).with_alignment(alignment)
    };

    if !basics.name.trim().is_empty() {
        blocks.push(Block::Paragraph(styled(
            &basics.name,
            &settings.name,
            ColorTarget::Name,
            &settings.text_color,
        )));
    }
    if !basics.label.trim().is_empty() {
        blocks.push(Block::Paragraph(styled(
            &basics.label,
            &settings.title,
            ColorTarget::Title,
            &settings.muted_color,
        )));
    }

    let contact_style = &settings.contact;
    let contact_color = contact_style
        .color
        .clone()
        .unwrap_or_else(|| settings.muted_color.clone());
    let link_color = colors.applies_to(ColorTarget::Links).then(|| colors.accent().to_owned());
    let icon_color = colors.applies_to(ColorTarget::Icons).then(|| colors.accent().to_owned());

    let contact_spans = |contact: &Contact| -> Vec<Span> {
        let base = |text: String| {
            Span::new(text)
                .with_bold(contact_style.bold)
                .with_italic(contact_style.italic)
        };
        let Some(url) = &contact.url else {
            return vec![base(contact.text.clone())];
        };
        let mut spans = Vec::new();
        let show_icon = settings.link_display == LinkDisplay::Icon
            || (settings.show_link_icon && !settings.link_icon.is_empty());
        if show_icon {
            spans.push(base(format!("{} ", settings.link_icon)).with_color(icon_color.clone()));
        }
        spans.push(
            base(contact.text.clone())
                .with_link(Some(url.clone()))
                .with_underline(settings.link_display == LinkDisplay::Underline)
                .with_color(link_color.clone()),
        );
        spans
    };

    let contacts = contacts(resume, settings);
    match settings.link_display {
        LinkDisplay::Newline => {
            for contact in &contacts {
                blocks.push(Block::Paragraph(
                    RichParagraph::new(
                        contact_spans(contact),
                        contact_style.font_size,
                        contact_color.clone(),
                    )
                    .with_alignment(alignment),
                ));
            }
        }
        LinkDisplay::Inline | LinkDisplay::Icon | LinkDisplay::Underline => {
            let mut spans = Vec::new();
            for (index, contact) in contacts.iter().enumerate() {
                if index > 0 {
                    spans.push(Span::new(settings.contact_separator.clone()));
                }
                spans.extend(contact_spans(contact));
            }
            if !spans.is_empty() {
                blocks.push(Block::Paragraph(
                    RichParagraph::new(spans, contact_style.font_size, contact_color)
                        .with_alignment(alignment),
                ));
            }
        }
    }

    let photo = (settings.show_photo && !basics.image.trim().is_empty()).then(|| ImageBlock {
        source: ImageSource::Path(basics.image.trim().to_owned()),
        width: settings.photo_size,
        alignment,
    });

    HeaderNode {
        alignment,
        photo,
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::{Basics, Location, Profile};
    use crate::settings::{merge, LayoutSettings};
    use serde_json::json;

    fn record() -> ResumeRecord {
        ResumeRecord {
            basics: Basics {
                name: "Ada Lovelace".into(),
                label: "Analyst".into(),
                email: "ada@example.com".into(),
                phone: "+44 1".into(),
                url: "https://ada.dev/".into(),
                image: "photo.png".into(),
                location: Location {
                    city: "London".into(),
                    ..Location::default()
                },
                profiles: vec![Profile {
                    network: "GitHub".into(),
                    username: "ada".into(),
                    url: "https://github.com/ada".into(),
                    ..Profile::default()
                }],
                ..Basics::default()
            },
            ..ResumeRecord::default()
        }
    }

    fn header(overrides: serde_json::Value, colors: &ColorResolver) -> HeaderNode {
        let settings = merge::resolve(&LayoutSettings::default(), &[&overrides]);
        render_header(&record(), &settings, colors, HorizontalAlignment::Center)
    }

    fn lines(node: &HeaderNode) -> Vec<String> {
        node.blocks.iter().map(Block::plain_text).collect()
    }

    #[test]
    fn inline_contacts_share_one_line() {
        let node = header(json!({}), &ColorResolver::default());
        assert_eq!(
            lines(&node),
            [
                "Ada Lovelace",
                "Analyst",
                "ada@example.com | +44 1 | London | ada.dev | GitHub: ada"
            ]
        );
        assert!(node.photo.is_none());
        match &node.blocks[0] {
            Block::Paragraph(name) => assert_eq!(name.alignment(), HorizontalAlignment::Center),
            other => panic!("expected name paragraph, got {other:?}"),
        }
    }

    #[test]
    fn newline_display_and_full_urls() {
        let node = header(
            json!({"linkDisplay": "newline", "showFullUrl": true, "showProfiles": false}),
            &ColorResolver::default(),
        );
        assert_eq!(
            lines(&node)[2..],
            ["ada@example.com", "+44 1", "London", "https://ada.dev/"]
        );
    }

    #[test]
    fn icons_and_links_follow_color_targets() {
        let colors = ColorResolver::new("#ff0000", [ColorTarget::Icons, ColorTarget::Name]);
        let node = header(json!({"linkDisplay": "icon"}), &colors);
        let Block::Paragraph(name) = &node.blocks[0] else {
            panic!("expected name paragraph");
        };
        assert_eq!(name.color(), "#ff0000");

        let Block::Paragraph(contacts) = &node.blocks[2] else {
            panic!("expected contact paragraph");
        };
        let icon = &contacts.spans()[0];
        assert_eq!(icon.text(), "→ ");
        assert_eq!(icon.color(), Some("#ff0000"));
        let email = &contacts.spans()[1];
        assert!(email.is_link());
        assert_eq!(email.color(), None);
    }

    #[test]
    fn underline_display_marks_only_links() {
        let node = header(json!({"linkDisplay": "underline"}), &ColorResolver::default());
        let Block::Paragraph(contacts) = &node.blocks[2] else {
            panic!("expected contact paragraph");
        };
        assert!(contacts.has_underline());
        assert_eq!(
            contacts.plain_text(),
            "ada@example.com | +44 1 | London | ada.dev | GitHub: ada"
        );
        for span in contacts.spans() {
            assert_eq!(span.is_underlined(), span.is_link(), "{:?}", span.text());
        }
        let underlined: Vec<&str> = contacts
            .spans()
            .iter()
            .filter(|span| span.is_underlined())
            .map(|span| span.text())
            .collect();
        assert_eq!(underlined, ["ada@example.com", "ada.dev", "GitHub: ada"]);

        let inline = header(json!({}), &ColorResolver::default());
        let Block::Paragraph(plain) = &inline.blocks[2] else {
            panic!("expected contact paragraph");
        };
        assert!(!plain.has_underline());
    }

    #[test]
    fn photo_is_opt_in() {
        let node = header(json!({"showPhoto": true, "photoSize": 60.0}), &ColorResolver::default());
        let photo = node.photo.expect("photo");
        assert_eq!(photo.source, ImageSource::Path("photo.png".into()));
        assert_eq!(photo.width, 60.0);
    }
}
