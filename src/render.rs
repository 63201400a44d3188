use url::Url;

use crate::types::Card;

const LINK_ATTRS: &str = r#"target="_blank" rel="noopener noreferrer""#;

/// Markup for the whole grid, one card after another.
pub fn render_cards(cards: &[Card]) -> String {
    cards.iter().map(render_card).collect()
}

pub fn render_card(card: &Card) -> String {
    let permalink = if is_web_url(&card.permalink) { html_escape(&card.permalink) } else { "#".to_string() };
    let image = html_escape(&card.image_url);
    let caption = card
        .caption
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!("\n        <p>{}</p>", html_escape(c)))
        .unwrap_or_default();
    format!(
        r#"<div class="project-card">
    <div class="project-image">
        <a href="{permalink}" {LINK_ATTRS} aria-label="View on Instagram">
            <img src="{image}" alt="Instagram post" loading="lazy">
        </a>
    </div>
    <div class="project-content">
        <h3>Instagram</h3>{caption}
        <div class="project-links">
            <a href="{permalink}" class="project-link" {LINK_ATTRS}>View on Instagram</a>
        </div>
    </div>
</div>
"#
    )
}

/// Absolute `http`/`https` address.
pub(crate) fn is_web_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(caption: Option<&str>) -> Card {
        Card {
            id: "1".into(),
            permalink: "https://instagram.com/p/1".into(),
            image_url: "https://cdn.example/1.jpg".into(),
            caption: caption.map(str::to_string),
        }
    }

    #[test]
    fn links_open_isolated_in_new_context() {
        let html = render_card(&card(None));
        assert_eq!(html.matches(r#"href="https://instagram.com/p/1""#).count(), 2);
        assert_eq!(html.matches(r#"target="_blank" rel="noopener noreferrer""#).count(), 2);
        assert!(html.contains(r#"<img src="https://cdn.example/1.jpg" alt="Instagram post" loading="lazy">"#));
    }

    #[test]
    fn caption_block_only_when_present() {
        assert!(!render_card(&card(None)).contains("<p>"));
        assert!(!render_card(&card(Some(""))).contains("<p>"));
        assert!(render_card(&card(Some("sunset"))).contains("<p>sunset</p>"));
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let mut c = card(Some(r#"<script>alert("x")</script> & more"#));
        c.permalink = r#"https://instagram.com/p/1" onclick="x"#.into();
        let html = render_card(&c);
        assert!(html.contains("<p>&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; more</p>"));
        assert!(!html.contains(r#"" onclick=""#));
    }

    #[test]
    fn only_web_links_are_emitted() {
        for bad in ["javascript:alert(1)", "JavaScript:alert(1)", "data:text/html,hi", "/p/1", ""] {
            let mut c = card(None);
            c.permalink = bad.into();
            let html = render_card(&c);
            assert_eq!(html.matches(r##"href="#""##).count(), 2, "{bad}");
            assert!(!html.to_lowercase().contains("javascript:"));
        }
        assert!(is_web_url("http://instagram.com/p/1"));
    }

    #[test]
    fn grid_concatenates_cards() {
        let html = render_cards(&[card(None), card(Some("b"))]);
        assert_eq!(html.matches(r#"<div class="project-card">"#).count(), 2);
        assert_eq!(render_cards(&[]), "");
    }
}
