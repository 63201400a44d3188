use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::FeedConfig;
use crate::render::is_web_url;
use crate::types::{Card, MediaBatch, MediaItem};

pub const ELLIPSIS: char = '…';

/// Knobs for turning a batch into cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRules {
    pub narrow_count: usize,
    pub wide_count: usize,
    pub caption_max_chars: usize,
}

impl Default for SelectionRules {
    fn default() -> Self {
        Self { narrow_count: 3, wide_count: 6, caption_max_chars: 120 }
    }
}

impl From<&FeedConfig> for SelectionRules {
    fn from(cfg: &FeedConfig) -> Self {
        Self { narrow_count: cfg.narrow_count, wide_count: cfg.wide_count, caption_max_chars: cfg.caption_max_chars }
    }
}

impl SelectionRules {
    pub fn target_count(&self, narrow: bool) -> usize {
        if narrow { self.narrow_count } else { self.wide_count }
    }
}

/// Shuffle the whole batch, keep items that can become a card, cap at the target count.
pub fn select_and_render<R: Rng + ?Sized>(batch: &MediaBatch, narrow: bool, rules: &SelectionRules, rng: &mut R) -> Vec<Card> {
    let mut shuffled: Vec<&MediaItem> = batch.iter().collect();
    shuffled.shuffle(rng);
    shuffled
        .into_iter()
        .filter(|item| can_show(item))
        .take(rules.target_count(narrow))
        .map(|item| to_card(item, rules.caption_max_chars))
        .collect()
}

/// Known type, something to display, and a link that leads to the web.
fn can_show(item: &MediaItem) -> bool {
    item.media_type.is_displayable() && !item.display_image_url().is_empty() && is_web_url(&item.permalink)
}

fn to_card(item: &MediaItem, caption_max: usize) -> Card {
    let caption = item.caption.as_deref().map(|c| truncate_caption(c, caption_max)).filter(|c| !c.is_empty());
    Card {
        id: item.id.clone(),
        permalink: item.permalink.clone(),
        image_url: item.display_image_url().to_string(),
        caption,
    }
}

/// At most `max_chars` characters; longer text keeps `max_chars - 1` and ends in an ellipsis.
pub fn truncate_caption(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn item(id: &str, media_type: &str) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            caption: Some(format!("caption {id}")),
            media_url: format!("https://cdn.example/{id}.jpg"),
            permalink: format!("https://instagram.com/p/{id}"),
            thumbnail_url: None,
            media_type: MediaType::from(media_type.to_string()),
            timestamp: None,
        }
    }

    fn mixed_batch() -> MediaBatch {
        vec![
            item("a", "IMAGE"),
            item("b", "REEL"),
            item("c", "VIDEO"),
            item("d", "CAROUSEL_ALBUM"),
            item("e", "STORY"),
            item("f", "IMAGE"),
            item("g", "IMAGE"),
            item("h", "IMAGE"),
            item("i", "VIDEO"),
        ]
    }

    #[test]
    fn output_is_capped_by_target_and_batch() {
        let rules = SelectionRules::default();
        let mut rng = StdRng::seed_from_u64(7);
        for len in 0..12 {
            let batch: MediaBatch = (0..len).map(|i| item(&i.to_string(), "IMAGE")).collect();
            for narrow in [true, false] {
                let cards = select_and_render(&batch, narrow, &rules, &mut rng);
                assert!(cards.len() <= rules.target_count(narrow));
                assert!(cards.len() <= batch.len());
                assert_eq!(cards.len(), batch.len().min(rules.target_count(narrow)));
            }
        }
    }

    #[test]
    fn unknown_types_never_survive() {
        let rules = SelectionRules { wide_count: 100, ..SelectionRules::default() };
        let batch = mixed_batch();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let cards = select_and_render(&batch, false, &rules, &mut rng);
            assert_eq!(cards.len(), 7);
            assert!(cards.iter().all(|c| c.id != "b" && c.id != "e"));
        }
    }

    #[test]
    fn all_filtered_is_empty() {
        let batch = vec![item("x", "REEL"), item("y", "")];
        let cards = select_and_render(&batch, false, &SelectionRules::default(), &mut StdRng::seed_from_u64(3));
        assert!(cards.is_empty());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let batch: MediaBatch = (0..20).map(|i| item(&i.to_string(), "IMAGE")).collect();
        let rules = SelectionRules { wide_count: 20, ..SelectionRules::default() };
        let mut rng = StdRng::seed_from_u64(99);
        let cards = select_and_render(&batch, false, &rules, &mut rng);
        let mut got: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        let mut want: Vec<&str> = batch.iter().map(|i| i.id.as_str()).collect();
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);
    }

    #[test]
    fn first_position_is_roughly_uniform() {
        let batch: MediaBatch = (0..5).map(|i| item(&i.to_string(), "IMAGE")).collect();
        let rules = SelectionRules { wide_count: 5, ..SelectionRules::default() };
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 20_000;
        let mut firsts: HashMap<String, usize> = HashMap::new();
        for _ in 0..trials {
            let cards = select_and_render(&batch, false, &rules, &mut rng);
            *firsts.entry(cards[0].id.clone()).or_default() += 1;
        }
        assert_eq!(firsts.len(), 5);
        let expected = trials / 5;
        for (id, count) in firsts {
            let dev = (count as f64 - expected as f64).abs() / expected as f64;
            assert!(dev < 0.08, "item {id} led {count} times, expected about {expected}");
        }
    }

    #[test]
    fn caption_of_130_chars_becomes_120() {
        let caption = "x".repeat(130);
        let out = truncate_caption(&caption, 120);
        assert_eq!(out.chars().count(), 120);
        assert_eq!(out.chars().filter(|c| *c == 'x').count(), 119);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn short_and_boundary_captions_are_untouched() {
        assert_eq!(truncate_caption("hello", 120), "hello");
        let exact = "y".repeat(120);
        assert_eq!(truncate_caption(&exact, 120), exact);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let caption = "é".repeat(121);
        let out = truncate_caption(&caption, 120);
        assert_eq!(out.chars().count(), 120);
    }

    #[test]
    fn empty_caption_yields_no_caption() {
        let mut it = item("1", "IMAGE");
        it.caption = Some(String::new());
        let cards = select_and_render(&vec![it], false, &SelectionRules::default(), &mut StdRng::seed_from_u64(0));
        assert_eq!(cards[0].caption, None);
    }

    #[test]
    fn items_without_image_or_web_link_are_dropped() {
        let mut no_image = item("n", "IMAGE");
        no_image.media_url.clear();
        let mut bad_link = item("j", "IMAGE");
        bad_link.permalink = "javascript:alert(1)".into();
        let mut thumb_only = item("t", "VIDEO");
        thumb_only.media_url.clear();
        thumb_only.thumbnail_url = Some("https://cdn.example/t-thumb.jpg".into());

        let batch = vec![no_image, bad_link, thumb_only, item("ok", "IMAGE")];
        let rules = SelectionRules { wide_count: 10, ..SelectionRules::default() };
        let mut cards = select_and_render(&batch, false, &rules, &mut StdRng::seed_from_u64(4));
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["ok", "t"]);
        assert_eq!(cards[1].image_url, "https://cdn.example/t-thumb.jpg");
    }

    #[test]
    fn video_card_uses_thumbnail() {
        let mut it = item("v", "VIDEO");
        it.thumbnail_url = Some("https://cdn.example/v-thumb.jpg".into());
        let cards = select_and_render(&vec![it], true, &SelectionRules::default(), &mut StdRng::seed_from_u64(0));
        assert_eq!(cards[0].image_url, "https://cdn.example/v-thumb.jpg");
    }
}
