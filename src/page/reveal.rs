use std::collections::HashSet;

use super::Effect;

pub const REVEAL_TARGETS: &str = ".project-card, .stat, .about-text, .contact-info, .contact-form";

#[derive(Debug, Clone, PartialEq)]
pub struct ObserveOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self { threshold: 0.1, root_margin: "0px 0px -50px 0px".to_string() }
    }
}

/// One observer callback entry; `key` is a selector the host can resolve to that element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub key: String,
    pub intersecting: bool,
}

#[derive(Debug, Default)]
pub struct Reveal {
    revealed: HashSet<String>,
}

impl Reveal {
    /// Hide the targets and ask the host to observe them.
    pub fn prepare(&mut self) -> Vec<Effect> {
        self.revealed.clear();
        vec![
            Effect::style(REVEAL_TARGETS, "opacity", "0"),
            Effect::style(REVEAL_TARGETS, "transform", "translateY(30px)"),
            Effect::style(REVEAL_TARGETS, "transition", "opacity 0.6s ease, transform 0.6s ease"),
            Effect::Observe { selector: REVEAL_TARGETS.to_string(), options: ObserveOptions::default() },
        ]
    }

    pub fn on_intersect(&mut self, entries: &[IntersectionEntry]) -> Vec<Effect> {
        let mut effects = Vec::new();
        for entry in entries.iter().filter(|e| e.intersecting) {
            if self.revealed.insert(entry.key.clone()) {
                effects.push(Effect::style(&entry.key, "opacity", "1"));
                effects.push(Effect::style(&entry.key, "transform", "translateY(0)"));
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, intersecting: bool) -> IntersectionEntry {
        IntersectionEntry { key: key.to_string(), intersecting }
    }

    #[test]
    fn prepare_hides_and_observes() {
        let effects = Reveal::default().prepare();
        assert_eq!(effects[0], Effect::style(REVEAL_TARGETS, "opacity", "0"));
        assert_eq!(effects.last(), Some(&Effect::Observe { selector: REVEAL_TARGETS.into(), options: ObserveOptions::default() }));
    }

    #[test]
    fn reveals_each_element_once() {
        let mut r = Reveal::default();
        let first = r.on_intersect(&[entry("#a", true), entry("#b", false)]);
        assert_eq!(first, vec![Effect::style("#a", "opacity", "1"), Effect::style("#a", "transform", "translateY(0)")]);
        assert!(r.on_intersect(&[entry("#a", true)]).is_empty());
        assert_eq!(r.on_intersect(&[entry("#b", true)]).len(), 2);
    }
}
