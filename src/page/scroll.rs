use serde::{Deserialize, Serialize};

use super::nav::{ACTIVE, NAV_LINK};
use super::Effect;

pub const SAME_PAGE_ANCHOR: &str = r##"a[href^="#"]"##;
/// Pseudo-selector for the window itself.
pub const WINDOW: &str = "window";
pub const NAVBAR: &str = ".navbar";

const NAVBAR_SOLID_AFTER: f64 = 100.0;
const SPY_OFFSET: f64 = 200.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOffset {
    pub id: String,
    pub top: f64,
}

impl SectionOffset {
    pub fn new(id: &str, top: f64) -> Self { Self { id: id.to_string(), top } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavbarStyle {
    pub background: &'static str,
    pub box_shadow: &'static str,
}

pub fn navbar_style(scroll_y: f64) -> NavbarStyle {
    if scroll_y > NAVBAR_SOLID_AFTER {
        NavbarStyle { background: "rgba(255, 255, 255, 0.98)", box_shadow: "0 2px 10px rgba(0, 0, 0, 0.1)" }
    } else {
        NavbarStyle { background: "rgba(255, 255, 255, 0.95)", box_shadow: "none" }
    }
}

pub fn navbar_effects(scroll_y: f64) -> Vec<Effect> {
    let style = navbar_style(scroll_y);
    vec![
        Effect::style(NAVBAR, "background", style.background),
        Effect::style(NAVBAR, "box-shadow", style.box_shadow),
    ]
}

/// Last section, in document order, whose top is within the spy offset of `scroll_y`.
pub fn current_section(sections: &[SectionOffset], scroll_y: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|s| scroll_y >= s.top - SPY_OFFSET)
        .last()
        .map(|s| s.id.as_str())
}

pub fn spy_effects(current: Option<&str>) -> Vec<Effect> {
    let mut effects = vec![Effect::class(NAV_LINK, ACTIVE, false)];
    if let Some(id) = current {
        effects.push(Effect::class(&format!(r##"{NAV_LINK}[href="#{id}"]"##), ACTIVE, true));
    }
    effects
}

/// Same-page anchors never navigate; a named fragment scrolls smoothly.
pub fn smooth_scroll(href: &str) -> Vec<Effect> {
    let mut effects = vec![Effect::PreventDefault];
    if href.len() > 1 && href.starts_with('#') {
        effects.push(Effect::ScrollIntoView { selector: href.to_string() });
    }
    effects
}
