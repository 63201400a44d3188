//! Peripheral page behaviors as plain handlers.
//!
//! A host registers the [`Binding`]s from [`Enhancer::bindings`] with its own
//! event machinery, turns each occurrence into a [`PageEvent`], and applies the
//! returned [`Effect`]s to the document. Nothing in here touches a real DOM.

pub mod contact;
pub mod nav;
pub mod notify;
pub mod reveal;
pub mod scroll;

use chrono::Datelike;
use std::time::Duration;

use contact::ContactForm;
use notify::{Banner, NotificationKind, Notifier, Timer};
use reveal::{IntersectionEntry, ObserveOptions, Reveal};
use scroll::SectionOffset;

pub const CURRENT_YEAR: &str = "#current-year";

/// Extra rules for the active nav link and the hamburger animation.
pub const ACTIVE_LINK_CSS: &str = r#"
    .nav-link.active {
        color: #007bff !important;
        position: relative;
    }

    .nav-link.active::after {
        content: '';
        position: absolute;
        bottom: -5px;
        left: 0;
        width: 100%;
        height: 2px;
        background-color: #007bff;
    }

    .hamburger.active .bar:nth-child(2) {
        opacity: 0;
    }

    .hamburger.active .bar:nth-child(1) {
        transform: translateY(8px) rotate(45deg);
    }

    .hamburger.active .bar:nth-child(3) {
        transform: translateY(-8px) rotate(-45deg);
    }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HamburgerClick,
    NavLinkClick,
    AnchorClick,
    WindowScroll,
    ContactSubmit,
}

/// "Deliver `kind` events raised on elements matching `selector`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub kind: EventKind,
    pub selector: &'static str,
}

pub trait EventSource {
    fn listen(&mut self, binding: Binding);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Ready { year: i32 },
    HamburgerClicked,
    NavLinkClicked,
    AnchorClicked { href: String },
    Scrolled { scroll_y: f64, sections: Vec<SectionOffset> },
    ContactSubmitted(ContactForm),
    Intersected(Vec<IntersectionEntry>),
    TimerFired(Timer),
}

impl PageEvent {
    pub fn ready_now() -> Self {
        PageEvent::Ready { year: chrono::Local::now().year() }
    }
}

/// A DOM instruction for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PreventDefault,
    SetClass { selector: String, class: String, on: bool },
    SetStyle { selector: String, property: String, value: String },
    SetText { selector: String, text: String },
    ScrollIntoView { selector: String },
    InjectStyle { css: String },
    Observe { selector: String, options: ObserveOptions },
    ShowBanner(Banner),
    RemoveBanner { id: u64 },
    ResetForm { selector: String },
    Schedule { after: Duration, timer: Timer },
}

impl Effect {
    pub(crate) fn class(selector: &str, class: &str, on: bool) -> Self {
        Effect::SetClass { selector: selector.to_string(), class: class.to_string(), on }
    }

    pub(crate) fn style(selector: &str, property: &str, value: &str) -> Self {
        Effect::SetStyle { selector: selector.to_string(), property: property.to_string(), value: value.to_string() }
    }
}

/// State for every peripheral behavior on one page.
#[derive(Debug, Default)]
pub struct Enhancer {
    nav: nav::NavToggle,
    reveal: Reveal,
    notifier: Notifier,
}

impl Enhancer {
    pub fn new() -> Self { Self::default() }

    pub fn bindings() -> Vec<Binding> {
        vec![
            Binding { kind: EventKind::HamburgerClick, selector: nav::HAMBURGER },
            Binding { kind: EventKind::NavLinkClick, selector: nav::NAV_LINK },
            Binding { kind: EventKind::AnchorClick, selector: scroll::SAME_PAGE_ANCHOR },
            Binding { kind: EventKind::WindowScroll, selector: scroll::WINDOW },
            Binding { kind: EventKind::ContactSubmit, selector: contact::CONTACT_FORM },
        ]
    }

    pub fn attach(&self, source: &mut dyn EventSource) {
        for binding in Self::bindings() {
            source.listen(binding);
        }
    }

    pub fn handle(&mut self, event: PageEvent) -> Vec<Effect> {
        match event {
            PageEvent::Ready { year } => {
                let mut effects = vec![
                    Effect::InjectStyle { css: ACTIVE_LINK_CSS.to_string() },
                    Effect::SetText { selector: CURRENT_YEAR.to_string(), text: year.to_string() },
                ];
                effects.extend(self.reveal.prepare());
                effects
            }
            PageEvent::HamburgerClicked => self.nav.toggle(),
            PageEvent::NavLinkClicked => self.nav.close(),
            PageEvent::AnchorClicked { href } => scroll::smooth_scroll(&href),
            PageEvent::Scrolled { scroll_y, sections } => {
                let mut effects = scroll::navbar_effects(scroll_y);
                effects.extend(scroll::spy_effects(scroll::current_section(&sections, scroll_y)));
                effects
            }
            PageEvent::ContactSubmitted(form) => self.submit_contact(&form),
            PageEvent::Intersected(entries) => self.reveal.on_intersect(&entries),
            PageEvent::TimerFired(timer) => self.notifier.on_timer(timer),
        }
    }

    fn submit_contact(&mut self, form: &ContactForm) -> Vec<Effect> {
        let mut effects = vec![Effect::PreventDefault];
        match contact::validate(form) {
            Ok(()) => {
                effects.extend(self.notifier.show(contact::THANK_YOU, NotificationKind::Success));
                effects.push(Effect::ResetForm { selector: contact::CONTACT_FORM.to_string() });
            }
            Err(e) => effects.extend(self.notifier.show(&e.to_string(), NotificationKind::Error)),
        }
        effects
    }
}
