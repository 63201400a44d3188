//! Browser host. Implements the storage, location and document seams over
//! `web-sys`, and applies page [`Effect`]s to the live DOM.
//!
//! Two entry points are exported to JavaScript: `enhancePage()` wires the
//! peripheral behaviors, `initMediaFeed(configToml?)` runs the substitution
//! once. The host page decides when to call each.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use tracing::Level;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, FormData, HtmlElement, HtmlFormElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::api::GraphClient;
use crate::config::FeedConfig;
use crate::credential::PageLocation;
use crate::feed::{Container, Document, FeedOutcome, MediaFeed};
use crate::logging::LevelSink;
use crate::page::contact::ContactForm;
use crate::page::notify::banner_selector;
use crate::page::reveal::{IntersectionEntry, ObserveOptions};
use crate::page::scroll::SectionOffset;
use crate::page::{Binding, Effect, Enhancer, EventKind, EventSource, PageEvent};
use crate::storage::CredentialStore;

const REVEAL_ATTR: &str = "data-reveal-id";

/// Route `tracing` events to the devtools console. Later calls are no-ops.
fn install_console_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(LevelSink::new(console_line))
        .without_time()
        .with_target(false)
        .with_max_level(Level::INFO)
        .try_init();
}

fn console_line(level: Level, line: &str) {
    let msg = JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&msg),
        Level::WARN => web_sys::console::warn_1(&msg),
        Level::INFO => web_sys::console::info_1(&msg),
        _ => web_sys::console::debug_1(&msg),
    }
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{e:?}")
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("no window"))
}

fn local_storage() -> Result<web_sys::Storage> {
    window()?.local_storage().map_err(js_err)?.ok_or_else(|| anyhow!("localStorage unavailable"))
}

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStore;

impl CredentialStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        local_storage()?.get_item(key).map_err(js_err)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        local_storage()?.set_item(key, value).map_err(js_err)
    }

    fn remove(&self, key: &str) -> Result<()> {
        local_storage()?.remove_item(key).map_err(js_err)
    }
}

/// `window.location` plus `history.replaceState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserLocation;

impl PageLocation for BrowserLocation {
    fn href(&self) -> Result<String> {
        window()?.location().href().map_err(js_err)
    }

    fn replace(&mut self, url: &str) -> Result<()> {
        let w = window()?;
        let title = w.document().map(|d| d.title()).unwrap_or_default();
        w.history().map_err(js_err)?.replace_state_with_url(&JsValue::NULL, &title, Some(url)).map_err(js_err)
    }
}

pub struct ElementContainer(Element);

impl Container for ElementContainer {
    fn inner_html(&self) -> String { self.0.inner_html() }
    fn set_inner_html(&mut self, html: &str) { self.0.set_inner_html(html) }
}

pub struct BrowserDocument {
    window: Window,
    doc: web_sys::Document,
    found: Option<ElementContainer>,
}

impl BrowserDocument {
    pub fn new() -> Result<Self> {
        let window = window()?;
        let doc = window.document().ok_or_else(|| anyhow!("no document"))?;
        Ok(Self { window, doc, found: None })
    }
}

impl Document for BrowserDocument {
    type Container = ElementContainer;

    fn container(&mut self, selector: &str) -> Option<&mut ElementContainer> {
        let el = self.doc.query_selector(selector).ok().flatten()?;
        self.found = Some(ElementContainer(el));
        self.found.as_mut()
    }

    fn viewport_width(&self) -> f64 {
        self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(f64::MAX)
    }
}

pub async fn run_media_feed(config: FeedConfig) -> Result<FeedOutcome> {
    let client = GraphClient::new(&config)?;
    let mut doc = BrowserDocument::new()?;
    let mut feed = MediaFeed::new(client, config);
    Ok(feed.run(&mut doc, &mut BrowserLocation, &BrowserStore).await)
}

/// Start the one-shot feed substitution. `config_toml` overrides the defaults.
#[wasm_bindgen(js_name = initMediaFeed)]
pub fn init_media_feed(config_toml: Option<String>) -> Result<(), JsValue> {
    install_console_logging();
    let config = match config_toml {
        Some(s) => FeedConfig::from_toml_str(&s).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => FeedConfig::default(),
    };
    wasm_bindgen_futures::spawn_local(async move {
        match run_media_feed(config).await {
            Ok(outcome) => tracing::debug!(?outcome, "media feed done"),
            Err(e) => tracing::error!(error = %e, "media feed could not start"),
        }
    });
    Ok(())
}

/// Wire the peripheral behaviors and fire the content-ready handlers.
#[wasm_bindgen(js_name = enhancePage)]
pub fn enhance_page() -> Result<(), JsValue> {
    install_console_logging();
    let page = BrowserPage::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
    page.start();
    Ok(())
}

struct Inner {
    window: Window,
    doc: web_sys::Document,
    enhancer: RefCell<Enhancer>,
    observer: RefCell<Option<IntersectionObserver>>,
}

pub struct BrowserPage {
    inner: Rc<Inner>,
}

impl BrowserPage {
    pub fn new() -> Result<Self> {
        let window = window()?;
        let doc = window.document().ok_or_else(|| anyhow!("no document"))?;
        Ok(Self {
            inner: Rc::new(Inner { window, doc, enhancer: RefCell::new(Enhancer::new()), observer: RefCell::new(None) }),
        })
    }

    pub fn start(&self) {
        let mut events = DomEvents { inner: self.inner.clone() };
        self.inner.enhancer.borrow().attach(&mut events);
        dispatch(&self.inner, PageEvent::ready_now(), None);
    }
}

struct DomEvents {
    inner: Rc<Inner>,
}

impl EventSource for DomEvents {
    fn listen(&mut self, binding: Binding) {
        if binding.kind == EventKind::WindowScroll {
            let h = self.inner.clone();
            EventListener::new(&self.inner.window, "scroll", move |_| {
                let event = scroll_event(&h);
                dispatch(&h, event, None);
            })
            .forget();
            return;
        }
        let name = if binding.kind == EventKind::ContactSubmit { "submit" } else { "click" };
        for el in select_all(&self.inner.doc, binding.selector) {
            let h = self.inner.clone();
            let target = el.clone();
            let kind = binding.kind;
            EventListener::new(&el, name, move |e| {
                let event = match kind {
                    EventKind::HamburgerClick => PageEvent::HamburgerClicked,
                    EventKind::NavLinkClick => PageEvent::NavLinkClicked,
                    EventKind::AnchorClick => PageEvent::AnchorClicked { href: target.get_attribute("href").unwrap_or_default() },
                    EventKind::ContactSubmit => PageEvent::ContactSubmitted(read_form(&target)),
                    EventKind::WindowScroll => return,
                };
                dispatch(&h, event, Some(e));
            })
            .forget();
        }
    }
}

fn dispatch(inner: &Rc<Inner>, event: PageEvent, raw: Option<&Event>) {
    let effects = inner.enhancer.borrow_mut().handle(event);
    for effect in effects {
        apply(inner, effect, raw);
    }
}

fn select_all(doc: &web_sys::Document, selector: &str) -> Vec<Element> {
    let Ok(list) = doc.query_selector_all(selector) else { return Vec::new() };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn scroll_event(inner: &Inner) -> PageEvent {
    let scroll_y = inner.window.scroll_y().unwrap_or(0.0);
    let sections = select_all(&inner.doc, "section[id]")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .map(|el| SectionOffset { id: el.id(), top: f64::from(el.offset_top()) })
        .collect();
    PageEvent::Scrolled { scroll_y, sections }
}

fn read_form(el: &Element) -> ContactForm {
    let Some(form) = el.dyn_ref::<HtmlFormElement>() else { return ContactForm::default() };
    let Ok(data) = FormData::new_with_form(form) else { return ContactForm::default() };
    let field = |name: &str| data.get(name).as_string();
    ContactForm { name: field("name"), email: field("email"), subject: field("subject"), message: field("message") }
}

fn apply(inner: &Rc<Inner>, effect: Effect, raw: Option<&Event>) {
    let doc = &inner.doc;
    match effect {
        Effect::PreventDefault => {
            if let Some(e) = raw { e.prevent_default(); }
        }
        Effect::SetClass { selector, class, on } => {
            for el in select_all(doc, &selector) {
                let _ = el.class_list().toggle_with_force(&class, on);
            }
        }
        Effect::SetStyle { selector, property, value } => {
            for el in select_all(doc, &selector) {
                if let Some(h) = el.dyn_ref::<HtmlElement>() {
                    let _ = h.style().set_property(&property, &value);
                }
            }
        }
        Effect::SetText { selector, text } => {
            for el in select_all(doc, &selector) {
                el.set_text_content(Some(&text));
            }
        }
        Effect::ScrollIntoView { selector } => {
            if let Ok(Some(el)) = doc.query_selector(&selector) {
                let opts = ScrollIntoViewOptions::new();
                opts.set_behavior(ScrollBehavior::Smooth);
                opts.set_block(ScrollLogicalPosition::Start);
                el.scroll_into_view_with_scroll_into_view_options(&opts);
            }
        }
        Effect::InjectStyle { css } => {
            if let (Ok(style), Some(head)) = (doc.create_element("style"), doc.head()) {
                style.set_text_content(Some(&css));
                let _ = head.append_child(&style);
            }
        }
        Effect::Observe { selector, options } => observe(inner, &selector, &options),
        Effect::ShowBanner(banner) => {
            let (Ok(el), Some(body)) = (doc.create_element("div"), doc.body()) else { return };
            el.set_class_name(&banner.class_name);
            let _ = el.set_attribute("data-notification-id", &banner.id.to_string());
            let _ = el.set_attribute("style", &banner.css);
            el.set_text_content(Some(&banner.message));
            let _ = body.append_child(&el);
        }
        Effect::RemoveBanner { id } => {
            for el in select_all(doc, &banner_selector(id)) {
                el.remove();
            }
        }
        Effect::ResetForm { selector } => {
            for el in select_all(doc, &selector) {
                if let Some(form) = el.dyn_ref::<HtmlFormElement>() { form.reset(); }
            }
        }
        Effect::Schedule { after, timer } => {
            let h = inner.clone();
            let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, move || dispatch(&h, PageEvent::TimerFired(timer), None)).forget();
        }
    }
}

fn observe(inner: &Rc<Inner>, selector: &str, options: &ObserveOptions) {
    let h = inner.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(move |entries: js_sys::Array, _: IntersectionObserver| {
        let entries: Vec<IntersectionEntry> = entries
            .iter()
            .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
            .map(|entry| IntersectionEntry { key: reveal_key(&entry.target()), intersecting: entry.is_intersecting() })
            .collect();
        dispatch(&h, PageEvent::Intersected(entries), None);
    });

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin);
    let Ok(observer) = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) else { return };
    callback.forget();

    for (i, el) in select_all(&inner.doc, selector).into_iter().enumerate() {
        let _ = el.set_attribute(REVEAL_ATTR, &i.to_string());
        observer.observe(&el);
    }
    *inner.observer.borrow_mut() = Some(observer);
}

fn reveal_key(el: &Element) -> String {
    format!(r#"[{REVEAL_ATTR}="{}"]"#, el.get_attribute(REVEAL_ATTR).unwrap_or_default())
}
