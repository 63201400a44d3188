use rand::Rng;
use tracing::{debug, error, info};

use crate::api::MediaSource;
use crate::config::FeedConfig;
use crate::credential::{resolve_credential, PageLocation};
use crate::error::FeedResult;
use crate::render::render_cards;
use crate::select::{select_and_render, SelectionRules};
use crate::storage::CredentialStore;

/// A region of the page whose markup can be read and replaced wholesale.
pub trait Container {
    fn inner_html(&self) -> String;
    fn set_inner_html(&mut self, html: &str);
}

/// The bits of the document the feed touches.
pub trait Document {
    type Container: Container;
    fn container(&mut self, selector: &str) -> Option<&mut Self::Container>;
    /// CSS pixels.
    fn viewport_width(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// No container on this page.
    Disabled,
    NoCredential,
    /// Nothing displayable came back; the original markup stands.
    KeptOriginal,
    Swapped { cards: usize },
    /// The attempt failed and the snapshot was written back.
    Restored,
    AlreadyRan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Idle,
    Resolving,
    Fetching,
    Done(FeedOutcome),
}

/// One substitution attempt per page load.
pub struct MediaFeed<S> {
    source: S,
    config: FeedConfig,
    state: FeedState,
}

impl<S: MediaSource> MediaFeed<S> {
    pub fn new(source: S, config: FeedConfig) -> Self {
        Self { source, config, state: FeedState::Idle }
    }

    pub fn state(&self) -> &FeedState { &self.state }

    pub async fn run<D: Document>(&mut self, doc: &mut D, location: &mut dyn PageLocation, store: &dyn CredentialStore) -> FeedOutcome {
        let mut rng = rand::thread_rng();
        self.run_with_rng(doc, location, store, &mut rng).await
    }

    pub async fn run_with_rng<D: Document, R: Rng + ?Sized>(
        &mut self,
        doc: &mut D,
        location: &mut dyn PageLocation,
        store: &dyn CredentialStore,
        rng: &mut R,
    ) -> FeedOutcome {
        if self.state != FeedState::Idle {
            return FeedOutcome::AlreadyRan;
        }
        let outcome = self.attempt(doc, location, store, rng).await;
        debug!(?outcome, "media feed finished");
        self.state = FeedState::Done(outcome.clone());
        outcome
    }

    async fn attempt<D: Document, R: Rng + ?Sized>(
        &mut self,
        doc: &mut D,
        location: &mut dyn PageLocation,
        store: &dyn CredentialStore,
        rng: &mut R,
    ) -> FeedOutcome {
        let narrow = self.config.is_narrow(doc.viewport_width());
        let Some(container) = doc.container(&self.config.container_selector) else {
            return FeedOutcome::Disabled;
        };
        let snapshot = container.inner_html();

        self.state = FeedState::Resolving;
        let credential = resolve_credential(&self.config.credential_keys(), location, store);
        if credential.is_empty() {
            return FeedOutcome::NoCredential;
        }

        self.state = FeedState::Fetching;
        match self.fetch_markup(&credential, narrow, rng).await {
            Ok(None) => FeedOutcome::KeptOriginal,
            Ok(Some((markup, cards))) => {
                container.set_inner_html(&markup);
                info!(cards, "media feed swapped in");
                FeedOutcome::Swapped { cards }
            }
            Err(e) => {
                error!(error = %e, "failed to load Instagram media");
                container.set_inner_html(&snapshot);
                FeedOutcome::Restored
            }
        }
    }

    async fn fetch_markup<R: Rng + ?Sized>(&self, credential: &str, narrow: bool, rng: &mut R) -> FeedResult<Option<(String, usize)>> {
        let batch = self.source.fetch_media(credential, self.config.limit).await?;
        if batch.is_empty() {
            return Ok(None);
        }
        let cards = select_and_render(&batch, narrow, &SelectionRules::from(&self.config), rng);
        if cards.is_empty() {
            return Ok(None);
        }
        Ok(Some((render_cards(&cards), cards.len())))
    }
}

/// A single container plus a fixed viewport width.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    selector: String,
    container: Option<MemoryContainer>,
    width: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryContainer {
    html: String,
    writes: usize,
}

impl MemoryContainer {
    pub fn html(&self) -> &str { &self.html }
    pub fn writes(&self) -> usize { self.writes }
}

impl Container for MemoryContainer {
    fn inner_html(&self) -> String { self.html.clone() }

    fn set_inner_html(&mut self, html: &str) {
        self.html = html.to_string();
        self.writes += 1;
    }
}

impl MemoryDocument {
    pub fn new(selector: impl Into<String>, html: impl Into<String>, width: u32) -> Self {
        Self { selector: selector.into(), container: Some(MemoryContainer { html: html.into(), writes: 0 }), width: f64::from(width) }
    }

    pub fn without_container(width: u32) -> Self {
        Self { selector: String::new(), container: None, width: f64::from(width) }
    }

    /// Same document at a fractional viewport width.
    pub fn with_viewport(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn container_ref(&self) -> Option<&MemoryContainer> { self.container.as_ref() }
}

impl Document for MemoryDocument {
    type Container = MemoryContainer;

    fn container(&mut self, selector: &str) -> Option<&mut MemoryContainer> {
        if selector == self.selector { self.container.as_mut() } else { None }
    }

    fn viewport_width(&self) -> f64 { self.width }
}
