//! Per-document spell-check lifecycle.
//!
//! A [`Session`] ties a document to a dictionary, the shared user dictionary
//! and a render queue. While enabled, every document change triggers a full
//! pass; the resulting ranges are posted to the render thread.

pub mod document;
pub mod render;

pub use document::{ChangeCallback, Document, DocumentModel, SubscriptionId};
pub use render::{HighlightSink, RecordingSink, RenderEvent, RenderHandle, RenderQueue};

use crate::checker::{Analysis, HighlightStrategy, SpellChecker};
use crate::dict::{DictionarySource, UserDictionary};
use crate::{Error, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disabled,
    /// Dictionaries are loaded; the document is not being watched.
    Ready,
    Enabled,
}

/// Proof of a live change subscription. Consumed to unsubscribe.
#[must_use]
struct Subscription {
    id: SubscriptionId,
}

impl Subscription {
    fn cancel(self, document: &dyn DocumentModel) {
        if !document.unsubscribe(self.id) {
            debug!(id = ?self.id, "subscription was already gone");
        }
    }
}

/// Shared between the session and its change callback.
struct Pipeline {
    checker: SpellChecker,
    render: RenderHandle,
    /// Bumped as each pass starts, before it reads the text.
    started: AtomicU64,
    latest: Mutex<Latest>,
}

#[derive(Default)]
struct Latest {
    generation: u64,
    analysis: Analysis,
}

impl Pipeline {
    fn new(checker: SpellChecker, render: RenderHandle) -> Self {
        Self {
            checker,
            render,
            started: AtomicU64::new(0),
            latest: Mutex::new(Latest::default()),
        }
    }

    /// Check the document's current text and post the ranges.
    ///
    /// Passes may overlap when edits arrive on several threads. A pass that
    /// finishes after a newer one has already posted is dropped, so the render
    /// queue only ever moves forward.
    fn run(&self, document: &dyn DocumentModel) {
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let text = document.text();

        // A failed reload keeps the previous words; keep checking with those.
        self.checker.user_dictionary().ensure_loaded();

        let analysis = self.checker.analyze(&text);

        let mut latest = self.latest.lock();
        if generation < latest.generation {
            debug!(generation, newer = latest.generation, "dropping stale spell check pass");
            return;
        }

        debug!(
            generation,
            misspelled = analysis.misspelled.len(),
            ranges = analysis.ranges.len(),
            "spell check pass"
        );
        self.render.apply(analysis.ranges.clone());
        *latest = Latest {
            generation,
            analysis,
        };
    }
}

enum Mode {
    Disabled,
    Ready(Arc<Pipeline>),
    Enabled {
        pipeline: Arc<Pipeline>,
        subscription: Subscription,
    },
}

pub struct Session {
    document: Arc<dyn DocumentModel>,
    locale: Option<String>,
    dictionaries: Arc<dyn DictionarySource>,
    user_dictionary: Arc<UserDictionary>,
    render: RenderHandle,
    strategy: HighlightStrategy,
    mode: Mode,
}

impl Session {
    pub fn new(
        document: Arc<dyn DocumentModel>,
        locale: Option<String>,
        dictionaries: Arc<dyn DictionarySource>,
        user_dictionary: Arc<UserDictionary>,
        render: RenderHandle,
    ) -> Self {
        Self {
            document,
            locale,
            dictionaries,
            user_dictionary,
            render,
            strategy: HighlightStrategy::default(),
            mode: Mode::Disabled,
        }
    }

    pub fn with_strategy(mut self, strategy: HighlightStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn state(&self) -> SessionState {
        match self.mode {
            Mode::Disabled => SessionState::Disabled,
            Mode::Ready(_) => SessionState::Ready,
            Mode::Enabled { .. } => SessionState::Enabled,
        }
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Load the dictionary and the user dictionary without watching the
    /// document, so that single words can be queried.
    pub fn initialize(&mut self) -> bool {
        if !matches!(self.mode, Mode::Disabled) {
            return true;
        }

        match self.open_logged() {
            Some(pipeline) => {
                self.mode = Mode::Ready(pipeline);
                true
            }
            None => false,
        }
    }

    /// Start checking the document: subscribe to its changes and highlight
    /// the current text.
    ///
    /// Returns `false`, leaving the session disabled, when the dictionaries
    /// cannot be loaded.
    pub fn enable(&mut self) -> bool {
        let pipeline = match std::mem::replace(&mut self.mode, Mode::Disabled) {
            enabled @ Mode::Enabled { .. } => {
                self.mode = enabled;
                return true;
            }
            Mode::Ready(pipeline) => pipeline,
            Mode::Disabled => match self.open_logged() {
                Some(pipeline) => pipeline,
                None => return false,
            },
        };

        let on_change = Arc::clone(&pipeline);
        let document = Arc::downgrade(&self.document);
        let id = self.document.subscribe(Arc::new(move |_text: &str| {
            if let Some(document) = document.upgrade() {
                on_change.run(&*document);
            }
        }));

        pipeline.run(&*self.document);

        self.mode = Mode::Enabled {
            pipeline,
            subscription: Subscription { id },
        };
        true
    }

    /// Stop watching the document and clear its highlights.
    pub fn disable(&mut self) {
        if let Mode::Enabled { subscription, .. } = std::mem::replace(&mut self.mode, Mode::Disabled) {
            subscription.cancel(&*self.document);
            self.render.clear();
        }
    }

    /// Run a pass now, e.g. after the user dictionary changed.
    pub fn recheck(&self) -> bool {
        match &self.mode {
            Mode::Enabled { pipeline, .. } => {
                pipeline.run(&*self.document);
                true
            }
            _ => false,
        }
    }

    /// The most recent analysis, empty if no pass has run.
    pub fn analysis(&self) -> Analysis {
        self.pipeline()
            .map(|p| p.latest.lock().analysis.clone())
            .unwrap_or_default()
    }

    /// `false` when the session has no dictionary loaded.
    pub fn is_misspelled(&self, word: &str) -> bool {
        self.pipeline()
            .is_some_and(|p| p.checker.is_misspelled(word))
    }

    pub fn suggest(&self, word: &str) -> Option<Vec<String>> {
        self.pipeline().and_then(|p| p.checker.suggest(word))
    }

    /// Accept `word` for the rest of the process.
    pub fn ignore_word(&self, word: &str) {
        self.user_dictionary.ignore(word);
    }

    /// Accept `word` and save it to the user dictionary file.
    pub fn add_word(&self, word: &str) {
        self.user_dictionary.add(word);
    }

    fn pipeline(&self) -> Option<&Arc<Pipeline>> {
        match &self.mode {
            Mode::Disabled => None,
            Mode::Ready(pipeline) | Mode::Enabled { pipeline, .. } => Some(pipeline),
        }
    }

    fn open_logged(&self) -> Option<Arc<Pipeline>> {
        self.open()
            .map_err(|e| warn!(error = %e, locale = ?self.locale, "spell checking unavailable"))
            .ok()
    }

    fn open(&self) -> Result<Arc<Pipeline>> {
        let locale = self.locale.as_deref().ok_or(Error::LocaleMissing)?;
        let dictionary = self.dictionaries.open(locale)?;

        if !self.user_dictionary.ensure_loaded() {
            return Err(Error::UserDictionaryUnavailable {
                path: self.user_dictionary.path().to_path_buf(),
            });
        }

        let checker = SpellChecker::new(dictionary, Arc::clone(&self.user_dictionary))
            .with_strategy(self.strategy);

        Ok(Arc::new(Pipeline::new(checker, self.render.clone())))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.disable();
    }
}
