use parking_lot::{Mutex, RwLock};
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Called with the full new text after every change.
pub type ChangeCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A text source that announces its changes.
pub trait DocumentModel: Send + Sync {
    fn text(&self) -> String;

    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId;

    /// Drop the callback registered under `id`. Returns whether it existed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// In-memory observable text buffer.
///
/// Callbacks run on the thread that made the edit, after the edit is visible
/// and with no internal lock held.
#[derive(Default)]
pub struct Document {
    text: RwLock<String>,
    listeners: Mutex<Vec<(SubscriptionId, ChangeCallback)>>,
    next_id: AtomicU64,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RwLock::new(text.into()),
            ..Default::default()
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.write() = text.into();
        self.notify();
    }

    /// Insert `s` at character offset `at`, clamped to the end of the text.
    pub fn insert(&self, at: usize, s: &str) {
        self.replace(at..at, s);
    }

    /// Replace the characters in `range` with `with`. Out-of-range offsets are
    /// clamped.
    pub fn replace(&self, range: Range<usize>, with: &str) {
        {
            let mut text = self.text.write();
            let start = byte_offset(&text, range.start);
            let end = byte_offset(&text, range.end.max(range.start));
            text.replace_range(start..end, with);
        }
        self.notify();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn notify(&self) {
        let text = self.text.read().clone();
        let listeners: Vec<ChangeCallback> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in listeners {
            callback(&text);
        }
    }
}

impl DocumentModel for Document {
    fn text(&self) -> String {
        self.text.read().clone()
    }

    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}
