//! Single-consumer queue that applies highlights on a dedicated render thread.

use crate::HighlightRange;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Paints highlight ranges. Only ever called from the render thread.
pub trait HighlightSink: Send + 'static {
    /// Replace all current highlights with `ranges`.
    fn apply_highlights(&mut self, ranges: &[HighlightRange]);

    fn clear_highlights(&mut self);
}

enum RenderCommand {
    Apply(Vec<HighlightRange>),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Owns the render thread. Clone [`RenderHandle`]s out of it to post work.
pub struct RenderQueue {
    handle: RenderHandle,
    worker: JoinHandle<()>,
}

impl RenderQueue {
    pub fn spawn<S: HighlightSink>(mut sink: S) -> io::Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let worker = thread::Builder::new()
            .name("spellmark-render".to_string())
            .spawn(move || {
                while let Some(command) = rx.blocking_recv() {
                    match command {
                        RenderCommand::Apply(ranges) => sink.apply_highlights(&ranges),
                        RenderCommand::Clear => sink.clear_highlights(),
                        RenderCommand::Flush(done) => {
                            let _ = done.send(());
                        }
                    }
                }
                debug!("render queue drained");
            })?;

        Ok(Self {
            handle: RenderHandle { tx },
            worker,
        })
    }

    pub fn handle(&self) -> RenderHandle {
        self.handle.clone()
    }

    /// Stop accepting work from this queue's own handle and wait for the
    /// thread. Blocks until every outstanding [`RenderHandle`] is dropped.
    pub fn join(self) {
        drop(self.handle);
        let _ = self.worker.join();
    }
}

/// Fire-and-forget producer side of a [`RenderQueue`].
#[derive(Clone)]
pub struct RenderHandle {
    tx: mpsc::UnboundedSender<RenderCommand>,
}

impl RenderHandle {
    pub fn apply(&self, ranges: Vec<HighlightRange>) {
        self.post(RenderCommand::Apply(ranges));
    }

    pub fn clear(&self) {
        self.post(RenderCommand::Clear);
    }

    /// Block until everything posted before this call has been applied.
    ///
    /// Returns `false` if the render thread is gone. Must not be called from
    /// the render thread itself.
    pub fn flush(&self) -> bool {
        let (done, wait) = oneshot::channel();
        if self.tx.send(RenderCommand::Flush(done)).is_err() {
            return false;
        }
        wait.blocking_recv().is_ok()
    }

    fn post(&self, command: RenderCommand) {
        if self.tx.send(command).is_err() {
            debug!("render queue closed, dropping highlight command");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Applied(Vec<HighlightRange>),
    Cleared,
}

/// Sink that keeps every command it receives; the CLI reads the latest
/// highlights from it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().clone()
    }

    /// Highlights currently painted, i.e. the last applied set unless cleared since.
    pub fn current(&self) -> Vec<HighlightRange> {
        match self.events.lock().last() {
            Some(RenderEvent::Applied(ranges)) => ranges.clone(),
            _ => Vec::new(),
        }
    }
}

impl HighlightSink for RecordingSink {
    fn apply_highlights(&mut self, ranges: &[HighlightRange]) {
        self.events.lock().push(RenderEvent::Applied(ranges.to_vec()));
    }

    fn clear_highlights(&mut self) {
        self.events.lock().push(RenderEvent::Cleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_apply_in_order() {
        let sink = RecordingSink::new();
        let queue = RenderQueue::spawn(sink.clone()).unwrap();
        let handle = queue.handle();

        handle.apply(vec![HighlightRange::new(0, 3)]);
        handle.clear();
        handle.apply(vec![HighlightRange::new(4, 9)]);
        assert!(handle.flush());

        assert_eq!(
            sink.events(),
            vec![
                RenderEvent::Applied(vec![HighlightRange::new(0, 3)]),
                RenderEvent::Cleared,
                RenderEvent::Applied(vec![HighlightRange::new(4, 9)]),
            ]
        );
        assert_eq!(sink.current(), vec![HighlightRange::new(4, 9)]);

        drop(handle);
        queue.join();
    }

    #[test]
    fn test_applies_on_render_thread() {
        struct ThreadName(Arc<Mutex<Option<String>>>);

        impl HighlightSink for ThreadName {
            fn apply_highlights(&mut self, _ranges: &[HighlightRange]) {
                *self.0.lock() = thread::current().name().map(str::to_string);
            }

            fn clear_highlights(&mut self) {}
        }

        let name = Arc::new(Mutex::new(None));
        let queue = RenderQueue::spawn(ThreadName(Arc::clone(&name))).unwrap();
        queue.handle().apply(Vec::new());
        assert!(queue.handle().flush());

        assert_eq!(name.lock().as_deref(), Some("spellmark-render"));
        queue.join();
    }
}
