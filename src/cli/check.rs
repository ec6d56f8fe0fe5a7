use crate::cli::output::FileReport;
use crate::dict::{DictionarySource, UserDictionary};
use crate::session::{Document, DocumentModel, RecordingSink, RenderQueue, Session};
use crate::Config;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file opened in its own session, with a recording render queue standing
/// in for an editor widget.
pub struct FileCheck {
    path: PathBuf,
    document: Arc<Document>,
    session: Session,
    queue: RenderQueue,
    sink: RecordingSink,
}

impl FileCheck {
    pub fn open(
        path: &Path,
        config: &Config,
        dictionaries: Arc<dyn DictionarySource>,
        user_dictionary: Arc<UserDictionary>,
    ) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let sink = RecordingSink::new();
        let queue = RenderQueue::spawn(sink.clone()).context("Failed to start render thread")?;
        let document = Arc::new(Document::new(text));

        let mut session = Session::new(
            document.clone(),
            Some(config.language.clone()),
            dictionaries,
            user_dictionary,
            queue.handle(),
        )
        .with_strategy(config.highlight);

        if !session.enable() {
            bail!(
                "Spell checking unavailable for language '{}' (run with -v for details)",
                config.language
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            document,
            session,
            queue,
            sink,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Highlights as painted once the render queue has caught up.
    pub fn report(&self) -> FileReport {
        self.queue.handle().flush();

        let analysis = self.session.analysis();
        let suggestions = analysis
            .misspelled
            .iter()
            .map(|word| (word.clone(), self.session.suggest(word).unwrap_or_default()))
            .collect();

        FileReport {
            path: self.path.clone(),
            text: self.document.text(),
            misspelled: analysis.misspelled,
            ranges: self.sink.current(),
            suggestions,
        }
    }

    pub fn recheck(&self) -> FileReport {
        self.session.recheck();
        self.report()
    }

    pub fn finish(self) {
        drop(self.session);
        self.queue.join();
    }
}
