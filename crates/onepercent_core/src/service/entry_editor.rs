//! Entry editing session with debounced auto-save.
//!
//! # Responsibility
//! - Hold the in-progress title/body of one entry.
//! - Coalesce a burst of edits into one write after a quiet period.
//! - Flush pending edits on `save_now` and when the editor is dropped.
//!
//! # Invariants
//! - Nothing is written before the entry has been loaded; a pre-load edit
//!   is overwritten by the stored content on load.
//! - Setting a field to its current value does not schedule a write.
//! - Only title and body are written.

use crate::model::entry::EntryId;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::RepoError;
use crate::service::debounce::Debouncer;
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Errors from entry editor operations.
#[derive(Debug)]
pub enum EditorError {
    /// The edited entry does not exist.
    EntryNotFound(EntryId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::EntryNotFound(_) => None,
        }
    }
}

impl From<RepoError> for EditorError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Editing session for one entry.
pub struct EntryEditor<'r, R: EntryRepository> {
    repo: &'r R,
    entry_id: EntryId,
    title: String,
    body: String,
    loaded: bool,
    autosave: Debouncer<()>,
}

impl<'r, R: EntryRepository> EntryEditor<'r, R> {
    /// Creates an unloaded editor. Call [`EntryEditor::load`] before edits
    /// can be persisted.
    pub fn new(repo: &'r R, entry_id: EntryId, quiet_period: Duration) -> Self {
        Self {
            repo,
            entry_id,
            title: String::new(),
            body: String::new(),
            loaded: false,
            autosave: Debouncer::new(quiet_period),
        }
    }

    /// Creates and loads an editor, failing when the entry does not exist.
    pub fn open(
        repo: &'r R,
        entry_id: EntryId,
        quiet_period: Duration,
    ) -> Result<Self, EditorError> {
        let mut editor = Self::new(repo, entry_id, quiet_period);
        if !editor.load()? {
            return Err(EditorError::EntryNotFound(entry_id));
        }
        Ok(editor)
    }

    /// Loads stored content. Returns `false` while the entry does not exist.
    pub fn load(&mut self) -> Result<bool, EditorError> {
        let Some(entry) = self.repo.get_entry(self.entry_id)? else {
            return Ok(false);
        };
        self.title = entry.title;
        self.body = entry.body;
        self.loaded = true;
        self.autosave.cancel();
        Ok(true)
    }

    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether an edit is waiting for its quiet period.
    pub fn has_pending_save(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.set_title_at(value, Instant::now());
    }

    pub fn set_body(&mut self, value: impl Into<String>) {
        self.set_body_at(value, Instant::now());
    }

    /// Sets the title as of `now`, restarting the auto-save quiet period.
    pub fn set_title_at(&mut self, value: impl Into<String>, now: Instant) {
        let value = value.into();
        if value == self.title {
            return;
        }
        self.title = value;
        self.schedule(now);
    }

    /// Sets the body as of `now`, restarting the auto-save quiet period.
    pub fn set_body_at(&mut self, value: impl Into<String>, now: Instant) {
        let value = value.into();
        if value == self.body {
            return;
        }
        self.body = value;
        self.schedule(now);
    }

    /// Writes pending edits whose quiet period has elapsed at `now`.
    ///
    /// Returns whether a write happened.
    pub fn tick(&mut self, now: Instant) -> Result<bool, EditorError> {
        if self.autosave.take_due(now).is_none() {
            return Ok(false);
        }
        self.write()?;
        Ok(true)
    }

    /// Writes current content immediately, bypassing the quiet period.
    pub fn save_now(&mut self) -> Result<(), EditorError> {
        if !self.loaded {
            return Ok(());
        }
        self.autosave.cancel();
        self.write()
    }

    fn schedule(&mut self, now: Instant) {
        if self.loaded {
            self.autosave.push((), now);
        }
    }

    fn write(&self) -> Result<(), EditorError> {
        self.repo
            .update_entry(self.entry_id, &self.title, &self.body)?;
        debug!(
            "event=entry_autosave module=service status=ok entry_id={}",
            self.entry_id
        );
        Ok(())
    }
}

impl<R: EntryRepository> Drop for EntryEditor<'_, R> {
    fn drop(&mut self) {
        if self.autosave.flush().is_none() {
            return;
        }
        if let Err(err) = self.write() {
            error!(
                "event=entry_autosave module=service status=error stage=drop entry_id={} error={}",
                self.entry_id, err
            );
        }
    }
}
