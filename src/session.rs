//! Watch session
//!
//! One coordinating loop owns the document, the configuration and the
//! current list snapshot. Change notifications arrive as `Trigger`s on a
//! channel; document edits are debounced, list and config changes reload
//! and re-resolve straight away. The resolver only ever sees a complete
//! snapshot: reloads build a new one and swap it in.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debounce::{Debouncer, TaskHandle};
use crate::display::{line_ranges, Decorations, Display};
use crate::error::Result;
use crate::highlight::resolve;
use crate::loader::{load_snapshot, read_text, ListSnapshot};
use crate::terminal::{spawn_input_thread, Terminal};
use crate::watcher::{SourceWatcher, WatchTargets};

/// How long the loop sleeps when nothing is scheduled
const IDLE_WAIT: Duration = Duration::from_millis(500);

/// Something that may require new highlights or a redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The document changed on disk
    DocumentChanged,
    /// The configuration file changed
    ConfigChanged,
    /// A list source changed
    ListsChanged,
    /// The user asked for a full reload
    Refresh,
    /// The terminal was resized
    Resize,
    /// Scroll by lines
    Scroll(isize),
    /// Scroll by screens
    Page(isize),
    /// Leave the session
    Quit,
}

/// What the loop should do after handling a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing visible changed
    Idle,
    /// Highlights or text changed; redraw
    Redraw,
    /// The set of watched files changed; rewatch, then redraw
    Rewatch,
    /// Stop the loop
    Quit,
}

/// Highlighting state for one document
pub struct Session {
    config_path: PathBuf,
    document: PathBuf,
    config: Config,
    snapshot: Arc<ListSnapshot>,
    text: String,
    decorations: Decorations,
    debouncer: Debouncer,
    pending: Option<TaskHandle>,
    /// Why the last config reload failed, if it did
    config_error: Option<String>,
}

impl Session {
    /// Load configuration, lists and document, and resolve once
    pub fn open(config_path: &Path, document: &Path) -> Result<Self> {
        let config = Config::load(config_path)?;
        let snapshot = load_snapshot(&config, &Config::base_dir(config_path));
        let text = read_text(document)?;
        let debouncer = Debouncer::new(Duration::from_millis(config.refresh_delay_ms));

        let mut session = Self {
            config_path: config_path.to_path_buf(),
            document: document.to_path_buf(),
            config,
            snapshot,
            text,
            decorations: Decorations::default(),
            debouncer,
            pending: None,
            config_error: None,
        };
        session.resolve_now();
        Ok(session)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn snapshot(&self) -> &Arc<ListSnapshot> {
        &self.snapshot
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// Latest warning or error worth showing the user
    pub fn status(&self) -> Option<&str> {
        self.config_error
            .as_deref()
            .or_else(|| self.snapshot.warnings.last().map(String::as_str))
    }

    pub fn is_resolve_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Files that should be watched for this session
    pub fn watch_targets(&self) -> WatchTargets {
        WatchTargets::new(
            &self.document,
            Some(self.config_path.as_path()),
            &self.snapshot.sources(),
        )
    }

    /// Name shown in the status line
    pub fn title(&self) -> String {
        self.document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.document.display().to_string())
    }

    /// Handle a data trigger; view triggers are left to the caller
    pub fn handle(&mut self, trigger: Trigger, now: Instant) -> Step {
        match trigger {
            Trigger::DocumentChanged => {
                if self.reread_document() {
                    self.pending = Some(self.debouncer.schedule(now));
                }
                Step::Idle
            }
            Trigger::ListsChanged => {
                self.reload_lists();
                self.resolve_now();
                Step::Redraw
            }
            Trigger::ConfigChanged => {
                let before = self.watch_targets();
                self.reload_config();
                self.reload_lists();
                self.resolve_now();
                if self.watch_targets() == before {
                    Step::Redraw
                } else {
                    Step::Rewatch
                }
            }
            Trigger::Refresh => {
                let before = self.watch_targets();
                self.reload_config();
                self.reload_lists();
                self.reread_document();
                self.resolve_now();
                if self.watch_targets() == before {
                    Step::Redraw
                } else {
                    Step::Rewatch
                }
            }
            Trigger::Quit => Step::Quit,
            Trigger::Resize | Trigger::Scroll(_) | Trigger::Page(_) => Step::Redraw,
        }
    }

    /// Run the debounced resolve if it is due
    pub fn poll_due(&mut self, now: Instant) -> bool {
        match self.debouncer.take_due(now) {
            Some(handle) if self.pending == Some(handle) => {
                self.resolve_now();
                true
            }
            _ => false,
        }
    }

    /// Time until the debounced resolve is due
    pub fn next_timeout(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    /// Resolve immediately, dropping any pending debounced resolve
    pub fn resolve_now(&mut self) {
        self.debouncer.cancel();
        self.pending = None;

        let started = Instant::now();
        let buckets = resolve(&self.text, self.snapshot.lists());
        self.decorations = Decorations::new(&self.snapshot, &buckets);
        tracing::debug!(
            "Resolved {} spans over {} lists in {:?}",
            self.decorations.spans().len(),
            self.snapshot.len(),
            started.elapsed()
        );
    }

    fn reload_config(&mut self) {
        match Config::load(&self.config_path) {
            Ok(config) => {
                self.debouncer.set_delay(Duration::from_millis(config.refresh_delay_ms));
                self.config = config;
                self.config_error = None;
                tracing::info!("Reloaded config {}", self.config_path.display());
            }
            Err(e) => {
                // Keep highlighting with the last good configuration
                tracing::warn!("{}", e);
                self.config_error = Some(e.to_string());
            }
        }
    }

    fn reload_lists(&mut self) {
        self.snapshot = load_snapshot(&self.config, &Config::base_dir(&self.config_path));
    }

    fn reread_document(&mut self) -> bool {
        match read_text(&self.document) {
            Ok(text) => {
                self.text = text;
                true
            }
            Err(e) => {
                // Often transient while an editor replaces the file
                tracing::debug!("Cannot read {}: {}", self.document.display(), e);
                false
            }
        }
    }
}

/// Show `document` full-screen and keep its highlights current until quit
pub fn watch(config_path: &Path, document: &Path) -> Result<()> {
    let mut session = Session::open(config_path, document)?;
    let (tx, rx) = mpsc::channel();

    let mut watcher = SourceWatcher::new(session.watch_targets(), tx.clone())?;
    let mut terminal = Terminal::new()?;
    let _input = spawn_input_thread(tx.clone());
    let mut display = Display::new();

    terminal.clear_screen()?;
    draw(&mut display, &mut terminal, &session)?;

    loop {
        if session.poll_due(Instant::now()) {
            draw(&mut display, &mut terminal, &session)?;
        }

        let timeout = session.next_timeout(Instant::now()).unwrap_or(IDLE_WAIT);
        let trigger = match rx.recv_timeout(timeout) {
            Ok(trigger) => trigger,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let line_count = line_ranges(session.text()).len();
        match trigger {
            Trigger::Resize => {
                terminal.update_size()?;
                terminal.clear_screen()?;
            }
            Trigger::Scroll(delta) => display.scroll(delta, line_count),
            Trigger::Page(pages) => {
                let page = terminal.rows().saturating_sub(2).max(1) as isize;
                display.scroll(pages.saturating_mul(page), line_count);
            }
            _ => {}
        }

        match session.handle(trigger, Instant::now()) {
            Step::Idle => {}
            Step::Redraw => draw(&mut display, &mut terminal, &session)?,
            Step::Rewatch => {
                let targets = session.watch_targets();
                if &targets != watcher.targets() {
                    // Drop the old watcher first so its thread stops sending
                    drop(watcher);
                    watcher = SourceWatcher::new(targets, tx.clone())?;
                }
                draw(&mut display, &mut terminal, &session)?;
            }
            Step::Quit => break,
        }
    }

    Ok(())
}

fn draw(display: &mut Display, terminal: &mut Terminal, session: &Session) -> Result<()> {
    match session.status() {
        Some(msg) => display.set_message(msg),
        None => display.clear_message(),
    }
    display.render(terminal, &session.title(), session.text(), session.decorations())
}
