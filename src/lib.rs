//! phrasemark - highlight configured words and phrases
//!
//! The core is [`highlight::resolve`]: given document text and word lists
//! in priority order, it returns one bucket of disjoint spans per list.
//! Everything else loads lists, watches files and draws the result.

pub mod cli;
pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod highlight;
pub mod loader;
pub mod logging;
pub mod session;
pub mod terminal;
pub mod watcher;

pub use error::{HighlightError, Result};
pub use highlight::{resolve, Span, WordList};
pub use loader::{load_snapshot, ListSnapshot};
