//! Word and phrase highlighting
//!
//! This module provides the highlighting core:
//! - Entry compilation and scanning
//! - Word lists and their styles
//! - Priority-ordered match resolution

mod coverage;
mod entry;
mod resolver;
mod style;
mod wordlist;

pub use coverage::Coverage;
pub use entry::{Entry, EntryKind};
pub use resolver::{candidates, resolve, resolve_candidates, Candidate, Span};
pub use style::{Color, Style, GENERATED_ALPHA};
pub use wordlist::WordList;
