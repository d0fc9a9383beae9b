//! Display rendering
//!
//! Turns resolved spans into visible output: ANSI-coloured text, plain
//! text with bracketed matches, JSON, or the full-screen watch view.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute};
use serde::Serialize;

use crate::error::Result;
use crate::highlight::{Span, Style};
use crate::loader::ListSnapshot;
use crate::terminal::{queue_style, Terminal};

/// Resolved spans paired with the style of the list that owns them
#[derive(Debug, Clone, Default)]
pub struct Decorations {
    /// Disjoint spans sorted by start offset
    spans: Vec<Span>,
    /// One style per list, index-aligned with the snapshot
    styles: Vec<Style>,
    /// Number of spans per list
    counts: Vec<usize>,
}

/// A piece of text that is either plain or covered by one span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    /// List index when highlighted
    pub list: Option<usize>,
}

impl Decorations {
    /// Pair each list's bucket with that list's style
    pub fn new(snapshot: &ListSnapshot, buckets: &[Vec<Span>]) -> Self {
        let styles = snapshot.lists().iter().map(|l| l.style).collect();
        let counts = buckets.iter().map(Vec::len).collect();
        let mut spans: Vec<Span> = buckets.iter().flatten().copied().collect();
        spans.sort_by_key(|s| s.start);
        Self {
            spans,
            styles,
            counts,
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Number of accepted spans for each list
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn style(&self, list: usize) -> Style {
        self.styles.get(list).copied().unwrap_or_default()
    }

    /// Split `[start, end)` into plain and highlighted segments
    ///
    /// Spans crossing the range edges are clipped to it.
    pub fn segments(&self, start: usize, end: usize) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut pos = start;

        let first = self.spans.partition_point(|s| s.end <= start);
        for span in &self.spans[first..] {
            if span.start >= end {
                break;
            }
            let span_start = span.start.max(start);
            let span_end = span.end.min(end);
            if span_start > pos {
                segments.push(Segment {
                    start: pos,
                    end: span_start,
                    list: None,
                });
            }
            segments.push(Segment {
                start: span_start,
                end: span_end,
                list: Some(span.list),
            });
            pos = span_end;
        }

        if pos < end {
            segments.push(Segment {
                start: pos,
                end,
                list: None,
            });
        }

        segments
    }
}

fn queue_reset<W: Write>(out: &mut W) -> Result<()> {
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Write `text` with each span painted in its list's colour
pub fn render_ansi<W: Write>(out: &mut W, text: &str, decorations: &Decorations) -> Result<()> {
    for segment in decorations.segments(0, text.len()) {
        let piece = safe_slice(text, segment.start, segment.end);
        match segment.list {
            Some(list) => {
                queue_style(out, &decorations.style(list))?;
                queue!(out, Print(piece))?;
                queue_reset(out)?;
            }
            None => queue!(out, Print(piece))?,
        }
    }
    out.flush()?;
    Ok(())
}

/// Write `text` with each span shown as `[match]{list}`
pub fn render_plain<W: Write>(out: &mut W, text: &str, decorations: &Decorations) -> Result<()> {
    for segment in decorations.segments(0, text.len()) {
        let piece = safe_slice(text, segment.start, segment.end);
        match segment.list {
            Some(list) => write!(out, "[{}]{{{}}}", piece, list)?,
            None => out.write_all(piece.as_bytes())?,
        }
    }
    out.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    lists: Vec<JsonList<'a>>,
}

#[derive(Serialize)]
struct JsonList<'a> {
    index: usize,
    path: String,
    color: String,
    enabled: bool,
    spans: Vec<JsonSpan<'a>>,
}

#[derive(Serialize)]
struct JsonSpan<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

/// Write the resolved spans as a JSON document, one entry per list
pub fn render_json<W: Write>(
    out: &mut W,
    text: &str,
    snapshot: &ListSnapshot,
    buckets: &[Vec<Span>],
) -> Result<()> {
    let lists = snapshot
        .loaded()
        .iter()
        .zip(buckets)
        .enumerate()
        .map(|(index, (loaded, bucket))| JsonList {
            index,
            path: loaded.source.display().to_string(),
            color: loaded.color.to_string(),
            enabled: loaded.list.enabled,
            spans: bucket
                .iter()
                .map(|span| JsonSpan {
                    start: span.start,
                    end: span.end,
                    text: span.text(text).unwrap_or_default(),
                })
                .collect(),
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &JsonReport { lists })?;
    writeln!(out)?;
    Ok(())
}

/// Full-screen view of one highlighted document
pub struct Display {
    /// First document line shown
    top_line: usize,
    /// Message shown in the status line
    message: Option<String>,
}

impl Display {
    pub fn new() -> Self {
        Self {
            top_line: 0,
            message: None,
        }
    }

    /// Set a message to display
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    /// Scroll by `delta` lines, staying within the document
    pub fn scroll(&mut self, delta: isize, line_count: usize) {
        let max_top = line_count.saturating_sub(1);
        self.top_line = self.top_line.saturating_add_signed(delta).min(max_top);
    }

    /// Draw the document and status line
    pub fn render(
        &mut self,
        terminal: &mut Terminal,
        title: &str,
        text: &str,
        decorations: &Decorations,
    ) -> Result<()> {
        let cols = terminal.cols() as usize;
        let text_rows = terminal.rows().saturating_sub(1) as usize;

        let lines = line_ranges(text);
        self.top_line = self.top_line.min(lines.len().saturating_sub(1));

        for row in 0..text_rows {
            terminal.move_cursor(row as u16, 0)?;
            match lines.get(self.top_line + row) {
                Some(&(start, end)) => {
                    self.render_line(terminal, text, start, end, cols, decorations)?;
                }
                None => {
                    terminal.set_dim(true)?;
                    terminal.write_char('~')?;
                    terminal.set_dim(false)?;
                }
            }
            terminal.clear_to_eol()?;
        }

        self.render_status_line(terminal, title, decorations, lines.len(), text_rows as u16, cols)?;
        terminal.flush()?;
        Ok(())
    }

    /// Render one line, clipped to the terminal width
    fn render_line(
        &self,
        terminal: &mut Terminal,
        text: &str,
        start: usize,
        end: usize,
        max_cols: usize,
        decorations: &Decorations,
    ) -> Result<()> {
        let mut remaining = max_cols;

        for segment in decorations.segments(start, end) {
            if remaining == 0 {
                break;
            }
            let piece = safe_slice(text, segment.start, segment.end);
            let (shown, width) = truncate_to_width(&piece.replace('\t', "    "), remaining);
            remaining -= width;

            match segment.list {
                Some(list) => {
                    terminal.apply_style(&decorations.style(list))?;
                    terminal.write_str(&shown)?;
                    terminal.reset_attributes()?;
                }
                None => terminal.write_str(&shown)?,
            }
        }

        Ok(())
    }

    fn render_status_line(
        &self,
        terminal: &mut Terminal,
        title: &str,
        decorations: &Decorations,
        line_count: usize,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        terminal.set_reverse(true)?;

        let counts: Vec<String> = decorations
            .counts()
            .iter()
            .enumerate()
            .map(|(i, n)| format!("{}:{}", i, n))
            .collect();

        let mut status = format!(
            "-- phrasemark: {} L{}/{} [{}]",
            title,
            (self.top_line + 1).min(line_count.max(1)),
            line_count,
            counts.join(" ")
        );
        match &self.message {
            Some(msg) => {
                status.push_str(" -- ");
                status.push_str(msg);
            }
            None => status.push_str(" -- q quit, r reload"),
        }

        let (shown, width) = truncate_to_width(&status, cols);
        terminal.write_str(&shown)?;
        if width < cols {
            terminal.write_str(&"-".repeat(cols - width))?;
        }
        terminal.set_reverse(false)?;

        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte ranges of each line, excluding the line terminator
pub fn line_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches('\n').trim_end_matches('\r');
        ranges.push((start, start + content.len()));
        start += line.len();
    }

    if ranges.is_empty() {
        ranges.push((0, 0));
    }
    ranges
}

/// Truncate a string to fit within a display width
///
/// Returns the kept prefix and its width.
fn truncate_to_width(s: &str, max_width: usize) -> (String, usize) {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    (result, width)
}

/// UTF-8 safe slice from start to end byte offset
fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let start = find_safe_boundary(s, start, true);
    let end = find_safe_boundary(s, end, false).max(start);
    &s[start..end]
}

/// Find a safe UTF-8 boundary near the given byte offset
/// If forward is true, search forward; otherwise search backward
fn find_safe_boundary(s: &str, offset: usize, forward: bool) -> usize {
    if offset >= s.len() {
        return s.len();
    }
    if s.is_char_boundary(offset) {
        return offset;
    }

    if forward {
        (offset..=s.len())
            .find(|&i| s.is_char_boundary(i))
            .unwrap_or(s.len())
    } else {
        (0..offset).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
    }
}
