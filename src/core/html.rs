// src/core/html.rs
// Low-level HTML scanning helpers.
// Not a DOM: tag names are matched case-insensitively on ASCII,
// and positions always index into the original text.

use super::sanitize::{decode_entities, normalize_ws};

/// Lowercases ASCII only, so byte offsets line up with the original.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// A tag block located in a document.
///
/// `start..end` spans `<tag ...>` through `</tag>`; `inner_start..inner_end`
/// is what lies between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub inner_start: usize,
    pub inner_end: usize,
    pub end: usize,
}

/// Source text paired with its lowercase shadow.
pub struct Doc<'a> {
    src: &'a str,
    lc: String,
}

impl<'a> Doc<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, lc: to_lower(src) }
    }

    pub fn src(&self) -> &'a str { self.src }

    pub fn slice(&self, from: usize, to: usize) -> &'a str { &self.src[from..to] }

    /// Next `<tag` at or after `from`, followed by whitespace, `>` or `/`,
    /// so `<th` never matches `<thead`.
    pub fn find_open(&self, tag: &str, from: usize) -> Option<usize> {
        self.find_tag(&join!("<", tag), from)
    }

    /// Next `</tag` at or after `from`.
    pub fn find_close(&self, tag: &str, from: usize) -> Option<usize> {
        self.find_tag(&join!("</", tag), from)
    }

    fn find_tag(&self, pat: &str, from: usize) -> Option<usize> {
        let mut pos = from;
        loop {
            let at = self.lc.get(pos..)?.find(pat)? + pos;
            let after = at + pat.len();
            match self.lc.as_bytes().get(after) {
                None => return None,
                Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(at),
                Some(_) => pos = after,
            }
        }
    }

    /// Index just past the `>` closing the tag opened at `start`.
    /// Quoted attribute values may contain `>`.
    pub fn open_tag_end(&self, start: usize) -> Option<usize> {
        let b = self.src.as_bytes();
        let mut i = start + 1;
        let mut in_s = false;
        let mut in_d = false;
        while i < b.len() {
            match b[i] {
                b'\'' if !in_d => in_s = !in_s,
                b'"' if !in_s => in_d = !in_d,
                b'>' if !in_s && !in_d => return Some(i + 1),
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Next complete `<tag>…</tag>` block from `from`, honouring nesting of the
    /// same tag. `limit` bounds the search (exclusive).
    pub fn next_block(&self, tag: &str, from: usize, limit: usize) -> Option<Block> {
        let start = self.find_open(tag, from).filter(|&s| s < limit)?;
        let inner_start = self.open_tag_end(start)?;
        let mut depth = 1usize;
        let mut pos = inner_start;
        loop {
            let close = self.find_close(tag, pos).filter(|&c| c < limit)?;
            match self.find_open(tag, pos).filter(|&o| o < close) {
                Some(open) => {
                    depth += 1;
                    pos = self.open_tag_end(open)?;
                }
                None => {
                    depth -= 1;
                    let end = self.open_tag_end(close)?;
                    if depth == 0 {
                        return Some(Block { start, inner_start, inner_end: close, end });
                    }
                    pos = end;
                }
            }
        }
    }

    /// All top-level blocks of `tag` inside `from..limit`, in document order.
    pub fn blocks(&self, tag: &str, from: usize, limit: usize) -> Vec<Block> {
        let mut out = Vec::new();
        let mut pos = from;
        while let Some(b) = self.next_block(tag, pos, limit) {
            pos = b.end;
            out.push(b);
        }
        out
    }

    /// Visible text of `from..to`: tags removed, entities decoded, whitespace collapsed.
    pub fn text(&self, from: usize, to: usize) -> String {
        strip_tags(&self.src[from..to])
    }
}

/// Remove `<...>` tags, decode entities, collapse whitespace.
/// Line-breaking and cell-level tags read as a space; inline tags vanish.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut tag = s!();
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => { in_tag = true; tag.clear(); }
            '>' if in_tag => {
                in_tag = false;
                if is_separator(&tag) { out.push(' '); }
            }
            _ if in_tag => tag.push(ch),
            _ => out.push(ch),
        }
    }
    normalize_ws(&decode_entities(&out))
}

const SEPARATORS: &[&str] = &["br", "p", "div", "li", "tr", "td", "th", "table"];

fn is_separator(tag: &str) -> bool {
    let name = tag.trim_start_matches('/');
    let name = name
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");
    SEPARATORS.iter().any(|s| s.eq_ignore_ascii_case(name))
}
