//! Scanning primitives for boundary inference

/// Locate the group enclosed by the paren at `open`. Returns the enclosed
/// text and the offset just past the closing paren, or [None] if `open` does
/// not hold a `(` or the group is never closed.
#[must_use]
pub fn enclosed(s: &str, open: usize) -> Option<(&str, usize)> {
  if !s[open..].starts_with('(') {
    return None;
  }
  let mut depth = 0usize;
  for (i, c) in s[open..].char_indices() {
    match c {
      '(' => depth += 1,
      ')' => {
        depth -= 1;
        if depth == 0 {
          return Some((&s[open + 1..open + i], open + i + 1));
        }
      },
      _ => (),
    }
  }
  None
}

/// Split on whitespace, keeping balanced paren groups in a single token.
/// Every token is returned with its byte offset in `s`. An unbalanced paren
/// is ordinary text.
///
/// `(foo bar) baz` yields `(foo bar)` and `baz`
#[must_use]
pub fn token_splits(s: &str) -> Vec<(usize, &str)> {
  let mut tokens = Vec::new();
  let mut start = None;
  let mut i = 0;
  while let Some(c) = s[i..].chars().next() {
    if c.is_whitespace() {
      if let Some(st) = start.take() {
        tokens.push((st, &s[st..i]));
      }
      i += c.len_utf8();
      continue;
    }
    start.get_or_insert(i);
    i = match c {
      '(' => enclosed(s, i).map_or(i + 1, |(_, end)| end),
      _ => i + c.len_utf8(),
    };
  }
  if let Some(st) = start {
    tokens.push((st, &s[st..]));
  }
  tokens
}

/// First occurrence of `needle` at or after `from`, ignoring ASCII case
#[must_use]
pub fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
  let tail = haystack.get(from..)?;
  if needle.is_empty() {
    return Some(from);
  }
  let nb = needle.as_bytes();
  (tail.char_indices())
    .map(|(i, _)| i)
    .find(|i| tail.as_bytes().get(*i..*i + nb.len()).is_some_and(|w| w.eq_ignore_ascii_case(nb)))
    .map(|i| from + i)
}

/// First place at or after `from` where the pattern text `text` could be
/// matched, ignoring ASCII case. Blanks at either end of `text` stand for
/// any run of whitespace, so the trimmed body is searched for and checked
/// for whitespace on the sides where `text` has blanks. If `text` has a
/// leading blank the returned offset is the start of the whitespace before
/// the body.
#[must_use]
pub fn find_text(s: &str, text: &str, from: usize) -> Option<usize> {
  let body = text.trim();
  let lead = text.starts_with(char::is_whitespace);
  let trail = text.ends_with(char::is_whitespace);
  let mut search = from;
  loop {
    let at = find_ci(s, body, search)?;
    let end = at + body.len();
    let before_ok = !lead || at == from || s[..at].ends_with(char::is_whitespace);
    let after_ok = !trail || end == s.len() || s[end..].starts_with(char::is_whitespace);
    if before_ok && after_ok {
      return Some(if lead { from + s[from..at].trim_end().len() } else { at });
    }
    search = at + s[at..].chars().next().map_or(1, char::len_utf8);
  }
}

/// Whether `haystack` continues with `needle` at `at`, ignoring ASCII case
#[must_use]
pub fn starts_with_ci(haystack: &str, needle: &str, at: usize) -> bool {
  let nb = needle.as_bytes();
  haystack.as_bytes().get(at..at + nb.len()).is_some_and(|w| w.eq_ignore_ascii_case(nb))
}
