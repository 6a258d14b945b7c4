use colored::Colorize;
use std::fmt;

/// A run of display text, flagged when it matched the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: false,
        }
    }

    fn hit(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: true,
        }
    }
}

/// Split `text` around every non-overlapping, case-insensitive occurrence
/// of `query`. Segment text keeps the original casing.
///
/// Matching runs on `str::to_lowercase` of both sides, the same folding the
/// search filter uses, so every record that matches gets a marked segment.
/// A hit that ends inside a char's lowercase expansion marks the whole char.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::plain(text)]
        };
    }

    let lowered = text.to_lowercase();
    let boundaries = char_boundaries(text);

    let mut segments = Vec::new();
    let mut plain_start = 0;
    for (low_start, hit) in lowered.match_indices(needle.as_str()) {
        let start = original_floor(&boundaries, low_start);
        let end = original_ceil(&boundaries, low_start + hit.len(), text.len());
        if start < plain_start || start == end {
            continue;
        }
        if plain_start < start {
            segments.push(Segment::plain(&text[plain_start..start]));
        }
        segments.push(Segment::hit(&text[start..end]));
        plain_start = end;
    }

    if plain_start < text.len() {
        segments.push(Segment::plain(&text[plain_start..]));
    }
    segments
}

/// `(lowered offset, original offset)` at every char boundary of `text`,
/// ending with the pair for the end of the string.
fn char_boundaries(text: &str) -> Vec<(usize, usize)> {
    let mut boundaries = Vec::with_capacity(text.len() + 1);
    let mut lowered = 0;
    for (offset, c) in text.char_indices() {
        boundaries.push((lowered, offset));
        lowered += c.to_lowercase().map(char::len_utf8).sum::<usize>();
    }
    boundaries.push((lowered, text.len()));
    boundaries
}

fn original_floor(boundaries: &[(usize, usize)], lowered: usize) -> usize {
    match boundaries.binary_search_by_key(&lowered, |&(low, _)| low) {
        Ok(i) => boundaries[i].1,
        Err(i) => boundaries[i.saturating_sub(1)].1,
    }
}

fn original_ceil(boundaries: &[(usize, usize)], lowered: usize, text_len: usize) -> usize {
    match boundaries.binary_search_by_key(&lowered, |&(low, _)| low) {
        Ok(i) => boundaries[i].1,
        Err(i) => boundaries.get(i).map_or(text_len, |&(_, orig)| orig),
    }
}

/// Terminal rendering of highlighted segments.
pub struct Highlighted<'a>(pub &'a [Segment]);

impl fmt::Display for Highlighted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.0 {
            if segment.matched {
                write!(f, "{}", segment.text.as_str().bold().yellow())?;
            } else {
                f.write_str(&segment.text)?;
            }
        }
        Ok(())
    }
}
