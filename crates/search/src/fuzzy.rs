//! Edit-distance primitives.
//!
//! All functions compare extended grapheme clusters, so a combining accent or
//! an emoji sequence counts as one unit.

use unicode_segmentation::UnicodeSegmentation;

fn graphemes(s: &str) -> Vec<&str> {
    s.graphemes(true).collect()
}

/// Calculate Levenshtein edit distance between two strings.
///
/// # Returns
/// Number of single-grapheme insertions, deletions or substitutions needed
/// to transform `a` into `b`
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a = graphemes(a);
    let b = graphemes(b);

    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows are enough without transpositions
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Optimal string alignment distance.
///
/// Like [`levenshtein_distance`] but an adjacent transposition (`ab` → `ba`)
/// costs one edit instead of two. No substring is edited more than once.
pub fn osa_distance(a: &str, b: &str) -> usize {
    let a = graphemes(a);
    let b = graphemes(b);

    let m = a.len();
    let n = b.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut d = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        d[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (d[i - 1][j] + 1).min(d[i][j - 1] + 1).min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(d[i - 2][j - 2] + 1);
            }
            d[i][j] = best;
        }
    }

    d[m][n]
}

/// Best placement of a pattern inside a longer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// Edits needed to turn the pattern into the matched span
    pub errors: usize,
    /// Grapheme index where the matched span starts
    pub start: usize,
    /// Grapheme index one past the end of the matched span
    pub end: usize,
}

/// Cheapest placement of `pattern` ending at each column of `text`.
///
/// Both inputs are grapheme slices. Skipping text before and after the span is
/// free, so `"leane"` aligns with the `"leanne"` prefix of `"leanne graham"`
/// at a cost of one. The result has `text.len() + 1` entries, entry `j` being
/// the best span that ends at `j`. Equal costs prefer the earlier start.
pub fn alignments(pattern: &[&str], text: &[&str]) -> Vec<Alignment> {
    let m = pattern.len();
    let n = text.len();

    if m == 0 {
        return (0..=n)
            .map(|j| Alignment { errors: 0, start: j, end: j })
            .collect();
    }

    // cost[i][j]: cheapest alignment of pattern[..i] with a span ending at j
    // start[i][j]: where that span begins
    let mut cost = vec![vec![0usize; n + 1]; m + 1];
    let mut start = vec![vec![0usize; n + 1]; m + 1];

    for j in 0..=n {
        start[0][j] = j;
    }
    for i in 1..=m {
        cost[i][0] = i;
    }

    for i in 1..=m {
        for j in 1..=n {
            let sub = usize::from(pattern[i - 1] != text[j - 1]);

            let mut best = (cost[i - 1][j - 1] + sub, start[i - 1][j - 1]);
            let mut consider = |candidate: (usize, usize)| {
                if candidate < best {
                    best = candidate;
                }
            };

            consider((cost[i - 1][j] + 1, start[i - 1][j]));
            consider((cost[i][j - 1] + 1, start[i][j - 1]));
            if i > 1
                && j > 1
                && pattern[i - 1] == text[j - 2]
                && pattern[i - 2] == text[j - 1]
            {
                consider((cost[i - 2][j - 2] + 1, start[i - 2][j - 2]));
            }

            (cost[i][j], start[i][j]) = best;
        }
    }

    (0..=n)
        .map(|j| Alignment {
            errors: cost[m][j],
            start: start[m][j],
            end: j,
        })
        .collect()
}

/// Find the substring of `text` closest to `pattern` under OSA distance.
///
/// Among equally cheap spans the one ending first wins.
pub fn best_alignment(pattern: &[&str], text: &[&str]) -> Alignment {
    alignments(pattern, text)
        .into_iter()
        .reduce(|best, next| if next.errors < best.errors { next } else { best })
        .unwrap_or(Alignment { errors: pattern.len(), start: 0, end: 0 })
}

/// Check if text contains all characters of query in order.
///
/// All query characters must appear in the text in the same order, but not
/// necessarily consecutively.
pub fn fuzzy_match(text: &str, query: &str) -> bool {
    let mut text_chars = text.chars();

    query
        .chars()
        .all(|query_char| text_chars.any(|c| c == query_char))
}
