//! Greedy leftmost-longest grouping of the live window.
//!
//! Starting at the first stroke, the longest slice (up to the window size)
//! that the dictionary knows becomes one group; then grouping continues
//! after it. A stroke nothing matches becomes a group of its own, rendered
//! as digits for number strokes or as its canonical notation otherwise.

use std::sync::Arc;

use crate::numbers::number_text;
use crate::stroke::Stroke;
use crate::translation::Translation;

/// A run of consecutive strokes resolved to one translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub stroke_count: usize,
    pub translation: Arc<Translation>,
}

/// Knobs for [`group_strokes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Longest slice to try (`W`).
    pub window: usize,
    /// Retry misses with `-G -S -D -Z` split off the last stroke.
    pub fold_suffix_keys: bool,
    /// Render unmatched number-bar strokes as digits.
    pub numbers: bool,
}

/// Group `strokes` greedily. `lookup` resolves an exact stroke slice.
pub fn group_strokes<F>(strokes: &[Stroke], options: GroupingOptions, mut lookup: F) -> Vec<Resolved>
where
    F: FnMut(&[Stroke]) -> Option<Arc<Translation>>,
{
    let mut groups = Vec::new();
    let mut scratch: Vec<Stroke> = Vec::with_capacity(options.window);
    let mut i = 0;

    while i < strokes.len() {
        let longest = options.window.min(strokes.len() - i);
        let found = (1..=longest).rev().find_map(|len| {
            let slice = &strokes[i..i + len];
            if let Some(translation) = lookup(slice) {
                return Some((len, translation));
            }
            if options.fold_suffix_keys {
                if let Some(translation) = lookup_folded(slice, &mut scratch, &mut lookup) {
                    return Some((len, translation));
                }
            }
            None
        });

        let (stroke_count, translation) =
            found.unwrap_or_else(|| (1, Arc::new(fallback(strokes[i], options.numbers))));
        groups.push(Resolved {
            stroke_count,
            translation,
        });
        i += stroke_count;
    }

    groups
}

/// `TEFTS` → `TEFT` + `-S` when both halves are entries.
fn lookup_folded<F>(slice: &[Stroke], scratch: &mut Vec<Stroke>, lookup: &mut F) -> Option<Arc<Translation>>
where
    F: FnMut(&[Stroke]) -> Option<Arc<Translation>>,
{
    let (&last, init) = slice.split_last()?;
    let (base, suffix) = last.split_suffix();
    if suffix.is_empty() || base.is_empty() {
        return None;
    }
    let suffix_translation = lookup(&[suffix])?;

    scratch.clear();
    scratch.extend_from_slice(init);
    scratch.push(base);
    let base_translation = lookup(scratch.as_slice())?;

    Some(Arc::new(base_translation.then(&suffix_translation)))
}

fn fallback(stroke: Stroke, numbers: bool) -> Translation {
    if numbers {
        if let Some(text) = number_text(stroke) {
            return if text.chars().all(|c| c.is_ascii_digit()) {
                Translation::glue(text)
            } else {
                Translation::literal(text)
            };
        }
    }
    Translation::literal(stroke.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn strokes(s: &str) -> Vec<Stroke> {
        s.split_whitespace().map(|p| p.parse().unwrap()).collect()
    }

    fn dict(entries: &[(&str, &str)]) -> HashMap<Vec<Stroke>, Arc<Translation>> {
        entries
            .iter()
            .map(|(k, v)| {
                let key: Vec<Stroke> = k.split('/').map(|p| p.parse().unwrap()).collect();
                (key, Arc::new(Translation::parse(v)))
            })
            .collect()
    }

    fn options(window: usize) -> GroupingOptions {
        GroupingOptions {
            window,
            fold_suffix_keys: true,
            numbers: true,
        }
    }

    fn counts(groups: &[Resolved]) -> Vec<usize> {
        groups.iter().map(|g| g.stroke_count).collect()
    }

    #[test]
    fn longest_match_wins() {
        let d = dict(&[("KAT", "cat"), ("KAT/-S", "cats"), ("-S", "{^s}")]);
        let groups = group_strokes(&strokes("KAT -S"), options(2), |s| d.get(s).cloned());
        assert_eq!(counts(&groups), vec![2]);
        assert_eq!(*groups[0].translation, Translation::parse("cats"));
    }

    #[test]
    fn window_limits_match_length() {
        let d = dict(&[("KAT", "cat"), ("KAT/-S", "cats"), ("-S", "{^s}")]);
        let groups = group_strokes(&strokes("KAT -S"), options(1), |s| d.get(s).cloned());
        assert_eq!(counts(&groups), vec![1, 1]);
    }

    #[test]
    fn unmatched_stroke_is_literal() {
        let d = dict(&[]);
        let groups = group_strokes(&strokes("TEFT"), options(1), |s| d.get(s).cloned());
        assert_eq!(*groups[0].translation, Translation::literal("TEFT"));
    }

    #[test]
    fn suffix_keys_fold() {
        let d = dict(&[("TEFT", "test"), ("-S", "{^s}")]);
        let groups = group_strokes(&strokes("TEFTS"), options(1), |s| d.get(s).cloned());
        assert_eq!(counts(&groups), vec![1]);
        assert_eq!(
            *groups[0].translation,
            Translation::parse("test").then(&Translation::parse("{^s}"))
        );

        let off = GroupingOptions {
            fold_suffix_keys: false,
            ..options(1)
        };
        let groups = group_strokes(&strokes("TEFTS"), off, |s| d.get(s).cloned());
        assert_eq!(*groups[0].translation, Translation::literal("TEFTS"));
    }

    #[test]
    fn exact_entry_beats_fold() {
        let d = dict(&[("TEFT", "test"), ("-S", "{^s}"), ("TEFTS", "tests!")]);
        let groups = group_strokes(&strokes("TEFTS"), options(1), |s| d.get(s).cloned());
        assert_eq!(*groups[0].translation, Translation::parse("tests!"));
    }

    #[test]
    fn numbers_fall_back_to_digits() {
        let d = dict(&[]);
        let groups = group_strokes(&strokes("12 -9"), options(1), |s| d.get(s).cloned());
        assert_eq!(*groups[0].translation, Translation::glue("12"));
        assert_eq!(*groups[1].translation, Translation::glue("9"));

        let groups = group_strokes(&strokes("5-DZ"), options(1), |s| d.get(s).cloned());
        assert_eq!(*groups[0].translation, Translation::literal("$500"));
    }
}
