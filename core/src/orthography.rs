//! Suffix orthography: spelling changes at an attach-left boundary.
//!
//! When a suffix such as `{^s}` or `{^ing}` is attached to the previous word,
//! the rule table decides how the end of that word is respelled
//! (`cry` + `s` → `cries`, `make` + `ing` → `making`). Rules are tried in
//! order and the first match wins; with no match the two texts are simply
//! concatenated.
//!
//! A rule never edits the suffix. It produces a [`Rewrite`] of the previous
//! text's tail, so the caller can refuse rewrites that would reach into text
//! that is already frozen.

use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::StenoError;
use crate::utils::normalize;

/// Which built-in rule table to start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrthographyPolicy {
    /// Consonant-y and silent-e rules only.
    #[default]
    Minimal,
    /// The English suffix table, then the minimal rules.
    Extended,
}

/// Respelling of the previous text: drop `remove` bytes from its end, then
/// append `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub remove: usize,
    pub insert: String,
}

/// A single orthography rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrthographyRule {
    /// Consonant + `y` before `s`: `cry` + `s` → `cries`.
    ConsonantYBeforeS,
    /// Consonant + `y` before `e`: `cry` + `ed` → `cried`.
    ConsonantYBeforeE,
    /// Silent `e` before a vowel: `make` + `ing` → `making`.
    SilentE,
    /// Short vowel + `t`/`g`/`b` before `e`/`i`, or + `n` before `i`:
    /// `sit` + `ing` → `sitting`.
    DoubleConsonant,
    /// Textual rule `stem+prefix=replacement`: when the previous text ends
    /// with `stem` and the suffix starts with `prefix`, the two become
    /// `replacement` followed by the rest of the suffix.
    Replace {
        stem: String,
        prefix: String,
        replacement: String,
    },
}

const EXTENDED_TABLE: &[(&str, &str, &str)] = &[
    ("ic", "ly", "ically"),
    ("te", "ry", "tory"),
    ("t", "cy", "cy"),
    ("te", "cy", "cy"),
    ("sh", "s", "shes"),
    ("s", "s", "ses"),
    ("each", "s", "eaches"),
    ("eech", "s", "eeches"),
    ("ie", "ing", "ying"),
    ("y", "ist", "ist"),
    ("y", "ful", "iful"),
    ("te", "en", "tten"),
    ("e", "en", "en"),
    ("ee", "e", "ee"),
    ("e", "ing", "ing"),
];

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_consonant(c: char) -> bool {
    c.is_ascii_alphabetic() && !is_vowel(c) && !c.eq_ignore_ascii_case(&'y')
}

fn ends_with_ignore_case(text: &str, tail: &str) -> bool {
    text.len() >= tail.len()
        && text.is_char_boundary(text.len() - tail.len())
        && text[text.len() - tail.len()..].eq_ignore_ascii_case(tail)
}

fn starts_with_ignore_case(text: &str, head: &str) -> bool {
    text.get(..head.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(head))
}

fn first_lower(text: &str) -> Option<char> {
    text.chars().next().map(|c| c.to_ascii_lowercase())
}

/// Upper-case `insert` when the text it replaces is upper case.
fn match_case(insert: &str, like: &str) -> String {
    let mut letters = like.chars().filter(|c| c.is_alphabetic()).peekable();
    if letters.peek().is_some() && letters.all(|c| c.is_uppercase()) {
        insert.to_uppercase()
    } else {
        insert.to_string()
    }
}

/// The last two chars of `text`, oldest first.
fn last_two(text: &str) -> Option<(char, char)> {
    let mut rev = text.chars().rev();
    let last = rev.next()?;
    let before = rev.next()?;
    Some((before, last))
}

impl OrthographyRule {
    /// Parse `stem+prefix=replacement`. The replacement must end with the
    /// prefix, since the suffix text itself is never rewritten.
    pub fn parse(rule: &str) -> Option<Self> {
        let (lhs, replacement) = rule.split_once('=')?;
        let (stem, prefix) = lhs.split_once('+')?;
        let (stem, prefix, replacement) = (stem.trim(), prefix.trim(), replacement.trim());
        if stem.is_empty() || prefix.is_empty() || !ends_with_ignore_case(replacement, prefix) {
            return None;
        }
        Some(OrthographyRule::Replace {
            stem: stem.to_string(),
            prefix: prefix.to_string(),
            replacement: replacement.to_string(),
        })
    }

    pub fn replace(stem: &str, prefix: &str, replacement: &str) -> Self {
        OrthographyRule::Replace {
            stem: stem.to_string(),
            prefix: prefix.to_string(),
            replacement: replacement.to_string(),
        }
    }

    /// Try this rule on one boundary.
    pub fn apply(&self, previous: &str, suffix: &str) -> Option<Rewrite> {
        match self {
            OrthographyRule::ConsonantYBeforeS => {
                consonant_y(previous, suffix, 's').map(|y| Rewrite {
                    remove: 1,
                    insert: match_case("ie", y),
                })
            }
            OrthographyRule::ConsonantYBeforeE => {
                consonant_y(previous, suffix, 'e').map(|y| Rewrite {
                    remove: 1,
                    insert: match_case("i", y),
                })
            }
            OrthographyRule::SilentE => {
                let word = trailing_word(previous);
                let (before, last) = last_two(word)?;
                let starts_with_vowel = suffix.chars().next().is_some_and(is_vowel);
                if last.eq_ignore_ascii_case(&'e')
                    && is_consonant(before)
                    && word.chars().count() >= 3
                    && starts_with_vowel
                {
                    Some(Rewrite {
                        remove: 1,
                        insert: String::new(),
                    })
                } else {
                    None
                }
            }
            OrthographyRule::DoubleConsonant => {
                let word = trailing_word(previous);
                let mut rev = word.chars().rev();
                let (last, vowel, before) = (rev.next()?, rev.next()?, rev.next());
                let next = first_lower(suffix)?;
                let doubles = match last.to_ascii_lowercase() {
                    't' | 'g' | 'b' => next == 'e' || next == 'i',
                    'n' => next == 'i',
                    _ => false,
                };
                let short_vowel = is_vowel(vowel) && before.map_or(true, |c| !is_vowel(c));
                if doubles && short_vowel {
                    Some(Rewrite {
                        remove: 0,
                        insert: last.to_string(),
                    })
                } else {
                    None
                }
            }
            OrthographyRule::Replace {
                stem,
                prefix,
                replacement,
            } => {
                if !ends_with_ignore_case(previous, stem) || !starts_with_ignore_case(suffix, prefix) {
                    return None;
                }
                let removed = &previous[previous.len() - stem.len()..];
                let insert = &replacement[..replacement.len() - prefix.len()];
                Some(Rewrite {
                    remove: stem.len(),
                    insert: match_case(insert, removed),
                })
            }
        }
    }
}

/// Returns the `y` when `previous` ends in consonant + `y` and `suffix`
/// starts with `next`.
fn consonant_y<'a>(previous: &'a str, suffix: &str, next: char) -> Option<&'a str> {
    let (before, last) = last_two(previous)?;
    if last.eq_ignore_ascii_case(&'y') && is_consonant(before) && first_lower(suffix) == Some(next) {
        Some(&previous[previous.len() - 1..])
    } else {
        None
    }
}

/// The run of word characters at the end of `text`.
fn trailing_word(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '\'')
        .last()
        .map_or(text.len(), |(i, _)| i);
    &text[start..]
}

/// Known words that suppress orthography when the plain join is one of them.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: AHashSet<String>,
}

impl WordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// One word per line; blank lines are ignored.
    pub fn from_text(text: &str) -> Self {
        let mut list = WordList::new();
        for line in text.lines() {
            list.insert(line);
        }
        list
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StenoError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    pub fn insert(&mut self, word: &str) {
        let word = normalize(word).to_lowercase();
        if !word.is_empty() {
            self.words.insert(word);
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// An ordered rule table plus an optional word list.
#[derive(Debug, Clone)]
pub struct OrthographyRules {
    rules: Vec<OrthographyRule>,
    word_list: Option<WordList>,
}

impl Default for OrthographyRules {
    fn default() -> Self {
        Self::minimal()
    }
}

impl OrthographyRules {
    pub fn new(rules: Vec<OrthographyRule>) -> Self {
        Self {
            rules,
            word_list: None,
        }
    }

    /// `cry` + `s` → `cries` and silent-e dropping.
    pub fn minimal() -> Self {
        Self::new(vec![OrthographyRule::ConsonantYBeforeS, OrthographyRule::SilentE])
    }

    /// The English suffix table followed by the minimal rules.
    pub fn extended() -> Self {
        let mut rules: Vec<OrthographyRule> = EXTENDED_TABLE
            .iter()
            .map(|(stem, prefix, replacement)| OrthographyRule::replace(stem, prefix, replacement))
            .collect();
        rules.push(OrthographyRule::ConsonantYBeforeS);
        rules.push(OrthographyRule::ConsonantYBeforeE);
        rules.push(OrthographyRule::DoubleConsonant);
        rules.push(OrthographyRule::replace("e", "ed", "ed"));
        rules.push(OrthographyRule::SilentE);
        Self::new(rules)
    }

    pub fn from_policy(policy: OrthographyPolicy) -> Self {
        match policy {
            OrthographyPolicy::Minimal => Self::minimal(),
            OrthographyPolicy::Extended => Self::extended(),
        }
    }

    /// Build a table from textual rules such as `"ic+ly=ically"`.
    ///
    /// Malformed rules are skipped with a warning.
    pub fn from_rules(rules: &[String]) -> Self {
        Self::new(parse_rules(rules))
    }

    /// Put textual rules in front of the current table.
    pub fn with_rules(mut self, rules: &[String]) -> Self {
        let mut parsed = parse_rules(rules);
        parsed.append(&mut self.rules);
        self.rules = parsed;
        self
    }

    pub fn with_word_list(mut self, word_list: WordList) -> Self {
        self.word_list = Some(word_list);
        self
    }

    pub fn rules(&self) -> &[OrthographyRule] {
        &self.rules
    }

    pub fn word_list(&self) -> Option<&WordList> {
        self.word_list.as_ref()
    }

    /// Decide how `previous` is respelled before `suffix` is appended.
    ///
    /// `None` means plain concatenation.
    pub fn join(&self, previous: &str, suffix: &str) -> Option<Rewrite> {
        if suffix.is_empty() || previous.is_empty() {
            return None;
        }
        if let Some(words) = &self.word_list {
            let plain = format!("{}{}", trailing_word(previous), suffix);
            if words.contains(&plain) {
                return None;
            }
        }
        self.rules.iter().find_map(|rule| rule.apply(previous, suffix))
    }

    /// `previous` and `suffix` joined with the first matching rule.
    pub fn apply(&self, previous: &str, suffix: &str) -> String {
        match self.join(previous, suffix) {
            Some(rewrite) => {
                let keep = &previous[..previous.len() - rewrite.remove];
                format!("{}{}{}", keep, rewrite.insert, suffix)
            }
            None => format!("{}{}", previous, suffix),
        }
    }
}

fn parse_rules(rules: &[String]) -> Vec<OrthographyRule> {
    rules
        .iter()
        .filter_map(|rule| {
            let parsed = OrthographyRule::parse(rule);
            if parsed.is_none() {
                tracing::warn!("ignoring malformed orthography rule {:?}", rule);
            }
            parsed
        })
        .collect()
}
