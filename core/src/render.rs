//! Rendering resolved groups into text.
//!
//! Rendering walks the groups of the live window in order, starting from the
//! formatting state left behind by the last confirmed group. Each segment of
//! a translation either emits text (with or without a leading space) or
//! changes the pending state: capitalization, attachment and glue.
//!
//! Attach-left text runs the orthography rules against the text before it.
//! The matching context includes the confirmed tail, but a rewrite may only
//! change live text; one that would reach into confirmed text is dropped and
//! the suffix is plainly appended.

use std::ops::Range;
use std::sync::Arc;

use crate::grouping::Resolved;
use crate::orthography::OrthographyRules;
use crate::translation::{Directive, Segment, Translation};

/// Pending case change for the next word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Upper,
    Lower,
}

/// Formatting state carried from one group to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatState {
    /// The next word gets a leading space.
    pub space: bool,
    pub case: Option<Case>,
    /// The last emitted text was glue.
    pub glue: bool,
}

/// Where rendering starts: the confirmed tail and the state after it.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub confirmed_tail: &'a str,
    pub state: FormatState,
}

/// One rendered group of the live window.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub stroke_count: usize,
    pub translation: Arc<Translation>,
    /// Text this group contributes, including its leading space.
    pub text: String,
    pub space_before: bool,
    /// Formatting state after this group.
    pub state: FormatState,
}

/// The live text and the groups it is made of.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendering {
    pub text: String,
    pub groups: Vec<Group>,
}

/// Render `resolved` groups after `context`.
pub fn render(resolved: &[Resolved], context: RenderContext<'_>, rules: &OrthographyRules) -> Rendering {
    let mut composer = Composer {
        text: String::new(),
        state: context.state,
        confirmed_tail: context.confirmed_tail,
        rules,
        spans: Vec::with_capacity(resolved.len()),
        group_start: 0,
        space_before: None,
    };

    let mut finished = Vec::with_capacity(resolved.len());
    for group in resolved {
        composer.begin_group();
        for segment in group.translation.segments() {
            composer.apply(segment);
        }
        let space_before = composer.end_group();
        finished.push((space_before, composer.state));
    }

    let Composer { text, spans, .. } = composer;
    let groups = resolved
        .iter()
        .zip(spans)
        .zip(finished)
        .map(|((group, span), (space_before, state))| Group {
            stroke_count: group.stroke_count,
            translation: Arc::clone(&group.translation),
            text: text[span].to_string(),
            space_before,
            state,
        })
        .collect();

    Rendering { text, groups }
}

struct Composer<'a> {
    text: String,
    state: FormatState,
    confirmed_tail: &'a str,
    rules: &'a OrthographyRules,
    /// Byte spans of finished groups; always contiguous from 0.
    spans: Vec<Range<usize>>,
    group_start: usize,
    space_before: Option<bool>,
}

impl Composer<'_> {
    fn begin_group(&mut self) {
        self.group_start = self.text.len();
        self.space_before = None;
    }

    fn end_group(&mut self) -> bool {
        self.spans.push(self.group_start..self.text.len());
        self.space_before.unwrap_or(false)
    }

    fn apply(&mut self, segment: &Segment) {
        match segment {
            Segment::Literal(text) => {
                self.word(text, true);
                self.state.space = true;
                self.state.glue = false;
            }
            Segment::Directive(Directive::Affix {
                text,
                attach_left,
                attach_right,
            }) => {
                if *attach_left {
                    self.attach(text, true);
                } else {
                    self.word(text, true);
                }
                self.state.space = !attach_right;
                self.state.glue = false;
            }
            Segment::Directive(Directive::Glue(text)) => {
                if self.state.glue {
                    self.attach(text, false);
                } else {
                    self.word(text, true);
                }
                self.state.space = true;
                self.state.glue = true;
            }
            Segment::Directive(Directive::Carry { text, attach_right }) => {
                self.word(text, false);
                self.state.space = !attach_right;
                self.state.glue = false;
            }
            Segment::Directive(Directive::Punctuation(p)) => {
                self.attach(p.as_str(), false);
                self.state.case = if p.ends_sentence() { Some(Case::Upper) } else { None };
                self.state.space = true;
                self.state.glue = false;
            }
            Segment::Directive(Directive::CapitalizeNext) => self.state.case = Some(Case::Upper),
            Segment::Directive(Directive::LowercaseNext) => self.state.case = Some(Case::Lower),
            Segment::Directive(Directive::Space) => {
                self.space_before.get_or_insert(false);
                self.text.push(' ');
                self.state.space = false;
                self.state.glue = false;
            }
            // Commands are run by the engine before rendering.
            Segment::Directive(Directive::Command(_)) => {}
        }
    }

    /// Emit text with the usual leading space.
    fn word(&mut self, text: &str, apply_case: bool) {
        if text.is_empty() {
            return;
        }
        let spaced = self.state.space;
        self.space_before.get_or_insert(spaced);
        if spaced {
            self.text.push(' ');
        }
        let text = if apply_case { self.cased(text) } else { text.to_string() };
        self.text.push_str(&text);
    }

    /// Emit text directly after the previous text.
    fn attach(&mut self, text: &str, orthography: bool) {
        if text.is_empty() {
            return;
        }
        self.space_before.get_or_insert(false);
        let text = self.cased(text);
        if orthography {
            self.respell_previous(&text);
        }
        self.text.push_str(&text);
    }

    fn cased(&mut self, text: &str) -> String {
        let mut chars = text.chars();
        match (self.state.case.take(), chars.next()) {
            (Some(Case::Upper), Some(first)) => first.to_uppercase().chain(chars).collect(),
            (Some(Case::Lower), Some(first)) => first.to_lowercase().chain(chars).collect(),
            _ => text.to_string(),
        }
    }

    fn respell_previous(&mut self, suffix: &str) {
        let joined;
        let previous = if self.confirmed_tail.is_empty() {
            self.text.as_str()
        } else {
            joined = format!("{}{}", self.confirmed_tail, self.text);
            joined.as_str()
        };
        let Some(rewrite) = self.rules.join(previous, suffix) else {
            return;
        };
        if rewrite.remove > self.text.len() {
            tracing::debug!("orthography for {:?} would rewrite confirmed text; appending", suffix);
            return;
        }

        let cut = self.text.len() - rewrite.remove;
        self.text.truncate(cut);
        self.text.push_str(&rewrite.insert);

        // A rewrite of earlier text belongs to the group that owned the cut.
        if cut < self.group_start {
            let len = self.text.len();
            let owner = self
                .spans
                .iter()
                .position(|span| span.start <= cut && cut < span.end);
            if let Some(owner) = owner {
                self.spans[owner].end = len;
                for span in &mut self.spans[owner + 1..] {
                    *span = len..len;
                }
            }
            self.group_start = len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(raws: &[&str]) -> Vec<Resolved> {
        raws.iter()
            .map(|raw| Resolved {
                stroke_count: 1,
                translation: Arc::new(Translation::parse(raw)),
            })
            .collect()
    }

    fn render_fresh(raws: &[&str]) -> Rendering {
        let context = RenderContext {
            confirmed_tail: "",
            state: FormatState::default(),
        };
        render(&resolved(raws), context, &OrthographyRules::minimal())
    }

    fn texts(rendering: &Rendering) -> Vec<&str> {
        rendering.groups.iter().map(|g| g.text.as_str()).collect()
    }

    #[test]
    fn words_are_space_separated() {
        let r = render_fresh(&["the", "cat"]);
        assert_eq!(r.text, "the cat");
        assert_eq!(texts(&r), vec!["the", " cat"]);
        assert!(!r.groups[0].space_before);
        assert!(r.groups[1].space_before);
    }

    #[test]
    fn suffix_respells_previous_group() {
        let r = render_fresh(&["try", "{^s}"]);
        assert_eq!(r.text, "tries");
        assert_eq!(texts(&r), vec!["trie", "s"]);
        assert!(!r.groups[1].space_before);
    }

    #[test]
    fn respelling_skips_empty_groups() {
        let r = render_fresh(&["try", "{^}", "{^s}"]);
        assert_eq!(r.text, "tries");
        assert_eq!(texts(&r), vec!["trie", "", "s"]);

        let r = render_fresh(&["try", "{-|}", "{^s}"]);
        assert_eq!(r.text, "trieS");
        assert_eq!(texts(&r), vec!["trie", "", "S"]);
    }

    #[test]
    fn prefixes_and_infixes() {
        assert_eq!(render_fresh(&["{re^}", "do"]).text, "redo");
        assert_eq!(render_fresh(&["well", "{^-^}", "known"]).text, "well-known");
        assert_eq!(render_fresh(&["a", "{^}", "b"]).text, "ab");
        assert_eq!(render_fresh(&["a", "{ }", "b"]).text, "a b");
        assert_eq!(render_fresh(&["a", "{^}{ }{^}", "{,}"]).text, "a ,");
    }

    #[test]
    fn unknown_markers_render_in_place() {
        assert_eq!(render_fresh(&["a{PLOVER:X}b"]).text, "a{PLOVER:X}b");
        assert_eq!(render_fresh(&["x", "{PLOVER:X}"]).text, "x {PLOVER:X}");
    }

    #[test]
    fn punctuation_capitalizes() {
        let r = render_fresh(&["end", "{.}", "next", "{,}", "more"]);
        assert_eq!(r.text, "end. Next, more");
    }

    #[test]
    fn case_directives() {
        assert_eq!(render_fresh(&["{-|}", "hello"]).text, "Hello");
        assert_eq!(render_fresh(&["{.}", "{>}", "hello"]).text, ". hello");
        assert_eq!(render_fresh(&["{-|}", "{~|\"^}", "hi"]).text, "\"Hi");
    }

    #[test]
    fn glue_joins_glue_only() {
        assert_eq!(render_fresh(&["{&a}", "{&b}", "c", "{&d}"]).text, "ab c d");
    }

    #[test]
    fn context_state_is_honored() {
        let context = RenderContext {
            confirmed_tail: "Hello.",
            state: FormatState {
                space: true,
                case: Some(Case::Upper),
                glue: false,
            },
        };
        let r = render(&resolved(&["world"]), context, &OrthographyRules::minimal());
        assert_eq!(r.text, " World");
        assert_eq!(r.groups[0].state.case, None);
    }

    #[test]
    fn rewrite_into_confirmed_text_is_refused() {
        let context = RenderContext {
            confirmed_tail: "try",
            state: FormatState {
                space: true,
                case: None,
                glue: false,
            },
        };
        let r = render(&resolved(&["{^s}"]), context, &OrthographyRules::minimal());
        assert_eq!(r.text, "s");
    }

    #[test]
    fn orthography_sees_confirmed_context() {
        // Only the live "e" is dropped; "mak" stays confirmed.
        let context = RenderContext {
            confirmed_tail: "mak",
            state: FormatState::default(),
        };
        let r = render(&resolved(&["{^e}", "{^ing}"]), context, &OrthographyRules::minimal());
        assert_eq!(r.text, "ing");
        assert_eq!(texts(&r), vec!["", "ing"]);
    }
}
