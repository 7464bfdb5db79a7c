//! Parsed dictionary translations.
//!
//! A raw translation is the string stored in a dictionary, e.g. `"{^ing}"`,
//! `"{-|}"` or `"Mr.{-|}"`. `Translation::parse` turns it into a list of
//! segments: literal text and the formatting directives this engine knows.
//! Anything it does not recognize stays part of the literal text around it,
//! braces included, so parsing never fails.

use once_cell::sync::Lazy;
use phf::phf_map;
use regex::Regex;

/// The string a dictionary store returns for a matched outline.
pub type RawTranslation = String;

/// Either an escape sequence or a brace-delimited directive body.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\.|\{((?:[^{}\\]|\\.)*)\}").expect("directive pattern is valid")
});

/// Punctuation that attaches to the previous word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    Period,
    Comma,
    Colon,
    Semicolon,
    Question,
    Exclamation,
}

static PUNCTUATION: phf::Map<&'static str, Punctuation> = phf_map! {
    "." => Punctuation::Period,
    "," => Punctuation::Comma,
    ":" => Punctuation::Colon,
    ";" => Punctuation::Semicolon,
    "?" => Punctuation::Question,
    "!" => Punctuation::Exclamation,
};

impl Punctuation {
    pub fn as_str(self) -> &'static str {
        match self {
            Punctuation::Period => ".",
            Punctuation::Comma => ",",
            Punctuation::Colon => ":",
            Punctuation::Semicolon => ";",
            Punctuation::Question => "?",
            Punctuation::Exclamation => "!",
        }
    }

    /// Sentence-ending punctuation capitalizes the next word.
    pub fn ends_sentence(self) -> bool {
        matches!(
            self,
            Punctuation::Period | Punctuation::Question | Punctuation::Exclamation
        )
    }
}

/// Dictionary commands written as `{PLOVER:name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `{PLOVER:backspace}`: undo the previous stroke.
    Backspace,
    /// `{PLOVER:reset}`: forget all state.
    Reset,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "backspace" => Some(Command::Backspace),
            "reset" => Some(Command::Reset),
            _ => None,
        }
    }
}

/// A formatting directive recognized inside `{...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `{^}`, `{^text}`, `{text^}` and `{^text^}`.
    Affix {
        text: String,
        attach_left: bool,
        attach_right: bool,
    },
    /// `{&text}`: attaches to a directly preceding glue translation.
    Glue(String),
    /// `{~|text}`: emitted without consuming a pending case change.
    Carry { text: String, attach_right: bool },
    /// `{.}`, `{,}` and friends.
    Punctuation(Punctuation),
    /// `{-|}`
    CapitalizeNext,
    /// `{>}`
    LowercaseNext,
    /// `{ }`: a literal space, attached on both sides.
    Space,
    Command(Command),
}

/// One piece of a parsed translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text, separated from its neighbours by spaces.
    Literal(String),
    Directive(Directive),
}

impl Segment {
    /// The text this segment contributes, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Segment::Literal(text) => Some(text),
            Segment::Directive(Directive::Affix { text, .. })
            | Segment::Directive(Directive::Glue(text))
            | Segment::Directive(Directive::Carry { text, .. }) => Some(text),
            Segment::Directive(Directive::Punctuation(p)) => Some(p.as_str()),
            Segment::Directive(Directive::Space) => Some(" "),
            Segment::Directive(Directive::CapitalizeNext)
            | Segment::Directive(Directive::LowercaseNext)
            | Segment::Directive(Directive::Command(_)) => None,
        }
    }
}

/// A parsed translation: ordered segments plus the derived attach flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Translation {
    segments: Vec<Segment>,
}

impl Translation {
    /// Parse a raw dictionary string. Never fails.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in TOKEN.captures_iter(raw) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                // Escapes stay in the literal run and are resolved below.
                continue;
            };
            // Unknown markers stay in the literal run as written.
            let Some(directive) = parse_directive(body.as_str()) else {
                continue;
            };
            push_literal(&mut segments, &raw[last..whole.start()]);
            segments.push(Segment::Directive(directive));
            last = whole.end();
        }
        push_literal(&mut segments, &raw[last..]);

        Translation { segments }
    }

    /// A translation consisting of one literal word.
    pub fn literal(text: impl Into<String>) -> Self {
        Translation {
            segments: vec![Segment::Literal(text.into())],
        }
    }

    /// A glue translation, used for digits.
    pub fn glue(text: impl Into<String>) -> Self {
        Translation {
            segments: vec![Segment::Directive(Directive::Glue(text.into()))],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// This translation followed by `suffix`, as one group.
    pub fn then(&self, suffix: &Translation) -> Translation {
        let mut segments = self.segments.clone();
        segments.extend(suffix.segments.iter().cloned());
        Translation { segments }
    }

    /// The command this translation runs, when it consists of nothing else.
    pub fn command(&self) -> Option<Command> {
        match self.segments.as_slice() {
            [Segment::Directive(Directive::Command(command))] => Some(*command),
            _ => None,
        }
    }

    /// Whether the first positioned segment suppresses the space before it.
    pub fn attach_left(&self) -> bool {
        for segment in &self.segments {
            match segment {
                Segment::Directive(Directive::Affix { attach_left, .. }) => return *attach_left,
                Segment::Directive(Directive::Punctuation(_)) | Segment::Directive(Directive::Space) => {
                    return true
                }
                Segment::Directive(Directive::CapitalizeNext)
                | Segment::Directive(Directive::LowercaseNext)
                | Segment::Directive(Directive::Command(_)) => continue,
                _ => return false,
            }
        }
        false
    }

    /// Whether the last positioned segment suppresses the space after it.
    pub fn attach_right(&self) -> bool {
        for segment in self.segments.iter().rev() {
            match segment {
                Segment::Directive(Directive::Affix { attach_right, .. })
                | Segment::Directive(Directive::Carry { attach_right, .. }) => return *attach_right,
                Segment::Directive(Directive::Space) => return true,
                Segment::Directive(Directive::CapitalizeNext)
                | Segment::Directive(Directive::LowercaseNext)
                | Segment::Directive(Directive::Command(_)) => continue,
                _ => return false,
            }
        }
        false
    }

    /// Whether the word after this translation starts with a capital.
    pub fn capitalize_next(&self) -> bool {
        let mut capitalize = false;
        for segment in &self.segments {
            match segment {
                Segment::Directive(Directive::CapitalizeNext) => capitalize = true,
                Segment::Directive(Directive::LowercaseNext) => capitalize = false,
                Segment::Directive(Directive::Punctuation(p)) => capitalize = p.ends_sentence(),
                Segment::Directive(Directive::Carry { .. })
                | Segment::Directive(Directive::Space)
                | Segment::Directive(Directive::Command(_)) => {}
                other => {
                    if other.text().is_some_and(|t| !t.is_empty()) {
                        capitalize = false;
                    }
                }
            }
        }
        capitalize
    }
}

fn push_literal(segments: &mut Vec<Segment>, raw: &str) {
    let text = unescape(raw.trim());
    if !text.is_empty() {
        segments.push(Segment::Literal(text));
    }
}

fn parse_directive(body: &str) -> Option<Directive> {
    match body {
        "-|" => return Some(Directive::CapitalizeNext),
        ">" => return Some(Directive::LowercaseNext),
        " " => return Some(Directive::Space),
        "^" => {
            return Some(Directive::Affix {
                text: String::new(),
                attach_left: true,
                attach_right: true,
            })
        }
        _ => {}
    }
    if let Some(p) = PUNCTUATION.get(body) {
        return Some(Directive::Punctuation(*p));
    }
    if let Some(name) = body.strip_prefix("PLOVER:") {
        return Command::parse(name).map(Directive::Command);
    }
    if let Some(rest) = body.strip_prefix("~|") {
        let (text, attach_right) = strip_attach_right(rest);
        return Some(Directive::Carry {
            text: unescape(text),
            attach_right,
        });
    }
    if let Some(rest) = body.strip_prefix('&') {
        if rest.is_empty() {
            return None;
        }
        return Some(Directive::Glue(unescape(rest)));
    }

    let (text, attach_left) = match body.strip_prefix('^') {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    let (text, attach_right) = strip_attach_right(text);
    if attach_left || attach_right {
        Some(Directive::Affix {
            text: unescape(text),
            attach_left,
            attach_right,
        })
    } else {
        None
    }
}

/// Strip a trailing `^` unless it is escaped.
fn strip_attach_right(text: &str) -> (&str, bool) {
    match text.strip_suffix('^') {
        Some(rest) => {
            let backslashes = rest.chars().rev().take_while(|&c| c == '\\').count();
            if backslashes % 2 == 0 {
                (rest, true)
            } else {
                (text, false)
            }
        }
        None => (text, false),
    }
}

/// Resolve `\{ \} \^ \\`; other backslashes are kept as written.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('{' | '}' | '^' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}
