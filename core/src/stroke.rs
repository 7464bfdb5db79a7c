//! Strokes and stroke sequences in Plover notation.
//!
//! A `Stroke` is the set of keys pressed together in one chord. It is stored
//! as a bit set in steno order, so equality, hashing and ordering are
//! structural and independent of the order the keys were pressed in.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::{StenoError, StrokeParseError};

bitflags! {
    /// One chord on the English stenotype layout. Bits ascend in steno order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Stroke: u32 {
        const NUMBER_BAR = 1 << 0;
        const S = 1 << 1;
        const T = 1 << 2;
        const K = 1 << 3;
        const P = 1 << 4;
        const W = 1 << 5;
        const H = 1 << 6;
        const R = 1 << 7;
        const A = 1 << 8;
        const O = 1 << 9;
        const STAR = 1 << 10;
        const E = 1 << 11;
        const U = 1 << 12;
        const F = 1 << 13;
        const R2 = 1 << 14;
        const P2 = 1 << 15;
        const B = 1 << 16;
        const L = 1 << 17;
        const G = 1 << 18;
        const T2 = 1 << 19;
        const S2 = 1 << 20;
        const D = 1 << 21;
        const Z = 1 << 22;
    }
}

struct KeyInfo {
    key: Stroke,
    letter: char,
    digit: Option<char>,
}

const fn key(key: Stroke, letter: char, digit: Option<char>) -> KeyInfo {
    KeyInfo { key, letter, digit }
}

/// The full alphabet in steno order.
const KEYS: [KeyInfo; 23] = [
    key(Stroke::NUMBER_BAR, '#', None),
    key(Stroke::S, 'S', Some('1')),
    key(Stroke::T, 'T', Some('2')),
    key(Stroke::K, 'K', None),
    key(Stroke::P, 'P', Some('3')),
    key(Stroke::W, 'W', None),
    key(Stroke::H, 'H', Some('4')),
    key(Stroke::R, 'R', None),
    key(Stroke::A, 'A', Some('5')),
    key(Stroke::O, 'O', Some('0')),
    key(Stroke::STAR, '*', None),
    key(Stroke::E, 'E', None),
    key(Stroke::U, 'U', None),
    key(Stroke::F, 'F', Some('6')),
    key(Stroke::R2, 'R', None),
    key(Stroke::P2, 'P', Some('7')),
    key(Stroke::B, 'B', None),
    key(Stroke::L, 'L', Some('8')),
    key(Stroke::G, 'G', None),
    key(Stroke::T2, 'T', Some('9')),
    key(Stroke::S2, 'S', None),
    key(Stroke::D, 'D', None),
    key(Stroke::Z, 'Z', None),
];

/// Index of `-E`, the first key that can only follow a hyphen.
const RIGHT_HAND_START: usize = 11;

impl Stroke {
    /// Vowels and the asterisk; any of these separates the two banks visually.
    pub const MIDDLE: Stroke = Stroke::A
        .union(Stroke::O)
        .union(Stroke::STAR)
        .union(Stroke::E)
        .union(Stroke::U);

    /// Right-bank consonants `-F` through `-Z`.
    pub const RIGHT_BANK: Stroke = Stroke::F
        .union(Stroke::R2)
        .union(Stroke::P2)
        .union(Stroke::B)
        .union(Stroke::L)
        .union(Stroke::G)
        .union(Stroke::T2)
        .union(Stroke::S2)
        .union(Stroke::D)
        .union(Stroke::Z);

    /// Inflection keys that can be folded into the previous outline.
    pub const SUFFIX_KEYS: Stroke = Stroke::G
        .union(Stroke::S2)
        .union(Stroke::D)
        .union(Stroke::Z);

    /// True when every set bit is a key of the known alphabet.
    pub fn is_valid(&self) -> bool {
        Stroke::all().contains(*self)
    }

    /// Split off the folded suffix keys: `(base, suffix)`.
    pub fn split_suffix(self) -> (Stroke, Stroke) {
        let suffix = self & Stroke::SUFFIX_KEYS;
        (self - suffix, suffix)
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numbers = self.contains(Stroke::NUMBER_BAR);
        let mut hyphen = self.intersects(Stroke::RIGHT_BANK) && !self.intersects(Stroke::MIDDLE);
        let mut body = String::with_capacity(KEYS.len() + 1);
        let mut wrote_digit = false;

        for info in KEYS.iter().skip(1) {
            if !self.contains(info.key) {
                continue;
            }
            if hyphen && Stroke::RIGHT_BANK.contains(info.key) {
                body.push('-');
                hyphen = false;
            }
            match info.digit {
                Some(digit) if numbers => {
                    body.push(digit);
                    wrote_digit = true;
                }
                _ => body.push(info.letter),
            }
        }

        if numbers && !wrote_digit {
            f.write_str("#")?;
        }
        f.write_str(&body)
    }
}

impl FromStr for Stroke {
    type Err = StrokeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut stroke = Stroke::empty();
        let mut next = 1;
        let mut dangling_hyphen = false;

        for ch in s.chars() {
            match ch {
                '#' => {
                    if stroke.contains(Stroke::NUMBER_BAR) {
                        return Err(StrokeParseError::OutOfOrder(ch));
                    }
                    stroke |= Stroke::NUMBER_BAR;
                }
                '-' => {
                    next = next.max(RIGHT_HAND_START);
                    dangling_hyphen = true;
                }
                _ => {
                    let matches = |info: &KeyInfo| info.letter == ch || info.digit == Some(ch);
                    let found = KEYS
                        .iter()
                        .enumerate()
                        .skip(next)
                        .find(|(_, info)| matches(info));
                    match found {
                        Some((index, info)) => {
                            stroke |= info.key;
                            if info.digit == Some(ch) {
                                stroke |= Stroke::NUMBER_BAR;
                            }
                            next = index + 1;
                            dangling_hyphen = false;
                        }
                        None if KEYS.iter().skip(1).any(matches) => {
                            return Err(StrokeParseError::OutOfOrder(ch));
                        }
                        None => return Err(StrokeParseError::UnrecognizedKey(ch)),
                    }
                }
            }
        }

        if dangling_hyphen {
            return Err(StrokeParseError::TrailingHyphen);
        }
        if stroke.is_empty() {
            return Err(StrokeParseError::Empty);
        }
        Ok(stroke)
    }
}

/// An ordered, non-empty list of strokes; the key type of every dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrokeSequence(Vec<Stroke>);

impl StrokeSequence {
    /// Returns `None` for an empty list.
    pub fn new(strokes: Vec<Stroke>) -> Option<Self> {
        if strokes.is_empty() {
            None
        } else {
            Some(StrokeSequence(strokes))
        }
    }

    pub fn single(stroke: Stroke) -> Self {
        StrokeSequence(vec![stroke])
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Stroke> {
        self.0
    }

    /// The slash-joined canonical key (`KAT/-S`).
    pub fn canonical(&self) -> String {
        canonical_key(&self.0)
    }
}

/// Canonical slash-joined form of any stroke slice.
pub fn canonical_key(strokes: &[Stroke]) -> String {
    let mut out = String::new();
    for (i, stroke) in strokes.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(&stroke.to_string());
    }
    out
}

impl Deref for StrokeSequence {
    type Target = [Stroke];

    fn deref(&self) -> &[Stroke] {
        &self.0
    }
}

impl Borrow<[Stroke]> for StrokeSequence {
    fn borrow(&self) -> &[Stroke] {
        &self.0
    }
}

impl From<Stroke> for StrokeSequence {
    fn from(stroke: Stroke) -> Self {
        StrokeSequence::single(stroke)
    }
}

impl fmt::Display for StrokeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for StrokeSequence {
    type Err = StenoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let strokes = s
            .split('/')
            .map(|part| part.parse::<Stroke>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StenoError::stroke(s, e))?;
        // `split` always yields at least one part, and empty parts fail above.
        Ok(StrokeSequence(strokes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(s: &str) -> Stroke {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_prints_plain_outlines() {
        let teft = stroke("TEFT");
        assert_eq!(teft, Stroke::T | Stroke::E | Stroke::F | Stroke::T2);
        assert_eq!(teft.to_string(), "TEFT");

        assert_eq!(stroke("KA*T").to_string(), "KA*T");
        assert_eq!(stroke("STKPWHRAO*EUFRPBLGTSDZ"), Stroke::all() - Stroke::NUMBER_BAR);
    }

    #[test]
    fn shared_letters_resolve_by_position() {
        assert_eq!(stroke("-S"), Stroke::S2);
        assert_eq!(stroke("S"), Stroke::S);
        assert_eq!(stroke("SS"), Stroke::S | Stroke::S2);
        assert_eq!(stroke("TS"), Stroke::T | Stroke::S2);
        assert_eq!(stroke("TKPW-G"), Stroke::T | Stroke::K | Stroke::P | Stroke::W | Stroke::G);
    }

    #[test]
    fn hyphen_only_without_middle_keys() {
        assert_eq!((Stroke::S2).to_string(), "-S");
        assert_eq!((Stroke::T | Stroke::K | Stroke::P | Stroke::W | Stroke::G).to_string(), "TKPW-G");
        assert_eq!((Stroke::K | Stroke::A | Stroke::T2).to_string(), "KAT");
        assert_eq!((Stroke::E | Stroke::U).to_string(), "EU");
    }

    #[test]
    fn number_bar_renders_digits() {
        assert_eq!((Stroke::NUMBER_BAR | Stroke::S).to_string(), "1");
        assert_eq!((Stroke::NUMBER_BAR | Stroke::S | Stroke::T | Stroke::T2).to_string(), "12-9");
        assert_eq!((Stroke::NUMBER_BAR | Stroke::T2).to_string(), "-9");
        assert_eq!(Stroke::NUMBER_BAR.to_string(), "#");
        assert_eq!((Stroke::NUMBER_BAR | Stroke::STAR | Stroke::E | Stroke::U).to_string(), "#*EU");
        assert_eq!((Stroke::NUMBER_BAR | Stroke::D).to_string(), "#-D");
    }

    #[test]
    fn digit_notation_parses_back() {
        for text in ["1", "12-9", "-9", "#", "#*EU", "#-D", "50", "1234"] {
            assert_eq!(stroke(text).to_string(), text);
        }
        assert_eq!(stroke("#S"), stroke("1"));
        assert_eq!(stroke("5"), Stroke::NUMBER_BAR | Stroke::A);
    }

    #[test]
    fn rejects_bad_notation() {
        assert_eq!("".parse::<Stroke>(), Err(StrokeParseError::Empty));
        assert_eq!("KAT-".parse::<Stroke>(), Err(StrokeParseError::TrailingHyphen));
        assert_eq!("KAX".parse::<Stroke>(), Err(StrokeParseError::UnrecognizedKey('X')));
        assert_eq!("kat".parse::<Stroke>(), Err(StrokeParseError::UnrecognizedKey('k')));
        assert_eq!("AA".parse::<Stroke>(), Err(StrokeParseError::OutOfOrder('A')));
        assert_eq!("EA".parse::<Stroke>(), Err(StrokeParseError::OutOfOrder('A')));
        assert_eq!("SSS".parse::<Stroke>(), Err(StrokeParseError::OutOfOrder('S')));
    }

    #[test]
    fn sequences_split_on_slash() {
        let seq: StrokeSequence = "KAT/-S".parse().unwrap();
        assert_eq!(seq.strokes(), &[stroke("KAT"), Stroke::S2]);
        assert_eq!(seq.to_string(), "KAT/-S");
        assert!("KAT//-S".parse::<StrokeSequence>().is_err());
        assert!("".parse::<StrokeSequence>().is_err());
        assert!(StrokeSequence::new(Vec::new()).is_none());
    }

    #[test]
    fn suffix_split() {
        let (base, suffix) = stroke("TEFTS").split_suffix();
        assert_eq!(base, stroke("TEFT"));
        assert_eq!(suffix, Stroke::S2);
        assert!(stroke("TEFT").split_suffix().1.is_empty());
    }

    #[test]
    fn validity_check() {
        assert!(stroke("TEFT").is_valid());
        assert!(!Stroke::from_bits_retain(1 << 30).is_valid());
    }
}
