//! Text stroke decoder.
//!
//! Turns lines of Plover notation into engine events. Tokens are separated
//! by whitespace; a token may hold several strokes joined by `/`
//! (`KAT/-S`). The undo token (default `*`) maps to [`Event::Undo`] and
//! `!reset` to [`Event::Reset`]. A token starting with `//` comments out
//! the rest of the line.

use libsteno_core::{Event, StenoError, Stroke};

pub const RESET_TOKEN: &str = "!reset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDecoder {
    undo_token: String,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new("*")
    }
}

impl LineDecoder {
    pub fn new(undo_token: impl Into<String>) -> Self {
        Self {
            undo_token: undo_token.into(),
        }
    }

    pub fn undo_token(&self) -> &str {
        &self.undo_token
    }

    /// Decode one token into its events.
    pub fn decode_token(&self, token: &str) -> Result<Vec<Event>, StenoError> {
        if token == RESET_TOKEN {
            return Ok(vec![Event::Reset]);
        }
        if token == self.undo_token {
            return Ok(vec![Event::Undo]);
        }
        token
            .split('/')
            .map(|part| {
                if part == self.undo_token {
                    return Ok(Event::Undo);
                }
                part.parse::<Stroke>()
                    .map(Event::Stroke)
                    .map_err(|source| StenoError::Stroke {
                        input: part.to_string(),
                        source,
                    })
            })
            .collect()
    }

    /// Decode a whole line. Tokens that fail to parse are skipped with a
    /// warning and the rest of the line is still decoded.
    pub fn decode_line(&self, line: &str) -> Vec<Event> {
        let mut events = Vec::new();
        for token in line.split_whitespace() {
            if token.starts_with("//") {
                break;
            }
            match self.decode_token(token) {
                Ok(decoded) => events.extend(decoded),
                Err(e) => tracing::warn!("skipping token {:?}: {}", token, e),
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(s: &str) -> Event {
        Event::Stroke(s.parse().unwrap())
    }

    #[test]
    fn strokes_and_outlines() {
        let decoder = LineDecoder::default();
        assert_eq!(
            decoder.decode_line("KAT/-S TEFT"),
            vec![stroke("KAT"), stroke("-S"), stroke("TEFT")]
        );
    }

    #[test]
    fn control_tokens() {
        let decoder = LineDecoder::default();
        assert_eq!(
            decoder.decode_line("KAT * !reset"),
            vec![stroke("KAT"), Event::Undo, Event::Reset]
        );
        // The asterisk key alone is still a stroke with another undo token
        let decoder = LineDecoder::new("UNDO");
        assert_eq!(decoder.decode_line("* UNDO"), vec![stroke("*"), Event::Undo]);
    }

    #[test]
    fn bad_tokens_are_skipped() {
        let decoder = LineDecoder::default();
        assert_eq!(decoder.decode_line("KAT xyz TEFT"), vec![stroke("KAT"), stroke("TEFT")]);
        assert!(decoder.decode_token("KAT/-").is_err());
    }

    #[test]
    fn comments_and_number_bar() {
        let decoder = LineDecoder::default();
        assert_eq!(decoder.decode_line("# // the number bar"), vec![stroke("#")]);
        assert_eq!(decoder.decode_line("12 -9  //digits"), vec![stroke("12"), stroke("-9")]);
        assert!(decoder.decode_line("// just a comment").is_empty());
    }
}
