//! Engine state: confirmed text, the live stroke window and the last
//! rendering sent to the host.
//!
//! The host-visible text the engine owns is always the confirmed text
//! followed by the last live rendering. Confirmed text never changes once
//! written; only a bounded tail of it is kept, as context for orthography.

use crate::render::{FormatState, RenderContext};
use crate::stroke::Stroke;

/// Frozen output: a bounded tail plus the formatting state after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedText {
    tail: String,
    tail_chars: usize,
    capacity: usize,
    total_chars: usize,
    state: FormatState,
}

impl ConfirmedText {
    /// Keep at most `capacity` chars of context.
    pub fn new(capacity: usize) -> Self {
        Self {
            tail: String::new(),
            tail_chars: 0,
            capacity,
            total_chars: 0,
            state: FormatState::default(),
        }
    }

    /// Append a frozen group's text and record the state it leaves behind.
    pub fn push(&mut self, text: &str, state: FormatState) {
        let chars = text.chars().count();
        self.tail.push_str(text);
        self.tail_chars += chars;
        self.total_chars += chars;
        self.state = state;

        if self.tail_chars > self.capacity {
            let excess = self.tail_chars - self.capacity;
            let cut = self
                .tail
                .char_indices()
                .nth(excess)
                .map_or(self.tail.len(), |(i, _)| i);
            self.tail.drain(..cut);
            self.tail_chars = self.capacity;
        }
    }

    /// The retained end of the confirmed text.
    pub fn tail(&self) -> &str {
        &self.tail
    }

    /// Chars confirmed since the last reset, including ones no longer kept.
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn state(&self) -> FormatState {
        self.state
    }

    pub fn context(&self) -> RenderContext<'_> {
        RenderContext {
            confirmed_tail: &self.tail,
            state: self.state,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.capacity);
    }
}

/// Everything the engine mutates while processing events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub(crate) confirmed: ConfirmedText,
    pub(crate) window: Vec<Stroke>,
    pub(crate) last_live: String,
}

impl EngineState {
    pub fn new(confirmed_tail_chars: usize) -> Self {
        Self {
            confirmed: ConfirmedText::new(confirmed_tail_chars),
            window: Vec::new(),
            last_live: String::new(),
        }
    }

    pub fn confirmed(&self) -> &ConfirmedText {
        &self.confirmed
    }

    /// Strokes that can still be recombined, oldest first.
    pub fn window(&self) -> &[Stroke] {
        &self.window
    }

    /// The live text as last sent to the host.
    pub fn live_text(&self) -> &str {
        &self.last_live
    }

    pub fn clear(&mut self) {
        self.confirmed.clear();
        self.window.clear();
        self.last_live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_tail_is_bounded() {
        let mut confirmed = ConfirmedText::new(5);
        confirmed.push("hello", FormatState::default());
        confirmed.push(" wörld", FormatState::default());
        assert_eq!(confirmed.tail(), "wörld");
        assert_eq!(confirmed.total_chars(), 11);
    }

    #[test]
    fn state_follows_last_push() {
        let mut confirmed = ConfirmedText::new(16);
        let after = FormatState {
            space: true,
            case: None,
            glue: true,
        };
        confirmed.push("1", after);
        assert_eq!(confirmed.state(), after);
        assert_eq!(confirmed.context().confirmed_tail, "1");

        confirmed.clear();
        assert_eq!(confirmed.tail(), "");
        assert_eq!(confirmed.state(), FormatState::default());
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut confirmed = ConfirmedText::new(0);
        confirmed.push("abc", FormatState::default());
        assert_eq!(confirmed.tail(), "");
        assert_eq!(confirmed.total_chars(), 3);
    }
}
