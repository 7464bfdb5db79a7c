// core/src/engine.rs
//
// Stroke-to-text translation engine, generic over the dictionary store.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::{debug, info, trace};

use crate::dictionary::Dictionary;
use crate::grouping::{group_strokes, GroupingOptions};
use crate::orthography::OrthographyRules;
use crate::output::OutputEdit;
use crate::render::{render, Group, Rendering};
use crate::state::EngineState;
use crate::stroke::{Stroke, StrokeSequence};
use crate::translation::{Command, Translation};
use crate::Config;

/// One input event from the stroke decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Stroke(Stroke),
    /// Remove the most recent live stroke.
    Undo,
    /// Forget all state, e.g. after the cursor moved.
    Reset,
}

const DEFAULT_CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Parsed translations keyed by outline, including misses.
struct TranslationCache {
    entries: LruCache<StrokeSequence, Option<Arc<Translation>>>,
    hits: usize,
    misses: usize,
}

impl TranslationCache {
    fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CACHE_SIZE);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    fn resolve<D: Dictionary>(&mut self, store: &D, strokes: &[Stroke]) -> Option<Arc<Translation>> {
        if let Some(cached) = self.entries.get(strokes) {
            self.hits += 1;
            return cached.clone();
        }
        self.misses += 1;

        let translation = store
            .lookup(strokes)
            .map(|raw| Arc::new(Translation::parse(&raw)));
        if let Some(key) = StrokeSequence::new(strokes.to_vec()) {
            self.entries.put(key, translation.clone());
        }
        translation
    }
}

/// The translation engine.
///
/// Consumes one [`Event`] at a time and answers each with exactly one
/// [`OutputEdit`]. The last `W` strokes stay live and are regrouped from
/// scratch on every event, so a later stroke can turn `cat` into `cats`.
/// Older strokes are frozen into confirmed text and never change again.
///
/// `W` is the store's longest key, clamped to the configured window bounds,
/// and is re-read on every event.
pub struct Engine<D> {
    store: D,
    config: Config,
    orthography: OrthographyRules,
    state: EngineState,
    cache: TranslationCache,
}

impl<D: Dictionary> Engine<D> {
    /// Create an engine with the default configuration.
    pub fn new(store: D) -> Self {
        Self::with_config(store, Config::default())
    }

    pub fn with_config(store: D, config: Config) -> Self {
        let orthography = config.orthography_rules();
        Self {
            store,
            orthography,
            state: EngineState::new(config.confirmed_tail_chars),
            cache: TranslationCache::new(config.max_cache_size),
            config,
        }
    }

    /// Replace the orthography rules, e.g. to attach a word list.
    pub fn with_orthography(mut self, rules: OrthographyRules) -> Self {
        self.orthography = rules;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orthography(&self) -> &OrthographyRules {
        &self.orthography
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    /// Mutate the store. The translation cache is cleared afterwards.
    pub fn update_store<R>(&mut self, f: impl FnOnce(&mut D) -> R) -> R {
        let result = f(&mut self.store);
        self.clear_cache();
        result
    }

    pub fn into_store(self) -> D {
        self.store
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The live text as last sent to the host.
    pub fn live_text(&self) -> &str {
        self.state.live_text()
    }

    /// Current window size `W`.
    pub fn window_capacity(&self) -> usize {
        let (floor, ceiling) = self.config.window_bounds();
        self.store.max_key_length().clamp(floor, ceiling)
    }

    /// Process one event.
    pub fn process(&mut self, event: Event) -> OutputEdit {
        match event {
            Event::Stroke(stroke) => self.stroke(stroke),
            Event::Undo => self.undo(),
            Event::Reset => {
                self.reset();
                OutputEdit::default()
            }
        }
    }

    /// Append a stroke to the live window.
    ///
    /// A stroke whose own translation is `{PLOVER:backspace}` or
    /// `{PLOVER:reset}` runs that command instead.
    ///
    /// # Panics
    ///
    /// If the stroke has keys outside the steno alphabet.
    pub fn stroke(&mut self, stroke: Stroke) -> OutputEdit {
        assert!(
            stroke.is_valid(),
            "stroke {:#x} has keys outside the steno alphabet",
            stroke.bits()
        );
        if let Some(command) = self.command_for(stroke) {
            debug!("stroke {} runs {:?}", stroke, command);
            return match command {
                Command::Backspace => self.process(Event::Undo),
                Command::Reset => self.process(Event::Reset),
            };
        }
        let window = self.window_capacity();
        let frozen = self.freeze_until(window - 1, window);
        self.state.window.push(stroke);
        assert!(
            self.state.window.len() <= window,
            "live window holds {} strokes, capacity {}",
            self.state.window.len(),
            window
        );

        let edit = self.emit(frozen, window);
        trace!(
            "stroke {} -> {:?} (window {}/{})",
            stroke,
            edit,
            self.state.window.len(),
            window
        );
        edit
    }

    /// Remove the most recent live stroke. Confirmed text is never touched,
    /// so undo with an empty window is a no-op.
    pub fn undo(&mut self) -> OutputEdit {
        if self.state.window.pop().is_none() {
            debug!("undo with empty live window");
            return OutputEdit::default();
        }
        let window = self.window_capacity();
        let frozen = self.freeze_until(window, window);
        let edit = self.emit(frozen, window);
        trace!("undo -> {:?}", edit);
        edit
    }

    /// Clear confirmed text, the live window and the last rendering.
    pub fn reset(&mut self) {
        self.state.clear();
        info!("engine state reset");
    }

    /// Groups of the current live window.
    pub fn live_groups(&mut self) -> Vec<Group> {
        let window = self.window_capacity();
        self.render_window(window).groups
    }

    // ========== Cache Management ==========

    /// Get translation cache statistics as (hits, misses).
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache.hits, self.cache.misses)
    }

    /// Get the cache hit rate (0.0 to 1.0).
    pub fn cache_hit_rate(&self) -> f64 {
        let (hits, misses) = self.cache_stats();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.entries.len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.entries.cap().get()
    }

    /// Drop cached translations; call after the store changes.
    pub fn clear_cache(&mut self) {
        self.cache.entries.clear();
        self.cache.hits = 0;
        self.cache.misses = 0;
    }

    // ========== Internals ==========

    fn command_for(&mut self, stroke: Stroke) -> Option<Command> {
        self.cache
            .resolve(&self.store, std::slice::from_ref(&stroke))
            .and_then(|translation| translation.command())
    }

    fn render_window(&mut self, window: usize) -> Rendering {
        let options = GroupingOptions {
            window,
            fold_suffix_keys: self.config.fold_suffix_keys,
            numbers: self.config.numbers,
        };
        let cache = &mut self.cache;
        let store = &self.store;
        let resolved = group_strokes(&self.state.window, options, |strokes| {
            cache.resolve(store, strokes)
        });
        render(&resolved, self.state.confirmed.context(), &self.orthography)
    }

    /// Freeze leading groups until at most `limit` strokes are live.
    /// Returns the frozen text.
    fn freeze_until(&mut self, limit: usize, window: usize) -> String {
        let mut frozen = String::new();
        while self.state.window.len() > limit {
            let Some(first) = self.render_window(window).groups.into_iter().next() else {
                break;
            };
            self.state.confirmed.push(&first.text, first.state);
            self.state.window.drain(..first.stroke_count);
            debug!(
                "froze {:?} ({} strokes, {} live)",
                first.text,
                first.stroke_count,
                self.state.window.len()
            );
            frozen.push_str(&first.text);
        }
        frozen
    }

    /// Re-render the window and diff against the last live rendering.
    fn emit(&mut self, frozen: String, window: usize) -> OutputEdit {
        let rendering = self.render_window(window);
        let edit = match self.state.last_live.strip_prefix(frozen.as_str()) {
            Some(rest) => OutputEdit::new(rest.chars().count(), rendering.text.as_str()),
            None => {
                // The store changed since the last event, so the frozen text
                // was never shown; replace the whole live region.
                debug!("live text diverged from frozen groups; re-emitting");
                OutputEdit::new(
                    self.state.last_live.chars().count(),
                    format!("{}{}", frozen, rendering.text),
                )
            }
        };
        self.state.last_live = rendering.text;
        edit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::MemoryDictionary;

    fn dict(entries: &[(&str, &str)]) -> MemoryDictionary {
        let mut d = MemoryDictionary::new();
        for (k, v) in entries {
            d.insert_str(k, v).unwrap();
        }
        d
    }

    fn stroke(s: &str) -> Stroke {
        s.parse().unwrap()
    }

    #[test]
    fn recombines_within_window() {
        let mut engine = Engine::new(dict(&[("KAT", "cat"), ("KAT/-S", "cats")]));
        assert_eq!(engine.stroke(stroke("KAT")), OutputEdit::new(0, "cat"));
        assert_eq!(engine.stroke(stroke("-S")), OutputEdit::new(3, "cats"));
        assert_eq!(engine.undo(), OutputEdit::new(4, "cat"));
    }

    #[test]
    fn window_follows_store() {
        let mut engine = Engine::new(dict(&[("KAT", "cat")]));
        assert_eq!(engine.window_capacity(), 1);
        engine.update_store(|d| d.insert_str("KAT/-S/-S", "catses").unwrap());
        assert_eq!(engine.window_capacity(), 3);
        assert_eq!(engine.cache_size(), 0);
    }

    #[test]
    fn window_bounds_clamp() {
        let config = Config {
            window_floor: 4,
            ..Config::default()
        };
        let engine = Engine::with_config(dict(&[("KAT", "cat")]), config);
        assert_eq!(engine.window_capacity(), 4);

        let config = Config {
            window_ceiling: 2,
            ..Config::default()
        };
        let engine = Engine::with_config(dict(&[("A/B/C", "abc")]), config);
        assert_eq!(engine.window_capacity(), 2);
    }

    #[test]
    fn cache_counts_hits() {
        let mut engine = Engine::new(dict(&[("KAT", "cat"), ("KAT/-S", "cats")]));
        engine.stroke(stroke("KAT"));
        engine.stroke(stroke("-S"));
        let (hits, misses) = engine.cache_stats();
        assert!(hits > 0);
        assert!(misses > 0);
        assert!(engine.cache_hit_rate() > 0.0);
        assert_eq!(engine.cache_capacity(), 1024);
        engine.clear_cache();
        assert_eq!(engine.cache_stats(), (0, 0));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut engine = Engine::new(dict(&[("KAT", "cat")]));
        engine.stroke(stroke("KAT"));
        engine.stroke(stroke("KAT"));
        assert!(engine.process(Event::Reset).is_noop());
        assert!(engine.state().window().is_empty());
        assert_eq!(engine.state().confirmed().tail(), "");
        assert_eq!(engine.live_text(), "");
        assert_eq!(engine.stroke(stroke("KAT")), OutputEdit::new(0, "cat"));
    }

    #[test]
    fn command_strokes_run_as_events() {
        let d = dict(&[
            ("KAT", "cat"),
            ("KAT/-S", "cats"),
            ("PW-FP", "{PLOVER:backspace}"),
            ("R-RS", "{PLOVER:reset}"),
        ]);
        let mut engine = Engine::new(d);
        engine.stroke(stroke("KAT"));
        assert_eq!(engine.stroke(stroke("-S")), OutputEdit::new(3, "cats"));
        assert_eq!(engine.stroke(stroke("PW-FP")), OutputEdit::new(4, "cat"));
        assert_eq!(engine.state().window().len(), 1);

        assert!(engine.stroke(stroke("R-RS")).is_noop());
        assert!(engine.state().window().is_empty());
        assert_eq!(engine.live_text(), "");
    }

    #[test]
    fn live_groups_and_store_handoff() {
        let mut engine = Engine::new(dict(&[("KAT", "cat"), ("KAT/-S", "cats"), ("TEFT", "test")]));
        engine.stroke(stroke("KAT"));
        engine.stroke(stroke("-S"));
        let groups = engine.live_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].stroke_count, 2);
        assert_eq!(groups[0].text, "cats");

        let store = engine.into_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&[stroke("TEFT")]), Some("test"));
    }

    #[test]
    #[should_panic(expected = "outside the steno alphabet")]
    fn invalid_stroke_panics() {
        let mut engine = Engine::new(MemoryDictionary::new());
        engine.stroke(Stroke::from_bits_retain(1 << 31));
    }
}
