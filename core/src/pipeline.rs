//! Worker thread that owns an [`Engine`].
//!
//! Events go in through one bounded channel and edits come out of another,
//! both in order. A full queue blocks the producer instead of dropping
//! events. The engine is handed back when the worker shuts down.
//!
//! Both queues are bounded, so a caller that sends from the same thread it
//! drains edits on must not run more than `capacity` events ahead.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, SendError, Sender};
use tracing::{debug, info};

use crate::dictionary::Dictionary;
use crate::engine::{Engine, Event};
use crate::error::StenoError;
use crate::output::OutputEdit;

/// Channels to and from a translator worker.
pub struct TranslatorHandle<D> {
    pub events: Sender<Event>,
    pub edits: Receiver<OutputEdit>,
    worker: JoinHandle<Engine<D>>,
}

/// Move `engine` onto a named worker thread. `capacity` bounds each queue
/// (0 makes them rendezvous channels).
pub fn spawn_translator<D>(engine: Engine<D>, capacity: usize) -> io::Result<TranslatorHandle<D>>
where
    D: Dictionary + Send + 'static,
{
    let (event_tx, event_rx) = bounded::<Event>(capacity);
    let (edit_tx, edit_rx) = bounded::<OutputEdit>(capacity);

    let worker = thread::Builder::new()
        .name("steno-translator".to_string())
        .spawn(move || run(engine, event_rx, edit_tx))?;

    Ok(TranslatorHandle {
        events: event_tx,
        edits: edit_rx,
        worker,
    })
}

fn run<D: Dictionary>(mut engine: Engine<D>, events: Receiver<Event>, edits: Sender<OutputEdit>) -> Engine<D> {
    info!("translator started (window {})", engine.window_capacity());
    let mut processed = 0usize;
    for event in events {
        let edit = engine.process(event);
        processed += 1;
        if edits.send(edit).is_err() {
            debug!("edit receiver dropped; stopping");
            break;
        }
    }
    info!("translator stopped after {} events", processed);
    engine
}

impl<D> TranslatorHandle<D> {
    /// Queue an event, blocking while the queue is full.
    pub fn send(&self, event: Event) -> Result<(), SendError<Event>> {
        self.events.send(event)
    }

    /// Close the event queue, collect the edits still in flight and wait for
    /// the worker. Every clone of `events` must be dropped first.
    pub fn finish(self) -> Result<(Engine<D>, Vec<OutputEdit>), StenoError> {
        let mut remaining = Vec::new();
        let engine = self.finish_with(|edit| remaining.push(edit))?;
        Ok((engine, remaining))
    }

    /// Like [`finish`](Self::finish), but hands each edit to `on_edit` as it
    /// arrives. Producers holding clones of `events` keep the worker running
    /// until they drop them.
    pub fn finish_with(self, mut on_edit: impl FnMut(OutputEdit)) -> Result<Engine<D>, StenoError> {
        let TranslatorHandle { events, edits, worker } = self;
        drop(events);
        for edit in edits.iter() {
            on_edit(edit);
        }
        worker.join().map_err(|_| StenoError::WorkerPanicked)
    }
}
