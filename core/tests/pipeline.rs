//! Translator worker: ordering, backpressure and shutdown.

use std::thread;

use libsteno_core::{spawn_translator, Engine, Event, MemoryDictionary, OutputEdit, TextBuffer};

fn events(strokes: &[&str]) -> Vec<Event> {
    strokes
        .iter()
        .map(|s| match *s {
            "*" => Event::Undo,
            "!reset" => Event::Reset,
            s => Event::Stroke(s.parse().unwrap()),
        })
        .collect()
}

#[test]
fn test_pipeline_matches_direct_engine() {
    let strokes = ["KPA", "KAT", "-S", "TEFT", "-G", "*", "TP-PL", "TRAOEU", "-S", "KW-BG", "PHAEUBG", "-G"];

    let mut direct = Engine::new(MemoryDictionary::load_demo());
    let expected: Vec<OutputEdit> = events(&strokes).into_iter().map(|e| direct.process(e)).collect();

    let handle = spawn_translator(Engine::new(MemoryDictionary::load_demo()), 2).unwrap();
    let producer = {
        let tx = handle.events.clone();
        let events = events(&strokes);
        thread::spawn(move || {
            for event in events {
                tx.send(event).unwrap();
            }
        })
    };

    let mut received = Vec::new();
    for _ in 0..strokes.len() {
        received.push(handle.edits.recv().unwrap());
    }
    producer.join().unwrap();
    let (engine, rest) = handle.finish().unwrap();

    assert!(rest.is_empty());
    assert_eq!(received, expected);
    assert_eq!(engine.live_text(), direct.live_text());
}

#[test]
fn test_one_edit_per_event() {
    let strokes = ["KAT", "*", "*", "!reset", "TEFT"];
    let handle = spawn_translator(Engine::new(MemoryDictionary::load_demo()), 8).unwrap();
    for event in events(&strokes) {
        handle.send(event).unwrap();
    }
    let (_, edits) = handle.finish().unwrap();
    assert_eq!(edits.len(), strokes.len());

    let mut buffer = TextBuffer::new();
    for edit in &edits {
        buffer.apply(edit);
    }
    assert_eq!(buffer.text(), "test");
}

#[test]
fn test_dropped_receiver_stops_worker() {
    let handle = spawn_translator(Engine::new(MemoryDictionary::load_demo()), 0).unwrap();
    let libsteno_core::TranslatorHandle { events, edits, .. } = handle;
    drop(edits);
    // The worker exits after its first failed send; later sends fail.
    let _ = events.send(Event::Undo);
    let mut failed = false;
    for _ in 0..8 {
        if events.send(Event::Undo).is_err() {
            failed = true;
            break;
        }
    }
    assert!(failed);
}
