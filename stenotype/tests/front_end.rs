//! Engine assembly from configuration files.

use std::path::PathBuf;

use libsteno_core::{CompiledDictionary, Dictionary, MemoryDictionary, StrokeSequence, TextBuffer, UserDictionary};
use stenotype::{build_dictionary, build_engine, load_store, LineDecoder, StenotypeConfig};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("stenotype_{}_{}", std::process::id(), name))
}

fn translate(config: &StenotypeConfig, line: &str) -> String {
    let mut engine = build_engine(config).unwrap();
    let decoder = LineDecoder::new(config.undo_token.clone());
    let mut buffer = TextBuffer::new();
    for event in decoder.decode_line(line) {
        buffer.apply(&engine.process(event));
    }
    buffer.text().to_string()
}

#[test]
fn test_demo_dictionary_fallback() {
    let config = StenotypeConfig::default();
    let stack = build_dictionary(&config).unwrap();
    assert_eq!(stack.len(), 1);
    assert_eq!(translate(&config, "KPA KAT/-S TP-PL"), "Cats.");
}

#[test]
fn test_json_and_compiled_layers() {
    let json_path = temp_path("high.json");
    std::fs::write(&json_path, r#"{"KAT": "kitten"}"#).unwrap();

    let fst_path = temp_path("low.fst");
    let low = MemoryDictionary::from_json_str(r#"{"KAT": "cat", "TEFT": "test"}"#).unwrap();
    CompiledDictionary::compile(&low)
        .unwrap()
        .save(fst_path.clone(), fst_path.with_extension("bincode"))
        .unwrap();

    let compiled = load_store(&fst_path).unwrap();
    assert_eq!(compiled.max_key_length(), 1);

    let config = StenotypeConfig {
        dictionaries: vec![json_path.clone(), fst_path.clone()],
        ..StenotypeConfig::default()
    };
    assert_eq!(translate(&config, "KAT TEFT"), "kitten test");

    let _ = std::fs::remove_file(&json_path);
    let _ = std::fs::remove_file(&fst_path);
    let _ = std::fs::remove_file(fst_path.with_extension("bincode"));
}

#[test]
fn test_user_dictionary_and_word_list() {
    let db_path = temp_path("user.redb");
    let _ = std::fs::remove_file(&db_path);
    {
        let user = UserDictionary::new(&db_path).unwrap();
        user.add(&"PWUS".parse::<StrokeSequence>().unwrap(), "bus").unwrap();
    }
    let words_path = temp_path("words.txt");
    std::fs::write(&words_path, "buss\n").unwrap();

    let mut config = StenotypeConfig {
        user_dictionary: Some(db_path.clone()),
        ..StenotypeConfig::default()
    };
    config.base_mut().orthography = libsteno_core::OrthographyPolicy::Extended;
    config.base_mut().window_floor = 2;
    assert_eq!(translate(&config, "PWUS -S"), "buses");

    config.word_list = Some(words_path.clone());
    assert_eq!(translate(&config, "PWUS -S"), "buss");

    let _ = std::fs::remove_file(&db_path);
    let _ = std::fs::remove_file(&words_path);
}

#[test]
fn test_custom_undo_token() {
    let config = StenotypeConfig::from_toml_str("undo_token = \"UNDO\"\n").unwrap();
    assert_eq!(translate(&config, "TEFT KAT UNDO"), "test");
}

#[test]
fn test_missing_dictionary_is_an_error() {
    let config = StenotypeConfig {
        dictionaries: vec![temp_path("does_not_exist.json")],
        ..StenotypeConfig::default()
    };
    assert!(build_engine(&config).is_err());
}
