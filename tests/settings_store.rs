//! Last-used plug-in settings persisted across host instances.

use std::fs;

use suite_core::four_char_code;
use suite_core::terms::units;
use suite_host::config::{HostConfig, PersistenceConfig};
use suite_host::persist::{self, PersistError, SettingsStore};
use suite_host::{AeteValue, Descriptor, HostError, SuiteHost, TaggedValue};
use tempfile::TempDir;

const PLUGIN: &str = "com.example.filters/gaussian blur";

fn parameters() -> Descriptor {
    let mut d = Descriptor::new();
    d.insert(
        four_char_code(*b"Rds "),
        TaggedValue::with_flags(AeteValue::UnitFloat { unit: units::PIXELS, value: 2.5 }, Some(0x8000)),
    );
    d.insert(four_char_code(*b"Nm  "), AeteValue::UnicodeText("Soft".into()).into());
    d
}

fn host_in(dir: &TempDir) -> SuiteHost {
    let config = HostConfig {
        persistence: PersistenceConfig {
            dir: dir.path().join("settings"),
        },
        ..HostConfig::default()
    };
    SuiteHost::new(&config)
}

#[test]
fn test_settings_survive_a_new_host() {
    let dir = TempDir::new().unwrap();
    let path = host_in(&dir).save_settings(PLUGIN, &parameters()).unwrap();
    assert!(path.starts_with(dir.path()));
    assert_eq!(path.extension().unwrap(), "desc");

    let loaded = host_in(&dir).load_settings(PLUGIN).unwrap();
    assert_eq!(loaded, Some(parameters()));
}

#[test]
fn test_missing_settings_are_none() {
    let dir = TempDir::new().unwrap();
    assert_eq!(host_in(&dir).load_settings("never.saved").unwrap(), None);
}

#[test]
fn test_plugin_ids_are_sanitised_into_one_directory() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path());
    let path = store.path_for(PLUGIN);
    assert_eq!(path.parent().unwrap(), dir.path());
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "com.example.filters_gaussian_blur.desc"
    );

    store.save(PLUGIN, &parameters()).unwrap();
    assert!(store.remove(PLUGIN).unwrap());
    assert!(!store.remove(PLUGIN).unwrap());
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path());
    fs::write(store.path_for(PLUGIN), b"not a descriptor").unwrap();

    let err = store.load(PLUGIN).unwrap_err();
    assert!(matches!(err, HostError::Persist(PersistError::BadMagic)));
}

#[test]
fn test_scripting_blocks_use_the_settings_format() {
    let host = SuiteHost::new(&HostConfig::default());
    let block = host.set_scripting_data(parameters()).unwrap();

    let bytes = host
        .with(|session| Ok(session.blocks.bytes(block)?.to_vec()))
        .unwrap();
    assert_eq!(&bytes[..4], &persist::MAGIC);
    assert_eq!(persist::decode(&bytes).unwrap(), parameters());

    assert_eq!(host.take_scripting_data(block).unwrap(), parameters());
}
