//! Persisted descriptor settings.
//!
//! ## Wire format
//!
//! ```text
//! "SHDS" | version: u16 | bincode(Descriptor)
//! ```
//!
//! The payload is the full value tree (key order, tags, flags and nesting),
//! encoded with bincode's default options and a size limit. Trees nested
//! deeper than [`MAX_DECODE_DEPTH`] are refused in both directions.
//!
//! [`SettingsStore`] keeps one file per plugin identifier so that a plugin's
//! last-used parameters survive host sessions.

use std::fs;
use std::path::{Path, PathBuf};

use bincode::Options;
use suite_core::limits::{MAX_BLOCK_BYTES, MAX_DECODE_DEPTH};
use suite_core::SuiteError;
use thiserror::Error;
use tracing::{debug, info};

use crate::value::Descriptor;

/// Leading bytes of every persisted descriptor.
pub const MAGIC: [u8; 4] = *b"SHDS";

/// Current format version.
pub const FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = MAGIC.len() + 2;

/// File extension used by [`SettingsStore`].
pub const SETTINGS_EXTENSION: &str = "desc";

/// Failure to encode or decode persisted settings.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("not a persisted descriptor (bad magic)")]
    BadMagic,

    #[error("unsupported persisted descriptor version {0}")]
    UnsupportedVersion(u16),

    #[error("descriptor nests deeper than {} levels", MAX_DECODE_DEPTH)]
    TooDeep,

    #[error("descriptor codec error: {0}")]
    Codec(#[from] bincode::Error),
}

impl From<PersistError> for SuiteError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Codec(inner) if matches!(*inner, bincode::ErrorKind::SizeLimit) => {
                SuiteError::OutOfMemory
            }
            _ => SuiteError::BadParameter,
        }
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_BLOCK_BYTES as u64)
}

/// Serialize a descriptor tree.
pub fn encode(descriptor: &Descriptor) -> Result<Vec<u8>, PersistError> {
    if descriptor.depth() > MAX_DECODE_DEPTH {
        return Err(PersistError::TooDeep);
    }
    let payload = codec().serialize(descriptor)?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Deserialize a descriptor tree written by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Descriptor, PersistError> {
    if bytes.len() < HEADER_LEN || bytes[..MAGIC.len()] != MAGIC {
        return Err(PersistError::BadMagic);
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(version));
    }
    let descriptor: Descriptor = codec().deserialize(&bytes[HEADER_LEN..])?;
    if descriptor.depth() > MAX_DECODE_DEPTH {
        return Err(PersistError::TooDeep);
    }
    Ok(descriptor)
}

/// Per-plugin settings files in one directory.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the settings of `plugin_id`.
    ///
    /// Characters other than ASCII alphanumerics, `-`, `_` and `.` are replaced
    /// with `_`.
    pub fn path_for(&self, plugin_id: &str) -> PathBuf {
        let stem: String = plugin_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.{}", stem, SETTINGS_EXTENSION))
    }

    /// Write `descriptor` as the settings of `plugin_id`, replacing any
    /// previous file.
    pub fn save(&self, plugin_id: &str, descriptor: &Descriptor) -> crate::HostResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(plugin_id);
        let staging = path.with_extension("tmp");
        fs::write(&staging, encode(descriptor)?)?;
        fs::rename(&staging, &path)?;
        info!(plugin = plugin_id, path = %path.display(), "saved plugin settings");
        Ok(path)
    }

    /// Settings of `plugin_id`, if any were saved.
    pub fn load(&self, plugin_id: &str) -> crate::HostResult<Option<Descriptor>> {
        let path = self.path_for(plugin_id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(plugin = plugin_id, "no saved settings");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Some(decode(&bytes)?))
    }

    /// Delete the settings of `plugin_id`. Returns whether a file existed.
    pub fn remove(&self, plugin_id: &str) -> crate::HostResult<bool> {
        match fs::remove_file(self.path_for(plugin_id)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{AeteValue, ReferenceForm, ReferenceStep, TaggedValue};
    use suite_core::four_char_code;
    use suite_core::terms::units;

    fn sample() -> Descriptor {
        let mut nested = Descriptor::new();
        nested.insert(four_char_code(*b"Hrzn"), AeteValue::Float(0.25).into());

        let mut d = Descriptor::new();
        d.insert(
            four_char_code(*b"Rds "),
            TaggedValue::with_flags(
                AeteValue::UnitFloat { unit: units::PIXELS, value: 3.5 },
                Some(0x8000),
            ),
        );
        d.insert(four_char_code(*b"Nm  "), AeteValue::Text(b"blur".to_vec()).into());
        d.insert(
            four_char_code(*b"Lst "),
            AeteValue::List(vec![AeteValue::Integer(1).into(), AeteValue::Boolean(false).into()]).into(),
        );
        d.insert(
            four_char_code(*b"Ofst"),
            AeteValue::Object { class: four_char_code(*b"Pnt "), global: false, descriptor: nested }.into(),
        );
        d.insert(
            four_char_code(*b"null"),
            AeteValue::Reference(vec![ReferenceStep {
                desired_class: four_char_code(*b"Lyr "),
                form: ReferenceForm::Name(b"Layer 1".to_vec()),
            }])
            .into(),
        );
        d
    }

    #[test]
    fn test_round_trip_preserves_order_and_tags() {
        let d = sample();
        let decoded = decode(&encode(&d).unwrap()).unwrap();
        assert_eq!(decoded, d);
        assert_eq!(decoded.keys().collect::<Vec<_>>(), d.keys().collect::<Vec<_>>());
    }

    #[test]
    fn test_rejects_foreign_bytes() {
        assert!(matches!(decode(b"nope"), Err(PersistError::BadMagic)));

        let mut bytes = encode(&sample()).unwrap();
        bytes[4] = 9;
        assert!(matches!(decode(&bytes), Err(PersistError::UnsupportedVersion(9))));

        let mut truncated = encode(&sample()).unwrap();
        truncated.truncate(truncated.len() - 3);
        let err = decode(&truncated).unwrap_err();
        assert_eq!(SuiteError::from(err), SuiteError::BadParameter);
    }

    #[test]
    fn test_refuses_excessive_nesting() {
        let mut d = Descriptor::new();
        for _ in 0..=MAX_DECODE_DEPTH {
            let mut outer = Descriptor::new();
            outer.insert(1, AeteValue::Object { class: 0, global: false, descriptor: d }.into());
            d = outer;
        }
        assert!(matches!(encode(&d), Err(PersistError::TooDeep)));
    }

    #[test]
    fn test_settings_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings"));

        assert!(store.load("com.example/blur").unwrap().is_none());
        let path = store.save("com.example/blur", &sample()).unwrap();
        assert_eq!(path.file_name().unwrap(), "com.example_blur.desc");

        assert_eq!(store.load("com.example/blur").unwrap(), Some(sample()));
        assert!(store.remove("com.example/blur").unwrap());
        assert!(!store.remove("com.example/blur").unwrap());
    }
}
