//! Interned, reference-counted strings behind the ZString suite.
//!
//! Every string starts with a reference count of one. `release` drops the
//! entry when the count reaches zero; the handle is unusable afterwards.
//!
//! [`EMPTY_ZSTRING`] is a reserved handle that is never minted and has no
//! table entry. Reference counting it is a no-op, and edits that would make it
//! non-empty are refused.
//!
//! Single-byte formats (C and Pascal strings) map one byte to one character
//! (Latin-1); characters outside that range are written as `?`.

use suite_core::handle::MAX_MINTED;
use suite_core::limits::MAX_PASCAL_LEN;
use suite_core::{HandleTable, SuiteError, SuiteResult, ZStringHandle};
use tracing::{debug, warn};

/// The shared empty string.
pub const EMPTY_ZSTRING: ZStringHandle = ZStringHandle(MAX_MINTED + 1);

struct ZString {
    text: String,
    refs: u32,
}

/// Table of live interned strings.
#[derive(Debug, Default)]
pub struct ZStringTable {
    strings: HandleTable<ZStringHandle, ZString>,
}

impl ZStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text` with a reference count of one.
    pub fn make(&mut self, text: String) -> SuiteResult<ZStringHandle> {
        let handle = self.strings.insert(ZString { text, refs: 1 })?;
        debug!(%handle, "zstring created");
        Ok(handle)
    }

    /// From UTF-16 code units, stopping at the first NUL.
    pub fn make_from_unicode(&mut self, units: &[u16]) -> SuiteResult<ZStringHandle> {
        let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
        self.make(String::from_utf16_lossy(&units[..end]))
    }

    /// From single-byte characters, stopping at the first NUL.
    pub fn make_from_c_string(&mut self, bytes: &[u8]) -> SuiteResult<ZStringHandle> {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.make(decode_latin1(&bytes[..end]))
    }

    /// From a length-prefixed string; `bytes` covers the prefix and payload.
    pub fn make_from_pascal_string(&mut self, bytes: &[u8]) -> SuiteResult<ZStringHandle> {
        let text = match bytes.split_first() {
            Some((&len, payload)) => decode_latin1(&payload[..payload.len().min(len as usize)]),
            None => String::new(),
        };
        self.make(text)
    }

    pub fn make_romanization_of_integer(&mut self, value: i32) -> SuiteResult<ZStringHandle> {
        self.make(value.to_string())
    }

    pub fn make_romanization_of_double(&mut self, value: f64) -> SuiteResult<ZStringHandle> {
        self.make(value.to_string())
    }

    /// Fixed-point romanization is not offered by this host.
    pub fn make_romanization_of_fixed(
        &mut self,
        _value: i32,
        _places: i16,
        _trim: bool,
        _is_signed: bool,
    ) -> SuiteResult<ZStringHandle> {
        Err(SuiteError::Unimplemented)
    }

    /// Independent copy with its own reference count.
    pub fn copy(&mut self, source: ZStringHandle) -> SuiteResult<ZStringHandle> {
        if source == EMPTY_ZSTRING {
            return Ok(EMPTY_ZSTRING);
        }
        let text = self.text(source)?.to_string();
        self.make(text)
    }

    pub fn add_ref(&mut self, handle: ZStringHandle) -> SuiteResult<()> {
        if handle == EMPTY_ZSTRING {
            return Ok(());
        }
        let entry = self.entry_mut(handle)?;
        entry.refs = entry.refs.saturating_add(1);
        Ok(())
    }

    pub fn release(&mut self, handle: ZStringHandle) -> SuiteResult<()> {
        if handle == EMPTY_ZSTRING {
            return Ok(());
        }
        let entry = self.entry_mut(handle)?;
        entry.refs -= 1;
        if entry.refs == 0 {
            self.strings.remove(handle)?;
            debug!(%handle, "zstring freed");
        }
        Ok(())
    }

    /// Current text.
    pub fn text(&self, handle: ZStringHandle) -> SuiteResult<&str> {
        if handle == EMPTY_ZSTRING {
            return Ok("");
        }
        match self.strings.get(handle) {
            Ok(entry) => Ok(&entry.text),
            Err(err) => {
                warn!(%handle, "unknown zstring");
                Err(err)
            }
        }
    }

    /// Reference count of a live string.
    pub fn ref_count(&self, handle: ZStringHandle) -> SuiteResult<u32> {
        Ok(self.strings.get(handle)?.refs)
    }

    /// Insert the text of `replacement` at character `index`.
    pub fn replace(
        &mut self,
        handle: ZStringHandle,
        index: usize,
        replacement: ZStringHandle,
    ) -> SuiteResult<()> {
        let insert = self.text(replacement)?.to_string();
        if insert.is_empty() {
            self.text(handle)?;
            return Ok(());
        }
        self.edit(handle, |text| {
            let at = byte_offset(text, index).ok_or(SuiteError::BadParameter)?;
            text.insert_str(at, &insert);
            Ok(())
        })
    }

    /// Whether [`ZStringTable::replace`] would accept `index`.
    pub fn will_replace(&self, handle: ZStringHandle, index: usize) -> SuiteResult<bool> {
        Ok(index <= self.text(handle)?.chars().count())
    }

    /// Drop one trailing ellipsis, written as `...` or `\u{2026}`.
    pub fn trim_ellipsis(&mut self, handle: ZStringHandle) -> SuiteResult<()> {
        self.edit(handle, |text| {
            let kept = text
                .strip_suffix("...")
                .or_else(|| text.strip_suffix('\u{2026}'))
                .map(str::len);
            if let Some(len) = kept {
                text.truncate(len);
            }
            Ok(())
        })
    }

    /// Strip surrounding `' '` characters. Other whitespace is kept.
    pub fn trim_spaces(&mut self, handle: ZStringHandle) -> SuiteResult<()> {
        self.edit(handle, |text| {
            let trimmed = text.trim_matches(' ').to_string();
            *text = trimmed;
            Ok(())
        })
    }

    /// Strip mnemonic markers; `&&` collapses to a literal `&`.
    pub fn remove_accelerators(&mut self, handle: ZStringHandle) -> SuiteResult<()> {
        self.edit(handle, |text| {
            *text = strip_accelerators(text);
            Ok(())
        })
    }

    /// True for strings made only of whitespace, including the empty string.
    pub fn is_all_white_space(&self, handle: ZStringHandle) -> SuiteResult<bool> {
        Ok(self.text(handle)?.chars().all(char::is_whitespace))
    }

    pub fn is_empty_string(&self, handle: ZStringHandle) -> SuiteResult<bool> {
        Ok(self.text(handle)?.is_empty())
    }

    /// UTF-16 length including the terminator.
    pub fn length_as_unicode_c_string(&self, handle: ZStringHandle) -> SuiteResult<usize> {
        Ok(self.text(handle)?.encode_utf16().count() + 1)
    }

    /// Write a NUL-terminated UTF-16 string; nothing is written unless it fits.
    pub fn write_unicode_c_string(&self, handle: ZStringHandle, buffer: &mut [u16]) -> SuiteResult<()> {
        let units: Vec<u16> = self.text(handle)?.encode_utf16().collect();
        if buffer.len() < units.len() + 1 {
            return Err(SuiteError::BufferTooSmall);
        }
        buffer[..units.len()].copy_from_slice(&units);
        buffer[units.len()] = 0;
        Ok(())
    }

    /// Single-byte length including the terminator.
    pub fn length_as_c_string(&self, handle: ZStringHandle) -> SuiteResult<usize> {
        Ok(self.text(handle)?.chars().count() + 1)
    }

    /// Write a NUL-terminated single-byte string; nothing is written unless it fits.
    pub fn write_c_string(&self, handle: ZStringHandle, buffer: &mut [u8]) -> SuiteResult<()> {
        let bytes = encode_latin1(self.text(handle)?);
        if buffer.len() < bytes.len() + 1 {
            return Err(SuiteError::BufferTooSmall);
        }
        buffer[..bytes.len()].copy_from_slice(&bytes);
        buffer[bytes.len()] = 0;
        Ok(())
    }

    /// Pascal length including the prefix byte; payloads cap at 255 bytes.
    pub fn length_as_pascal_string(&self, handle: ZStringHandle) -> SuiteResult<usize> {
        Ok(self.text(handle)?.chars().count().min(MAX_PASCAL_LEN) + 1)
    }

    /// Write a length-prefixed string; nothing is written unless it fits.
    pub fn write_pascal_string(&self, handle: ZStringHandle, buffer: &mut [u8]) -> SuiteResult<()> {
        let mut bytes = encode_latin1(self.text(handle)?);
        bytes.truncate(MAX_PASCAL_LEN);
        if buffer.len() < bytes.len() + 1 {
            return Err(SuiteError::BufferTooSmall);
        }
        buffer[0] = bytes.len() as u8;
        buffer[1..=bytes.len()].copy_from_slice(&bytes);
        Ok(())
    }

    /// Number of live strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    fn entry_mut(&mut self, handle: ZStringHandle) -> SuiteResult<&mut ZString> {
        self.strings.get_mut(handle).map_err(|err| {
            warn!(%handle, "unknown zstring");
            err
        })
    }

    fn edit(
        &mut self,
        handle: ZStringHandle,
        f: impl FnOnce(&mut String) -> SuiteResult<()>,
    ) -> SuiteResult<()> {
        if handle == EMPTY_ZSTRING {
            let mut scratch = String::new();
            f(&mut scratch)?;
            return if scratch.is_empty() {
                Ok(())
            } else {
                Err(SuiteError::BadParameter)
            };
        }
        f(&mut self.entry_mut(handle)?.text)
    }
}

fn byte_offset(text: &str, char_index: usize) -> Option<usize> {
    if char_index == text.chars().count() {
        return Some(text.len());
    }
    text.char_indices().nth(char_index).map(|(at, _)| at)
}

/// Remove single `&` markers and collapse `&&` to `&`.
pub fn strip_accelerators(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '&' {
            out.push(c);
        } else if chars.peek() == Some(&'&') {
            chars.next();
            out.push('&');
        }
    }
    out
}

/// One character per byte.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// One byte per character; characters above U+00FF become `?`.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_round_trip() {
        let mut table = ZStringTable::new();

        let h = table.make_from_c_string(b"Radius\0junk").unwrap();
        assert_eq!(table.text(h).unwrap(), "Radius");
        let mut c = [0u8; 7];
        table.write_c_string(h, &mut c).unwrap();
        assert_eq!(&c, b"Radius\0");

        let wide: Vec<u16> = "H\u{e9}llo".encode_utf16().collect();
        let h = table.make_from_unicode(&wide).unwrap();
        let mut w = [0u16; 6];
        table.write_unicode_c_string(h, &mut w).unwrap();
        assert_eq!(&w[..5], &wide[..]);
        assert_eq!(w[5], 0);

        let h = table.make_from_pascal_string(b"\x03abcdef").unwrap();
        assert_eq!(table.text(h).unwrap(), "abc");
        let mut p = [0u8; 4];
        table.write_pascal_string(h, &mut p).unwrap();
        assert_eq!(&p, b"\x03abc");
    }

    #[test]
    fn test_undersized_buffer_is_untouched() {
        let mut table = ZStringTable::new();
        let h = table.make("abcd".into()).unwrap();
        assert_eq!(table.length_as_c_string(h).unwrap(), 5);

        let mut buffer = [0xAAu8; 4];
        assert_eq!(table.write_c_string(h, &mut buffer), Err(SuiteError::BufferTooSmall));
        assert_eq!(buffer, [0xAA; 4]);

        let mut wide = [7u16; 4];
        assert_eq!(
            table.write_unicode_c_string(h, &mut wide),
            Err(SuiteError::BufferTooSmall)
        );
        assert_eq!(wide, [7; 4]);

        let mut pascal = [1u8; 4];
        assert_eq!(table.write_pascal_string(h, &mut pascal), Err(SuiteError::BufferTooSmall));
        assert_eq!(pascal, [1; 4]);
    }

    #[test]
    fn test_reference_counting() {
        let mut table = ZStringTable::new();
        let h = table.make("x".into()).unwrap();
        table.add_ref(h).unwrap();
        table.add_ref(h).unwrap();
        assert_eq!(table.ref_count(h).unwrap(), 3);

        table.release(h).unwrap();
        table.release(h).unwrap();
        assert!(table.text(h).is_ok());
        table.release(h).unwrap();

        assert_eq!(table.text(h), Err(SuiteError::BadParameter));
        assert_eq!(table.release(h), Err(SuiteError::BadParameter));
        assert_eq!(table.add_ref(h), Err(SuiteError::BadParameter));
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_handle_needs_no_entry() {
        let mut table = ZStringTable::new();
        assert_eq!(table.text(EMPTY_ZSTRING).unwrap(), "");
        table.add_ref(EMPTY_ZSTRING).unwrap();
        table.release(EMPTY_ZSTRING).unwrap();
        table.release(EMPTY_ZSTRING).unwrap();
        assert!(table.is_empty_string(EMPTY_ZSTRING).unwrap());
        assert!(table.is_all_white_space(EMPTY_ZSTRING).unwrap());
        assert_eq!(table.copy(EMPTY_ZSTRING).unwrap(), EMPTY_ZSTRING);
        table.trim_spaces(EMPTY_ZSTRING).unwrap();

        let word = table.make("w".into()).unwrap();
        assert_eq!(
            table.replace(EMPTY_ZSTRING, 0, word),
            Err(SuiteError::BadParameter)
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_accelerators() {
        assert_eq!(strip_accelerators("A && B && &C"), "A & B & C");
        assert_eq!(strip_accelerators("&Open"), "Open");
        assert_eq!(strip_accelerators("Save &As..."), "Save As...");
        assert_eq!(strip_accelerators("&&&x"), "&x");

        let mut table = ZStringTable::new();
        let h = table.make("Fi&le".into()).unwrap();
        table.remove_accelerators(h).unwrap();
        assert_eq!(table.text(h).unwrap(), "File");
    }

    #[test]
    fn test_trim_edits() {
        let mut table = ZStringTable::new();
        let h = table.make("  Options...  ".into()).unwrap();
        table.trim_spaces(h).unwrap();
        assert_eq!(table.text(h).unwrap(), "Options...");
        table.trim_ellipsis(h).unwrap();
        assert_eq!(table.text(h).unwrap(), "Options");

        let u = table.make("More\u{2026}".into()).unwrap();
        table.trim_ellipsis(u).unwrap();
        assert_eq!(table.text(u).unwrap(), "More");

        let tabbed = table.make(" \tIndented\n ".into()).unwrap();
        table.trim_spaces(tabbed).unwrap();
        assert_eq!(table.text(tabbed).unwrap(), "\tIndented\n");
    }

    #[test]
    fn test_replace_inserts_at_offset() {
        let mut table = ZStringTable::new();
        let target = table.make("Hello!".into()).unwrap();
        let insert = table.make(", world".into()).unwrap();

        assert!(table.will_replace(target, 5).unwrap());
        assert!(!table.will_replace(target, 7).unwrap());

        table.replace(target, 5, insert).unwrap();
        assert_eq!(table.text(target).unwrap(), "Hello, world!");

        assert_eq!(table.replace(target, 99, insert), Err(SuiteError::BadParameter));
        table.replace(target, 99, EMPTY_ZSTRING).unwrap();
        assert_eq!(table.text(target).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_romanization_and_copy() {
        let mut table = ZStringTable::new();
        let i = table.make_romanization_of_integer(-42).unwrap();
        assert_eq!(table.text(i).unwrap(), "-42");
        let d = table.make_romanization_of_double(2.5).unwrap();
        assert_eq!(table.text(d).unwrap(), "2.5");
        assert_eq!(
            table.make_romanization_of_fixed(1, 2, true, true),
            Err(SuiteError::Unimplemented)
        );

        let c = table.copy(d).unwrap();
        assert_ne!(c, d);
        table.release(d).unwrap();
        assert_eq!(table.text(c).unwrap(), "2.5");
    }

    #[test]
    fn test_pascal_caps_at_255() {
        let mut table = ZStringTable::new();
        let h = table.make("x".repeat(300)).unwrap();
        assert_eq!(table.length_as_pascal_string(h).unwrap(), 256);
        let mut buffer = vec![0u8; 256];
        table.write_pascal_string(h, &mut buffer).unwrap();
        assert_eq!(buffer[0], 255);
    }

    #[test]
    fn test_latin1_mapping() {
        assert_eq!(decode_latin1(b"\xe9"), "\u{e9}");
        assert_eq!(encode_latin1("\u{e9}\u{263a}"), vec![0xE9, b'?']);
    }
}
