//! The tagged value model shared by descriptors, lists and references.
//!
//! A [`Descriptor`] owns its nested maps and lists directly; attaching one
//! container to another always copies, so a value tree never contains cycles
//! or live handles.

use serde::{Deserialize, Serialize};
use suite_core::terms::{
    forms, types, DescriptorClassId, DescriptorEnumId, DescriptorEnumTypeId, DescriptorFormId,
    DescriptorKeyId, DescriptorTypeId, DescriptorUnitId,
};
use suite_core::{FourCc, SuiteError, SuiteResult};

/// One value a plugin can store in a descriptor or list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AeteValue {
    Integer(i32),
    Float(f64),
    UnitFloat {
        unit: DescriptorUnitId,
        value: f64,
    },
    Boolean(bool),
    /// Single-byte text as written through the C-string procedures.
    Text(Vec<u8>),
    /// Text captured from an interned string.
    UnicodeText(String),
    Enumerated {
        type_id: DescriptorEnumTypeId,
        value: DescriptorEnumId,
    },
    Class(DescriptorClassId),
    GlobalClass(DescriptorClassId),
    Alias(Vec<u8>),
    RawData(Vec<u8>),
    List(Vec<TaggedValue>),
    Object {
        class: DescriptorClassId,
        global: bool,
        descriptor: Descriptor,
    },
    Reference(Vec<ReferenceStep>),
}

impl AeteValue {
    /// Type id reported to plugins.
    ///
    /// Nested maps report `Objc` whether they were stored as plain or global
    /// objects; both text variants report `TEXT`.
    pub fn type_id(&self) -> DescriptorTypeId {
        match self {
            AeteValue::Integer(_) => types::INTEGER,
            AeteValue::Float(_) => types::FLOAT,
            AeteValue::UnitFloat { .. } => types::UNIT_FLOAT,
            AeteValue::Boolean(_) => types::BOOLEAN,
            AeteValue::Text(_) | AeteValue::UnicodeText(_) => types::CHAR,
            AeteValue::Enumerated { .. } => types::ENUMERATED,
            AeteValue::Class(_) => types::CLASS,
            AeteValue::GlobalClass(_) => types::GLOBAL_CLASS,
            AeteValue::Alias(_) => types::ALIAS,
            AeteValue::RawData(_) => types::RAW_DATA,
            AeteValue::List(_) => types::VALUE_LIST,
            AeteValue::Object { .. } => types::OBJECT,
            AeteValue::Reference(_) => types::OBJECT_REFERENCE,
        }
    }

    /// Byte length recorded alongside variable-length values.
    pub fn byte_len(&self) -> Option<usize> {
        match self {
            AeteValue::Text(bytes) | AeteValue::Alias(bytes) | AeteValue::RawData(bytes) => {
                Some(bytes.len())
            }
            AeteValue::UnicodeText(text) => Some(text.len()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> SuiteResult<i32> {
        match self {
            AeteValue::Integer(v) => Ok(*v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_float(&self) -> SuiteResult<f64> {
        match self {
            AeteValue::Float(v) => Ok(*v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_unit_float(&self) -> SuiteResult<(DescriptorUnitId, f64)> {
        match self {
            AeteValue::UnitFloat { unit, value } => Ok((*unit, *value)),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_boolean(&self) -> SuiteResult<bool> {
        match self {
            AeteValue::Boolean(v) => Ok(*v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    /// Text as single-byte characters. Unicode text is narrowed with
    /// [`crate::zstring::encode_latin1`].
    pub fn text_bytes(&self) -> SuiteResult<Vec<u8>> {
        match self {
            AeteValue::Text(bytes) => Ok(bytes.clone()),
            AeteValue::UnicodeText(text) => Ok(crate::zstring::encode_latin1(text)),
            _ => Err(SuiteError::BadParameter),
        }
    }

    /// Text as a Rust string. Byte text is widened one byte per character.
    pub fn text_string(&self) -> SuiteResult<String> {
        match self {
            AeteValue::Text(bytes) => Ok(crate::zstring::decode_latin1(bytes)),
            AeteValue::UnicodeText(text) => Ok(text.clone()),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_enumerated(&self) -> SuiteResult<(DescriptorEnumTypeId, DescriptorEnumId)> {
        match self {
            AeteValue::Enumerated { type_id, value } => Ok((*type_id, *value)),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_class(&self) -> SuiteResult<DescriptorClassId> {
        match self {
            AeteValue::Class(v) => Ok(*v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_global_class(&self) -> SuiteResult<DescriptorClassId> {
        match self {
            AeteValue::GlobalClass(v) => Ok(*v),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_alias(&self) -> SuiteResult<&[u8]> {
        match self {
            AeteValue::Alias(bytes) => Ok(bytes),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_raw_data(&self) -> SuiteResult<&[u8]> {
        match self {
            AeteValue::RawData(bytes) => Ok(bytes),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_list(&self) -> SuiteResult<&[TaggedValue]> {
        match self {
            AeteValue::List(items) => Ok(items),
            _ => Err(SuiteError::BadParameter),
        }
    }

    /// Nested map stored with the requested globality.
    pub fn as_object(&self, want_global: bool) -> SuiteResult<(DescriptorClassId, &Descriptor)> {
        match self {
            AeteValue::Object {
                class,
                global,
                descriptor,
            } if *global == want_global => Ok((*class, descriptor)),
            _ => Err(SuiteError::BadParameter),
        }
    }

    pub fn as_reference(&self) -> SuiteResult<&[ReferenceStep]> {
        match self {
            AeteValue::Reference(steps) => Ok(steps),
            _ => Err(SuiteError::BadParameter),
        }
    }

    fn depth(&self) -> usize {
        match self {
            AeteValue::List(items) => 1 + items.iter().map(|item| item.value.depth()).max().unwrap_or(0),
            AeteValue::Object { descriptor, .. } => 1 + descriptor.depth(),
            _ => 0,
        }
    }
}

/// A stored value plus the metadata recorded when it was stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedValue {
    pub value: AeteValue,
    /// Flags from the plugin's scripting dictionary for the entry's key.
    pub flags: Option<u16>,
    /// Byte length for text, alias and raw data.
    pub size: Option<u32>,
}

impl TaggedValue {
    /// Wrap a value without dictionary flags.
    pub fn new(value: AeteValue) -> Self {
        Self::with_flags(value, None)
    }

    /// Wrap a value carrying `flags`.
    pub fn with_flags(value: AeteValue, flags: Option<u16>) -> Self {
        let size = value.byte_len().and_then(|len| u32::try_from(len).ok());
        Self { value, flags, size }
    }

    pub fn type_id(&self) -> DescriptorTypeId {
        self.value.type_id()
    }
}

impl From<AeteValue> for TaggedValue {
    fn from(value: AeteValue) -> Self {
        TaggedValue::new(value)
    }
}

/// Insertion-ordered map from key codes to tagged values.
///
/// Replacing an existing key keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    entries: Vec<(DescriptorKeyId, TaggedValue)>,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: DescriptorKeyId) -> Option<&TaggedValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Value under `key`, or bad-parameter if absent.
    pub fn value(&self, key: DescriptorKeyId) -> SuiteResult<&AeteValue> {
        self.get(key).map(|v| &v.value).ok_or(SuiteError::BadParameter)
    }

    /// Store `value` under `key`, replacing any existing entry in place.
    pub fn insert(&mut self, key: DescriptorKeyId, value: TaggedValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: DescriptorKeyId) -> Option<TaggedValue> {
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: DescriptorKeyId) -> bool {
        self.get(key).is_some()
    }

    /// Key at insertion position `index`.
    pub fn key_at(&self, index: usize) -> Option<DescriptorKeyId> {
        self.entries.get(index).map(|(k, _)| *k)
    }

    pub fn keys(&self) -> impl Iterator<Item = DescriptorKeyId> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DescriptorKeyId, &TaggedValue)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Nesting depth of lists and objects below this map.
    pub fn depth(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, v)| v.value.depth())
            .max()
            .unwrap_or(0)
    }

    /// Indented key/type listing, one entry per line.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        outline_descriptor(self, 0, &mut out);
        out
    }
}

fn outline_descriptor(descriptor: &Descriptor, indent: usize, out: &mut String) {
    for (key, entry) in descriptor.iter() {
        out.push_str(&"  ".repeat(indent));
        out.push_str(&format!("{} {}", FourCc(key), FourCc(entry.type_id())));
        outline_value(&entry.value, indent, out);
    }
}

fn outline_value(value: &AeteValue, indent: usize, out: &mut String) {
    match value {
        AeteValue::Integer(v) => out.push_str(&format!(" = {}\n", v)),
        AeteValue::Float(v) => out.push_str(&format!(" = {}\n", v)),
        AeteValue::UnitFloat { unit, value } => {
            out.push_str(&format!(" = {} {}\n", value, FourCc(*unit)))
        }
        AeteValue::Boolean(v) => out.push_str(&format!(" = {}\n", v)),
        AeteValue::Text(bytes) => out.push_str(&format!(
            " = {:?}\n",
            crate::zstring::decode_latin1(bytes)
        )),
        AeteValue::UnicodeText(text) => out.push_str(&format!(" = {:?}\n", text)),
        AeteValue::Enumerated { type_id, value } => {
            out.push_str(&format!(" = {}.{}\n", FourCc(*type_id), FourCc(*value)))
        }
        AeteValue::Class(v) | AeteValue::GlobalClass(v) => {
            out.push_str(&format!(" = {}\n", FourCc(*v)))
        }
        AeteValue::Alias(bytes) | AeteValue::RawData(bytes) => {
            out.push_str(&format!(" ({} bytes)\n", bytes.len()))
        }
        AeteValue::List(items) => {
            out.push_str(&format!(" [{}]\n", items.len()));
            for item in items {
                out.push_str(&"  ".repeat(indent + 1));
                out.push_str(&format!("{}", FourCc(item.type_id())));
                outline_value(&item.value, indent + 1, out);
            }
        }
        AeteValue::Object {
            class, descriptor, ..
        } => {
            out.push_str(&format!(" <{}>\n", FourCc(*class)));
            outline_descriptor(descriptor, indent + 1, out);
        }
        AeteValue::Reference(steps) => {
            out.push_str(&format!(" ({} steps)\n", steps.len()));
        }
    }
}

/// Selector payload of one reference step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceForm {
    Name(Vec<u8>),
    Index(u32),
    Identifier(u32),
    Offset(i32),
    Enumerated {
        type_id: DescriptorEnumTypeId,
        value: DescriptorEnumId,
    },
    Property(DescriptorKeyId),
    Class,
}

impl ReferenceForm {
    /// Form code reported by `GetForm`.
    pub fn form_id(&self) -> DescriptorFormId {
        match self {
            ReferenceForm::Name(_) => forms::NAME,
            ReferenceForm::Index(_) => forms::INDEX,
            ReferenceForm::Identifier(_) => forms::IDENTIFIER,
            ReferenceForm::Offset(_) => forms::OFFSET,
            ReferenceForm::Enumerated { .. } => forms::ENUMERATED,
            ReferenceForm::Property(_) => forms::PROPERTY,
            ReferenceForm::Class => forms::CLASS,
        }
    }
}

/// One step of a reference chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceStep {
    pub desired_class: DescriptorClassId,
    pub form: ReferenceForm,
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite_core::four_char_code;

    const KEY_A: DescriptorKeyId = four_char_code(*b"keyA");
    const KEY_B: DescriptorKeyId = four_char_code(*b"keyB");
    const KEY_C: DescriptorKeyId = four_char_code(*b"keyC");

    #[test]
    fn test_insertion_order_is_kept_on_replace() {
        let mut d = Descriptor::new();
        d.insert(KEY_C, AeteValue::Integer(1).into());
        d.insert(KEY_A, AeteValue::Integer(2).into());
        d.insert(KEY_B, AeteValue::Integer(3).into());
        d.insert(KEY_A, AeteValue::Boolean(true).into());

        assert_eq!(d.keys().collect::<Vec<_>>(), vec![KEY_C, KEY_A, KEY_B]);
        assert_eq!(d.value(KEY_A).unwrap(), &AeteValue::Boolean(true));

        d.remove(KEY_C);
        assert_eq!(d.key_at(0), Some(KEY_A));
        assert_eq!(d.key_at(2), None);
    }

    #[test]
    fn test_nested_maps_report_object() {
        for global in [false, true] {
            let value = AeteValue::Object {
                class: four_char_code(*b"null"),
                global,
                descriptor: Descriptor::new(),
            };
            assert_eq!(value.type_id(), types::OBJECT);
        }
    }

    #[test]
    fn test_object_globality_must_match() {
        let value = AeteValue::Object {
            class: 7,
            global: true,
            descriptor: Descriptor::new(),
        };
        assert!(value.as_object(true).is_ok());
        assert_eq!(value.as_object(false), Err(SuiteError::BadParameter));
    }

    #[test]
    fn test_text_variants_share_type_and_convert() {
        let bytes = AeteValue::Text(b"caf\xe9".to_vec());
        let unicode = AeteValue::UnicodeText("caf\u{e9}".to_string());
        assert_eq!(bytes.type_id(), unicode.type_id());
        assert_eq!(bytes.text_string().unwrap(), "caf\u{e9}");
        assert_eq!(unicode.text_bytes().unwrap(), b"caf\xe9");
        assert_eq!(AeteValue::Integer(1).text_bytes(), Err(SuiteError::BadParameter));
    }

    #[test]
    fn test_tagged_value_records_size() {
        let tagged = TaggedValue::with_flags(AeteValue::RawData(vec![0; 5]), Some(0x8000));
        assert_eq!(tagged.size, Some(5));
        assert_eq!(tagged.flags, Some(0x8000));
        assert_eq!(TaggedValue::new(AeteValue::Integer(3)).size, None);
    }

    #[test]
    fn test_depth_counts_nesting() {
        let mut inner = Descriptor::new();
        inner.insert(KEY_A, AeteValue::List(vec![AeteValue::Integer(1).into()]).into());
        let mut outer = Descriptor::new();
        outer.insert(
            KEY_B,
            AeteValue::Object {
                class: 0,
                global: false,
                descriptor: inner,
            }
            .into(),
        );
        assert_eq!(outer.depth(), 2);
    }

    #[test]
    fn test_outline_lists_keys_in_order() {
        let mut d = Descriptor::new();
        d.insert(KEY_B, AeteValue::Integer(4).into());
        d.insert(KEY_A, AeteValue::UnicodeText("hi".into()).into());
        let outline = d.outline();
        let b = outline.find("keyB").unwrap();
        let a = outline.find("keyA").unwrap();
        assert!(b < a);
        assert!(outline.contains("'long' = 4"));
    }
}
