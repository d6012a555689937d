//! A plugin's declared scripting dictionary.
//!
//! The dictionary lists the parameters a plugin exposes to automation. The
//! descriptor table consults it to annotate newly stored values with the
//! parameter's flags.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use suite_core::terms::{DescriptorKeyId, DescriptorTypeId};

/// Parameter flag bits.
pub mod flags {
    /// The parameter may be omitted.
    pub const OPTIONAL: u16 = 0x8000;
    /// The parameter is an enumeration.
    pub const ENUMERATED: u16 = 0x2000;
    /// The parameter is a list.
    pub const LIST: u16 = 0x0040;
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptingParameter {
    pub key: DescriptorKeyId,
    pub name: String,
    pub type_id: DescriptorTypeId,
    pub flags: u16,
}

/// Parameters keyed by descriptor key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptingDictionary {
    parameters: HashMap<DescriptorKeyId, ScriptingParameter>,
}

impl ScriptingDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter declaration.
    pub fn declare(&mut self, parameter: ScriptingParameter) {
        self.parameters.insert(parameter.key, parameter);
    }

    pub fn parameter(&self, key: DescriptorKeyId) -> Option<&ScriptingParameter> {
        self.parameters.get(&key)
    }

    /// Flags to record on a value stored under `key`.
    pub fn flags_for(&self, key: DescriptorKeyId) -> Option<u16> {
        self.parameters.get(&key).map(|p| p.flags)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl FromIterator<ScriptingParameter> for ScriptingDictionary {
    fn from_iter<I: IntoIterator<Item = ScriptingParameter>>(iter: I) -> Self {
        let mut dictionary = Self::new();
        for parameter in iter {
            dictionary.declare(parameter);
        }
        dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite_core::four_char_code;
    use suite_core::terms::types;

    #[test]
    fn test_flags_for_declared_keys_only() {
        let radius = four_char_code(*b"Rds ");
        let dictionary: ScriptingDictionary = [ScriptingParameter {
            key: radius,
            name: "radius".into(),
            type_id: types::UNIT_FLOAT,
            flags: flags::OPTIONAL,
        }]
        .into_iter()
        .collect();

        assert_eq!(dictionary.flags_for(radius), Some(flags::OPTIONAL));
        assert_eq!(dictionary.flags_for(four_char_code(*b"Amnt")), None);
        assert_eq!(dictionary.parameter(radius).map(|p| p.name.as_str()), Some("radius"));
    }
}
