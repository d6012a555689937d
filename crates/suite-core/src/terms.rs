//! Type, form and unit identifiers of the scripting value model.

use crate::fourcc::four_char_code;

/// Descriptor key identifier.
pub type DescriptorKeyId = u32;
/// Descriptor value type identifier.
pub type DescriptorTypeId = u32;
/// Descriptor class identifier.
pub type DescriptorClassId = u32;
/// Enumeration type identifier.
pub type DescriptorEnumTypeId = u32;
/// Enumeration value identifier.
pub type DescriptorEnumId = u32;
/// Unit identifier for unit floats.
pub type DescriptorUnitId = u32;
/// Reference selector form identifier.
pub type DescriptorFormId = u32;

/// Value type tags reported by `GetType`.
pub mod types {
    use super::*;

    pub const INTEGER: DescriptorTypeId = four_char_code(*b"long");
    pub const FLOAT: DescriptorTypeId = four_char_code(*b"doub");
    pub const UNIT_FLOAT: DescriptorTypeId = four_char_code(*b"UntF");
    pub const BOOLEAN: DescriptorTypeId = four_char_code(*b"bool");
    pub const CHAR: DescriptorTypeId = four_char_code(*b"TEXT");
    pub const ENUMERATED: DescriptorTypeId = four_char_code(*b"enum");
    pub const CLASS: DescriptorTypeId = four_char_code(*b"type");
    pub const GLOBAL_CLASS: DescriptorTypeId = four_char_code(*b"GlbC");
    pub const ALIAS: DescriptorTypeId = four_char_code(*b"alis");
    pub const RAW_DATA: DescriptorTypeId = four_char_code(*b"tdta");
    pub const VALUE_LIST: DescriptorTypeId = four_char_code(*b"VlLs");
    pub const OBJECT: DescriptorTypeId = four_char_code(*b"Objc");
    pub const GLOBAL_OBJECT: DescriptorTypeId = four_char_code(*b"GlbO");
    pub const OBJECT_REFERENCE: DescriptorTypeId = four_char_code(*b"obj ");
}

/// Reference selector forms.
pub mod forms {
    use super::*;

    pub const CLASS: DescriptorFormId = four_char_code(*b"Clss");
    pub const ENUMERATED: DescriptorFormId = four_char_code(*b"Enmr");
    pub const IDENTIFIER: DescriptorFormId = four_char_code(*b"Idnt");
    pub const INDEX: DescriptorFormId = four_char_code(*b"indx");
    pub const OFFSET: DescriptorFormId = four_char_code(*b"rele");
    pub const PROPERTY: DescriptorFormId = four_char_code(*b"prop");
    pub const NAME: DescriptorFormId = four_char_code(*b"name");
}

/// Common unit identifiers.
pub mod units {
    use super::*;

    pub const NONE: DescriptorUnitId = four_char_code(*b"#Nne");
    pub const ANGLE: DescriptorUnitId = four_char_code(*b"#Ang");
    pub const DENSITY: DescriptorUnitId = four_char_code(*b"#Rsl");
    pub const DISTANCE: DescriptorUnitId = four_char_code(*b"#Rlt");
    pub const PERCENT: DescriptorUnitId = four_char_code(*b"#Prc");
    pub const PIXELS: DescriptorUnitId = four_char_code(*b"#Pxl");
    pub const POINTS: DescriptorUnitId = four_char_code(*b"#Pnt");
    pub const MILLIMETERS: DescriptorUnitId = four_char_code(*b"#Mlm");
}
