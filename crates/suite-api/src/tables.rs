//! `#[repr(C)]` layouts of every suite dispatch table the host offers.
//!
//! Field order and pointer width follow the published plug-in SDK headers; native
//! plugins index into these structs directly, so fields must never be reordered.
//! A later version of a suite is a distinct struct even when it only appends
//! fields.

#![allow(non_camel_case_types)] // mirrors the C typedef names

use std::ffi::{c_char, c_void};

use suite_core::terms::{
    DescriptorClassId, DescriptorEnumId, DescriptorEnumTypeId, DescriptorFormId,
    DescriptorKeyId, DescriptorTypeId, DescriptorUnitId,
};
use suite_core::SPErr;

/// C `Boolean` (one byte, nonzero is true).
pub type Boolean = u8;
/// PICA `SPBoolean`.
pub type SPBoolean = u8;
/// Opaque action descriptor token.
pub type PIActionDescriptor = *mut c_void;
/// Opaque action list token.
pub type PIActionList = *mut c_void;
/// Opaque action reference token.
pub type PIActionReference = *mut c_void;
/// Opaque interned string token.
pub type ASZString = *mut c_void;
/// Opaque color object token.
pub type ColorID = *mut c_void;
/// Relocatable memory block: a pointer to the block's data pointer.
pub type Handle = *mut *mut c_char;
/// Descriptor snapshot carried in a memory block.
pub type PIDescriptorHandle = Handle;
/// Plain memory pointer.
pub type Ptr = *mut c_char;
/// UTF-16 code unit.
pub type ASUnicode = u16;
/// Color space selector.
pub type ColorServicesColorSpace = i16;

/// Four 8-bit components.
pub type Color8 = [u8; 4];
/// Four 16-bit components.
pub type Color16 = [u16; 4];

/// CIE XYZ color with 16-bit components.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CS_XYZColor {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

// =============================================================================
// SP Basic
// =============================================================================

/// `SPBasicSuite` version 4.
#[repr(C)]
pub struct SPBasicSuite4 {
    pub acquire_suite:
        unsafe extern "C" fn(name: *const c_char, version: i32, suite: *mut *const c_void) -> SPErr,
    pub release_suite: unsafe extern "C" fn(name: *const c_char, version: i32) -> SPErr,
    pub is_equal: unsafe extern "C" fn(token1: *const c_char, token2: *const c_char) -> SPBoolean,
    pub allocate_block: unsafe extern "C" fn(size: usize, block: *mut *mut c_void) -> SPErr,
    pub free_block: unsafe extern "C" fn(block: *mut c_void) -> SPErr,
    pub reallocate_block:
        unsafe extern "C" fn(block: *mut c_void, new_size: usize, new_block: *mut *mut c_void) -> SPErr,
    pub undefined: unsafe extern "C" fn() -> SPErr,
}

// =============================================================================
// ZString
// =============================================================================

/// `ASZStringSuite` version 1.
#[repr(C)]
pub struct ZStringSuite1 {
    pub make_from_unicode:
        unsafe extern "C" fn(src: *const ASUnicode, byte_count: usize, new_zstring: *mut ASZString) -> SPErr,
    pub make_from_c_string:
        unsafe extern "C" fn(src: *const c_char, byte_count: usize, new_zstring: *mut ASZString) -> SPErr,
    pub make_from_pascal_string:
        unsafe extern "C" fn(src: *const u8, byte_count: usize, new_zstring: *mut ASZString) -> SPErr,
    pub make_romanization_of_integer: unsafe extern "C" fn(value: i32, new_zstring: *mut ASZString) -> SPErr,
    pub make_romanization_of_fixed: unsafe extern "C" fn(
        value: i32,
        places: i16,
        trim: Boolean,
        is_signed: Boolean,
        new_zstring: *mut ASZString,
    ) -> SPErr,
    pub make_romanization_of_double: unsafe extern "C" fn(value: f64, new_zstring: *mut ASZString) -> SPErr,
    pub get_empty: unsafe extern "C" fn() -> ASZString,
    pub copy: unsafe extern "C" fn(source: ASZString, copy: *mut ASZString) -> SPErr,
    pub replace: unsafe extern "C" fn(zstr: ASZString, index: u32, replacement: ASZString) -> SPErr,
    pub trim_ellipsis: unsafe extern "C" fn(zstr: ASZString) -> SPErr,
    pub trim_spaces: unsafe extern "C" fn(zstr: ASZString) -> SPErr,
    pub remove_accelerators: unsafe extern "C" fn(zstr: ASZString) -> SPErr,
    pub add_ref: unsafe extern "C" fn(zstr: ASZString) -> SPErr,
    pub release: unsafe extern "C" fn(zstr: ASZString) -> SPErr,
    pub is_all_white_space: unsafe extern "C" fn(zstr: ASZString) -> Boolean,
    pub is_empty: unsafe extern "C" fn(zstr: ASZString) -> Boolean,
    pub will_replace: unsafe extern "C" fn(zstr: ASZString, index: u32) -> Boolean,
    pub length_as_unicode_c_string: unsafe extern "C" fn(zstr: ASZString) -> u32,
    pub as_unicode_c_string:
        unsafe extern "C" fn(zstr: ASZString, buffer: *mut ASUnicode, buffer_size: u32, check_size: Boolean) -> SPErr,
    pub length_as_c_string: unsafe extern "C" fn(zstr: ASZString) -> u32,
    pub as_c_string:
        unsafe extern "C" fn(zstr: ASZString, buffer: *mut c_char, buffer_size: u32, check_size: Boolean) -> SPErr,
    pub length_as_pascal_string: unsafe extern "C" fn(zstr: ASZString) -> u32,
    pub as_pascal_string:
        unsafe extern "C" fn(zstr: ASZString, buffer: *mut c_char, buffer_size: u32, check_size: Boolean) -> SPErr,
}

// =============================================================================
// Action Descriptor
// =============================================================================

/// Declares the action descriptor procs shared by every version, followed by any
/// version-specific trailing fields.
macro_rules! action_descriptor_procs {
    ($(#[$meta:meta])* $name:ident { $($extra:tt)* }) => {
        $(#[$meta])*
        #[repr(C)]
        pub struct $name {
            pub make: unsafe extern "C" fn(descriptor: *mut PIActionDescriptor) -> SPErr,
            pub free: unsafe extern "C" fn(descriptor: PIActionDescriptor) -> SPErr,
            pub get_type: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: *mut DescriptorTypeId) -> SPErr,
            pub get_key: unsafe extern "C" fn(descriptor: PIActionDescriptor, index: u32, key: *mut DescriptorKeyId) -> SPErr,
            pub has_key: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, has_key: *mut Boolean) -> SPErr,
            pub get_count: unsafe extern "C" fn(descriptor: PIActionDescriptor, count: *mut u32) -> SPErr,
            pub is_equal: unsafe extern "C" fn(descriptor: PIActionDescriptor, other: PIActionDescriptor, is_equal: *mut Boolean) -> SPErr,
            pub erase: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId) -> SPErr,
            pub clear: unsafe extern "C" fn(descriptor: PIActionDescriptor) -> SPErr,
            pub put_integer: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: i32) -> SPErr,
            pub put_float: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: f64) -> SPErr,
            pub put_unit_float: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, unit: DescriptorUnitId, value: f64) -> SPErr,
            pub put_string: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *const c_char) -> SPErr,
            pub put_boolean: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: Boolean) -> SPErr,
            pub put_list: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: PIActionList) -> SPErr,
            pub put_object: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: DescriptorClassId, value: PIActionDescriptor) -> SPErr,
            pub put_global_object: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: DescriptorClassId, value: PIActionDescriptor) -> SPErr,
            pub put_enumerated: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: DescriptorEnumTypeId, value: DescriptorEnumId) -> SPErr,
            pub put_reference: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: PIActionReference) -> SPErr,
            pub put_class: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: DescriptorClassId) -> SPErr,
            pub put_global_class: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: DescriptorClassId) -> SPErr,
            pub put_alias: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: Handle) -> SPErr,
            pub get_integer: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut i32) -> SPErr,
            pub get_float: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut f64) -> SPErr,
            pub get_unit_float: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, unit: *mut DescriptorUnitId, value: *mut f64) -> SPErr,
            pub get_string_length: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, length: *mut u32) -> SPErr,
            pub get_string: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut c_char, max_length: u32) -> SPErr,
            pub get_boolean: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut Boolean) -> SPErr,
            pub get_list: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut PIActionList) -> SPErr,
            pub get_object: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: *mut DescriptorClassId, value: *mut PIActionDescriptor) -> SPErr,
            pub get_global_object: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: *mut DescriptorClassId, value: *mut PIActionDescriptor) -> SPErr,
            pub get_enumerated: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, type_: *mut DescriptorEnumTypeId, value: *mut DescriptorEnumId) -> SPErr,
            pub get_reference: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut PIActionReference) -> SPErr,
            pub get_class: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut DescriptorClassId) -> SPErr,
            pub get_global_class: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut DescriptorClassId) -> SPErr,
            pub get_alias: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut Handle) -> SPErr,
            pub has_keys: unsafe extern "C" fn(descriptor: PIActionDescriptor, required_keys: *const DescriptorKeyId, has_keys: *mut Boolean) -> SPErr,
            pub put_integers: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, count: u32, values: *const i32) -> SPErr,
            pub get_integers: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, count: u32, values: *mut i32) -> SPErr,
            pub as_handle: unsafe extern "C" fn(descriptor: PIActionDescriptor, value: *mut PIDescriptorHandle) -> SPErr,
            pub handle_to_descriptor: unsafe extern "C" fn(value: PIDescriptorHandle, descriptor: *mut PIActionDescriptor) -> SPErr,
            $($extra)*
        }
    };
}

action_descriptor_procs!(
    /// `PSActionDescriptorProcs` version 1.
    ActionDescriptorProcs1 {}
);

action_descriptor_procs!(
    /// `PSActionDescriptorProcs` version 2: adds interned-string and raw-data
    /// accessors.
    ActionDescriptorProcs2 {
        pub put_zstring: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, zstring: ASZString) -> SPErr,
        pub get_zstring: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, zstring: *mut ASZString) -> SPErr,
        pub put_data: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, length: i32, value: *const c_void) -> SPErr,
        pub get_data_length: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, length: *mut i32) -> SPErr,
        pub get_data: unsafe extern "C" fn(descriptor: PIActionDescriptor, key: DescriptorKeyId, value: *mut c_void) -> SPErr,
    }
);

// =============================================================================
// Action List
// =============================================================================

/// `PSActionListProcs` version 1.
#[repr(C)]
pub struct ActionListProcs1 {
    pub make: unsafe extern "C" fn(list: *mut PIActionList) -> SPErr,
    pub free: unsafe extern "C" fn(list: PIActionList) -> SPErr,
    pub get_type: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut DescriptorTypeId) -> SPErr,
    pub get_count: unsafe extern "C" fn(list: PIActionList, value: *mut u32) -> SPErr,
    pub put_integer: unsafe extern "C" fn(list: PIActionList, value: i32) -> SPErr,
    pub put_float: unsafe extern "C" fn(list: PIActionList, value: f64) -> SPErr,
    pub put_unit_float: unsafe extern "C" fn(list: PIActionList, unit: DescriptorUnitId, value: f64) -> SPErr,
    pub put_string: unsafe extern "C" fn(list: PIActionList, value: *const c_char) -> SPErr,
    pub put_boolean: unsafe extern "C" fn(list: PIActionList, value: Boolean) -> SPErr,
    pub put_list: unsafe extern "C" fn(list: PIActionList, value: PIActionList) -> SPErr,
    pub put_object: unsafe extern "C" fn(list: PIActionList, type_: DescriptorClassId, value: PIActionDescriptor) -> SPErr,
    pub put_global_object: unsafe extern "C" fn(list: PIActionList, type_: DescriptorClassId, value: PIActionDescriptor) -> SPErr,
    pub put_enumerated: unsafe extern "C" fn(list: PIActionList, type_: DescriptorEnumTypeId, value: DescriptorEnumId) -> SPErr,
    pub put_reference: unsafe extern "C" fn(list: PIActionList, value: PIActionReference) -> SPErr,
    pub put_class: unsafe extern "C" fn(list: PIActionList, value: DescriptorClassId) -> SPErr,
    pub put_global_class: unsafe extern "C" fn(list: PIActionList, value: DescriptorClassId) -> SPErr,
    pub put_alias: unsafe extern "C" fn(list: PIActionList, value: Handle) -> SPErr,
    pub get_integer: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut i32) -> SPErr,
    pub get_float: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut f64) -> SPErr,
    pub get_unit_float: unsafe extern "C" fn(list: PIActionList, index: u32, unit: *mut DescriptorUnitId, value: *mut f64) -> SPErr,
    pub get_string_length: unsafe extern "C" fn(list: PIActionList, index: u32, length: *mut u32) -> SPErr,
    pub get_string: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut c_char, max_length: u32) -> SPErr,
    pub get_boolean: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut Boolean) -> SPErr,
    pub get_list: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut PIActionList) -> SPErr,
    pub get_object: unsafe extern "C" fn(list: PIActionList, index: u32, type_: *mut DescriptorClassId, value: *mut PIActionDescriptor) -> SPErr,
    pub get_global_object: unsafe extern "C" fn(list: PIActionList, index: u32, type_: *mut DescriptorClassId, value: *mut PIActionDescriptor) -> SPErr,
    pub get_enumerated: unsafe extern "C" fn(list: PIActionList, index: u32, type_: *mut DescriptorEnumTypeId, value: *mut DescriptorEnumId) -> SPErr,
    pub get_reference: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut PIActionReference) -> SPErr,
    pub get_class: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut DescriptorClassId) -> SPErr,
    pub get_global_class: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut DescriptorClassId) -> SPErr,
    pub get_alias: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut Handle) -> SPErr,
    pub put_integers: unsafe extern "C" fn(list: PIActionList, count: u32, values: *const i32) -> SPErr,
    pub get_integers: unsafe extern "C" fn(list: PIActionList, count: u32, values: *mut i32) -> SPErr,
    pub put_data: unsafe extern "C" fn(list: PIActionList, length: i32, value: *const c_void) -> SPErr,
    pub get_data_length: unsafe extern "C" fn(list: PIActionList, index: u32, length: *mut i32) -> SPErr,
    pub get_data: unsafe extern "C" fn(list: PIActionList, index: u32, value: *mut c_void) -> SPErr,
    pub put_zstring: unsafe extern "C" fn(list: PIActionList, zstring: ASZString) -> SPErr,
    pub get_zstring: unsafe extern "C" fn(list: PIActionList, index: u32, zstring: *mut ASZString) -> SPErr,
}

// =============================================================================
// Action Reference
// =============================================================================

/// `PSActionReferenceProcs` version 2.
#[repr(C)]
pub struct ActionReferenceProcs2 {
    pub make: unsafe extern "C" fn(reference: *mut PIActionReference) -> SPErr,
    pub free: unsafe extern "C" fn(reference: PIActionReference) -> SPErr,
    pub get_form: unsafe extern "C" fn(reference: PIActionReference, value: *mut DescriptorFormId) -> SPErr,
    pub get_desired_class: unsafe extern "C" fn(reference: PIActionReference, value: *mut DescriptorClassId) -> SPErr,
    pub put_name: unsafe extern "C" fn(reference: PIActionReference, desired_class: DescriptorClassId, value: *const c_char) -> SPErr,
    pub put_index: unsafe extern "C" fn(reference: PIActionReference, desired_class: DescriptorClassId, value: u32) -> SPErr,
    pub put_identifier: unsafe extern "C" fn(reference: PIActionReference, desired_class: DescriptorClassId, value: u32) -> SPErr,
    pub put_offset: unsafe extern "C" fn(reference: PIActionReference, desired_class: DescriptorClassId, value: i32) -> SPErr,
    pub put_enumerated: unsafe extern "C" fn(reference: PIActionReference, desired_class: DescriptorClassId, type_: DescriptorEnumTypeId, value: DescriptorEnumId) -> SPErr,
    pub put_property: unsafe extern "C" fn(reference: PIActionReference, desired_class: DescriptorClassId, value: DescriptorKeyId) -> SPErr,
    pub put_class: unsafe extern "C" fn(reference: PIActionReference, desired_class: DescriptorClassId) -> SPErr,
    pub get_name_length: unsafe extern "C" fn(reference: PIActionReference, length: *mut u32) -> SPErr,
    pub get_name: unsafe extern "C" fn(reference: PIActionReference, name: *mut c_char, max_length: u32) -> SPErr,
    pub get_index: unsafe extern "C" fn(reference: PIActionReference, value: *mut u32) -> SPErr,
    pub get_identifier: unsafe extern "C" fn(reference: PIActionReference, value: *mut u32) -> SPErr,
    pub get_offset: unsafe extern "C" fn(reference: PIActionReference, value: *mut i32) -> SPErr,
    pub get_enumerated: unsafe extern "C" fn(reference: PIActionReference, type_: *mut DescriptorEnumTypeId, value: *mut DescriptorEnumId) -> SPErr,
    pub get_property: unsafe extern "C" fn(reference: PIActionReference, value: *mut DescriptorKeyId) -> SPErr,
    pub get_container: unsafe extern "C" fn(reference: PIActionReference, value: *mut PIActionReference) -> SPErr,
}

// =============================================================================
// Handle
// =============================================================================

/// `PSHandleSuite1`.
#[repr(C)]
pub struct HandleSuite1 {
    pub new: unsafe extern "C" fn(size: i32) -> Handle,
    pub dispose: unsafe extern "C" fn(h: Handle),
    pub set_lock: unsafe extern "C" fn(h: Handle, lock: Boolean, address: *mut Ptr, old_lock: *mut Boolean),
    pub get_size: unsafe extern "C" fn(h: Handle) -> i32,
    pub set_size: unsafe extern "C" fn(h: Handle, new_size: i32) -> i16,
    pub recover_space: unsafe extern "C" fn(size: i32),
}

/// `PSHandleSuite2`: adds `DisposeRegularHandle`.
#[repr(C)]
pub struct HandleSuite2 {
    pub new: unsafe extern "C" fn(size: i32) -> Handle,
    pub dispose: unsafe extern "C" fn(h: Handle),
    pub dispose_regular_handle: unsafe extern "C" fn(h: Handle),
    pub set_lock: unsafe extern "C" fn(h: Handle, lock: Boolean, address: *mut Ptr, old_lock: *mut Boolean),
    pub get_size: unsafe extern "C" fn(h: Handle) -> i32,
    pub set_size: unsafe extern "C" fn(h: Handle, new_size: i32) -> i16,
    pub recover_space: unsafe extern "C" fn(size: i32),
}

// =============================================================================
// Buffer
// =============================================================================

/// `PSBufferSuite1`.
#[repr(C)]
pub struct BufferSuite1 {
    pub new: unsafe extern "C" fn(requested_size: *mut u32, minimum_size: u32) -> Ptr,
    pub dispose: unsafe extern "C" fn(buffer: *mut Ptr),
    pub get_size: unsafe extern "C" fn(buffer: Ptr) -> u32,
    pub get_space: unsafe extern "C" fn() -> i32,
}

// =============================================================================
// Color Space
// =============================================================================

/// `PSColorSpaceSuite1`.
#[repr(C)]
pub struct ColorSpaceSuite1 {
    pub make: unsafe extern "C" fn(color_id: *mut ColorID) -> SPErr,
    pub delete: unsafe extern "C" fn(color_id: *mut ColorID) -> SPErr,
    pub stuff_components: unsafe extern "C" fn(
        color_id: ColorID,
        color_space: ColorServicesColorSpace,
        c0: u8,
        c1: u8,
        c2: u8,
        c3: u8,
    ) -> SPErr,
    pub extract_components: unsafe extern "C" fn(
        color_id: ColorID,
        color_space: ColorServicesColorSpace,
        c0: *mut u8,
        c1: *mut u8,
        c2: *mut u8,
        c3: *mut u8,
        gamut_flag: *mut Boolean,
    ) -> SPErr,
    pub stuff_xyz: unsafe extern "C" fn(color_id: ColorID, xyz: CS_XYZColor) -> SPErr,
    pub extract_xyz: unsafe extern "C" fn(color_id: ColorID, xyz: *mut CS_XYZColor) -> SPErr,
    pub convert8: unsafe extern "C" fn(
        input_space: ColorServicesColorSpace,
        output_space: ColorServicesColorSpace,
        colors: *mut Color8,
        count: i16,
    ) -> SPErr,
    pub convert16: unsafe extern "C" fn(
        input_space: ColorServicesColorSpace,
        output_space: ColorServicesColorSpace,
        colors: *mut Color16,
        count: i16,
    ) -> SPErr,
    pub get_native_space: unsafe extern "C" fn(color_id: ColorID, native_space: *mut ColorServicesColorSpace) -> SPErr,
    pub is_book_color: unsafe extern "C" fn(color_id: ColorID, is_book_color: *mut Boolean) -> SPErr,
    pub extract_color_name: unsafe extern "C" fn(color_id: ColorID, color_name: *mut ASZString) -> SPErr,
    pub pick_color: unsafe extern "C" fn(color_id: *mut ColorID, prompt: ASZString) -> SPErr,
    pub convert8to16: unsafe extern "C" fn(input: *const u8, output: *mut u16, count: i16) -> SPErr,
    pub convert16to8: unsafe extern "C" fn(input: *const u16, output: *mut u8, count: i16) -> SPErr,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    const PTR: usize = size_of::<usize>();

    #[test]
    fn test_table_sizes_are_whole_pointer_counts() {
        assert_eq!(size_of::<SPBasicSuite4>(), 7 * PTR);
        assert_eq!(size_of::<ZStringSuite1>(), 23 * PTR);
        assert_eq!(size_of::<ActionDescriptorProcs1>(), 41 * PTR);
        assert_eq!(size_of::<ActionDescriptorProcs2>(), 46 * PTR);
        assert_eq!(size_of::<ActionListProcs1>(), 38 * PTR);
        assert_eq!(size_of::<ActionReferenceProcs2>(), 19 * PTR);
        assert_eq!(size_of::<HandleSuite1>(), 6 * PTR);
        assert_eq!(size_of::<HandleSuite2>(), 7 * PTR);
        assert_eq!(size_of::<BufferSuite1>(), 4 * PTR);
        assert_eq!(size_of::<ColorSpaceSuite1>(), 14 * PTR);
    }

    #[test]
    fn test_field_offsets_follow_declaration_order() {
        assert_eq!(offset_of!(ZStringSuite1, get_empty), 6 * PTR);
        assert_eq!(offset_of!(ZStringSuite1, as_pascal_string), 22 * PTR);
        assert_eq!(offset_of!(ActionDescriptorProcs1, is_equal), 6 * PTR);
        assert_eq!(offset_of!(ActionDescriptorProcs2, handle_to_descriptor), 40 * PTR);
        assert_eq!(offset_of!(ActionDescriptorProcs2, get_data), 45 * PTR);
        assert_eq!(offset_of!(ActionReferenceProcs2, get_container), 18 * PTR);
        assert_eq!(offset_of!(HandleSuite2, set_lock), 3 * PTR);
        assert_eq!(offset_of!(HandleSuite1, set_lock), 2 * PTR);
        assert_eq!(offset_of!(ColorSpaceSuite1, convert8to16), 12 * PTR);
        assert_eq!(offset_of!(ColorSpaceSuite1, convert16to8), 13 * PTR);
    }

    #[test]
    fn test_xyz_is_three_u16() {
        assert_eq!(size_of::<CS_XYZColor>(), 6);
        assert_eq!(size_of::<Color8>(), 4);
        assert_eq!(size_of::<Color16>(), 8);
    }
}
