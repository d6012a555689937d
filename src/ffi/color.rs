//! Color Space suite trampolines.

use abi_stable::sabi_extern_fn;
use suite_core::ColorHandle;

use super::*;
use crate::color_space;

pub(super) fn table() -> ColorSpaceSuite1 {
    ColorSpaceSuite1 {
        make,
        delete,
        stuff_components,
        extract_components,
        stuff_xyz,
        extract_xyz,
        convert8,
        convert16,
        get_native_space,
        is_book_color,
        extract_color_name,
        pick_color,
        convert8to16,
        convert16to8,
    }
}

fn color(token: ColorID) -> ColorHandle {
    handle_of(token)
}

fn color_count(count: i16) -> SuiteResult<usize> {
    usize::try_from(count).map_err(|_| SuiteError::BadParameter)
}

#[sabi_extern_fn]
fn make(color_id: *mut ColorID) -> SPErr {
    call(|session| {
        if color_id.is_null() {
            return Err(SuiteError::BadParameter);
        }
        let handle = session.colors.make()?;
        write_out(color_id, token_of(handle))
    })
}

#[sabi_extern_fn]
fn delete(color_id: *mut ColorID) -> SPErr {
    call(|session| {
        if color_id.is_null() {
            return Err(SuiteError::BadParameter);
        }
        // SAFETY: checked non-null; the caller owns the id slot.
        let token = unsafe { color_id.read() };
        session.colors.delete(color(token))?;
        write_out(color_id, std::ptr::null_mut())
    })
}

#[sabi_extern_fn]
fn stuff_components(color_id: ColorID, color_space: ColorServicesColorSpace, c0: u8, c1: u8, c2: u8, c3: u8) -> SPErr {
    call(|session| {
        session
            .colors
            .stuff_components(color(color_id), color_space, [c0, c1, c2, c3])
    })
}

#[sabi_extern_fn]
fn extract_components(
    color_id: ColorID,
    color_space: ColorServicesColorSpace,
    c0: *mut u8,
    c1: *mut u8,
    c2: *mut u8,
    c3: *mut u8,
    gamut_flag: *mut Boolean,
) -> SPErr {
    call(|session| {
        let (components, out_of_gamut) = session.colors.extract_components(color(color_id), color_space)?;
        if [c0, c1, c2, c3].iter().any(|out| out.is_null()) {
            return Err(SuiteError::BadParameter);
        }
        for (out, value) in [c0, c1, c2, c3].into_iter().zip(components) {
            write_out(out, value)?;
        }
        if !gamut_flag.is_null() {
            write_out(gamut_flag, boolean(out_of_gamut))?;
        }
        Ok(())
    })
}

#[sabi_extern_fn]
fn stuff_xyz(color_id: ColorID, xyz: CS_XYZColor) -> SPErr {
    call(|session| session.colors.stuff_xyz(color(color_id), xyz))
}

#[sabi_extern_fn]
fn extract_xyz(color_id: ColorID, xyz: *mut CS_XYZColor) -> SPErr {
    call(|session| {
        let value = session.colors.extract_xyz(color(color_id))?;
        write_out(xyz, value)
    })
}

#[sabi_extern_fn]
fn convert8(
    input_space: ColorServicesColorSpace,
    output_space: ColorServicesColorSpace,
    colors: *mut Color8,
    count: i16,
) -> SPErr {
    call(|_| {
        let colors = output_slice(colors, color_count(count)?)?;
        color_space::convert8(input_space, output_space, colors)
    })
}

#[sabi_extern_fn]
fn convert16(
    input_space: ColorServicesColorSpace,
    output_space: ColorServicesColorSpace,
    colors: *mut Color16,
    count: i16,
) -> SPErr {
    call(|_| {
        let colors = output_slice(colors, color_count(count)?)?;
        color_space::convert16(input_space, output_space, colors)
    })
}

#[sabi_extern_fn]
fn get_native_space(color_id: ColorID, native_space: *mut ColorServicesColorSpace) -> SPErr {
    call(|session| {
        let space = session.colors.native_space(color(color_id))?;
        write_out(native_space, space as ColorServicesColorSpace)
    })
}

#[sabi_extern_fn]
fn is_book_color(color_id: ColorID, is_book_color: *mut Boolean) -> SPErr {
    call(|session| {
        let book = session.colors.is_book_color(color(color_id))?;
        write_out(is_book_color, boolean(book))
    })
}

#[sabi_extern_fn]
fn extract_color_name(_color_id: ColorID, _color_name: *mut ASZString) -> SPErr {
    SuiteError::Unimplemented.code()
}

#[sabi_extern_fn]
fn pick_color(_color_id: *mut ColorID, _prompt: ASZString) -> SPErr {
    SuiteError::Unimplemented.code()
}

#[sabi_extern_fn]
fn convert8to16(input: *const u8, output: *mut u16, count: i16) -> SPErr {
    call(|_| {
        let count = color_count(count)?;
        let input = input_slice(input, count)?;
        let output = output_slice(output, count)?;
        for (out, value) in output.iter_mut().zip(input) {
            *out = color_space::to_sixteen(*value);
        }
        Ok(())
    })
}

#[sabi_extern_fn]
fn convert16to8(input: *const u16, output: *mut u8, count: i16) -> SPErr {
    call(|_| {
        let count = color_count(count)?;
        let input = input_slice(input, count)?;
        let output = output_slice(output, count)?;
        for (out, value) in output.iter_mut().zip(input) {
            *out = color_space::to_eight(*value);
        }
        Ok(())
    })
}
