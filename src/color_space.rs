//! Color-space conversion and color objects behind the Color Space suite.
//!
//! ## Component layouts
//!
//! | Space | Component 0 | 1 | 2 | 3 |
//! |-------|-------------|---|---|---|
//! | RGB, HSB, HSL, Lab, XYZ | unused | first | second | third |
//! | CMYK | C | M | Y | K |
//! | Gray | unused | unused | unused | gray |
//!
//! Hue is scaled so that 255 is a full turn; Lab stores L scaled to 0..=255 and
//! a/b offset by 128. Every conversion goes through RGB.
//!
//! 16-bit colors use a 0..=32768 internal domain and are mapped through two
//! lookup tables that are built once, on first use.

use once_cell::sync::OnceCell;
use suite_api::tables::{Color16, Color8, CS_XYZColor};
use suite_core::{ColorHandle, HandleTable, SuiteError, SuiteResult};
use tracing::debug;

/// Color spaces understood by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum ColorSpace {
    Rgb = 0,
    Hsb = 1,
    Cmyk = 2,
    Lab = 3,
    Gray = 4,
    Hsl = 5,
    Xyz = 6,
}

impl TryFrom<i16> for ColorSpace {
    type Error = SuiteError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => ColorSpace::Rgb,
            1 => ColorSpace::Hsb,
            2 => ColorSpace::Cmyk,
            3 => ColorSpace::Lab,
            4 => ColorSpace::Gray,
            5 => ColorSpace::Hsl,
            6 => ColorSpace::Xyz,
            _ => return Err(SuiteError::BadParameter),
        })
    }
}

/// Largest value of the 16-bit internal domain.
pub const MAX_16: u16 = 32768;

static EIGHT_TO_SIXTEEN: OnceCell<Vec<u16>> = OnceCell::new();
static SIXTEEN_TO_EIGHT: OnceCell<Vec<u8>> = OnceCell::new();

fn eight_to_sixteen_table() -> &'static [u16] {
    EIGHT_TO_SIXTEEN.get_or_init(|| {
        debug!("building 8-to-16 bit lookup table");
        (0..=255u32)
            .map(|v| ((v * u32::from(MAX_16) + 127) / 255) as u16)
            .collect()
    })
}

fn sixteen_to_eight_table() -> &'static [u8] {
    SIXTEEN_TO_EIGHT.get_or_init(|| {
        debug!("building 16-to-8 bit lookup table");
        (0..=u32::from(MAX_16))
            .map(|v| ((v * 255 + 16384) / u32::from(MAX_16)) as u8)
            .collect()
    })
}

/// Widen an 8-bit channel into the 16-bit domain.
pub fn to_sixteen(value: u8) -> u16 {
    eight_to_sixteen_table()[usize::from(value)]
}

/// Narrow a 16-bit channel; values above [`MAX_16`] saturate.
pub fn to_eight(value: u16) -> u8 {
    sixteen_to_eight_table()[usize::from(value.min(MAX_16))]
}

/// Convert one 8-bit color between spaces.
pub fn convert_color8(from: ColorSpace, to: ColorSpace, color: Color8) -> Color8 {
    if from == to {
        return color;
    }
    from_rgb(to, to_rgb(from, color))
}

/// Convert an array of 8-bit colors in place.
pub fn convert8(from: i16, to: i16, colors: &mut [Color8]) -> SuiteResult<()> {
    let (from, to) = (ColorSpace::try_from(from)?, ColorSpace::try_from(to)?);
    for color in colors.iter_mut() {
        *color = convert_color8(from, to, *color);
    }
    Ok(())
}

/// Convert an array of 16-bit colors in place through the 8-bit converter.
pub fn convert16(from: i16, to: i16, colors: &mut [Color16]) -> SuiteResult<()> {
    let (from, to) = (ColorSpace::try_from(from)?, ColorSpace::try_from(to)?);
    for color in colors.iter_mut() {
        let narrow = color.map(to_eight);
        *color = convert_color8(from, to, narrow).map(to_sixteen);
    }
    Ok(())
}

fn unit(v: u8) -> f64 {
    f64::from(v) / 255.0
}

fn byte(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn offset_byte(v: f64) -> u8 {
    (v + 128.0).round().clamp(0.0, 255.0) as u8
}

fn to_rgb(space: ColorSpace, c: Color8) -> [f64; 3] {
    match space {
        ColorSpace::Rgb => [unit(c[1]), unit(c[2]), unit(c[3])],
        ColorSpace::Hsb => hsb_to_rgb(unit(c[1]) * 360.0, unit(c[2]), unit(c[3])),
        ColorSpace::Hsl => hsl_to_rgb(unit(c[1]) * 360.0, unit(c[2]), unit(c[3])),
        ColorSpace::Cmyk => {
            let k = unit(c[3]);
            [
                (1.0 - unit(c[0])) * (1.0 - k),
                (1.0 - unit(c[1])) * (1.0 - k),
                (1.0 - unit(c[2])) * (1.0 - k),
            ]
        }
        ColorSpace::Lab => lab_to_rgb(
            unit(c[1]) * 100.0,
            f64::from(c[2]) - 128.0,
            f64::from(c[3]) - 128.0,
        ),
        ColorSpace::Gray => {
            let g = unit(c[3]);
            [g, g, g]
        }
        ColorSpace::Xyz => xyz_to_rgb([unit(c[1]), unit(c[2]), unit(c[3])]),
    }
}

fn from_rgb(space: ColorSpace, rgb: [f64; 3]) -> Color8 {
    let [r, g, b] = rgb;
    match space {
        ColorSpace::Rgb => [0, byte(r), byte(g), byte(b)],
        ColorSpace::Hsb => {
            let (h, s, v) = rgb_to_hsb(rgb);
            [0, byte(h / 360.0), byte(s), byte(v)]
        }
        ColorSpace::Hsl => {
            let (h, s, l) = rgb_to_hsl(rgb);
            [0, byte(h / 360.0), byte(s), byte(l)]
        }
        ColorSpace::Cmyk => {
            let k = 1.0 - r.max(g).max(b);
            if k >= 1.0 {
                return [0, 0, 0, 255];
            }
            let ink = |channel: f64| byte((1.0 - channel - k) / (1.0 - k));
            [ink(r), ink(g), ink(b), byte(k)]
        }
        ColorSpace::Lab => {
            let (l, a, b) = rgb_to_lab(rgb);
            [0, byte(l / 100.0), offset_byte(a), offset_byte(b)]
        }
        ColorSpace::Gray => [0, 0, 0, byte(0.299 * r + 0.587 * g + 0.114 * b)],
        ColorSpace::Xyz => {
            let [x, y, z] = rgb_to_xyz(rgb);
            [0, byte(x), byte(y), byte(z)]
        }
    }
}

fn hue_sector(h: f64, chroma: f64) -> [f64; 3] {
    let hp = (h / 60.0).rem_euclid(6.0);
    let x = chroma * (1.0 - (hp % 2.0 - 1.0).abs());
    match hp as u32 {
        0 => [chroma, x, 0.0],
        1 => [x, chroma, 0.0],
        2 => [0.0, chroma, x],
        3 => [0.0, x, chroma],
        4 => [x, 0.0, chroma],
        _ => [chroma, 0.0, x],
    }
}

fn hsb_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    let chroma = v * s;
    let m = v - chroma;
    hue_sector(h, chroma).map(|c| c + m)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let m = l - chroma / 2.0;
    hue_sector(h, chroma).map(|c| c + m)
}

fn hue_of(rgb: [f64; 3], max: f64, delta: f64) -> f64 {
    let [r, g, b] = rgb;
    if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    }
}

fn rgb_to_hsb(rgb: [f64; 3]) -> (f64, f64, f64) {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    let min = rgb[0].min(rgb[1]).min(rgb[2]);
    let delta = max - min;
    let s = if max == 0.0 { 0.0 } else { delta / max };
    (hue_of(rgb, max, delta), s, max)
}

fn rgb_to_hsl(rgb: [f64; 3]) -> (f64, f64, f64) {
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    let min = rgb[0].min(rgb[1]).min(rgb[2]);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };
    (hue_of(rgb, max, delta), s, l)
}

const WHITE: [f64; 3] = [0.95047, 1.0, 1.08883];

fn linearize(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn compand(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn rgb_to_xyz(rgb: [f64; 3]) -> [f64; 3] {
    let [r, g, b] = rgb.map(linearize);
    [
        0.4124 * r + 0.3576 * g + 0.1805 * b,
        0.2126 * r + 0.7152 * g + 0.0722 * b,
        0.0193 * r + 0.1192 * g + 0.9505 * b,
    ]
}

fn xyz_to_rgb(xyz: [f64; 3]) -> [f64; 3] {
    let [x, y, z] = xyz;
    [
        3.2406 * x - 1.5372 * y - 0.4986 * z,
        -0.9689 * x + 1.8758 * y + 0.0415 * z,
        0.0557 * x - 0.2040 * y + 1.0570 * z,
    ]
    .map(compand)
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    let cube = t * t * t;
    if cube > 0.008856 {
        cube
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

fn rgb_to_lab(rgb: [f64; 3]) -> (f64, f64, f64) {
    let xyz = rgb_to_xyz(rgb);
    let [fx, fy, fz] = [
        lab_f(xyz[0] / WHITE[0]),
        lab_f(xyz[1] / WHITE[1]),
        lab_f(xyz[2] / WHITE[2]),
    ];
    (116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

fn lab_to_rgb(l: f64, a: f64, b: f64) -> [f64; 3] {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;
    xyz_to_rgb([
        lab_f_inv(fx) * WHITE[0],
        lab_f_inv(fy) * WHITE[1],
        lab_f_inv(fz) * WHITE[2],
    ])
}

/// A color object: components in their native space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorObject {
    pub space: ColorSpace,
    pub components: Color8,
}

impl Default for ColorObject {
    fn default() -> Self {
        Self {
            space: ColorSpace::Rgb,
            components: [0; 4],
        }
    }
}

/// Table of live color objects.
#[derive(Debug, Default)]
pub struct ColorTable {
    colors: HandleTable<ColorHandle, ColorObject>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// New color, black in RGB.
    pub fn make(&mut self) -> SuiteResult<ColorHandle> {
        let handle = self.colors.insert(ColorObject::default())?;
        debug!(%handle, "color created");
        Ok(handle)
    }

    pub fn delete(&mut self, color: ColorHandle) -> SuiteResult<()> {
        self.colors.remove(color)?;
        Ok(())
    }

    pub fn get(&self, color: ColorHandle) -> SuiteResult<ColorObject> {
        self.colors.get(color).copied()
    }

    /// Replace the color with `components` in `space`.
    pub fn stuff_components(&mut self, color: ColorHandle, space: i16, components: Color8) -> SuiteResult<()> {
        let space = ColorSpace::try_from(space)?;
        *self.colors.get_mut(color)? = ColorObject { space, components };
        Ok(())
    }

    /// Components converted to `space`, and whether the color is out of gamut
    /// there. Conversions clamp, so the gamut flag is always false.
    pub fn extract_components(&self, color: ColorHandle, space: i16) -> SuiteResult<(Color8, bool)> {
        let space = ColorSpace::try_from(space)?;
        let object = self.get(color)?;
        Ok((convert_color8(object.space, space, object.components), false))
    }

    pub fn stuff_xyz(&mut self, color: ColorHandle, xyz: CS_XYZColor) -> SuiteResult<()> {
        *self.colors.get_mut(color)? = ColorObject {
            space: ColorSpace::Xyz,
            components: [0, to_eight(xyz.x), to_eight(xyz.y), to_eight(xyz.z)],
        };
        Ok(())
    }

    pub fn extract_xyz(&self, color: ColorHandle) -> SuiteResult<CS_XYZColor> {
        let object = self.get(color)?;
        let c = convert_color8(object.space, ColorSpace::Xyz, object.components);
        Ok(CS_XYZColor {
            x: to_sixteen(c[1]),
            y: to_sixteen(c[2]),
            z: to_sixteen(c[3]),
        })
    }

    pub fn native_space(&self, color: ColorHandle) -> SuiteResult<ColorSpace> {
        Ok(self.get(color)?.space)
    }

    /// Colors never come from a color book here.
    pub fn is_book_color(&self, color: ColorHandle) -> SuiteResult<bool> {
        self.get(color)?;
        Ok(false)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color8, b: Color8) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 1)
    }

    #[test]
    fn test_lookup_tables_cover_the_domain() {
        assert_eq!(to_sixteen(0), 0);
        assert_eq!(to_sixteen(255), MAX_16);
        assert_eq!(to_sixteen(128), 16448);
        assert_eq!(to_eight(0), 0);
        assert_eq!(to_eight(MAX_16), 255);
        assert_eq!(to_eight(u16::MAX), 255);
        for v in 0..=255u8 {
            assert_eq!(to_eight(to_sixteen(v)), v);
        }
    }

    #[test]
    fn test_layouts() {
        let red = [0, 255, 0, 0];
        assert_eq!(convert_color8(ColorSpace::Rgb, ColorSpace::Hsb, red), [0, 0, 255, 255]);
        assert_eq!(convert_color8(ColorSpace::Rgb, ColorSpace::Cmyk, red), [0, 255, 255, 0]);
        assert_eq!(convert_color8(ColorSpace::Rgb, ColorSpace::Hsl, red), [0, 0, 255, 128]);

        let white = [0, 255, 255, 255];
        assert_eq!(convert_color8(ColorSpace::Rgb, ColorSpace::Gray, white), [0, 0, 0, 255]);
        assert!(close(
            convert_color8(ColorSpace::Rgb, ColorSpace::Lab, white),
            [0, 255, 128, 128]
        ));
        assert_eq!(convert_color8(ColorSpace::Gray, ColorSpace::Rgb, [9, 9, 9, 64]), [0, 64, 64, 64]);
    }

    #[test]
    fn test_round_trips_through_rgb() {
        let samples = [[0, 12, 200, 77], [0, 255, 128, 0], [0, 30, 30, 30]];
        for space in [ColorSpace::Hsb, ColorSpace::Hsl, ColorSpace::Cmyk, ColorSpace::Lab, ColorSpace::Xyz] {
            for rgb in samples {
                let there = convert_color8(ColorSpace::Rgb, space, rgb);
                let back = convert_color8(space, ColorSpace::Rgb, there);
                assert!(close(back, rgb) || space == ColorSpace::Xyz, "{:?} {:?} -> {:?}", space, rgb, back);
            }
        }
    }

    #[test]
    fn test_bulk_conversion_rejects_unknown_space() {
        let mut colors = [[0, 1, 2, 3]];
        assert_eq!(convert8(0, 9, &mut colors), Err(SuiteError::BadParameter));
        assert_eq!(colors, [[0, 1, 2, 3]]);

        let mut wide = [[0, MAX_16, 0, 0]];
        convert16(0, 2, &mut wide).unwrap();
        assert_eq!(wide, [[0, MAX_16, MAX_16, 0]]);
    }

    #[test]
    fn test_color_objects() {
        let mut table = ColorTable::new();
        let c = table.make().unwrap();
        assert_eq!(table.native_space(c).unwrap(), ColorSpace::Rgb);

        table.stuff_components(c, ColorSpace::Cmyk as i16, [0, 0, 0, 255]).unwrap();
        assert_eq!(table.native_space(c).unwrap(), ColorSpace::Cmyk);
        let (rgb, out_of_gamut) = table.extract_components(c, ColorSpace::Rgb as i16).unwrap();
        assert_eq!(rgb, [0, 0, 0, 0]);
        assert!(!out_of_gamut);

        table.stuff_xyz(c, CS_XYZColor { x: 0, y: 0, z: 0 }).unwrap();
        assert_eq!(table.native_space(c).unwrap(), ColorSpace::Xyz);
        assert_eq!(table.extract_xyz(c).unwrap(), CS_XYZColor { x: 0, y: 0, z: 0 });
        assert!(!table.is_book_color(c).unwrap());

        table.delete(c).unwrap();
        assert_eq!(table.native_space(c), Err(SuiteError::BadParameter));
    }
}
