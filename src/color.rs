//! 24-bit RGB color with a randomization sentinel.
//!
//! A [`Color`] is four bytes: a `special` marker plus red, green and blue.
//! Ordinary colors carry `special == 0`. The [`RANDOM`] and
//! [`RANDOM_PRIMARY`] sentinels ask [`expand_special`] to substitute a
//! freshly drawn color, which lets patterns re-randomize at animation
//! boundaries.

use smart_leds::RGB8;

use crate::rng::RandomSource;

/// `special` value for an ordinary color.
pub const SPECIAL_NONE: u8 = 0;
/// `special` value requesting independent uniform components.
pub const SPECIAL_RANDOM: u8 = 1;
/// `special` value requesting components that are each 0x00 or 0xFF.
pub const SPECIAL_RANDOM_PRIMARY: u8 = 2;

/// RGB color with a sentinel byte.
///
/// Equality is byte-wise over all four fields, so the sentinels compare as
/// distinct values even though their component bytes are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub special: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Create an ordinary color from components.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            special: SPECIAL_NONE,
            red,
            green,
            blue,
        }
    }

    /// Is this one of the randomization sentinels?
    pub const fn is_special(self) -> bool {
        self.special != SPECIAL_NONE
    }
}

impl From<Color> for RGB8 {
    fn from(color: Color) -> Self {
        Self {
            r: color.red,
            g: color.green,
            b: color.blue,
        }
    }
}

impl From<RGB8> for Color {
    fn from(rgb: RGB8) -> Self {
        Self::rgb(rgb.r, rgb.g, rgb.b)
    }
}

pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
pub const GREEN: Color = Color::rgb(0x00, 0xFF, 0x00);
pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);

pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
pub const LIGHT_BLUE: Color = Color::rgb(0x00, 0xFF, 0xFF);
pub const PURPLE: Color = Color::rgb(0xFF, 0x00, 0xFF);

/// Expands to a fresh uniform random color.
pub const RANDOM: Color = Color {
    special: SPECIAL_RANDOM,
    red: 0,
    green: 0,
    blue: 0,
};

/// Expands to a fresh random primary-component color.
pub const RANDOM_PRIMARY: Color = Color {
    special: SPECIAL_RANDOM_PRIMARY,
    red: 0,
    green: 0,
    blue: 0,
};

/// Pick truly random red/green/blue components.
///
/// Tends more towards dirty/dim white than you might expect.
pub fn random_color<R: RandomSource>(rng: &mut R) -> Color {
    Color::rgb(
        rng.random_range(0, 0x100) as u8,
        rng.random_range(0, 0x100) as u8,
        rng.random_range(0, 0x100) as u8,
    )
}

/// Each primary component is fully on or fully off.
///
/// Usually looks better than [`random_color`].
pub fn random_primary_color<R: RandomSource>(rng: &mut R) -> Color {
    let component = |rng: &mut R| if rng.random_range(0, 2) == 0 { 0x00 } else { 0xFF };
    Color::rgb(component(rng), component(rng), component(rng))
}

/// Turn a special color into a concrete one.
///
/// Ordinary colors are returned with `special` forced to zero.
pub fn expand_special<R: RandomSource>(color: Color, rng: &mut R) -> Color {
    match color.special {
        SPECIAL_RANDOM => random_color(rng),
        SPECIAL_RANDOM_PRIMARY => random_primary_color(rng),
        _ => Color::rgb(color.red, color.green, color.blue),
    }
}

/// Blend two colors; `ratio` 0.0 is all `left`, 1.0 all `right`.
///
/// The ratio is clamped to `[0.0, 1.0]`. Rounding errors of one step per
/// component are possible.
pub fn mix_color(left: Color, right: Color, ratio: f32) -> Color {
    let r_ratio = ratio.clamp(0.0, 1.0);
    let l_ratio = 1.0 - r_ratio;

    let mix = |l: u8, r: u8| (f32::from(l) * l_ratio + f32::from(r) * r_ratio) as u8;

    Color::rgb(
        mix(left.red, right.red),
        mix(left.green, right.green),
        mix(left.blue, right.blue),
    )
}

/// Scale a color towards black; `brightness` 0.0 is off, 1.0 unchanged.
pub fn dim_color(color: Color, brightness: f32) -> Color {
    mix_color(BLACK, color, brightness)
}

/// One monotone step of `base` towards `target`.
pub const fn morph_shade(base: u8, target: u8) -> u8 {
    if base < target {
        base + 1
    } else if base > target {
        base - 1
    } else {
        base
    }
}

/// Step a color one shade towards a target.
///
/// Unlike [`mix_color`] this accumulates no rounding error: repeated
/// application reaches the target exactly, in at most 255 steps.
pub const fn morph_color(base: Color, target: Color) -> Color {
    Color::rgb(
        morph_shade(base.red, target.red),
        morph_shade(base.green, target.green),
        morph_shade(base.blue, target.blue),
    )
}

/// Component-wise inversion. Used for common-anode LED wiring.
pub const fn invert_color(color: Color) -> Color {
    Color::rgb(255 - color.red, 255 - color.green, 255 - color.blue)
}
