//! Textual encoding of colors and pattern descriptors.
//!
//! Colors serialize as a well-known palette name (`"RED"`) when one matches
//! byte-for-byte, and otherwise as `0x` plus eight uppercase hex digits in
//! `special, red, green, blue` order. A descriptor is a single
//! comma-delimited line: `<KIND>,<COLOR>,<COLOR>,<SPEED>`, for example
//! `"CYLON,BLUE,0x00050505,1000"`.

use heapless::String;

use crate::color::{
    BLACK, BLUE, Color, GREEN, LIGHT_BLUE, PURPLE, RANDOM, RANDOM_PRIMARY, RED, WHITE, YELLOW,
};
use crate::pattern::{PatternDescriptor, PatternKind};

/// Longest serialized color (`"RANDOM_PRIMARY"`).
pub const COLOR_TEXT_MAX: usize = 14;
/// Longest serialized descriptor: kind, two colors, a `u32` speed.
pub const PATTERN_TEXT_MAX: usize = 64;

const COLOR_NAME_MAP: [(&str, Color); 10] = [
    ("BLACK", BLACK),
    ("WHITE", WHITE),
    ("RED", RED),
    ("GREEN", GREEN),
    ("BLUE", BLUE),
    ("YELLOW", YELLOW),
    ("LIGHT_BLUE", LIGHT_BLUE),
    ("PURPLE", PURPLE),
    ("RANDOM", RANDOM),
    ("RANDOM_PRIMARY", RANDOM_PRIMARY),
];

/// Descriptor parse failure, with the numeric codes the remote protocol
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextError {
    /// No comma after the kind, or the kind field is empty.
    MissingKindDelimiter,
    /// The kind is not one of the seven pattern names.
    UnknownKind,
    /// No comma after color A.
    MissingColorADelimiter,
    /// No comma after color B.
    MissingColorBDelimiter,
    /// The speed field parsed negative.
    NegativeSpeed,
}

impl TextError {
    /// Numeric code surfaced over the RPC channel.
    pub const fn code(self) -> i32 {
        match self {
            Self::MissingKindDelimiter => -1,
            Self::UnknownKind => -2,
            Self::MissingColorADelimiter => -3,
            Self::MissingColorBDelimiter => -4,
            Self::NegativeSpeed => -5,
        }
    }
}

/// Serialize a color, preferring a palette name over the hex form.
pub fn color_to_string(color: Color) -> String<COLOR_TEXT_MAX> {
    let mut result = String::new();

    for (name, known) in &COLOR_NAME_MAP {
        if color == *known {
            result.push_str(name).ok();
            return result;
        }
    }

    result.push_str("0x").ok();
    for byte in [color.special, color.red, color.green, color.blue] {
        push_hex_byte(&mut result, byte);
    }
    result
}

fn push_hex_byte<const N: usize>(out: &mut String<N>, byte: u8) {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    out.push(DIGITS[usize::from(byte >> 4)] as char).ok();
    out.push(DIGITS[usize::from(byte & 0x0F)] as char).ok();
}

/// Parse the output of [`color_to_string`]. Returns BLACK on any failure.
///
/// Palette names are case-sensitive; hex digits are not.
pub fn string_to_color(text: &str) -> Color {
    for (name, known) in &COLOR_NAME_MAP {
        if text == *name {
            return *known;
        }
    }

    // Otherwise a hex string of exactly "0xSSRRGGBB".
    if text.len() != 10 {
        return BLACK;
    }
    let Some(digits) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) else {
        return BLACK;
    };

    let mut bytes = [0u8; 4];
    for (i, slot) in bytes.iter_mut().enumerate() {
        let Some(pair) = digits.get(i * 2..i * 2 + 2) else {
            return BLACK;
        };
        let Ok(value) = u8::from_str_radix(pair, 16) else {
            return BLACK;
        };
        *slot = value;
    }

    Color {
        special: bytes[0],
        red: bytes[1],
        green: bytes[2],
        blue: bytes[3],
    }
}

/// Serialize a descriptor as `<KIND>,<COLOR>,<COLOR>,<SPEED>`.
pub fn pattern_to_string(descriptor: &PatternDescriptor) -> String<PATTERN_TEXT_MAX> {
    let mut result: String<PATTERN_TEXT_MAX> = String::new();

    result.push_str(descriptor.kind.as_str()).ok();
    result.push(',').ok();
    result.push_str(&color_to_string(descriptor.a)).ok();
    result.push(',').ok();
    result.push_str(&color_to_string(descriptor.b)).ok();
    result.push(',').ok();
    push_decimal(&mut result, descriptor.speed);

    result
}

fn push_decimal<const N: usize>(out: &mut String<N>, mut value: u32) {
    let mut digits = [0u8; 10];
    let mut used = 0;
    loop {
        digits[used] = b'0' + (value % 10) as u8;
        value /= 10;
        used += 1;
        if value == 0 {
            break;
        }
    }
    while used > 0 {
        used -= 1;
        out.push(digits[used] as char).ok();
    }
}

/// Parse a descriptor line.
///
/// Malformed color fields quietly become BLACK; trailing content after the
/// speed integer is ignored. Structural failures return a [`TextError`].
pub fn string_to_pattern(text: &str) -> Result<PatternDescriptor, TextError> {
    let (kind_text, rest) = text
        .split_once(',')
        .ok_or(TextError::MissingKindDelimiter)?;
    if kind_text.is_empty() {
        return Err(TextError::MissingKindDelimiter);
    }

    let kind = PatternKind::parse_from_str(kind_text).ok_or(TextError::UnknownKind)?;

    let (a, rest) = take_color_field(rest).ok_or(TextError::MissingColorADelimiter)?;
    let (b, rest) = take_color_field(rest).ok_or(TextError::MissingColorBDelimiter)?;

    let speed = parse_leading_int(rest);
    if speed < 0 {
        return Err(TextError::NegativeSpeed);
    }

    Ok(PatternDescriptor {
        kind,
        a,
        b,
        speed: speed as u32,
    })
}

/// Scan one color field and the comma that terminates it.
///
/// Palette names run to the next comma. Hex colors are fixed-width: the
/// delimiter must follow the eighth digit, so a short form like `0x00`
/// cannot be quietly mistaken for a color plus a comma.
fn take_color_field(text: &str) -> Option<(Color, &str)> {
    if text.starts_with("0x") || text.starts_with("0X") {
        let field = text.get(..10)?;
        let rest = text.get(10..)?.strip_prefix(',')?;
        Some((string_to_color(field), rest))
    } else {
        let (field, rest) = text.split_once(',')?;
        Some((string_to_color(field), rest))
    }
}

/// Leading-integer parse with `strtol` semantics: consume an optional sign
/// and the digits that follow, ignore the rest, yield 0 when no digits
/// match.
fn parse_leading_int(text: &str) -> i64 {
    let bytes = text.as_bytes();
    let mut index = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            index = 1;
            true
        }
        Some(b'+') => {
            index = 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while let Some(digit) = bytes.get(index).filter(|b| b.is_ascii_digit()) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
        index += 1;
    }

    if negative { -value } else { value }
}
