//! Scalar vocabulary types shared across the catalog.
//!
//! Schema enums serialize as fixed token strings; unit enums are carried as
//! data only, conversion between units being out of scope here.

use std::fmt;

/// A closed token vocabulary from the schema.
///
/// Serialization writes `as_token`; decoding accepts exactly those strings
/// through `from_token`.
pub trait SchemaToken: Copy + Sized {
    /// Vocabulary name, used in mismatch messages.
    const NAME: &'static str;

    fn as_token(self) -> &'static str;
    fn from_token(token: &str) -> Option<Self>;
}

/// Macro to define closed token enums from the schema vocabulary.
///
/// Each generated type implements [`SchemaToken`] and a `Display` that
/// writes the token.
macro_rules! schema_enums {
    ($(
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $token:literal),* $(,)? }
    )*) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum $name {
            $($variant,)*
        }

        impl SchemaToken for $name {
            const NAME: &'static str = stringify!($name);

            fn as_token(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)*
                }
            }

            fn from_token(token: &str) -> Option<Self> {
                match token {
                    $($token => Some($name::$variant),)*
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_token())
            }
        }
    )* };
}

schema_enums! {
    /// Storage order of the pixel dimensions after X and Y.
    DimensionOrder {
        Xyzct => "XYZCT",
        Xyztc => "XYZTC",
        Xyctz => "XYCTZ",
        Xyczt => "XYCZT",
        Xytcz => "XYTCZ",
        Xytzc => "XYTZC",
    }

    /// Sample value encoding of a pixel plane.
    PixelType {
        Int8 => "int8",
        Int16 => "int16",
        Int32 => "int32",
        Uint8 => "uint8",
        Uint16 => "uint16",
        Uint32 => "uint32",
        Float => "float",
        Double => "double",
    }

    DetectorType {
        Ccd => "CCD",
        EmCcd => "EMCCD",
        Cmos => "CMOS",
        Pmt => "PMT",
        Other => "Other",
    }

    /// Line and polyline endpoint decoration.
    Marker {
        Arrow => "Arrow",
    }

    UnitsLength {
        Angstrom => "\u{c5}",
        Nanometer => "nm",
        Micrometer => "\u{b5}m",
        Millimeter => "mm",
        Meter => "m",
        Pixel => "pixel",
    }

    UnitsTime {
        Second => "s",
        Millisecond => "ms",
        Microsecond => "\u{b5}s",
        Minute => "min",
        Hour => "h",
    }
}

/// Packed RGBA color, one byte per channel, alpha last.
///
/// Stored in the signed 32-bit form documents use; the default is opaque
/// white (`0xFFFFFFFF`, which reads back as `-1`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color(pub i32);

impl Color {
    pub const OPAQUE_WHITE: Color = Color(-1);

    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let packed =
            (u32::from(r) << 24) | (u32::from(g) << 16) | (u32::from(b) << 8) | u32::from(a);
        #[expect(
            clippy::cast_possible_wrap,
            reason = "documents store the packed value in signed form"
        )]
        let signed = packed as i32;
        Color(signed)
    }

    #[expect(
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation,
        reason = "unpacking the signed storage form back to bytes"
    )]
    pub fn rgba(self) -> (u8, u8, u8, u8) {
        let packed = self.0 as u32;
        (
            (packed >> 24) as u8,
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::OPAQUE_WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokens_round_trip() {
        assert_eq!(DimensionOrder::from_token("XYCZT"), Some(DimensionOrder::Xyczt));
        assert_eq!(DimensionOrder::Xyczt.as_token(), "XYCZT");
        assert_eq!(PixelType::from_token("uint16"), Some(PixelType::Uint16));
        assert_eq!(PixelType::from_token("Uint16"), None);
        assert_eq!(UnitsLength::Micrometer.as_token(), "\u{b5}m");
    }

    #[test]
    fn default_color_is_opaque_white() {
        assert_eq!(Color::default().0, -1);
        assert_eq!(Color::default().rgba(), (255, 255, 255, 255));
    }

    #[test]
    fn color_packs_alpha_last() {
        let red = Color::from_rgba(255, 0, 0, 255);
        assert_eq!(red.rgba(), (255, 0, 0, 255));
        assert_eq!(red.0, -16_776_961);
    }
}
