//! Packed ARGB colors.

use std::fmt;

/// A color stored as `0xAARRGGBB`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent. The default background of every block.
    pub const TRANSPARENT: Color = Color(0);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const KEYBOARD_FOCUS: Color = Color(0xFF00_63E1);

    /// An opaque color from its red, green and blue channels.
    #[inline]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 255)
    }

    /// A color from all four channels.
    #[inline]
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Color(((alpha as u32) << 24) | ((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Whether the color is anything other than fully opaque.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        self.alpha() < 255
    }

    /// Whether painting with this color would have any visible effect.
    #[inline]
    pub const fn is_visible(self) -> bool {
        self.alpha() > 0
    }

    /// The same color with a replaced alpha channel.
    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Color((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_alpha() {
            write!(
                f,
                "rgba({},{},{},{:.2})",
                self.red(),
                self.green(),
                self.blue(),
                self.alpha() as f32 / 255.0
            )
        } else {
            write!(f, "#{:06X}", self.0 & 0x00FF_FFFF)
        }
    }
}
