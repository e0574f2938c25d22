//! Palette: color tag to terminal attribute mapping.
//!
//! The palette is an ordinary value handed to the render engine when it is
//! built, so two engines (or a test and an engine) can use different
//! mappings side by side.

use super::tag::{Color, ColorTag, Modifier};
use crate::buffer::{Modifiers, Rgb, Style};

/// Foreground/background pair for every base color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pairs: [Style; Color::ALL.len()],
}

impl Palette {
    /// Build a palette from explicit styles in [`Color::ALL`] order.
    pub const fn from_styles(pairs: [Style; Color::ALL.len()]) -> Self {
        Self { pairs }
    }

    /// Override the style of one color (builder pattern).
    #[must_use]
    pub const fn with(mut self, color: Color, style: Style) -> Self {
        self.pairs[color as usize] = style;
        self
    }

    /// Base style of a color, without modifiers.
    #[inline]
    pub const fn base(&self, color: Color) -> Style {
        self.pairs[color as usize]
    }

    /// Resolve a tag to the attribute the surface should use.
    pub const fn style(&self, tag: ColorTag) -> Style {
        let base = self.base(tag.color);
        match tag.modifier {
            None => base,
            Some(Modifier::Bold) => base.with_modifiers(Modifiers::BOLD),
            Some(Modifier::Blink) => base.with_modifiers(Modifiers::BLINK),
        }
    }
}

impl Default for Palette {
    /// Classic eight-color pairs: green/blue on black, the rest on white
    /// except cyan, which sits on red.
    fn default() -> Self {
        const GREEN: Rgb = Rgb::from_u32(0x00CD00);
        const RED: Rgb = Rgb::from_u32(0xCD0000);
        const BLUE: Rgb = Rgb::from_u32(0x0000EE);
        const CYAN: Rgb = Rgb::from_u32(0x00CDCD);
        const YELLOW: Rgb = Rgb::from_u32(0xCDCD00);
        const WHITE: Rgb = Rgb::from_u32(0xE5E5E5);

        Self::from_styles([
            Style::DEFAULT,
            Style::new(GREEN, Rgb::BLACK),
            Style::new(RED, WHITE),
            Style::new(BLUE, Rgb::BLACK),
            Style::new(CYAN, RED),
            Style::new(Rgb::BLACK, WHITE),
            Style::new(YELLOW, WHITE),
        ])
    }
}
