//! Color tags and colorized cells.
//!
//! A [`ColorTag`] names a palette color plus an optional modifier. Tags are
//! decided when a rule is defined; nothing downstream looks at strings.

use std::fmt;
use std::str::FromStr;
use unicode_width::UnicodeWidthChar;

/// Base colors a rule can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Untouched text.
    #[default]
    Plain,
    /// Green
    Green,
    /// Red
    Red,
    /// Blue
    Blue,
    /// Cyan
    Cyan,
    /// White
    White,
    /// Yellow
    Yellow,
}

impl Color {
    /// Every color, in palette order.
    pub const ALL: [Self; 7] = [
        Self::Plain,
        Self::Green,
        Self::Red,
        Self::Blue,
        Self::Cyan,
        Self::White,
        Self::Yellow,
    ];

    /// Upper-case name as written in rule patterns.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::Green => "GREEN",
            Self::Red => "RED",
            Self::Blue => "BLUE",
            Self::Cyan => "CYAN",
            Self::White => "WHITE",
            Self::Yellow => "YELLOW",
        }
    }
}

/// Attribute modifier carried by a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Bold, marked by a trailing `X` on the color name.
    Bold,
    /// Blink, marked by a trailing `B` on the color name.
    Blink,
}

impl Modifier {
    const fn marker(self) -> char {
        match self {
            Self::Bold => 'X',
            Self::Blink => 'B',
        }
    }
}

/// A color plus optional modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorTag {
    /// Base color.
    pub color: Color,
    /// Bold or blink.
    pub modifier: Option<Modifier>,
}

impl ColorTag {
    /// The default tag.
    pub const PLAIN: Self = Self::new(Color::Plain);

    /// A tag without modifier.
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            modifier: None,
        }
    }

    /// Attach a modifier (builder pattern).
    #[must_use]
    pub const fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }
}

/// Raised when a name is not `COLOR` optionally followed by `X` or `B`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl FromStr for ColorTag {
    type Err = UnknownColor;

    /// Parse `GREEN`, `GREENX` (bold) or `GREENB` (blink).
    ///
    /// The exact name wins over the marker reading, so `BLUE` never parses
    /// as `BLU` + blink.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let exact = |name: &str| Color::ALL.into_iter().find(|c| c.name() == name);

        if let Some(color) = exact(s) {
            return Ok(Self::new(color));
        }
        for modifier in [Modifier::Bold, Modifier::Blink] {
            if let Some(base) = s.strip_suffix(modifier.marker()) {
                if let Some(color) = exact(base) {
                    return Ok(Self::new(color).with_modifier(modifier));
                }
            }
        }
        Err(UnknownColor(s.to_string()))
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color.name())?;
        if let Some(modifier) = self.modifier {
            write!(f, "{}", modifier.marker())?;
        }
        Ok(())
    }
}

/// One character of a colorized line. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorCell {
    ch: char,
    tag: ColorTag,
}

impl ColorCell {
    /// A blank plain cell.
    pub const BLANK: Self = Self {
        ch: ' ',
        tag: ColorTag::PLAIN,
    };

    /// Create a cell.
    ///
    /// Each lane is a single terminal column, so characters that do not
    /// occupy exactly one column are replaced by `?`.
    pub fn new(ch: char, tag: ColorTag) -> Self {
        let ch = if ch.is_control() || ch.width() != Some(1) {
            '?'
        } else {
            ch
        };
        Self { ch, tag }
    }

    /// The character.
    #[inline]
    pub const fn ch(&self) -> char {
        self.ch
    }

    /// The color tag.
    #[inline]
    pub const fn tag(&self) -> ColorTag {
        self.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_names() {
        assert_eq!("GREEN".parse::<ColorTag>(), Ok(ColorTag::new(Color::Green)));
        assert_eq!("BLUE".parse::<ColorTag>(), Ok(ColorTag::new(Color::Blue)));
        assert_eq!("PLAIN".parse::<ColorTag>(), Ok(ColorTag::PLAIN));
    }

    #[test]
    fn test_parse_modifier_markers() {
        assert_eq!(
            "WHITEB".parse::<ColorTag>(),
            Ok(ColorTag::new(Color::White).with_modifier(Modifier::Blink))
        );
        assert_eq!(
            "REDX".parse::<ColorTag>(),
            Ok(ColorTag::new(Color::Red).with_modifier(Modifier::Bold))
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!("MAGENTA".parse::<ColorTag>().is_err());
        assert!("green".parse::<ColorTag>().is_err());
        assert!("GREENXB".parse::<ColorTag>().is_err());
    }

    #[test]
    fn test_display_roundtrips_marker() {
        let tag = ColorTag::new(Color::Yellow).with_modifier(Modifier::Blink);
        assert_eq!(tag.to_string(), "YELLOWB");
    }

    #[test]
    fn test_cell_replaces_multi_column_chars() {
        assert_eq!(ColorCell::new('\t', ColorTag::PLAIN).ch(), '?');
        assert_eq!(ColorCell::new('日', ColorTag::PLAIN).ch(), '?');
        assert_eq!(ColorCell::new('é', ColorTag::PLAIN).ch(), 'é');
    }
}
