//! Text style options and their fixed value tables.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::GenerateError;
use crate::padding::{PaddingBox, PaddingSides};
use crate::params::{parse_pixels, validate_color, OutputFormat};

/// Font size used when none is given.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Background used when none is given; renders transparent.
pub const DEFAULT_BACKGROUND: &str = "none";

/// Font style (`-style`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    /// Upright.
    Normal,
    /// Italic.
    Italic,
    /// Oblique.
    Oblique,
}

impl FontStyle {
    /// The value passed to the tool.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }
}

impl FromStr for FontStyle {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "italic" => Ok(Self::Italic),
            "oblique" => Ok(Self::Oblique),
            _ => Err(GenerateError::InvalidStyle {
                key: "font_style",
                value: s.to_string(),
                valid: "normal, italic, oblique",
            }),
        }
    }
}

/// Font stretch (`-stretch`), the nine CSS keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStretch {
    /// `ultra-condensed`
    UltraCondensed,
    /// `extra-condensed`
    ExtraCondensed,
    /// `condensed`
    Condensed,
    /// `semi-condensed`
    SemiCondensed,
    /// `normal`
    Normal,
    /// `semi-expanded`
    SemiExpanded,
    /// `expanded`
    Expanded,
    /// `extra-expanded`
    ExtraExpanded,
    /// `ultra-expanded`
    UltraExpanded,
}

impl FontStretch {
    /// The value passed to the tool.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UltraCondensed => "ultra-condensed",
            Self::ExtraCondensed => "extra-condensed",
            Self::Condensed => "condensed",
            Self::SemiCondensed => "semi-condensed",
            Self::Normal => "normal",
            Self::SemiExpanded => "semi-expanded",
            Self::Expanded => "expanded",
            Self::ExtraExpanded => "extra-expanded",
            Self::UltraExpanded => "ultra-expanded",
        }
    }
}

impl FromStr for FontStretch {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ultra-condensed" => Ok(Self::UltraCondensed),
            "extra-condensed" => Ok(Self::ExtraCondensed),
            "condensed" => Ok(Self::Condensed),
            "semi-condensed" => Ok(Self::SemiCondensed),
            "normal" => Ok(Self::Normal),
            "semi-expanded" => Ok(Self::SemiExpanded),
            "expanded" => Ok(Self::Expanded),
            "extra-expanded" => Ok(Self::ExtraExpanded),
            "ultra-expanded" => Ok(Self::UltraExpanded),
            _ => Err(GenerateError::InvalidStyle {
                key: "font_stretch",
                value: s.to_string(),
                valid: "ultra-condensed, extra-condensed, condensed, semi-condensed, normal, \
                        semi-expanded, expanded, extra-expanded, ultra-expanded",
            }),
        }
    }
}

/// Font weight (`-weight`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// `normal`
    Normal,
    /// `bold`
    Bold,
    /// `bolder`
    Bolder,
    /// `lighter`
    Lighter,
    /// A numeric weight, one of 100, 200, ... 900.
    Numeric(u16),
}

impl FontWeight {
    /// The value passed to the tool.
    #[must_use]
    pub fn as_arg(self) -> Cow<'static, str> {
        match self {
            Self::Normal => "normal".into(),
            Self::Bold => "bold".into(),
            Self::Bolder => "bolder".into(),
            Self::Lighter => "lighter".into(),
            Self::Numeric(n) => n.to_string().into(),
        }
    }
}

impl FromStr for FontWeight {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        match value.as_str() {
            "normal" => Ok(Self::Normal),
            "bold" => Ok(Self::Bold),
            "bolder" => Ok(Self::Bolder),
            "lighter" => Ok(Self::Lighter),
            "100" | "200" | "300" | "400" | "500" | "600" | "700" | "800" | "900" => {
                value.parse().map(Self::Numeric).map_err(|_| invalid_weight(s))
            }
            _ => Err(invalid_weight(s)),
        }
    }
}

fn invalid_weight(value: &str) -> GenerateError {
    GenerateError::InvalidStyle {
        key: "font_weight",
        value: value.to_string(),
        valid: "normal, bold, bolder, lighter, 100, 200, 300, 400, 500, 600, 700, 800, 900",
    }
}

/// Collapse the textual variants of an option key to snake case.
///
/// `font-size`, `fontSize`, `FontSize` and `FONT_SIZE` all become `font_size`.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.trim().chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        } else {
            if c.is_uppercase()
                && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
                && !out.ends_with('_')
            {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        }
        prev = Some(c);
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Style options for the text generator.
///
/// Every field is optional; defaults are applied when the label is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleOptions {
    /// Output format, `png` when unset.
    pub format: Option<OutputFormat>,
    /// Background color, transparent when unset.
    pub background_color: Option<String>,
    /// Point size, 12 when unset.
    pub font_size: Option<u32>,
    /// Font name or path.
    pub font: Option<String>,
    /// Font family.
    pub font_family: Option<String>,
    /// Fill color.
    pub color: Option<String>,
    /// Stroke color.
    pub stroke_color: Option<String>,
    /// Font style.
    pub font_style: Option<FontStyle>,
    /// Font stretch.
    pub font_stretch: Option<FontStretch>,
    /// Font weight.
    pub font_weight: Option<FontWeight>,
    /// Shorthand padding.
    pub padding: Option<PaddingBox>,
    /// Per-side padding, overriding the shorthand.
    pub padding_sides: PaddingSides,
}

impl StyleOptions {
    /// Build options from loosely keyed string pairs, as a host would pass them.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown key or a bad value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, GenerateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            options.set(key.as_ref(), value.as_ref())?;
        }
        Ok(options)
    }

    /// Set one option by key. Later values replace earlier ones.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown key or a bad value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), GenerateError> {
        match normalize_key(key).as_str() {
            "format" => self.format = Some(value.parse()?),
            "background_color" => {
                validate_color("background_color", value)?;
                self.background_color = Some(value.to_string());
            }
            "font_size" => self.font_size = Some(parse_font_size(value)?),
            "font" => self.font = Some(text_value("font", value)?),
            "font_family" => self.font_family = Some(text_value("font_family", value)?),
            "color" => {
                validate_color("color", value)?;
                self.color = Some(value.to_string());
            }
            "stroke_color" => {
                validate_color("stroke_color", value)?;
                self.stroke_color = Some(value.to_string());
            }
            "font_style" => self.font_style = Some(value.parse()?),
            "font_stretch" => self.font_stretch = Some(value.parse()?),
            "font_weight" => self.font_weight = Some(value.parse()?),
            "padding" => self.padding = Some(PaddingBox::parse(value)?),
            "padding_top" => self.padding_sides.top = Some(padding_side(value)?),
            "padding_right" => self.padding_sides.right = Some(padding_side(value)?),
            "padding_bottom" => self.padding_sides.bottom = Some(padding_side(value)?),
            "padding_left" => self.padding_sides.left = Some(padding_side(value)?),
            _ => return Err(GenerateError::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    /// Effective output format.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format.clone().unwrap_or_default()
    }

    /// Effective background color.
    #[must_use]
    pub fn background(&self) -> &str {
        self.background_color.as_deref().unwrap_or(DEFAULT_BACKGROUND)
    }

    /// Effective point size.
    #[must_use]
    pub fn font_size(&self) -> u32 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Resolved padding, or `None` when no padding option was given at all.
    ///
    /// A request with only zero padding still resolves to `Some`.
    #[must_use]
    pub fn resolve_padding(&self) -> Option<PaddingBox> {
        if self.padding.is_none() && self.padding_sides.is_empty() {
            return None;
        }
        Some(self.padding_sides.resolve(self.padding))
    }
}

impl fmt::Display for StyleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (format, size) = (self.format(), self.font_size());
        write!(f, "format={format} size={size} background={}", self.background())
    }
}

fn parse_font_size(value: &str) -> Result<u32, GenerateError> {
    match parse_pixels(value) {
        Some(size) if size > 0 => Ok(size),
        _ => Err(GenerateError::InvalidArgument(format!("Invalid font_size '{value}'"))),
    }
}

fn padding_side(value: &str) -> Result<u32, GenerateError> {
    parse_pixels(value).ok_or_else(|| GenerateError::InvalidPadding(value.to_string()))
}

fn text_value(key: &str, value: &str) -> Result<String, GenerateError> {
    if value.trim().is_empty() || value.chars().any(char::is_control) {
        return Err(GenerateError::InvalidArgument(format!("Invalid {key} '{value}'")));
    }
    Ok(value.to_string())
}
