//! Page layout options and their mapping to print parameters.
//!
//! [`RenderOptions`] is what callers send: every field is optional. Before
//! anything reaches the engine it is resolved into [`PrintSettings`], where
//! every default has been substituted and every margin has been validated.
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `format` | `A4` |
//! | `landscape` | `false` |
//! | `margin.{top,right,bottom,left}` | `"20px"` each |
//! | `printBackground` | `true` |
//!
//! # Example
//!
//! ```rust
//! use html2pdf_service::{PageFormat, RenderOptions};
//!
//! let options = RenderOptions {
//!     format: Some(PageFormat::Letter),
//!     landscape: Some(true),
//!     ..Default::default()
//! };
//!
//! let settings = options.resolve().unwrap();
//! assert_eq!(settings.format, PageFormat::Letter);
//! assert!(settings.landscape);
//! assert!(settings.print_background);
//! assert_eq!(settings.margin.top.as_str(), "20px");
//! ```

use std::fmt;
use std::str::FromStr;

use headless_chrome::types::PrintToPdfOptions;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Margin applied to every side the caller leaves unset.
pub const DEFAULT_MARGIN: &str = "20px";

/// CSS pixels per inch.
const PX_PER_INCH: f64 = 96.0;

// ============================================================================
// Page Format
// ============================================================================

/// Named paper size.
///
/// Parsed case-insensitively (`"letter"`, `"LETTER"` and `"Letter"` are the
/// same format) and serialized with its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageFormat {
    /// 210 × 297 mm.
    #[default]
    A4,
    /// 297 × 420 mm.
    A3,
    /// 8.5 × 11 in.
    Letter,
    /// 8.5 × 14 in.
    Legal,
    /// 11 × 17 in.
    Tabloid,
}

impl PageFormat {
    /// Canonical name as accepted on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
            Self::Tabloid => "Tabloid",
        }
    }

    /// Portrait paper size in inches as `(width, height)`.
    ///
    /// Orientation is passed to the engine separately, so this never swaps.
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            Self::A4 => (8.27, 11.7),
            Self::A3 => (11.7, 16.54),
            Self::Letter => (8.5, 11.0),
            Self::Legal => (8.5, 14.0),
            Self::Tabloid => (11.0, 17.0),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "tabloid" => Ok(Self::Tabloid),
            _ => Err(format!("Unknown paper format: {}", s)),
        }
    }
}

impl TryFrom<String> for PageFormat {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageFormat> for String {
    fn from(format: PageFormat) -> Self {
        format.name().to_string()
    }
}

// ============================================================================
// CSS Lengths
// ============================================================================

/// A validated CSS length.
///
/// Keeps the caller's text untouched alongside the converted value so the
/// print step sees exactly what was requested.
///
/// Accepted units are `px`, `in`, `cm`, `mm`, `pt` and `pc`; a bare number is
/// taken as pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct CssLength {
    text: String,
    inches: f64,
}

impl CssLength {
    /// Parse a CSS length string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidOptions`] for empty, unparsable,
    /// non-finite or negative values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use html2pdf_service::CssLength;
    ///
    /// assert_eq!(CssLength::parse("96px").unwrap().to_inches(), 1.0);
    /// assert_eq!(CssLength::parse("1in").unwrap().to_inches(), 1.0);
    /// assert!(CssLength::parse("wide").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let lower = trimmed.to_ascii_lowercase();

        let suffix_at = lower
            .len()
            .checked_sub(2)
            .filter(|&i| lower.is_char_boundary(i));

        let (number, px_per_unit) = match suffix_at.map(|i| lower.split_at(i)) {
            Some((n, "px")) => (n, 1.0),
            Some((n, "in")) => (n, PX_PER_INCH),
            Some((n, "cm")) => (n, 37.8),
            Some((n, "mm")) => (n, 3.78),
            Some((n, "pt")) => (n, 4.0 / 3.0),
            Some((n, "pc")) => (n, 16.0),
            _ => (lower.as_str(), 1.0),
        };

        let value: f64 = number.trim().parse().map_err(|_| {
            RenderError::InvalidOptions(format!("Failed to parse parameter value: '{}'", text))
        })?;

        if !value.is_finite() || value < 0.0 {
            return Err(RenderError::InvalidOptions(format!(
                "Length must be a non-negative finite value: '{}'",
                text
            )));
        }

        Ok(Self {
            text: text.to_string(),
            inches: value * px_per_unit / PX_PER_INCH,
        })
    }

    /// The length exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The length converted to inches, the unit the print API expects.
    pub fn to_inches(&self) -> f64 {
        self.inches
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ============================================================================
// Caller-facing Options
// ============================================================================

/// Page margins as CSS length strings. Each side is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    /// Top margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    /// Right margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    /// Bottom margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    /// Left margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
}

impl PageMargins {
    /// The same length on all four sides.
    pub fn uniform(length: impl Into<String>) -> Self {
        let length = length.into();
        Self {
            top: Some(length.clone()),
            right: Some(length.clone()),
            bottom: Some(length.clone()),
            left: Some(length),
        }
    }
}

/// Rendering options supplied by the caller.
///
/// A configuration object, not a domain entity: an absent field means the
/// documented default. The JSON shape uses camelCase:
///
/// ```json
/// {
///     "css": "h1 { color: navy; }",
///     "format": "Letter",
///     "landscape": true,
///     "margin": { "top": "1in", "bottom": "1in" },
///     "printBackground": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Inline stylesheet placed in the document head.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,

    /// Paper size. Defaults to A4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<PageFormat>,

    /// Landscape orientation. Defaults to portrait.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landscape: Option<bool>,

    /// Page margins. Every side left out becomes `20px`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<PageMargins>,

    /// Include CSS backgrounds. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_background: Option<bool>,
}

impl RenderOptions {
    /// Options with only a stylesheet set; everything else is default.
    pub fn with_css(css: Option<String>) -> Self {
        Self {
            css,
            ..Default::default()
        }
    }

    /// Substitute defaults and validate margins.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidOptions`] if a margin is not a valid
    /// CSS length.
    pub fn resolve(&self) -> Result<PrintSettings> {
        let margin = self.margin.clone().unwrap_or_default();
        let side = |value: Option<String>| -> Result<CssLength> {
            CssLength::parse(value.as_deref().unwrap_or(DEFAULT_MARGIN))
        };

        Ok(PrintSettings {
            format: self.format.unwrap_or_default(),
            landscape: self.landscape.unwrap_or(false),
            print_background: self.print_background.unwrap_or(true),
            margin: MarginBox {
                top: side(margin.top)?,
                right: side(margin.right)?,
                bottom: side(margin.bottom)?,
                left: side(margin.left)?,
            },
        })
    }
}

// ============================================================================
// Resolved Settings
// ============================================================================

/// Four validated margins.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginBox {
    /// Top margin.
    pub top: CssLength,
    /// Right margin.
    pub right: CssLength,
    /// Bottom margin.
    pub bottom: CssLength,
    /// Left margin.
    pub left: CssLength,
}

/// Fully resolved print parameters handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintSettings {
    /// Paper size.
    pub format: PageFormat,
    /// Landscape orientation.
    pub landscape: bool,
    /// Include CSS backgrounds.
    pub print_background: bool,
    /// Page margins.
    pub margin: MarginBox,
}

impl Default for PrintSettings {
    fn default() -> Self {
        let margin = || CssLength {
            text: DEFAULT_MARGIN.to_string(),
            inches: 20.0 / PX_PER_INCH,
        };
        Self {
            format: PageFormat::A4,
            landscape: false,
            print_background: true,
            margin: MarginBox {
                top: margin(),
                right: margin(),
                bottom: margin(),
                left: margin(),
            },
        }
    }
}

impl PrintSettings {
    /// Map to the DevTools `Page.printToPDF` parameters.
    pub fn to_print_options(&self) -> PrintToPdfOptions {
        let (paper_width, paper_height) = self.format.size_inches();
        PrintToPdfOptions {
            landscape: Some(self.landscape),
            display_header_footer: Some(false),
            print_background: Some(self.print_background),
            paper_width: Some(paper_width),
            paper_height: Some(paper_height),
            margin_top: Some(self.margin.top.to_inches()),
            margin_bottom: Some(self.margin.bottom.to_inches()),
            margin_left: Some(self.margin.left.to_inches()),
            margin_right: Some(self.margin.right.to_inches()),
            ..Default::default()
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_resolve_empty_options_applies_defaults() {
        let settings = RenderOptions::default().resolve().unwrap();

        assert_eq!(settings.format, PageFormat::A4);
        assert!(!settings.landscape);
        assert!(settings.print_background);
        for side in [
            &settings.margin.top,
            &settings.margin.right,
            &settings.margin.bottom,
            &settings.margin.left,
        ] {
            assert_eq!(side.as_str(), "20px");
        }
        assert_eq!(settings, PrintSettings::default());
    }

    #[test]
    fn test_resolve_explicit_values_pass_through() {
        let options = RenderOptions {
            css: Some("p { margin: 0 }".to_string()),
            format: Some(PageFormat::Tabloid),
            landscape: Some(true),
            margin: Some(PageMargins {
                top: Some("1in".to_string()),
                right: Some("2cm".to_string()),
                bottom: Some("15mm".to_string()),
                left: Some("0".to_string()),
            }),
            print_background: Some(false),
        };

        let settings = options.resolve().unwrap();
        assert_eq!(settings.format, PageFormat::Tabloid);
        assert!(settings.landscape);
        assert!(!settings.print_background);
        assert_eq!(settings.margin.top.as_str(), "1in");
        assert_eq!(settings.margin.right.as_str(), "2cm");
        assert_eq!(settings.margin.bottom.as_str(), "15mm");
        assert_eq!(settings.margin.left.as_str(), "0");
    }

    #[test]
    fn test_resolve_partial_margin_defaults_missing_sides() {
        let options = RenderOptions {
            margin: Some(PageMargins {
                top: Some("40px".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let settings = options.resolve().unwrap();
        assert_eq!(settings.margin.top.as_str(), "40px");
        assert_eq!(settings.margin.right.as_str(), DEFAULT_MARGIN);
        assert_eq!(settings.margin.bottom.as_str(), DEFAULT_MARGIN);
        assert_eq!(settings.margin.left.as_str(), DEFAULT_MARGIN);
    }

    #[test]
    fn test_resolve_rejects_bad_margin() {
        let options = RenderOptions {
            margin: Some(PageMargins::uniform("wide")),
            ..Default::default()
        };

        assert!(matches!(
            options.resolve(),
            Err(RenderError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_css_length_units() {
        assert!(approx(CssLength::parse("96px").unwrap().to_inches(), 1.0));
        assert!(approx(CssLength::parse("96").unwrap().to_inches(), 1.0));
        assert!(approx(CssLength::parse("2in").unwrap().to_inches(), 2.0));
        assert!(approx(CssLength::parse("72pt").unwrap().to_inches(), 1.0));
        assert!(approx(CssLength::parse("6pc").unwrap().to_inches(), 1.0));
        assert!(approx(CssLength::parse("10mm").unwrap().to_inches(), 37.8 / 96.0));
        assert!(approx(CssLength::parse("1cm").unwrap().to_inches(), 37.8 / 96.0));
        assert!(approx(CssLength::parse(" 1.5IN ").unwrap().to_inches(), 1.5));
    }

    #[test]
    fn test_css_length_rejects_invalid() {
        for text in ["", "px", "abc", "-5px", "NaN", "inf", "1em"] {
            assert!(
                CssLength::parse(text).is_err(),
                "expected '{}' to be rejected",
                text
            );
        }
    }

    #[test]
    fn test_css_length_keeps_original_text() {
        let length = CssLength::parse(" 12PX ").unwrap();
        assert_eq!(length.as_str(), " 12PX ");
        assert_eq!(length.to_string(), " 12PX ");
    }

    #[test]
    fn test_page_format_parse_case_insensitive() {
        assert_eq!("letter".parse::<PageFormat>().unwrap(), PageFormat::Letter);
        assert_eq!("LEGAL".parse::<PageFormat>().unwrap(), PageFormat::Legal);
        assert_eq!("a3".parse::<PageFormat>().unwrap(), PageFormat::A3);
        assert!("B5".parse::<PageFormat>().is_err());
    }

    #[test]
    fn test_page_format_serde() {
        let format: PageFormat = serde_json::from_str("\"tabloid\"").unwrap();
        assert_eq!(format, PageFormat::Tabloid);
        assert_eq!(serde_json::to_string(&format).unwrap(), "\"Tabloid\"");
        assert!(serde_json::from_str::<PageFormat>("\"Folio\"").is_err());
    }

    #[test]
    fn test_render_options_json_shape() {
        let json = r#"{
            "css": "h1{}",
            "format": "Letter",
            "landscape": true,
            "margin": {"top": "1in"},
            "printBackground": false
        }"#;
        let options: RenderOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.css.as_deref(), Some("h1{}"));
        assert_eq!(options.format, Some(PageFormat::Letter));
        assert_eq!(options.landscape, Some(true));
        assert_eq!(options.print_background, Some(false));
        assert_eq!(
            options.margin.as_ref().and_then(|m| m.top.as_deref()),
            Some("1in")
        );

        let empty: RenderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RenderOptions::default());
    }

    #[test]
    fn test_to_print_options_mapping() {
        let settings = RenderOptions {
            format: Some(PageFormat::Letter),
            landscape: Some(true),
            margin: Some(PageMargins::uniform("1in")),
            ..Default::default()
        }
        .resolve()
        .unwrap();

        let options = settings.to_print_options();
        assert_eq!(options.landscape, Some(true));
        assert_eq!(options.print_background, Some(true));
        assert_eq!(options.display_header_footer, Some(false));
        assert_eq!(options.paper_width, Some(8.5));
        assert_eq!(options.paper_height, Some(11.0));
        assert_eq!(options.margin_top, Some(1.0));
        assert_eq!(options.margin_right, Some(1.0));
        assert_eq!(options.margin_bottom, Some(1.0));
        assert_eq!(options.margin_left, Some(1.0));
    }

    #[test]
    fn test_default_margin_in_inches() {
        let options = PrintSettings::default().to_print_options();
        let expected = 20.0 / 96.0;
        assert!(approx(options.margin_top.unwrap(), expected));
        assert!(approx(options.margin_left.unwrap(), expected));
        assert_eq!(options.paper_width, Some(8.27));
        assert_eq!(options.paper_height, Some(11.7));
    }
}
