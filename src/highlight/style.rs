//! Style types for highlight rendering
//!
//! Every word list owns exactly one style. Colours come from the
//! configuration file or are generated from the list's position.

use std::fmt;
use std::str::FromStr;

use crate::error::HighlightError;

/// Alpha used for generated list colours
pub const GENERATED_ALPHA: f32 = 0.3;

/// Colours a list can be painted with
///
/// The ANSI names map onto the 16-colour palette; `Rgba` comes from
/// CSS-like `#rrggbb`, `rgb(..)` and `rgba(..)` values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    Rgba { r: u8, g: u8, b: u8, a: f32 },
}

impl Color {
    /// Distinct colour for the list at `index`
    ///
    /// Hues are spaced by the golden angle so neighbouring lists never
    /// share a shade. Same index, same colour.
    pub fn generated(index: usize) -> Self {
        let hue = (index as f32 * 137.508) % 360.0;
        let (r, g, b) = hsl_to_rgb(hue, 0.65, 0.55);
        Color::Rgba {
            r,
            g,
            b,
            a: GENERATED_ALPHA,
        }
    }

    /// Parse an ANSI colour name (case and `-`/`_` insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match name.as_str() {
            "default" => Some(Color::Default),
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "yellow" => Some(Color::Yellow),
            "blue" => Some(Color::Blue),
            "magenta" => Some(Color::Magenta),
            "cyan" => Some(Color::Cyan),
            "white" => Some(Color::White),
            "brightblack" | "grey" | "gray" => Some(Color::BrightBlack),
            "brightred" => Some(Color::BrightRed),
            "brightgreen" => Some(Color::BrightGreen),
            "brightyellow" => Some(Color::BrightYellow),
            "brightblue" => Some(Color::BrightBlue),
            "brightmagenta" => Some(Color::BrightMagenta),
            "brightcyan" => Some(Color::BrightCyan),
            "brightwhite" => Some(Color::BrightWhite),
            _ => None,
        }
    }

    /// Terminal colour for this value
    ///
    /// Translucent colours are blended over a black background.
    pub fn to_crossterm(self) -> crossterm::style::Color {
        use crossterm::style::Color as Term;
        match self {
            Color::Default => Term::Reset,
            Color::Black => Term::Black,
            Color::Red => Term::DarkRed,
            Color::Green => Term::DarkGreen,
            Color::Yellow => Term::DarkYellow,
            Color::Blue => Term::DarkBlue,
            Color::Magenta => Term::DarkMagenta,
            Color::Cyan => Term::DarkCyan,
            Color::White => Term::Grey,
            Color::BrightBlack => Term::DarkGrey,
            Color::BrightRed => Term::Red,
            Color::BrightGreen => Term::Green,
            Color::BrightYellow => Term::Yellow,
            Color::BrightBlue => Term::Blue,
            Color::BrightMagenta => Term::Magenta,
            Color::BrightCyan => Term::Cyan,
            Color::BrightWhite => Term::White,
            Color::Rgba { r, g, b, a } => {
                let a = a.clamp(0.0, 1.0);
                let blend = |c: u8| (c as f32 * a).round() as u8;
                Term::Rgb {
                    r: blend(r),
                    g: blend(g),
                    b: blend(b),
                }
            }
        }
    }
}

impl FromStr for Color {
    type Err = HighlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || HighlightError::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args).ok_or_else(invalid);
        }

        Color::from_name(s).ok_or_else(invalid)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Default => "default",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
            Color::BrightBlack => "bright-black",
            Color::BrightRed => "bright-red",
            Color::BrightGreen => "bright-green",
            Color::BrightYellow => "bright-yellow",
            Color::BrightBlue => "bright-blue",
            Color::BrightMagenta => "bright-magenta",
            Color::BrightCyan => "bright-cyan",
            Color::BrightWhite => "bright-white",
            Color::Rgba { r, g, b, a } if *a >= 1.0 => {
                return write!(f, "#{:02x}{:02x}{:02x}", r, g, b);
            }
            Color::Rgba { r, g, b, a } => {
                return write!(f, "rgba({}, {}, {}, {})", r, g, b, a);
            }
        };
        f.write_str(name)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color::Rgba {
            r: digit(0)? * 17,
            g: digit(1)? * 17,
            b: digit(2)? * 17,
            a: 1.0,
        }),
        6 => Some(Color::Rgba {
            r: pair(0)?,
            g: pair(2)?,
            b: pair(4)?,
            a: 1.0,
        }),
        8 => Some(Color::Rgba {
            r: pair(0)?,
            g: pair(2)?,
            b: pair(4)?,
            a: pair(6)? as f32 / 255.0,
        }),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<u8>().ok();
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgba {
            r: channel(r)?,
            g: channel(g)?,
            b: channel(b)?,
            a: 1.0,
        }),
        [r, g, b, a] => {
            let a = a.parse::<f32>().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            Some(Color::Rgba {
                r: channel(r)?,
                g: channel(g)?,
                b: channel(b)?,
                a,
            })
        }
        _ => None,
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r1), to_byte(g1), to_byte(b1))
}

/// How a list's matches are painted
///
/// Lists only ever tint the background, so the text colour underneath
/// stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    /// Background color
    pub bg: Color,
}

impl Style {
    /// Overlay style used for a word list's matches
    pub fn overlay(color: Color) -> Self {
        Self { bg: color }
    }
}
