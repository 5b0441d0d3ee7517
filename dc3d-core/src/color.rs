/// RGBA colours and their text notations
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map_res, opt, recognize},
    number::complete::double,
    sequence::{delimited, preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An sRGB colour with integer channels and a straight alpha in `[0, 1]`.
///
/// Construction never fails: channels outside their range are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawColor")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 1.0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 1.0 };

    pub fn new(r: i32, g: i32, b: i32, a: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_alpha(a),
        }
    }

    pub fn rgb(r: i32, g: i32, b: i32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same hue with a different opacity
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: clamp_alpha(a), ..self }
    }

    /// `#RRGGBB`, alpha is not part of it
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

fn clamp_alpha(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// CSS `rgba(...)` notation, usable directly as a canvas fill style
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Wire form of a colour. Channels may arrive as any number and are clamped.
#[derive(Deserialize)]
struct RawColor {
    r: f64,
    g: f64,
    b: f64,
    #[serde(default = "opaque")]
    a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl From<RawColor> for Color {
    fn from(raw: RawColor) -> Self {
        let channel = |v: f64| v.round().clamp(0.0, 255.0) as i32;
        Color::new(channel(raw.r), channel(raw.g), channel(raw.b), raw.a)
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(alt((hex_color, rgba_color, rgb_color)))(s.trim())
            .map(|(_, color)| color)
            .map_err(|_| Error::ColorParse(s.to_string()))
    }
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |digits| u8::from_str_radix(digits, 16),
    )(input)
}

fn hex_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = char('#')(input)?;
    let (input, (r, g, b)) = tuple((hex_byte, hex_byte, hex_byte))(input)?;
    let (input, a) = opt(hex_byte)(input)?;
    let alpha = a.map_or(1.0, |a| f64::from(a) / 255.0);
    Ok((input, Color::new(r.into(), g.into(), b.into(), alpha)))
}

fn channel(input: &str) -> IResult<&str, i32> {
    delimited(
        multispace0,
        map_res(recognize(preceded(opt(char('-')), digit1)), str::parse::<i32>),
        multispace0,
    )(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    char(',')(input)
}

fn open_paren(input: &str) -> IResult<&str, char> {
    preceded(multispace0, char('('))(input)
}

fn rgba_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag("rgba")(input)?;
    let (input, _) = open_paren(input)?;
    let (input, r) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, g) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, b) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, a) = delimited(multispace0, double, multispace0)(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, Color::new(r, g, b, a)))
}

fn rgb_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag("rgb")(input)?;
    let (input, _) = open_paren(input)?;
    let (input, r) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, g) = channel(input)?;
    let (input, _) = comma(input)?;
    let (input, b) = channel(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, Color::rgb(r, g, b)))
}
