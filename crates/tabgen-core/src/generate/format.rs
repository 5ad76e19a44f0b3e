//! # Value Formatting
//!
//! Turns a producer's raw [`Value`] into the text spliced into a template.
//!
//! - Empty format: the value's `Display` rendering.
//! - Value with a [`SelfFormat`](crate::generate::value::SelfFormat)
//!   capability (dates, timestamps, times): the value renders itself, reading
//!   the format as a strftime pattern.
//! - Anything else: the format is a printf-style directive with exactly one
//!   value-consuming verb, e.g. `%05d`, `%.2f`, `%-8s`, `%#x`.
//!
//! Supported verbs: `%v %s %q %d %x %X %o %b %f %F %e %E %t`, plus `%%` for a
//! literal percent sign. Flags: `-` (left align), `+` (always sign), space
//! (space for positive sign), `0` (zero pad numbers), `#` (radix prefix).
//! Verb/value combinations that make no sense (`%d` on a string) are errors.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::generate::value::Value;

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([-+ 0#]*)(\d+)?(?:\.(\d+))?([a-zA-Z%])").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid strftime pattern '{spec}'")]
    InvalidStrftime { spec: String },

    #[error("verb %{verb} cannot format a {kind} value")]
    Mismatch { verb: char, kind: &'static str },

    #[error("unknown format verb %{verb}")]
    UnknownVerb { verb: char },

    #[error("format '{spec}' has more than one verb but only one value is available")]
    MissingOperand { spec: String },

    #[error("format '{spec}' has no verb to place the value in")]
    NoVerb { spec: String },

    #[error("format '{spec}' contains a dangling '%'")]
    Malformed { spec: String },
}

/// Format a produced value according to a generation rule's format field.
pub fn format_value(format: &str, value: &Value) -> Result<String, FormatError> {
    if format.is_empty() {
        return Ok(value.to_string());
    }
    match value.as_self_format() {
        Some(f) => f.format_with(format),
        None => sprintf(format, value),
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
}

impl Flags {
    fn parse(s: &str) -> Self {
        let mut flags = Flags::default();
        for c in s.chars() {
            match c {
                '-' => flags.left = true,
                '+' => flags.plus = true,
                ' ' => flags.space = true,
                '0' => flags.zero = true,
                '#' => flags.alt = true,
                _ => {}
            }
        }
        flags
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }
}

/// Apply a printf-style directive to a single value.
pub fn sprintf(spec: &str, value: &Value) -> Result<String, FormatError> {
    let mut out = String::with_capacity(spec.len() + 16);
    let mut last = 0;
    let mut consumed = false;

    for caps in DIRECTIVE.captures_iter(spec) {
        let Some(whole) = caps.get(0) else { continue };
        push_literal(&mut out, &spec[last..whole.start()], spec)?;
        last = whole.end();

        let verb = caps[4].chars().next().unwrap_or('%');
        if verb == '%' {
            out.push('%');
            continue;
        }
        if consumed {
            return Err(FormatError::MissingOperand {
                spec: spec.to_string(),
            });
        }
        consumed = true;

        let flags = Flags::parse(caps.get(1).map_or("", |m| m.as_str()));
        let width = caps.get(2).and_then(|m| m.as_str().parse::<usize>().ok());
        let precision = caps.get(3).and_then(|m| m.as_str().parse::<usize>().ok());
        out.push_str(&render(verb, value, flags, width, precision)?);
    }
    push_literal(&mut out, &spec[last..], spec)?;

    if !consumed {
        return Err(FormatError::NoVerb {
            spec: spec.to_string(),
        });
    }
    Ok(out)
}

fn push_literal(out: &mut String, literal: &str, spec: &str) -> Result<(), FormatError> {
    if literal.contains('%') {
        return Err(FormatError::Malformed {
            spec: spec.to_string(),
        });
    }
    out.push_str(literal);
    Ok(())
}

fn render(
    verb: char,
    value: &Value,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
) -> Result<String, FormatError> {
    let mismatch = || FormatError::Mismatch {
        verb,
        kind: value.kind(),
    };

    match verb {
        'v' => match value {
            Value::Int(i) => Ok(pad_number(
                flags.sign(*i < 0),
                &i.unsigned_abs().to_string(),
                flags,
                width,
            )),
            Value::Float(f) => {
                let digits = match precision {
                    Some(p) => format!("{:.*}", p, f.abs()),
                    None => f.abs().to_string(),
                };
                Ok(pad_number(
                    flags.sign(f.is_sign_negative() && *f != 0.0),
                    &digits,
                    flags,
                    width,
                ))
            }
            other => Ok(pad_text(other.to_string(), flags, width)),
        },
        's' | 'q' => {
            let text = match value {
                Value::String(s) => s.to_string(),
                Value::Uuid(u) => u.to_string(),
                _ => return Err(mismatch()),
            };
            let text = match precision {
                Some(p) => text.chars().take(p).collect(),
                None => text,
            };
            let text = if verb == 'q' {
                format!("{:?}", text)
            } else {
                text
            };
            Ok(pad_text(text, flags, width))
        }
        't' => match value {
            Value::Bool(b) => Ok(pad_text(b.to_string(), flags, width)),
            _ => Err(mismatch()),
        },
        'd' | 'x' | 'X' | 'o' | 'b' => {
            let i = value.as_int().ok_or_else(mismatch)?;
            let magnitude = i.unsigned_abs();
            let (mut digits, prefix) = match verb {
                'd' => (magnitude.to_string(), ""),
                'x' => (format!("{:x}", magnitude), "0x"),
                'X' => (format!("{:X}", magnitude), "0X"),
                'o' => (format!("{:o}", magnitude), "0"),
                _ => (format!("{:b}", magnitude), "0b"),
            };
            let sign = if flags.alt && verb != 'd' {
                format!("{}{}", flags.sign(i < 0), prefix)
            } else {
                flags.sign(i < 0).to_string()
            };
            // Precision is a minimum digit count; it turns off zero padding.
            let mut flags = flags;
            if let Some(p) = precision {
                if p == 0 && magnitude == 0 {
                    digits.clear();
                } else if digits.len() < p {
                    digits = format!("{}{}", "0".repeat(p - digits.len()), digits);
                }
                flags.zero = false;
            }
            Ok(pad_number(&sign, &digits, flags, width))
        }
        'f' | 'F' => match value {
            Value::Float(f) => {
                let digits = format!("{:.*}", precision.unwrap_or(6), f.abs());
                Ok(pad_number(
                    flags.sign(f.is_sign_negative() && *f != 0.0),
                    &digits,
                    flags,
                    width,
                ))
            }
            _ => Err(mismatch()),
        },
        'e' | 'E' => match value {
            Value::Float(f) => {
                let mut digits = scientific(f.abs(), precision.unwrap_or(6));
                if verb == 'E' {
                    digits = digits.to_uppercase();
                }
                Ok(pad_number(
                    flags.sign(f.is_sign_negative() && *f != 0.0),
                    &digits,
                    flags,
                    width,
                ))
            }
            _ => Err(mismatch()),
        },
        other => Err(FormatError::UnknownVerb { verb: other }),
    }
}

/// `1234.5` with precision 2 → `1.23e+03`: a signed exponent of at least two
/// digits.
fn scientific(f: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, f);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => raw,
    }
}

fn pad_text(text: String, flags: Flags, width: Option<usize>) -> String {
    let Some(width) = width else { return text };
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let fill = " ".repeat(width - len);
    if flags.left {
        text + &fill
    } else {
        fill + &text
    }
}

fn pad_number(sign: &str, digits: &str, flags: Flags, width: Option<usize>) -> String {
    let len = sign.chars().count() + digits.chars().count();
    match width {
        Some(width) if width > len => {
            let fill = width - len;
            if flags.left {
                format!("{}{}{}", sign, digits, " ".repeat(fill))
            } else if flags.zero {
                format!("{}{}{}", sign, "0".repeat(fill), digits)
            } else {
                format!("{}{}{}", " ".repeat(fill), sign, digits)
            }
        }
        _ => format!("{}{}", sign, digits),
    }
}
