//! Easing and attribute interpolation.

use crate::types::fmt_num;

use super::AttrValue;

/// Cubic ease-in-out over `t ∈ [0, 1]`
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Value of an attribute a fraction `t` of the way from `from` to `to`.
///
/// Numbers interpolate linearly. Strings interpolate the numbers embedded in
/// them (see [`interpolate_string`]), which suits path data and transforms
/// only; the scene never tweens other text. Mixed pairs snap to `to` as soon
/// as the transition starts.
pub fn interpolate(from: &AttrValue, to: &AttrValue, t: f64) -> AttrValue {
    match (from, to) {
        (AttrValue::Number(a), AttrValue::Number(b)) => AttrValue::Number(a + (b - a) * t),
        (AttrValue::Text(a), AttrValue::Text(b)) => AttrValue::Text(interpolate_string(a, b, t)),
        _ => to.clone(),
    }
}

/// A run of a string: literal text or a number
#[derive(Clone, Debug, PartialEq)]
enum Piece<'a> {
    Literal(&'a str),
    Number(f64),
}

/// Interpolate the numbers of `b` from the numbers at the same positions in
/// `a`; `b`'s literal text always wins. Numbers of `b` without a counterpart
/// in `a` appear at their final value. With no numbers at all this is a
/// switch to `b`.
pub fn interpolate_string(a: &str, b: &str, t: f64) -> String {
    if t >= 1.0 {
        return b.to_string();
    }

    let start: Vec<f64> = pieces(a)
        .into_iter()
        .filter_map(|piece| match piece {
            Piece::Number(n) => Some(n),
            Piece::Literal(_) => None,
        })
        .collect();

    let mut out = String::with_capacity(b.len());
    let mut index = 0;
    for piece in pieces(b) {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Number(end) => {
                let value = match start.get(index) {
                    Some(&begin) => begin + (end - begin) * t,
                    None => end,
                };
                out.push_str(&fmt_num(value));
                index += 1;
            }
        }
    }
    out
}

/// Split a string into literals and numbers. Numbers follow the SVG grammar:
/// optional sign, digits with an optional fraction, optional exponent.
fn pieces(s: &str) -> Vec<Piece<'_>> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match number_len(&bytes[i..]) {
            Some(len) => {
                if literal_start < i {
                    out.push(Piece::Literal(&s[literal_start..i]));
                }
                // The scanner only accepts ASCII number syntax, so parsing cannot fail
                // on well-formed input; fall back to a literal rather than panicking.
                match s[i..i + len].parse::<f64>() {
                    Ok(value) => out.push(Piece::Number(value)),
                    Err(_) => out.push(Piece::Literal(&s[i..i + len])),
                }
                i += len;
                literal_start = i;
            }
            None => i += 1,
        }
    }
    if literal_start < bytes.len() {
        out.push(Piece::Literal(&s[literal_start..]));
    }
    out
}

/// Length of the number starting at the front of `bytes`, if any
fn number_len(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    Some(i)
}
