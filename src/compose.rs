//! Padding/prefix/precision composition layer.
//!
//! Grounded on `streamout.c`'s post-`switch` padding math: `padding =
//! fieldwidth - len - prefixlen - precision` (clamped to nonnegative),
//! folding leftover `padding` into the zero-fill count when not
//! left-aligned so a single zero-fill loop covers ordinary zero-padding and
//! field-width zero-padding together; and on its `streamout_double`
//! rendering order (§4.4.4 of SPEC_FULL.md) for the float path.

use crate::code_unit::CodeUnit;
use crate::digits::digit_char;
use crate::error::Result;
use crate::float::RenderedFloat;
use crate::integer::RenderedInt;
use crate::sink::Sink;
use crate::spec::Flags;

/// Write `count` code units equal to `unit`.
fn pad<U: CodeUnit, S: Sink<U>>(sink: &mut S, unit: U, count: usize) -> Result<usize> {
    for _ in 0..count {
        sink.put(unit)?;
    }
    Ok(count)
}

fn put_ascii<U: CodeUnit, S: Sink<U>>(sink: &mut S, bytes: &[u8]) -> Result<usize> {
    for &b in bytes {
        sink.put(U::from_narrow(b))?;
    }
    Ok(bytes.len())
}

/// Compose and write a rendered integer, returning the number of code units
/// written.
pub fn compose_integer<U: CodeUnit, S: Sink<U>>(
    sink: &mut S,
    rendered: &RenderedInt,
    flags: Flags,
    width: u32,
) -> Result<usize> {
    let sign_len = usize::from(rendered.sign.is_some());
    let prefix_len = rendered.prefix.len();
    let digits = rendered.digits();
    let body_len = sign_len + prefix_len + digits.len();
    let width = width as usize;
    let mut written = 0usize;

    let left_align = flags.contains(Flags::LEFT_ALIGN);
    let pad_zero = flags.contains(Flags::PAD_ZERO) && !left_align;

    if !left_align && !pad_zero && width > body_len {
        written += pad(sink, U::SPACE, width - body_len)?;
    }
    if let Some(s) = rendered.sign {
        written += put_ascii(sink, &[s])?;
    }
    if prefix_len > 0 {
        written += put_ascii(sink, rendered.prefix)?;
    }
    if pad_zero && width > body_len {
        written += pad(sink, U::ZERO, width - body_len)?;
    }
    written += put_ascii(sink, digits)?;
    if left_align && width > body_len {
        written += pad(sink, U::SPACE, width - body_len)?;
    }
    Ok(written)
}

/// Compose and write a rendered float, returning the number of code units
/// written.
pub fn compose_float<U: CodeUnit, S: Sink<U>>(
    sink: &mut S,
    r: &RenderedFloat,
    flags: Flags,
    width: u32,
) -> Result<usize> {
    let sign_len = usize::from(r.sign.is_some());
    let dot_len = usize::from(r.precision > 0);
    let exp_len = if r.use_exp { 5 } else { 0 }; // e/E + sign + 3 digits
    let int_len = if r.use_exp { 1 } else { r.digits_before_dot };
    let body_len = sign_len + int_len + dot_len + r.precision + exp_len;

    let width = width as usize;
    let left_align = flags.contains(Flags::LEFT_ALIGN);
    let pad_zero = flags.contains(Flags::PAD_ZERO) && !left_align;
    let mut written = 0usize;

    if !left_align && !pad_zero && width > body_len {
        written += pad(sink, U::SPACE, width - body_len)?;
    }
    if let Some(s) = r.sign {
        written += put_ascii(sink, &[s])?;
    }
    if pad_zero && width > body_len {
        written += pad(sink, U::ZERO, width - body_len)?;
    }

    if r.use_exp {
        written += put_ascii(sink, &[digit_char(r.digits[0] as u32, r.uppercase)])?;
    } else {
        let real_before_dot = r.digits_before_dot.min(r.num_real_digits);
        for &d in &r.digits[..real_before_dot] {
            written += put_ascii(sink, &[digit_char(d as u32, r.uppercase)])?;
        }
        if r.digits_before_dot > real_before_dot {
            written += pad(sink, U::ZERO, r.digits_before_dot - real_before_dot)?;
        }
    }

    if r.precision > 0 {
        written += put_ascii(sink, b".")?;
        if let Some(marker) = r.marker {
            let text = marker.text();
            let n = text.len().min(r.precision);
            written += put_ascii(sink, &text[..n])?;
            if r.precision > n {
                written += pad(sink, U::ZERO, r.precision - n)?;
            }
        } else {
            let frac_start = if r.use_exp { 1 } else { r.digits_before_dot.min(r.num_real_digits) };
            let frac_digits = if frac_start < r.num_real_digits {
                &r.digits[frac_start..r.num_real_digits]
            } else {
                &[][..]
            };
            let n = frac_digits.len().min(r.precision);
            for &d in &frac_digits[..n] {
                written += put_ascii(sink, &[digit_char(d as u32, r.uppercase)])?;
            }
            if r.precision > n {
                written += pad(sink, U::ZERO, r.precision - n)?;
            }
        }
    }

    if r.use_exp {
        let e_char = digit_char(0xe, r.uppercase);
        written += put_ascii(sink, &[e_char])?;
        written += put_ascii(sink, &[if r.exponent < 0 { b'-' } else { b'+' }])?;
        let mag = r.exponent.unsigned_abs();
        let digits = [
            b'0' + (mag / 100 % 10) as u8,
            b'0' + (mag / 10 % 10) as u8,
            b'0' + (mag % 10) as u8,
        ];
        written += put_ascii(sink, &digits)?;
    }

    if left_align && width > body_len {
        written += pad(sink, U::SPACE, width - body_len)?;
    }

    Ok(written)
}

/// Compose and write a string conversion: up to `precision` code units of
/// `src` (or `"(null)"` if `src` is `None`), padded to `width`.
pub fn compose_narrow_str<U: CodeUnit, S: Sink<U>>(
    sink: &mut S,
    src: Option<&[u8]>,
    precision: Option<i32>,
    flags: Flags,
    width: u32,
) -> Result<usize> {
    const NULL_TEXT: &[u8] = b"(null)";
    let body: &[u8] = match src {
        Some(s) => {
            let n = match precision {
                Some(p) if p >= 0 => (p as usize).min(s.len()),
                _ => s.len(),
            };
            &s[..n]
        }
        None => NULL_TEXT,
    };
    let width = width as usize;
    let left_align = flags.contains(Flags::LEFT_ALIGN);
    let mut written = 0usize;

    if !left_align && width > body.len() {
        written += pad(sink, U::SPACE, width - body.len())?;
    }
    written += put_ascii(sink, body)?;
    if left_align && width > body.len() {
        written += pad(sink, U::SPACE, width - body.len())?;
    }
    Ok(written)
}

/// Compose and write a single character conversion, padded to `width`.
pub fn compose_char<U: CodeUnit, S: Sink<U>>(
    sink: &mut S,
    unit: U,
    flags: Flags,
    width: u32,
) -> Result<usize> {
    let width = width as usize;
    let left_align = flags.contains(Flags::LEFT_ALIGN);
    let mut written = 0usize;
    if !left_align && width > 1 {
        written += pad(sink, U::SPACE, width - 1)?;
    }
    sink.put(unit)?;
    written += 1;
    if left_align && width > 1 {
        written += pad(sink, U::SPACE, width - 1)?;
    }
    Ok(written)
}
