//! Floating-point conversion pipeline.
//!
//! Transcribes `streamout.c`'s `get_exponent`/`get_dbl_digits`/
//! `streamout_double` algorithm-for-algorithm (not the abandoned `#if 0
//! format_float` block, which the original source itself treats as dead
//! code): order-of-magnitude and digit extraction via `log10`/`log`/`floor`/
//! `pow`/`round`, never a bignum or shortest-round-trip algorithm. Byte-for-
//! byte fidelity to the legacy renderer is the point, not round-trip
//! minimality.

use crate::spec::{Conv, Flags};

#[cfg(feature = "std")]
fn log10_(x: f64) -> f64 {
    x.log10()
}
#[cfg(not(feature = "std"))]
fn log10_(x: f64) -> f64 {
    libm::log10(x)
}

#[cfg(feature = "std")]
fn ln_(x: f64) -> f64 {
    x.ln()
}
#[cfg(not(feature = "std"))]
fn ln_(x: f64) -> f64 {
    libm::log(x)
}

#[cfg(feature = "std")]
fn floor_(x: f64) -> f64 {
    x.floor()
}
#[cfg(not(feature = "std"))]
fn floor_(x: f64) -> f64 {
    libm::floor(x)
}

#[cfg(feature = "std")]
fn powf_(base: f64, exp: f64) -> f64 {
    base.powf(exp)
}
#[cfg(not(feature = "std"))]
fn powf_(base: f64, exp: f64) -> f64 {
    libm::pow(base, exp)
}

/// `#define round(x) floor((x) + 0.5)` in the original — not Rust's
/// round-half-to-even, and not needed for negative inputs since every call
/// site here operates on an already-nonnegative magnitude.
fn round_half_up(x: f64) -> f64 {
    floor_(x + 0.5)
}

/// `get_exponent`: order-of-magnitude of a nonnegative value in a given
/// base, computed via logarithms rather than bit inspection.
fn get_exponent(abs_val: f64, base: f64) -> i32 {
    if abs_val == 0.0 {
        0
    } else if base == 10.0 {
        floor_(log10_(abs_val)) as i32
    } else {
        floor_(ln_(abs_val) / ln_(base)) as i32
    }
}

/// `get_dbl_digits`: fills `buf[0..num_digits]` with the most-significant
/// `num_digits` base-`base` digits of `abs_val` (as numeric values, not
/// ASCII), returning the exponent — possibly one more than `exponent_in` if
/// rounding carried a digit (e.g. 9.9999999999 rounding up to 10.0...).
fn get_dbl_digits(buf: &mut [u8], num_digits: usize, abs_val: f64, base: u32, exponent_in: i32) -> i32 {
    let basef = base as f64;
    let shift_exp = exponent_in.max(0);
    let shift = num_digits as i32 - shift_exp - 1;

    let mut multiplier = powf_(basef, shift as f64);
    let mut scaled = round_half_up(abs_val * multiplier);
    let mut exponent = exponent_in;

    let new_exp = get_exponent(scaled, basef);
    if new_exp > num_digits as i32 - 1 {
        exponent += 1;
        multiplier = powf_(basef, (shift - 1) as f64);
        scaled = round_half_up(abs_val * multiplier);
    }

    let mut int_val = scaled as u64;
    let mut i = num_digits;
    while i > 0 {
        i -= 1;
        buf[i] = (int_val % base as u64) as u8;
        int_val /= base as u64;
    }

    exponent
}

/// Maximum number of significant digits this pipeline ever materializes.
pub const MAX_DIGITS: usize = 17;

/// The non-finite marker placed where fractional digits would appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// `#INF`
    Inf,
    /// `#QNAN`
    QNan,
    /// `#SNAN`
    SNan,
}

impl Marker {
    /// The marker's ASCII text, sans leading `1.` (the composer supplies
    /// that part, matching the reference laying the marker over the
    /// fraction-digit position only).
    pub fn text(self) -> &'static [u8] {
        match self {
            Marker::Inf => b"#INF",
            Marker::QNan => b"#QNAN",
            Marker::SNan => b"#SNAN",
        }
    }
}

/// The fully decomposed result of rendering a double, ready for the
/// composer to lay out with padding and a decimal point.
pub struct RenderedFloat {
    /// Sign character, if any.
    pub sign: Option<u8>,
    /// Set for non-finite values; `digits`/`num_real_digits` are still
    /// populated (from the forced `1.0` value) but unused when this is set.
    pub marker: Option<Marker>,
    /// Numeric digit values (0..base), most-significant first.
    pub digits: [u8; MAX_DIGITS],
    /// How many entries of `digits` are valid.
    pub num_real_digits: usize,
    /// Conceptual count of digits before the decimal point in non-exponent
    /// form (may exceed `num_real_digits` for very large magnitudes).
    pub digits_before_dot: usize,
    /// Normalized precision (default 6 when unspecified).
    pub precision: usize,
    /// Whether the exponential form was selected.
    pub use_exp: bool,
    /// The (possibly rounding-carry-adjusted) base-`base` exponent.
    pub exponent: i32,
    /// Whether digit/exponent letters render uppercase.
    pub uppercase: bool,
}

/// Render `value` per `conv`/`flags`/`precision` (§4.4 of SPEC_FULL.md).
pub fn render_double(value: f64, conv: Conv, flags: Flags, precision_opt: Option<i32>) -> RenderedFloat {
    let base = conv.base();
    let uppercase = conv.uppercase();

    let bits = value.to_bits();
    let sign_bit = (bits >> 63) & 1 != 0;
    let exp_bits = (bits >> 52) & 0x7FF;
    let frac = bits & 0x000F_FFFF_FFFF_FFFF;

    let (marker, abs_val) = if exp_bits == 0x7FF {
        if frac == 0 {
            (Some(Marker::Inf), 1.0f64)
        } else if frac & (1u64 << 51) != 0 {
            (Some(Marker::QNan), 1.0f64)
        } else {
            (Some(Marker::SNan), 1.0f64)
        }
    } else {
        (None, value.abs())
    };

    let sign = if sign_bit {
        Some(b'-')
    } else if flags.contains(Flags::FORCE_SIGN) {
        Some(b'+')
    } else if flags.contains(Flags::FORCE_SIGN_SPACE) {
        Some(b' ')
    } else {
        None
    };

    let precision = match precision_opt {
        Some(p) if p >= 0 => p as usize,
        _ => 6,
    };

    let basef = base as f64;
    let mut exponent = get_exponent(abs_val, basef);

    let width_sign = usize::from(sign.is_some());
    let width_dot = usize::from(precision > 0);
    let width_exp = 5usize;
    let digits_before_dot_no_exp = core::cmp::max(exponent + 1, 1) as usize;
    let digits_no_exp = digits_before_dot_no_exp + precision;
    let digits_with_exp = 1 + precision;
    let width_no_exp = width_sign + digits_no_exp + width_dot;
    let width_with_exp = width_sign + digits_with_exp + width_dot + width_exp;

    let use_exp = match conv {
        Conv::Fixed | Conv::FixedUpper => false,
        Conv::General | Conv::GeneralUpper => width_with_exp < width_no_exp,
        _ => true,
    };

    let num_digits = if use_exp { digits_with_exp } else { digits_no_exp };
    let max_real_digits = if base == 16 { 14 } else { 17 };
    let num_real_digits = num_digits.min(max_real_digits);

    let mut digits = [0u8; MAX_DIGITS];
    exponent = get_dbl_digits(&mut digits, num_real_digits, abs_val, base, exponent);

    RenderedFloat {
        sign,
        marker,
        digits,
        num_real_digits,
        digits_before_dot: digits_before_dot_no_exp,
        precision,
        use_exp,
        exponent,
        uppercase,
    }
}
