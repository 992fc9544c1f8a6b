//! Integer conversion pipeline: renders a 64-bit magnitude to a digit
//! buffer, applies precision-driven minimum digit count, and selects the
//! sign/prefix the composer places around it.
//!
//! Grounded on `streamout.c`'s `case_number`/`case_unsigned` digit-gather
//! loop (repeated `%`/`/=` into a reverse buffer while decrementing
//! `precision` per digit) and `examples/other_examples/...NostalgiaOS...
//! user-format.rs.rs`'s `format_unsigned` for the prefix/zero-fill ordering.

use crate::digits::digit_char;
use crate::spec::{Conv, ConversionSpec, Flags};

/// Large enough for a 64-bit magnitude in base 8 (22 digits) plus generous
/// room for an explicit precision larger than the natural digit count.
const DIGIT_BUF_SIZE: usize = 64;

/// The rendered body of an integer conversion: an optional sign character,
/// an optional alternate-form prefix, and the digit string itself.
pub struct RenderedInt {
    buf: [u8; DIGIT_BUF_SIZE],
    start: usize,
    /// Sign character to place before the prefix, if any.
    pub sign: Option<u8>,
    /// Alternate-form prefix (`"0"`, `"0x"`, `"0X"`), empty if none applies.
    pub prefix: &'static [u8],
}

impl RenderedInt {
    /// The rendered digit string (empty for a zero value with precision 0).
    pub fn digits(&self) -> &[u8] {
        &self.buf[self.start..]
    }
}

fn sign_char(negative: bool, flags: Flags) -> Option<u8> {
    if negative {
        Some(b'-')
    } else if flags.contains(Flags::FORCE_SIGN) {
        Some(b'+')
    } else if flags.contains(Flags::FORCE_SIGN_SPACE) {
        Some(b' ')
    } else {
        None
    }
}

/// Render `magnitude` per `spec`. `negative` is ignored for unsigned
/// conversions (`Conv::Octal`, `Conv::Unsigned`, `Conv::Hex`,
/// `Conv::HexUpper`, `Conv::Pointer`).
pub fn format_integer(magnitude: u64, negative: bool, spec: &ConversionSpec) -> RenderedInt {
    let base = spec.conv.base() as u64;
    let uppercase = spec.conv.uppercase();

    let is_signed = matches!(spec.conv, Conv::Decimal);
    let sign = if is_signed {
        sign_char(negative, spec.flags)
    } else {
        None
    };

    // Precision < 0 behaves as "unspecified", which still guarantees at
    // least one digit (so a zero value renders "0", not an empty string);
    // an explicit precision of 0 is the only way to get no digits at all.
    let min_digits = match spec.precision {
        Some(p) if p >= 0 => p as usize,
        _ => 1,
    };

    let mut buf = [0u8; DIGIT_BUF_SIZE];
    let mut i = DIGIT_BUF_SIZE;
    let mut val = magnitude;

    if val == 0 {
        if min_digits == 0 {
            // no digits at all
        } else {
            i -= 1;
            buf[i] = b'0';
        }
    } else {
        while val > 0 {
            i -= 1;
            let digit = (val % base) as u32;
            buf[i] = digit_char(digit, uppercase);
            val /= base;
        }
    }

    let natural_len = DIGIT_BUF_SIZE - i;
    if min_digits > natural_len {
        let extra = min_digits - natural_len;
        for _ in 0..extra {
            i -= 1;
            buf[i] = b'0';
        }
    }

    let mut prefix: &'static [u8] = b"";
    if spec.flags.contains(Flags::ALTERNATE) {
        match spec.conv {
            // Unconditional, matching `streamout.c`'s `case 'o':` (`prefix =
            // "0"`); the parser is the one that decrements precision by one
            // beforehand so the leading zero counts toward it, not this
            // function deduplicating against the digit buffer.
            Conv::Octal => {
                prefix = b"0";
            }
            Conv::Hex if magnitude != 0 => {
                prefix = if uppercase { b"0X" } else { b"0x" };
            }
            Conv::HexUpper if magnitude != 0 => {
                prefix = b"0X";
            }
            _ => {}
        }
    }

    RenderedInt {
        buf,
        start: i,
        sign,
        prefix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Length;

    fn spec(conv: Conv, flags: Flags, precision: Option<i32>) -> ConversionSpec {
        ConversionSpec {
            flags,
            width: 0,
            precision,
            length: Length::Default,
            conv,
        }
    }

    #[test]
    fn plain_decimal() {
        let r = format_integer(8, false, &spec(Conv::Decimal, Flags::empty(), None));
        assert_eq!(r.digits(), b"8");
        assert_eq!(r.sign, None);
    }

    #[test]
    fn negative_decimal_sign() {
        let r = format_integer(123, true, &spec(Conv::Decimal, Flags::empty(), None));
        assert_eq!(r.digits(), b"123");
        assert_eq!(r.sign, Some(b'-'));
    }

    #[test]
    fn zero_with_zero_precision_is_empty() {
        let r = format_integer(0, false, &spec(Conv::Decimal, Flags::empty(), Some(0)));
        assert_eq!(r.digits(), b"");
    }

    #[test]
    fn precision_pads_with_leading_zeros() {
        let r = format_integer(8, false, &spec(Conv::Decimal, Flags::empty(), Some(4)));
        assert_eq!(r.digits(), b"0008");
    }

    #[test]
    fn hex_alternate_form_prefix() {
        let r = format_integer(255, false, &spec(Conv::Hex, Flags::ALTERNATE, None));
        assert_eq!(r.prefix, b"0x");
        assert_eq!(r.digits(), b"ff");
    }

    #[test]
    fn hex_alternate_form_zero_has_no_prefix() {
        let r = format_integer(0, false, &spec(Conv::Hex, Flags::ALTERNATE, None));
        assert_eq!(r.prefix, b"");
    }

    #[test]
    fn octal_alternate_form_adds_prefix() {
        let r = format_integer(8, false, &spec(Conv::Octal, Flags::ALTERNATE, None));
        assert_eq!(r.digits(), b"10");
        assert_eq!(r.prefix, b"0");
    }

    #[test]
    fn octal_alternate_form_prefix_is_unconditional_with_precision_fill() {
        // `%#.4o` of 8: the parser pre-decrements the requested precision
        // (4 -> 3) before calling here, so precision-zero-fill already
        // supplies one leading '0' ("010"); the alternate-form prefix still
        // adds its own '0' on top, for "0" + "010" = "0010".
        let r = format_integer(8, false, &spec(Conv::Octal, Flags::ALTERNATE, Some(3)));
        assert_eq!(r.digits(), b"010");
        assert_eq!(r.prefix, b"0");
    }

    #[test]
    fn octal_alternate_form_zero_value_still_gets_prefix() {
        let r = format_integer(0, false, &spec(Conv::Octal, Flags::ALTERNATE, None));
        assert_eq!(r.digits(), b"0");
        assert_eq!(r.prefix, b"0");
    }

    #[test]
    fn unspecified_precision_zero_value_renders_single_zero() {
        let r = format_integer(0, false, &spec(Conv::Decimal, Flags::empty(), None));
        assert_eq!(r.digits(), b"0");
    }
}
