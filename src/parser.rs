//! Format-string parser and dispatcher — the `NORMAL → PERCENT → FLAGS →
//! WIDTH → DOT → PRECISION → LENGTH → CONV` state machine.
//!
//! Grounded on `streamout.c`'s main `streamout()` loop (the flag/width/
//! precision/length parsing loops and the `switch (chr)` dispatch,
//! including the `default: format--; continue;` backup rule for unknown
//! conversion letters) and on `print_engine.rs`'s byte-loop structure
//! (`_format`/`write_display`) for how a runtime parser in this corpus
//! walks a format string and writes through a sink.

use crate::args::{Arg, ArgCursor};
use crate::code_unit::CodeUnit;
use crate::compose::{compose_char, compose_float, compose_integer, compose_narrow_str};
use crate::error::Result;
use crate::float::render_double;
use crate::integer::format_integer;
use crate::sink::Sink;
use crate::spec::{Conv, ConversionSpec, Flags, Length};

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn conv_from_letter(c: u8) -> Option<Conv> {
    Some(match c {
        b'd' | b'i' => Conv::Decimal,
        b'o' => Conv::Octal,
        b'u' => Conv::Unsigned,
        b'x' => Conv::Hex,
        b'X' => Conv::HexUpper,
        b'p' => Conv::Pointer,
        b'c' | b'C' => Conv::Char,
        b's' | b'S' => Conv::Str,
        b'Z' => Conv::CountedStr,
        b'n' => Conv::Count,
        b'f' => Conv::Fixed,
        b'F' => Conv::FixedUpper,
        b'e' => Conv::Exp,
        b'E' => Conv::ExpUpper,
        b'g' => Conv::General,
        b'G' => Conv::GeneralUpper,
        b'a' => Conv::HexFloat,
        b'A' => Conv::HexFloatUpper,
        _ => return None,
    })
}

/// Render `fmt` against `args`, writing through `sink`. Returns the number
/// of code units written on success.
///
/// `fmt` and `sink` share the same [`CodeUnit`] width `U`; narrow (`u8`) and
/// wide (`u16`) engines are both instantiations of this one generic
/// function (SPEC_FULL.md §9, Design Note 2).
pub fn format<U: CodeUnit, S: Sink<U>>(fmt: &[U], args: &mut [Arg], sink: &mut S) -> Result<i32> {
    let mut cursor = ArgCursor::new(args);
    let len = fmt.len();
    let mut i = 0usize;
    let mut written: i64 = 0;

    macro_rules! peek {
        ($pos:expr) => {
            fmt.get($pos).map(|u| u.to_narrow_lossy())
        };
    }

    while i < len {
        let c = peek!(i).unwrap();
        if c != b'%' {
            sink.put(fmt[i])?;
            written += 1;
            i += 1;
            continue;
        }

        // PERCENT state.
        if i + 1 >= len {
            // Bare '%' at end of string: no output, run ends.
            break;
        }
        let mut j = i + 1;
        if peek!(j) == Some(b'%') {
            sink.put(U::from_narrow(b'%'))?;
            written += 1;
            i = j + 1;
            continue;
        }

        // FLAGS
        let mut flags = Flags::empty();
        loop {
            match peek!(j) {
                Some(b'-') => flags.insert(Flags::LEFT_ALIGN),
                Some(b'+') => flags.insert(Flags::FORCE_SIGN),
                Some(b' ') => flags.insert(Flags::FORCE_SIGN_SPACE),
                Some(b'0') => flags.insert(Flags::PAD_ZERO),
                Some(b'#') => flags.insert(Flags::ALTERNATE),
                _ => break,
            }
            j += 1;
        }

        // WIDTH
        let mut width: u32 = 0;
        match peek!(j) {
            Some(b'*') => {
                j += 1;
                let (mag, neg) = cursor.next_int();
                if neg {
                    flags.insert(Flags::LEFT_ALIGN);
                }
                width = mag as u32;
            }
            Some(c) if is_digit(c) => {
                let mut w: u32 = 0;
                while let Some(c2) = peek!(j) {
                    if !is_digit(c2) {
                        break;
                    }
                    w = w * 10 + (c2 - b'0') as u32;
                    j += 1;
                }
                width = w;
            }
            _ => {}
        }

        // DOT / PRECISION
        let mut precision: Option<i32> = None;
        if peek!(j) == Some(b'.') {
            j += 1;
            match peek!(j) {
                Some(b'*') => {
                    j += 1;
                    let (mag, neg) = cursor.next_int();
                    precision = if neg { None } else { Some(mag as i32) };
                }
                Some(c) if is_digit(c) => {
                    let mut p: i32 = 0;
                    while let Some(c2) = peek!(j) {
                        if !is_digit(c2) {
                            break;
                        }
                        p = p * 10 + (c2 - b'0') as i32;
                        j += 1;
                    }
                    precision = Some(p);
                }
                _ => precision = Some(0),
            }
        }

        // LENGTH
        let mut length = Length::Default;
        match peek!(j) {
            Some(b'h') => {
                j += 1;
                length = Length::Short;
            }
            Some(b'l') => {
                j += 1;
                if peek!(j) == Some(b'l') {
                    j += 1;
                    length = Length::Int64;
                } else {
                    length = Length::Long;
                }
            }
            Some(b'L') => {
                j += 1;
                length = Length::LongDouble;
            }
            Some(b'w') => {
                j += 1;
                length = Length::WideChar;
            }
            Some(b'z') => {
                if let Some(next) = peek!(j + 1) {
                    if b"udxXion".contains(&next) {
                        j += 1;
                        length = Length::IntPtr;
                    }
                }
            }
            Some(b'I') => {
                if peek!(j + 1) == Some(b'6') && peek!(j + 2) == Some(b'4') {
                    j += 3;
                    length = Length::Int64;
                } else if peek!(j + 1) == Some(b'3') && peek!(j + 2) == Some(b'2') {
                    j += 3;
                    length = Length::Default;
                } else {
                    j += 1;
                    length = Length::IntPtr;
                }
            }
            _ => {}
        }

        // CONV
        let conv_letter = match peek!(j) {
            Some(c) => c,
            None => break,
        };
        let conv = match conv_from_letter(conv_letter) {
            Some(conv) => conv,
            None => {
                log::trace!("streamout: unknown conversion letter '{}', treating as literal", conv_letter as char);
                i = j;
                continue;
            }
        };
        j += 1;

        match conv {
            Conv::Pointer => {
                precision = Some(2 * core::mem::size_of::<usize>() as i32);
                flags.remove(Flags::PAD_ZERO);
                length = Length::IntPtr;
            }
            Conv::Octal if flags.contains(Flags::ALTERNATE) => {
                if let Some(p) = precision {
                    if p > 0 {
                        precision = Some(p - 1);
                    }
                }
            }
            _ => {}
        }

        let spec = ConversionSpec {
            flags,
            width,
            precision,
            length,
            conv,
        };

        match conv {
            Conv::Count => {
                cursor.store_count(written);
            }
            Conv::Char => {
                let c = cursor.next_char();
                let unit = if length == Length::WideChar {
                    U::from_wide_lossy(c)
                } else {
                    U::from_narrow(c as u8)
                };
                written += compose_char(sink, unit, flags, width)? as i64;
            }
            Conv::Str => {
                if length == Length::WideChar {
                    let s = cursor.next_wide_str();
                    // Narrow engines cannot natively emit wide source text;
                    // lossily narrow each unit, matching `to_narrow_lossy`'s
                    // documented contract for cross-width composition.
                    let narrowed: Option<alloc_free_buf::NarrowedWide> = s.map(alloc_free_buf::NarrowedWide::new);
                    let bytes = narrowed.as_ref().map(|n| n.as_slice());
                    written += compose_narrow_str(sink, bytes, precision, flags, width)? as i64;
                } else {
                    let s = cursor.next_narrow_str();
                    written += compose_narrow_str(sink, s, precision, flags, width)? as i64;
                }
            }
            Conv::CountedStr => {
                let s = cursor.next_counted_str();
                written += compose_narrow_str(sink, s, precision, flags, width)? as i64;
            }
            _ if conv.is_float() => {
                let value = cursor.next_double();
                let rendered = render_double(value, conv, flags, precision);
                written += compose_float(sink, &rendered, flags, width)? as i64;
            }
            _ => {
                // Integer family: Decimal, Octal, Unsigned, Hex, HexUpper,
                // Pointer.
                let (magnitude, negative) = cursor.next_int();
                let rendered = format_integer(magnitude, negative, &spec);
                written += compose_integer(sink, &rendered, flags, width)? as i64;
            }
        }

        i = j;
    }

    Ok(written as i32)
}

/// A small fixed-capacity helper used only to narrow a wide string slice
/// into bytes for [`compose_narrow_str`] without requiring `alloc`. Caps at
/// 256 code units; longer wide strings printed through a narrow engine are
/// truncated (a corner case outside SPEC_FULL.md's core conformance table).
mod alloc_free_buf {
    pub struct NarrowedWide {
        buf: [u8; 256],
        len: usize,
    }

    impl NarrowedWide {
        pub fn new(src: &[u16]) -> Self {
            let mut buf = [0u8; 256];
            let len = src.len().min(256);
            for (i, &w) in src.iter().take(len).enumerate() {
                buf[i] = w as u8;
            }
            Self { buf, len }
        }

        pub fn as_slice(&self) -> &[u8] {
            &self.buf[..self.len]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CountedBuffer;
    use pretty_assertions::assert_eq;

    fn run(fmt: &str, args: &mut [Arg]) -> String {
        let fmt_units: Vec<u8> = fmt.bytes().collect();
        let mut buf = vec![0u8; 256];
        let mut sink = CountedBuffer::new(&mut buf);
        format(&fmt_units, args, &mut sink).unwrap();
        String::from_utf8(sink.as_slice().to_vec()).unwrap()
    }

    #[test]
    fn literal_text_passes_through() {
        assert_eq!(run("abcde", &mut []), "abcde");
    }

    #[test]
    fn percent_percent_emits_one_percent() {
        assert_eq!(run("%%", &mut []), "%");
    }

    #[test]
    fn bare_percent_produces_nothing() {
        assert_eq!(run("%", &mut []), "");
    }

    #[test]
    fn percent_percent_percent_emits_one_percent() {
        assert_eq!(run("%%%", &mut []), "%");
    }

    #[test]
    fn decimal_conversion() {
        assert_eq!(run("%d", &mut [Arg::signed(8)]), "8");
    }

    #[test]
    fn unknown_letter_backs_up_and_is_literal() {
        assert_eq!(run("%q", &mut []), "q");
    }

    #[test]
    fn width_and_precision_star_args() {
        assert_eq!(
            run("%*.*s", &mut [Arg::signed(-8), Arg::signed(6), "hello!".into()]),
            "hello!  "
        );
    }

    #[test]
    fn string_width_padding() {
        assert_eq!(run("%8s", &mut ["hello".into()]), "   hello");
        assert_eq!(run("%-8s", &mut ["hello".into()]), "hello   ");
        assert_eq!(run("%.4s", &mut ["hello".into()]), "hell");
    }

    #[test]
    fn float_basic() {
        assert_eq!(run("%f", &mut [Arg::Double(0.0)]), "0.000000");
        assert_eq!(run("%f", &mut [Arg::Double(-123.45678)]), "-123.456780");
        assert_eq!(run("%.3f", &mut [Arg::Double(1.23456789)]), "1.235");
        assert_eq!(run("%010f", &mut [Arg::Double(-1.0)]), "-01.000000");
        assert_eq!(run("%.0f", &mut [Arg::Double(0.6)]), "1");
    }

    #[test]
    fn non_finite_markers() {
        assert_eq!(run("%f", &mut [Arg::Double(f64::from_bits(0x7FF0000000000000))]), "1.#INF00");
        assert_eq!(run("%f", &mut [Arg::Double(f64::from_bits(0xFFF0000000000000))]), "-1.#INF00");
        assert_eq!(run("%f", &mut [Arg::Double(f64::from_bits(0x7FF0000000000001))]), "1.#SNAN0");
        assert_eq!(run("%f", &mut [Arg::Double(f64::from_bits(0x7FF8000000000001))]), "1.#QNAN0");
        assert_eq!(
            run("%.10f", &mut [Arg::Double(f64::INFINITY)]),
            "1.#INF000000"
        );
    }

    #[test]
    fn exponential_forms() {
        assert_eq!(run("%.0e", &mut [Arg::Double(1.23456789)]), "1e+000");
        assert_eq!(run("%.11e", &mut [Arg::Double(1.23456789)]), "1.23456789000e+000");
        assert_eq!(run("%015e", &mut [Arg::Double(1.0)]), "001.000000e+000");
    }

    #[test]
    fn left_plus_precision_exp_upper() {
        assert_eq!(run("%-+.3E", &mut [Arg::Double(999999999999.9)]), "+1.000E+012");
    }

    #[test]
    fn general_form() {
        // 9 integer digits plus a 2-digit fraction (12 columns) loses to the
        // 3-digit-mantissa exponential form (9 columns), so %G renders
        // exponential here.
        assert_eq!(run("%.2G", &mut [Arg::Double(123456789.0)]), "1.23E+008");
    }

    #[test]
    fn general_form_stays_plain_when_narrower() {
        assert_eq!(run("%.2G", &mut [Arg::Double(1.5)]), "1.50");
    }

    // SPEC_FULL.md's conformance table also lists `%.7G` of
    // `9.9999999747524270788e-007` -> `"1E-006"`: whether this value's
    // `floor(log10(x))` lands on -6 or -7 depends on libm-rounding right at
    // a power-of-ten boundary (DESIGN.md, "Open questions resolved"), so it
    // is deliberately not pinned down here as a hardcoded assertion.

    #[test]
    fn sprintf_c_string_supplemental_vectors() {
        assert_eq!(run("%4s", &mut ["hello".into()]), "hello");
        assert_eq!(run("%-5s", &mut ["hello".into()]), "hello");
        assert_eq!(run("%0s", &mut ["hello".into()]), "hello");
        assert_eq!(run("%.10s", &mut ["hello".into()]), "hello");
        assert_eq!(run("%8.5s", &mut ["hello!".into()]), "   hello");
    }

    #[test]
    fn null_string_renders_null_text() {
        assert_eq!(run("%s", &mut [Arg::NarrowStr(None)]), "(null)");
    }

    #[test]
    fn count_conversion_stores_and_emits_nothing() {
        let mut count: i32 = 0;
        assert_eq!(
            run("abc%ndef", &mut [Arg::Count(crate::args::CountTarget::Int(&mut count))]),
            "abcdef"
        );
        assert_eq!(count, 3);
    }

    #[test]
    fn hex_alternate_and_octal_alternate() {
        assert_eq!(run("%#x", &mut [Arg::unsigned(255)]), "0xff");
        assert_eq!(run("%#o", &mut [Arg::unsigned(8)]), "010");
    }

    #[test]
    fn octal_alternate_form_with_precision_still_gets_prefix() {
        // The "0" prefix and precision zero-fill are independent: the
        // decremented precision (4 -> 3) supplies one zero ("010"), and the
        // alternate-form prefix adds its own on top ("0010"), not "010".
        assert_eq!(run("%#.4o", &mut [Arg::unsigned(8)]), "0010");
    }

    #[test]
    fn octal_alternate_form_of_zero_does_not_panic() {
        assert_eq!(run("%#o", &mut [Arg::unsigned(0)]), "00");
    }

    #[test]
    fn pointer_renders_uppercase_hex() {
        // Precision is fixed at 2 hex digits per byte of `usize`, so the
        // zero-padded width tracks the target's pointer size.
        let digits = 2 * core::mem::size_of::<usize>();
        let expected = format!("{:0>width$}", "ABC", width = digits);
        assert_eq!(run("%p", &mut [Arg::unsigned(0xabc)]), expected);
    }

    #[test]
    fn star_width_precision_with_extra_precision_guard() {
        assert_eq!(
            run("%-*.6s", &mut [Arg::signed(-8), "hello!".into()]),
            "hello!  "
        );
    }

    #[test]
    fn zero_precision_string_is_empty() {
        assert_eq!(run("%.s", &mut ["hello".into()]), "");
        assert_eq!(run("%.0s", &mut ["hello".into()]), "");
    }

    #[test]
    fn float_width_smaller_than_natural_is_noop() {
        assert_eq!(run("%f", &mut [Arg::Double(1.0)]), "1.000000");
        assert_eq!(run("%4f", &mut [Arg::Double(1.0)]), "1.000000");
        assert_eq!(run("%8f", &mut [Arg::Double(1.0)]), "1.000000");
        assert_eq!(run("%0f", &mut [Arg::Double(1.0)]), "1.000000");
    }

    #[test]
    fn float_width_wider_than_natural_pads() {
        assert_eq!(run("%9f", &mut [Arg::Double(1.0)]), " 1.000000");
        assert_eq!(run("%10f", &mut [Arg::Double(-1.0)]), " -1.000000");
    }

    #[test]
    fn exp_space_flag_and_zero_padding() {
        assert_eq!(run("%e", &mut [Arg::Double(1.0)]), "1.000000e+000");
        assert_eq!(run("% 13e", &mut [Arg::Double(1.0)]), " 1.000000e+000");
        assert_eq!(run("% 15e", &mut [Arg::Double(1.0)]), "  1.000000e+000");
        assert_eq!(run("%013e", &mut [Arg::Double(1.0)]), "1.000000e+000");
        assert_eq!(run("%014e", &mut [Arg::Double(1.0)]), "01.000000e+000");
    }

    #[test]
    fn exp_non_finite_forms() {
        let inf = f64::from_bits(0x7FF0000000000000);
        assert_eq!(run("%e", &mut [Arg::Double(inf)]), "1.#INF00e+000");
        assert_eq!(run("%14e", &mut [Arg::Double(inf)]), " 1.#INF00e+000");
        assert_eq!(run("%.10e", &mut [Arg::Double(inf)]), "1.#INF000000e+000");
        assert_eq!(run("%.0e", &mut [Arg::Double(inf)]), "1e+000");
    }

    #[test]
    fn extreme_magnitude_fixed_point() {
        // f32::MAX widened to f64, rendered through %f: only the first 17
        // significant digits are real, the rest of the 39-digit integer
        // part is zero-fill out to the exponent's magnitude.
        assert_eq!(
            run("%f", &mut [Arg::Double(f32::MAX as f64)]),
            "340282346638528860000000000000000000000.000000"
        );
        // f64::MAX: same shape, a 309-digit integer part.
        let mut expected = String::from("17976931348623157");
        expected.push_str(&"0".repeat(309 - 17));
        expected.push_str(".000000");
        assert_eq!(run("%f", &mut [Arg::Double(f64::MAX)]), expected);

        assert_eq!(
            run("%f", &mut [Arg::Double(-9.2559631349317830737e+061)]),
            "-92559631349317831000000000000000000000000000000000000000000000.000000"
        );
    }
}
