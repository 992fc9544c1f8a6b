//! The conversion-specification data model assembled by the parser and
//! consumed by the formatters.
//!
//! `Flags`/`Length`/`Conv` mirror the shape of `pw_format`'s `Flag`/`Length`/
//! `Specifier` enums (see `examples/google-pigweed/pw_format/rust/pw_format/
//! lib.rs`), adapted from a compile-time AST's vocabulary to a runtime
//! engine's: `Flags` is a `bitflags!` bitset instead of a `HashSet<Flag>`
//! (no `alloc` needed), and `Conv` folds flavor-of-specifier and
//! case-of-letter together since the renderer dispatches on both at once.

use bitflags::bitflags;

bitflags! {
    /// The `-+ #0` flag set of a conversion specification.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Flags: u8 {
        /// `-`: left-justify within the field width.
        const LEFT_ALIGN = 0b0000_0001;
        /// `+`: force a sign on signed conversions.
        const FORCE_SIGN = 0b0000_0010;
        /// ` `: force a space where a `+` sign would otherwise be omitted.
        const FORCE_SIGN_SPACE = 0b0000_0100;
        /// `0`: zero-pad instead of space-pad.
        const PAD_ZERO = 0b0000_1000;
        /// `#`: alternate form (`0x`/`0X`/`0` prefixes).
        const ALTERNATE = 0b0001_0000;
    }
}

/// The length modifier selecting argument width (`h`, `l`, `ll`, `L`, `w`,
/// `z`, `I`, `I32`, `I64`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Length {
    /// No length modifier.
    Default,
    /// `h`: short (16-bit).
    Short,
    /// `l`: long.
    Long,
    /// `ll`, `I64`: 64-bit.
    Int64,
    /// `Iz` on the target's pointer width, `I` with no suffix on 32-bit
    /// hosts, `I64` on 64-bit hosts.
    IntPtr,
    /// `w`: wide character/string argument.
    WideChar,
    /// `L`: long double (treated identically to `Default` for rendering —
    /// the reference has no true long-double support either).
    LongDouble,
}

impl Default for Length {
    fn default() -> Self {
        Length::Default
    }
}

/// The conversion letter, folding case/flavor together since rendering
/// dispatches on the full combination (e.g. `x` vs `X` select digit case,
/// `e` vs `E` select the exponent letter's case).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conv {
    /// `%d`, `%i`: signed decimal.
    Decimal,
    /// `%o`: unsigned octal.
    Octal,
    /// `%u`: unsigned decimal.
    Unsigned,
    /// `%x`: unsigned hex, lowercase digits.
    Hex,
    /// `%X`: unsigned hex, uppercase digits.
    HexUpper,
    /// `%p`: pointer (hex, fixed precision, no pad-zero).
    Pointer,
    /// `%c`/`%C`: single character.
    Char,
    /// `%s`/`%S`: string.
    Str,
    /// `%Z`: counted string.
    CountedStr,
    /// `%n`: store running count, produce no output.
    Count,
    /// `%f`: fixed-point, lowercase non-finite marker letter case.
    Fixed,
    /// `%F`: fixed-point, uppercase.
    FixedUpper,
    /// `%e`: scientific, lowercase `e`.
    Exp,
    /// `%E`: scientific, uppercase `E`.
    ExpUpper,
    /// `%g`: shorter of fixed/scientific, lowercase.
    General,
    /// `%G`: shorter of fixed/scientific, uppercase.
    GeneralUpper,
    /// `%a`: base-16 scientific, lowercase (alias of `Exp` with base 16).
    HexFloat,
    /// `%A`: base-16 scientific, uppercase.
    HexFloatUpper,
    /// `%%`: literal percent, produced internally, never parsed from a
    /// conversion letter directly (the parser short-circuits `%%` before
    /// building a `ConversionSpec`).
    Percent,
}

impl Conv {
    /// Whether this conversion renders through the float pipeline.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            Conv::Fixed
                | Conv::FixedUpper
                | Conv::Exp
                | Conv::ExpUpper
                | Conv::General
                | Conv::GeneralUpper
                | Conv::HexFloat
                | Conv::HexFloatUpper
        )
    }

    /// The digit/exponent base this conversion uses (10 for decimal float
    /// forms, 16 for the hex-float alias, 8/10/16 for integer forms).
    pub fn base(self) -> u32 {
        match self {
            Conv::Octal => 8,
            Conv::Hex | Conv::HexUpper | Conv::Pointer | Conv::HexFloat | Conv::HexFloatUpper => {
                16
            }
            _ => 10,
        }
    }

    /// Whether the digit letters (hex digits, exponent letter) render
    /// uppercase. `%p` falls through to the uppercase hex case in the
    /// reference implementation (`case 'p': ... case 'X': digits =
    /// digits_u;`), so pointers render uppercase hex too.
    pub fn uppercase(self) -> bool {
        matches!(
            self,
            Conv::HexUpper
                | Conv::Pointer
                | Conv::FixedUpper
                | Conv::ExpUpper
                | Conv::GeneralUpper
                | Conv::HexFloatUpper
        )
    }
}

/// A fully parsed `%...` conversion specification, built by the parser and
/// handed to a formatter.
#[derive(Clone, Copy, Debug)]
pub struct ConversionSpec {
    /// Parsed flags.
    pub flags: Flags,
    /// Minimum field width, resolved from either a literal digit run or a
    /// `*` pulling an argument (0 = unspecified).
    pub width: u32,
    /// Precision, resolved the same way as width. `None` means unspecified.
    pub precision: Option<i32>,
    /// Length modifier.
    pub length: Length,
    /// Conversion letter.
    pub conv: Conv,
}

impl ConversionSpec {
    /// A spec with no flags, no width, no precision, default length.
    pub fn new(conv: Conv) -> Self {
        Self {
            flags: Flags::empty(),
            width: 0,
            precision: None,
            length: Length::Default,
            conv,
        }
    }
}
