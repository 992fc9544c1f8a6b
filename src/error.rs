//! Error type returned when a conversion run cannot complete.
//!
//! Modeled on `pw_status`: a plain C-like status enum plus a `Result` alias,
//! rather than a `std::error::Error` hierarchy, since the only failure modes
//! this engine can hit are the handful enumerated below.

#[cfg_attr(feature = "std", derive(Debug))]
#[derive(Clone, Copy, Eq, PartialEq)]
/// Why a format run aborted.
pub enum Error {
    /// The sink's remaining capacity was exhausted before the run finished.
    Full,
    /// The sink reported a transport failure (e.g. an underlying write error).
    Transport,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_are_distinct() {
        assert_ne!(Error::Full, Error::Transport);
    }

    #[test]
    fn result_ok_and_err_round_trip() {
        let ok: Result<i32> = Ok(4);
        assert_eq!(ok, Ok(4));
        let err: Result<i32> = Err(Error::Full);
        assert_eq!(err, Err(Error::Full));
    }
}
