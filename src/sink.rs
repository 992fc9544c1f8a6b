//! Output sinks.
//!
//! Generalizes the teacher's two-variant `enum Sink { Display, Klog }` (see
//! `print_engine.rs`) into a trait, so a caller can supply a bounded counted
//! buffer (the closest analogue of the original C's `_IOSTRG` stream) or an
//! arbitrary unbounded stream, instead of this crate hardcoding a fixed set
//! of destinations.

use crate::code_unit::CodeUnit;
use crate::error::{Error, Result};

/// Accepts code units written by the formatting engine.
///
/// A sink either runs out of room (`Err(Error::Full)`) or hits a transport
/// failure (`Err(Error::Transport)`); both abort the run in progress.
pub trait Sink<U: CodeUnit> {
    /// Write a single code unit.
    fn put(&mut self, unit: U) -> Result<()>;

    /// Write `units.len()` code units. The default implementation calls
    /// [`Sink::put`] once per unit; implementations backed by a contiguous
    /// buffer should override this for speed.
    fn put_slice(&mut self, units: &[U]) -> Result<()> {
        for &u in units {
            self.put(u)?;
        }
        Ok(())
    }
}

/// A bounded sink writing into a caller-supplied, fixed-size region.
///
/// Mirrors the original's counted-buffer stream mode: once `buf` fills,
/// further writes fail with [`Error::Full`] rather than growing.
pub struct CountedBuffer<'a, U> {
    buf: &'a mut [U],
    len: usize,
}

impl<'a, U: CodeUnit> CountedBuffer<'a, U> {
    /// Wrap `buf` as a write target with `buf.len()` units of capacity.
    pub fn new(buf: &'a mut [U]) -> Self {
        Self { buf, len: 0 }
    }

    /// Number of code units written so far.
    pub fn written(&self) -> usize {
        self.len
    }

    /// The code units written so far.
    pub fn as_slice(&self) -> &[U] {
        &self.buf[..self.len]
    }
}

impl<'a, U: CodeUnit> Sink<U> for CountedBuffer<'a, U> {
    fn put(&mut self, unit: U) -> Result<()> {
        if self.len >= self.buf.len() {
            return Err(Error::Full);
        }
        self.buf[self.len] = unit;
        self.len += 1;
        Ok(())
    }
}

/// An unbounded sink that forwards every code unit to a caller-supplied
/// callback, which may itself fail (e.g. a wrapped transport write).
pub struct Stream<F> {
    write: F,
}

impl<F> Stream<F> {
    /// Build a stream sink from a `FnMut(U) -> Result<()>` callback.
    pub fn new(write: F) -> Self {
        Self { write }
    }
}

impl<U: CodeUnit, F: FnMut(U) -> Result<()>> Sink<U> for Stream<F> {
    fn put(&mut self, unit: U) -> Result<()> {
        (self.write)(unit)
    }
}

#[cfg(feature = "alloc")]
mod growable {
    use super::*;
    extern crate alloc;
    use alloc::vec::Vec;

    /// An always-succeeding sink backed by a growable `Vec`.
    pub struct GrowableBuffer<U> {
        buf: Vec<U>,
    }

    impl<U: CodeUnit> GrowableBuffer<U> {
        /// An empty growable buffer.
        pub fn new() -> Self {
            Self { buf: Vec::new() }
        }

        /// The code units written so far.
        pub fn as_slice(&self) -> &[U] {
            &self.buf
        }

        /// Consume the sink, returning its accumulated code units.
        pub fn into_vec(self) -> Vec<U> {
            self.buf
        }
    }

    impl<U: CodeUnit> Default for GrowableBuffer<U> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<U: CodeUnit> Sink<U> for GrowableBuffer<U> {
        fn put(&mut self, unit: U) -> Result<()> {
            self.buf.push(unit);
            Ok(())
        }

        fn put_slice(&mut self, units: &[U]) -> Result<()> {
            self.buf.extend_from_slice(units);
            Ok(())
        }
    }
}

#[cfg(feature = "alloc")]
pub use growable::GrowableBuffer;
