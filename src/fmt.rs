//! Internal logging macros.
//!
//! With the `defmt` feature enabled they forward to the corresponding `defmt`
//! macros; otherwise they expand to nothing while still consuming their
//! arguments, so call sites never trigger unused-variable warnings.

#![allow(unused_macros)]

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => { ::defmt::trace!($s $(, $x)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x ),*); }};
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => { ::defmt::debug!($s $(, $x)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x ),*); }};
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => { ::defmt::warn!($s $(, $x)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{ let _ = ($( & $x ),*); }};
}
