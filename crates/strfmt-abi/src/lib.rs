#![cfg_attr(feature = "c-variadic", feature(c_variadic))]
// Pointer contracts for the extern "C" exports are stated in their item docs.
#![allow(clippy::missing_safety_doc)]
//! # strfmt-abi
//!
//! extern "C" boundary for strfmt.
//!
//! Produces a `cdylib` exposing the allocating formatter to C callers. The
//! returned buffers come from `malloc` and are released with `free`.
//!
//! # Architecture
//!
//! ```text
//! C caller -> ABI entry (this crate) -> argument decode -> strfmt-core -> malloc'd result
//! ```
//!
//! Arguments arrive either as a `va_list` (feature `c-variadic`, nightly) or
//! as an array of raw 64-bit registers. Either way they are decoded once into
//! a [`strfmt_core::FormatArg`] slice which the measuring and rendering passes
//! both read.

pub mod string_fmt_abi;

pub use string_fmt_abi::{strfmt_format_raw, strfmt_snprintf};

#[cfg(feature = "c-variadic")]
pub use string_fmt_abi::string_fmt;
