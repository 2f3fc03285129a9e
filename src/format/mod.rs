//! Digest formatting: amounts, addresses, markup, per-transaction
//! fragments and block composition.
//!
//! Everything here is a pure function of already-resolved inputs. Formatting
//! the same classification twice yields identical strings; there is no
//! clock, cache or I/O anywhere in this tree.

pub mod address;
pub mod amounts;
pub mod cashaddr;
pub mod composer;
pub mod fragment;
pub mod markup;

pub use composer::{compose_block, compose_variant, BlockDigest};
pub use fragment::{DigestFragment, FragmentCategory, RenderContext};
