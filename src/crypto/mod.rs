//! Keystream generation and the XOR stream cipher applied to every entry payload.
//!
//! The cipher is a reversible obfuscation, not a security boundary.

mod mt;
mod stream;

pub use mt::{MersenneTwister, DEFAULT_MT_SEED};
pub use stream::{derive_seed, CryptoStream, SEED_XOR_KEY};
