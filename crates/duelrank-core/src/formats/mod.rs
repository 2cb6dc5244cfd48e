//! # Wire Formats
//!
//! Serialization formats for rankings that leave the process: the
//! URL-safe shareable-state codec used to move a ranking between
//! devices.

mod share;

pub use share::{ShareHeader, decode_ranking, encode_ranking};
