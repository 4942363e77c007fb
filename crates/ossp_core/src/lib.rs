//! Public library API for the OSSP binary value format.

/// Byte buffer, value model, and the OSSP envelope codec.
pub mod wire;
