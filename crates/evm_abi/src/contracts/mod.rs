//! Contract definitions built on the codec.
pub mod commuto_swap;
