//! # Rendering Module
//!
//! Pixel layout for overlays and a plain-text renderer for the terminal binary.

pub mod display;
pub mod layout;

pub use display::*;
pub use layout::*;
