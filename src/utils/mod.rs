//! Utility functions shared across glyphgrid

pub mod color;

pub use color::{blend_over, parse_hex_color, parse_hex_color_to_rgba, parse_hex_color_to_rgba8};
