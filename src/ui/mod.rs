//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theming and colors

pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::{line_number_width, render};

#[cfg(test)]
mod tests;
