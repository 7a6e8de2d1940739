//! Markdown preview rendering.
//!
//! This module handles:
//! - Parsing the source buffer with comrak
//! - Rendering to styled lines for the preview pane
//! - Heading anchors for outline jumps and scroll sync

mod renderer;
mod types;

pub use types::{Document, HeadingRef, InlineSpan, InlineStyle, LineType, RenderedLine};
