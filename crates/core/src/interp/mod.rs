//! PDF content stream interpretation and device output.
//!
//! This module contains:
//! - `interpreter`: page interpreter and font cache
//! - `device`: output device trait and the no-op device
//! - `lexer`: content stream tokenizer
//! - `ops`: operator implementations by category

pub mod device;
pub mod interpreter;
pub mod lexer;
pub mod ops;

pub use device::{Device, NopDevice, RenderedChar};
pub use interpreter::{PageInterpreter, ResourceManager};
