//! PDF model types used by the interpreter.
//!
//! - `path` - path geometry and paint kinds
//! - `state` - graphics and text state
//! - `font` - font metrics and text mapping
//! - `encoding` - simple font encodings and glyph names
//! - `cmap` - ToUnicode CMaps

pub mod cmap;
pub mod encoding;
pub mod font;
pub mod path;
pub mod state;

pub use font::{FontKind, PdfFont};
pub use path::{GfxPath, PathKind, PathPoint, Subpath};
pub use state::{GraphicState, TextState};
