//! Core library for the fractal cellular automaton explorer.
//!
//! A model is a square grid of bits. Every zoom step regenerates a finer model
//! from the coarser one: each parent cell fans out into a 2x2 block whose
//! values come from a 16-entry rule table applied to the parent's neighbours.

pub mod enc;
pub mod engine;
pub mod error;
pub mod grid;
pub mod paint;
pub mod pos;
pub mod rule;
pub mod session;
pub mod share;
pub mod view;
pub mod window;

pub use enc::{Base64Model, ModelCodec, PlainText, RunLengthEncoded};
pub use engine::{generate_next_model, generate_next_model_parallel};
pub use error::{DecodeError, GridError, PaintError, RuleIdError, SessionError};
pub use grid::Grid;
pub use paint::{Brush, PaintCell, PaintGrid};
pub use pos::Pos2;
pub use rule::{RuleId, RuleTable};
pub use session::{Explorer, ExplorerConfig};
pub use share::{ShareParams, share_url};
pub use view::{ViewBox, ZoomMode};
pub use window::GridWindow;
