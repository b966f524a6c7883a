//! PPTX (OOXML) writer backend for assembled decks.

pub mod writer;

pub use writer::{deck_filename, write_deck};
