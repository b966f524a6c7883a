//! Core domain types, image geometry, layout heuristics, and deck assembly
//! for Wikipedia slide generation.

pub mod assemble;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod types;

pub use assemble::{DeckAssembler, Summarizer};
pub use error::{Error, Result};
pub use geometry::{fit, Fit};
pub use layout::LayoutEngine;
pub use types::{
    Deck, ImageRef, ImageSide, LayoutKind, PlacedCaption, PlacedImage, ReferenceEntry,
    ReferenceList, Section, Slide, SlideSpec,
};
