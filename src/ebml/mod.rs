#[macro_use]
mod macros;
pub mod decoder;
pub mod element;
pub mod ids;
#[cfg(test)]
pub(crate) mod test_utils;

pub use decoder::{EbmlDecoder, ElementReader};
pub use element::{Block, Element, ElementEvent, ElementValue};
pub use ids::{ElementId, ElementKind, BUFFERED_IDS};
