pub mod reader;

pub use reader::{read_element_id, read_vint, vint_length, Vint};
