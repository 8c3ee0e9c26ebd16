mod place;
mod selection;

pub use place::{Image, Place};
pub use selection::Selection;
