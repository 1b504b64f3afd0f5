pub mod position;
pub mod store;

pub use position::Position;
pub use store::{Bounds, CellChange, GridStore};
