pub mod bels;
pub mod chip;
pub mod db;
pub mod error;
pub mod expand;
pub mod globals;

pub use chip::{Chip, ChipDelta, ChipInfo, ChipKind, Tile, TileInfo};
pub use error::ChipError;
