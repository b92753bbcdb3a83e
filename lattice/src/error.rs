//! Data-driven failure modes of the chip model and graph construction.
//!
//! All of these are deterministic consequences of malformed or mismatched
//! input data. None are retried or recovered internally; callers get the
//! structured context and decide what to do with it.

#[derive(Debug, thiserror::Error)]
pub enum ChipError {
    #[error("unknown chip family {0}")]
    UnknownFamily(String),

    #[error("no device matching {0}")]
    DeviceNotFound(String),

    #[error("no tile named {0}")]
    TileNotFound(String),

    #[error("no suitable tile at R{row}C{col} matching {types:?}")]
    NoTileOfType {
        row: u32,
        col: u32,
        types: Vec<String>,
    },

    #[error("R{row}C{col} matches no globals quadrant")]
    NoQuadrantMatch { row: u32, col: u32 },

    #[error("R{row}C{col} matches no global TAP_DRIVE segment")]
    NoTapSegmentMatch { row: u32, col: u32 },

    #[error("{quadrant}C{col} matches no global SPINE segment")]
    NoSpineSegmentMatch { quadrant: String, col: u32 },

    #[error("tile {0} not present in both chips being diffed")]
    LayoutMismatch(String),
}
