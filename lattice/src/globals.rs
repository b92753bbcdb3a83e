//! Declarative description of the ECP5 global clock distribution network.
//!
//! All three lookups share one policy inherited from the source device
//! data: rules are scanned in declaration order, the first match wins, and
//! overlap between rules is not validated. Whether the device data
//! guarantees disjoint rules is unknown; do not change the scan order.

use serde::{Deserialize, Serialize};

use crate::error::ChipError;

/// A rectangular quadrant of the grid, inclusive on all bounds.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GlobalRegion {
    pub name: String,
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl GlobalRegion {
    pub fn matches(&self, row: u32, col: u32) -> bool {
        row >= self.y0 && row <= self.y1 && col >= self.x0 && col <= self.x1
    }
}

/// One TAP_DRIVE column: the column ranges it serves on its left and right
/// sides.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TapSegment {
    pub tap_col: u32,
    pub lx0: u32,
    pub lx1: u32,
    pub rx0: u32,
    pub rx1: u32,
}

impl TapSegment {
    pub fn matches_left(&self, col: u32) -> bool {
        col >= self.lx0 && col <= self.lx1
    }

    pub fn matches_right(&self, col: u32) -> bool {
        col >= self.rx0 && col <= self.rx1
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpineSegment {
    pub quadrant: String,
    pub tap_col: u32,
    pub spine_row: u32,
    pub spine_col: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TapDir {
    Left,
    Right,
}

/// Which side of a tap column drives a given cell, and from which column.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TapDriver {
    pub dir: TapDir,
    pub col: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GlobalsInfo {
    pub quadrants: Vec<GlobalRegion>,
    pub tapsegs: Vec<TapSegment>,
    pub spinesegs: Vec<SpineSegment>,
}

impl GlobalsInfo {
    pub fn quadrant(&self, row: u32, col: u32) -> Result<&str, ChipError> {
        for quad in &self.quadrants {
            if quad.matches(row, col) {
                return Ok(&quad.name);
            }
        }
        Err(ChipError::NoQuadrantMatch { row, col })
    }

    /// For each segment the left range is tested before the right range of
    /// that same segment.
    pub fn tap_driver(&self, row: u32, col: u32) -> Result<TapDriver, ChipError> {
        for seg in &self.tapsegs {
            if seg.matches_left(col) {
                return Ok(TapDriver {
                    dir: TapDir::Left,
                    col: seg.tap_col,
                });
            }
            if seg.matches_right(col) {
                return Ok(TapDriver {
                    dir: TapDir::Right,
                    col: seg.tap_col,
                });
            }
        }
        Err(ChipError::NoTapSegmentMatch { row, col })
    }

    pub fn spine_driver(&self, quadrant: &str, col: u32) -> Result<(u32, u32), ChipError> {
        for seg in &self.spinesegs {
            if seg.quadrant == quadrant && seg.tap_col == col {
                return Ok((seg.spine_row, seg.spine_col));
            }
        }
        Err(ChipError::NoSpineSegmentMatch {
            quadrant: quadrant.to_string(),
            col,
        })
    }
}
