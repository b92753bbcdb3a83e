//! Packed metadata for LUT input permutation pseudo-arcs.
//!
//! The word travels on the arc so a router can recover which LUT and which
//! input pair an arc permutes without re-parsing wire names. Layout:
//! a marker bit at 0x4000, the LUT index in bits 4.., the sink input in
//! bits 2..4, the source input in bits 0..2.

use serde::{Deserialize, Serialize};

const MARKER: u16 = 0x4000;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LutPermFlags {
    /// LUT index within the tile.
    pub lut: u8,
    /// Destination input index, 0..4.
    pub sink_input: u8,
    /// Source input index, 0..4.
    pub source_input: u8,
}

impl LutPermFlags {
    pub fn pack(self) -> u16 {
        assert!(self.sink_input < 4 && self.source_input < 4);
        MARKER | (u16::from(self.lut) << 4) | (u16::from(self.sink_input) << 2)
            | u16::from(self.source_input)
    }

    pub fn unpack(val: u16) -> Option<Self> {
        if val & MARKER == 0 {
            return None;
        }
        Some(LutPermFlags {
            lut: ((val >> 4) & 0xff) as u8,
            sink_input: ((val >> 2) & 3) as u8,
            source_input: (val & 3) as u8,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for lut in 0..8 {
            for sink_input in 0..4 {
                for source_input in 0..4 {
                    if sink_input == source_input {
                        continue;
                    }
                    let flags = LutPermFlags {
                        lut,
                        sink_input,
                        source_input,
                    };
                    assert_eq!(LutPermFlags::unpack(flags.pack()), Some(flags));
                }
            }
        }
    }

    #[test]
    fn no_marker_is_none() {
        assert_eq!(LutPermFlags::unpack(0), None);
        assert_eq!(LutPermFlags::unpack(0x3fff), None);
    }
}
