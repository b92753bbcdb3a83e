use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};

/// A dense configuration bit region, `num_frames` frames of
/// `bits_per_frame` bits each.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cram {
    num_frames: usize,
    bits_per_frame: usize,
    bits: BitVec,
}

impl Cram {
    pub fn new(num_frames: usize, bits_per_frame: usize) -> Self {
        Cram {
            num_frames,
            bits_per_frame,
            bits: BitVec::repeat(false, num_frames * bits_per_frame),
        }
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn bits_per_frame(&self) -> usize {
        self.bits_per_frame
    }

    pub fn get(&self, frame: usize, bit: usize) -> bool {
        assert!(frame < self.num_frames && bit < self.bits_per_frame);
        self.bits[frame * self.bits_per_frame + bit]
    }

    pub fn set(&mut self, frame: usize, bit: usize, val: bool) {
        assert!(frame < self.num_frames && bit < self.bits_per_frame);
        self.bits.set(frame * self.bits_per_frame + bit, val);
    }

    /// Computes the set of bit positions whose values differ between two
    /// same-shape regions. Comparing regions of different shape is a caller
    /// bug.
    pub fn delta(&self, other: &Cram) -> CramDelta {
        assert_eq!(self.num_frames, other.num_frames);
        assert_eq!(self.bits_per_frame, other.bits_per_frame);
        let mut res = vec![];
        for (idx, (a, b)) in self.bits.iter().zip(other.bits.iter()).enumerate() {
            if a != b {
                res.push(ChangedBit {
                    frame: idx / self.bits_per_frame,
                    bit: idx % self.bits_per_frame,
                    set: *a,
                });
            }
        }
        res
    }
}

/// One bit position that differs between two regions; `set` is the value in
/// the left operand of the comparison.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChangedBit {
    pub frame: usize,
    pub bit: usize,
    pub set: bool,
}

pub type CramDelta = Vec<ChangedBit>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_empty_for_equal() {
        let a = Cram::new(4, 16);
        let b = Cram::new(4, 16);
        assert!(a.delta(&b).is_empty());
    }

    #[test]
    fn delta_tracks_direction() {
        let mut a = Cram::new(4, 16);
        let mut b = Cram::new(4, 16);
        a.set(1, 3, true);
        b.set(2, 15, true);
        let d = a.delta(&b);
        assert_eq!(
            d,
            vec![
                ChangedBit {
                    frame: 1,
                    bit: 3,
                    set: true
                },
                ChangedBit {
                    frame: 2,
                    bit: 15,
                    set: false
                },
            ]
        );
    }

    #[test]
    fn set_then_clear_roundtrips() {
        let mut a = Cram::new(2, 8);
        a.set(0, 7, true);
        assert!(a.get(0, 7));
        a.set(0, 7, false);
        assert_eq!(a, Cram::new(2, 8));
    }
}
