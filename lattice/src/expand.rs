//! Tile-type dispatch: turning a chip's tile grid into a routing graph.
//!
//! Each family carries one static rule table. Every rule that matches a
//! tile's type fires, so a tile can contribute several bel groups (the
//! bottom mid tile adds both clock gates and PCS clock dividers). Rules
//! place bels relative to the tile's cell; all offsets are applied to the
//! already-transposed [`Location`], never to raw row/col pairs.

use chipgraph_interconnect::{Location, LutPermFlags, RoutingArc, RoutingGraph};

use crate::bels::{ecp5, machxo2};
use crate::chip::{Chip, ChipKind};
use crate::db::{BitSource, TileLocator};
use crate::error::ChipError;

pub type BelFn = fn(&mut RoutingGraph, i32, i32, usize);

#[derive(Copy, Clone, Debug)]
pub enum TileMatch {
    Exact(&'static str),
    AnyOf(&'static [&'static str]),
    Contains(&'static str),
    ContainsAny(&'static [&'static str]),
}

impl TileMatch {
    pub fn matches(&self, tile_type: &str) -> bool {
        match *self {
            TileMatch::Exact(t) => tile_type == t,
            TileMatch::AnyOf(ts) => ts.contains(&tile_type),
            TileMatch::Contains(t) => tile_type.contains(t),
            TileMatch::ContainsAny(ts) => ts.iter().any(|t| tile_type.contains(t)),
        }
    }
}

/// One dispatch rule: which tile types it fires on, where the bels land
/// relative to the tile, and which builder runs for each sub-index.
pub struct BelRule {
    pub matches: TileMatch,
    /// Substrings that suppress the rule even when `matches` accepts.
    pub veto: &'static [&'static str],
    /// Cell offset from the tile's location.
    pub delta: (i32, i32),
    pub z_base: usize,
    pub count: usize,
    pub add: BelFn,
}

impl BelRule {
    pub fn applies(&self, tile_type: &str) -> bool {
        self.matches.matches(tile_type) && !self.veto.iter().any(|v| tile_type.contains(v))
    }

    fn apply(&self, graph: &mut RoutingGraph, loc: Location) {
        let x = loc.x + self.delta.0;
        let y = loc.y + self.delta.1;
        for i in 0..self.count {
            (self.add)(graph, x, y, self.z_base + i);
        }
    }
}

fn pio_iologic(g: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    ecp5::add_pio(g, x, y, z);
    ecp5::add_iologic(g, x, y, z, false);
}

fn pio_siologic(g: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    ecp5::add_pio(g, x, y, z);
    ecp5::add_iologic(g, x, y, z, true);
}

fn dcc_l(g: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    ecp5::add_dcc(g, x, y, "L", z);
}

fn dcc_r(g: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    ecp5::add_dcc(g, x, y, "R", z);
}

fn dcc_t(g: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    ecp5::add_dcc(g, x, y, "T", z);
}

fn dcc_b(g: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    ecp5::add_dcc(g, x, y, "B", z);
}

fn pll_ul(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_pll(g, "UL", x, y);
}

fn pll_ur(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_pll(g, "UR", x, y);
}

fn pll_ll(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_pll(g, "LL", x, y);
}

fn pll_lr(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_pll(g, "LR", x, y);
}

fn dcu_extref(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_dcu(g, x, y);
    ecp5::add_extref(g, x, y);
}

fn efb0_misc(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    for name in ["GSR", "JTAGG", "OSCG", "SEDGA"] {
        ecp5::add_misc(g, name, x, y);
    }
}

fn dtr_misc(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_misc(g, "DTR", x, y);
}

fn usrmclk_misc(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_misc(g, "USRMCLK", x, y);
}

/// One edge-clock site. Banked sync/buffer pairs sit on the mid row (first
/// bank) and the row below (second bank); one unbanked delay line sits on
/// each of the four rows `y-1..y+2`. The dividers' bank tags and the bridge
/// mux sub-index differ between the two edges.
fn eclk_cluster(
    g: &mut RoutingGraph,
    x: i32,
    y: i32,
    banks: [u32; 2],
    clkdiv_banks: [Option<u32>; 2],
    bridge_z: usize,
) {
    for (i, bank) in clkdiv_banks.into_iter().enumerate() {
        ecp5::add_ioclk_bel(g, "CLKDIVF", x, y, i, bank);
    }
    for (k, bank) in banks.into_iter().enumerate() {
        let cy = y + k as i32;
        for i in 0..2 {
            ecp5::add_ioclk_bel(g, "ECLKSYNCB", x, cy, i, Some(bank));
            ecp5::add_ioclk_bel(g, "TRELLIS_ECLKBUF", x, cy, i, Some(bank));
        }
    }
    for dy in -1..3 {
        ecp5::add_ioclk_bel(g, "DLLDELD", x, y + dy, 0, None);
    }
    ecp5::add_ioclk_bel(g, "ECLKBRIDGECS", x, y, bridge_z, None);
    ecp5::add_ioclk_bel(g, "BRGECLKSYNC", x, y, bridge_z, None);
}

fn eclk_l(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    eclk_cluster(g, x, y, [7, 6], [Some(7), Some(6)], 1);
}

fn eclk_r(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    eclk_cluster(g, x, y, [2, 3], [None, None], 0);
}

fn ddrdll(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_ioclk_bel(g, "DDRDLL", x, y, 0, None);
}

fn dqsbufm(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    ecp5::add_ioclk_bel(g, "DQSBUFM", x, y, 0, None);
}

fn mx2_dcm(g: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    machxo2::add_dcm(g, x, y, z, z + 2);
}

fn mx2_osch(g: &mut RoutingGraph, x: i32, y: i32, _z: usize) {
    machxo2::add_osch(g, x, y);
}

macro_rules! rule {
    ($m:expr, $add:expr) => {
        rule!($m, $add, veto: &[], delta: (0, 0), z: 0, count: 1)
    };
    ($m:expr, $add:expr, count: $count:expr) => {
        rule!($m, $add, veto: &[], delta: (0, 0), z: 0, count: $count)
    };
    ($m:expr, $add:expr, z: $z:expr) => {
        rule!($m, $add, veto: &[], delta: (0, 0), z: $z, count: 1)
    };
    ($m:expr, $add:expr, z: $z:expr, count: $count:expr) => {
        rule!($m, $add, veto: &[], delta: (0, 0), z: $z, count: $count)
    };
    ($m:expr, $add:expr, delta: $delta:expr) => {
        rule!($m, $add, veto: &[], delta: $delta, z: 0, count: 1)
    };
    ($m:expr, $add:expr, delta: $delta:expr, count: $count:expr) => {
        rule!($m, $add, veto: &[], delta: $delta, z: 0, count: $count)
    };
    ($m:expr, $add:expr, veto: $veto:expr, count: $count:expr) => {
        rule!($m, $add, veto: $veto, delta: (0, 0), z: 0, count: $count)
    };
    ($m:expr, $add:expr, veto: $veto:expr, delta: $delta:expr, z: $z:expr, count: $count:expr) => {
        BelRule {
            matches: $m,
            veto: $veto,
            delta: $delta,
            z_base: $z,
            count: $count,
            add: $add,
        }
    };
}

use TileMatch::{AnyOf, Contains, ContainsAny, Exact};

pub static ECP5_BEL_RULES: &[BelRule] = &[
    rule!(Exact("PLC2"), ecp5::add_slice, count: 4),
    rule!(ContainsAny(&["PICL0", "PICR0"]), pio_iologic, count: 4),
    rule!(ContainsAny(&["PIOT0", "PICB0"]), pio_siologic, veto: &["SPICB0"], count: 2),
    rule!(Exact("SPICB0"), pio_siologic),
    rule!(Exact("LMID_0"), dcc_l, count: 14),
    rule!(Exact("RMID_0"), dcc_r, count: 14),
    rule!(Exact("TMID_0"), dcc_t, count: 12),
    rule!(AnyOf(&["BMID_0V", "BMID_0H"]), dcc_b, count: 16),
    rule!(AnyOf(&["EBR_CMUX_UL", "DSP_CMUX_UL"]), ecp5::add_dcs),
    rule!(AnyOf(&["EBR_CMUX_LL", "EBR_CMUX_LL_25K"]), ecp5::add_dcs, z: 1),
    rule!(
        AnyOf(&["MIB_EBR0", "EBR_CMUX_UR", "EBR_CMUX_LR", "EBR_CMUX_LR_25K"]),
        ecp5::add_bram
    ),
    rule!(Exact("MIB_EBR2"), ecp5::add_bram, z: 1),
    rule!(Exact("MIB_EBR4"), ecp5::add_bram, z: 2),
    rule!(Exact("MIB_EBR6"), ecp5::add_bram, z: 3),
    rule!(Exact("MIB_DSP0"), ecp5::add_mult18),
    rule!(Exact("MIB_DSP1"), ecp5::add_mult18, z: 1),
    rule!(Exact("MIB_DSP4"), ecp5::add_mult18, z: 4),
    rule!(Exact("MIB_DSP5"), ecp5::add_mult18, z: 5),
    rule!(Exact("MIB_DSP3"), ecp5::add_alu54b, z: 3),
    rule!(Exact("MIB_DSP7"), ecp5::add_alu54b, z: 7),
    rule!(Exact("PLL0_UL"), pll_ul, delta: (1, 0)),
    rule!(Exact("PLL0_LL"), pll_ll, delta: (0, -1)),
    rule!(Exact("PLL0_LR"), pll_lr, delta: (0, -1)),
    rule!(Exact("PLL0_UR"), pll_ur, delta: (-1, 0)),
    rule!(Exact("DCU0"), dcu_extref),
    rule!(Exact("BMID_0H"), ecp5::add_pcsclkdiv, delta: (0, -1), count: 2),
    rule!(Exact("EFB0_PICB0"), efb0_misc, delta: (0, -1)),
    rule!(Exact("DTR"), dtr_misc, delta: (0, -1)),
    rule!(Exact("EFB1_PICB1"), usrmclk_misc, delta: (-5, 0)),
    rule!(Exact("ECLK_L"), eclk_l, delta: (-2, 0)),
    rule!(Exact("ECLK_R"), eclk_r, delta: (2, 0)),
    rule!(Exact("DDRDLL_UL"), ddrdll, delta: (-2, -10)),
    rule!(Exact("DDRDLL_ULA"), ddrdll, delta: (-2, -13)),
    rule!(Exact("DDRDLL_UR"), ddrdll, delta: (2, -10)),
    rule!(Exact("DDRDLL_URA"), ddrdll, delta: (2, -13)),
    rule!(Exact("DDRDLL_LL"), ddrdll, delta: (-2, 13)),
    rule!(Exact("DDRDLL_LR"), ddrdll, delta: (2, 13)),
    rule!(AnyOf(&["PICL0_DQS2", "PICR0_DQS2"]), dqsbufm),
];

pub static MACHXO2_BEL_RULES: &[BelRule] = &[
    rule!(Exact("PLC"), machxo2::add_lc, count: 4),
    rule!(
        ContainsAny(&["PIC_L0", "PIC_T", "PIC_R0", "PIC_B"]),
        machxo2::add_pio,
        veto: &["DUMMY", "CIB"],
        count: 4
    ),
    rule!(ContainsAny(&["PIC_LS0", "PIC_RS0"]), machxo2::add_pio, count: 2),
    rule!(Contains("CENTER_EBR_CIB"), machxo2::add_dcc, count: 8),
    rule!(Contains("CENTER_EBR_CIB"), mx2_dcm, z: 6, count: 2),
    rule!(Contains("CIB_CFG0"), mx2_osch),
];

const LUT_INPUTS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Pseudo-arcs modelling the free permutation of a LUT4's inputs: for each
/// of the tile's 8 LUTs, every ordered pair of distinct inputs gets a fixed
/// arc from input `j`'s fabric wire onto input `i`'s slice wire, tagged
/// with the packed permutation word.
fn add_lutperm_pips(graph: &mut RoutingGraph, loc: Location) {
    let tile_type = graph.ident("PLC2");
    for lut in 0..8 {
        for (i, sink) in LUT_INPUTS.iter().enumerate() {
            for (j, source) in LUT_INPUTS.iter().enumerate() {
                if i == j {
                    continue;
                }
                let src = format!("{source}{lut}");
                let snk = format!("{sink}{lut}_SLICE");
                let flags = LutPermFlags {
                    lut,
                    sink_input: i as u8,
                    source_input: j as u8,
                };
                let arc = RoutingArc {
                    ident: graph.ident(&format!("{src}->{snk}")),
                    source: graph.id_at(loc, &src),
                    sink: graph.id_at(loc, &snk),
                    tile_type,
                    configurable: false,
                    lutperm_flags: flags.pack(),
                };
                graph.add_arc(loc, arc);
            }
        }
    }
}

impl Chip {
    /// Builds the whole-device routing graph: family bels from the dispatch
    /// table, optional LUT permutation pseudo-arcs, and per-tile routing
    /// imported from the bit database.
    pub fn routing_graph(
        &self,
        bits: &dyn BitSource,
        lutperm_pips: bool,
    ) -> Result<RoutingGraph, ChipError> {
        let kind = self.info.kind()?;
        let rules = match kind {
            ChipKind::Ecp5 => ECP5_BEL_RULES,
            ChipKind::MachXo2 => MACHXO2_BEL_RULES,
        };
        let mut graph = RoutingGraph::new();
        for tile in self.tiles() {
            let loc = tile.info.loc();
            for belrule in rules {
                if belrule.applies(&tile.info.tile_type) {
                    belrule.apply(&mut graph, loc);
                }
            }
            if lutperm_pips && kind == ChipKind::Ecp5 && tile.info.tile_type == "PLC2" {
                add_lutperm_pips(&mut graph, loc);
            }
            let locator = TileLocator {
                family: &self.info.family,
                device: &self.info.name,
                tile_type: &tile.info.tile_type,
            };
            bits.tile_bits(&locator).add_routing(&tile.info, &mut graph);
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matching<'a>(rules: &'a [BelRule], tile_type: &str) -> Vec<&'a BelRule> {
        rules.iter().filter(|r| r.applies(tile_type)).collect()
    }

    #[test]
    fn plc2_matches_one_rule() {
        let hits = matching(ECP5_BEL_RULES, "PLC2");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].count, 4);
    }

    #[test]
    fn dqs_tile_gets_pios_and_dqsbufm() {
        let hits = matching(ECP5_BEL_RULES, "PICL0_DQS2");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn spicb0_has_one_pio() {
        // vetoed from the generic bottom-edge rule, caught by its own
        let hits = matching(ECP5_BEL_RULES, "SPICB0");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].count, 1);
    }

    #[test]
    fn bmid_0h_fires_twice() {
        let hits = matching(ECP5_BEL_RULES, "BMID_0H");
        assert_eq!(hits.len(), 2);
        let counts: Vec<usize> = hits.iter().map(|r| r.count).collect();
        assert!(counts.contains(&16) && counts.contains(&2));
    }

    #[test]
    fn machxo2_dummy_and_cib_pics_are_vetoed() {
        assert!(matching(MACHXO2_BEL_RULES, "PIC_L0").len() == 1);
        assert!(matching(MACHXO2_BEL_RULES, "LLC0_PIC_L0_DUMMY").is_empty());
        assert!(matching(MACHXO2_BEL_RULES, "PIC_T_CIB").is_empty());
    }

    #[test]
    fn machxo2_center_tile_fires_both_rules() {
        let hits = matching(MACHXO2_BEL_RULES, "CENTER_EBR_CIB");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn ddrdll_offsets_match_corner() {
        let expect = [
            ("DDRDLL_UL", (-2, -10)),
            ("DDRDLL_ULA", (-2, -13)),
            ("DDRDLL_UR", (2, -10)),
            ("DDRDLL_URA", (2, -13)),
            ("DDRDLL_LL", (-2, 13)),
            ("DDRDLL_LR", (2, 13)),
        ];
        for (ty, delta) in expect {
            let hits = matching(ECP5_BEL_RULES, ty);
            assert_eq!(hits.len(), 1, "{ty}");
            assert_eq!(hits[0].delta, delta, "{ty}");
        }
    }

    #[test]
    fn displaced_rules_carry_their_offsets() {
        // some of these types also hit a co-located rule (EFB0_PICB0 is a
        // bottom IO tile too); exactly one matching rule may displace
        let expect = [
            ("PLL0_UL", (1, 0)),
            ("PLL0_LL", (0, -1)),
            ("PLL0_LR", (0, -1)),
            ("PLL0_UR", (-1, 0)),
            ("BMID_0H", (0, -1)),
            ("EFB0_PICB0", (0, -1)),
            ("DTR", (0, -1)),
            ("EFB1_PICB1", (-5, 0)),
            ("ECLK_L", (-2, 0)),
            ("ECLK_R", (2, 0)),
        ];
        for (ty, delta) in expect {
            let hits = matching(ECP5_BEL_RULES, ty);
            let displaced: Vec<_> = hits.iter().filter(|r| r.delta != (0, 0)).collect();
            assert_eq!(displaced.len(), 1, "{ty}");
            assert_eq!(displaced[0].delta, delta, "{ty}");
        }
    }

    #[test]
    fn eclk_l_cluster_layout() {
        let mut g = RoutingGraph::new();
        // as fired for an ECLK_L tile at X10Y20: base cell two columns left
        eclk_l(&mut g, 8, 20, 0);
        // one unbanked delay line per row, the row above through two below
        for y in 19..23 {
            assert!(g.bel(Location::new(8, y), "DLLDELD0").is_some(), "row {y}");
        }
        assert!(g.bel(Location::new(8, 20), "DLLDELD1").is_none());
        // dividers sit on the mid row and carry the left-edge bank tags
        assert!(g.wire(Location::new(8, 20), "JCDIVX_CLKDIVF0_BK7").is_some());
        assert!(g.wire(Location::new(8, 20), "JCDIVX_CLKDIVF1_BK6").is_some());
        // bridge muxes use sub-index 1 on the left edge
        assert!(g.bel(Location::new(8, 20), "ECLKBRIDGECS1").is_some());
        assert!(g.bel(Location::new(8, 20), "BRGECLKSYNC1").is_some());
        assert!(g.bel(Location::new(8, 20), "ECLKBRIDGECS0").is_none());
        // bank 7 syncs on the mid row, bank 6 on the row below
        assert!(g.wire(Location::new(8, 20), "JECLKO_ECLKSYNCB1_BK7").is_some());
        assert!(g.wire(Location::new(8, 21), "JECLKO_ECLKSYNCB1_BK6").is_some());
    }

    #[test]
    fn eclk_r_cluster_layout() {
        let mut g = RoutingGraph::new();
        eclk_r(&mut g, 12, 20, 0);
        // right-edge dividers are unbanked and the bridge muxes use 0
        assert!(g.wire(Location::new(12, 20), "JCDIVX_CLKDIVF0").is_some());
        assert!(g.bel(Location::new(12, 20), "ECLKBRIDGECS0").is_some());
        assert!(g.bel(Location::new(12, 20), "BRGECLKSYNC0").is_some());
        assert!(g.wire(Location::new(12, 21), "JECLKO_ECLKSYNCB0_BK3").is_some());
        for y in 19..23 {
            assert!(g.bel(Location::new(12, y), "DLLDELD0").is_some(), "row {y}");
        }
    }

    #[test]
    fn lutperm_crossbar_shape() {
        let mut g = RoutingGraph::new();
        let loc = Location::new(2, 3);
        add_lutperm_pips(&mut g, loc);
        let tile = g.tile(loc).unwrap();
        // 8 LUTs × 4 inputs × 3 sources each
        assert_eq!(tile.arcs.len(), 96);
        let arc = g.arc(loc, "B3->A3_SLICE").unwrap();
        assert!(!arc.configurable);
        let flags = arc.lutperm().unwrap();
        assert_eq!(flags.lut, 3);
        assert_eq!(flags.sink_input, 0);
        assert_eq!(flags.source_input, 1);
        // an input never permutes onto itself
        assert!(g.arc(loc, "A3->A3_SLICE").is_none());
    }
}
