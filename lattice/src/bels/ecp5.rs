//! ECP5 primitive builders.

use chipgraph_interconnect::RoutingGraph;

use super::make_bel;

const LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// One SLICE: two LUT4/FF pairs. LUT inputs sit on the `*_SLICE` wires
/// that the optional permutation crossbar feeds.
pub fn add_slice(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let l = LETTERS[z];
    let mut bel = make_bel(graph, x, y, &format!("SLICE{l}"), "SLICE", z);
    for k in 0..2 {
        let lc = z * 2 + k;
        for inp in LETTERS {
            graph.add_bel_input(&mut bel, &format!("{inp}{k}"), x, y, &format!("{inp}{lc}_SLICE"));
        }
        graph.add_bel_input(&mut bel, &format!("M{k}"), x, y, &format!("M{lc}_SLICE"));
        graph.add_bel_input(&mut bel, &format!("WD{k}"), x, y, &format!("WD{lc}_SLICE"));
        graph.add_bel_output(&mut bel, &format!("F{k}"), x, y, &format!("F{lc}"));
        graph.add_bel_output(&mut bel, &format!("Q{k}"), x, y, &format!("Q{lc}"));
        graph.add_bel_output(&mut bel, &format!("OFX{k}"), x, y, &format!("OFX{lc}"));
    }
    for i in 0..4 {
        graph.add_bel_input(&mut bel, &format!("WAD{i}"), x, y, &format!("WAD{i}{l}_SLICE"));
    }
    graph.add_bel_input(&mut bel, "WRE", x, y, &format!("WRE{z}_SLICE"));
    graph.add_bel_input(&mut bel, "WCK", x, y, &format!("WCK{z}_SLICE"));
    graph.add_bel_input(&mut bel, "CLK", x, y, &format!("CLK{z}_SLICE"));
    graph.add_bel_input(&mut bel, "LSR", x, y, &format!("LSR{z}_SLICE"));
    graph.add_bel_input(&mut bel, "CE", x, y, &format!("CE{z}_SLICE"));
    graph.add_bel_input(&mut bel, "FCI", x, y, &format!("FCI{z}_SLICE"));
    graph.add_bel_output(&mut bel, "FCO", x, y, &format!("FCO{z}_SLICE"));
    graph.add_bel(bel);
}

pub fn add_pio(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let l = LETTERS[z];
    let mut bel = make_bel(graph, x, y, &format!("PIO{l}"), "PIO", z);
    graph.add_bel_input(&mut bel, "PADDO", x, y, &format!("PADDO{z}_PIO"));
    graph.add_bel_input(&mut bel, "PADDT", x, y, &format!("PADDT{z}_PIO"));
    graph.add_bel_input(&mut bel, "IOLDO", x, y, &format!("IOLDO{z}_PIO"));
    graph.add_bel_input(&mut bel, "IOLTO", x, y, &format!("IOLTO{z}_PIO"));
    graph.add_bel_output(&mut bel, "JPADDI", x, y, &format!("JPADDI{z}_PIO"));
    graph.add_bel(bel);
}

/// `s` selects the reduced top/bottom-edge variant.
pub fn add_iologic(graph: &mut RoutingGraph, x: i32, y: i32, z: usize, s: bool) {
    let l = LETTERS[z];
    let (name, ty) = if s {
        (format!("SIOLOGIC{l}"), "SIOLOGIC")
    } else {
        (format!("IOLOGIC{l}"), "IOLOGIC")
    };
    let mut bel = make_bel(graph, x, y, &name, ty, z);
    graph.add_bel_input(&mut bel, "PADDI", x, y, &format!("JPADDI{z}_PIO"));
    for pin in ["CLK", "CE", "LSR", "TSDATA0"] {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("J{pin}{z}_IOLOGIC"));
    }
    let datawidth = if s { 2 } else { 4 };
    for i in 0..datawidth {
        graph.add_bel_input(&mut bel, &format!("TXDATA{i}"), x, y, &format!("JTXDATA{i}{z}_IOLOGIC"));
        graph.add_bel_output(&mut bel, &format!("RXDATA{i}"), x, y, &format!("JRXDATA{i}{z}_IOLOGIC"));
    }
    graph.add_bel_output(&mut bel, "INFF", x, y, &format!("JINFF{z}_IOLOGIC"));
    graph.add_bel_output(&mut bel, "IOLDO", x, y, &format!("IOLDO{z}_PIO"));
    graph.add_bel_output(&mut bel, "IOLTO", x, y, &format!("IOLTO{z}_PIO"));
    graph.add_bel(bel);
}

/// One clock divide-and-conquer gate on a `side` (L/R/T/B) mid tile.
pub fn add_dcc(graph: &mut RoutingGraph, x: i32, y: i32, side: &str, z: usize) {
    let mut bel = make_bel(graph, x, y, &format!("DCC_{side}{z}"), "DCC", z);
    graph.add_bel_input(&mut bel, "CLKI", x, y, &format!("{side}DCC{z}CLKI"));
    graph.add_bel_input(&mut bel, "CE", x, y, &format!("{side}DCC{z}CE"));
    graph.add_bel_output(&mut bel, "CLKO", x, y, &format!("{side}DCC{z}CLKO"));
    graph.add_bel(bel);
}

pub fn add_dcs(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let mut bel = make_bel(graph, x, y, &format!("DCS{z}"), "DCS", z);
    for pin in ["CLK0", "CLK1", "SEL", "MODESEL"] {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("DCS{z}{pin}"));
    }
    graph.add_bel_output(&mut bel, "DCSOUT", x, y, &format!("DCS{z}OUT"));
    graph.add_bel(bel);
}

pub fn add_bram(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let mut bel = make_bel(graph, x, y, &format!("EBR{z}"), "DP16KD", z);
    for i in 0..14 {
        graph.add_bel_input(&mut bel, &format!("ADA{i}"), x, y, &format!("JADA{i}_EBR{z}"));
        graph.add_bel_input(&mut bel, &format!("ADB{i}"), x, y, &format!("JADB{i}_EBR{z}"));
    }
    for i in 0..18 {
        graph.add_bel_input(&mut bel, &format!("DIA{i}"), x, y, &format!("JDIA{i}_EBR{z}"));
        graph.add_bel_input(&mut bel, &format!("DIB{i}"), x, y, &format!("JDIB{i}_EBR{z}"));
        graph.add_bel_output(&mut bel, &format!("DOA{i}"), x, y, &format!("JDOA{i}_EBR{z}"));
        graph.add_bel_output(&mut bel, &format!("DOB{i}"), x, y, &format!("JDOB{i}_EBR{z}"));
    }
    for pin in [
        "CLKA", "CLKB", "CEA", "CEB", "OCEA", "OCEB", "RSTA", "RSTB", "WEA", "WEB", "CSA0",
        "CSA1", "CSA2", "CSB0", "CSB1", "CSB2",
    ] {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("J{pin}_EBR{z}"));
    }
    graph.add_bel(bel);
}

pub fn add_mult18(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let mut bel = make_bel(graph, x, y, &format!("MULT18_{z}"), "MULT18X18D", z);
    for i in 0..18 {
        graph.add_bel_input(&mut bel, &format!("A{i}"), x, y, &format!("JA{i}_MULT18_{z}"));
        graph.add_bel_input(&mut bel, &format!("B{i}"), x, y, &format!("JB{i}_MULT18_{z}"));
    }
    for i in 0..36 {
        graph.add_bel_output(&mut bel, &format!("P{i}"), x, y, &format!("JP{i}_MULT18_{z}"));
    }
    for i in 0..4 {
        for pin in ["CLK", "CE", "RST"] {
            graph.add_bel_input(&mut bel, &format!("{pin}{i}"), x, y, &format!("J{pin}{i}_MULT18_{z}"));
        }
    }
    for pin in ["SIGNEDA", "SIGNEDB", "SOURCEA", "SOURCEB"] {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("J{pin}_MULT18_{z}"));
    }
    graph.add_bel(bel);
}

pub fn add_alu54b(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let mut bel = make_bel(graph, x, y, &format!("ALU54_{z}"), "ALU54B", z);
    for i in 0..36 {
        graph.add_bel_input(&mut bel, &format!("MA{i}"), x, y, &format!("JMA{i}_ALU54_{z}"));
        graph.add_bel_input(&mut bel, &format!("MB{i}"), x, y, &format!("JMB{i}_ALU54_{z}"));
    }
    for i in 0..54 {
        graph.add_bel_output(&mut bel, &format!("R{i}"), x, y, &format!("JR{i}_ALU54_{z}"));
    }
    for i in 0..4 {
        for pin in ["CLK", "CE", "RST"] {
            graph.add_bel_input(&mut bel, &format!("{pin}{i}"), x, y, &format!("J{pin}{i}_ALU54_{z}"));
        }
    }
    for i in 0..8 {
        graph.add_bel_input(&mut bel, &format!("OP{i}"), x, y, &format!("JOP{i}_ALU54_{z}"));
    }
    for pin in ["SIGNEDIA", "SIGNEDIB"] {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("J{pin}_ALU54_{z}"));
    }
    for pin in ["EQZ", "OVER", "UNDER"] {
        graph.add_bel_output(&mut bel, pin, x, y, &format!("J{pin}_ALU54_{z}"));
    }
    graph.add_bel(bel);
}

/// One corner PLL; `quad` is the corner tag (UL/UR/LL/LR).
pub fn add_pll(graph: &mut RoutingGraph, quad: &str, x: i32, y: i32) {
    let mut bel = make_bel(graph, x, y, &format!("EHXPLL_{quad}"), "EHXPLLL", 0);
    for pin in [
        "CLKI",
        "CLKFB",
        "PHASESEL0",
        "PHASESEL1",
        "PHASEDIR",
        "PHASESTEP",
        "PHASELOADREG",
        "STDBY",
        "PLLWAKESYNC",
        "RST",
        "ENCLKOP",
        "ENCLKOS",
        "ENCLKOS2",
        "ENCLKOS3",
    ] {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("J{pin}_PLL"));
    }
    for pin in ["CLKOP", "CLKOS", "CLKOS2", "CLKOS3", "LOCK", "INTLOCK"] {
        graph.add_bel_output(&mut bel, pin, x, y, &format!("J{pin}_PLL"));
    }
    graph.add_bel(bel);
}

pub fn add_dcu(graph: &mut RoutingGraph, x: i32, y: i32) {
    let mut bel = make_bel(graph, x, y, "DCU", "DCU", 0);
    for d in 0..2 {
        for pin in ["FF_TXI_CLK", "FF_RXI_CLK", "FF_EBRD_CLK"] {
            graph.add_bel_input(&mut bel, &format!("CH{d}_{pin}"), x, y, &format!("JCH{d}_{pin}_DCU"));
        }
        for i in 0..8 {
            graph.add_bel_input(
                &mut bel,
                &format!("CH{d}_FF_TX_D_{i}"),
                x,
                y,
                &format!("JCH{d}_FF_TX_D_{i}_DCU"),
            );
            graph.add_bel_output(
                &mut bel,
                &format!("CH{d}_FF_RX_D_{i}"),
                x,
                y,
                &format!("JCH{d}_FF_RX_D_{i}_DCU"),
            );
        }
        for pin in ["FF_TX_PCLK", "FF_RX_PCLK"] {
            graph.add_bel_output(&mut bel, &format!("CH{d}_{pin}"), x, y, &format!("JCH{d}_{pin}_DCU"));
        }
    }
    for pin in ["D_FFC_MACRO_RST", "D_FFC_MACROPDB", "D_FFC_TRST", "D_REFCLKI"] {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("J{pin}_DCU"));
    }
    graph.add_bel_output(&mut bel, "D_FFS_PLOL", x, y, "JD_FFS_PLOL_DCU");
    graph.add_bel(bel);
}

pub fn add_extref(graph: &mut RoutingGraph, x: i32, y: i32) {
    let mut bel = make_bel(graph, x, y, "EXTREF", "EXTREFB", 0);
    graph.add_bel_input(&mut bel, "REFCLKP", x, y, "JREFCLKP_EXTREF");
    graph.add_bel_input(&mut bel, "REFCLKN", x, y, "JREFCLKN_EXTREF");
    graph.add_bel_output(&mut bel, "REFCLKO", x, y, "JREFCLKO_EXTREF");
    graph.add_bel(bel);
}

pub fn add_pcsclkdiv(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let mut bel = make_bel(graph, x, y, &format!("PCSCLKDIV{z}"), "PCSCLKDIV", z);
    for pin in ["CLKI", "RST", "SEL0", "SEL1", "SEL2"] {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("J{pin}_PCSCLKDIV{z}"));
    }
    graph.add_bel_output(&mut bel, "CDIVX", x, y, &format!("JCDIVX_PCSCLKDIV{z}"));
    graph.add_bel(bel);
}

/// Config/system bels with fixed pin inventories, keyed by primitive name.
pub fn add_misc(graph: &mut RoutingGraph, name: &str, x: i32, y: i32) {
    let (ins, outs): (&[&str], &[&str]) = match name {
        "GSR" => (&["GSR", "CLK"], &[]),
        "JTAGG" => (
            &["JTDO1", "JTDO2"],
            &["JTDI", "JTCK", "JRTI1", "JRTI2", "JSHIFT", "JUPDATE", "JRSTN", "JCE1", "JCE2"],
        ),
        "OSCG" => (&[], &["OSC"]),
        "SEDGA" => (
            &["SEDENABLE", "SEDSTART", "SEDFRCERR"],
            &["SEDERRDET", "SEDDONE", "SEDINPROG"],
        ),
        "DTR" => (
            &["STARTPULSE"],
            &[
                "DTROUT0", "DTROUT1", "DTROUT2", "DTROUT3", "DTROUT4", "DTROUT5", "DTROUT6",
                "DTROUT7",
            ],
        ),
        "USRMCLK" => (&["USRMCLKI", "USRMCLKTS"], &["USRMCLKO"]),
        _ => unreachable!("unknown misc bel {name}"),
    };
    let mut bel = make_bel(graph, x, y, name, name, 0);
    for pin in ins {
        graph.add_bel_input(&mut bel, pin, x, y, &format!("J{pin}_{name}"));
    }
    for pin in outs {
        graph.add_bel_output(&mut bel, pin, x, y, &format!("J{pin}_{name}"));
    }
    graph.add_bel(bel);
}

/// Edge-clocking bels (dividers, syncs, buffers, delay lines, DQS). `i` is
/// the instance index at the cell; `bank` tags the wire names of instances
/// tied to a specific I/O bank.
pub fn add_ioclk_bel(
    graph: &mut RoutingGraph,
    name: &str,
    x: i32,
    y: i32,
    i: usize,
    bank: Option<u32>,
) {
    let (ins, outs): (&[&str], &[&str]) = match name {
        "CLKDIVF" => (&["CLKI", "RST", "ALIGNWD"], &["CDIVX"]),
        "ECLKSYNCB" => (&["ECLKI", "STOP"], &["ECLKO"]),
        "TRELLIS_ECLKBUF" => (&["ECLKI"], &["ECLKO"]),
        "DLLDELD" => (&["A", "DDRDEL", "LOADN", "MOVE", "DIRECTION"], &["Z", "CFLAG"]),
        "ECLKBRIDGECS" => (&["CLK0", "CLK1", "SEL"], &["ECLKOUT"]),
        "BRGECLKSYNC" => (&["ECLKI", "STOP"], &["ECLKO"]),
        "DDRDLL" => (&["CLK", "RST", "UDDCNTLN", "FREEZE"], &["DDRDEL", "DIVOSC", "LOCK"]),
        "DQSBUFM" => (
            &["DQSI", "READ0", "READ1", "READCLKSEL0", "READCLKSEL1", "RST", "SCLK", "ECLK"],
            &[
                "DQSR90", "DQSW", "DQSW270", "RDPNTR0", "RDPNTR1", "RDPNTR2", "WRPNTR0",
                "WRPNTR1", "WRPNTR2", "DATAVALID",
            ],
        ),
        _ => unreachable!("unknown ioclk bel {name}"),
    };
    let wire = |pin: &str| match bank {
        Some(b) => format!("J{pin}_{name}{i}_BK{b}"),
        None => format!("J{pin}_{name}{i}"),
    };
    let mut bel = make_bel(graph, x, y, &format!("{name}{i}"), name, i);
    for pin in ins {
        graph.add_bel_input(&mut bel, pin, x, y, &wire(pin));
    }
    for pin in outs {
        graph.add_bel_output(&mut bel, pin, x, y, &wire(pin));
    }
    graph.add_bel(bel);
}

#[cfg(test)]
mod tests {
    use chipgraph_interconnect::{Location, PinDir, RoutingGraph};

    use super::*;

    #[test]
    fn slice_topology_is_fixed() {
        let mut g = RoutingGraph::new();
        add_slice(&mut g, 3, 2, 0);
        let loc = Location::new(3, 2);
        let bel = g.bel(loc, "SLICEA").unwrap();
        // 2 × (4 LUT + M + WD in, F/Q/OFX out) + WAD0-3 + WRE/WCK/CLK/LSR/CE/FCI/FCO
        assert_eq!(bel.pins.len(), 29);
        let a0 = g.get_ident("A0").unwrap();
        let (wire, dir) = bel.pins[&a0];
        assert_eq!(dir, PinDir::Input);
        assert_eq!(g.to_str(wire.ident), "A0_SLICE");
        assert_eq!(wire.loc, loc);
        let f1 = g.get_ident("F1").unwrap();
        let (wire, dir) = bel.pins[&f1];
        assert_eq!(dir, PinDir::Output);
        assert_eq!(g.to_str(wire.ident), "F1");
    }

    #[test]
    fn slices_at_one_cell_do_not_collide() {
        let mut g = RoutingGraph::new();
        for z in 0..4 {
            add_slice(&mut g, 0, 0, z);
        }
        let tile = g.tile(Location::new(0, 0)).unwrap();
        assert_eq!(tile.bels.len(), 4);
        // each slice's LUT inputs are distinct wires
        for lc in 0..8 {
            assert!(g.wire(Location::new(0, 0), &format!("A{lc}_SLICE")).is_some());
        }
    }

    #[test]
    fn iologic_shares_pio_wires() {
        let mut g = RoutingGraph::new();
        add_pio(&mut g, 5, 5, 1);
        add_iologic(&mut g, 5, 5, 1, false);
        let loc = Location::new(5, 5);
        let w = g.wire(loc, "IOLDO1_PIO").unwrap();
        assert_eq!(w.belpins_downhill.len(), 1);
        assert_eq!(w.belpins_uphill.len(), 1);
        let w = g.wire(loc, "JPADDI1_PIO").unwrap();
        assert_eq!(w.belpins_uphill.len(), 1);
        assert_eq!(w.belpins_downhill.len(), 1);
    }

    #[test]
    fn ioclk_bank_tags_wires() {
        let mut g = RoutingGraph::new();
        add_ioclk_bel(&mut g, "ECLKSYNCB", 1, 1, 0, Some(7));
        add_ioclk_bel(&mut g, "ECLKSYNCB", 1, 1, 1, None);
        let loc = Location::new(1, 1);
        assert!(g.wire(loc, "JECLKO_ECLKSYNCB0_BK7").is_some());
        assert!(g.wire(loc, "JECLKO_ECLKSYNCB1").is_some());
    }
}
