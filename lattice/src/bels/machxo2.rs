//! MachXO2 primitive builders. No LUT permutation crossbar on this family;
//! the logic cell inputs still sit on `*_SLICE` wires for uniformity with
//! the routing bit-mappings.

use chipgraph_interconnect::RoutingGraph;

use super::make_bel;

const LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn add_lc(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let l = LETTERS[z];
    let mut bel = make_bel(graph, x, y, &format!("SLICE{l}"), "SLICE", z);
    for k in 0..2 {
        let lc = z * 2 + k;
        for inp in LETTERS {
            graph.add_bel_input(&mut bel, &format!("{inp}{k}"), x, y, &format!("{inp}{lc}_SLICE"));
        }
        graph.add_bel_input(&mut bel, &format!("M{k}"), x, y, &format!("M{lc}_SLICE"));
        graph.add_bel_input(&mut bel, &format!("DI{k}"), x, y, &format!("DI{lc}_SLICE"));
        graph.add_bel_output(&mut bel, &format!("F{k}"), x, y, &format!("F{lc}"));
        graph.add_bel_output(&mut bel, &format!("Q{k}"), x, y, &format!("Q{lc}"));
        graph.add_bel_output(&mut bel, &format!("OFX{k}"), x, y, &format!("OFX{lc}"));
    }
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
    graph.add_bel_output(&mut bel, "JPADDI", x, y, &format!("JPADDI{z}_PIO"));
    graph.add_bel(bel);
}

pub fn add_dcc(graph: &mut RoutingGraph, x: i32, y: i32, z: usize) {
    let mut bel = make_bel(graph, x, y, &format!("DCC{z}"), "DCC", z);
    graph.add_bel_input(&mut bel, "CLKI", x, y, &format!("JCLKI_DCC{z}"));
    graph.add_bel_input(&mut bel, "CE", x, y, &format!("JCE_DCC{z}"));
    graph.add_bel_output(&mut bel, "CLKO", x, y, &format!("JCLKO_DCC{z}"));
    graph.add_bel(bel);
}

/// Clock mux. `z_name` indexes the bel name, `z_wire` the wire names; the
/// two run on different sequences at the center tile.
pub fn add_dcm(graph: &mut RoutingGraph, x: i32, y: i32, z_name: usize, z_wire: usize) {
    let mut bel = make_bel(graph, x, y, &format!("DCM{z_name}"), "DCM", z_name);
    graph.add_bel_input(&mut bel, "CLK0", x, y, &format!("JCLK0_DCM{z_wire}"));
    graph.add_bel_input(&mut bel, "CLK1", x, y, &format!("JCLK1_DCM{z_wire}"));
    graph.add_bel_input(&mut bel, "SEL", x, y, &format!("JSEL_DCM{z_wire}"));
    graph.add_bel_output(&mut bel, "DCMOUT", x, y, &format!("JDCMOUT_DCM{z_wire}"));
    graph.add_bel(bel);
}

pub fn add_osch(graph: &mut RoutingGraph, x: i32, y: i32) {
    let mut bel = make_bel(graph, x, y, "OSCH", "OSCH", 0);
    graph.add_bel_input(&mut bel, "STDBY", x, y, "JSTDBY_OSCH");
    graph.add_bel_output(&mut bel, "OSC", x, y, "JOSC_OSCH");
    graph.add_bel_output(&mut bel, "SEDSTDBY", x, y, "JSEDSTDBY_OSCH");
    graph.add_bel(bel);
}

#[cfg(test)]
mod tests {
    use chipgraph_interconnect::{Location, PinDir, RoutingGraph};

    use super::*;

    #[test]
    fn lc_topology_is_fixed() {
        let mut g = RoutingGraph::new();
        add_lc(&mut g, 4, 7, 2);
        let loc = Location::new(4, 7);
        let bel = g.bel(loc, "SLICEC").unwrap();
        // 2 × (4 LUT + M + DI in, F/Q/OFX out) + CLK/LSR/CE/FCI/FCO
        assert_eq!(bel.pins.len(), 23);
        let a0 = g.get_ident("A0").unwrap();
        let (_, dir) = bel.pins[&a0];
        assert_eq!(dir, PinDir::Input);
        assert!(g.wire(loc, "A4_SLICE").is_some());
        assert!(g.wire(loc, "F5").is_some());
    }

    #[test]
    fn dcm_name_and_wire_indices_are_independent() {
        let mut g = RoutingGraph::new();
        add_dcm(&mut g, 0, 0, 6, 8);
        let loc = Location::new(0, 0);
        let bel = g.bel(loc, "DCM6").unwrap();
        assert_eq!(bel.z, 6);
        assert!(g.wire(loc, "JDCMOUT_DCM8").is_some());
        assert!(g.wire(loc, "JDCMOUT_DCM6").is_none());
    }

    #[test]
    fn nine_dccs_coexist_at_center() {
        let mut g = RoutingGraph::new();
        for z in 0..9 {
            add_dcc(&mut g, 12, 12, z);
        }
        let tile = g.tile(Location::new(12, 12)).unwrap();
        assert_eq!(tile.bels.len(), 9);
    }
}
