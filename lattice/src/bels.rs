//! Primitive element builders.
//!
//! Each builder is a pure procedure that inserts one bel instance — a fixed
//! set of named pins bound to tile wires — into a routing graph at a given
//! cell. Topology depends only on the arguments, so builders are testable
//! on an empty graph, and every sub-index uses distinct names so repeated
//! invocations at one cell coexist.

use std::collections::BTreeMap;

use chipgraph_interconnect::{Location, RoutingBel, RoutingGraph};

pub mod ecp5;
pub mod machxo2;

pub(crate) fn make_bel(
    graph: &mut RoutingGraph,
    x: i32,
    y: i32,
    name: &str,
    bel_type: &str,
    z: usize,
) -> RoutingBel {
    RoutingBel {
        ident: graph.ident(name),
        bel_type: graph.ident(bel_type),
        loc: Location::new(x, y),
        z: z as u8,
        pins: BTreeMap::new(),
    }
}
