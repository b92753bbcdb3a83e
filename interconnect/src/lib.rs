pub mod graph;
pub mod lutperm;

pub use graph::{
    IdentId, Location, PinDir, RoutingArc, RoutingBel, RoutingGraph, RoutingId, RoutingTile,
    RoutingWire,
};
pub use lutperm::LutPermFlags;
