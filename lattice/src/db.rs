//! Seams to the external device-geometry and bit-database collaborators.
//!
//! Persistent storage and on-disk formats live entirely behind these traits;
//! the core only consumes already-resident data.

use chipgraph_interconnect::RoutingGraph;

use crate::chip::{ChipInfo, TileInfo};
use crate::globals::GlobalsInfo;

/// Key of one tile type's entry in the bit database.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TileLocator<'a> {
    pub family: &'a str,
    pub device: &'a str,
    pub tile_type: &'a str,
}

/// Resolves devices and hands out their geometry.
pub trait DeviceSource {
    /// Opaque device descriptor.
    type Device;

    fn device_by_name(&self, name: &str) -> Option<Self::Device>;
    fn device_by_idcode(&self, idcode: u32) -> Option<Self::Device>;
    fn chip_info(&self, dev: &Self::Device) -> ChipInfo;
    fn tile_grid(&self, dev: &Self::Device) -> Vec<TileInfo>;
    /// The family's global clock network descriptor, where the family has
    /// one.
    fn globals(&self, dev: &Self::Device) -> Option<GlobalsInfo>;
}

/// One tile type's routing bit-mappings.
pub trait TileBits {
    /// Imports this tile type's routing resources into the graph. Entirely
    /// owned by the bit database; the dispatch engine treats it as opaque.
    fn add_routing(&self, tile: &TileInfo, graph: &mut RoutingGraph);
}

/// The bit database: per-(family, device, tile type) routing importers.
pub trait BitSource {
    fn tile_bits(&self, locator: &TileLocator<'_>) -> &dyn TileBits;
}
