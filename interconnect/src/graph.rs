use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use unnamed_entity::{EntityVec, entity_id};

use crate::lutperm::LutPermFlags;

entity_id! {
    pub id IdentId u32;
}

/// A graph cell coordinate. `x` is the tile column and `y` the tile row;
/// see `TileInfo::loc` in the chip crates for the one place the (row, col)
/// order gets transposed into this type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Location { x, y }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X{x}Y{y}", x = self.x, y = self.y)
    }
}

/// Unique key of a wire, arc or bel: a cell plus an interned name.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct RoutingId {
    pub loc: Location,
    pub ident: IdentId,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PinDir {
    Input,
    Output,
    InOut,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoutingArc {
    pub ident: IdentId,
    pub source: RoutingId,
    pub sink: RoutingId,
    /// Tile type that owns the arc's configuration bits (or would, for
    /// fixed arcs).
    pub tile_type: IdentId,
    /// `false` for always-present topology (fixed wiring, pseudo-arcs).
    pub configurable: bool,
    /// Packed permutation word; 0 when the arc is not a LUT permutation
    /// pseudo-arc. Kept packed here for downstream consumers; use
    /// [`RoutingArc::lutperm`] everywhere else.
    pub lutperm_flags: u16,
}

impl RoutingArc {
    pub fn lutperm(&self) -> Option<LutPermFlags> {
        LutPermFlags::unpack(self.lutperm_flags)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoutingWire {
    pub uphill: Vec<RoutingId>,
    pub downhill: Vec<RoutingId>,
    pub belpins_uphill: Vec<(RoutingId, IdentId)>,
    pub belpins_downhill: Vec<(RoutingId, IdentId)>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoutingBel {
    pub ident: IdentId,
    pub bel_type: IdentId,
    pub loc: Location,
    pub z: u8,
    pub pins: BTreeMap<IdentId, (RoutingId, PinDir)>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoutingTile {
    pub wires: BTreeMap<IdentId, RoutingWire>,
    pub arcs: BTreeMap<IdentId, RoutingArc>,
    pub bels: BTreeMap<IdentId, RoutingBel>,
}

/// The per-chip routing resource graph. Owns its name-interning pool;
/// `IdentId`s from one graph are meaningless in another.
#[derive(Clone, Debug, Default)]
pub struct RoutingGraph {
    names: EntityVec<IdentId, String>,
    name_idx: HashMap<String, IdentId>,
    pub tiles: BTreeMap<Location, RoutingTile>,
}

impl RoutingGraph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn ident(&mut self, name: &str) -> IdentId {
        if let Some(&id) = self.name_idx.get(name) {
            return id;
        }
        let id = self.names.push(name.to_string());
        self.name_idx.insert(name.to_string(), id);
        id
    }

    pub fn get_ident(&self, name: &str) -> Option<IdentId> {
        self.name_idx.get(name).copied()
    }

    pub fn to_str(&self, id: IdentId) -> &str {
        &self.names[id]
    }

    pub fn id_at(&mut self, loc: Location, name: &str) -> RoutingId {
        RoutingId {
            loc,
            ident: self.ident(name),
        }
    }

    pub fn tile(&self, loc: Location) -> Option<&RoutingTile> {
        self.tiles.get(&loc)
    }

    fn tile_mut(&mut self, loc: Location) -> &mut RoutingTile {
        self.tiles.entry(loc).or_default()
    }

    /// Ensures a wire exists; wires are created on first reference.
    pub fn add_wire(&mut self, loc: Location, name: &str) -> RoutingId {
        let id = self.id_at(loc, name);
        self.touch_wire(id);
        id
    }

    fn touch_wire(&mut self, id: RoutingId) {
        self.tile_mut(id.loc).wires.entry(id.ident).or_default();
    }

    pub fn wire(&self, loc: Location, name: &str) -> Option<&RoutingWire> {
        let id = self.get_ident(name)?;
        self.tiles.get(&loc)?.wires.get(&id)
    }

    /// Inserts an arc at `loc`, materializing its source and sink wires and
    /// linking it onto their downhill/uphill lists.
    pub fn add_arc(&mut self, loc: Location, arc: RoutingArc) {
        let arc_id = RoutingId {
            loc,
            ident: arc.ident,
        };
        self.touch_wire(arc.source);
        self.touch_wire(arc.sink);
        self.tile_mut(arc.source.loc)
            .wires
            .get_mut(&arc.source.ident)
            .unwrap()
            .downhill
            .push(arc_id);
        self.tile_mut(arc.sink.loc)
            .wires
            .get_mut(&arc.sink.ident)
            .unwrap()
            .uphill
            .push(arc_id);
        self.tile_mut(loc).arcs.insert(arc.ident, arc);
    }

    pub fn arc(&self, loc: Location, name: &str) -> Option<&RoutingArc> {
        let id = self.get_ident(name)?;
        self.tiles.get(&loc)?.arcs.get(&id)
    }

    pub fn add_bel(&mut self, bel: RoutingBel) {
        self.tile_mut(bel.loc).bels.insert(bel.ident, bel);
    }

    pub fn bel(&self, loc: Location, name: &str) -> Option<&RoutingBel> {
        let id = self.get_ident(name)?;
        self.tiles.get(&loc)?.bels.get(&id)
    }

    /// Binds a bel input pin to a wire, creating the wire if needed. The bel
    /// is passed by reference so builders can assemble it before insertion.
    pub fn add_bel_input(
        &mut self,
        bel: &mut RoutingBel,
        pin: &str,
        wire_x: i32,
        wire_y: i32,
        wire: &str,
    ) {
        let wire_id = self.add_wire(Location::new(wire_x, wire_y), wire);
        let pin = self.ident(pin);
        let bel_id = RoutingId {
            loc: bel.loc,
            ident: bel.ident,
        };
        self.tile_mut(wire_id.loc)
            .wires
            .get_mut(&wire_id.ident)
            .unwrap()
            .belpins_downhill
            .push((bel_id, pin));
        bel.pins.insert(pin, (wire_id, PinDir::Input));
    }

    /// Binds a bel output pin to a wire it drives.
    pub fn add_bel_output(
        &mut self,
        bel: &mut RoutingBel,
        pin: &str,
        wire_x: i32,
        wire_y: i32,
        wire: &str,
    ) {
        let wire_id = self.add_wire(Location::new(wire_x, wire_y), wire);
        let pin = self.ident(pin);
        let bel_id = RoutingId {
            loc: bel.loc,
            ident: bel.ident,
        };
        self.tile_mut(wire_id.loc)
            .wires
            .get_mut(&wire_id.ident)
            .unwrap()
            .belpins_uphill
            .push((bel_id, pin));
        bel.pins.insert(pin, (wire_id, PinDir::Output));
    }
}
