use std::collections::BTreeMap;

use chipgraph_interconnect::Location;
use chipgraph_types::{Cram, CramDelta};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::db::DeviceSource;
use crate::error::ChipError;
use crate::globals::GlobalsInfo;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum ChipKind {
    Ecp5,
    MachXo2,
}

impl ChipKind {
    pub fn from_family(family: &str) -> Result<Self, ChipError> {
        match family {
            "ECP5" => Ok(ChipKind::Ecp5),
            "MachXO2" => Ok(ChipKind::MachXo2),
            _ => Err(ChipError::UnknownFamily(family.to_string())),
        }
    }
}

impl std::fmt::Display for ChipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChipKind::Ecp5 => write!(f, "ECP5"),
            ChipKind::MachXo2 => write!(f, "MachXO2"),
        }
    }
}

/// Immutable per-device constants, as supplied by the device source. The
/// family is kept as the raw tag; both chip construction and graph
/// construction validate it through [`ChipInfo::kind`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChipInfo {
    pub family: String,
    pub name: String,
    pub idcode: u32,
    pub num_frames: usize,
    pub bits_per_frame: usize,
    pub max_row: u32,
    pub max_col: u32,
}

impl ChipInfo {
    pub fn kind(&self) -> Result<ChipKind, ChipError> {
        ChipKind::from_family(&self.family)
    }
}

/// Identity of one tile instance plus the shape of its configuration bit
/// region.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TileInfo {
    pub name: String,
    pub tile_type: String,
    pub row: u32,
    pub col: u32,
    pub num_frames: usize,
    pub bits_per_frame: usize,
}

impl TileInfo {
    /// The tile's cell in the routing graph. This is the one place where
    /// (row, col) order turns into (x, y): `x` is the **column** and `y`
    /// the **row**. All per-family offset rules are applied to the result,
    /// never to raw row/col pairs.
    pub fn loc(&self) -> Location {
        Location::new(self.col as i32, self.row as i32)
    }
}

/// One physical tile and its configuration bits.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub info: TileInfo,
    pub cram: Cram,
}

impl Tile {
    pub fn new(info: TileInfo) -> Self {
        let cram = Cram::new(info.num_frames, info.bits_per_frame);
        Tile { info, cram }
    }
}

/// Tile-by-tile bit difference between two same-layout chips; only tiles
/// with a non-empty difference appear.
pub type ChipDelta = BTreeMap<String, CramDelta>;

/// A whole-device snapshot: device constants, all tiles (owned, by name),
/// a sparse positional index, and the family's global clock network
/// descriptor where one exists.
#[derive(Clone, Debug)]
pub struct Chip {
    pub info: ChipInfo,
    pub tiles: BTreeMap<String, Tile>,
    /// (row, col) → (tile name, tile type). A secondary non-owning index;
    /// grows as tiles are discovered, so ragged grids need no pre-known
    /// size.
    pub tiles_by_loc: BTreeMap<(u32, u32), Vec<(String, String)>>,
    pub globals: Option<GlobalsInfo>,
}

impl Chip {
    pub fn from_name<D: DeviceSource>(db: &D, name: &str) -> Result<Chip, ChipError> {
        let dev = db
            .device_by_name(name)
            .ok_or_else(|| ChipError::DeviceNotFound(name.to_string()))?;
        Chip::from_device(db, &dev)
    }

    pub fn from_idcode<D: DeviceSource>(db: &D, idcode: u32) -> Result<Chip, ChipError> {
        let dev = db
            .device_by_idcode(idcode)
            .ok_or_else(|| ChipError::DeviceNotFound(format!("idcode {idcode:#010x}")))?;
        Chip::from_device(db, &dev)
    }

    pub fn from_device<D: DeviceSource>(db: &D, dev: &D::Device) -> Result<Chip, ChipError> {
        let info = db.chip_info(dev);
        info.kind()?;
        let mut tiles = BTreeMap::new();
        let mut tiles_by_loc: BTreeMap<(u32, u32), Vec<(String, String)>> = BTreeMap::new();
        for ti in db.tile_grid(dev) {
            tiles_by_loc
                .entry((ti.row, ti.col))
                .or_default()
                .push((ti.name.clone(), ti.tile_type.clone()));
            tiles.insert(ti.name.clone(), Tile::new(ti));
        }
        let globals = db.globals(dev);
        Ok(Chip {
            info,
            tiles,
            tiles_by_loc,
            globals,
        })
    }

    pub fn tile_by_name(&self, name: &str) -> Result<&Tile, ChipError> {
        self.tiles
            .get(name)
            .ok_or_else(|| ChipError::TileNotFound(name.to_string()))
    }

    pub fn tile_by_name_mut(&mut self, name: &str) -> Result<&mut Tile, ChipError> {
        self.tiles
            .get_mut(name)
            .ok_or_else(|| ChipError::TileNotFound(name.to_string()))
    }

    pub fn tiles_by_position(&self, row: u32, col: u32) -> Vec<&Tile> {
        let Some(entries) = self.tiles_by_loc.get(&(row, col)) else {
            return vec![];
        };
        entries
            .iter()
            .map(|(name, _)| &self.tiles[name])
            .collect_vec()
    }

    pub fn tiles_by_type(&self, tile_type: &str) -> Vec<&Tile> {
        self.tiles
            .values()
            .filter(|t| t.info.tile_type == tile_type)
            .collect_vec()
    }

    /// Finds the single tile at (row, col) whose type is one of `types`,
    /// returning its name.
    pub fn tile_by_position_and_type(
        &self,
        row: u32,
        col: u32,
        types: &[&str],
    ) -> Result<&str, ChipError> {
        if let Some(entries) = self.tiles_by_loc.get(&(row, col)) {
            for (name, ty) in entries {
                if types.contains(&ty.as_str()) {
                    return Ok(name);
                }
            }
        }
        Err(ChipError::NoTileOfType {
            row,
            col,
            types: types.iter().map(|t| t.to_string()).collect(),
        })
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn max_row(&self) -> u32 {
        self.info.max_row
    }

    pub fn max_col(&self) -> u32 {
        self.info.max_col
    }

    /// Bit-level difference against another chip of identical tile layout.
    /// A tile name missing from `other` fails fast; it is never skipped.
    pub fn delta(&self, other: &Chip) -> Result<ChipDelta, ChipError> {
        let mut res = ChipDelta::new();
        for (name, tile) in &self.tiles {
            let other_tile = other
                .tiles
                .get(name)
                .ok_or_else(|| ChipError::LayoutMismatch(name.clone()))?;
            let cd = tile.cram.delta(&other_tile.cram);
            if !cd.is_empty() {
                res.insert(name.clone(), cd);
            }
        }
        Ok(res)
    }
}

impl std::fmt::Display for Chip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\tDEVICE: {n} ({fam})", n = self.info.name, fam = self.info.family)?;
        writeln!(f, "\tIDCODE: {idcode:#010x}", idcode = self.info.idcode)?;
        writeln!(
            f,
            "\tGRID: R{r}C{c}",
            r = self.info.max_row,
            c = self.info.max_col
        )?;
        writeln!(f, "\tTILES: {n}", n = self.tiles.len())?;
        Ok(())
    }
}
