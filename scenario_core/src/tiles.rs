//! Static tile catalog.
//!
//! Tile codes are the integers stored in a template's grid. Codes that are not
//! in the catalog classify as [`SurfaceType::Building`] so an unknown tile can
//! never become a placement target.

use bitflags::bitflags;
use scenario_schema::SurfaceType;

bitflags! {
    /// Who a tile is normally used by.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TileUsage: u8 {
        const VEHICLE = 0b0000_0001;
        const PEDESTRIAN = 0b0000_0010;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDefinition {
    pub code: u16,
    pub name: &'static str,
    pub interactive: bool,
    pub surface: SurfaceType,
    pub usage: TileUsage,
}

const fn def(code: u16, name: &'static str, surface: SurfaceType, usage: TileUsage) -> TileDefinition {
    TileDefinition {
        code,
        name,
        interactive: !matches!(surface, SurfaceType::Building),
        surface,
        usage,
    }
}

const NONE: TileUsage = TileUsage::empty();
const VEHICLE: TileUsage = TileUsage::VEHICLE;
const PEDESTRIAN: TileUsage = TileUsage::PEDESTRIAN;
const SHARED: TileUsage = TileUsage::VEHICLE.union(TileUsage::PEDESTRIAN);

// Indexed by code; `tile` relies on `TILE_CATALOG[code].code == code`.
pub const TILE_CATALOG: &[TileDefinition] = &[
    def(0, "Roof", SurfaceType::Building, NONE),
    def(1, "Building Edge Top", SurfaceType::Building, NONE),
    def(2, "Building Edge Bottom", SurfaceType::Building, NONE),
    def(3, "Sidewalk Top", SurfaceType::Walkable, PEDESTRIAN),
    def(4, "Sidewalk Bottom", SurfaceType::Walkable, PEDESTRIAN),
    def(5, "Sidewalk Corner Top-Right", SurfaceType::Walkable, PEDESTRIAN),
    def(6, "Sidewalk Corner Bottom-Right", SurfaceType::Walkable, PEDESTRIAN),
    def(7, "Sidewalk Corner Top-Left", SurfaceType::Walkable, PEDESTRIAN),
    def(8, "Sidewalk Corner Bottom-Left", SurfaceType::Walkable, PEDESTRIAN),
    def(9, "Asphalt Horizontal", SurfaceType::Drivable, VEHICLE),
    def(10, "Asphalt Vertical", SurfaceType::Drivable, VEHICLE),
    def(11, "Intersection Box", SurfaceType::Drivable, VEHICLE),
    def(12, "Yellow Line Dash", SurfaceType::Restricted, VEHICLE),
    def(13, "Double Yellow Horizontal", SurfaceType::Restricted, VEHICLE),
    def(14, "Double Yellow Vertical", SurfaceType::Restricted, VEHICLE),
    def(15, "Crosswalk Vertical", SurfaceType::Drivable, SHARED),
    def(16, "Crosswalk Horizontal", SurfaceType::Drivable, SHARED),
    def(17, "Yellow Line Vertical", SurfaceType::Restricted, VEHICLE),
    def(18, "Yellow Line Horizontal", SurfaceType::Restricted, VEHICLE),
    def(19, "Sidewalk Left", SurfaceType::Walkable, PEDESTRIAN),
    def(20, "Sidewalk Right", SurfaceType::Walkable, PEDESTRIAN),
];

pub fn tile(code: u16) -> Option<&'static TileDefinition> {
    TILE_CATALOG
        .get(code as usize)
        .filter(|definition| definition.code == code)
}

pub fn classify(code: u16) -> SurfaceType {
    tile(code)
        .map(|definition| definition.surface)
        .unwrap_or(SurfaceType::Building)
}

/// Catalog codes with the given surface, ascending.
pub fn codes_for(surface: SurfaceType) -> Vec<u16> {
    TILE_CATALOG
        .iter()
        .filter(|definition| definition.surface == surface)
        .map(|definition| definition.code)
        .collect()
}
