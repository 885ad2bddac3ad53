//! Block descriptor table: maps compact block ids to static rendering and
//! gameplay metadata.
//!
//! The table is a plain array indexed by id so that the generator and the
//! mesher consult it uniformly instead of branching per block type. Air is
//! always id 0 so that zero-initialised buffers represent empty space.
//! Unknown ids resolve to [`MISSING`].

use serde::{Deserialize, Serialize};

/// How a block occludes its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opacity {
    /// Fully hides adjacent faces.
    Opaque,
    /// Alpha-tested geometry (leaves, plants, glass).
    Cutout,
    /// Blended geometry that is not a liquid.
    Translucent,
    /// Liquid volume, meshed into the liquid geometry set.
    Liquid,
    /// Never meshed (air).
    Invisible,
}

/// Liquid family. Two cells are "the same liquid" when their kinds match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidKind {
    Water,
    Lava,
}

/// How the auxiliary field modulates a block's vertex brightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalRender {
    /// Aux field is ignored.
    None,
    /// Brightness ramps with the 0–15 power level.
    Wire,
    /// Full brightness when powered, dim otherwise.
    Lamp,
    /// Always powered source.
    Emitter,
}

/// Vertex sway weighting for foliage animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sway {
    None,
    /// Anchored at the bottom, weighted by vertical position within the cell.
    Rooted,
    /// Uniform sway for canopy blocks.
    Canopy,
}

/// Minimum tool tier needed to harvest a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ToolRequirement {
    None,
    Wood,
    Stone,
    Iron,
    Diamond,
    Unbreakable,
}

/// Static descriptor for a block type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockDescriptor {
    /// Human-readable name (e.g. "stone", "grass").
    pub name: &'static str,
    pub opacity: Opacity,
    /// Whether entities collide with this block.
    pub solid: bool,
    pub liquid: Option<LiquidKind>,
    /// Light emission level (0 = none, 15 = max).
    pub emission: u8,
    pub signal: SignalRender,
    /// Small decorative geometry dropped at the coarsest mesh LOD.
    pub decorative: bool,
    /// Growth stage, stored in the aux bits, at which a decorative crop is
    /// fully grown and kept at every LOD. `None` for non-crops.
    pub mature_stage: Option<u8>,
    pub sway: Sway,
    /// Lower bound on the ambient-occlusion multiplier for this block.
    pub ao_floor: f32,
    /// Base vertex colour multiplier.
    pub tint: [f32; 3],
    pub tool: ToolRequirement,
}

impl BlockDescriptor {
    const fn opaque(name: &'static str, tool: ToolRequirement) -> Self {
        Self {
            name,
            opacity: Opacity::Opaque,
            solid: true,
            liquid: None,
            emission: 0,
            signal: SignalRender::None,
            decorative: false,
            mature_stage: None,
            sway: Sway::None,
            ao_floor: 0.0,
            tint: [1.0, 1.0, 1.0],
            tool,
        }
    }

    const fn plant(name: &'static str, decorative: bool) -> Self {
        Self {
            name,
            opacity: Opacity::Cutout,
            solid: false,
            liquid: None,
            emission: 0,
            signal: SignalRender::None,
            decorative,
            mature_stage: None,
            sway: Sway::Rooted,
            ao_floor: 0.0,
            tint: [1.0, 1.0, 1.0],
            tool: ToolRequirement::None,
        }
    }

    const fn crop(name: &'static str, mature_stage: u8) -> Self {
        Self {
            mature_stage: Some(mature_stage),
            ..Self::plant(name, true)
        }
    }

    const fn liquid(name: &'static str, kind: LiquidKind, emission: u8) -> Self {
        Self {
            name,
            opacity: Opacity::Liquid,
            solid: false,
            liquid: Some(kind),
            emission,
            signal: SignalRender::None,
            decorative: false,
            mature_stage: None,
            sway: Sway::None,
            ao_floor: 0.0,
            tint: [1.0, 1.0, 1.0],
            tool: ToolRequirement::Unbreakable,
        }
    }

    const fn with_emission(mut self, emission: u8) -> Self {
        self.emission = emission;
        self
    }

    const fn with_ao_floor(mut self, ao_floor: f32) -> Self {
        self.ao_floor = ao_floor;
        self
    }

    const fn with_tint(mut self, tint: [f32; 3]) -> Self {
        self.tint = tint;
        self
    }

    const fn with_signal(mut self, signal: SignalRender) -> Self {
        self.signal = signal;
        self
    }

    /// Returns `true` if this block fully hides the faces of its neighbours.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.opacity == Opacity::Opaque
    }

    /// Returns `true` if this block produces no geometry.
    #[inline]
    pub fn is_invisible(&self) -> bool {
        self.opacity == Opacity::Invisible
    }

    /// Returns `true` if this block is a liquid.
    #[inline]
    pub fn is_liquid(&self) -> bool {
        self.liquid.is_some()
    }

    /// Returns `true` if a cell of this block with the given aux value is
    /// skipped at the coarsest LOD: decorative plants, and crops still
    /// short of their mature stage.
    pub fn dropped_at_far(&self, aux: u8) -> bool {
        self.decorative && self.mature_stage.is_none_or(|stage| aux < stage)
    }
}

pub const AIR: u16 = 0;
pub const STONE: u16 = 1;
pub const GRASS: u16 = 2;
pub const DIRT: u16 = 3;
pub const COBBLESTONE: u16 = 4;
pub const PLANKS: u16 = 5;
pub const SAND: u16 = 6;
pub const GRAVEL: u16 = 7;
pub const BEDROCK: u16 = 8;
pub const WATER: u16 = 9;
pub const LAVA: u16 = 10;
pub const LOG: u16 = 11;
pub const LEAVES: u16 = 12;
pub const SANDSTONE: u16 = 13;
pub const SNOW: u16 = 14;
pub const ICE: u16 = 15;
pub const COAL_ORE: u16 = 16;
pub const IRON_ORE: u16 = 17;
pub const GOLD_ORE: u16 = 18;
pub const DIAMOND_ORE: u16 = 19;
pub const EMERALD_ORE: u16 = 20;
pub const REDSTONE_ORE: u16 = 21;
pub const LAPIS_ORE: u16 = 22;
pub const TALL_GRASS: u16 = 23;
pub const RED_FLOWER: u16 = 24;
pub const YELLOW_FLOWER: u16 = 25;
pub const CACTUS: u16 = 26;
pub const PUMPKIN: u16 = 27;
pub const NETHERRACK: u16 = 28;
pub const SOUL_SAND: u16 = 29;
pub const GLOWSTONE: u16 = 30;
pub const NETHER_BRICK: u16 = 31;
pub const END_STONE: u16 = 32;
pub const OBSIDIAN: u16 = 33;
pub const REDSTONE_WIRE: u16 = 34;
pub const REDSTONE_LAMP: u16 = 35;
pub const REDSTONE_TORCH: u16 = 36;
pub const WHEAT: u16 = 37;

/// Aux growth stage of fully grown wheat.
pub const WHEAT_MATURE_STAGE: u8 = 7;
pub const GLASS: u16 = 38;

/// Fallback for ids outside the table: an opaque magenta marker block.
pub const MISSING: BlockDescriptor =
    BlockDescriptor::opaque("missing", ToolRequirement::None).with_tint([1.0, 0.0, 1.0]);

const AIR_DESC: BlockDescriptor = BlockDescriptor {
    name: "air",
    opacity: Opacity::Invisible,
    solid: false,
    liquid: None,
    emission: 0,
    signal: SignalRender::None,
    decorative: false,
    mature_stage: None,
    sway: Sway::None,
    ao_floor: 0.0,
    tint: [1.0, 1.0, 1.0],
    tool: ToolRequirement::None,
};

const LEAVES_DESC: BlockDescriptor = BlockDescriptor {
    name: "leaves",
    opacity: Opacity::Cutout,
    solid: true,
    liquid: None,
    emission: 0,
    signal: SignalRender::None,
    decorative: false,
    mature_stage: None,
    sway: Sway::Canopy,
    ao_floor: 0.3,
    tint: [0.55, 0.8, 0.4],
    tool: ToolRequirement::None,
};

const GLASS_DESC: BlockDescriptor = BlockDescriptor {
    name: "glass",
    opacity: Opacity::Cutout,
    solid: true,
    liquid: None,
    emission: 0,
    signal: SignalRender::None,
    decorative: false,
    mature_stage: None,
    sway: Sway::None,
    ao_floor: 0.0,
    tint: [1.0, 1.0, 1.0],
    tool: ToolRequirement::None,
};

const WIRE_DESC: BlockDescriptor = BlockDescriptor {
    name: "redstone_wire",
    opacity: Opacity::Cutout,
    solid: false,
    liquid: None,
    emission: 0,
    signal: SignalRender::Wire,
    decorative: false,
    mature_stage: None,
    sway: Sway::None,
    ao_floor: 0.0,
    tint: [1.0, 0.1, 0.1],
    tool: ToolRequirement::None,
};

const TORCH_DESC: BlockDescriptor = BlockDescriptor {
    name: "redstone_torch",
    opacity: Opacity::Cutout,
    solid: false,
    liquid: None,
    emission: 7,
    signal: SignalRender::Emitter,
    decorative: false,
    mature_stage: None,
    sway: Sway::None,
    ao_floor: 0.0,
    tint: [1.0, 0.3, 0.3],
    tool: ToolRequirement::None,
};

static BLOCKS: [BlockDescriptor; 39] = [
    AIR_DESC,
    BlockDescriptor::opaque("stone", ToolRequirement::Wood),
    BlockDescriptor::opaque("grass", ToolRequirement::None)
        .with_ao_floor(0.55)
        .with_tint([0.6, 0.85, 0.45]),
    BlockDescriptor::opaque("dirt", ToolRequirement::None),
    BlockDescriptor::opaque("cobblestone", ToolRequirement::Wood),
    BlockDescriptor::opaque("planks", ToolRequirement::None),
    BlockDescriptor::opaque("sand", ToolRequirement::None),
    BlockDescriptor::opaque("gravel", ToolRequirement::None),
    BlockDescriptor::opaque("bedrock", ToolRequirement::Unbreakable),
    BlockDescriptor::liquid("water", LiquidKind::Water, 0).with_tint([0.25, 0.45, 0.9]),
    BlockDescriptor::liquid("lava", LiquidKind::Lava, 15),
    BlockDescriptor::opaque("log", ToolRequirement::None),
    LEAVES_DESC,
    BlockDescriptor::opaque("sandstone", ToolRequirement::Wood),
    BlockDescriptor::opaque("snow", ToolRequirement::None).with_ao_floor(0.5),
    BlockDescriptor {
        opacity: Opacity::Translucent,
        ..BlockDescriptor::opaque("ice", ToolRequirement::None)
    },
    BlockDescriptor::opaque("coal_ore", ToolRequirement::Wood),
    BlockDescriptor::opaque("iron_ore", ToolRequirement::Stone),
    BlockDescriptor::opaque("gold_ore", ToolRequirement::Iron),
    BlockDescriptor::opaque("diamond_ore", ToolRequirement::Iron),
    BlockDescriptor::opaque("emerald_ore", ToolRequirement::Iron),
    BlockDescriptor::opaque("redstone_ore", ToolRequirement::Iron),
    BlockDescriptor::opaque("lapis_ore", ToolRequirement::Stone),
    BlockDescriptor::plant("tall_grass", true).with_tint([0.55, 0.8, 0.4]),
    BlockDescriptor::plant("red_flower", true),
    BlockDescriptor::plant("yellow_flower", true),
    BlockDescriptor {
        opacity: Opacity::Cutout,
        sway: Sway::None,
        ..BlockDescriptor::opaque("cactus", ToolRequirement::None)
    },
    BlockDescriptor::opaque("pumpkin", ToolRequirement::None),
    BlockDescriptor::opaque("netherrack", ToolRequirement::Wood),
    BlockDescriptor::opaque("soul_sand", ToolRequirement::None),
    BlockDescriptor::opaque("glowstone", ToolRequirement::None).with_emission(15),
    BlockDescriptor::opaque("nether_brick", ToolRequirement::Wood),
    BlockDescriptor::opaque("end_stone", ToolRequirement::Wood),
    BlockDescriptor::opaque("obsidian", ToolRequirement::Diamond),
    WIRE_DESC,
    BlockDescriptor::opaque("redstone_lamp", ToolRequirement::None).with_signal(SignalRender::Lamp),
    TORCH_DESC,
    BlockDescriptor::crop("wheat", WHEAT_MATURE_STAGE),
    GLASS_DESC,
];

/// Returns the descriptor for a block id, or [`MISSING`] for unknown ids.
///
/// Any aux bits are ignored, so raw cells may be passed through [`crate::cell_id`]
/// or directly.
#[inline]
pub fn descriptor(id: u16) -> &'static BlockDescriptor {
    BLOCKS
        .get(crate::buffer::cell_id(id) as usize)
        .unwrap_or(&MISSING)
}

/// Returns `true` if the id is present in the table.
pub fn is_known(id: u16) -> bool {
    (crate::buffer::cell_id(id) as usize) < BLOCKS.len()
}

/// Returns the id for a block name, or `None` if not found.
pub fn lookup_by_name(name: &str) -> Option<u16> {
    BLOCKS
        .iter()
        .position(|desc| desc.name == name)
        .map(|i| i as u16)
}

/// Number of ids with a descriptor (including air).
pub fn block_count() -> usize {
    BLOCKS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_is_id_zero_and_invisible() {
        let air = descriptor(AIR);
        assert_eq!(air.name, "air");
        assert!(air.is_invisible());
        assert!(!air.solid);
    }

    #[test]
    fn test_constants_match_table_names() {
        let expected = [
            (STONE, "stone"),
            (GRASS, "grass"),
            (BEDROCK, "bedrock"),
            (WATER, "water"),
            (LAVA, "lava"),
            (LEAVES, "leaves"),
            (DIAMOND_ORE, "diamond_ore"),
            (NETHERRACK, "netherrack"),
            (END_STONE, "end_stone"),
            (REDSTONE_WIRE, "redstone_wire"),
            (GLASS, "glass"),
        ];
        for (id, name) in expected {
            assert_eq!(descriptor(id).name, name, "id {id}");
            assert_eq!(lookup_by_name(name), Some(id));
        }
    }

    #[test]
    fn test_names_are_unique() {
        for i in 0..block_count() {
            for j in (i + 1)..block_count() {
                assert_ne!(
                    descriptor(i as u16).name,
                    descriptor(j as u16).name,
                    "ids {i} and {j} share a name"
                );
            }
        }
    }

    #[test]
    fn test_unknown_id_falls_back_to_missing() {
        let desc = descriptor(4000);
        assert_eq!(desc.name, "missing");
        assert!(desc.is_opaque());
        assert!(!is_known(4000));
    }

    #[test]
    fn test_descriptor_ignores_aux_bits() {
        let raw = crate::buffer::pack_cell(REDSTONE_WIRE, 15);
        assert_eq!(descriptor(raw).name, "redstone_wire");
    }

    #[test]
    fn test_liquids_and_decoratives() {
        assert_eq!(descriptor(WATER).liquid, Some(LiquidKind::Water));
        assert_eq!(descriptor(LAVA).liquid, Some(LiquidKind::Lava));
        assert!(!descriptor(WATER).is_opaque());
        assert!(descriptor(TALL_GRASS).decorative);
        assert!(descriptor(WHEAT).decorative);
        assert!(descriptor(WHEAT).dropped_at_far(0));
        assert!(!descriptor(WHEAT).dropped_at_far(WHEAT_MATURE_STAGE));
        assert!(descriptor(TALL_GRASS).dropped_at_far(15));
        assert!(!descriptor(LEAVES).dropped_at_far(0));
        assert!(!descriptor(LEAVES).decorative);
        assert_eq!(descriptor(LEAVES).sway, Sway::Canopy);
        assert_eq!(descriptor(RED_FLOWER).sway, Sway::Rooted);
    }

    #[test]
    fn test_signal_blocks() {
        assert_eq!(descriptor(REDSTONE_WIRE).signal, SignalRender::Wire);
        assert_eq!(descriptor(REDSTONE_LAMP).signal, SignalRender::Lamp);
        assert_eq!(descriptor(REDSTONE_TORCH).signal, SignalRender::Emitter);
        assert_eq!(descriptor(GLOWSTONE).emission, 15);
    }
}
