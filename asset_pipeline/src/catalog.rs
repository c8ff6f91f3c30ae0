// Static art catalog: asset folders, target sizes and the SVG template entries.
// The template data is embedded JSON, parsed once per process.

use std::sync::OnceLock;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

static ART_CATALOG_JSON: &str = include_str!("../data/art_catalog.json");

/// Source-art folders under the art root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum AssetKind {
    Cards,
    Enemies,
    Relics,
    Potions,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Cards,
        AssetKind::Enemies,
        AssetKind::Relics,
        AssetKind::Potions,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            AssetKind::Cards => "cards",
            AssetKind::Enemies => "enemies",
            AssetKind::Relics => "relics",
            AssetKind::Potions => "potions",
        }
    }

    /// Square edge the compressor resizes to.
    pub fn target_size(&self) -> u32 {
        match self {
            AssetKind::Cards | AssetKind::Enemies => 512,
            AssetKind::Relics | AssetKind::Potions => 256,
        }
    }
}

/// Which template group `generate-art` renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArtSet {
    Orbs,
    Stances,
    Enemies,
    All,
}

impl ArtSet {
    pub fn includes(&self, other: ArtSet) -> bool {
        *self == ArtSet::All || *self == other
    }
}

/// Orb icon: radial body, highlight and a glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbArt {
    pub id: String,
    pub color1: String,
    pub color2: String,
    pub accent: String,
    pub symbol: String,
}

/// Stance indicator: background gradient, glow and raw SVG shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StanceArt {
    pub id: String,
    pub title: String,
    pub color1: String,
    pub color2: String,
    pub accent: String,
    pub glow_color: String,
    pub shapes: Vec<String>,
}

/// Enemy portrait: parts are drawn around the portrait's focal point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyPortrait {
    pub id: String,
    pub name: String,
    pub color1: String,
    pub color2: String,
    pub accent: String,
    pub glow_color: String,
    pub parts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtCatalog {
    pub orbs: Vec<OrbArt>,
    pub stances: Vec<StanceArt>,
    pub enemies: Vec<EnemyPortrait>,
}

impl ArtCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.orbs.len() + self.stances.len() + self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The embedded catalog.
pub fn art_catalog() -> Result<&'static ArtCatalog> {
    static CATALOG: OnceLock<std::result::Result<ArtCatalog, String>> = OnceLock::new();
    CATALOG
        .get_or_init(|| ArtCatalog::from_json(ART_CATALOG_JSON).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|msg| PipelineError::Catalog(msg.clone()))
}
