// Art prompt catalog for commissioning or generating card, enemy and relic art.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

static ART_PROMPTS_JSON: &str = include_str!("../data/art_prompts.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Card,
    Enemy,
    Relic,
}

impl PromptKind {
    pub const ALL: [PromptKind; 3] = [PromptKind::Card, PromptKind::Enemy, PromptKind::Relic];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Card => "card",
            PromptKind::Enemy => "enemy",
            PromptKind::Relic => "relic",
        }
    }

    /// Art folder the generated image is saved to.
    pub fn dir_name(&self) -> &'static str {
        match self {
            PromptKind::Card => "cards",
            PromptKind::Enemy => "enemies",
            PromptKind::Relic => "relics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptEntry {
    pub prompt: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ralph_quote: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptCatalog {
    pub style_base: String,
    /// Keyed by `PromptKind::as_str`.
    pub aspect_ratios: BTreeMap<String, String>,
    pub cards: BTreeMap<String, PromptEntry>,
    pub enemies: BTreeMap<String, PromptEntry>,
    pub relics: BTreeMap<String, PromptEntry>,
}

/// The embedded prompt catalog.
pub fn prompt_catalog() -> Result<&'static PromptCatalog> {
    static CATALOG: OnceLock<std::result::Result<PromptCatalog, String>> = OnceLock::new();
    CATALOG
        .get_or_init(|| serde_json::from_str(ART_PROMPTS_JSON).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|msg| PipelineError::Catalog(msg.clone()))
}

/// How many ids still lack art in one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReport {
    pub kind: PromptKind,
    pub total: usize,
    /// `None` when the folder itself does not exist.
    pub missing: Option<Vec<String>>,
}

impl PromptCatalog {
    pub fn entries(&self, kind: PromptKind) -> &BTreeMap<String, PromptEntry> {
        match kind {
            PromptKind::Card => &self.cards,
            PromptKind::Enemy => &self.enemies,
            PromptKind::Relic => &self.relics,
        }
    }

    /// Base prompt plus the shared style and the kind's aspect ratio.
    pub fn styled_prompt(&self, base: &str, kind: PromptKind) -> String {
        let aspect = self
            .aspect_ratios
            .get(kind.as_str())
            .map(String::as_str)
            .unwrap_or_default();
        format!(
            "{base}, {}, {aspect}, high quality, clean lines, no text",
            self.style_base
        )
    }

    pub fn render_list(&self, kind: PromptKind) -> String {
        let mut out = format!("\n=== {} ART PROMPTS ===\n\n", kind.as_str().to_uppercase());
        for (id, entry) in self.entries(kind) {
            let _ = writeln!(out, "[{id}]");
            if let Some(name) = &entry.name {
                let _ = writeln!(out, "  Name: {name}");
            }
            let _ = writeln!(out, "  Prompt: {}", entry.prompt);
            if let Some(quote) = &entry.ralph_quote {
                let _ = writeln!(out, "  Quote: \"{quote}\"");
            }
            out.push('\n');
        }
        out
    }

    /// Markdown guide with every styled prompt.
    pub fn export_markdown(&self) -> String {
        let ratio = |kind: PromptKind| {
            self.aspect_ratios
                .get(kind.as_str())
                .cloned()
                .unwrap_or_default()
        };
        let mut out = String::from("# Spire Ascent - AI Art Prompts\n\n## How to Use These Prompts\n\n");
        out.push_str("1. Copy the full prompt for the asset you want to generate\n");
        out.push_str("2. Paste it into your image generator\n");
        out.push_str("3. Save the result to the matching folder:\n");
        for kind in PromptKind::ALL {
            let _ = writeln!(out, "   - src/assets/art/{}/{{id}}.png", kind.dir_name());
        }
        let _ = write!(
            out,
            "\n## Style Guide\n\n- **Style**: {}\n- **Cards**: {}\n- **Enemies**: {}\n- **Relics**: {}\n",
            self.style_base,
            ratio(PromptKind::Card),
            ratio(PromptKind::Enemy),
            ratio(PromptKind::Relic)
        );

        for kind in PromptKind::ALL {
            let _ = write!(out, "\n---\n\n## {} Art Prompts\n\n", capitalize(kind.as_str()));
            for (id, entry) in self.entries(kind) {
                match &entry.name {
                    Some(name) => {
                        let _ = writeln!(out, "### {id} - {name}");
                    }
                    None => {
                        let _ = writeln!(out, "### {id}");
                    }
                }
                let _ = writeln!(
                    out,
                    "**Full Prompt:**\n```\n{}\n```",
                    self.styled_prompt(&entry.prompt, kind)
                );
                if let Some(quote) = &entry.ralph_quote {
                    let _ = writeln!(out, "*Ralph says: \"{quote}\"*");
                }
                out.push('\n');
            }
        }
        out
    }

    /// Plain-text batch file: one `--- <dir>/<id>.png ---` header per prompt.
    pub fn export_batch(&self) -> String {
        let mut out = String::from(
            "SPIRE ASCENT - BATCH PROMPTS\n============================\n\
             Copy each prompt to generate the corresponding image.\n\
             Save with the filename shown before each prompt.\n\n",
        );
        for kind in PromptKind::ALL {
            let _ = write!(out, "=== {} ===\n\n", kind.dir_name().to_uppercase());
            for (id, entry) in self.entries(kind) {
                let _ = write!(
                    out,
                    "--- {}/{id}.png ---\n{}\n\n",
                    kind.dir_name(),
                    self.styled_prompt(&entry.prompt, kind)
                );
            }
        }
        out
    }

    /// Compare catalog ids against file stems in `<art_root>/<kind dir>/`, case-insensitively.
    pub fn check_missing(&self, kind: PromptKind, art_root: &Path) -> MissingReport {
        let ids = self.entries(kind);
        let dir = art_root.join(kind.dir_name());
        let missing = fs::read_dir(&dir).ok().map(|entries| {
            let existing: BTreeSet<String> = entries
                .flatten()
                .filter_map(|e| {
                    e.path()
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .map(str::to_lowercase)
                })
                .collect();
            ids.keys()
                .filter(|id| !existing.contains(&id.to_lowercase()))
                .cloned()
                .collect()
        });
        MissingReport {
            kind,
            total: ids.len(),
            missing,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_has_every_kind() {
        let catalog = prompt_catalog().unwrap();
        assert!(catalog.cards.contains_key("strike"));
        assert!(catalog.enemies.contains_key("cultist"));
        assert!(!catalog.relics.is_empty());
        for kind in PromptKind::ALL {
            assert!(catalog.aspect_ratios.contains_key(kind.as_str()));
        }
    }

    #[test]
    fn styled_prompt_appends_style_and_ratio() {
        let catalog = prompt_catalog().unwrap();
        let styled = catalog.styled_prompt("A cat", PromptKind::Enemy);
        assert!(styled.starts_with("A cat, Simpsons animated series art style"));
        assert!(styled.ends_with("1:1 aspect ratio, square format, centered character, high quality, clean lines, no text"));
    }

    #[test]
    fn list_shows_names_and_quotes() {
        let catalog = prompt_catalog().unwrap();
        let enemies = catalog.render_list(PromptKind::Enemy);
        assert!(enemies.contains("=== ENEMY ART PROMPTS ==="));
        assert!(enemies.contains("  Name: Nelson the Bully Cultist"));
        let cards = catalog.render_list(PromptKind::Card);
        assert!(cards.contains("  Quote: \"I'm a unitard!\""));
    }

    #[test]
    fn batch_headers_use_folders() {
        let batch = prompt_catalog().unwrap().export_batch();
        assert!(batch.contains("--- cards/strike.png ---"));
        assert!(batch.contains("=== RELICS ==="));
    }

    #[test]
    fn markdown_has_sections() {
        let md = prompt_catalog().unwrap().export_markdown();
        assert!(md.contains("## Card Art Prompts"));
        assert!(md.contains("### cultist - Nelson the Bully Cultist"));
    }

    #[test]
    fn missing_folder_reported_as_none() {
        let report = prompt_catalog()
            .unwrap()
            .check_missing(PromptKind::Relic, Path::new("/definitely/not/here"));
        assert!(report.missing.is_none());
        assert!(report.total > 0);
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("enemy"), "Enemy");
        assert_eq!(capitalize(""), "");
    }
}
