//! Level packs authored as TOML documents.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use maze_chase_core::Tuning;
use maze_chase_world::{default_levels, LevelSpec};
use serde::{Deserialize, Serialize};

/// Format revision understood by this build.
pub(crate) const PACK_VERSION: u32 = 1;

/// Campaign description: tuning overrides plus an ordered list of levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelPack {
    pub(crate) version: u32,
    #[serde(default)]
    pub(crate) tuning: Tuning,
    pub(crate) levels: Vec<LevelSpec>,
}

impl LevelPack {
    /// Built-in campaign with default tuning.
    pub(crate) fn builtin() -> Self {
        Self {
            version: PACK_VERSION,
            tuning: Tuning::default(),
            levels: default_levels(),
        }
    }

    /// Reads and validates a pack from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read level pack {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("invalid level pack {}", path.display()))
    }

    pub(crate) fn parse(source: &str) -> Result<Self> {
        let pack: Self = toml::from_str(source).context("failed to parse TOML")?;
        if pack.version != PACK_VERSION {
            bail!(
                "unsupported level pack version {} (expected {PACK_VERSION})",
                pack.version
            );
        }
        if pack.levels.is_empty() {
            bail!("level pack contains no levels");
        }
        Ok(pack)
    }
}
