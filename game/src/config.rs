use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grid::GRID_SIZE;
use crate::scoring::{LINE_BONUS, POINTS_PER_CELL, ScoreTable};

pub const BLOCKS_PER_ROUND: usize = 3;
pub const TOTAL_STAGES: u32 = 500;
pub const MAX_GRID_SIZE: usize = 32;
pub const MAX_ROUND_SIZE: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_round_size")]
    pub round_size: usize,
    #[serde(default = "default_points_per_cell")]
    pub points_per_cell: u32,
    #[serde(default = "default_line_bonus")]
    pub line_bonus: Vec<u32>,
    #[serde(default = "default_stage")]
    pub stage: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            grid_size: default_grid_size(),
            round_size: default_round_size(),
            points_per_cell: default_points_per_cell(),
            line_bonus: default_line_bonus(),
            stage: default_stage(),
        }
    }
}

impl GameConfig {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.grid_size = self.grid_size.clamp(1, MAX_GRID_SIZE);
        self.round_size = self.round_size.clamp(1, MAX_ROUND_SIZE);
        self.stage = self.stage.clamp(1, TOTAL_STAGES);

        if self.line_bonus.is_empty() {
            self.line_bonus = default_line_bonus();
        }
        self.line_bonus[0] = 0;
        let mut floor = 0;
        for bonus in &mut self.line_bonus {
            floor = floor.max(*bonus);
            *bonus = floor;
        }
        self
    }

    /// `BLAST_GRID_SIZE`, `BLAST_ROUND_SIZE` and `BLAST_STAGE` win over file
    /// values when they parse.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_parse::<usize>("BLAST_GRID_SIZE") {
            self.grid_size = v;
        }
        if let Some(v) = env_parse::<usize>("BLAST_ROUND_SIZE") {
            self.round_size = v;
        }
        if let Some(v) = env_parse::<u32>("BLAST_STAGE") {
            self.stage = v;
        }
        self.sanitized()
    }

    pub fn score_table(&self) -> ScoreTable {
        ScoreTable::new(self.points_per_cell, self.line_bonus.clone())
    }

    pub fn stage_seed(&self) -> f64 {
        stage_seed(self.stage)
    }
}

/// Each stage draws from its own fixed seed base.
pub fn stage_seed(stage: u32) -> f64 {
    f64::from(stage) * 1000.0
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}

fn default_version() -> u32 {
    1
}

fn default_grid_size() -> usize {
    GRID_SIZE
}

fn default_round_size() -> usize {
    BLOCKS_PER_ROUND
}

fn default_points_per_cell() -> u32 {
    POINTS_PER_CELL
}

fn default_line_bonus() -> Vec<u32> {
    LINE_BONUS.to_vec()
}

fn default_stage() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("BLAST_CONFIG_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("blockblast");
        path.push("config.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> GameConfig {
        let Ok(bytes) = fs::read(&self.path) else {
            return GameConfig::default();
        };
        match serde_json::from_slice::<GameConfig>(&bytes) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                log::warn!("ignoring malformed config {}: {err}", self.path.display());
                GameConfig::default()
            }
        }
    }

    pub fn save(&self, config: &GameConfig) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
