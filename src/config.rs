/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Only timing and defense density are configurable; the field geometry and
/// scoring rules are fixed constants in `domain::field`.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub defense: DefenseConfig,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// READY -> PLAYING pre-snap delay.
    pub ready_delay_ms: u64,
    /// Seal bark offset into the kickoff cheer.
    pub seal_delay_ms: u64,
    /// Defense AI tick period.
    pub turn_delay_ms: u64,
    /// Game clock period.
    pub clock_period_ms: u64,
    /// Tackle freeze before the down is resolved.
    pub tackle_delay_ms: u64,
    /// One phase of the touchdown blink (8 phases total).
    pub blink_phase_ms: u64,
    /// Game clock length in seconds.
    pub game_duration_secs: u32,
}

#[derive(Clone, Debug)]
pub struct DefenseConfig {
    /// Defenders per camera view at zero touchdowns.
    pub base_density: u32,
    /// Density ceiling as touchdowns accumulate.
    pub max_density: u32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    defense: TomlDefense,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_ready_delay")]
    ready_delay_ms: u64,
    #[serde(default = "default_seal_delay")]
    seal_delay_ms: u64,
    #[serde(default = "default_turn_delay")]
    turn_delay_ms: u64,
    #[serde(default = "default_clock_period")]
    clock_period_ms: u64,
    #[serde(default = "default_tackle_delay")]
    tackle_delay_ms: u64,
    #[serde(default = "default_blink_phase")]
    blink_phase_ms: u64,
    #[serde(default = "default_game_duration")]
    game_duration_secs: u32,
}

#[derive(Deserialize, Debug)]
struct TomlDefense {
    #[serde(default = "default_base_density")]
    base_density: u32,
    #[serde(default = "default_max_density")]
    max_density: u32,
}

// ── Defaults ──

fn default_ready_delay() -> u64 { 3000 }
fn default_seal_delay() -> u64 { 750 }
fn default_turn_delay() -> u64 { 500 }
fn default_clock_period() -> u64 { 1000 }
fn default_tackle_delay() -> u64 { 2000 }
fn default_blink_phase() -> u64 { 625 }
fn default_game_duration() -> u32 { crate::domain::field::GAME_DURATION }

fn default_base_density() -> u32 { 10 }
fn default_max_density() -> u32 { 20 }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            ready_delay_ms: default_ready_delay(),
            seal_delay_ms: default_seal_delay(),
            turn_delay_ms: default_turn_delay(),
            clock_period_ms: default_clock_period(),
            tackle_delay_ms: default_tackle_delay(),
            blink_phase_ms: default_blink_phase(),
            game_duration_secs: default_game_duration(),
        }
    }
}

impl Default for TomlDefense {
    fn default() -> Self {
        TomlDefense {
            base_density: default_base_density(),
            max_density: default_max_density(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(t: TomlConfig) -> Self {
        GameConfig {
            timing: TimingConfig {
                ready_delay_ms: t.timing.ready_delay_ms,
                seal_delay_ms: t.timing.seal_delay_ms,
                turn_delay_ms: t.timing.turn_delay_ms,
                clock_period_ms: t.timing.clock_period_ms,
                tackle_delay_ms: t.timing.tackle_delay_ms,
                blink_phase_ms: t.timing.blink_phase_ms,
                game_duration_secs: t.timing.game_duration_secs,
            },
            defense: DefenseConfig {
                base_density: t.defense.base_density,
                max_density: t.defense.max_density,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
