/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Out-of-range values are replaced by their defaults with a warning.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::sim::starfield::{DEFAULT_SPEED, DEFAULT_STAR_COUNT};

const CONFIG_FILE: &str = "config.toml";
const MAX_FPS: u32 = 240;
const MAX_STARS: usize = 20_000;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub starfield: StarfieldConfig,
    pub transition: TransitionConfig,
    pub gamepad: GamepadConfig,
    pub assets_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub fps: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StarfieldConfig {
    pub enabled: bool,
    pub count: usize,
    pub speed: f32,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransitionConfig {
    pub stiffness: f32,
    pub damping: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub advance: Vec<String>,
    pub retreat: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    starfield: TomlStarfield,
    #[serde(default)]
    transition: TomlTransition,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_fps")]
    fps: u32,
}

#[derive(Deserialize, Debug)]
struct TomlStarfield {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_star_count")]
    count: usize,
    #[serde(default = "default_star_speed")]
    speed: f32,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlTransition {
    #[serde(default = "default_stiffness")]
    stiffness: f32,
    #[serde(default = "default_damping")]
    damping: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_advance")]
    advance: Vec<String>,
    #[serde(default = "default_retreat")]
    retreat: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_assets_dir")]
    assets_dir: String,
}

// ── Defaults ──

fn default_fps() -> u32 { 60 }
fn default_true() -> bool { true }
fn default_star_count() -> usize { DEFAULT_STAR_COUNT }
fn default_star_speed() -> f32 { DEFAULT_SPEED }
fn default_stiffness() -> f32 { 300.0 }
fn default_damping() -> f32 { 30.0 }

fn default_advance() -> Vec<String> { vec!["A".into(), "R1".into(), "Start".into()] }
fn default_retreat() -> Vec<String> { vec!["B".into(), "L1".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_assets_dir() -> String { "assets".into() }

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { fps: default_fps() }
    }
}

impl Default for TomlStarfield {
    fn default() -> Self {
        TomlStarfield {
            enabled: true,
            count: default_star_count(),
            speed: default_star_speed(),
            seed: None,
        }
    }
}

impl Default for TomlTransition {
    fn default() -> Self {
        TomlTransition { stiffness: default_stiffness(), damping: default_damping() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            advance: default_advance(),
            retreat: default_retreat(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { assets_dir: default_assets_dir() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl AppConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, current working directory, data dirs.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = match find_config(&search_dirs) {
            Some(path) => match read_toml(&path) {
                Ok(cfg) => {
                    info!(path = %path.display(), "loaded config");
                    cfg
                }
                Err(e) => {
                    warn!("{e}; using default settings");
                    TomlConfig::default()
                }
            },
            None => TomlConfig::default(),
        };
        AppConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Load one specific file. Errors are returned, not swallowed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let toml_cfg = read_toml(path)?;
        let base: Vec<PathBuf> = path.parent().map(Path::to_path_buf).into_iter().collect();
        Ok(AppConfig::from_toml(toml_cfg, &base))
    }

    fn from_toml(t: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let fps = if (1..=MAX_FPS).contains(&t.display.fps) {
            t.display.fps
        } else {
            warn!(fps = t.display.fps, "display.fps out of range (1..={MAX_FPS})");
            default_fps()
        };

        let count = if (1..=MAX_STARS).contains(&t.starfield.count) {
            t.starfield.count
        } else {
            warn!(count = t.starfield.count, "starfield.count out of range (1..={MAX_STARS})");
            default_star_count()
        };

        let speed = if t.starfield.speed.is_finite() && t.starfield.speed > 0.0 {
            t.starfield.speed
        } else {
            warn!(speed = t.starfield.speed, "starfield.speed must be positive");
            default_star_speed()
        };

        let stiffness = if t.transition.stiffness.is_finite() && t.transition.stiffness > 0.0 {
            t.transition.stiffness
        } else {
            warn!(stiffness = t.transition.stiffness, "transition.stiffness must be positive");
            default_stiffness()
        };

        let damping = if t.transition.damping.is_finite() && t.transition.damping >= 0.0 {
            t.transition.damping
        } else {
            warn!(damping = t.transition.damping, "transition.damping must not be negative");
            default_damping()
        };

        AppConfig {
            display: DisplayConfig { fps },
            starfield: StarfieldConfig {
                enabled: t.starfield.enabled,
                count,
                speed,
                seed: t.starfield.seed,
            },
            transition: TransitionConfig { stiffness, damping },
            gamepad: GamepadConfig {
                advance: t.gamepad.advance,
                retreat: t.gamepad.retreat,
                quit: t.gamepad.quit,
            },
            assets_dir: resolve_dir(&t.general.assets_dir, search_dirs),
        }
    }
}

/// Absolute paths are taken as-is; relative ones are looked up in the
/// candidate directories, falling back to CWD-relative.
fn resolve_dir(dir: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = PathBuf::from(dir);
    if p.is_absolute() {
        return p;
    }
    search_dirs.iter()
        .map(|d| d.join(dir))
        .find(|p| p.is_dir())
        .unwrap_or(p)
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so an installed link still finds data next to the real binary.
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

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/questfolio");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    let sys = PathBuf::from("/usr/share/questfolio");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn find_config(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs.iter()
        .map(|d| d.join(CONFIG_FILE))
        .find(|p| p.exists())
}

fn read_toml(path: &Path) -> Result<TomlConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    toml::from_str::<TomlConfig>(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.display.fps, 60);
        assert_eq!(cfg.starfield.count, 800);
        assert_eq!(cfg.starfield.speed, 0.5);
        assert!(cfg.starfield.enabled);
        assert_eq!(cfg.starfield.seed, None);
        assert_eq!(cfg.transition.stiffness, 300.0);
        assert_eq!(cfg.transition.damping, 30.0);
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[starfield]\ncount = 120\nseed = 7\n");
        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.starfield.count, 120);
        assert_eq!(cfg.starfield.seed, Some(7));
        assert_eq!(cfg.starfield.speed, 0.5);
        assert_eq!(cfg.display.fps, 60);
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "[display]\nfps = 0\n[starfield]\ncount = 0\nspeed = -1.0\n[transition]\nstiffness = 0.0\ndamping = -2.0\n",
        );
        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg, AppConfig {
            assets_dir: cfg.assets_dir.clone(),
            ..AppConfig::default()
        });
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[display\nfps = ");
        match AppConfig::load_from(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn assets_dir_resolves_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("art")).unwrap();
        let path = write(&dir, "[general]\nassets_dir = \"art\"\n");
        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.assets_dir, dir.path().join("art"));
    }
}
