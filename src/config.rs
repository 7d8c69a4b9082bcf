use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::people::MAX_PLAYERS_LIMIT;
use crate::{GestureId, GestureSet};

const DEFAULT_MAX_PLAYERS: usize = 1;
const DEFAULT_SOURCE_URI: &str = "stub://wave_right_hand";
const DEFAULT_TARGET_FPS: u32 = 30;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct GestureConfigFile {
    max_players: Option<usize>,
    cooldown_ms: Option<u64>,
    bypass_forbidden: Option<bool>,
    debug: Option<bool>,
    gestures: Option<Vec<String>>,
    source: Option<SourceConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SourceConfigFile {
    uri: Option<String>,
    target_fps: Option<u32>,
    jitter: Option<f32>,
    seed: Option<u64>,
}

/// Everything a process needs: recognition settings plus where frames come from.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    pub settings: GestureSettings,
    pub source: SourceSettings,
}

/// Settings applied to a `PersonTable` and every person in it.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSettings {
    /// People tracked at once, 1..=6.
    pub max_players: usize,
    /// Pause after a recognition before the same person is evaluated again.
    pub cooldown: Duration,
    pub bypass_forbidden: bool,
    /// Log every delivered recognition at info level.
    pub debug: bool,
    /// Gestures each person's recognizer subscribes to.
    pub gestures: GestureSet,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            cooldown: Duration::ZERO,
            bypass_forbidden: false,
            debug: false,
            gestures: GestureSet::all(),
        }
    }
}

impl GestureSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_players == 0 || self.max_players > MAX_PLAYERS_LIMIT {
            return Err(anyhow!(
                "max_players must be between 1 and {}, got {}",
                MAX_PLAYERS_LIMIT,
                self.max_players
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// `stub://<script>` or a path to a JSON-lines recording.
    pub uri: String,
    pub target_fps: u32,
    /// Max uniform noise (meters) added to synthetic hand joints.
    pub jitter: f32,
    pub seed: Option<u64>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_SOURCE_URI.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
            jitter: 0.0,
            seed: None,
        }
    }
}

impl SourceSettings {
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(anyhow!("source.uri must not be empty"));
        }
        if self.target_fps == 0 {
            return Err(anyhow!("source.target_fps must be greater than zero"));
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(anyhow!(
                "source.jitter must be a finite, non-negative number, got {}",
                self.jitter
            ));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

impl GestureConfig {
    /// File named by `GESTURE_CONFIG` (if set), then env overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("GESTURE_CONFIG").ok();
        Self::load_from(config_path.as_deref().map(Path::new))
    }

    /// Same as `load`, with the config file path given explicitly.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: GestureConfigFile) -> Result<Self> {
        let defaults = GestureSettings::default();
        let gestures = match file.gestures {
            Some(names) => parse_gestures(names.iter().map(String::as_str))
                .context("invalid gestures list")?,
            None => defaults.gestures,
        };
        let settings = GestureSettings {
            max_players: file.max_players.unwrap_or(defaults.max_players),
            cooldown: file
                .cooldown_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.cooldown),
            bypass_forbidden: file.bypass_forbidden.unwrap_or(defaults.bypass_forbidden),
            debug: file.debug.unwrap_or(defaults.debug),
            gestures,
        };

        let source_file = file.source.unwrap_or_default();
        let source = SourceSettings {
            uri: source_file
                .uri
                .unwrap_or_else(|| DEFAULT_SOURCE_URI.to_string()),
            target_fps: source_file.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
            jitter: source_file.jitter.unwrap_or(0.0),
            seed: source_file.seed,
        };
        Ok(Self { settings, source })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("GESTURE_MAX_PLAYERS") {
            self.settings.max_players = raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("GESTURE_MAX_PLAYERS must be an integer"))?;
        }
        if let Ok(raw) = std::env::var("GESTURE_COOLDOWN_MS") {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                anyhow!("GESTURE_COOLDOWN_MS must be an integer number of milliseconds")
            })?;
            self.settings.cooldown = Duration::from_millis(millis);
        }
        if let Ok(raw) = std::env::var("GESTURE_BYPASS_FORBIDDEN") {
            self.settings.bypass_forbidden = parse_flag("GESTURE_BYPASS_FORBIDDEN", &raw)?;
        }
        if let Ok(raw) = std::env::var("GESTURE_DEBUG") {
            self.settings.debug = parse_flag("GESTURE_DEBUG", &raw)?;
        }
        if let Ok(raw) = std::env::var("GESTURE_GESTURES") {
            let names = split_csv(&raw);
            if !names.is_empty() {
                self.settings.gestures = parse_gestures(names.iter().map(String::as_str))
                    .context("invalid GESTURE_GESTURES")?;
            }
        }
        if let Ok(uri) = std::env::var("GESTURE_SOURCE") {
            if !uri.trim().is_empty() {
                self.source.uri = uri.trim().to_string();
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        self.source.validate()
    }
}

fn read_config_file(path: &Path) -> Result<GestureConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn parse_gestures<'a>(names: impl Iterator<Item = &'a str>) -> Result<GestureSet> {
    names.map(|name| name.parse::<GestureId>()).collect()
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("{} must be a boolean, got {:?}", name, other)),
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}
