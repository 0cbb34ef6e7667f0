//! Command-line flags and the remote config document.
//!
//! The hub address normally comes from a small JSON document served next to
//! the client (`{"WS_URL": "ws://..."}`). `--ws-url` skips the fetch.

use std::path::PathBuf;
use std::time::Duration;

use canvas::consts::{
    DEFAULT_BRUSH_SIZE, DEFAULT_COLOR, DEFAULT_CURSOR_TTL_MS, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH,
};
use canvas::engine::{EngineConfig, cursor_ttl_from_ms};
use canvas::geom::Bounds;
use canvas::input::ToolState;
use clap::Parser;
use serde::Deserialize;

pub const DEFAULT_CONFIG_URL: &str = "http://127.0.0.1:8080/config.json";

const CONFIG_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid websocket URL `{0}`; expected ws:// or wss://")]
    InvalidWsUrl(String),
    #[error("fps must be at least 1")]
    InvalidFps,
    #[error("surface must be at least 1x1, got {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },
    #[error("brush size must be a positive number, got {0}")]
    InvalidBrushSize(f64),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "sketchboard", about = "Headless client for the shared whiteboard hub")]
pub struct Cli {
    /// JSON document exposing `WS_URL`.
    #[arg(long, env = "SKETCHBOARD_CONFIG_URL", default_value = DEFAULT_CONFIG_URL)]
    pub config_url: String,

    /// Connect here directly instead of fetching the config document.
    #[arg(long, env = "SKETCHBOARD_WS_URL")]
    pub ws_url: Option<String>,

    #[arg(long, env = "SKETCHBOARD_WIDTH", default_value_t = DEFAULT_SURFACE_WIDTH)]
    pub width: u32,

    #[arg(long, env = "SKETCHBOARD_HEIGHT", default_value_t = DEFAULT_SURFACE_HEIGHT)]
    pub height: u32,

    /// Canvas origin in client coordinates.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub left: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub top: f64,

    #[arg(long, env = "SKETCHBOARD_COLOR", default_value = DEFAULT_COLOR)]
    pub color: String,

    #[arg(long, env = "SKETCHBOARD_BRUSH_SIZE", default_value_t = DEFAULT_BRUSH_SIZE)]
    pub brush_size: f64,

    #[arg(long, env = "SKETCHBOARD_USERNAME", default_value = "")]
    pub username: String,

    #[arg(long, env = "SKETCHBOARD_FPS", default_value_t = 60)]
    pub fps: u32,

    /// Drop peer cursors not refreshed within this window. Off (0) by default:
    /// idle peers send nothing, so a window also hides live ones.
    #[arg(long, env = "SKETCHBOARD_CURSOR_TTL_MS", default_value_t = DEFAULT_CURSOR_TTL_MS)]
    pub cursor_ttl_ms: u64,

    #[arg(long, help = "JSON-lines UI event script, or - for stdin")]
    pub input: Option<String>,

    /// Keep the session open this long after the script ends; 0 exits immediately.
    #[arg(long, default_value_t = 0)]
    pub linger_ms: u64,

    #[arg(long, help = "Write the composited canvas to this PNG on exit")]
    pub snapshot: Option<PathBuf>,
}

/// Shape of the config document. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteConfig {
    #[serde(rename = "WS_URL")]
    pub ws_url: String,
}

/// Everything the session needs, validated.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub ws_url: String,
    pub engine: EngineConfig,
    pub frame_interval: Duration,
    pub input: Option<String>,
    pub linger: Duration,
    pub snapshot: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_cli(cli: &Cli, ws_url: String) -> Result<Self, ConfigError> {
        validate_ws_url(&ws_url)?;
        if cli.fps == 0 {
            return Err(ConfigError::InvalidFps);
        }
        if cli.width == 0 || cli.height == 0 {
            return Err(ConfigError::InvalidSurface { width: cli.width, height: cli.height });
        }
        if !cli.brush_size.is_finite() || cli.brush_size <= 0.0 {
            return Err(ConfigError::InvalidBrushSize(cli.brush_size));
        }

        let engine = EngineConfig {
            width: cli.width,
            height: cli.height,
            bounds: Bounds::new(cli.left, cli.top, f64::from(cli.width), f64::from(cli.height)),
            cursor_ttl: cursor_ttl_from_ms(cli.cursor_ttl_ms),
            tools: ToolState { color: cli.color.clone(), size: cli.brush_size, username: cli.username.clone() },
        };

        Ok(Self {
            ws_url,
            engine,
            frame_interval: Duration::from_secs(1) / cli.fps,
            input: cli.input.clone(),
            linger: Duration::from_millis(cli.linger_ms),
            snapshot: cli.snapshot.clone(),
        })
    }
}

/// Resolve the hub address (flag first, then the config document) and
/// validate the rest of the flags.
pub async fn resolve(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let ws_url = match &cli.ws_url {
        Some(url) => url.clone(),
        None => fetch_remote(&cli.config_url).await?.ws_url,
    };
    ClientConfig::from_cli(cli, ws_url)
}

pub async fn fetch_remote(url: &str) -> Result<RemoteConfig, ConfigError> {
    tracing::debug!(%url, "fetching client config");
    let client = reqwest::Client::builder().timeout(CONFIG_FETCH_TIMEOUT).build()?;
    let config = client.get(url).send().await?.error_for_status()?.json::<RemoteConfig>().await?;
    Ok(config)
}

pub fn validate_ws_url(url: &str) -> Result<(), ConfigError> {
    let rest = url
        .strip_prefix("ws://")
        .or_else(|| url.strip_prefix("wss://"))
        .ok_or_else(|| ConfigError::InvalidWsUrl(url.to_owned()))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(ConfigError::InvalidWsUrl(url.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
