//! Configuration and palette management for screenio.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.screenio/config.toml`
//! - Built-in palettes (green-phosphor, amber, paper, ice)
//! - Line-terminator selection for committed input
//!
//! # Configuration File
//!
//! The configuration file is located at `~/.screenio/config.toml`:
//!
//! ```toml
//! # Palette: green-phosphor, amber, paper, ice
//! palette = "green-phosphor"
//!
//! # Line terminator appended to committed input: native, lf, crlf
//! line_ending = "native"
//!
//! # Terminal title while the console is visible
//! title = "screenio"
//!
//! # Individual colors override the named palette
//! [text_color]
//! r = 158
//! g = 255
//! b = 163
//! ```
//!
//! Programmatic settings take precedence over the file; the file takes
//! precedence over the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Named palette
    pub palette: String,
    /// Text color override
    pub text_color: Option<Color>,
    /// Screen (background) color override
    pub screen_color: Option<Color>,
    /// Caret color override
    pub caret_color: Option<Color>,
    /// Line terminator appended to committed input
    pub line_ending: LineEnding,
    /// Terminal title while visible
    pub title: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            palette: "green-phosphor".to_string(),
            text_color: None,
            screen_color: None,
            caret_color: None,
            line_ending: LineEnding::Native,
            title: "screenio".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from file
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                return Self::from_path(&path);
            }
        }
        Self::default()
    }

    /// Load configuration from a specific file, falling back to defaults
    /// on any read or parse error.
    pub fn from_path(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            if let Ok(config) = toml::from_str(&content) {
                return config;
            }
        }
        Self::default()
    }

    /// Save configuration to file
    #[allow(dead_code)]
    pub fn save(&self) -> Result<(), String> {
        if let Some(path) = Self::get_config_path() {
            let content = toml::to_string_pretty(self)
                .map_err(|e| format!("Failed to serialize config: {}", e))?;
            fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
            Ok(())
        } else {
            Err("Could not determine config path".to_string())
        }
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        if let Some(home) = home_dir() {
            let dir = home.join(".screenio");
            if !dir.exists() {
                let _ = fs::create_dir_all(&dir);
            }
            return Some(dir.join("config.toml"));
        }
        None
    }

    /// Resolve the effective palette: the named preset with any individual
    /// color overrides applied on top.
    pub fn resolve_palette(&self) -> Palette {
        let mut palette = Palette::by_name(&self.palette);
        if let Some(c) = self.text_color {
            palette.text = c;
        }
        if let Some(c) = self.screen_color {
            palette.screen = c;
        }
        if let Some(c) = self.caret_color {
            palette.caret = c;
        }
        palette
    }
}

/// Line terminator appended after each committed line's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Platform native: `\r\n` on Windows, `\n` elsewhere
    Native,
    Lf,
    CrLf,
}

impl LineEnding {
    /// The terminator's bytes.
    pub fn bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Native => {
                if cfg!(windows) {
                    b"\r\n"
                } else {
                    b"\n"
                }
            }
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// `#rrggbb` form, used for the OSC 12 caret-color sequence.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Console palette: text, screen background, and caret colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub name: String,
    pub text: Color,
    pub screen: Color,
    pub caret: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::green_phosphor()
    }
}

impl Palette {
    /// Classic bright green on black with a white caret.
    pub fn green_phosphor() -> Self {
        Self {
            name: "green-phosphor".to_string(),
            text: Color::new(158, 255, 163),
            screen: Color::new(0, 0, 0),
            caret: Color::new(255, 255, 255),
        }
    }

    /// Amber monochrome monitor.
    pub fn amber() -> Self {
        Self {
            name: "amber".to_string(),
            text: Color::new(255, 176, 0),
            screen: Color::new(20, 10, 0),
            caret: Color::new(255, 220, 140),
        }
    }

    /// Dark ink on paper white.
    pub fn paper() -> Self {
        Self {
            name: "paper".to_string(),
            text: Color::new(40, 40, 40),
            screen: Color::new(240, 238, 229),
            caret: Color::new(40, 40, 40),
        }
    }

    /// Cool blue-gray on near-black.
    pub fn ice() -> Self {
        Self {
            name: "ice".to_string(),
            text: Color::new(174, 204, 228),
            screen: Color::new(12, 16, 22),
            caret: Color::new(230, 240, 250),
        }
    }

    /// Get palette by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "amber" => Self::amber(),
            "paper" => Self::paper(),
            "ice" => Self::ice(),
            _ => Self::green_phosphor(),
        }
    }

    /// List available palettes
    pub fn list() -> Vec<&'static str> {
        vec!["green-phosphor", "amber", "paper", "ice"]
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
