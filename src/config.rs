use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use phf::phf_map;
use ratatui::style::Color;
use serde::Deserialize;
use xdg::BaseDirectories;

use crate::calendar::{CellStatus, GridLayout, GridOptions};

/// Which calendar the interactive screen opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    /// Leave requests, one year at a time
    #[default]
    Leave,
    /// Activity reports, one month at a time
    Cra,
}

impl AppMode {
    pub fn label(&self) -> &'static str {
        match self {
            AppMode::Leave => "leave",
            AppMode::Cra => "cra",
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,
    pub mode: AppMode,
    pub layout: LayoutConfig,
    pub grid: GridFlags,
    /// Columns moved per horizontal scroll step
    pub scroll_step: u16,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            mode: AppMode::Leave,
            layout: LayoutConfig::default(),
            grid: GridFlags::default(),
            scroll_step: 12,
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    pub fn grid_layout(&self) -> GridLayout {
        GridLayout {
            cell_width: f64::from(self.layout.cell_width.max(1)),
            cell_height: f64::from(self.layout.cell_height.max(1)),
            employee_column_width: f64::from(self.layout.employee_column_width),
        }
    }

    pub fn scroll_step(&self) -> f64 {
        f64::from(self.scroll_step.max(1))
    }
}

/// Grid measurements in terminal cells
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    pub cell_width: u16,
    pub cell_height: u16,
    pub employee_column_width: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            cell_width: 3,
            cell_height: 1,
            employee_column_width: 22,
        }
    }
}

/// Capability overrides; unset flags keep the screen's defaults
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GridFlags {
    pub allow_multi_select: Option<bool>,
    pub allow_drag_select: Option<bool>,
    pub allow_cell_editing: Option<bool>,
}

impl GridFlags {
    pub fn apply(&self, mut options: GridOptions) -> GridOptions {
        if let Some(flag) = self.allow_multi_select {
            options.allow_multi_select = flag;
        }
        if let Some(flag) = self.allow_drag_select {
            options.allow_drag_select = flag;
        }
        if let Some(flag) = self.allow_cell_editing {
            options.allow_cell_editing = flag;
        }
        options
    }
}

/// Built-in cell colours, keyed by status tag
static STATUS_COLORS: phf::Map<&'static str, Color> = phf_map! {
    "worked" => Color::Rgb(40, 44, 52),
    "approved" => Color::Rgb(46, 125, 50),
    "pending" => Color::Rgb(245, 124, 0),
    "rejected" => Color::Rgb(198, 40, 40),
    "vacation" => Color::Rgb(46, 125, 50),
    "rtt" => Color::Rgb(0, 137, 123),
    "sick_leave" => Color::Rgb(173, 20, 87),
    "unpaid_leave" => Color::Rgb(93, 64, 55),
    "maternity_leave" => Color::Rgb(123, 31, 162),
    "paternity_leave" => Color::Rgb(69, 39, 160),
    "training" => Color::Rgb(2, 119, 189),
    "other" => Color::Rgb(97, 97, 97),
    "holiday" => Color::Rgb(106, 27, 154),
    "weekend" => Color::Rgb(66, 66, 66),
    "empty" => Color::Rgb(30, 30, 30),
    "partial" => Color::Rgb(249, 168, 37),
    "full" => Color::Rgb(56, 142, 60),
};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub selection_fg: Color,
    #[serde(deserialize_with = "deserialize_color_optional")]
    pub unfocused_selection_fg: Option<Color>,
    #[serde(deserialize_with = "deserialize_color")]
    pub drag_preview_bg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub error_fg: Color,
    /// Per-status background overrides, e.g. `pending = "#ff9800"`
    #[serde(deserialize_with = "deserialize_status_colors")]
    pub status: HashMap<String, Color>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            selection_fg: Color::Rgb(255, 165, 0), // Orange
            unfocused_selection_fg: None,
            drag_preview_bg: Color::Rgb(21, 101, 192),
            error_fg: Color::Red,
            status: HashMap::new(),
        }
    }
}

impl ThemeConfig {
    /// Get the unfocused selection color, calculating 50% darker if not explicitly set
    pub fn unfocused_selection_fg(&self) -> Color {
        self.unfocused_selection_fg
            .unwrap_or_else(|| darken_color(self.selection_fg, 0.5))
    }

    /// Background of a cell in the given status
    pub fn status_color(&self, status: CellStatus) -> Color {
        let tag = status.tag();
        self.status
            .get(tag)
            .or_else(|| STATUS_COLORS.get(tag))
            .copied()
            .unwrap_or(Color::Reset)
    }
}

pub fn is_status_name(name: &str) -> bool {
    STATUS_COLORS.contains_key(name)
}

/// Darken a color by a given factor (0.0 = black, 1.0 = original)
fn darken_color(color: Color, factor: f32) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let r = (r as f32 * factor) as u8;
            let g = (g as f32 * factor) as u8;
            let b = (b as f32 * factor) as u8;
            Color::Rgb(r, g, b)
        }
        other => other,
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", s)))
}

fn deserialize_color_optional<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(color_str) => {
            let color = parse_color(&color_str)
                .ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", color_str)))?;
            Ok(Some(color))
        }
        None => Ok(None),
    }
}

fn deserialize_status_colors<'de, D>(deserializer: D) -> Result<HashMap<String, Color>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: HashMap<String, String> = HashMap::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, value)| {
            let name = name.trim().to_lowercase();
            if !is_status_name(&name) {
                return Err(serde::de::Error::custom(format!("Unknown status: {}", name)));
            }
            let color = parse_color(&value)
                .ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", value)))?;
            Ok((name, color))
        })
        .collect()
}

/// Parse a color string into a ratatui Color
/// Supports:
/// - Named colors: "red", "blue", "cyan", "orange", etc.
/// - Hex colors: "#FF6600", "#f60"
/// - RGB tuples: "255,165,0"
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "black" => return Some(Color::Black),
        "red" => return Some(Color::Red),
        "green" => return Some(Color::Green),
        "yellow" => return Some(Color::Yellow),
        "blue" => return Some(Color::Blue),
        "magenta" => return Some(Color::Magenta),
        "cyan" => return Some(Color::Cyan),
        "gray" | "grey" => return Some(Color::Gray),
        "darkgray" | "darkgrey" => return Some(Color::DarkGray),
        "lightred" => return Some(Color::LightRed),
        "lightgreen" => return Some(Color::LightGreen),
        "lightyellow" => return Some(Color::LightYellow),
        "lightblue" => return Some(Color::LightBlue),
        "lightmagenta" => return Some(Color::LightMagenta),
        "lightcyan" => return Some(Color::LightCyan),
        "white" => return Some(Color::White),
        "orange" => return Some(Color::Rgb(255, 165, 0)),
        _ => {}
    }

    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Color::Rgb(r, g, b));
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            return Some(Color::Rgb(r, g, b));
        }
    }

    if s.contains(',') {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            return Some(Color::Rgb(r, g, b));
        }
    }

    None
}

/// Format a color back into the config syntax
pub fn format_color(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        other => format!("{:?}", other).to_lowercase(),
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    let pgm = env!("CARGO_PKG_NAME");
    let xdg_dirs = BaseDirectories::with_prefix(pgm);
    let config_home = xdg_dirs.get_config_home()?;
    Some(config_home.join("config.toml"))
}

/// Parse a config file body
pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

pub fn read() -> Config {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => return Config::default(),
    };

    if !config_path.exists() {
        return Config::default();
    }

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };

    parse(&content).unwrap_or_else(|_| Config::default())
}
