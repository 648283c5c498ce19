//! `[output]` section: how the trace is rendered and whether ANSI colors are used
//!
//! ```toml
//! [output]
//! format = "verdict"   # full | verdict | json
//! color = "auto"       # auto | always | never, or a plain boolean
//! ```

use council_domain::OutputFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// When to emit ANSI colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawColor")]
pub enum ColorSetting {
    /// Color only on a terminal, and never when `NO_COLOR` is set
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorSetting {
    /// Decide whether this run should colorize its stdout.
    pub fn enabled(self, no_color_env: bool, stdout_is_terminal: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => stdout_is_terminal && !no_color_env,
        }
    }
}

/// Accepted TOML spellings: `true`/`false` or one of the setting names
#[derive(Deserialize)]
#[serde(untagged)]
enum RawColor {
    Flag(bool),
    Name(String),
}

#[derive(Debug)]
pub struct UnknownColorSetting(String);

impl fmt::Display for UnknownColorSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown color setting '{}', expected auto, always, never or a boolean",
            self.0
        )
    }
}

impl TryFrom<RawColor> for ColorSetting {
    type Error = UnknownColorSetting;

    fn try_from(raw: RawColor) -> Result<Self, Self::Error> {
        match raw {
            RawColor::Flag(true) => Ok(Self::Always),
            RawColor::Flag(false) => Ok(Self::Never),
            RawColor::Name(name) => match name.trim().to_ascii_lowercase().as_str() {
                "auto" => Ok(Self::Auto),
                "always" => Ok(Self::Always),
                "never" => Ok(Self::Never),
                _ => Err(UnknownColorSetting(name)),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Format used when `--output` is absent
    pub format: Option<OutputFormat>,
    pub color: ColorSetting,
}

impl FileOutputConfig {
    /// The command-line flag wins, then this file, then [`OutputFormat::default`].
    pub fn resolve_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }
}
