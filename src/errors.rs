use std::fmt;
use std::io;
use std::path::PathBuf;

/// Check if colored output should be used
fn should_use_color() -> bool {
    // Respect NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

fn write_error_header(f: &mut fmt::Formatter<'_>, message: fmt::Arguments<'_>) -> fmt::Result {
    if should_use_color() {
        write!(f, "\x1b[1;31merror:\x1b[0m {}", message)
    } else {
        write!(f, "error: {}", message)
    }
}

fn write_hint(f: &mut fmt::Formatter<'_>, message: fmt::Arguments<'_>) -> fmt::Result {
    if should_use_color() {
        write!(f, "\x1b[1;36mhint:\x1b[0m {}", message)
    } else {
        write!(f, "hint: {}", message)
    }
}

/// Errors that can occur while loading settings.
#[derive(Debug)]
pub enum ConfigError {
    /// The settings file could not be read
    Io { path: PathBuf, source: io::Error },
    /// The settings file is not valid TOML or has the wrong shape
    Parse(toml::de::Error),
    /// The nesting separator is not exactly one character
    InvalidSeparator(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write_error_header(f, format_args!("cannot read {:?}: {}", path, source))
            }
            ConfigError::Parse(e) => {
                write_error_header(f, format_args!("invalid settings: {}", e))
            }
            ConfigError::InvalidSeparator(separator) => {
                write_error_header(
                    f,
                    format_args!("separator {:?} must be exactly one character", separator),
                )?;
                writeln!(f)?;
                write_hint(f, format_args!("use e.g. separator = \".\""))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::InvalidSeparator(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// A `key=value` overlay that could not be parsed.
#[derive(Debug, PartialEq, Eq)]
pub enum OverlayError {
    MissingEquals(String),
    EmptyKey(String),
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::MissingEquals(overlay) => {
                write_error_header(f, format_args!("overlay '{}' has no '='", overlay))?;
            }
            OverlayError::EmptyKey(overlay) => {
                write_error_header(f, format_args!("overlay '{}' has an empty key", overlay))?;
            }
        }
        writeln!(f)?;
        write_hint(f, format_args!("overlays are written as KEY=VALUE"))
    }
}

impl std::error::Error for OverlayError {}

/// Error when a settings key is not known
#[derive(Debug)]
pub struct SettingNotFoundError {
    pub name: String,
    pub suggestion: Option<String>,
}

impl SettingNotFoundError {
    pub fn new(name: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            name: name.into(),
            suggestion,
        }
    }
}

impl fmt::Display for SettingNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_error_header(f, format_args!("setting '{}' not found", self.name))?;
        writeln!(f)?;
        writeln!(f)?;

        if let Some(suggestion) = &self.suggestion {
            write_hint(f, format_args!("did you mean '{}'?", suggestion))?;
            writeln!(f)?;
        }

        if should_use_color() {
            write!(
                f,
                "      run \x1b[1m`nested-params config list`\x1b[0m to see all settings"
            )
        } else {
            write!(f, "      run `nested-params config list` to see all settings")
        }
    }
}

impl std::error::Error for SettingNotFoundError {}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for (i, c1) in s1.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, c2) in s2.chars().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Closest known setting name, if one is near enough to be a typo.
pub fn find_closest_setting(name: &str, available: &[&str]) -> Option<String> {
    let threshold = (name.chars().count() / 3).max(2);

    available
        .iter()
        .map(|candidate| (candidate, levenshtein_distance(name, candidate)))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}
