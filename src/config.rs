//! Runtime configuration.
//!
//! Defaults are compiled in; command-line flags override them. With the `config`
//! feature enabled a TOML file under the user's configuration directory is read
//! first.

use crate::error::Result;
use std::time::Duration;

/// Tunables for the pager.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Config {
    /// Pause after each terminal write before the next frame may be sent
    pub settle_delay_ms: u64,
    /// How long a status message stays visible
    pub status_linger_ms: u64,
    /// Chunk size used by the backward line reader
    pub backward_chunk_size: usize,
    /// Buffer size used by the forward line reader
    pub forward_buffer_size: usize,
    /// Columns per tab stop
    pub tab_width: usize,
    /// Keep polling the content for growth
    pub follow: bool,
    /// Start with line wrapping enabled
    pub wrap: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_ms: 8,
            status_linger_ms: 2000,
            backward_chunk_size: 8 * 1024,
            forward_buffer_size: 64 * 1024,
            tab_width: 8,
            follow: true,
            wrap: false,
        }
    }
}

impl Config {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn status_linger(&self) -> Duration {
        Duration::from_millis(self.status_linger_ms)
    }

    /// Load configuration, falling back to defaults when no file exists.
    #[cfg(feature = "config")]
    pub fn load() -> Result<Self> {
        use crate::error::PagerError;

        let Some(dir) = dirs::config_dir() else {
            return Ok(Self::default());
        };
        let path = dir.join("rpager").join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|e| PagerError::file_error(format!("Failed to read {}", path.display()), e))?;
        Self::from_toml(&text)
    }

    /// Load configuration, falling back to defaults when no file exists.
    #[cfg(not(feature = "config"))]
    pub fn load() -> Result<Self> {
        Ok(Self::default())
    }

    #[cfg(feature = "config")]
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| crate::error::PagerError::config(e.to_string()))?;
        config.validated()
    }

    /// Reject values that would stall the readers.
    pub fn validated(mut self) -> Result<Self> {
        if self.backward_chunk_size == 0 || self.forward_buffer_size == 0 {
            return Err(crate::error::PagerError::config(
                "reader buffer sizes must be at least one byte",
            ));
        }
        if self.tab_width == 0 {
            self.tab_width = 1;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default().validated().unwrap();
        assert_eq!(config.tab_width, 8);
        assert_eq!(config.settle_delay(), Duration::from_millis(8));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let config = Config {
            backward_chunk_size: 0,
            ..Config::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn zero_tab_width_is_clamped() {
        let config = Config {
            tab_width: 0,
            ..Config::default()
        };
        assert_eq!(config.validated().unwrap().tab_width, 1);
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_overrides_selected_fields() {
        let config = Config::from_toml("tab_width = 4\nfollow = false\n").unwrap();
        assert_eq!(config.tab_width, 4);
        assert!(!config.follow);
        assert_eq!(config.status_linger_ms, 2000);
    }
}
