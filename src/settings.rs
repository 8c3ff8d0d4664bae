use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::parser::ParseOptions;

pub const CONFIG_FILE: &str = "quiz_extractor";
pub const ENV_PREFIX: &str = "QUIZ";

/// Run settings: defaults, then `quiz_extractor.{toml,json,..}` if present,
/// then `QUIZ_*` environment variables. CLI flags are applied on top in `main`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input: String,
    pub output: String,
    pub cover_pages: usize,
    pub header_marker: String,
    pub bold_marker: String,
    pub preview: usize,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let defaults = ParseOptions::default();
        builder
            .set_default("input", "Quizbowl-Bank.pdf")?
            .set_default("output", "data/questions.json")?
            .set_default("cover_pages", defaults.cover_pages as u64)?
            .set_default("header_marker", defaults.header_marker)?
            .set_default("bold_marker", defaults.bold_marker)?
            .set_default("preview", 3_u64)?
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            cover_pages: self.cover_pages,
            header_marker: self.header_marker.clone(),
            bold_marker: self.bold_marker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(settings.output, "data/questions.json");
        assert_eq!(settings.cover_pages, 1);
        assert_eq!(settings.header_marker, "Questions Grades");
        assert_eq!(settings.bold_marker, "Bold");
        assert_eq!(settings.preview, 3);
    }

    #[test]
    fn overrides_win_over_defaults() {
        let builder = Config::builder()
            .set_override("cover_pages", 2_u64)
            .unwrap()
            .set_override("bold_marker", "Black")
            .unwrap();
        let settings = Settings::from_builder(builder).unwrap();
        assert_eq!(settings.cover_pages, 2);
        assert_eq!(settings.parse_options().bold_marker, "Black");
    }
}
