use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::Point;

pub const DEFAULT_CONFIG_PATH: &str = "mazepath.json";

/// Describes a single search: which maze to load and where to go
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub image: PathBuf,
    pub start: Point,
    pub goal: Point,

    /// Stop searching after this many cells have been expanded
    #[serde(default)]
    pub max_expansions: Option<usize>,

    /// Print every cell of the path, not just its length
    #[serde(default)]
    pub print_path: bool,
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;

        let mut config = Self::from_json(&json)
            .with_context(|| format!("invalid config {}", path.display()))?;

        // the image path is relative to the config file, not the working directory
        if config.image.is_relative() {
            if let Some(dir) = path.parent() {
                config.image = dir.join(&config.image);
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::from_json(
            r#"{
                "image": "data/maze.png",
                "start": { "x": 0, "y": 14 },
                "goal": { "x": 51, "y": 44 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.image, PathBuf::from("data/maze.png"));
        assert_eq!(config.start, Point::new(0, 14));
        assert_eq!(config.goal, Point::new(51, 44));
        assert_eq!(config.max_expansions, None);
        assert!(!config.print_path);
    }

    #[test]
    fn test_all_fields() {
        let config = RunConfig::from_json(
            r#"{
                "image": "maze.png",
                "start": { "x": 1, "y": 2 },
                "goal": { "x": 3, "y": 4 },
                "max_expansions": 1000,
                "print_path": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.max_expansions, Some(1000));
        assert!(config.print_path);
    }

    #[test]
    fn test_invalid() {
        // missing goal
        assert!(RunConfig::from_json(r#"{ "image": "a.png", "start": { "x": 1, "y": 2 } }"#).is_err());
        // typo in a field name
        assert!(RunConfig::from_json(
            r#"{ "image": "a.png", "start": { "x": 1, "y": 2 }, "goal": { "x": 1, "y": 2 }, "printpath": true }"#
        )
        .is_err());
        // negative coordinates
        assert!(RunConfig::from_json(
            r#"{ "image": "a.png", "start": { "x": -1, "y": 2 }, "goal": { "x": 1, "y": 2 } }"#
        )
        .is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(RunConfig::load("does/not/exist.json").is_err());
    }
}
