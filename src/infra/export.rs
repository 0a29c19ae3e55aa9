//! JSON artifacts consumed by offline visualization.
//!
//! `environment.json` carries `obstacles`, `red_cells` and `green_cells` as
//! lists of `[x, y]` pairs plus a `version` field. `trajectory.json` is an
//! object keyed by episode index; see `TrajectoryLog` for its layout.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description};

use crate::infra::{Error, Position, Result};
use crate::state::TrajectoryLog;

pub const ENVIRONMENT_SCHEMA_VERSION: u32 = 1;
/// Version of the trajectory layout. Not written into the file, whose
/// top-level keys are reserved for episode indices.
pub const TRAJECTORY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentLayout {
    #[serde(default = "default_environment_version")]
    pub version: u32,
    pub obstacles: Vec<Position>,
    pub red_cells: Vec<Position>,
    pub green_cells: Vec<Position>,
}

fn default_environment_version() -> u32 {
    ENVIRONMENT_SCHEMA_VERSION
}

impl EnvironmentLayout {
    pub fn new(
        obstacles: Vec<Position>,
        red_cells: Vec<Position>,
        green_cells: Vec<Position>,
    ) -> Self {
        Self {
            version: ENVIRONMENT_SCHEMA_VERSION,
            obstacles,
            red_cells,
            green_cells,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::io(format!("open environment {}", path.display()), e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Writes export files into one folder, optionally with a timestamp prefix.
pub struct ExportWriter {
    folder: PathBuf,
    prefix: Option<String>,
}

impl ExportWriter {
    pub fn new(folder: Option<&str>, timestamped: bool) -> Result<Self> {
        let folder = PathBuf::from(folder.unwrap_or("."));
        if !folder.exists() {
            fs::create_dir_all(&folder)
                .map_err(|e| Error::io(format!("create {}", folder.display()), e))?;
        }

        let prefix = if timestamped {
            Some(timestamp()?)
        } else {
            None
        };

        Ok(Self { folder, prefix })
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        match &self.prefix {
            Some(prefix) => self.folder.join(format!("{} - {}", prefix, name)),
            None => self.folder.join(name),
        }
    }

    pub fn write_environment(&self, layout: &EnvironmentLayout) -> Result<PathBuf> {
        self.write_json("environment.json", layout)
    }

    pub fn write_trajectory(&self, trajectory: &TrajectoryLog) -> Result<PathBuf> {
        self.write_json("trajectory.json", trajectory)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.path_for(name);
        let file = File::create(&path)
            .map_err(|e| Error::io(format!("create {}", path.display()), e))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer
            .flush()
            .map_err(|e| Error::io(format!("write {}", path.display()), e))?;

        tracing::info!("Saved {}", path.display());
        Ok(path)
    }
}

fn timestamp() -> Result<String> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let format = format_description::parse("[year][month][day]-[hour][minute][second]")
        .map_err(|e| Error::config(format!("timestamp format: {}", e)))?;
    now.format(&format)
        .map_err(|e| Error::config(format!("timestamp: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> EnvironmentLayout {
        EnvironmentLayout::new(
            vec![Position::new(3, 0), Position::new(3, 1)],
            vec![Position::new(0, 0)],
            vec![Position::new(4, 0)],
        )
    }

    #[test]
    fn test_environment_wire_format() {
        let json = serde_json::to_value(layout()).unwrap();
        assert_eq!(json["obstacles"], serde_json::json!([[3, 0], [3, 1]]));
        assert_eq!(json["red_cells"], serde_json::json!([[0, 0]]));
        assert_eq!(json["green_cells"], serde_json::json!([[4, 0]]));
        assert_eq!(json["version"], 1);
    }

    #[test]
    fn test_environment_without_version_still_loads() {
        let raw = r#"{"obstacles": [[1, 2]], "red_cells": [], "green_cells": [[0, 1]]}"#;
        let layout: EnvironmentLayout = serde_json::from_str(raw).unwrap();
        assert_eq!(layout.version, ENVIRONMENT_SCHEMA_VERSION);
        assert_eq!(layout.obstacles, vec![Position::new(1, 2)]);
    }

    #[test]
    fn test_writer_roundtrip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("out");
        let writer = ExportWriter::new(folder.to_str(), false).unwrap();

        let path = writer.write_environment(&layout()).unwrap();
        assert_eq!(path, folder.join("environment.json"));
        assert_eq!(EnvironmentLayout::load(&path).unwrap(), layout());

        let trajectory_path = writer.write_trajectory(&TrajectoryLog::new()).unwrap();
        assert!(TrajectoryLog::load(trajectory_path).unwrap().is_empty());
    }

    #[test]
    fn test_timestamped_names() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().to_str(), true).unwrap();
        let name = writer.path_for("trajectory.json");
        let file_name = name.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.ends_with(" - trajectory.json"));
        assert_eq!(file_name.len(), "YYYYMMDD-HHMMSS - trajectory.json".len());
    }
}
