use crate::ranges::SplitMode;
use crate::types::*;
use std::path::PathBuf;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One page of an explicit merge layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageSpec {
    /// Input file number, 1-based
    pub file: usize,
    /// Page number within that file, 1-based
    pub page: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: Rotation,
}

impl FromStr for PageSpec {
    type Err = RecomposeError;

    /// Parse `FILE:PAGE` or `FILE:PAGE@DEGREES`, e.g. `2:3@90`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RecomposeError::Config(format!("Invalid page spec \"{s}\""));

        let (location, rotation) = match s.trim().split_once('@') {
            Some((location, degrees)) => {
                let degrees: i32 = degrees.trim().parse().map_err(|_| invalid())?;
                (location, Rotation::from_degrees(degrees)?)
            }
            None => (s.trim(), Rotation::None),
        };
        let (file, page) = location.split_once(':').ok_or_else(invalid)?;

        Ok(Self {
            file: file.trim().parse().map_err(|_| invalid())?,
            page: page.trim().parse().map_err(|_| invalid())?,
            rotation,
        })
    }
}

/// Merge configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MergeOptions {
    pub input_files: Vec<PathBuf>,

    /// Explicit page layout; empty means every page of every input in order
    #[cfg_attr(feature = "serde", serde(default))]
    pub pages: Vec<PageSpec>,
}

impl MergeOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| RecomposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RecomposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.input_files.is_empty() {
            return Err(RecomposeError::Config("No input files specified".to_string()));
        }

        for spec in &self.pages {
            if spec.file == 0 || spec.file > self.input_files.len() {
                return Err(RecomposeError::Config(format!(
                    "Page spec refers to file {} but only {} input files are given",
                    spec.file,
                    self.input_files.len()
                )));
            }
            if spec.page == 0 {
                return Err(RecomposeError::Config(
                    "Page numbers start at 1".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Split configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplitOptions {
    pub input_file: PathBuf,
    pub mode: SplitMode,
}
