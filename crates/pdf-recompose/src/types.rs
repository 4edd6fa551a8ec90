use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecomposeError {
    #[error("Could not read \"{name}\": {reason}")]
    SourceUnreadable { name: String, reason: String },
    #[error("Unknown source: {0}")]
    UnknownSource(SourceId),
    #[error("Page index {index} is out of range for {source_id} ({page_count} pages)")]
    ReferenceOutOfRange {
        source_id: SourceId,
        index: usize,
        page_count: usize,
    },
    #[error("Assembly failed: {0}")]
    AssemblyFailed(String),
    #[error("No pages to assemble")]
    EmptyPlan,
    #[error("Rotation must be a multiple of 90 degrees, got {0}")]
    InvalidRotation(i32),
    #[error("Invalid page range: {0}")]
    InvalidRange(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RecomposeError>;

/// Identifier of one loaded source document.
///
/// Minted by the [`SourceRegistry`](crate::SourceRegistry) and never reused within a
/// process, so a stale id can only ever miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source #{}", self.0)
    }
}

/// Identifier of one entry in a [`PageCatalog`](crate::PageCatalog).
///
/// Stays attached to its entry across reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page #{}", self.0)
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height >= width
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Rotation applied on top of a page's own rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i32", into = "i32")
)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Normalize any multiple of 90 (negative values included) into a rotation.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(RecomposeError::InvalidRotation(degrees));
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Rotation::None,
            90 => Rotation::Clockwise90,
            180 => Rotation::Clockwise180,
            _ => Rotation::Clockwise270,
        })
    }

    /// Add `degrees` to this rotation, wrapping at 360.
    pub fn rotated_by(self, degrees: i32) -> Result<Self> {
        let delta = Self::from_degrees(degrees)?;
        Ok(self.compose(delta))
    }

    pub fn compose(self, other: Rotation) -> Rotation {
        match (self.degrees() + other.degrees()) % 360 {
            0 => Rotation::None,
            90 => Rotation::Clockwise90,
            180 => Rotation::Clockwise180,
            _ => Rotation::Clockwise270,
        }
    }

    pub fn is_none(self) -> bool {
        self == Rotation::None
    }
}

impl TryFrom<i32> for Rotation {
    type Error = RecomposeError;

    fn try_from(degrees: i32) -> Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Width and height of a page box, in points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
}

impl PageGeometry {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
        }
    }

    pub fn orientation(self) -> Orientation {
        if self.width_pt > self.height_pt {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Size rounded to whole points, used to compare pages for equality.
    pub fn rounded(self) -> (i64, i64) {
        (self.width_pt.round() as i64, self.height_pt.round() as i64)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        let (width_pt, height_pt) = crate::constants::DEFAULT_PAGE_DIMENSIONS;
        Self {
            width_pt,
            height_pt,
        }
    }
}
