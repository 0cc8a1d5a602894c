use heightscape_common::CellCoord;

/// Rejected streaming configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(i32),
    #[error("radius must not be negative, got {0}")]
    InvalidRadius(i32),
    #[error("world extents must be positive, got {width}x{height}")]
    InvalidExtents { width: f32, height: f32 },
    #[error("window of radius {radius} with cell size {cell_size} exceeds the addressable grid")]
    WindowTooLarge { cell_size: i32, radius: i32 },
    #[error("eviction distance must be at least 1 radius")]
    InvalidEviction,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors reported back to the host on the build completion path.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("build ticket for {coord} is no longer current")]
    StaleBuild { coord: CellCoord },
    #[error("no cell at {0}")]
    UnknownCell(CellCoord),
    #[error("cell {0} has no build in flight")]
    NotLoading(CellCoord),
}

/// Failure raised by a cell builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("heightmap source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("build failed: {0}")]
    Failed(String),
}
