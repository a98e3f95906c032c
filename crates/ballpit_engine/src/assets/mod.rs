//! Level loading
//!
//! Turns a [`LevelConfig`] into static geometry (from an OBJ file or the
//! built-in arena) and builds the octree the simulation collides against.

#[cfg(feature = "obj-loading")]
pub mod obj_loader;

#[cfg(feature = "obj-loading")]
pub use obj_loader::{load_level_obj, parse_level_obj};

use thiserror::Error;

use crate::core::LevelConfig;
use crate::scene::{arena, StaticGeometry};
use crate::spatial::{Octree, OctreeConfig, OctreeError};

/// Errors raised while mounting a level
#[derive(Error, Debug)]
pub enum LevelError {
    /// The level file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The OBJ file could not be parsed
    #[cfg(feature = "obj-loading")]
    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    /// The configured level needs a feature this build does not have
    #[error("unsupported level source: {0}")]
    Unsupported(String),

    /// The geometry could not be indexed
    #[error("invalid level geometry: {0}")]
    Geometry(#[from] OctreeError),
}

/// Produce the static geometry `config` describes
pub fn load_geometry(config: &LevelConfig) -> Result<StaticGeometry, LevelError> {
    match config.obj_path {
        Some(ref path) => load_obj_path(path),
        None => Ok(arena::generate(config)),
    }
}

#[cfg(feature = "obj-loading")]
fn load_obj_path(path: &str) -> Result<StaticGeometry, LevelError> {
    load_level_obj(path)
}

#[cfg(not(feature = "obj-loading"))]
fn load_obj_path(path: &str) -> Result<StaticGeometry, LevelError> {
    Err(LevelError::Unsupported(format!("{path}: built without the obj-loading feature")))
}

/// Load the level and build its octree
///
/// Fails without producing a partial index.
pub fn load_level(config: &LevelConfig, octree_config: OctreeConfig) -> Result<Octree, LevelError> {
    let geometry = load_geometry(config)?;
    let octree = Octree::build(&geometry, octree_config)?;
    Ok(octree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_the_arena() {
        let octree = load_level(&LevelConfig::default(), OctreeConfig::default()).unwrap();
        assert!(octree.triangle_count() > 0);
    }

    #[cfg(feature = "obj-loading")]
    #[test]
    fn test_obj_level_from_file() {
        let path = std::env::temp_dir().join("ballpit_test_level.obj");
        std::fs::write(&path, "v 0 0 0\nv 0 0 1\nv 1 0 1\nf 1 2 3\n").unwrap();

        let config = LevelConfig {
            obj_path: Some(path.to_string_lossy().into_owned()),
            ..LevelConfig::default()
        };
        let octree = load_level(&config, OctreeConfig::default()).unwrap();
        assert_eq!(octree.triangle_count(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[cfg(feature = "obj-loading")]
    #[test]
    fn test_empty_obj_is_a_geometry_error() {
        let path = std::env::temp_dir().join("ballpit_test_empty.obj");
        std::fs::write(&path, "# nothing here\n").unwrap();

        let config = LevelConfig {
            obj_path: Some(path.to_string_lossy().into_owned()),
            ..LevelConfig::default()
        };
        assert!(matches!(
            load_level(&config, OctreeConfig::default()),
            Err(LevelError::Geometry(OctreeError::EmptyGeometry))
        ));

        std::fs::remove_file(&path).ok();
    }
}
