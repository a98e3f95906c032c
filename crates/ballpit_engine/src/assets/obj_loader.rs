//! OBJ file loader for level geometry

use std::io::BufReader;
use std::path::Path;

use super::LevelError;
use crate::foundation::math::Vec3;
use crate::scene::StaticGeometry;

/// Load a Wavefront OBJ file as static level geometry
///
/// All models in the file are merged. Faces are triangulated; normals,
/// materials and texture coordinates are ignored.
pub fn load_level_obj<P: AsRef<Path>>(path: P) -> Result<StaticGeometry, LevelError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let geometry = parse_level_obj(&source)?;
    log::info!(
        "Loaded level {}: {} vertices, {} triangles",
        path.display(),
        geometry.positions.len(),
        geometry.triangle_count()
    );
    Ok(geometry)
}

/// Parse OBJ source text as static level geometry
pub fn parse_level_obj(source: &str) -> Result<StaticGeometry, LevelError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let mut reader = BufReader::new(source.as_bytes());
    let (models, _materials) =
        tobj::load_obj_buf(&mut reader, &options, |_| Err(tobj::LoadError::OpenFileFailed))?;

    let mut geometry = StaticGeometry::default();
    for model in &models {
        let mesh = &model.mesh;
        let part = StaticGeometry::new(to_vectors(&mesh.positions), mesh.indices.clone());
        log::debug!("OBJ model '{}': {} triangles", model.name, part.triangle_count());
        geometry.append(&part);
    }
    Ok(geometry)
}

fn to_vectors(flat: &[f32]) -> Vec<Vec3> {
    flat.chunks_exact(3).map(|c| Vec3::new(c[0], c[1], c[2])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP_OBJ: &str = "\
o floor
v -1.0 0.0 -1.0
v -1.0 0.0 1.0
v 1.0 0.0 1.0
v 1.0 0.0 -1.0
vn 0.0 1.0 0.0
f 1//1 2//1 3//1 4//1
o step
v 0.0 0.5 0.0
v 0.0 0.5 0.5
v 0.5 0.5 0.5
f 5 6 7
";

    #[test]
    fn test_parse_merges_models_and_triangulates() {
        let geometry = parse_level_obj(STEP_OBJ).unwrap();
        assert_eq!(geometry.triangle_count(), 3);

        let step = geometry.triangle(2).unwrap();
        assert_eq!(step.v0, Vec3::new(0.0, 0.5, 0.0));
        assert!(geometry.triangle(0).unwrap().normal().unwrap().y > 0.99);
    }

    #[test]
    fn test_vertex_normals_do_not_change_geometry() {
        let without_normals = STEP_OBJ
            .lines()
            .filter(|line| !line.starts_with("vn"))
            .map(|line| line.replace("//1", ""))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_level_obj(STEP_OBJ).unwrap(), parse_level_obj(&without_normals).unwrap());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_level_obj("/nonexistent/level.obj");
        assert!(matches!(result, Err(LevelError::Io(_))));
    }
}
