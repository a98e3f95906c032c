//! Built-in test arena
//!
//! A tiled square floor at y = 0 enclosed by four walls, with an optional
//! ramp leading up to a raised platform. Every surface faces the playable
//! side, which the capsule query relies on.

use super::StaticGeometry;
use crate::core::LevelConfig;
use crate::foundation::math::Vec3;

const FLOOR_TILE: f32 = 5.0;
const PLATFORM_HEIGHT: f32 = 3.0;

/// Generate the arena described by `config`
pub fn generate(config: &LevelConfig) -> StaticGeometry {
    let half = config.arena_half_extent;
    let mut geometry = StaticGeometry::default();

    push_floor(&mut geometry, -half, -half, half, half, 0.0);

    if config.arena_wall_height > 0.0 {
        let height = config.arena_wall_height;
        push_wall(&mut geometry, (-half, -half), (-half, half), 0.0, height);
        push_wall(&mut geometry, (half, half), (half, -half), 0.0, height);
        push_wall(&mut geometry, (half, -half), (-half, -half), 0.0, height);
        push_wall(&mut geometry, (-half, half), (half, half), 0.0, height);
    }

    if config.arena_ramp {
        push_ramp_and_platform(&mut geometry, half);
    }

    log::debug!(
        "Generated arena: half extent {}, {} triangles",
        half,
        geometry.triangle_count()
    );
    geometry
}

/// Upward-facing rectangle at `y`, split into roughly square tiles
fn push_floor(geometry: &mut StaticGeometry, x0: f32, z0: f32, x1: f32, z1: f32, y: f32) {
    let tiles_x = ((x1 - x0) / FLOOR_TILE).ceil().max(1.0) as usize;
    let tiles_z = ((z1 - z0) / FLOOR_TILE).ceil().max(1.0) as usize;
    let step_x = (x1 - x0) / tiles_x as f32;
    let step_z = (z1 - z0) / tiles_z as f32;

    for i in 0..tiles_x {
        for j in 0..tiles_z {
            let ax = x0 + i as f32 * step_x;
            let az = z0 + j as f32 * step_z;
            geometry.push_quad(
                Vec3::new(ax, y, az),
                Vec3::new(ax, y, az + step_z),
                Vec3::new(ax + step_x, y, az + step_z),
                Vec3::new(ax + step_x, y, az),
            );
        }
    }
}

/// Vertical wall between two (x, z) points; it faces left of `from -> to` seen from above
fn push_wall(geometry: &mut StaticGeometry, from: (f32, f32), to: (f32, f32), bottom: f32, top: f32) {
    geometry.push_quad(
        Vec3::new(from.0, bottom, from.1),
        Vec3::new(from.0, top, from.1),
        Vec3::new(to.0, top, to.1),
        Vec3::new(to.0, bottom, to.1),
    );
}

fn push_ramp_and_platform(geometry: &mut StaticGeometry, half: f32) {
    let ramp_start = half * 0.15;
    let platform_x0 = half * 0.4;
    let platform_x1 = half * 0.7;
    let platform_z = half * 0.15;

    // Ramp rising along +X onto the platform's near edge
    geometry.push_quad(
        Vec3::new(ramp_start, 0.0, -platform_z),
        Vec3::new(ramp_start, 0.0, platform_z),
        Vec3::new(platform_x0, PLATFORM_HEIGHT, platform_z),
        Vec3::new(platform_x0, PLATFORM_HEIGHT, -platform_z),
    );

    push_floor(geometry, platform_x0, -platform_z, platform_x1, platform_z, PLATFORM_HEIGHT);

    push_wall(geometry, (platform_x1, -platform_z), (platform_x1, platform_z), 0.0, PLATFORM_HEIGHT);
    push_wall(geometry, (platform_x0, -platform_z), (platform_x1, -platform_z), 0.0, PLATFORM_HEIGHT);
    push_wall(geometry, (platform_x1, platform_z), (platform_x0, platform_z), 0.0, PLATFORM_HEIGHT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Octree, OctreeConfig};
    use approx::assert_relative_eq;

    #[test]
    fn test_surfaces_face_the_playable_side() {
        let config = LevelConfig {
            arena_ramp: false,
            ..LevelConfig::default()
        };
        let geometry = generate(&config);

        for index in 0..geometry.triangle_count() {
            let triangle = geometry.triangle(index).unwrap();
            let normal = triangle.normal().unwrap();
            // Inward means pointing back towards the origin
            let towards_origin = -triangle.centroid();
            if normal.y.abs() < 0.5 {
                assert!(normal.dot(&towards_origin) > 0.0, "wall {index} faces outwards");
            } else {
                assert!(normal.y > 0.0, "floor {index} faces down");
            }
        }
    }

    #[test]
    fn test_ramp_normal_leans_back() {
        let mut geometry = StaticGeometry::default();
        push_ramp_and_platform(&mut geometry, 30.0);
        let ramp = geometry.triangle(0).unwrap().normal().unwrap();
        assert!(ramp.y > 0.0);
        assert!(ramp.x < 0.0);
        assert_relative_eq!(ramp.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_arena_builds_an_octree() {
        let geometry = generate(&LevelConfig::default());
        let octree = Octree::build(&geometry, OctreeConfig::default()).unwrap();
        assert_eq!(octree.triangle_count(), geometry.triangle_count());
        assert!(octree.node_count() > 1);
    }
}
