//! Octree queries checked against brute force over the generated arena

use approx::assert_relative_eq;
use ballpit_engine::prelude::*;
use ballpit_engine::scene::arena;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn arena_octree() -> (StaticGeometry, Octree) {
    let geometry = arena::generate(&LevelConfig::default());
    let octree = Octree::build(&geometry, OctreeConfig::default()).unwrap();
    (geometry, octree)
}

#[test]
fn test_sphere_query_finds_every_touching_triangle() {
    let (geometry, octree) = arena_octree();
    let mut rng = StdRng::seed_from_u64(17);

    for _ in 0..200 {
        let center = Vec3::new(
            rng.gen_range(-32.0..32.0),
            rng.gen_range(-1.0..9.0),
            rng.gen_range(-32.0..32.0),
        );
        let radius = rng.gen_range(0.1..2.0);
        let found = octree.query_sphere(center, radius);

        for index in 0..geometry.triangle_count() {
            let triangle = geometry.triangle(index).unwrap();
            let closest = triangle.closest_point(center);
            if (closest - center).magnitude() < radius {
                assert!(found.contains(&index), "triangle {index} missed for sphere at {center:?}");
            }
        }
    }
}

#[test]
fn test_query_results_are_deduplicated() {
    let (_, octree) = arena_octree();
    let found = octree.query_aabb(&octree.bounds());
    let mut sorted = found.clone();
    sorted.dedup();
    assert_eq!(found, sorted);
    assert_eq!(found.len(), octree.triangle_count());
}

#[test]
fn test_sphere_resting_on_floor_gets_pushed_up() {
    let (_, octree) = arena_octree();
    let contact = octree
        .sphere_intersect(&BoundingSphere::new(Vec3::new(-6.0, 0.1, 11.0), 0.2))
        .unwrap();
    assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(contact.depth, 0.1, epsilon = 1e-5);
}

#[test]
fn test_sphere_in_corner_is_pushed_out_of_both_walls() {
    let (_, octree) = arena_octree();
    let sphere = BoundingSphere::new(Vec3::new(-29.9, 2.0, -29.9), 0.2);
    let contact = octree.sphere_intersect(&sphere).unwrap();

    let resolved = sphere.center + contact.correction();
    assert_relative_eq!(resolved.x, -29.8, epsilon = 1e-4);
    assert_relative_eq!(resolved.z, -29.8, epsilon = 1e-4);
    assert_relative_eq!(resolved.y, 2.0, epsilon = 1e-4);
}

#[test]
fn test_capsule_against_wall_is_pushed_inwards() {
    let (_, octree) = arena_octree();
    let capsule = Capsule::new(Vec3::new(29.8, 2.0, 3.0), Vec3::new(29.8, 3.0, 3.0), 0.5);
    let contact = octree.capsule_intersect(&capsule).unwrap();

    assert_relative_eq!(contact.normal, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(contact.depth, 0.3, epsilon = 1e-4);
}

#[test]
fn test_region_queries_outside_the_level_are_empty() {
    let (_, octree) = arena_octree();
    assert!(octree.query_sphere(Vec3::new(0.0, 50.0, 0.0), 1.0).is_empty());
    assert!(octree.query_point(Vec3::new(100.0, 0.0, 0.0)).is_empty());
    assert!(octree
        .sphere_intersect(&BoundingSphere::new(Vec3::new(0.0, 50.0, 0.0), 1.0))
        .is_none());
}

#[test]
fn test_leaf_bounds_match_stats() {
    let (_, octree) = arena_octree();
    let stats = octree.stats();
    assert_eq!(octree.leaf_bounds().len(), stats.leaf_count);
    assert!(stats.node_count > stats.leaf_count);
    assert!(stats.stored_references >= stats.triangle_count);
    assert!(stats.depth <= octree.config().max_depth);
}
