//! Octree spatial partitioning over static level triangles
//!
//! Divides the level's bounding box into a hierarchy of octants. A node
//! subdivides while it holds more triangles than the configured threshold.
//! A triangle is stored in every leaf whose box overlaps the triangle's box,
//! so region queries deduplicate their results.
//!
//! The tree is built once per level load and is immutable afterwards. All
//! queries take `&self` and keep their scratch data on the stack of the call,
//! so independent bodies may query the same tree concurrently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AABB;
use crate::config::ConfigError;
use crate::foundation::math::{utils, Vec3};
use crate::physics::collision::{BoundingSphere, Capsule, Contact, Triangle};
use crate::scene::StaticGeometry;

/// Configuration for octree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum triangles per node before subdivision
    pub max_triangles_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Minimum node size (prevents excessive subdivision)
    pub min_node_size: f32,

    /// Padding added around the level bounds
    pub bounds_margin: f32,
}

impl OctreeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_triangles_per_node == 0 {
            return Err(ConfigError::Invalid("max_triangles_per_node must be at least 1".to_string()));
        }
        if !(self.min_node_size.is_finite() && self.min_node_size > 0.0) {
            return Err(ConfigError::Invalid("min_node_size must be positive".to_string()));
        }
        if !(self.bounds_margin.is_finite() && self.bounds_margin >= 0.0) {
            return Err(ConfigError::Invalid("bounds_margin must not be negative".to_string()));
        }
        Ok(())
    }
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_triangles_per_node: 8,
            max_depth: 16,
            min_node_size: 0.25,
            bounds_margin: 0.01,
        }
    }
}

/// Errors raised while building an octree from level geometry
///
/// Any of these aborts the level load; no partial tree is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OctreeError {
    /// The geometry has no triangles
    #[error("level geometry contains no triangles")]
    EmptyGeometry,

    /// The index list length is not a multiple of three
    #[error("index count {0} is not a multiple of 3")]
    MalformedIndices(usize),

    /// A triangle references a vertex that does not exist
    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        /// Offending triangle
        triangle: usize,
        /// Offending vertex index
        index: u32,
        /// Number of vertices in the geometry
        vertex_count: usize,
    },

    /// A triangle has a NaN or infinite coordinate
    #[error("triangle {0} has a non-finite vertex")]
    NonFiniteVertex(usize),
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// World-space bounds of this node
    pub bounds: AABB,

    /// Indices of the triangles stored in this node (leaves only)
    pub triangles: Vec<u32>,

    /// Child nodes (8 octants), None if this is a leaf
    pub children: Option<Box<[OctreeNode; 8]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Create a new leaf node
    pub fn new(bounds: AABB, depth: u32) -> Self {
        Self {
            bounds,
            triangles: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn should_subdivide(&self, config: &OctreeConfig) -> bool {
        self.triangles.len() > config.max_triangles_per_node
            && self.depth < config.max_depth
            && self.bounds.max_side() * 0.5 >= config.min_node_size
    }

    /// Recursively split this node, distributing triangles to every overlapping octant
    fn subdivide(&mut self, triangles: &[Triangle], config: &OctreeConfig) {
        if !self.should_subdivide(config) {
            return;
        }

        let parent_count = self.triangles.len();
        let depth = self.depth + 1;
        let mut children: [OctreeNode; 8] =
            std::array::from_fn(|octant| OctreeNode::new(self.bounds.octant(octant), depth));

        for index in std::mem::take(&mut self.triangles) {
            let bounds = triangles[index as usize].aabb();
            for child in children.iter_mut() {
                if child.bounds.intersects(&bounds) {
                    child.triangles.push(index);
                }
            }
        }

        for child in children.iter_mut() {
            // A child that kept every triangle would repeat this split forever
            if child.triangles.len() < parent_count {
                child.subdivide(triangles, config);
            }
        }

        self.children = Some(Box::new(children));
    }

    /// Collect triangle indices from every leaf overlapping `region`
    fn collect_overlapping(&self, region: &AABB, results: &mut Vec<u32>) {
        if !self.bounds.intersects(region) {
            return;
        }

        match self.children {
            Some(ref children) => {
                for child in children.iter() {
                    child.collect_overlapping(region, results);
                }
            }
            None => results.extend_from_slice(&self.triangles),
        }
    }

    /// Find the leaf containing `point`
    fn leaf_at(&self, point: Vec3) -> Option<&OctreeNode> {
        if !self.bounds.contains_point(point) {
            return None;
        }
        match self.children {
            Some(ref children) => children.iter().find_map(|child| child.leaf_at(point)),
            None => Some(self),
        }
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a OctreeNode>) {
        match self.children {
            Some(ref children) => {
                for child in children.iter() {
                    child.get_all_leaves(leaves);
                }
            }
            None => leaves.push(self),
        }
    }

    /// Count this node and all descendants
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(OctreeNode::count_nodes).sum())
    }

    /// Deepest level below (and including) this node
    pub fn max_depth(&self) -> u32 {
        self.children.as_ref().map_or(self.depth, |children| {
            children.iter().map(OctreeNode::max_depth).max().unwrap_or(self.depth)
        })
    }
}

/// Summary of a built octree, logged after each level load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctreeStats {
    /// Triangles in the level
    pub triangle_count: usize,
    /// Nodes in the tree, leaves included
    pub node_count: usize,
    /// Leaves in the tree
    pub leaf_count: usize,
    /// Deepest leaf level
    pub depth: u32,
    /// Triangle references stored across all leaves
    pub stored_references: usize,
}

/// Octree over static level triangles
#[derive(Debug, Clone)]
pub struct Octree {
    /// Root node containing the entire level
    pub root: OctreeNode,

    /// Resolved level triangles, indexed by the ids stored in the leaves
    triangles: Vec<Triangle>,

    /// Configuration the tree was built with
    config: OctreeConfig,
}

impl Octree {
    /// Build the octree from level geometry
    ///
    /// Fails on empty geometry, malformed or out-of-range indices and
    /// non-finite vertices.
    pub fn build(geometry: &StaticGeometry, config: OctreeConfig) -> Result<Self, OctreeError> {
        if geometry.indices.len() % 3 != 0 {
            return Err(OctreeError::MalformedIndices(geometry.indices.len()));
        }
        if geometry.is_empty() {
            return Err(OctreeError::EmptyGeometry);
        }

        let vertex_count = geometry.positions.len();
        let mut triangles = Vec::with_capacity(geometry.triangle_count());
        for (triangle, corners) in geometry.indices.chunks_exact(3).enumerate() {
            if let Some(&index) = corners.iter().find(|&&index| index as usize >= vertex_count) {
                return Err(OctreeError::IndexOutOfRange { triangle, index, vertex_count });
            }
            let resolved = Triangle::new(
                geometry.positions[corners[0] as usize],
                geometry.positions[corners[1] as usize],
                geometry.positions[corners[2] as usize],
            );
            if !resolved.is_finite() {
                return Err(OctreeError::NonFiniteVertex(triangle));
            }
            triangles.push(resolved);
        }

        let degenerate = triangles.iter().filter(|triangle| triangle.normal().is_none()).count();
        if degenerate > 0 {
            log::debug!("Octree: {} degenerate triangles will only collide through their edges", degenerate);
        }

        let bounds = triangles
            .iter()
            .map(Triangle::aabb)
            .reduce(|a, b| a.union(&b))
            .ok_or(OctreeError::EmptyGeometry)?
            .expanded(config.bounds_margin);

        let mut root = OctreeNode::new(bounds, 0);
        root.triangles = (0..triangles.len() as u32).collect();
        root.subdivide(&triangles, &config);

        let octree = Self { root, triangles, config };
        let stats = octree.stats();
        log::info!(
            "Octree built: {} triangles, {} nodes ({} leaves), depth {}",
            stats.triangle_count,
            stats.node_count,
            stats.leaf_count,
            stats.depth
        );
        Ok(octree)
    }

    /// Configuration the tree was built with
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Bounds of the whole tree
    pub fn bounds(&self) -> AABB {
        self.root.bounds
    }

    /// Number of level triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of nodes, leaves included
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.get_all_leaves().len()
    }

    /// Deepest leaf level (0 when the root is a leaf)
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }

    /// Look up a triangle by index
    pub fn triangle(&self, index: usize) -> Option<&Triangle> {
        self.triangles.get(index)
    }

    /// Candidate triangles whose leaves overlap `region`, sorted and deduplicated
    pub fn query_aabb(&self, region: &AABB) -> Vec<usize> {
        let mut results = Vec::new();
        self.root.collect_overlapping(region, &mut results);
        results.sort_unstable();
        results.dedup();
        results.into_iter().map(|index| index as usize).collect()
    }

    /// Triangles whose bounds touch the sphere
    pub fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<usize> {
        let region = BoundingSphere::new(center, radius).aabb();
        self.query_aabb(&region)
            .into_iter()
            .filter(|&index| self.triangles[index].aabb().intersects_sphere(center, radius))
            .collect()
    }

    /// Triangles stored in the leaf containing `point` (empty outside the tree)
    pub fn query_point(&self, point: Vec3) -> Vec<usize> {
        self.root
            .leaf_at(point)
            .map(|leaf| leaf.triangles.iter().map(|&index| index as usize).collect())
            .unwrap_or_default()
    }

    /// Resolve a sphere against the level
    ///
    /// Each overlapping triangle pushes a working copy of the sphere out of
    /// itself in turn. The returned contact is the total push: its normal is
    /// the direction the sphere moved, its depth the distance.
    pub fn sphere_intersect(&self, sphere: &BoundingSphere) -> Option<Contact> {
        let mut working = *sphere;
        let mut hit = false;

        for index in self.query_aabb(&sphere.aabb()) {
            if let Some(contact) = self.triangles[index].sphere_contact(&working) {
                working.center += contact.correction();
                hit = true;
            }
        }

        if hit {
            Contact::from_displacement(working.center - sphere.center)
        } else {
            None
        }
    }

    /// Resolve a capsule against the level
    ///
    /// Same accumulation as [`Octree::sphere_intersect`], measured at the
    /// capsule's center. A capsule that only touches the level gets a
    /// zero-depth contact along the mean of the touched surface normals.
    pub fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        let mut working = *capsule;
        let mut hit = false;
        let mut normals = Vec3::zeros();

        for index in self.query_aabb(&capsule.aabb()) {
            if let Some(contact) = self.triangles[index].capsule_contact(&working) {
                working.translate(contact.correction());
                normals += contact.normal;
                hit = true;
            }
        }

        if !hit {
            return None;
        }
        Contact::from_displacement(working.center() - capsule.center())
            .or_else(|| utils::try_normalize(normals).map(|normal| Contact { normal, depth: 0.0 }))
    }

    /// Get all leaf nodes (for visualization)
    pub fn get_all_leaves(&self) -> Vec<&OctreeNode> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves
    }

    /// Bounds of every leaf, for debug wireframe drawing
    pub fn leaf_bounds(&self) -> Vec<AABB> {
        self.get_all_leaves().into_iter().map(|leaf| leaf.bounds).collect()
    }

    /// Tree statistics
    pub fn stats(&self) -> OctreeStats {
        let leaves = self.get_all_leaves();
        OctreeStats {
            triangle_count: self.triangles.len(),
            node_count: self.node_count(),
            leaf_count: leaves.len(),
            depth: self.depth(),
            stored_references: leaves.iter().map(|leaf| leaf.triangles.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Floor at y = 0 made of `n * n` quads, spanning [-size, size]
    fn tiled_floor(n: usize, size: f32) -> StaticGeometry {
        let mut geometry = StaticGeometry::default();
        let step = 2.0 * size / n as f32;
        for i in 0..n {
            for j in 0..n {
                let x0 = -size + i as f32 * step;
                let z0 = -size + j as f32 * step;
                geometry.push_quad(
                    Vec3::new(x0, 0.0, z0),
                    Vec3::new(x0, 0.0, z0 + step),
                    Vec3::new(x0 + step, 0.0, z0 + step),
                    Vec3::new(x0 + step, 0.0, z0),
                );
            }
        }
        geometry
    }

    #[test]
    fn test_octree_rejects_malformed_geometry() {
        let config = OctreeConfig::default();
        assert_eq!(
            Octree::build(&StaticGeometry::default(), config.clone()).unwrap_err(),
            OctreeError::EmptyGeometry
        );

        let short = StaticGeometry::new(vec![Vec3::zeros(); 3], vec![0, 1]);
        assert_eq!(Octree::build(&short, config.clone()).unwrap_err(), OctreeError::MalformedIndices(2));

        let dangling = StaticGeometry::new(vec![Vec3::zeros(); 3], vec![0, 1, 5]);
        assert!(matches!(
            Octree::build(&dangling, config.clone()),
            Err(OctreeError::IndexOutOfRange { triangle: 0, index: 5, vertex_count: 3 })
        ));

        let nan = StaticGeometry::new(
            vec![Vec3::zeros(), Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)],
            vec![0, 1, 2],
        );
        assert_eq!(Octree::build(&nan, config).unwrap_err(), OctreeError::NonFiniteVertex(0));
    }

    #[test]
    fn test_octree_subdivision() {
        let octree = Octree::build(&tiled_floor(8, 10.0), OctreeConfig::default()).unwrap();
        let stats = octree.stats();

        assert_eq!(stats.triangle_count, 128);
        assert!(octree.root.children.is_some());
        assert!(stats.depth > 0);
        assert!(stats.leaf_count > 1);
        assert!(octree.get_all_leaves().iter().all(|leaf| leaf.triangles.len() < 128));
        // Every triangle is reachable
        assert_eq!(octree.query_aabb(&octree.bounds()).len(), 128);
    }

    #[test]
    fn test_overlapping_large_triangles_terminate() {
        let mut geometry = StaticGeometry::default();
        for i in 0..20 {
            let y = i as f32 * 0.001;
            geometry.push_triangle(
                Vec3::new(-50.0, y, -50.0),
                Vec3::new(0.0, y, 50.0),
                Vec3::new(50.0, y, -50.0),
            );
        }
        let octree = Octree::build(&geometry, OctreeConfig::default()).unwrap();
        assert_eq!(octree.query_aabb(&octree.bounds()).len(), 20);
    }

    #[test]
    fn test_radius_and_point_queries() {
        let octree = Octree::build(&tiled_floor(8, 10.0), OctreeConfig::default()).unwrap();

        let near = octree.query_sphere(Vec3::new(0.1, 0.0, 0.1), 0.05);
        assert!(!near.is_empty());
        assert!(near.len() < 8);

        assert!(octree.query_sphere(Vec3::new(0.0, 5.0, 0.0), 1.0).is_empty());
        assert!(octree.query_point(Vec3::new(100.0, 0.0, 0.0)).is_empty());
        assert!(!octree.query_point(Vec3::new(1.0, 0.0, 1.0)).is_empty());
    }

    #[test]
    fn test_sphere_intersect_resting_on_floor() {
        let octree = Octree::build(&tiled_floor(8, 10.0), OctreeConfig::default()).unwrap();

        let sphere = BoundingSphere::new(Vec3::new(0.3, 0.15, -0.7), 0.2);
        let contact = octree.sphere_intersect(&sphere).unwrap();
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(contact.depth, 0.05, epsilon = 1e-5);

        assert!(octree
            .sphere_intersect(&BoundingSphere::new(Vec3::new(0.3, 1.0, -0.7), 0.2))
            .is_none());
    }

    #[test]
    fn test_sphere_intersect_on_shared_edge_pushes_once() {
        // Center sits right above a vertex shared by several floor triangles
        let octree = Octree::build(&tiled_floor(4, 4.0), OctreeConfig::default()).unwrap();
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.1, 0.0), 0.2);
        let contact = octree.sphere_intersect(&sphere).unwrap();

        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(contact.depth, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_capsule_intersect_standing_and_clear() {
        let octree = Octree::build(&tiled_floor(8, 10.0), OctreeConfig::default()).unwrap();

        let sunk = Capsule::new(Vec3::new(2.0, 0.3, 2.0), Vec3::new(2.0, 1.3, 2.0), 0.5);
        let contact = octree.capsule_intersect(&sunk).unwrap();
        assert!(contact.normal.y > 0.99);
        assert_relative_eq!(contact.depth, 0.2, epsilon = 1e-5);

        let clear = sunk.translated(Vec3::new(0.0, 1.0, 0.0));
        assert!(octree.capsule_intersect(&clear).is_none());
    }

    #[test]
    fn test_capsule_intersect_resting_capsule_touches_floor() {
        let octree = Octree::build(&tiled_floor(8, 10.0), OctreeConfig::default()).unwrap();

        let resting = Capsule::new(Vec3::new(1.0, 0.5, 1.0), Vec3::new(1.0, 1.5, 1.0), 0.5);
        let contact = octree.capsule_intersect(&resting).unwrap();
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_eq!(contact.depth, 0.0);
        assert_eq!(contact.correction(), Vec3::zeros());
    }

    #[test]
    fn test_leaf_bounds_cover_level() {
        let octree = Octree::build(&tiled_floor(8, 10.0), OctreeConfig::default()).unwrap();
        let leaves = octree.leaf_bounds();
        assert_eq!(leaves.len(), octree.stats().leaf_count);
        assert!(leaves.iter().all(|leaf| octree.bounds().intersects(leaf)));
    }
}
