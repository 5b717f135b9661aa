//! Barnes-Hut quadtree stored as an arena of nodes.
//!
//! The tree is rebuilt from scratch every simulation step: particles move every frame, and
//! rebuilding costs O(n log n), the same order as the force pass that follows. Nodes live in a
//! single `Vec` and refer to their children by [`NodeIndex`], so tearing a tree down is a single
//! deallocation (or a [`BarnesHutTree::reset`] that keeps the capacity).
//!
//! Every node keeps the total mass and center of mass of everything ever inserted below it. Both
//! are updated on the way down during insertion, which is what lets the force traversal treat a
//! distant subtree as a single pseudo-body.
use std::ptr;

use log::{debug, trace};

use crate::models::{Quadrant, Rectangle, Vector3};
use crate::particles::{gravitational_force, Particle};
use crate::utils::MAX_TREE_DEPTH;

/// Position of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub const ROOT: NodeIndex = NodeIndex(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One quadrant of space.
#[derive(Debug, Clone)]
pub struct BarnesHutNode<'a> {
    bounds: Rectangle,
    depth: usize,
    particle: Option<&'a Particle>,
    /// Extra occupants of a leaf at the depth cap whose positions could not be told apart.
    coincident: Vec<&'a Particle>,
    quadrants: [Option<NodeIndex>; 4],
    center_of_mass: Vector3,
    total_mass: f64,
    leaf: bool,
}

impl<'a> BarnesHutNode<'a> {
    fn new(bounds: Rectangle, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            particle: None,
            coincident: Vec::new(),
            quadrants: [None; 4],
            center_of_mass: Vector3::ZERO,
            total_mass: 0.0,
            leaf: true,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The particle stored directly in this node. Only leaves ever hold one.
    pub fn particle(&self) -> Option<&'a Particle> {
        self.particle
    }

    pub fn quadrants(&self) -> [Option<NodeIndex>; 4] {
        self.quadrants
    }

    pub fn child(&self, quadrant: Quadrant) -> Option<NodeIndex> {
        self.quadrants[quadrant.index()]
    }

    pub fn center_of_mass(&self) -> Vector3 {
        self.center_of_mass
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Every particle held directly by this node.
    pub fn occupants(&self) -> impl Iterator<Item = &'a Particle> + '_ {
        self.particle.into_iter().chain(self.coincident.iter().copied())
    }

    /// Folds one more particle into the running center of mass.
    fn accumulate(&mut self, particle: &Particle) {
        let mass = particle.mass();
        let total_mass = self.total_mass + mass;
        self.center_of_mass =
            (self.center_of_mass * self.total_mass + particle.position * mass) / total_mass;
        self.total_mass = total_mass;
    }

    /// Closed-interval test used to decide whether a particle may lie in this subtree. Points on
    /// a center line descend into the west / north children, which puts them on those children's
    /// far edges.
    fn covers(&self, point: Vector3) -> bool {
        point.x >= self.bounds.left()
            && point.x <= self.bounds.right()
            && point.y >= self.bounds.top()
            && point.y <= self.bounds.bottom()
    }
}

/// Counters collected while computing the force on one particle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Pairwise evaluations against real particles.
    pub direct: usize,
    /// Evaluations against a whole subtree's center of mass.
    pub approximated: usize,
}

impl TraversalStats {
    pub fn interactions(&self) -> usize {
        self.direct + self.approximated
    }
}

impl std::ops::AddAssign for TraversalStats {
    fn add_assign(&mut self, rhs: TraversalStats) {
        self.direct += rhs.direct;
        self.approximated += rhs.approximated;
    }
}

struct ForceQuery<'p> {
    particle: &'p Particle,
    theta: f64,
    g: f64,
    dampening: f64,
}

/// A quadtree over a fixed root region, borrowing the particles it indexes.
///
/// # Examples
///
/// ```
/// use nbody_sim::models::{Rectangle, Vector3};
/// use nbody_sim::particles::{BarnesHutTree, Particle};
///
/// let particles = vec![
///     Particle::new(1.0, Vector3::planar(10.0, 10.0), Vector3::ZERO).unwrap(),
///     Particle::new(3.0, Vector3::planar(30.0, 10.0), Vector3::ZERO).unwrap(),
/// ];
///
/// let mut tree = BarnesHutTree::new(Rectangle::new(0.0, 0.0, 40.0, 40.0));
/// for particle in &particles {
///     assert!(tree.insert(particle));
/// }
///
/// let root = tree.root();
/// assert_eq!(root.total_mass(), 4.0);
/// assert_eq!(root.center_of_mass(), Vector3::planar(25.0, 10.0));
/// assert!(!root.is_leaf());
///
/// let outside = Particle::new(1.0, Vector3::planar(40.0, 0.0), Vector3::ZERO).unwrap();
/// assert!(!tree.insert(&outside));
/// ```
#[derive(Debug, Clone)]
pub struct BarnesHutTree<'a> {
    nodes: Vec<BarnesHutNode<'a>>,
    len: usize,
}

impl<'a> BarnesHutTree<'a> {
    /// Creates a tree holding a single empty leaf covering `bounds`.
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            nodes: vec![BarnesHutNode::new(bounds, 0)],
            len: 0,
        }
    }

    /// Builds a tree over `bounds` from every particle that falls inside it.
    ///
    /// Particles outside the bounds are skipped; compare [`BarnesHutTree::len`] with the input
    /// size to detect them.
    pub fn build<I>(bounds: Rectangle, particles: I) -> Self
    where
        I: IntoIterator<Item = &'a Particle>,
    {
        let mut tree = Self::new(bounds);
        for particle in particles {
            tree.insert(particle);
        }
        trace!("built tree with {} particles in {} nodes", tree.len, tree.nodes.len());
        tree
    }

    /// Drops every node and starts over with an empty root, keeping the arena's capacity.
    pub fn reset(&mut self, bounds: Rectangle) {
        self.nodes.clear();
        self.nodes.push(BarnesHutNode::new(bounds, 0));
        self.len = 0;
    }

    pub fn bounds(&self) -> Rectangle {
        self.root().bounds
    }

    pub fn root(&self) -> &BarnesHutNode<'a> {
        &self.nodes[NodeIndex::ROOT.0]
    }

    pub fn node(&self, index: NodeIndex) -> &BarnesHutNode<'a> {
        &self.nodes[index.0]
    }

    /// All nodes in allocation order, root first.
    pub fn nodes(&self) -> &[BarnesHutNode<'a>] {
        &self.nodes
    }

    /// Handles of every node, in the same order as [`BarnesHutTree::nodes`].
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of particles accepted by [`BarnesHutTree::insert`].
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a particle, returning `false` without touching the tree when its position lies
    /// outside the root bounds.
    pub fn insert(&mut self, particle: &'a Particle) -> bool {
        if !self.root().bounds.contains(particle.position) {
            return false;
        }
        self.insert_below(NodeIndex::ROOT, particle);
        self.len += 1;
        true
    }

    fn insert_below(&mut self, start: NodeIndex, particle: &'a Particle) {
        let mut current = start;
        loop {
            let node = &mut self.nodes[current.0];
            node.accumulate(particle);

            if node.leaf {
                let stored = node.particle;
                match stored {
                    None => {
                        node.particle = Some(particle);
                        return;
                    }
                    Some(_) if node.depth >= MAX_TREE_DEPTH => {
                        debug!(
                            "depth cap reached at {:?}, sharing leaf between coincident particles",
                            particle.position
                        );
                        node.coincident.push(particle);
                        return;
                    }
                    Some(existing) => {
                        node.particle = None;
                        node.leaf = false;
                        let child = self.child_for(current, existing.position);
                        self.insert_below(child, existing);
                    }
                }
            }

            current = self.child_for(current, particle.position);
        }
    }

    /// Returns the child quadrant `position` belongs to, allocating it if needed.
    fn child_for(&mut self, parent: NodeIndex, position: Vector3) -> NodeIndex {
        let node = &self.nodes[parent.0];
        let quadrant = node.bounds.quadrant_of(position);
        if let Some(child) = node.quadrants[quadrant.index()] {
            return child;
        }
        let bounds = node.bounds.quadrant(quadrant);
        let depth = node.depth + 1;
        let child = NodeIndex(self.nodes.len());
        self.nodes.push(BarnesHutNode::new(bounds, depth));
        self.nodes[parent.0].quadrants[quadrant.index()] = Some(child);
        child
    }

    /// Collects every particle whose position lies inside `range`.
    pub fn query(&self, range: &Rectangle) -> Vec<&'a Particle> {
        let mut found = Vec::new();
        self.query_into(range, &mut found);
        found
    }

    /// Appends every particle whose position lies inside `range` to `found`.
    pub fn query_into(&self, range: &Rectangle, found: &mut Vec<&'a Particle>) {
        self.query_node(NodeIndex::ROOT, range, found);
    }

    fn query_node(&self, index: NodeIndex, range: &Rectangle, found: &mut Vec<&'a Particle>) {
        let node = &self.nodes[index.0];
        if !node.bounds.intersects(range) {
            return;
        }
        found.extend(node.occupants().filter(|p| range.contains(p.position)));
        for child in node.quadrants.iter().flatten() {
            self.query_node(*child, range, found);
        }
    }

    /// Net force on `particle` from everything in the tree.
    ///
    /// A subtree is replaced by its center of mass when `width / distance < theta`; `theta = 0`
    /// evaluates every pair exactly. The particle itself is recognised by identity and never
    /// contributes.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody_sim::models::{Rectangle, Vector3};
    /// use nbody_sim::particles::{BarnesHutTree, Particle};
    ///
    /// let particles = vec![
    ///     Particle::new(1.0, Vector3::planar(0.0, 0.0), Vector3::ZERO).unwrap(),
    ///     Particle::new(1.0, Vector3::planar(10.0, 0.0), Vector3::ZERO).unwrap(),
    ///     Particle::new(1.0, Vector3::planar(0.0, 10.0), Vector3::ZERO).unwrap(),
    /// ];
    /// let tree = BarnesHutTree::build(Rectangle::centered(0.0, 0.0, 50.0), &particles);
    ///
    /// let force = tree.compute_force(&particles[0], 0.0, 1.0, 0.0);
    /// assert!((force.x - 0.01).abs() < 1e-12);
    /// assert!((force.y - 0.01).abs() < 1e-12);
    /// ```
    pub fn compute_force(&self, particle: &Particle, theta: f64, g: f64, dampening: f64) -> Vector3 {
        self.compute_force_with_stats(particle, theta, g, dampening).0
    }

    /// Like [`BarnesHutTree::compute_force`], also reporting how many direct and aggregated
    /// interactions were evaluated.
    pub fn compute_force_with_stats(
        &self,
        particle: &Particle,
        theta: f64,
        g: f64,
        dampening: f64,
    ) -> (Vector3, TraversalStats) {
        let query = ForceQuery { particle, theta, g, dampening };
        let mut stats = TraversalStats::default();
        let force = self.force_from(NodeIndex::ROOT, &query, &mut stats);
        (force, stats)
    }

    fn force_from(&self, index: NodeIndex, query: &ForceQuery, stats: &mut TraversalStats) -> Vector3 {
        let node = &self.nodes[index.0];
        let target = query.particle;

        if node.leaf {
            return node
                .occupants()
                .filter(|other| !ptr::eq(*other, target))
                .map(|other| {
                    stats.direct += 1;
                    gravitational_force(
                        query.g,
                        query.dampening,
                        target.mass(),
                        target.position,
                        other.mass(),
                        other.position,
                    )
                })
                .sum();
        }

        // A subtree that may contain the target is always opened so its own mass never ends up
        // in an aggregate.
        let distance = node.center_of_mass.distance(target.position);
        if node.width() / distance < query.theta && !node.covers(target.position) {
            stats.approximated += 1;
            return gravitational_force(
                query.g,
                query.dampening,
                target.mass(),
                target.position,
                node.total_mass,
                node.center_of_mass,
            );
        }

        node.quadrants
            .iter()
            .flatten()
            .map(|child| self.force_from(*child, query, stats))
            .sum()
    }
}

/// Net force on `particle` from the particles indexed by `tree`.
pub fn compute_force(
    particle: &Particle,
    tree: &BarnesHutTree,
    theta: f64,
    g: f64,
    dampening: f64,
) -> Vector3 {
    tree.compute_force(particle, theta, g, dampening)
}

/// Builds a tree over `bounds` and returns the net force on each particle, in input order.
///
/// Particles outside `bounds` are left out of the tree but still receive the force exerted by
/// the ones inside.
///
/// # Examples
///
/// ```
/// use nbody_sim::models::{Rectangle, Vector3};
/// use nbody_sim::particles::{compute_barnes_hut_forces, Particle};
///
/// let particles = vec![
///     Particle::new(1.0, Vector3::planar(-1.0, 0.0), Vector3::ZERO).unwrap(),
///     Particle::new(1.0, Vector3::planar(1.0, 0.0), Vector3::ZERO).unwrap(),
/// ];
/// let forces = compute_barnes_hut_forces(&particles, Rectangle::centered(0.0, 0.0, 2.0), 0.5, 1.0, 0.0);
///
/// assert_eq!(forces.len(), 2);
/// assert!((forces[0].x + forces[1].x).abs() < 1e-12);
/// assert!((forces[0].x - 0.25).abs() < 1e-12);
/// ```
pub fn compute_barnes_hut_forces(
    particles: &[Particle],
    bounds: Rectangle,
    theta: f64,
    g: f64,
    dampening: f64,
) -> Vec<Vector3> {
    let tree = BarnesHutTree::build(bounds, particles);
    particles
        .iter()
        .map(|particle| tree.compute_force(particle, theta, g, dampening))
        .collect()
}
