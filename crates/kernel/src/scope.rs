//! Nested simulation scopes stored in an arena.
//!
//! Each scope owns its particles and its local forces. Forces flow down the
//! tree: a particle feels every force of every ancestor scope, root first,
//! followed by its own scope's forces. Particles never flow up; a scope's
//! particle listing includes its descendants, but ticking a scope only moves
//! particles under it.

use pixelswarm_common::{Bounds, ParticleId, Vector};
use serde::{Deserialize, Serialize};

use crate::error::KernelError;
use crate::force::Force;
use crate::particle::Particle;

/// Index of a scope in its [`SimulationTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub usize);

#[derive(Debug, Default)]
struct ScopeNode {
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    particles: Vec<Particle>,
    forces: Vec<Force>,
    bounds: Option<Bounds>,
}

/// A tree of simulation scopes with a single root.
///
/// Parents are stored as indices, so there are no reference cycles. Removed
/// scopes leave an empty slot; ids are never reused.
#[derive(Debug)]
pub struct SimulationTree {
    nodes: Vec<Option<ScopeNode>>,
    root: ScopeId,
}

impl Default for SimulationTree {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SimulationTree {
    /// Create a tree holding only a root scope.
    pub fn new(bounds: Option<Bounds>) -> Self {
        let root = ScopeNode {
            bounds,
            ..ScopeNode::default()
        };
        Self {
            nodes: vec![Some(root)],
            root: ScopeId(0),
        }
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Number of live scopes, root included.
    pub fn scope_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn contains(&self, scope: ScopeId) -> bool {
        self.nodes.get(scope.0).is_some_and(|n| n.is_some())
    }

    fn node(&self, scope: ScopeId) -> Result<&ScopeNode, KernelError> {
        self.nodes
            .get(scope.0)
            .and_then(|n| n.as_ref())
            .ok_or(KernelError::ScopeNotFound(scope))
    }

    fn node_mut(&mut self, scope: ScopeId) -> Result<&mut ScopeNode, KernelError> {
        self.nodes
            .get_mut(scope.0)
            .and_then(|n| n.as_mut())
            .ok_or(KernelError::ScopeNotFound(scope))
    }

    /// Create a new scope under `parent`, appended after its existing children.
    /// The child starts with a copy of the parent's bounds.
    pub fn create_child_scope(&mut self, parent: ScopeId) -> Result<ScopeId, KernelError> {
        let bounds = self.node(parent)?.bounds;
        let id = ScopeId(self.nodes.len());
        self.nodes.push(Some(ScopeNode {
            parent: Some(parent),
            bounds,
            ..ScopeNode::default()
        }));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Detach `child` from `parent` and drop its whole subtree, particles and
    /// forces included. Returns false if `child` is not a child of `parent`.
    pub fn remove_child_scope(
        &mut self,
        parent: ScopeId,
        child: ScopeId,
    ) -> Result<bool, KernelError> {
        let children = &mut self.node_mut(parent)?.children;
        let Some(index) = children.iter().position(|c| *c == child) else {
            return Ok(false);
        };
        children.remove(index);

        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        Ok(true)
    }

    pub fn parent(&self, scope: ScopeId) -> Result<Option<ScopeId>, KernelError> {
        Ok(self.node(scope)?.parent)
    }

    pub fn children(&self, scope: ScopeId) -> Result<&[ScopeId], KernelError> {
        Ok(&self.node(scope)?.children)
    }

    pub fn bounds(&self, scope: ScopeId) -> Result<Option<Bounds>, KernelError> {
        Ok(self.node(scope)?.bounds)
    }

    /// Set or clear the walls of a single scope. Existing children keep theirs.
    pub fn set_bounds(&mut self, scope: ScopeId, bounds: Option<Bounds>) -> Result<(), KernelError> {
        self.node_mut(scope)?.bounds = bounds;
        Ok(())
    }

    /// Add a particle to `scope` only. The particle is validated first.
    pub fn add_particle(
        &mut self,
        scope: ScopeId,
        particle: Particle,
    ) -> Result<ParticleId, KernelError> {
        particle
            .validate()
            .map_err(|reason| KernelError::InvalidParticle {
                id: particle.id,
                reason,
            })?;
        let id = particle.id;
        self.node_mut(scope)?.particles.push(particle);
        Ok(id)
    }

    /// Remove a particle owned directly by `scope`. Missing particles are a no-op.
    pub fn remove_particle(
        &mut self,
        scope: ScopeId,
        id: ParticleId,
    ) -> Result<Option<Particle>, KernelError> {
        let particles = &mut self.node_mut(scope)?.particles;
        Ok(particles
            .iter()
            .position(|p| p.id == id)
            .map(|index| particles.remove(index)))
    }

    /// Particles owned directly by `scope`.
    pub fn particles(&self, scope: ScopeId) -> Result<&[Particle], KernelError> {
        Ok(&self.node(scope)?.particles)
    }

    /// Particles of `scope` and all its descendants: own particles first,
    /// then each child's subtree depth-first in child order.
    pub fn all_particles(&self, scope: ScopeId) -> Result<Vec<&Particle>, KernelError> {
        self.node(scope)?;
        Ok(self
            .subtree(scope)
            .into_iter()
            .filter_map(|id| self.nodes[id.0].as_ref())
            .flat_map(|node| node.particles.iter())
            .collect())
    }

    /// Total number of particles in the subtree rooted at `scope`.
    pub fn particle_count(&self, scope: ScopeId) -> Result<usize, KernelError> {
        self.node(scope)?;
        Ok(self
            .subtree(scope)
            .into_iter()
            .filter_map(|id| self.nodes[id.0].as_ref())
            .map(|node| node.particles.len())
            .sum())
    }

    /// Look a particle up anywhere in the tree.
    pub fn find_particle(&self, id: ParticleId) -> Option<(ScopeId, &Particle)> {
        self.nodes.iter().enumerate().find_map(|(index, node)| {
            node.as_ref()?
                .particles
                .iter()
                .find(|p| p.id == id)
                .map(|p| (ScopeId(index), p))
        })
    }

    /// Visit every particle in the subtree mutably, in `all_particles` order.
    pub fn for_each_particle_mut<F>(&mut self, scope: ScopeId, mut visit: F) -> Result<(), KernelError>
    where
        F: FnMut(&mut Particle),
    {
        self.node(scope)?;
        for id in self.subtree(scope) {
            if let Some(node) = self.nodes[id.0].as_mut() {
                node.particles.iter_mut().for_each(&mut visit);
            }
        }
        Ok(())
    }

    pub fn add_force(&mut self, scope: ScopeId, force: Force) -> Result<(), KernelError> {
        self.node_mut(scope)?.forces.push(force);
        Ok(())
    }

    /// Remove every local occurrence of `force` (by identity). Returns whether
    /// anything was removed.
    pub fn remove_force(&mut self, scope: ScopeId, force: &Force) -> Result<bool, KernelError> {
        let forces = &mut self.node_mut(scope)?.forces;
        let before = forces.len();
        forces.retain(|f| !f.ptr_eq(force));
        Ok(forces.len() != before)
    }

    /// Forces added directly to `scope`.
    pub fn local_forces(&self, scope: ScopeId) -> Result<&[Force], KernelError> {
        Ok(&self.node(scope)?.forces)
    }

    /// Ancestor forces root-first, followed by the scope's own.
    pub fn effective_forces(&self, scope: ScopeId) -> Result<Vec<Force>, KernelError> {
        let mut chain = vec![scope];
        let mut current = self.node(scope)?.parent;
        while let Some(id) = current {
            chain.push(id);
            current = self.node(id)?.parent;
        }
        let mut forces = Vec::new();
        for id in chain.into_iter().rev() {
            forces.extend(self.node(id)?.forces.iter().cloned());
        }
        Ok(forces)
    }

    /// Advance every particle in the tree by one step.
    pub fn tick(&mut self) {
        let mut inherited = Vec::new();
        self.tick_node(self.root, &mut inherited);
    }

    /// Advance only the particles under `scope`, still applying its ancestors' forces.
    pub fn tick_scope(&mut self, scope: ScopeId) -> Result<(), KernelError> {
        let mut inherited = match self.node(scope)?.parent {
            Some(parent) => self.effective_forces(parent)?,
            None => Vec::new(),
        };
        self.tick_node(scope, &mut inherited);
        Ok(())
    }

    fn tick_node(&mut self, scope: ScopeId, inherited: &mut Vec<Force>) {
        let Some(node) = self.nodes.get_mut(scope.0).and_then(|n| n.as_mut()) else {
            return;
        };
        let depth = inherited.len();
        inherited.extend(node.forces.iter().cloned());

        for particle in &mut node.particles {
            integrate(particle, inherited);
            if let Some(bounds) = &node.bounds {
                enforce_bounds(particle, bounds);
            }
        }

        let child_count = node.children.len();
        for index in 0..child_count {
            let child = match &self.nodes[scope.0] {
                Some(node) => node.children[index],
                None => break,
            };
            self.tick_node(child, inherited);
        }

        inherited.truncate(depth);
    }

    /// Live scopes under `scope` in pre-order, children in insertion order.
    fn subtree(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut order = Vec::new();
        let mut stack = vec![scope];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(id.0).and_then(|n| n.as_ref()) {
                order.push(id);
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }
}

/// One semi-implicit step. Position moves with the old velocity before the
/// velocity picks up this step's acceleration; trajectories depend on this order.
fn integrate(particle: &mut Particle, forces: &[Force]) {
    let mut acceleration = Vector::sum(forces.iter().map(|f| f.apply(particle)));
    acceleration.divide_scalar(particle.mass);
    let velocity = particle.velocity;
    particle.position.add(velocity);
    particle.velocity.add(acceleration);
}

/// Clamp into the walls and reflect the velocity component that hit one.
fn enforce_bounds(particle: &mut Particle, bounds: &Bounds) {
    let (position, velocity) = (&mut particle.position, &mut particle.velocity);
    if position.x > bounds.right {
        position.x = bounds.right;
        velocity.x = -velocity.x;
    } else if position.x < bounds.left {
        position.x = bounds.left;
        velocity.x = -velocity.x;
    }
    if position.y > bounds.bottom {
        position.y = bounds.bottom;
        velocity.y = -velocity.y;
    } else if position.y < bounds.top {
        position.y = bounds.top;
        velocity.y = -velocity.y;
    }
}
