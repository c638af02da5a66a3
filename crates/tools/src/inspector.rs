use std::fmt;

use pixelswarm_common::{ParticleId, Vector};
use pixelswarm_kernel::{LifecycleState, ScopeId, World};
use serde::Serialize;

/// Read-only queries against a world for debugging and the CLI.
pub struct WorldInspector;

impl WorldInspector {
    pub fn summary(world: &World) -> WorldSummary {
        let particles = world.all_particles();
        let count = particles.len();
        let (centroid, mean_speed) = if count == 0 {
            (Vector::ZERO, 0.0)
        } else {
            let mut centroid = Vector::sum(particles.iter().map(|p| p.position));
            centroid.divide_scalar(count as f64);
            let speed: f64 = particles.iter().map(|p| p.velocity.magnitude()).sum();
            (centroid, speed / count as f64)
        };
        WorldSummary {
            tick: world.tick_count(),
            state: world.state(),
            health: world.health(),
            scopes: world.tree().scope_count(),
            particles: count,
            pending_events: world.events().len(),
            centroid,
            mean_speed,
        }
    }

    pub fn inspect_particle(world: &World, id: ParticleId) -> Option<ParticleInfo> {
        world
            .tree()
            .find_particle(id)
            .map(|(scope, p)| ParticleInfo {
                id,
                scope,
                position: p.position,
                velocity: p.velocity,
                mass: p.mass,
                radius: p.radius,
                perceived_radius: p.perceived_radius,
                color: p.color.clone(),
            })
    }

    /// Every scope, parents before children.
    pub fn list_scopes(world: &World) -> Vec<ScopeInfo> {
        let tree = world.tree();
        let mut out = Vec::with_capacity(tree.scope_count());
        let mut stack = vec![(tree.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let (Ok(particles), Ok(forces), Ok(children), Ok(parent)) = (
                tree.particles(id),
                tree.local_forces(id),
                tree.children(id),
                tree.parent(id),
            ) else {
                continue;
            };
            out.push(ScopeInfo {
                id,
                parent,
                depth,
                particles: particles.len(),
                forces: forces.len(),
                children: children.len(),
            });
            stack.extend(children.iter().rev().map(|child| (*child, depth + 1)));
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub state: LifecycleState,
    pub health: f64,
    pub scopes: usize,
    pub particles: usize,
    pub pending_events: usize,
    pub centroid: Vector,
    pub mean_speed: f64,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: tick={} state={:?} health={:.3} scopes={} particles={} centroid=({:.2}, {:.2}) mean_speed={:.3}",
            self.tick,
            self.state,
            self.health,
            self.scopes,
            self.particles,
            self.centroid.x,
            self.centroid.y,
            self.mean_speed
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleInfo {
    pub id: ParticleId,
    pub scope: ScopeId,
    pub position: Vector,
    pub velocity: Vector,
    pub mass: f64,
    pub radius: f64,
    pub perceived_radius: f64,
    pub color: String,
}

impl fmt::Display for ParticleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Particle [{}] scope={} pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) r={:.2}/{:.2} {}",
            self.id.short(),
            self.scope.0,
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
            self.perceived_radius,
            self.radius,
            self.color
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeInfo {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub depth: usize,
    pub particles: usize,
    pub forces: usize,
    pub children: usize,
}

#[cfg(test)]
mod tests {
    use pixelswarm_kernel::{Force, Particle};

    use super::*;

    fn moving(x: f64, vx: f64) -> Particle {
        Particle {
            position: Vector::new(x, 0.0),
            velocity: Vector::new(vx, 0.0),
            ..Particle::default()
        }
    }

    #[test]
    fn summary_empty_world() {
        let summary = WorldInspector::summary(&World::default());
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.particles, 0);
        assert_eq!(summary.scopes, 1);
        assert_eq!(summary.centroid, Vector::ZERO);
        assert_eq!(summary.state, LifecycleState::Creating);
    }

    #[test]
    fn summary_averages_particles() {
        let mut world = World::default();
        world.add_particle(moving(0.0, 2.0)).unwrap();
        let scope = world.create_child_scope().unwrap();
        world.tree_mut().add_particle(scope, moving(4.0, -4.0)).unwrap();

        let summary = WorldInspector::summary(&world);
        assert_eq!(summary.particles, 2);
        assert_eq!(summary.scopes, 2);
        assert_eq!(summary.centroid, Vector::new(2.0, 0.0));
        assert_eq!(summary.mean_speed, 3.0);
    }

    #[test]
    fn inspect_particle_reports_scope() {
        let mut world = World::default();
        let scope = world.create_child_scope().unwrap();
        let id = world.tree_mut().add_particle(scope, moving(1.5, 0.0)).unwrap();

        let info = WorldInspector::inspect_particle(&world, id).unwrap();
        assert_eq!(info.scope, scope);
        assert_eq!(info.position, Vector::new(1.5, 0.0));
        assert!(format!("{info}").contains(&id.short()));
        assert!(WorldInspector::inspect_particle(&world, ParticleId::new()).is_none());
    }

    #[test]
    fn list_scopes_is_preorder() {
        let mut world = World::default();
        let a = world.create_child_scope().unwrap();
        let b = world.create_child_scope().unwrap();
        let a1 = world.tree_mut().create_child_scope(a).unwrap();
        world.tree_mut().add_force(a1, Force::new(|_| Vector::ZERO)).unwrap();

        let scopes = WorldInspector::list_scopes(&world);
        let order: Vec<ScopeId> = scopes.iter().map(|s| s.id).collect();
        assert_eq!(order, vec![world.root(), a, a1, b]);
        assert_eq!(scopes[2].depth, 2);
        assert_eq!(scopes[2].forces, 1);
        assert_eq!(scopes[2].parent, Some(a));
        assert_eq!(scopes[0].children, 2);
    }

    #[test]
    fn summary_serializes() {
        let json = serde_json::to_string(&WorldInspector::summary(&World::default())).unwrap();
        assert!(json.contains("\"state\":\"Creating\""));
        let text = format!("{}", WorldInspector::summary(&World::default()));
        assert!(text.contains("tick=0"));
    }
}
