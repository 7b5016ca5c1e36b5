//! ECS Systems
//!
//! Exploration systems that operate on entities with specific components.

use hecs::World;

use crate::ecs::{Explorer, Follow, Velocity, WorldPos};
use crate::world::fog::ExplorerProbe;

/// Gather the exploration footprint of every explorer with a world position
pub fn collect_probes(world: &World) -> Vec<ExplorerProbe> {
    world
        .query::<(&Explorer, &WorldPos)>()
        .iter()
        .map(|(_, (explorer, pos))| ExplorerProbe {
            bounds: explorer.bounds_at(*pos),
            active: explorer.active,
        })
        .collect()
}

/// Apply velocities to world positions
pub fn apply_velocity(world: &mut World) {
    for (_, (pos, vel)) in world.query_mut::<(&mut WorldPos, &Velocity)>() {
        pos.x += vel.dx;
        pos.y += vel.dy;
    }
}

/// Move followers toward their leaders until they are within follow distance
pub fn run_followers(world: &mut World) {
    // Collect first: leader positions are read while followers are written
    let moves: Vec<(hecs::Entity, WorldPos)> = world
        .query::<(&Follow, &WorldPos)>()
        .iter()
        .filter_map(|(entity, (follow, pos))| {
            let leader = *world.get::<&WorldPos>(follow.leader).ok()?;
            let gap = pos.distance(&leader);
            if gap <= follow.distance {
                return None;
            }
            let step = (gap - follow.distance).min(follow.speed);
            let next = WorldPos::new(
                pos.x + (leader.x - pos.x) / gap * step,
                pos.y + (leader.y - pos.y) / gap * step,
            );
            Some((entity, next))
        })
        .collect();

    for (entity, next) in moves {
        if let Ok(mut pos) = world.get::<&mut WorldPos>(entity) {
            *pos = next;
        }
    }
}
