//! Exploration session
//!
//! Owns a generated map, its fog and the explorer entities, and advances
//! them one scheduler tick at a time.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use super::time::TickClock;
use crate::ecs::{self, Explorer, ExplorerKind, Follow, Name, Position, Velocity, WorldPos};
use crate::error::SessionError;
use crate::world::fog::{FogMap, FogRevealer, DEFAULT_REVEAL_INTERVAL};
use crate::world::generation::{GeneratorSettings, TerrainGenerator};
use crate::world::Grid;

/// Layout and exploration tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tile_width: f32,
    pub tile_height: f32,
    /// Ticks between fog scans
    pub reveal_interval: u32,
    pub explorer_radius: f32,
    pub follow_distance: f32,
    pub follow_speed: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tile_width: 64.0,
            tile_height: 32.0,
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            explorer_radius: 20.0,
            follow_distance: 150.0,
            follow_speed: 4.0,
        }
    }
}

/// Map maintenance commands a front end can issue between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapCommand {
    /// One more smoothing pass over the current grid
    Redraw,
    /// Carve corridors until every region is connected
    Resolve,
    /// Fill regions smaller than `min_size`
    Cull { min_size: usize },
}

/// A generated map being explored
pub struct Session {
    config: SessionConfig,
    generator: TerrainGenerator,
    fog: FogMap,
    revealer: FogRevealer,
    world: World,
    clock: TickClock,
}

impl Session {
    /// Generate a map with the full pipeline and start exploring it
    pub fn new(settings: GeneratorSettings, config: SessionConfig) -> Result<Self, SessionError> {
        let mut generator = TerrainGenerator::new(settings)?;
        generator.generate()?;
        Ok(Self::from_generator(generator, config))
    }

    /// Explore whatever grid the generator currently holds
    pub fn from_generator(generator: TerrainGenerator, config: SessionConfig) -> Self {
        let fog = FogMap::from_grid(generator.grid(), config.tile_width, config.tile_height);
        Self {
            revealer: FogRevealer::new(config.reveal_interval),
            config,
            generator,
            fog,
            world: World::new(),
            clock: TickClock::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        self.generator.grid()
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn fog(&self) -> &FogMap {
        &self.fog
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    /// World-space centre of a cell
    pub fn cell_center(&self, pos: Position) -> WorldPos {
        WorldPos::new(
            (pos.x as f32 + 0.5) * self.config.tile_width,
            (pos.y as f32 + 0.5) * self.config.tile_height,
        )
    }

    /// Place a walker on a random open cell
    pub fn spawn_walker(&mut self) -> Result<Entity, SessionError> {
        let start = self
            .generator
            .find_random_walkable()
            .ok_or(SessionError::NoWalkableTile)?;
        Ok(self.spawn_walker_at(start))
    }

    pub fn spawn_walker_at(&mut self, pos: Position) -> Entity {
        let world_pos = self.cell_center(pos);
        let entity = self.world.spawn((
            Name::new("walker"),
            Explorer::new(ExplorerKind::Walker, self.config.explorer_radius),
            world_pos,
            Velocity::default(),
        ));
        log::info!("Spawned walker at cell ({}, {})", pos.x, pos.y);
        entity
    }

    /// Place a follower on top of `leader`; it trails from the next tick on
    pub fn spawn_follower(&mut self, leader: Entity) -> Result<Entity, SessionError> {
        let start = *self
            .world
            .get::<&WorldPos>(leader)
            .map_err(|_| SessionError::UnknownEntity(leader))?;
        Ok(self.world.spawn((
            Name::new("follower"),
            Explorer::new(ExplorerKind::Follower, self.config.explorer_radius),
            start,
            Follow {
                leader,
                distance: self.config.follow_distance,
                speed: self.config.follow_speed,
            },
        )))
    }

    /// Set the per-tick movement of an entity
    pub fn set_velocity(&mut self, entity: Entity, dx: f32, dy: f32) -> Result<(), SessionError> {
        let mut vel = self
            .world
            .get::<&mut Velocity>(entity)
            .map_err(|_| SessionError::UnknownEntity(entity))?;
        *vel = Velocity { dx, dy };
        Ok(())
    }

    /// Turn an explorer's fog clearing on or off
    pub fn set_active(&mut self, entity: Entity, active: bool) -> Result<(), SessionError> {
        let mut explorer = self
            .world
            .get::<&mut Explorer>(entity)
            .map_err(|_| SessionError::UnknownEntity(entity))?;
        explorer.active = active;
        Ok(())
    }

    /// Advance one tick: move actors, then reveal fog. Returns tiles newly revealed.
    pub fn tick(&mut self) -> usize {
        let tick = self.clock.advance();
        ecs::apply_velocity(&mut self.world);
        ecs::run_followers(&mut self.world);

        let probes = ecs::collect_probes(&self.world);
        self.revealer.update(tick, &mut self.fog, &probes)
    }

    /// Tiles revealed since the renderer last asked
    pub fn take_dirty(&mut self) -> Vec<usize> {
        self.fog.take_dirty()
    }

    /// Run a map command. Revealed tiles stay revealed; tiles whose cell
    /// changed are refreshed. Returns the region count afterwards.
    pub fn apply(&mut self, command: MapCommand) -> usize {
        match command {
            MapCommand::Redraw => self.generator.smooth_once(),
            MapCommand::Resolve => {
                self.generator.resolve_regions();
            }
            MapCommand::Cull { min_size } => {
                self.generator.cull_small_regions(min_size);
            }
        }
        let changed = self.fog.sync_cells(self.generator.grid());
        log::debug!("{:?} changed {} cells", command, changed);

        let regions = self.generator.region_count();
        log::info!("{:?} pass: {} regions", command, regions);
        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::AutomataConfig;
    use crate::world::TileType;

    fn config() -> SessionConfig {
        SessionConfig {
            tile_width: 10.0,
            tile_height: 10.0,
            reveal_interval: 1,
            explorer_radius: 2.0,
            follow_distance: 10.0,
            follow_speed: 10.0,
        }
    }

    fn room_session() -> Session {
        let mut grid = Grid::filled(8, 8, TileType::Wall).unwrap();
        for y in 1..7 {
            for x in 1..7 {
                grid.set(x, y, TileType::Open);
            }
        }
        let generator = TerrainGenerator::from_grid(grid, AutomataConfig::default(), 1).unwrap();
        Session::from_generator(generator, config())
    }

    #[test]
    fn test_walker_reveals_its_tile() {
        let mut session = room_session();
        session.spawn_walker_at(Position::new(3, 3));

        assert_eq!(session.tick(), 1);
        assert_eq!(session.take_dirty(), vec![3 * 8 + 3]);
        assert_eq!(session.tick(), 0);
    }

    #[test]
    fn test_moving_walker_reveals_trail() {
        let mut session = room_session();
        let walker = session.spawn_walker_at(Position::new(1, 1));
        session.set_velocity(walker, 10.0, 0.0).unwrap();

        let revealed: usize = (0..4).map(|_| session.tick()).sum();
        assert_eq!(revealed, 4);
        assert!(!session.fog().tile_at(5, 1).unwrap().is_fogged());
        assert!(session.fog().tile_at(1, 1).unwrap().is_fogged());
    }

    #[test]
    fn test_inactive_walker_keeps_fog() {
        let mut session = room_session();
        let walker = session.spawn_walker_at(Position::new(2, 2));
        session.set_active(walker, false).unwrap();
        session.tick();
        assert_eq!(session.fog().fogged_count(), 64);
    }

    #[test]
    fn test_follower_requires_leader() {
        let mut session = room_session();
        let walker = session.spawn_walker_at(Position::new(2, 2));
        let follower = session.spawn_follower(walker).unwrap();
        session.world_mut().despawn(walker).unwrap();

        assert_eq!(
            session.spawn_follower(walker).err(),
            Some(SessionError::UnknownEntity(walker))
        );
        assert!(session.world().contains(follower));
    }

    #[test]
    fn test_no_walkable_tile() {
        let grid = Grid::filled(5, 5, TileType::Wall).unwrap();
        let generator = TerrainGenerator::from_grid(grid, AutomataConfig::default(), 1).unwrap();
        let mut session = Session::from_generator(generator, config());
        assert_eq!(session.spawn_walker().err(), Some(SessionError::NoWalkableTile));
    }

    #[test]
    fn test_commands_keep_fog_revealed() {
        let mut grid = Grid::filled(10, 10, TileType::Wall).unwrap();
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2), (7, 7), (8, 7), (7, 8), (8, 8), (5, 5)] {
            grid.set(x, y, TileType::Open);
        }
        let generator = TerrainGenerator::from_grid(grid, AutomataConfig::default(), 1).unwrap();
        let mut session = Session::from_generator(generator, config());
        session.spawn_walker_at(Position::new(1, 1));
        session.tick();
        let revealed = session.fog().revealed_count();
        assert!(revealed > 0);
        let pending = session.fog().dirty_tiles().to_vec();

        // Nothing below one cell, so the grid is unchanged
        assert_eq!(session.apply(MapCommand::Cull { min_size: 1 }), 3);
        assert_eq!(session.fog().revealed_count(), revealed);
        assert_eq!(session.fog().dirty_tiles(), pending.as_slice());

        assert_eq!(session.apply(MapCommand::Cull { min_size: 2 }), 2);
        assert_eq!(session.fog().revealed_count(), revealed);
        assert!(!session.fog().tile_at(1, 1).unwrap().is_fogged());
        assert!(!session.fog().tile_at(5, 5).unwrap().open);

        assert_eq!(session.apply(MapCommand::Resolve), 1);
        assert_eq!(session.fog().revealed_count(), revealed);
    }

    #[test]
    fn test_generated_session() {
        let settings = GeneratorSettings::full_pipeline(50, 40).with_seed(11);
        let mut session = Session::new(settings, SessionConfig::default()).unwrap();
        assert!(session.generator().region_count() <= 1);
        if session.grid().open_count() > 0 {
            let walker = session.spawn_walker().unwrap();
            session.spawn_follower(walker).unwrap();
            let revealed: usize = (0..10).map(|_| session.tick()).sum();
            assert!(revealed > 0);
        }
    }
}
