//! End-to-end generation and exploration

use fogwood::data::FogwoodConfig;
use fogwood::world::generation::{AutomataConfig, GeneratorSettings};
use fogwood::world::{identify_regions, TileType};
use fogwood::{MapCommand, Session, SessionConfig, TerrainGenerator};

fn assert_border_is_wall(grid: &fogwood::Grid) {
    for x in 0..grid.width() {
        assert_eq!(grid.get(x, 0), Some(TileType::Wall));
        assert_eq!(grid.get(x, grid.height() - 1), Some(TileType::Wall));
    }
    for y in 0..grid.height() {
        assert_eq!(grid.get(0, y), Some(TileType::Wall));
        assert_eq!(grid.get(grid.width() - 1, y), Some(TileType::Wall));
    }
}

#[test]
fn test_generated_maps_are_connected_and_walled() {
    for seed in [3, 17, 256, 9001] {
        let settings = GeneratorSettings::full_pipeline(80, 60).with_seed(seed);
        let mut generator = TerrainGenerator::new(settings).unwrap();
        let grid = generator.generate().unwrap();

        assert_eq!(grid.len(), 80 * 60);
        assert_border_is_wall(&grid);
        let regions = identify_regions(&grid);
        assert!(regions.len() <= 1, "seed {} left {} regions", seed, regions.len());
        if let Some(region) = regions.first() {
            assert_eq!(region.len(), grid.open_count());
        }
    }
}

#[test]
fn test_same_seed_same_map() {
    let settings = GeneratorSettings::full_pipeline(64, 48).with_seed(77);
    let a = TerrainGenerator::new(settings.clone()).unwrap().generate().unwrap();
    let b = TerrainGenerator::new(settings).unwrap().generate().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_woods_then_commands() {
    let mut settings = GeneratorSettings::full_pipeline(60, 60).with_seed(5);
    settings.automata = AutomataConfig::default();
    let mut generator = TerrainGenerator::new(settings).unwrap();
    generator.generate_woods().unwrap();

    let mut session = Session::from_generator(generator, SessionConfig::default());
    session.apply(MapCommand::Redraw);
    session.apply(MapCommand::Cull { min_size: 20 });
    assert!(session.apply(MapCommand::Resolve) <= 1);
    assert_border_is_wall(session.grid());
    assert!(identify_regions(session.grid()).iter().all(|r| r.len() >= 20));
}

#[test]
fn test_exploration_only_clears_fog() {
    let config = FogwoodConfig::default();
    let settings = GeneratorSettings::full_pipeline(40, 40).with_seed(21);
    let mut session = Session::new(settings, config.session).unwrap();
    if session.grid().open_count() == 0 {
        return;
    }

    let walker = session.spawn_walker().unwrap();
    session.spawn_follower(walker).unwrap();
    session.set_velocity(walker, 3.0, 1.5).unwrap();

    let mut revealed_so_far = 0;
    let mut seen = std::collections::HashSet::new();
    for _ in 0..60 {
        session.tick();
        for idx in session.take_dirty() {
            assert!(seen.insert(idx), "tile {} reported twice", idx);
        }
        let revealed = session.fog().revealed_count();
        assert!(revealed >= revealed_so_far);
        revealed_so_far = revealed;
    }
    assert!(revealed_so_far > 0);
    assert_eq!(seen.len(), revealed_so_far);
}
