//! Fogwood - Entry Point
//!
//! Command line front end: generates woods maps, runs individual
//! maintenance passes and simulates exploration.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fogwood::data::{export_default_config, FogwoodConfig, DEFAULT_CONFIG_PATH};
use fogwood::ecs::{Position, WorldPos};
use fogwood::world::generation::{AutomataConfig, TerrainGenerator};
use fogwood::world::{FogMap, Grid};
use fogwood::{MapCommand, Session};

#[derive(Parser, Debug)]
#[command(name = "fogwood")]
#[command(about = "Generate cellular-automata woods and explore them through fog of war")]
struct Args {
    /// RON config file (defaults are used if it is missing)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Map width in tiles
    #[arg(short = 'W', long)]
    width: Option<i32>,

    /// Map height in tiles
    #[arg(short = 'H', long)]
    height: Option<i32>,

    /// Noise seed (clock-based if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Print tiles as JSON instead of ASCII
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full pipeline: fill, smooth, border, cull, resolve
    Generate,
    /// Fill, smooth with the woods thresholds and stamp the border
    Woods,
    /// Woods map plus extra smoothing passes
    Redraw {
        #[arg(long, default_value = "1")]
        passes: u32,
    },
    /// Woods map with every region connected
    Resolve,
    /// Woods map with regions below `min` cells filled in
    Cull {
        #[arg(long, default_value = "20")]
        min: usize,
    },
    /// Label regions of a woods map, or mark the small ones
    Highlight {
        #[arg(long)]
        small: Option<usize>,
    },
    /// Generate a map and let a walker and follower explore it
    Explore {
        #[arg(long, default_value = "500")]
        ticks: u64,
    },
    /// Write the default config file
    ExportConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging();
    log::info!("Starting Fogwood v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = FogwoodConfig::load_or_default(&args.config);
    if let Some(width) = args.width {
        config.generator.width = width;
    }
    if let Some(height) = args.height {
        config.generator.height = height;
    }
    if let Some(seed) = args.seed {
        config.generator.noise.seed = seed;
    }

    let result = run(&args, config);
    if let Err(ref e) = result {
        log::error!("Fogwood exited with error: {:#}", e);
    }
    result
}

/// Log to a file so map output on stdout stays clean
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("fogwood.log")
    {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.target(env_logger::Target::Stderr);
        }
    }
    builder.init();
}

fn run(args: &Args, config: FogwoodConfig) -> Result<()> {
    let default = Command::Generate;
    let command = args.command.as_ref().unwrap_or(&default);

    match command {
        Command::Generate => {
            let mut generator = TerrainGenerator::new(config.generator.clone())?;
            let grid = generator.generate()?;
            print_grid(args, &grid, &config)?;
        }
        Command::Woods => {
            let generator = woods(&config)?;
            print_grid(args, generator.grid(), &config)?;
        }
        Command::Redraw { passes } => {
            let commands = vec![MapCommand::Redraw; *passes as usize];
            run_map_commands(args, &config, &commands)?;
        }
        Command::Resolve => run_map_commands(args, &config, &[MapCommand::Resolve])?,
        Command::Cull { min } => {
            run_map_commands(args, &config, &[MapCommand::Cull { min_size: *min }])?
        }
        Command::Highlight { small } => {
            let generator = woods(&config)?;
            let grid = generator.grid();
            let glyphs: Vec<char> = match small {
                Some(min) => generator
                    .highlight_small_regions(*min)
                    .iter()
                    .zip(grid.cells())
                    .map(|(&is_small, cell)| if is_small { '!' } else { cell.glyph() })
                    .collect(),
                None => generator
                    .highlight_all_regions()
                    .iter()
                    .map(|label| label.map_or('#', region_glyph))
                    .collect(),
            };
            print_glyphs(grid.width(), &glyphs);
        }
        Command::Explore { ticks } => explore(args, config, *ticks)?,
        Command::ExportConfig { path } => {
            export_default_config(path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Woods preset: the configured generator with the woods smoothing thresholds
fn woods(config: &FogwoodConfig) -> Result<TerrainGenerator> {
    let mut settings = config.generator.clone();
    settings.automata = AutomataConfig {
        out_of_bounds: settings.automata.out_of_bounds,
        ..AutomataConfig::default()
    };
    let mut generator = TerrainGenerator::new(settings)?;
    generator.generate_woods()?;
    Ok(generator)
}

/// Apply map commands to a fresh woods map, reporting regions after each
fn run_map_commands(args: &Args, config: &FogwoodConfig, commands: &[MapCommand]) -> Result<()> {
    let mut session = Session::from_generator(woods(config)?, config.session.clone());
    for command in commands {
        let regions = session.apply(*command);
        println!("{:?} pass: {} regions", command, regions);
    }
    print_grid(args, session.grid(), config)
}

fn explore(args: &Args, config: FogwoodConfig, ticks: u64) -> Result<()> {
    let seed = config.generator.noise.seed;
    let speed = config.session.tile_height * 0.25;
    let mut session = Session::new(config.generator, config.session)?;
    let walker = session.spawn_walker()?;
    session.spawn_follower(walker)?;

    // Stand-in for the input layer: walk toward random open cells
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let open = session.grid().walkable_positions();
    let mut waypoint: Option<WorldPos> = None;
    let mut revealed = 0;

    for _ in 0..ticks {
        let here = *session
            .world()
            .get::<&WorldPos>(walker)
            .context("walker lost its position")?;
        let target = match waypoint {
            Some(t) if t.distance(&here) > speed => t,
            _ => {
                let cell: Position = open[rng.gen_range(0..open.len())];
                let t = session.cell_center(cell);
                waypoint = Some(t);
                t
            }
        };
        let gap = target.distance(&here).max(f32::EPSILON);
        let step = speed.min(gap);
        session.set_velocity(
            walker,
            (target.x - here.x) / gap * step,
            (target.y - here.y) / gap * step,
        )?;

        revealed += session.tick();
        session.take_dirty();
    }

    println!(
        "Explored {} ticks: revealed {} of {} tiles",
        session.current_tick(),
        revealed,
        session.fog().tiles().len()
    );
    print_fog(args, session.fog())
}

fn region_glyph(label: usize) -> char {
    const GLYPHS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    GLYPHS[label % GLYPHS.len()] as char
}

fn print_glyphs(width: i32, glyphs: &[char]) {
    for row in glyphs.chunks(width.max(1) as usize) {
        println!("{}", row.iter().collect::<String>());
    }
}

fn print_grid(args: &Args, grid: &Grid, config: &FogwoodConfig) -> Result<()> {
    if args.json {
        let fog = FogMap::from_grid(grid, config.session.tile_width, config.session.tile_height);
        println!("{}", serde_json::to_string_pretty(&fog.snapshot())?);
    } else {
        print!("{}", grid.to_ascii());
    }
    Ok(())
}

fn print_fog(args: &Args, fog: &FogMap) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&fog.snapshot())?);
        return Ok(());
    }
    let glyphs: Vec<char> = fog
        .tiles()
        .iter()
        .map(|t| match (t.is_fogged(), t.open) {
            (true, _) => ' ',
            (false, true) => '.',
            (false, false) => '#',
        })
        .collect();
    print_glyphs(fog.width(), &glyphs);
    Ok(())
}
