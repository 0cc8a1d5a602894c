use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use heightscape_render::{DebugTextRenderer, MapView, RecordingScene, Renderer};
use heightscape_stream::{StreamConfig, World};
use heightscape_tools::CellInspector;
use tracing_subscriber::EnvFilter;

mod host;

use host::{Completion, LatencyBuilder};

#[derive(Parser)]
#[command(name = "heightscape-cli", about = "Terrain cell streaming driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Fly a viewer across the world and report streaming stats
    Simulate(SimArgs),
    /// Stream the window around a point and print it as an ASCII map
    Map {
        #[command(flatten)]
        grid: GridArgs,
        /// Viewer x in world units
        #[arg(long, default_value = "10290")]
        x: f32,
        /// Viewer y in world units
        #[arg(long, default_value = "8920")]
        y: f32,
        /// Extra cells drawn around the window
        #[arg(long, default_value = "1")]
        margin: i32,
    },
}

#[derive(Args)]
struct GridArgs {
    /// YAML file with streaming settings
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the cell size
    #[arg(long)]
    cell_size: Option<i32>,
    /// Override the window radius
    #[arg(long)]
    radius: Option<i32>,
}

impl GridArgs {
    fn load(&self) -> anyhow::Result<StreamConfig> {
        let mut config = match &self.config {
            Some(path) => StreamConfig::load(path)?,
            None => StreamConfig::default(),
        };
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args)]
struct SimArgs {
    #[command(flatten)]
    grid: GridArgs,
    /// Number of frames to simulate
    #[arg(short, long, default_value = "600")]
    frames: u32,
    /// Frame duration in milliseconds
    #[arg(long, default_value = "16")]
    frame_ms: u64,
    /// Viewer speed in world units per second
    #[arg(long, default_value = "500")]
    speed: f32,
    /// Heading in degrees, 0 = +x
    #[arg(long, default_value = "30")]
    heading: f32,
    /// Simulated build latency in milliseconds
    #[arg(long, default_value = "40")]
    latency_ms: u64,
    /// Fail every Nth build
    #[arg(long)]
    fail_every: Option<u32>,
    /// Print a summary every N frames (0 disables)
    #[arg(long, default_value = "120")]
    report_every: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("heightscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("stream: {}", heightscape_stream::crate_info());
            println!("render: {}", heightscape_render::crate_info());
            println!("tools: {}", heightscape_tools::crate_info());
            let config = StreamConfig::default();
            println!(
                "defaults: cell_size={} radius={} queue_delay={:?} world={}x{}",
                config.cell_size,
                config.radius,
                config.queue_delay(),
                config.world_width,
                config.world_height
            );
        }
        Commands::Simulate(args) => simulate(&args)?,
        Commands::Map { grid, x, y, margin } => {
            let config = grid.load()?;
            let mut world = World::new(RecordingScene::new(), &config)?;
            let mut builder = LatencyBuilder::new(Duration::ZERO, None);
            world.update(Vec2::new(x, y), &mut builder);
            // Let every staggered build fire and finish.
            while world.stats().in_flight > 0 {
                let step = config.queue_delay().max(Duration::from_millis(1));
                world.advance(step, &mut builder);
                for done in builder.tick(step) {
                    apply(&mut world, done);
                }
            }
            print!(
                "{}",
                DebugTextRenderer::new().render(&world, &MapView { margin })
            );
        }
    }

    Ok(())
}

fn simulate(args: &SimArgs) -> anyhow::Result<()> {
    let config = args.grid.load()?;
    let frame = Duration::from_millis(args.frame_ms);
    let heading = args.heading.to_radians();
    let velocity = Vec2::new(heading.cos(), heading.sin()) * args.speed;

    let mut world = World::new(RecordingScene::new(), &config)?;
    let mut builder =
        LatencyBuilder::new(Duration::from_millis(args.latency_ms), args.fail_every);
    let mut viewer = Vec2::new(10290.0, 8920.0);

    println!(
        "Simulating {} frames: cell_size={} radius={} speed={}/s latency={}ms",
        args.frames, config.cell_size, config.radius, args.speed, args.latency_ms
    );

    let mut window_shifts = 0u32;
    let mut peak_in_flight = 0usize;
    for i in 0..args.frames {
        viewer += velocity * frame.as_secs_f32();
        let report = world.update(viewer, &mut builder);
        window_shifts += u32::from(report.window_changed);
        world.advance(frame, &mut builder);
        for done in builder.tick(frame) {
            apply(&mut world, done);
        }
        peak_in_flight = peak_in_flight.max(world.stats().in_flight);

        if args.report_every > 0 && (i + 1) % args.report_every == 0 {
            println!(
                "  frame {:>5} viewer=({:.0}, {:.0}) {}",
                i + 1,
                viewer.x,
                viewer.y,
                CellInspector::summary(&world)
            );
        }
    }

    println!("Window shifts: {window_shifts}");
    println!("Peak builds in flight: {peak_in_flight}");
    println!("Builds still running: {}", builder.in_progress());
    println!("Scene meshes: {}", world.scene().len());
    println!("{}", CellInspector::summary(&world));
    let stalled = CellInspector::list_stalled(&world);
    if !stalled.is_empty() {
        println!("Visible cells without geometry: {}", stalled.len());
    }
    Ok(())
}

fn apply(world: &mut World<RecordingScene>, done: Completion) {
    let result = match done {
        Completion::Built(ticket, mesh) => world.complete_build(ticket, mesh).map(|_| ()),
        Completion::Failed(ticket, error) => world.fail_build(ticket, error),
    };
    if let Err(err) = result {
        tracing::warn!(%err, "build completion rejected");
    }
}
