use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use range_highlight::cli::{CliArgs, Command, OutputFormat, RenderJob, DEFAULT_CONFIG_FILE};
use range_highlight::composite::CompositeMap;
use range_highlight::render::{ascii_grid, RasterSink, RenderSink};
use range_highlight::scene::Scene;
use range_highlight::world::{GridBounds, TilePos, WorldQuery};
use range_highlight::{logging, HighlightConfig, RangeHighlighter};

/// One host tick at 60 ticks per second
const TICK: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    let args = CliArgs::parse();
    logging::init(args.log_dir.as_deref());

    match args.into_command().map_err(anyhow::Error::msg)? {
        Command::PrintDefaultConfig => {
            print!("{}", HighlightConfig::default().to_yaml()?);
            Ok(())
        }
        Command::Render(job) => render(&job),
    }
}

fn load_config(path: Option<&Path>) -> Result<HighlightConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            HighlightConfig::from_yaml(&content)
                .with_context(|| format!("Invalid config {}", path.display()))
        }
        None => Ok(HighlightConfig::load(Path::new(DEFAULT_CONFIG_FILE))),
    }
}

fn render(job: &RenderJob) -> Result<()> {
    let config = load_config(job.config.as_deref())?;
    let scene = Scene::load(&job.scene)?;

    let mut engine = RangeHighlighter::with_builtins(config);
    let pressed = scene.input.pressed_keys()?;

    let mut frames = 0u32;
    let mut count_frames = |_: &CompositeMap| frames += 1;
    for _ in 0..job.ticks {
        let requested = engine.activation(&pressed);
        let activation = scene.input.apply(requested);
        engine.tick(TICK, &scene, &activation, &mut count_frames);
    }
    tracing::info!(
        "{} ticks ({:.2?}), {} refreshes, {} tiles highlighted",
        job.ticks,
        engine.elapsed(),
        frames,
        engine.current().len()
    );

    let map = engine.current();
    let (origin, columns, rows) = view_area(&scene, map);

    let mut out: Box<dyn Write> = match &job.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match job.format {
        OutputFormat::Ascii => out.write_all(ascii_grid(map, origin, columns, rows).as_bytes())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, map)?;
            writeln!(out)?;
        }
        OutputFormat::Ppm => {
            if columns == 0 || rows == 0 {
                bail!("Nothing to render: scene has no bounds and no highlighted tiles");
            }
            let mut sink = RasterSink::new(origin, columns, rows, job.tile_size)
                .with_grid(range_highlight::Color::rgba(0, 0, 0, 40));
            sink.present(map);
            sink.write_ppm(&mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Area to draw: the scene bounds, or the highlighted tiles when unbounded
fn view_area(scene: &Scene, map: &CompositeMap) -> (TilePos, usize, usize) {
    if let Some(GridBounds { width, height }) = scene.bounds() {
        return (TilePos::new(0, 0), width as usize, height as usize);
    }
    match map.extent() {
        Some((lo, hi)) => (
            lo,
            (hi.x - lo.x + 1) as usize,
            (hi.y - lo.y + 1) as usize,
        ),
        None => (TilePos::new(0, 0), 0, 0),
    }
}
