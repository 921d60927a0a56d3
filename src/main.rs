use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use balloon_sky::apt;
use balloon_sky::assets::{load_png, save_png};
use balloon_sky::config::SkyConfig;
use balloon_sky::display::PixelBuffer;
use balloon_sky::effects::{cloud_background, BalloonSky, Effect, EvolvingPicture};

#[derive(Parser, Debug)]
#[command(name = "balloon-sky", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate the balloon sky headlessly and write the last frame as PNG.
    Render(RenderArgs),
    /// Write only the cloud background as PNG.
    Clouds(CloudsArgs),
    /// Write the evolving-picture expression tree as a grey PNG.
    Apt(AptArgs),
    /// Open a window and animate the sky. Click balloons to pop them.
    #[cfg(feature = "window")]
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Sky config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Simulated time per frame in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    step_ms: f32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CloudsArgs {
    /// Sky config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AptArgs {
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[cfg(feature = "window")]
#[derive(Parser, Debug)]
struct PlayArgs {
    /// Sky config JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lock presentation to the display refresh rate.
    #[arg(long, default_value_t = false)]
    vsync: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Clouds(args) => cmd_clouds(args),
        Command::Apt(args) => cmd_apt(args),
        #[cfg(feature = "window")]
        Command::Play(args) => cmd_play(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SkyConfig> {
    match path {
        Some(path) => SkyConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display())),
        None => Ok(SkyConfig::default()),
    }
}

/// Decode the sprite and explosion PNGs named in the config
fn load_assets(config: &SkyConfig) -> anyhow::Result<(Vec<PixelBuffer>, Option<PixelBuffer>)> {
    let sprites = config
        .balloons
        .sprites
        .iter()
        .map(|path| load_png(path).with_context(|| format!("load sprite '{}'", path.display())))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let explosion = config
        .balloons
        .explosion
        .as_ref()
        .map(|path| {
            load_png(path).with_context(|| format!("load explosion sheet '{}'", path.display()))
        })
        .transpose()?;
    tracing::info!(
        sprites = sprites.len(),
        explosion = explosion.is_some(),
        "assets loaded"
    );
    Ok((sprites, explosion))
}

fn write_png(buffer: &PixelBuffer, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    save_png(buffer, out).with_context(|| format!("write png '{}'", out.display()))?;
    tracing::info!(path = %out.display(), "wrote frame");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let (sprites, explosion) = load_assets(&config)?;
    let mut sky = BalloonSky::new(&config, sprites, explosion)?;
    let mut frame = PixelBuffer::with_size(config.width, config.height)?;

    for _ in 0..args.frames {
        sky.update(args.step_ms);
    }
    sky.render(&mut frame);
    tracing::debug!(
        frames = args.frames,
        clock_ms = sky.clock_ms(),
        balloons = sky.balloons().len(),
        "simulation finished"
    );

    write_png(&frame, &args.out)
}

fn cmd_clouds(args: CloudsArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let background = cloud_background(&config)?;
    write_png(&background, &args.out)
}

fn cmd_apt(args: AptArgs) -> anyhow::Result<()> {
    let picture = EvolvingPicture::new(apt::default_tree(), args.width, args.height)?;
    write_png(picture.image(), &args.out)
}

#[cfg(feature = "window")]
fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    use std::time::{Duration, Instant};

    use balloon_sky::display::{Display, InputEvent, RenderTarget};
    use balloon_sky::util::{frame_sleep, FpsCounter};
    use sdl2::keyboard::Keycode;

    let config = load_config(args.config.as_deref())?;
    let (sprites, explosion) = load_assets(&config)?;

    let (mut display, texture_creator) =
        Display::with_options("balloon-sky", config.width, config.height, args.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, config.width, config.height)?;
    let mut buffer = PixelBuffer::with_size(config.width, config.height)?;

    // Tab switches between the sky and the evolving picture
    let mut effects: Vec<Box<dyn Effect>> = vec![
        Box::new(BalloonSky::new(&config, sprites, explosion)?),
        Box::new(EvolvingPicture::new(
            apt::default_tree(),
            config.width,
            config.height,
        )?),
    ];
    let mut current = 0;

    let min_frame = Duration::from_millis(config.min_frame_ms);
    let mut fps_counter = FpsCounter::new(60);
    tracing::info!(
        width = config.width,
        height = config.height,
        vsync = args.vsync,
        "window open; Esc quits, Tab switches, F logs fps"
    );

    'main: loop {
        let frame_start = Instant::now();
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::Tab) => {
                    current = (current + 1) % effects.len();
                    tracing::info!(effect = effects[current].name(), "switched effect");
                },
                InputEvent::KeyDown(Keycode::F) => {
                    let (min_fps, max_fps) = fps_counter.min_max_fps();
                    tracing::info!(
                        avg = avg_fps as u32,
                        min = min_fps as u32,
                        max = max_fps as u32,
                        ms = fps_counter.avg_frame_time_ms() as u32,
                        "fps"
                    );
                },
                InputEvent::Click { x, y } => {
                    effects[current].click(x as f32, y as f32);
                },
                InputEvent::KeyDown(_) => {},
            }
        }

        effects[current].update(dt * 1000.0);
        effects[current].render(&mut buffer);
        display.present(&mut target, &buffer)?;

        std::thread::sleep(frame_sleep(frame_start, min_frame));
    }

    Ok(())
}
