use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;

use reelswap::carousel::{CarouselEvent, CarouselEventHandler, ObjectFit, TransitionMode};
use reelswap::surface::sim::SimHost;
use reelswap::surface::{Point, Size};
use reelswap::utils::{self, format_duration};

/// Viewport used when neither the config nor the command line fixes one
const SIM_CONTAINER: Size = Size {
    width: 1280.0,
    height: 720.0,
};

/// reelswap - rotate media items through two alternating surfaces
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Media items to rotate through
    #[arg(value_name = "ITEM")]
    items: Vec<String>,

    /// Additional config file, applied after the system and user files
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Transition mode (right, left, top, bottom, fade, none)
    #[arg(short, long)]
    mode: Option<TransitionMode>,

    /// Transition duration in milliseconds
    #[arg(short, long, value_name = "MS")]
    speed: Option<u64>,

    /// Viewport width (0 follows the container)
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height (0 follows the container)
    #[arg(long)]
    height: Option<f64>,

    /// Object fit keyword
    #[arg(long)]
    fit: Option<ObjectFit>,

    /// Mute both surfaces
    #[arg(long)]
    muted: bool,

    /// Poster image shown before playback
    #[arg(long)]
    poster: Option<String>,

    /// Number of transitions to run
    #[arg(long)]
    cycles: Option<u32>,

    /// Simulated clip length in milliseconds
    #[arg(long, value_name = "MS")]
    clip_ms: Option<u64>,

    /// Print the final status as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let mut config = utils::load_config(args.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging
    let log_level = if args.debug { "debug" } else { config.general.log_level.as_str() };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting reelswap v{}", env!("CARGO_PKG_VERSION"));

    // Command line values override the layered config
    let options = &mut config.carousel;
    if !args.items.is_empty() {
        options.children = args.items;
    }
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(speed) = args.speed {
        options.speed = speed;
    }
    if let Some(width) = args.width {
        options.width = width;
    }
    if let Some(height) = args.height {
        options.height = height;
    }
    if let Some(fit) = args.fit {
        options.fit = fit;
    }
    if let Some(poster) = args.poster {
        options.poster = poster;
    }
    options.muted |= args.muted;
    if let Some(cycles) = args.cycles {
        config.simulation.cycles = cycles;
    }
    if let Some(clip_ms) = args.clip_ms {
        config.simulation.clip_ms = clip_ms;
    }
    config.validate()?;

    if config.carousel.children.is_empty() {
        warn!("No media items given, nothing to rotate");
        return Ok(());
    }
    if config.carousel.selector.is_empty() {
        config.carousel.selector = "#reelswap".to_string();
    }

    let clip = Duration::from_millis(config.simulation.clip_ms);
    let host = SimHost::new(&config.carousel.selector, Point::ORIGIN, SIM_CONTAINER);
    for slot in reelswap::Slot::BOTH {
        host.surface(slot).set_clip_seconds(clip.as_secs_f64());
    }

    let mut carousel = host
        .builder(config.carousel.clone())
        .with_event_handler(Box::new(LoggingEventHandler))
        .build()?;

    info!(
        "Rotating {} item(s), mode {}, {} per clip, {} cycle(s)",
        carousel.len(),
        carousel.mode(),
        format_duration(clip),
        config.simulation.cycles
    );

    carousel.start();

    for cycle in 0..config.simulation.cycles {
        tokio::time::sleep(clip).await;

        let finished = carousel.active();
        host.surface(finished).advance_clock(clip.as_secs_f64());
        host.finish(finished);
        carousel.pump();

        if carousel.is_transitioning() {
            tokio::time::sleep(carousel.speed()).await;
            host.complete_animation(carousel.active());
            carousel.pump();
        }

        debug!("Cycle {} done: {:?}", cycle + 1, carousel.status());
    }

    carousel.stop();
    let status = carousel.status();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!(
            "active slot {} playing {}, standby holds {}",
            status.active,
            status.active_src.as_deref().unwrap_or("-"),
            status.standby_src.as_deref().unwrap_or("-")
        );
    }

    carousel.destroy();

    Ok(())
}

/// Event handler that logs events
struct LoggingEventHandler;

impl CarouselEventHandler for LoggingEventHandler {
    fn handle_event(&mut self, event: CarouselEvent) {
        match event {
            CarouselEvent::Started { active } => info!("Playback started on slot {}", active),
            CarouselEvent::Stopped => info!("Playback stopped"),
            CarouselEvent::TransitionStarted { from, to } => debug!("Transition {} -> {}", from, to),
            CarouselEvent::TransitionCompleted { active, preloaded } => {
                info!("Slot {} now showing, next up: {}", active, preloaded.as_deref().unwrap_or("-"))
            }
            CarouselEvent::Reparented { selector } => info!("Moved to {}", selector),
            CarouselEvent::Destroyed => debug!("Carousel destroyed"),
        }
    }
}
