//! Runs a CHIP-8 program in a window.
//!
//! ```text
//! chipotle8 games/PONG --rate 700 -v
//! ```
//!
//! The hex keypad is mapped onto the left of a QWERTY keyboard:
//!
//! ```text
//! Keypad                   Keyboard
//! +-+-+-+-+                +-+-+-+-+
//! |1|2|3|C|                |1|2|3|4|
//! +-+-+-+-+                +-+-+-+-+
//! |4|5|6|D|                |Q|W|E|R|
//! +-+-+-+-+       =>       +-+-+-+-+
//! |7|8|9|E|                |A|S|D|F|
//! +-+-+-+-+                +-+-+-+-+
//! |A|0|B|F|                |Y|X|C|V|
//! +-+-+-+-+                +-+-+-+-+
//! ```
//!
//! Escape quits, PageUp and PageDown change the instruction rate by one.
#[macro_use]
extern crate slog;

use anyhow::{anyhow, bail, Context, Result};
use chipotle8::{Config, Emulator, HEIGHT, NUM_KEYS, WIDTH};
use clap::Parser;
use minifb::{Key, KeyRepeat, Scale, ScaleMode, Window, WindowOptions};
use slog::Logger;
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// host keys for CHIP-8 keys 0x0 through 0xF
const KEYMAP: [Key; NUM_KEYS] = [
    Key::X,
    Key::Key1,
    Key::Key2,
    Key::Key3,
    Key::Q,
    Key::W,
    Key::E,
    Key::A,
    Key::S,
    Key::D,
    Key::Y,
    Key::C,
    Key::Key4,
    Key::R,
    Key::F,
    Key::V,
];

/// redraw at most 60 times a second, however fast instructions run
const FRAME_TIME: Duration = Duration::from_nanos(16_666_667);

#[derive(Parser, Debug)]
#[command(version, about = "Run a CHIP-8 program")]
struct Args {
    /// Path to the program to run
    rom: PathBuf,

    /// Instructions per second, 1 through 65535 [default: 500]
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    rate: Option<u16>,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file, command line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window scale: 1, 2, 4, 8, 16 or 32
    #[arg(long, default_value_t = 8)]
    scale: u8,

    /// Log more, -v for debug and -vv for every instruction
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let logger = build_logger(args.verbose)?;
    let config = load_config(&args)?;
    let scale = window_scale(args.scale)?;

    let mut emulator = Emulator::from_config(&config, Some(logger.clone()))?;
    emulator.load_program_file(&args.rom)?;

    run(&mut emulator, &logger, scale)
}

fn build_logger(verbosity: u8) -> Result<Logger> {
    let level = match verbosity {
        0 => Severity::Info,
        1 => Severity::Debug,
        _ => Severity::Trace,
    };

    let mut builder = TerminalLoggerBuilder::new();
    builder.level(level);
    builder.destination(Destination::Stderr);
    builder
        .build()
        .map_err(|e| anyhow!("could not set up logging: {}", e))
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("could not open config {}", path.display()))?;
            Config::from_reader(file)
                .with_context(|| format!("could not load config {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(rate) = args.rate {
        config.instruction_rate = rate;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn window_scale(factor: u8) -> Result<Scale> {
    let scale = match factor {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        16 => Scale::X16,
        32 => Scale::X32,
        _ => bail!("unsupported window scale {}", factor),
    };
    Ok(scale)
}

fn run(emulator: &mut Emulator, logger: &Logger, scale: Scale) -> Result<()> {
    let mut window = Window::new(
        "chipotle8",
        WIDTH,
        HEIGHT,
        WindowOptions {
            resize: true,
            scale,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| anyhow!("unable to create window: {}", e))?;

    let mut frame = vec![0u32; WIDTH * HEIGHT];
    let mut display_changed = true;
    let mut last_tick = Instant::now();
    let mut last_frame: Option<Instant> = None;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        emulator.set_keys(read_keys(&window));

        let now = Instant::now();
        display_changed |= emulator.tick(now - last_tick)?;
        last_tick = now;

        if last_frame.map_or(true, |t| now - t >= FRAME_TIME) {
            if display_changed {
                rgb_to_argb(emulator.get_pixels(), &mut frame);
                window
                    .update_with_buffer(&frame, WIDTH, HEIGHT)
                    .map_err(|e| anyhow!("unable to draw: {}", e))?;
                display_changed = false;
            } else {
                // still needed to pick up key presses
                window.update();
            }
            // key state only moves on when the window updates, so once per frame
            adjust_rate(&window, emulator, logger);
            last_frame = Some(now);
        } else {
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    info!(logger, "window closed");
    Ok(())
}

fn read_keys(window: &Window) -> [bool; NUM_KEYS] {
    let mut keys = [false; NUM_KEYS];
    for (down, key) in keys.iter_mut().zip(KEYMAP.iter()) {
        *down = window.is_key_down(*key);
    }
    keys
}

fn adjust_rate(window: &Window, emulator: &mut Emulator, logger: &Logger) {
    let rate = emulator.instruction_rate();
    let up = window.is_key_pressed(Key::PageUp, KeyRepeat::Yes);
    let down = window.is_key_pressed(Key::PageDown, KeyRepeat::Yes);

    if let Some(new_rate) = stepped_rate(rate, up, down) {
        if emulator.set_instruction_rate(new_rate).is_err() {
            debug!(logger, "instruction rate already at its limit"; "rate" => rate);
        }
    }
}

/// One PageUp or PageDown press moves the rate by one. PageUp wins if both are held.
fn stepped_rate(rate: u16, up: bool, down: bool) -> Option<u32> {
    let rate = u32::from(rate);
    if up {
        Some(rate + 1)
    } else if down {
        Some(rate - 1)
    } else {
        None
    }
}

/// minifb wants one 0RGB u32 per pixel
fn rgb_to_argb(rgb: &[u8], frame: &mut [u32]) {
    for (pixel, chunk) in frame.iter_mut().zip(rgb.chunks_exact(3)) {
        *pixel = u32::from(chunk[0]) << 16 | u32::from(chunk[1]) << 8 | u32::from(chunk[2]);
    }
}
