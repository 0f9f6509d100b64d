use std::path::PathBuf;
use std::time::{Duration, Instant};

use color_eyre::eyre::{Result, WrapErr};
use log::{info, warn};

use chip8_core::{keymap, Chip8, FrameBuffer, CLOCK_SPEED};

pub struct Options {
    pub rom: PathBuf,
    /// Stop after this many cycles, run until a fault otherwise
    pub cycles: Option<usize>,
    /// Keyboard characters held down for the whole run
    pub held_keys: String,
}

pub fn run(options: Options) -> Result<()> {
    let mut chip8: Chip8 = Chip8::new();

    // Load ROM
    chip8
        .load_rom_file(&options.rom)
        .wrap_err_with(|| format!("unable to load {}", options.rom.display()))?;
    info!("successfully loaded {}", options.rom.display());

    for c in options.held_keys.chars() {
        match keymap(c) {
            Some(key) => chip8.key_press(key),
            None => warn!("{:?} isn't mapped to a key", c),
        }
    }

    // Set initial timing
    let cycle_time: Duration = Duration::from_nanos(CLOCK_SPEED);
    let mut last_cycle: Instant = Instant::now();
    let mut cycle: usize = 0;

    while options.cycles.map_or(true, |limit| cycle < limit) {
        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            render(frame);
        }

        let step = chip8
            .step()
            .wrap_err_with(|| format!("stopped after {} cycles", cycle))?;
        if step.tone_stopped {
            info!("beep");
        }
        cycle += 1;

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }

    info!("ran {} cycles", cycle);
    render(chip8.frame());
    Ok(())
}

fn render(frame: &FrameBuffer) {
    // Clear the terminal and home the cursor before drawing
    print!("\x1B[2J\x1B[H{}", frame);
}
