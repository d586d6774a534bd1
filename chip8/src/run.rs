use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chipvm::{Chip8, Config, Keys};
use chipvm_display::Display;

use crate::keymap::keymap;

/// Runs a ROM in a window until it's closed or the machine hits an error.
///
/// # Arguments
/// * `rom` path to the program image
/// * `config` quirks, clock speed and seed for the machine
/// * `scale` the size multiplier for each pixel
pub fn run(rom: &Path, config: Config, scale: u32) -> Result<(), Box<dyn Error>> {
    let mut chip8 = Chip8::with_config(config);
    let mut keys = Keys::new();

    // Load ROM
    let file = File::open(rom)?;
    let mut reader = BufReader::new(file);
    let size = chip8.load_rom(&mut reader)?;
    info!("loaded {} ({} bytes)", rom.display(), size);

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let title = format!("chipvm - {}", rom.display());
    let mut display = Display::new(&sdl, &title, scale)?;
    let mut events = sdl.event_pump()?;

    // One frame is one timer tick
    let frame_time = Duration::from_secs(1) / config.timer_hz.max(1);
    let mut last_frame = Instant::now();

    // Whether or not the clock speed should be respected
    let mut fast_forward = false;
    let mut tone = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => keys.press(kc),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => keys.release(kc),
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        chip8.run_frame(&keys)?;

        if let Some(frame) = chip8.take_frame() {
            display.render(frame)?;
        }

        if chip8.sound_active() != tone {
            tone = !tone;
            debug!("tone {}", if tone { "on" } else { "off" });
        }

        // Handle timing
        let elapsed = last_frame.elapsed();
        if !fast_forward && frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
        last_frame = Instant::now();
    }

    info!("window closed at pc {:#05X}", chip8.pc());
    Ok(())
}
