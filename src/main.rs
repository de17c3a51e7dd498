//! LCD snake runner (default binary).
//!
//! The panel is emulated in the terminal: every byte the game sends goes
//! through the same controller protocol a wired display would receive.
//! Input is read on the main thread; a second thread steps the game and
//! flushes the framebuffer once per tick.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn};

use lcd_snake::config::GameConfig;
use lcd_snake::core::SnakeEngine;
use lcd_snake::display::{blit_direct, Bitmap, Font8x8, HardwareSink, Rasterizer, Surface};
use lcd_snake::input::{handle_key_event, ControlCell};
use lcd_snake::term::{restore_terminal, TerminalPanel, Viewport};
use lcd_snake::types::{Color, LifeState, LCD_HEIGHT, LCD_WIDTH};

const INPUT_POLL_MS: u64 = 50;
const SPLASH_SLICE_MS: u64 = 50;

const SPLASH_TEXT: &str = "Welcome to\r\nSnake Game!\r\n\r\nWASD  move\r\n1/2   speed\r\nQ     quit";

// 16x16 snake head, page-packed.
#[rustfmt::skip]
const LOGO: [u8; 32] = [
    0x00, 0xF0, 0xF8, 0xFC, 0x9E, 0x9E, 0xFE, 0xFE, 0xFE, 0xFE, 0x9E, 0x9E, 0xFC, 0xF8, 0xF0, 0x00,
    0x00, 0x07, 0x1F, 0x3F, 0x7F, 0x7F, 0x7B, 0xF3, 0xF3, 0x7B, 0x7F, 0x7F, 0x3F, 0x1F, 0x07, 0x00,
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = GameConfig::from_env().parse_args(&args)?;
    info!("config: {config:?}");

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    let mut panel = TerminalPanel::new();
    panel.enter()?;

    let result = run(&mut panel, &config);

    // Always try to restore terminal state.
    let _ = panel.exit();
    result
}

fn run(panel: &mut TerminalPanel, config: &GameConfig) -> Result<()> {
    let control = ControlCell::new(config.direction);

    thread::scope(|s| {
        let ticker = s.spawn(|| {
            let result = tick_loop(panel, config, &control);
            control.request_quit();
            result
        });
        let input = input_loop(&control);
        control.request_quit();

        let ticked = ticker
            .join()
            .map_err(|_| anyhow!("tick thread panicked"))?;
        input.and(ticked)
    })
}

fn input_loop(control: &ControlCell) -> Result<()> {
    while !control.should_quit() {
        if !event::poll(Duration::from_millis(INPUT_POLL_MS))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(command) = handle_key_event(key) {
                control.apply(command);
            }
        }
    }
    Ok(())
}

fn tick_loop<W: Write>(
    panel: &mut TerminalPanel<W>,
    config: &GameConfig,
    control: &ControlCell,
) -> Result<()> {
    panel.initialize()?;

    let mut surface = Surface::new(LCD_WIDTH, LCD_HEIGHT);
    surface.set_orientation(config.orientation);
    splash(panel, &mut surface, config, control)?;

    let seed = config.seed.unwrap_or_else(clock_seed);
    info!("seed {seed}");
    let mut engine = SnakeEngine::new(LCD_WIDTH, LCD_HEIGHT, config.point_size, seed);
    engine.set_wrap(config.wrap);
    start_round(&mut engine, &mut surface, config, control)?;

    while !control.should_quit() {
        let tick_start = Instant::now();

        if control.take_restart() && engine.life().is_terminal() {
            start_round(&mut engine, &mut surface, config, control)?;
        }

        let nudges = control.take_speed_nudges();
        for _ in 0..nudges.max(0) {
            engine.speed_up();
        }
        for _ in 0..(-nudges).max(0) {
            engine.slow_down();
        }

        if !engine.life().is_terminal() {
            let life = engine.step(&mut surface, control.requested_direction());
            if life.is_terminal() {
                draw_banner(&mut surface, life, engine.score());
            }
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        panel.set_viewport(Viewport::new(w, h));
        panel.set_status(status_line(&engine));
        surface.flush(panel)?;

        let interval = Duration::from_millis(engine.speed() as u64);
        if let Some(rest) = interval.checked_sub(tick_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    info!("final snapshot: {}", serde_json::to_string(&engine.snapshot())?);
    panel.clear_hardware()?;
    panel.power_off()?;
    panel.sync()
}

/// Welcome text, then the logo streamed straight to the panel.
fn splash<W: Write>(
    panel: &mut TerminalPanel<W>,
    surface: &mut Surface,
    config: &GameConfig,
    control: &ControlCell,
) -> Result<()> {
    if config.splash_ms == 0 {
        return Ok(());
    }
    surface.clear(Color::Off);
    surface.puts(&Font8x8, 0, 0, SPLASH_TEXT, Color::Off, Color::On);
    panel.set_status("Welcome to Snake Game!");
    surface.flush(panel)?;

    match Bitmap::new(16, 16, &LOGO) {
        Some(logo) => blit_direct(surface, panel, 104, 40, &logo, Color::On)?,
        None => warn!("splash logo has the wrong size"),
    }

    let deadline = Instant::now() + Duration::from_millis(config.splash_ms);
    while Instant::now() < deadline && !control.should_quit() {
        thread::sleep(Duration::from_millis(SPLASH_SLICE_MS));
    }
    Ok(())
}

fn start_round(
    engine: &mut SnakeEngine,
    surface: &mut Surface,
    config: &GameConfig,
    control: &ControlCell,
) -> Result<()> {
    surface.clear(Color::Off);
    control.request_direction(config.direction);
    engine.init(
        surface,
        config.length,
        config.direction,
        config.score_step,
        config.speed_ms,
    )?;
    info!("round started: {}", status_line(engine));
    Ok(())
}

fn draw_banner(surface: &mut Surface, life: LifeState, score: u32) {
    let text = match life {
        LifeState::Win => "YOU WIN!",
        _ => "GAME OVER",
    };
    surface.rectangle(20, 18, 107, 45, Color::Off, true);
    surface.rectangle(20, 18, 107, 45, Color::On, false);
    let x = (LCD_WIDTH as i32 - 8 * text.len() as i32) / 2;
    surface.puts(&Font8x8, x, 22, text, Color::Off, Color::On);
    surface.puts(&Font8x8, 28, 34, "Score", Color::Off, Color::On);
    surface.put_num(&Font8x8, 76, 34, score as i64, Color::Off, Color::On);
}

fn status_line(engine: &SnakeEngine) -> String {
    let snap = engine.snapshot();
    if snap.is_over() {
        format!("{} | r: restart  q: quit", snap.status_line())
    } else {
        snap.status_line()
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
