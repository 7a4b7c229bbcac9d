// src/main.rs

//! Interactive demo of the platform: draws the grid, highlights the cell
//! under the pointer, and echoes the last canonical event on the top row.

use rogue_platform::{
    color::Color,
    config::{Backend, Config, CONFIG},
    event::{key_codes, EventKind, RogueEvent},
    platform::{
        atlas::AssetDirectory,
        backends::{headless::HeadlessDriver, x11::X11Driver, DisplayDriver, KeySymbol, RawEvent},
        console::Console,
        Platform,
    },
};

use anyhow::Context;
use log::info;
use std::cell::RefCell;
use std::rc::Rc;

const GRID_FORE: Color = Color::new(40, 40, 55);
const HOVER_BACK: Color = Color::new(25, 25, 60);
const STATUS_FORE: Color = Color::new(100, 90, 40);

/// Main entry point for the `rogue-platform` demo.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting rogue-platform demo...");
    let config: &Config = &CONFIG;
    let assets = AssetDirectory::new(&config.assets.directory);

    match config.backend {
        Backend::X11 => {
            let driver = X11Driver::new().context("Failed to initialize X11 driver")?;
            run(Platform::new(driver, assets, config)?)
        }
        Backend::Headless => {
            let mut driver = HeadlessDriver::new();
            // Nothing drives a headless window, so script a short session.
            driver.push_events([
                RawEvent::MouseMotion { x: 40, y: 40 },
                RawEvent::KeyDown {
                    symbol: KeySymbol::PageUp,
                },
                RawEvent::TextInput {
                    text: "@".to_string(),
                },
                RawEvent::Quit,
            ]);
            run(Platform::new(driver, assets, config)?)
        }
    }
}

/// What the demo shows besides the grid itself.
struct Screen {
    hovered: (i32, i32),
    status: String,
}

fn run<D: DisplayDriver + 'static>(mut platform: Platform<D, AssetDirectory>) -> anyhow::Result<()> {
    let screen = Rc::new(RefCell::new(Screen {
        hovered: (-1, -1),
        status: String::from("Move the mouse, press keys; Escape quits."),
    }));
    // Zoom, resize and fullscreen clear the window while we are blocked
    // waiting for input; repaint from the shared state right away.
    let hook_screen = Rc::clone(&screen);
    platform.set_redraw_hook(Box::new(move |platform: &mut Platform<D, AssetDirectory>| {
        draw(platform, &hook_screen.borrow())
    }));

    loop {
        draw(&mut platform, &screen.borrow());
        let event = platform.next_key_or_mouse_event(false, None)?;
        if platform.quit_requested() {
            break;
        }

        let mut screen = screen.borrow_mut();
        match event.kind {
            EventKind::MouseEnteredCell => screen.hovered = (event.param1, event.param2),
            EventKind::Keystroke if event.param1 == key_codes::ESCAPE_KEY => break,
            _ => {}
        }
        screen.status = describe(&event);
        info!("{}", screen.status);
    }

    info!("Demo finished.");
    Ok(())
}

fn draw<D: DisplayDriver>(platform: &mut Platform<D, AssetDirectory>, screen: &Screen) {
    let (columns, rows) = platform.grid();
    let status: Vec<char> = screen.status.chars().collect();
    for y in 0..rows as i32 {
        for x in 0..columns as i32 {
            if y == 0 {
                let c = status.get(x as usize).copied().unwrap_or(' ');
                platform.plot_char(c, x, y, STATUS_FORE, Color::BLACK);
            } else {
                let back = if (x, y) == screen.hovered { HOVER_BACK } else { Color::BLACK };
                platform.plot_char('\u{00B7}', x, y, GRID_FORE, back);
            }
        }
    }
}

fn describe(event: &RogueEvent) -> String {
    let modifiers = match (event.shift_key, event.control_key) {
        (true, true) => " +shift +ctrl",
        (true, false) => " +shift",
        (false, true) => " +ctrl",
        (false, false) => "",
    };
    match event.kind {
        EventKind::Keystroke => match char::from_u32(event.param1 as u32) {
            Some(c) if c.is_ascii_graphic() => format!("Keystroke '{}'{}", c, modifiers),
            _ => format!("Keystroke {}{}", event.param1, modifiers),
        },
        kind => format!("{:?} at ({}, {}){}", kind, event.param1, event.param2, modifiers),
    }
}
