// src/platform/tests.rs

use super::atlas::MemoryAtlasSource;
use super::backends::headless::{HeadlessDriver, WindowOp};
use super::backends::{DisplayDriver, KeySymbol, Modifiers, MouseButton, RawEvent};
use super::console::{Console, Modifier};
use super::Platform;
use crate::color::{unpack_rgb, Color};
use crate::config::{Config, RemapConfig};
use crate::event::{key_codes, EventKind, RogueEvent};
use anyhow::Result;
use std::cell::Cell;
use std::rc::Rc;
use test_log::test;

type TestPlatform = Platform<HeadlessDriver, MemoryAtlasSource>;

fn config_with_font(font_size: Option<u8>) -> Config {
    let mut config = Config::default();
    config.window.font_size = font_size;
    config
}

fn headless_platform(font_size: u8) -> Result<TestPlatform> {
    Platform::new(
        HeadlessDriver::new(),
        MemoryAtlasSource::default(),
        &config_with_font(Some(font_size)),
    )
}

fn key(symbol: KeySymbol) -> RawEvent {
    RawEvent::KeyDown { symbol }
}

fn text(s: &str) -> RawEvent {
    RawEvent::TextInput { text: s.to_string() }
}

#[test]
fn startup_fits_the_usable_area_less_margins() -> Result<()> {
    let platform = Platform::new(
        HeadlessDriver::with_usable_area(1920, 1080),
        MemoryAtlasSource::default(),
        &config_with_font(None),
    )?;
    // 1900x980 fits font 9: 15px x 27px cells, 1500x918 grid.
    assert_eq!(platform.font_size(), 9);
    assert_eq!(
        platform.driver().window_ops(),
        &[WindowOp::Created {
            width_px: 1500,
            height_px: 918,
            has_icon: true
        }]
    );
    assert_eq!(platform.source().font_loads, vec![9]);
    Ok(())
}

#[test]
fn startup_on_a_tiny_display_uses_the_smallest_font() -> Result<()> {
    let platform = Platform::new(
        HeadlessDriver::with_usable_area(640, 480),
        MemoryAtlasSource::default(),
        &config_with_font(None),
    )?;
    assert_eq!(platform.font_size(), 1);
    Ok(())
}

#[test]
fn configured_font_size_skips_the_fit() -> Result<()> {
    let mut platform = headless_platform(5)?;
    assert_eq!(platform.font_size(), 5);
    assert_eq!(platform.driver().window_size(), (1100, 646));
    assert!(platform.take_redraw_request());
    assert!(!platform.take_redraw_request());
    Ok(())
}

#[test]
fn configured_remaps_are_registered() -> Result<()> {
    let mut config = config_with_font(Some(3));
    config.remaps = vec![RemapConfig {
        from: "y".to_string(),
        to: "z".to_string(),
    }];
    let mut platform = Platform::new(HeadlessDriver::new(), MemoryAtlasSource::default(), &config)?;
    platform.driver_mut().push_event(text("y"));
    assert_eq!(platform.poll_event(false)?, Some(RogueEvent::keystroke('z' as i32)));
    Ok(())
}

#[test]
fn page_up_grows_the_font_and_the_window() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.take_redraw_request();
    platform.driver_mut().push_event(key(KeySymbol::PageUp));

    assert_eq!(platform.poll_event(false)?, None);
    assert_eq!(platform.font_size(), 6);
    // Font 6 atlas is 192x336: 12x21 cells.
    assert_eq!(
        platform.driver().window_ops().last(),
        Some(&WindowOp::Resized {
            width_px: 12 * 100,
            height_px: 21 * 34
        })
    );
    assert!(platform.take_redraw_request());
    assert_eq!(platform.source().font_loads, vec![5, 6]);
    Ok(())
}

#[test]
fn zoom_stops_at_the_largest_and_smallest_fonts() -> Result<()> {
    let mut platform = headless_platform(13)?;
    platform.driver_mut().push_events([key(KeySymbol::PageUp), text("+")]);
    assert_eq!(platform.poll_event(false)?, Some(RogueEvent::keystroke('+' as i32)));
    assert_eq!(platform.font_size(), 13);
    assert_eq!(platform.driver().window_ops().len(), 1);

    let mut platform = headless_platform(1)?;
    platform.driver_mut().push_events([key(KeySymbol::PageDown), text("-")]);
    assert_eq!(platform.poll_event(false)?, Some(RogueEvent::keystroke('-' as i32)));
    assert_eq!(platform.font_size(), 1);
    assert_eq!(platform.source().font_loads, vec![1]);
    Ok(())
}

#[test]
fn zoom_characters_resize_and_are_still_delivered() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().push_event(text("="));
    assert_eq!(platform.poll_event(false)?, Some(RogueEvent::keystroke('=' as i32)));
    assert_eq!(platform.font_size(), 6);

    platform.driver_mut().push_event(text("-"));
    assert_eq!(platform.poll_event(false)?, Some(RogueEvent::keystroke('-' as i32)));
    assert_eq!(platform.font_size(), 5);

    // During text entry the same characters are just text.
    platform.driver_mut().push_event(text("="));
    assert_eq!(platform.poll_event(true)?, Some(RogueEvent::keystroke('=' as i32)));
    assert_eq!(platform.font_size(), 5);
    Ok(())
}

#[test]
fn left_click_maps_through_padding_to_a_cell() -> Result<()> {
    let mut platform = headless_platform(5)?;
    // A window 20px larger than the 1100x646 grid in each direction keeps
    // font 5 and centers the grid with 10px of padding.
    platform.driver_mut().user_resize(1120, 666);
    assert_eq!(platform.poll_event(false)?, None);
    assert_eq!(platform.font_size(), 5);
    assert_eq!(platform.window_padding(), (10, 10));

    let (pad_x, pad_y) = platform.window_padding();
    let (cell_w, cell_h) = (11, 19);
    platform.driver_mut().push_event(RawEvent::MouseButton {
        button: MouseButton::Left,
        pressed: true,
        x: pad_x + 2 * cell_w + 3,
        y: pad_y + cell_h + 1,
    });
    let event = platform.poll_event(false)?;
    assert_eq!(event, Some(RogueEvent::mouse(EventKind::MouseDown, 2, 1)));
    Ok(())
}

#[test]
fn identical_clicks_give_identical_cells() -> Result<()> {
    let mut platform = headless_platform(4)?;
    let click = RawEvent::MouseButton {
        button: MouseButton::Right,
        pressed: false,
        x: 333,
        y: 222,
    };
    platform.driver_mut().push_events([click.clone(), click]);
    let first = platform.poll_event(false)?;
    let second = platform.poll_event(false)?;
    assert_eq!(first, second);
    assert_eq!(first.map(|event| event.kind), Some(EventKind::RightMouseUp));
    Ok(())
}

#[test]
fn os_resize_refits_without_resizing_the_window() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.take_redraw_request();
    platform.driver_mut().user_resize(1300, 800);
    assert_eq!(platform.poll_event(false)?, None);
    // 1300/100 = 13px and 800/34 = 23px allow font 7 (13x23 cells).
    assert_eq!(platform.font_size(), 7);
    assert_eq!(platform.driver().window_size(), (1300, 800));
    assert_eq!(platform.driver().window_ops().len(), 1);
    assert!(platform.take_redraw_request());
    Ok(())
}

#[test]
fn quit_wins_over_later_events_and_sets_the_flag() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform
        .driver_mut()
        .push_events([RawEvent::MouseMotion { x: 500, y: 300 }, RawEvent::Quit, text("a")]);
    let event = platform.poll_event(false)?;
    assert_eq!(event, Some(RogueEvent::keystroke(key_codes::ESCAPE_KEY)));
    assert!(platform.quit_requested());
    assert_eq!(platform.driver().pending_events(), 1);
    Ok(())
}

#[test]
fn quit_during_a_blocking_wait_returns_escape() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().push_event(RawEvent::Quit);
    let event = platform.wait_for_event(false, None)?;
    assert_eq!(event.kind, EventKind::Keystroke);
    assert_eq!(event.param1, key_codes::ESCAPE_KEY);
    assert!(platform.quit_requested());
    Ok(())
}

#[test]
fn modifiers_are_attached_to_every_event() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().set_modifiers(Modifiers::SHIFT | Modifiers::CONTROL);
    platform.driver_mut().push_events([
        key(KeySymbol::Keypad4),
        RawEvent::MouseMotion { x: 200, y: 200 },
    ]);

    let keypad = platform.poll_event(false)?;
    assert_eq!(
        keypad,
        Some(RogueEvent::keystroke(key_codes::numpad(4)).with_modifiers(true, true))
    );
    let motion = platform.poll_event(false)?;
    assert_eq!(motion.map(|event| (event.shift_key, event.control_key)), Some((true, true)));
    assert!(platform.modifier_held(Modifier::Shift));
    assert!(platform.modifier_held(Modifier::Control));
    Ok(())
}

#[test]
fn unmodified_keypad_digits_are_left_to_text_input() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().push_events([key(KeySymbol::Keypad8), text("8")]);
    assert_eq!(platform.poll_event(false)?, Some(RogueEvent::keystroke('8' as i32)));
    assert_eq!(platform.driver().pending_events(), 0);
    Ok(())
}

#[test]
fn motion_bursts_collapse_to_the_last_new_cell() -> Result<()> {
    let mut platform = headless_platform(5)?;
    // Cells are 11x19 with no padding.
    platform.driver_mut().push_events([
        RawEvent::MouseMotion { x: 12, y: 1 },
        RawEvent::MouseMotion { x: 13, y: 2 },
        RawEvent::MouseMotion { x: 34, y: 40 },
    ]);
    assert_eq!(
        platform.poll_event(false)?,
        Some(RogueEvent::mouse(EventKind::MouseEnteredCell, 3, 2))
    );

    platform.driver_mut().push_events([
        RawEvent::MouseMotion { x: 35, y: 41 },
        RawEvent::MouseMotion { x: 40, y: 50 },
    ]);
    assert_eq!(platform.poll_event(false)?, None);
    Ok(())
}

#[test]
fn fullscreen_keys_toggle_and_refresh() -> Result<()> {
    let mut platform = Platform::new(
        HeadlessDriver::with_usable_area(1920, 1080),
        MemoryAtlasSource::default(),
        &config_with_font(Some(5)),
    )?;
    platform.take_redraw_request();

    platform.driver_mut().push_event(key(KeySymbol::F11));
    assert_eq!(platform.poll_event(false)?, None);
    assert!(platform.driver().is_fullscreen());
    assert!(platform.take_redraw_request());
    // The mode switch arrives as a resize on the next poll and refits:
    // 1920x1080 holds 17x31 cells (font 11) but not 18x33.
    assert_eq!(platform.poll_event(false)?, None);
    assert_eq!(platform.font_size(), 11);

    platform.driver_mut().set_modifiers(Modifiers::ALT);
    platform.driver_mut().push_event(key(KeySymbol::Enter));
    let event = platform.poll_event(false)?;
    assert_eq!(event.map(|event| event.param1), Some(key_codes::RETURN_KEY));
    assert!(!platform.driver().is_fullscreen());
    Ok(())
}

#[test]
fn wait_short_buffers_the_event_for_the_next_wait() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().push_events([text("k"), text("j")]);

    assert!(platform.wait_short(10)?);
    assert!(platform.has_buffered_event());
    let polls = platform.driver().polls();

    let event = platform.wait_for_event(false, None)?;
    assert_eq!(event, RogueEvent::keystroke('k' as i32));
    assert_eq!(platform.driver().polls(), polls);
    assert!(!platform.has_buffered_event());

    assert_eq!(platform.wait_for_event(false, None)?, RogueEvent::keystroke('j' as i32));
    Ok(())
}

#[test]
fn wait_short_does_not_poll_over_a_full_slot() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().push_events([text("a"), text("b")]);
    assert!(platform.wait_short(1)?);
    assert!(platform.wait_short(1)?);
    assert_eq!(platform.driver().pending_events(), 1);
    assert_eq!(platform.wait_for_event(false, None)?, RogueEvent::keystroke('a' as i32));
    Ok(())
}

#[test]
fn wait_short_never_buffers_motion() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().push_event(RawEvent::MouseMotion { x: 100, y: 100 });
    assert!(!platform.wait_short(5)?);
    assert!(!platform.has_buffered_event());
    assert_eq!(platform.driver().ticks_ms(), 5);
    Ok(())
}

#[test]
fn blocking_wait_paces_idle_ticks_and_animates() -> Result<()> {
    let mut platform = headless_platform(5)?;
    let mut ticks = 0;
    let mut animate = |platform: &mut TestPlatform| {
        ticks += 1;
        if ticks == 3 {
            platform.driver_mut().push_event(text("x"));
        }
    };
    let event = platform.wait_for_event(false, Some(&mut animate as &mut dyn FnMut(&mut TestPlatform)))?;
    assert_eq!(event, RogueEvent::keystroke('x' as i32));
    assert_eq!(ticks, 3);
    // Two idle ticks slept out their 36ms budget.
    assert_eq!(platform.driver().ticks_ms(), 72);
    Ok(())
}

#[test]
fn shifted_keypad_digit_fires_once() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().set_modifiers(Modifiers::SHIFT);
    platform.driver_mut().push_event(key(KeySymbol::Keypad1));
    let event = platform.poll_event(false)?;
    assert_eq!(event, Some(RogueEvent::keystroke(key_codes::numpad(1)).with_modifiers(true, false)));
    assert_eq!(platform.poll_event(false)?, None);
    Ok(())
}

#[test]
fn motion_seen_by_wait_short_is_reported_later() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.driver_mut().push_event(RawEvent::MouseMotion { x: 34, y: 40 });
    assert!(!platform.wait_short(1)?);

    // Still cell (3, 2), which the game has not been told about yet.
    platform.driver_mut().push_event(RawEvent::MouseMotion { x: 35, y: 41 });
    assert_eq!(
        platform.poll_event(false)?,
        Some(RogueEvent::mouse(EventKind::MouseEnteredCell, 3, 2))
    );
    Ok(())
}

#[test]
fn zoom_during_a_blocking_wait_redraws_before_the_next_input() -> Result<()> {
    let mut platform = headless_platform(5)?;
    let redraws = Rc::new(Cell::new(0));
    let hook_redraws = Rc::clone(&redraws);
    platform.set_redraw_hook(Box::new(move |platform: &mut TestPlatform| {
        hook_redraws.set(hook_redraws.get() + 1);
        platform.plot_char('@', 0, 0, Color::new(100, 100, 100), Color::new(0, 0, 100));
    }));

    let mut ticks = 0;
    let mut redraws_before_input = None;
    let mut animate = |platform: &mut TestPlatform| {
        ticks += 1;
        match ticks {
            1 => platform.driver_mut().push_event(key(KeySymbol::PageUp)),
            3 => {
                redraws_before_input = Some(redraws.get());
                platform.driver_mut().push_event(text("x"));
            }
            _ => {}
        }
    };
    let event = platform.wait_for_event(false, Some(&mut animate as &mut dyn FnMut(&mut TestPlatform)))?;

    assert_eq!(event, RogueEvent::keystroke('x' as i32));
    assert_eq!(platform.font_size(), 6);
    assert_eq!(redraws_before_input, Some(1));
    assert!(!platform.take_redraw_request());
    // The repaint landed on the freshly cleared surface.
    let surface = platform.driver_mut().surface_mut();
    assert_eq!(surface.pixel(0, 0).map(unpack_rgb), Some((255, 255, 255)));
    Ok(())
}

#[test]
fn remaps_into_non_ascii_yield_nothing() -> Result<()> {
    let mut platform = headless_platform(5)?;
    platform.remap("a", "\u{00E9}");
    platform.driver_mut().push_event(text("a"));
    assert_eq!(platform.poll_event(false)?, None);
    Ok(())
}

#[test]
fn plot_char_draws_through_the_console() -> Result<()> {
    let mut platform = headless_platform(1)?;
    // Font 1 cells are 7x11; the synthetic atlas is opaque white on the
    // left 3 columns of each cell.
    Console::plot_char(&mut platform, '@', 2, 1, Color::new(100, 0, 0), Color::new(0, 0, 100));
    let surface = platform.driver_mut().surface_mut();
    assert_eq!(surface.pixel(14, 11).map(unpack_rgb), Some((255, 0, 0)));
    assert_eq!(surface.pixel(18, 11).map(unpack_rgb), Some((0, 0, 255)));
    assert_eq!(surface.pixel(21, 11).map(unpack_rgb), Some((0, 0, 0)));
    Ok(())
}

#[test]
fn console_remap_and_notify() -> Result<()> {
    let mut platform = headless_platform(2)?;
    Console::remap(&mut platform, "a", "x");
    Console::remap(&mut platform, "a", "y");
    platform.notify_event(1, 2, 3, "four", "five");
    platform.driver_mut().push_event(text("a"));
    assert_eq!(
        Console::next_key_or_mouse_event(&mut platform, false, None)?,
        RogueEvent::keystroke('x' as i32)
    );
    Ok(())
}
