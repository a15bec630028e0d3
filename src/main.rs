//! Stealth Sim CLI - plan inspection entry point
//!
//! Builds an engine from a JSON settings file (or defaults) and prints
//! sample plans without touching a browser.

use std::time::Duration;

use chrono::Utc;
use stealth_sim::config::StealthSettings;
use stealth_sim::stealth::{KeystrokeKind, MotionKind, Point};
use stealth_sim::StealthEngine;

fn main() {
    println!("Stealth Sim - Human Behavior Planner");
    println!("====================================");
    println!();

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match StealthSettings::from_json(&json) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Invalid settings in {path}: {e}");
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Failed to read {path}: {e}");
                std::process::exit(1);
            }
        },
        None => StealthSettings::default(),
    };

    let mut engine = match StealthEngine::new(settings) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid settings: {e}");
            std::process::exit(1);
        }
    };

    let path = engine.generate_path(Point::new(0.0, 0.0), Point::new(640.0, 360.0));
    let corrections = path
        .iter()
        .filter(|s| s.kind == MotionKind::MicroCorrection)
        .count();
    let overshoot = path.iter().any(|s| s.kind == MotionKind::Overshoot);
    println!("Pointer path (0,0) -> (640,360):");
    println!("  - Steps: {}", path.len());
    println!("  - Micro-corrections: {corrections}");
    println!("  - Overshoot: {overshoot}");
    println!("  - Duration: {:?}", total(path.iter().map(|s| s.delay)));
    println!();

    let text = "Hi there, great to connect!";
    let keys = engine.generate_keystrokes(text);
    let typos = keys.iter().filter(|k| k.kind == KeystrokeKind::Typo).count();
    println!("Typing {text:?}:");
    println!("  - Events: {}", keys.len());
    println!("  - Typos corrected: {typos}");
    println!("  - Duration: {:?}", total(keys.iter().map(|k| k.total_wait())));
    println!();

    let scroll = engine.generate_scroll_plan(1200.0);
    let backs = scroll.iter().filter(|s| s.back_scroll.is_some()).count();
    let pauses = scroll.iter().filter(|s| s.pause.is_some()).count();
    println!("Scrolling 1200 down:");
    println!("  - Chunks: {}", scroll.len());
    println!("  - Reading pauses: {pauses}");
    println!("  - Back-scrolls: {backs}");
    println!();

    let now = Utc::now();
    println!("Schedule:");
    println!("  - In window now: {}", engine.is_in_window(&now));
    println!("  - Next window start: {}", engine.next_window_start(&now));
    println!("  - Think time: {:?}", engine.think_time());
    println!("  - Reading time (250 words): {:?}", engine.reading_time(250));
    match engine.plan_break() {
        Some(duration) => println!("  - Break: {} min", duration.as_secs() / 60),
        None => println!("  - Break: none"),
    }
}

fn total(delays: impl Iterator<Item = Duration>) -> Duration {
    delays.sum()
}
