//! holo_globe: interactive entry point.

use std::io::{self, Write};

use holo_globe::app::{parse_viewport, run, AppConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Holo Globe — Two-Hand Gesture Controller            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse/keyboard simulation  (use --features leap for hardware)");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = if args.is_empty() {
        configure_interactively()
    } else {
        match AppConfig::from_args(&args) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                eprintln!("Usage: holo_globe [--quick] [--viewport WxH] [--camera-fps N]");
                std::process::exit(2);
            }
        }
    };

    println!();
    println!(
        "  Opening {}x{} visualizer window…",
        cfg.viewport.width, cfg.viewport.height
    );
    println!("  Left hand orbits and zooms the globe; right-hand pinch drags the panel.");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.viewport = loop {
        let line = read_line("  Window size WxH (default 1280x720): ");
        if line.trim().is_empty() {
            break cfg.viewport;
        }
        match parse_viewport(&line) {
            Ok(v) => break v,
            Err(e) => println!("    ⚠  {:#}", e),
        }
    };
    cfg
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
