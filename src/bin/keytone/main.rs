//! keytone - terminal keyboard instrument
//!
//! Run with: cargo run
//! Type to play. Tab cycles the scale, arrows shift the octave, Esc quits.

mod app;
mod ui;

use app::Keytone;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init()?;

    Keytone::new().settings_file("keytone.toml").run()
}
