use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result, WrapErr};
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod run;

const USAGE: &str = "usage: chip8vm <rom> [cycles] [held keys]";

fn main() -> Result<()> {
    color_eyre::install()?;
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    let mut args = std::env::args().skip(1);
    let rom = args.next().map(PathBuf::from).ok_or_else(|| eyre!(USAGE))?;
    let cycles = match args.next() {
        Some(cycles) => Some(
            cycles
                .parse::<usize>()
                .wrap_err_with(|| format!("invalid cycle count {:?}", cycles))?,
        ),
        None => None,
    };
    let held_keys = args.next().unwrap_or_default();

    run::run(run::Options {
        rom,
        cycles,
        held_keys,
    })
}
