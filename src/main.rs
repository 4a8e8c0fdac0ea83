mod app;
mod config;
mod framebuffer;
mod grid;
mod input;
mod logging;
mod maze;
mod model;
mod movement;
mod render;
mod sim;
mod term;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = config::Args::parse();
    app::run(args)
}
