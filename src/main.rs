//! Pagefold - convert HTML sites between shared-fragment partials and
//! fully static pages, normalizing links on the way.

mod batch;
mod cli;
mod config;
mod fragment;
mod logger;
mod markup;
mod page;
mod process;
mod site;
mod transform;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use process::process_site;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;
    process_site(&cli, &config)?;
    Ok(())
}
