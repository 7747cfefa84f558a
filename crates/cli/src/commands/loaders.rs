//! Loaders command implementation.
//!
//! Prints the assembled chain, one loader per line, highest precedence first.

use anyhow::Result;

use crate::args::ChainArgs;
use crate::chain_context::build_loaders;

pub fn run(args: &ChainArgs) -> Result<()> {
    let loaders = build_loaders(args)?;
    for (index, loader) in loaders.iter().enumerate() {
        println!("{}. {:?}", index + 1, loader);
    }
    Ok(())
}
