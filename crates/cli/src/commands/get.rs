//! Get command implementation.
//!
//! Responsibilities:
//! - Resolve one key through the assembled chain and print it to stdout.
//! - Render cast results in a stable text form: scalars as-is, sequences and
//!   documents as compact JSON.
//!
//! Does NOT handle:
//! - Chain assembly (see `chain_context`).

use anyhow::{Context, Result};
use confchain::{Configuration, casts};

use crate::args::{CastKind, GetArgs};
use crate::chain_context::build_configuration;

pub fn run(args: GetArgs) -> Result<()> {
    let config = build_configuration(&args.chain)?;
    let value = render(&config, &args.key, args.cast, args.default.as_deref())
        .with_context(|| format!("Failed to resolve '{}'", args.key))?;
    println!("{}", value);
    Ok(())
}

/// Resolve `key` with the cast named by `kind` and format the result.
pub(crate) fn render(
    config: &Configuration,
    key: &str,
    kind: CastKind,
    default: Option<&str>,
) -> Result<String> {
    let rendered = match kind {
        CastKind::Raw => config.resolve(key, casts::raw, None, default)?,
        CastKind::Bool => config
            .resolve(key, casts::boolean, None, default)?
            .to_string(),
        CastKind::Int => config
            .resolve(key, casts::parsed::<i64>, None, default)?
            .to_string(),
        CastKind::Float => config
            .resolve(key, casts::parsed::<f64>, None, default)?
            .to_string(),
        CastKind::List => serde_json::to_string(&config.resolve(key, casts::list, None, default)?)?,
        CastKind::Tuple => {
            serde_json::to_string(&config.resolve(key, casts::tuple, None, default)?)?
        }
        CastKind::Json => config
            .resolve(key, casts::json::<serde_json::Value>, None, default)?
            .to_string(),
        CastKind::Eval => serde_json::to_string(&config.resolve(key, casts::eval, None, default)?)?,
    };
    Ok(rendered)
}
