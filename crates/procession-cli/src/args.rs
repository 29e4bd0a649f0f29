//! Command-line argument definitions for the Procession CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity, and drag gestures to replay before the
//! layout is written.

use std::str::FromStr;

use clap::Parser;

use procession::identifier::EdgeId;

/// Command-line arguments for the Procession layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON document
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output layout JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Drag a marker vertically before writing, e.g. `iml-1-10=40`
    #[arg(long = "drag", value_name = "EDGE=DELTA")]
    pub drags: Vec<DragSpec>,
}

/// A drag gesture replayed from the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSpec {
    pub edge: EdgeId,
    pub delta: f32,
}

impl FromStr for DragSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (edge, delta) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected EDGE=DELTA, got `{s}`"))?;
        let edge = edge.trim().parse().map_err(|err| format!("{err}"))?;
        let delta = delta
            .trim()
            .parse::<f32>()
            .map_err(|err| format!("invalid delta `{delta}`: {err}"))?;
        if !delta.is_finite() {
            return Err(format!("delta must be finite, got `{delta}`"));
        }
        Ok(Self { edge, delta })
    }
}
