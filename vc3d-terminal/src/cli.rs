//! Command-line interface for the `vc3d` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use crate::renderer::RenderMode;

/// Inspect and view 3D models (OBJ, STL, glTF) in the terminal
#[derive(Parser, Debug)]
#[command(name = "vc3d")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON viewer configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open models in the interactive ASCII viewer
    View {
        /// Model files; a built-in cube is shown when none are given
        files: Vec<PathBuf>,

        /// Initial render mode
        #[arg(short, long, value_enum)]
        mode: Option<RenderMode>,

        /// Size of the largest bounding-box side after normalization
        #[arg(short, long)]
        target_size: Option<f32>,
    },

    /// Print vertex, face and edge counts for each model
    Stats {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit one JSON record per line
        #[arg(long)]
        json: bool,

        /// Normalize each model before measuring
        #[arg(long)]
        normalize: bool,
    },
}

impl Cli {
    /// Log level selected by the `-v` count
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_view_arguments() {
        let cli = Cli::parse_from(["vc3d", "-vv", "view", "a.obj", "b.stl", "--mode", "edges"]);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        match cli.command {
            Commands::View { files, mode, target_size } => {
                assert_eq!(files, vec![PathBuf::from("a.obj"), PathBuf::from("b.stl")]);
                assert_eq!(mode, Some(RenderMode::Edges));
                assert_eq!(target_size, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_stats_requires_files() {
        assert!(Cli::try_parse_from(["vc3d", "stats"]).is_err());

        let cli = Cli::parse_from(["vc3d", "stats", "--json", "part.stl", "--config", "viewer.json"]);
        assert_eq!(cli.log_level(), LevelFilter::Warn);
        assert_eq!(cli.config, Some(PathBuf::from("viewer.json")));
        assert!(matches!(cli.command, Commands::Stats { json: true, normalize: false, .. }));
    }
}
