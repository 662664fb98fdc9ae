use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::SearchMode;

/// Enumerate distinct ways to craft an item from base elements.
#[derive(Clone, Parser)]
#[command(name = "craftsearch")]
#[command(about = "Search a crafting catalog for distinct recipe trees, streamed as they are found.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Find up to COUNT distinct build trees for TARGET.
    Search {
        #[command(flatten)]
        common: CommonArgs,

        /// Item to build.
        #[arg(value_name = "TARGET")]
        target: String,

        /// Traversal order for each worker.
        #[arg(long, short = 'm', value_enum)]
        method: Option<SearchMode>,

        /// Maximum number of distinct trees.
        #[arg(long, short = 'n', value_parser = clap::value_parser!(usize))]
        count: Option<usize>,

        /// Pause between streamed results, in milliseconds.
        #[arg(long, short = 'd', value_parser = clap::value_parser!(u64))]
        delay: Option<u64>,

        /// Worker thread count. Default: available parallelism.
        #[arg(long, short = 't', value_parser = clap::value_parser!(usize))]
        threads: Option<usize>,

        /// Print stream messages as JSON lines.
        #[arg(long, short = 'j', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
        json: Option<bool>,
    },

    /// List items grouped by tier.
    Tiers {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Show one item: tier, recipes, and what it is used in.
    Element {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(value_name = "NAME")]
        name: String,
    },
}

/// Flags shared by every subcommand.
#[derive(Clone, Args)]
pub struct CommonArgs {
    /// Catalog JSON file. Default: CRAFTSEARCH_CATALOG, `.env`, or data/elements.json.
    #[arg(long, short = 'c')]
    pub catalog: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Search { common, .. }
            | Commands::Tiers { common }
            | Commands::Element { common, .. } => common,
        }
    }
}
