//! CLI argument definitions using clap

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::item::NodeId;

/// Inspect hierarchical grid data: forests, children, ancestor paths
#[derive(Parser, Debug)]
#[command(name = "treestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-d, -d -d, -d -d -d)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the whole forest
    Tree {
        /// JSON rows file: array of {id, parent, ...} objects
        #[arg(value_hint = ValueHint::FilePath)]
        rows_file: PathBuf,
    },

    /// List children of an item
    Children {
        /// JSON rows file
        #[arg(value_hint = ValueHint::FilePath)]
        rows_file: PathBuf,
        /// Item id (integer or text token)
        #[arg(value_parser = NodeId::from_str)]
        id: NodeId,
        /// Include transitive descendants
        #[arg(short, long)]
        recursive: bool,
    },

    /// Show the ancestor chain of an item, item first
    Parents {
        /// JSON rows file
        #[arg(value_hint = ValueHint::FilePath)]
        rows_file: PathBuf,
        /// Item id (integer or text token)
        #[arg(value_parser = NodeId::from_str)]
        id: NodeId,
    },

    /// Show the root-to-leaf data path of an item
    Path {
        /// JSON rows file
        #[arg(value_hint = ValueHint::FilePath)]
        rows_file: PathBuf,
        /// Item id (integer or text token)
        #[arg(value_parser = NodeId::from_str)]
        id: NodeId,
    },

    /// Remove an item and its subtree, then render what remains
    Prune {
        /// JSON rows file
        #[arg(value_hint = ValueHint::FilePath)]
        rows_file: PathBuf,
        /// Item id (integer or text token)
        #[arg(value_parser = NodeId::from_str)]
        id: NodeId,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
