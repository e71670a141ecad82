use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Command, CommandFactory};
use clap_complete::{generate, Generator};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands};
use crate::display::{data_path, ForestConvert};
use crate::item::{NodeId, ParentRef, Row};
use crate::store::TreeStore;

pub fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Tree { rows_file }) => _tree(rows_file),
        Some(Commands::Children {
            rows_file,
            id,
            recursive,
        }) => _children(rows_file, id, *recursive),
        Some(Commands::Parents { rows_file, id }) => _parents(rows_file, id),
        Some(Commands::Path { rows_file, id }) => _path(rows_file, id),
        Some(Commands::Prune { rows_file, id }) => _prune(rows_file, id),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

/// Loads a JSON rows file and indexes it. Duplicate ids in the file abort
/// with the store's error.
#[instrument]
fn load_store(rows_file: &Path) -> Result<TreeStore<Row>> {
    let content = fs::read_to_string(rows_file)
        .with_context(|| format!("Cannot read rows file: {}", rows_file.display()))?;
    let rows: Vec<Row> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid rows JSON: {}", rows_file.display()))?;
    debug!("loaded {} rows", rows.len());

    let store = TreeStore::new(rows)
        .with_context(|| format!("Cannot index rows file: {}", rows_file.display()))?;
    Ok(store)
}

#[instrument]
fn _tree(rows_file: &Path) -> Result<()> {
    let store = load_store(rows_file)?;
    print_forest(&store);
    Ok(())
}

#[instrument]
fn _children(rows_file: &Path, id: &NodeId, recursive: bool) -> Result<()> {
    let store = load_store(rows_file)?;
    let parent = ParentRef::Node(id.clone());
    let children = if recursive {
        store.get_all_children(&parent)
    } else {
        store.get_children(&parent)
    };

    for child in children.into_iter().sorted_by(|a, b| a.id.cmp(&b.id)) {
        println!("{}", child);
    }
    Ok(())
}

#[instrument]
fn _parents(rows_file: &Path, id: &NodeId) -> Result<()> {
    let store = load_store(rows_file)?;
    let chain = store.get_all_parents(id);
    if chain.is_empty() {
        debug!("id {} not present, empty chain", id);
        return Ok(());
    }

    println!("{}", chain.iter().map(|item| item.to_string()).join(" <- "));
    Ok(())
}

#[instrument]
fn _path(rows_file: &Path, id: &NodeId) -> Result<()> {
    let store = load_store(rows_file)?;
    println!("{}", data_path(&store, id).join("/"));
    Ok(())
}

#[instrument]
fn _prune(rows_file: &Path, id: &NodeId) -> Result<()> {
    let mut store = load_store(rows_file)?;
    store
        .remove_item(id)
        .with_context(|| format!("Cannot prune {}", id))?;
    print_forest(&store);
    Ok(())
}

fn _completion(shell: clap_complete::Shell) -> Result<()> {
    let mut cmd = Cli::command();
    print_completions(shell, &mut cmd);
    Ok(())
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn print_forest(store: &TreeStore<Row>) {
    for tree in store.to_tree_strings() {
        println!("{}", tree);
    }
}
