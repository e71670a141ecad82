//! Tests for CLI parsing and command dispatch over a rows file on disk.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;
use treestore::cli::commands::execute_command;
use treestore::cli::{Cli, Commands};
use treestore::NodeId;

#[ctor::ctor]
fn init() {
    treestore::util::testing::init_test_setup();
}

const ROWS_JSON: &str = r#"[
    {"id": 1, "parent": null, "label": "Item 1"},
    {"id": "91064cee", "parent": 1, "label": "Item 2"},
    {"id": 3, "parent": 1, "label": "Item 3"},
    {"id": 4, "parent": "91064cee", "label": "Item 4"}
]"#;

fn rows_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write rows");
    file
}

fn run(command: Commands) -> anyhow::Result<()> {
    execute_command(&Cli {
        debug: 0,
        command: Some(command),
    })
}

#[test]
fn given_rows_file_when_running_tree_then_succeeds() {
    let file = rows_file(ROWS_JSON);
    run(Commands::Tree {
        rows_file: file.path().to_path_buf(),
    })
    .unwrap();
}

#[test]
fn given_rows_file_when_running_children_then_succeeds_for_both_modes() {
    let file = rows_file(ROWS_JSON);
    for recursive in [false, true] {
        run(Commands::Children {
            rows_file: file.path().to_path_buf(),
            id: NodeId::Int(1),
            recursive,
        })
        .unwrap();
    }
}

#[test]
fn given_missing_rows_file_when_running_tree_then_fails() {
    let result = run(Commands::Tree {
        rows_file: PathBuf::from("does/not/exist.json"),
    });
    assert!(result.is_err());
}

#[test]
fn given_malformed_rows_file_when_running_tree_then_fails() {
    let file = rows_file("{not json");
    let result = run(Commands::Tree {
        rows_file: file.path().to_path_buf(),
    });
    assert!(result.is_err());
}

#[test]
fn given_duplicate_ids_in_rows_file_when_running_tree_then_fails() {
    let file = rows_file(r#"[{"id": 1, "parent": null}, {"id": 1, "parent": null}]"#);
    let result = run(Commands::Tree {
        rows_file: file.path().to_path_buf(),
    });

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("already exists"), "got: {}", message);
}

#[test]
fn given_unknown_id_when_running_prune_then_fails() {
    let file = rows_file(ROWS_JSON);
    let result = run(Commands::Prune {
        rows_file: file.path().to_path_buf(),
        id: NodeId::Int(999),
    });

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("does not exist"), "got: {}", message);
}

#[test]
fn given_argv_when_parsing_then_maps_id_tokens_to_node_ids() {
    let cli = Cli::try_parse_from(["treestore", "children", "rows.json", "91064cee", "--recursive"])
        .unwrap();

    match cli.command {
        Some(Commands::Children { id, recursive, .. }) => {
            assert_eq!(id, NodeId::from("91064cee"));
            assert!(recursive);
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let cli = Cli::try_parse_from(["treestore", "parents", "rows.json", "7"]).unwrap();
    match cli.command {
        Some(Commands::Parents { id, .. }) => assert_eq!(id, NodeId::Int(7)),
        other => panic!("unexpected command: {:?}", other),
    }
}
