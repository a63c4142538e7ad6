//! Unit Tests for Catalog Scanning

#[path = "../test_utils/mod.rs"]
mod test_utils;

use scriptdeck::catalog::all_entries;
use scriptdeck::{AuditLog, ScriptCatalog};
use std::fs;
use std::sync::Arc;
use test_utils::ScriptTree;

fn catalog(tree: &ScriptTree, extension: &str) -> ScriptCatalog {
    ScriptCatalog::new(extension, Arc::new(AuditLog::open(tree.logs_dir())))
}

#[test]
fn test_categories_without_scripts_are_omitted() {
    let tree = ScriptTree::new();
    tree.category("Empty");
    tree.script("OnlyText", "readme.txt", "n/a");
    tree.script("Real", "go.sh", "true");

    let categories = catalog(&tree, "sh").scan(&tree.scripts_dir());
    let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Real"]);
}

#[test]
fn test_only_direct_children_are_listed() {
    let tree = ScriptTree::new();
    tree.script("Top", "direct.sh", "true");
    let nested = tree.category("Top").join("deeper");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("hidden.sh"), "true").unwrap();
    fs::write(tree.scripts_dir().join("loose.sh"), "true").unwrap();

    let categories = catalog(&tree, "sh").scan(&tree.scripts_dir());
    let entries: Vec<_> = all_entries(&categories).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].display_name, "direct");
    assert_eq!(entries[0].category, "Top");
}

#[test]
fn test_entry_fields() {
    let tree = ScriptTree::new();
    let path = tree.script("Privacy", "disable-telemetry.ps1", "");
    tree.script("Privacy", "disable-telemetry-undo.ps1", "");

    let categories = catalog(&tree, "ps1").scan(&tree.scripts_dir());
    let entry = all_entries(&categories)
        .find(|e| e.display_name == "disable-telemetry")
        .unwrap();
    assert_eq!(entry.path, path);
    assert!(entry.path.is_absolute());
    assert!(entry.has_undo);
    assert_eq!(entry.id(), path.as_path());
}

#[test]
fn test_configured_extension_filters() {
    let tree = ScriptTree::new();
    tree.script("Mixed", "a.sh", "true");
    tree.script("Mixed", "b.ps1", "");
    tree.script("Mixed", "c.PS1", "");

    let ps = catalog(&tree, "ps1").scan(&tree.scripts_dir());
    assert_eq!(ps[0].len(), 2);

    let dotted = catalog(&tree, ".sh");
    assert_eq!(dotted.extension(), "sh");
    assert_eq!(dotted.scan(&tree.scripts_dir())[0].len(), 1);
}

#[test]
fn test_has_undo_reflects_scan_time() {
    let tree = ScriptTree::new();
    let script = tree.script("T", "x.sh", "true");
    let catalog = catalog(&tree, "sh");

    let before = catalog.scan(&tree.scripts_dir());
    assert!(!all_entries(&before).next().unwrap().has_undo);

    fs::write(script.with_file_name("x.undo.sh"), "true").unwrap();
    // The earlier snapshot is not updated
    assert!(!all_entries(&before).next().unwrap().has_undo);

    let after = catalog.scan(&tree.scripts_dir());
    let x = all_entries(&after).find(|e| e.display_name == "x").unwrap();
    assert!(x.has_undo);
}

#[test]
fn test_missing_root_is_created() {
    let tree = ScriptTree::new();
    let root = tree.root().join("fresh").join("scripts");

    assert!(catalog(&tree, "sh").scan(&root).is_empty());
    assert!(root.is_dir());
}
