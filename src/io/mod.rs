use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use phylotree::tree::Tree as PhyloTree;

use crate::tree::{NodeSpec, Tree, TreeNode};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TreeFileFormat {
    /// Nested `{ "name": .., "children": [..] }` objects.
    Json,
    Newick,
}

pub fn load_tree(path: &Path) -> Result<Tree> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read tree file: {}", path.display()))?;

    let format = detect_format(&raw);
    debug!("Reading {} as {:?}", path.display(), format);
    let tree = match format {
        TreeFileFormat::Json => parse_json(&raw)?,
        TreeFileFormat::Newick => parse_newick(&raw)?,
    };

    let label = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned());
    Ok(match label {
        Some(label) => tree.with_label(label),
        None => tree,
    })
}

fn detect_format(raw: &str) -> TreeFileFormat {
    let first = raw.trim_start().chars().next();
    if matches!(first, Some('{')) {
        TreeFileFormat::Json
    } else {
        TreeFileFormat::Newick
    }
}

fn parse_json(raw: &str) -> Result<Tree> {
    let spec: NodeSpec =
        serde_json::from_str(raw).context("failed to parse JSON tree definition")?;
    Ok(Tree::from_spec(&spec))
}

fn parse_newick(raw: &str) -> Result<Tree> {
    let mut chunks = raw
        .split_inclusive(';')
        .map(str::trim)
        .filter(|chunk| chunk.ends_with(';'));

    let first = chunks
        .next()
        .ok_or_else(|| anyhow!("tree file did not contain any trees"))?;
    let extra = chunks.count();
    if extra > 0 {
        warn!("Ignoring {} additional tree(s) after the first", extra);
    }

    let phylo = PhyloTree::from_newick(first)
        .map_err(|err| anyhow!("failed to parse newick tree: {err}"))?;
    tree_from_phylo(&phylo)
}

fn tree_from_phylo(phylo: &PhyloTree) -> Result<Tree> {
    let root = phylo
        .get_root()
        .map_err(|err| anyhow!("newick tree has no root: {err}"))?;

    let mut nodes = Vec::with_capacity(phylo.size());
    for idx in 0..phylo.size() {
        let node = phylo
            .get(&idx)
            .map_err(|err| anyhow!("newick node {idx} is missing: {err}"))?;
        let mut tree_node = TreeNode::new(node.id, node.name.clone().unwrap_or_default());
        tree_node.parent = node.parent;
        tree_node.children = node.children.clone();
        nodes.push(tree_node);
    }

    if nodes.is_empty() {
        bail!("newick tree has no nodes");
    }
    Ok(Tree::from_parts(None, Some(root), nodes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_correctly() {
        assert_eq!(detect_format("  {\"name\": \"a\"}"), TreeFileFormat::Json);
        assert_eq!(detect_format("(A,B)C;"), TreeFileFormat::Newick);
        assert_eq!(detect_format("\n(A:0.1,B:0.2);"), TreeFileFormat::Newick);
    }

    #[test]
    fn parses_nested_json() {
        let input = r#"{
            "name": "Main",
            "children": [
                { "name": "Left", "children": [{ "name": "L1" }, { "name": "L2" }] },
                { "name": "Right" }
            ]
        }"#;
        let tree = parse_json(input).unwrap();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.root().map(|n| n.name.as_str()), Some("Main"));
        assert!(tree.preorder().is_ok());
    }

    #[test]
    fn rejects_json_without_name() {
        assert!(parse_json(r#"{ "children": [] }"#).is_err());
    }

    #[test]
    fn parses_simple_newick() {
        let tree = parse_newick("((A,B)AB,C)root;").unwrap();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.root().map(|n| n.name.as_str()), Some("root"));
        let names: Vec<&str> = tree
            .preorder()
            .unwrap()
            .iter()
            .map(|visit| tree.nodes[visit.id].name.as_str())
            .collect();
        assert_eq!(names, vec!["root", "AB", "A", "B", "C"]);
    }

    #[test]
    fn newick_uses_first_tree_only() {
        let tree = parse_newick("(A,B);\n(C,D,E);\n").unwrap();
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn newick_without_trees_fails() {
        assert!(parse_newick("   ").is_err());
    }

    #[test]
    fn load_tree_labels_with_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.json");
        fs::write(&path, r#"{"name":"root","children":[{"name":"a"}]}"#).unwrap();
        let tree = load_tree(&path).unwrap();
        assert_eq!(tree.label.as_deref(), Some("agents"));
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn load_tree_reports_missing_file() {
        let err = load_tree(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read tree file"));
    }
}
