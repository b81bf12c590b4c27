use phylonode::model::{
    NodeIndex, PruneMethod, Rooting, Selector, StructureError, Tree, TreeError,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn leaf(tree: &Tree, name: &str) -> NodeIndex {
    tree.get_leaves_by_name(tree.root_index(), name)[0]
}

fn node(tree: &Tree, name: &str) -> NodeIndex {
    tree.get_descendants_by_name(tree.root_index(), name)[0]
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Every internal node reachable from `start` has at least two children.
fn assert_no_unary_nodes(tree: &Tree, start: NodeIndex) {
    for node in tree.pre_order_iter(start) {
        assert_ne!(node.num_children(), 1, "node {} is unary", node.index());
    }
}

// --- PRUNE ---
#[test]
fn test_prune_keep_scenario() {
    let mut tree =
        Tree::from_newick("(((A:0.1,B:0.01):0.001,C:0.0001):1.0,(D:0.00001):0.000001);").unwrap();
    let root = tree.root_index();
    let (b, c) = (leaf(&tree, "B"), leaf(&tree, "C"));

    let removed = tree.prune(root, ["A", "D"], PruneMethod::Keep).unwrap();

    assert_eq!(removed, vec![b, c]);
    assert_eq!(tree.get_leaf_names(root), vec!["A", "D"]);
    let a = leaf(&tree, "A");
    assert_eq!(tree[a].parent(), Some(root));
    assert!(tree.is_valid());
}

#[test]
fn test_prune_crop() {
    let mut tree = Tree::from_newick("((A,B)X,(C,D)Y,E);").unwrap();
    let root = tree.root_index();

    tree.prune(root, ["A", "C", "D"], PruneMethod::Crop).unwrap();

    assert_eq!(tree.get_leaf_names(root), vec!["B", "E"]);
    assert_eq!(tree.children(root).len(), 2);
    assert_no_unary_nodes(&tree, root);
    assert!(tree.is_valid());
}

#[test]
fn test_prune_by_node_selectors() {
    let mut tree = Tree::from_newick("((A,B)X,(C,D)Y);").unwrap();
    let root = tree.root_index();
    let (a, c) = (leaf(&tree, "A"), leaf(&tree, "C"));

    let selectors = vec![Selector::from(a), Selector::Name("C".to_string())];
    let removed = tree.prune(root, selectors, PruneMethod::Keep).unwrap();

    assert_eq!(removed.len(), 2);
    assert_eq!(tree.get_leaf_names(root), vec!["A", "C"]);
    assert_eq!(tree.children(root), &[a, c]);
    assert_no_unary_nodes(&tree, root);
}

#[test]
fn test_prune_keep_all_is_noop() {
    let mut tree = Tree::from_newick("((A:1,B:2)X:3,(C:4,D:5)Y:6);").unwrap();
    let root = tree.root_index();
    let before = tree.to_newick();

    let removed = tree
        .prune(root, ["A", "B", "C", "D"], PruneMethod::Keep)
        .unwrap();

    assert!(removed.is_empty());
    assert_eq!(tree.to_newick(), before);
}

#[test]
fn test_prune_rejects_unknown_selectors() {
    let mut tree = Tree::from_newick("((A,B)X,(C,D)Y);").unwrap();
    let root = tree.root_index();
    let x = node(&tree, "X");
    let before = tree.to_newick();

    assert_eq!(
        tree.prune(root, ["A", "Z"], PruneMethod::Keep),
        Err(TreeError::Structure(StructureError::UnknownLeafName(
            "Z".to_string()
        )))
    );
    assert_eq!(
        tree.prune(root, [x], PruneMethod::Keep),
        Err(TreeError::Structure(StructureError::LeavesNotInTree(vec![x])))
    );
    assert_eq!(tree.to_newick(), before);
}

#[test]
fn test_prune_below_internal_node() {
    let mut tree = Tree::from_newick("((A,B,C)X,D);").unwrap();
    let root = tree.root_index();
    let x = node(&tree, "X");

    tree.prune(x, ["B"], PruneMethod::Keep).unwrap();

    // X keeps its place, even with a single child
    assert_eq!(tree.get_leaf_names(root), vec!["B", "D"]);
    assert_eq!(tree.children(x).len(), 1);
    assert!(tree.is_valid());
}

#[test]
fn test_prune_single_node_removes_nothing() {
    let mut tree = Tree::new();
    let root = tree.root_index();

    let removed = tree.prune(root, Vec::<&str>::new(), PruneMethod::Keep).unwrap();
    assert!(removed.is_empty());
    assert_eq!(tree.get_leaves(root), vec![root]);

    // A leaf anchor inside a larger tree stays as well
    let mut tree = Tree::from_newick("(A,B);").unwrap();
    let a = leaf(&tree, "A");
    let removed = tree.prune(a, ["A"], PruneMethod::Crop).unwrap();
    assert!(removed.is_empty());
    assert_eq!(tree.get_leaf_names(tree.root_index()), vec!["A", "B"]);
}

// --- REROOT ---
#[test]
fn test_set_outgroup_leaf_of_cherry() {
    let mut tree = Tree::from_newick("((A:1,B:1):1,(C:1,D:1):1);").unwrap();
    let root = tree.root_index();
    let (a, c, d) = (leaf(&tree, "A"), leaf(&tree, "C"), leaf(&tree, "D"));
    let dist_ad = tree.get_distance(a, d).unwrap();

    tree.set_outgroup(root, c).unwrap();

    assert!(tree.is_valid());
    assert_eq!(tree.children(root).len(), 2);
    assert_eq!(tree.children(root)[0], c);
    assert_eq!(tree[c].dist(), 0.5);
    let partner = tree.children(root)[1];
    assert_eq!(tree[partner].dist(), 0.5);
    assert_eq!(tree.get_leaf_names(partner), vec!["D", "A", "B"]);

    assert_close(tree.get_distance(a, d).unwrap(), dist_ad);
    assert_close(tree.get_distance(c, d).unwrap(), 2.0);
    assert_close(tree.get_distance(c, a).unwrap(), 4.0);
}

#[test]
fn test_set_outgroup_deep_node_preserves_path_lengths() {
    let mut tree =
        Tree::from_newick("(((A:1,B:2)X:3,C:4)Y:5,(D:6,E:7)Z:8);").unwrap();
    let root = tree.root_index();
    let names = ["A", "B", "C", "D", "E"];
    let leaves: Vec<NodeIndex> = names.iter().map(|n| leaf(&tree, n)).collect();

    // The two root edges merge into one, so leaf distances are unchanged
    let mut before = Vec::new();
    for &u in &leaves {
        for &v in &leaves {
            before.push(tree.get_distance(u, v).unwrap());
        }
    }

    let a = leaves[0];
    tree.set_outgroup(root, a).unwrap();

    assert!(tree.is_valid());
    assert_eq!(tree.children(root)[0], a);
    assert_eq!(tree[a].dist(), 0.5);
    let mut after = Vec::new();
    for &u in &leaves {
        for &v in &leaves {
            after.push(tree.get_distance(u, v).unwrap());
        }
    }
    for (x, y) in before.iter().zip(&after) {
        assert_close(*x, *y);
    }

    // Connector took the old root edge lengths
    let z = node(&tree, "Z");
    let y = node(&tree, "Y");
    assert_eq!(tree[z].parent(), Some(y));
    assert_eq!(tree[z].dist(), 13.0);
}

#[test]
fn test_set_outgroup_multifurcating_root() {
    let mut tree = Tree::from_newick("((A:1,B:1)X:2,C:3,D:4);").unwrap();
    let root = tree.root_index();
    let x = node(&tree, "X");
    let (c, d) = (leaf(&tree, "C"), leaf(&tree, "D"));

    tree.set_outgroup(root, x).unwrap();

    assert!(tree.is_valid());
    assert_eq!(tree.children(root)[0], x);
    let connector = tree.children(root)[1];
    assert_eq!(tree.children(connector), &[c, d]);
    // X's branch of 2 is split with the zero-length connector
    assert_eq!(tree[x].dist(), 1.0);
    assert_eq!(tree[connector].dist(), 1.0);
    assert_close(tree.get_distance(c, d).unwrap(), 7.0);
    assert_close(tree.get_distance(c, x).unwrap(), 5.0);
}

#[test]
fn test_set_outgroup_moves_support() {
    let mut tree = Tree::from_newick("(((A,B)0.7,C)0.9,D);").unwrap();
    let root = tree.root_index();
    let a = leaf(&tree, "A");
    let y = tree.children(root)[0];

    tree.set_outgroup(root, a).unwrap();

    // Y now hangs below X and carries X's former support
    let x = tree[y].parent().unwrap();
    assert_eq!(tree[x].parent(), Some(root));
    assert_eq!(tree[y].support(), 0.7);
    // D took over the old root edge of Y, support included
    let d = leaf(&tree, "D");
    assert_eq!(tree[d].parent(), Some(y));
    assert_eq!(tree[d].support(), 0.9);
    assert!(tree.is_valid());
}

#[test]
fn test_set_outgroup_connector_keeps_branch_support() {
    let mut tree = Tree::from_newick("((A:1,B:1)0.7:1,C:1,D:1);").unwrap();
    let root = tree.root_index();
    let a = leaf(&tree, "A");

    tree.set_outgroup(root, a).unwrap();

    let connector = tree[leaf(&tree, "C")].parent().unwrap();
    assert_eq!(tree[connector].support(), 0.7);
    assert_eq!(tree.to_newick(), "(A:0.5,(B:1,(C:1,D:1)0.7:1)1:0.5);");
    assert!(tree.is_valid());
}

#[test]
fn test_set_outgroup_self_and_errors() {
    let mut tree = Tree::from_newick("((A,B),(C,D));").unwrap();
    let root = tree.root_index();
    let before = tree.to_newick();

    tree.set_outgroup(root, root).unwrap();
    assert_eq!(tree.to_newick(), before);

    let loose = tree.new_node();
    assert_eq!(
        tree.set_outgroup(root, loose),
        Err(TreeError::Structure(StructureError::NotADescendant {
            ancestor: root,
            node: loose
        }))
    );
    assert_eq!(tree.to_newick(), before);
}

#[test]
fn test_set_outgroup_twice_restores_bipartitions() {
    let mut tree = Tree::from_newick("(((A,B),C),(D,E));").unwrap();
    let root = tree.root_index();
    let ab = tree[leaf(&tree, "A")].parent().unwrap();
    let de = tree[leaf(&tree, "D")].parent().unwrap();

    tree.set_outgroup(root, ab).unwrap();
    tree.set_outgroup(root, de).unwrap();

    let mut groups: Vec<Vec<&str>> = tree
        .children(root)
        .iter()
        .map(|&child| {
            let mut names = tree.get_leaf_names(child);
            names.sort();
            names
        })
        .collect();
    groups.sort();
    assert_eq!(groups, vec![vec!["A", "B", "C"], vec!["D", "E"]]);
    assert!(tree.is_valid());
}

// --- UNROOT ---
#[test]
fn test_unroot() {
    let mut tree = Tree::from_newick("((A,B)X,(C,D)Y);").unwrap();
    let root = tree.root_index();

    tree.unroot(root).unwrap();

    assert_eq!(tree.children(root).len(), 3);
    assert_eq!(tree.get_leaf_names(root), vec!["A", "B", "C", "D"]);
    assert!(tree.get_descendants_by_name(root, "X").is_empty());
    assert!(tree.is_valid());
}

#[test]
fn test_unroot_prefers_internal_child() {
    let mut tree = Tree::from_newick("(A,(B,C)Y);").unwrap();
    let root = tree.root_index();

    tree.unroot(root).unwrap();

    assert_eq!(tree.get_leaf_names(root), vec!["A", "B", "C"]);
    assert_eq!(tree.children(root).len(), 3);
}

#[test]
fn test_unroot_two_leaves_fails() {
    let mut tree = Tree::from_newick("(A,B);").unwrap();
    let root = tree.root_index();

    assert_eq!(
        tree.unroot(root),
        Err(TreeError::Structure(StructureError::CannotUnrootTwoLeaves))
    );
}

#[test]
fn test_unroot_other_degrees_unchanged() {
    let mut tree = Tree::from_newick("(A,B,(C,D));").unwrap();
    let root = tree.root_index();
    let before = tree.to_newick();

    tree.unroot(root).unwrap();
    assert_eq!(tree.to_newick(), before);
}

// --- POPULATE ---
#[test]
fn test_populate_empty_root() {
    let mut tree = Tree::new();
    let root = tree.root_index();
    let mut rng = StdRng::seed_from_u64(7);

    let added = tree.populate_with_rng(root, 5, &mut rng).unwrap();

    assert_eq!(added.len(), 5);
    assert_eq!(tree.num_leaves(root), 5);
    assert_eq!(tree.get_leaves(root), added);
    assert_no_unary_nodes(&tree, root);
    assert!(tree.is_valid());

    for &leaf in &added {
        let name = tree[leaf].name();
        assert_eq!(name.len(), 5);
        assert!(name.chars().all(|c| c.is_ascii_lowercase()));
        let dist = tree[leaf].dist();
        assert!((0.0..1.0).contains(&dist));
    }
}

#[test]
fn test_populate_is_reproducible_with_seed() {
    let grow = || {
        let mut tree = Tree::new();
        let root = tree.root_index();
        tree.populate_with_rng(root, 8, &mut StdRng::seed_from_u64(42))
            .unwrap();
        tree.to_newick()
    };
    assert_eq!(grow(), grow());
}

#[test]
fn test_populate_node_with_children() {
    let mut tree = Tree::from_newick("(A,B);").unwrap();
    let root = tree.root_index();

    let added = tree
        .populate_with_rng(root, 3, &mut StdRng::seed_from_u64(1))
        .unwrap();

    // One old leaf splits into two, then one new leaf splits
    assert_eq!(added.len(), 3);
    assert_eq!(tree.num_leaves(root), 4);
    assert_eq!(tree.children(root).len(), 2);
    assert_no_unary_nodes(&tree, root);
    assert!(tree.is_valid());
}

#[test]
fn test_populate_spreads_over_existing_leaves() {
    let mut tree = Tree::from_newick("(A:1,B:1);").unwrap();
    let root = tree.root_index();
    let (a, b) = (leaf(&tree, "A"), leaf(&tree, "B"));

    let added = tree
        .populate_with_rng(root, 6, &mut StdRng::seed_from_u64(3))
        .unwrap();

    assert_eq!(added.len(), 6);
    assert_eq!(tree.children(root), &[a, b]);
    assert!(!(tree.is_leaf(a) && tree.is_leaf(b)));
    // Old leaves keep their names when they become internal
    assert_eq!(tree[a].name(), "A");
    assert_eq!(tree[b].name(), "B");
    assert_no_unary_nodes(&tree, root);
    assert!(tree.is_valid());
}

#[test]
fn test_populate_single_leaf_under_node_with_children() {
    let mut tree = Tree::from_newick("(A,B);").unwrap();
    let root = tree.root_index();

    let added = tree.populate(root, 1).unwrap();

    assert_eq!(added.len(), 1);
    assert_eq!(tree.children(root).len(), 3);
    assert!(tree.is_leaf(leaf(&tree, "A")));
    assert!(tree.is_leaf(leaf(&tree, "B")));
}

#[test]
fn test_populate_edge_sizes() {
    let mut tree = Tree::new();
    let root = tree.root_index();

    assert!(tree.populate(root, 0).unwrap().is_empty());
    assert!(tree.is_leaf(root));

    let added = tree.populate(root, 1).unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(tree.children(root), added.as_slice());
}

// --- SUMMARIES ---
#[test]
fn test_describe() {
    let tree = Tree::from_newick("((A:1,B:3):1,(C:2,D:2):2);").unwrap();
    let root = tree.root_index();

    let summary = tree.describe(root);
    assert_eq!(summary.num_nodes, 7);
    assert_eq!(summary.num_leaves, 4);
    assert_eq!(summary.rooting, Rooting::Rooted);
    assert_eq!(summary.farthest_leaf, "B");
    assert_eq!(summary.farthest_dist, 4.0);
    assert_eq!(
        summary.to_string(),
        "Number of nodes:\t 7\nNumber of leaves:\t 4\nRooted: Yes\nFarthest leaf: B at distance 4"
    );

    let unrooted = Tree::from_newick("(A,B,C);").unwrap();
    assert_eq!(unrooted.describe(0).rooting, Rooting::Unrooted);
    assert_eq!(Tree::new().describe(0).rooting, Rooting::Unknown);
}

#[test]
fn test_ascii_nested() {
    let tree = Tree::from_newick("((A,B),C);").unwrap();
    let art = tree.get_ascii(tree.root_index(), false, true);

    let expected = [
        "          /-------- /-A",
        "---------|          \\-B",
        "          \\-C",
    ]
    .join("\n");
    assert_eq!(art, expected);
}

#[test]
fn test_ascii_spacing_and_internal_names() {
    let tree = Tree::from_newick("(A,B)X;").unwrap();
    let root = tree.root_index();

    assert_eq!(
        tree.get_ascii(root, false, false),
        "          /-A\n---------|\n          \\-B"
    );
    assert_eq!(
        tree.get_ascii(root, true, true),
        "-X------- /-A\n          \\-B"
    );
    assert_eq!(tree.get_ascii(tree.children(root)[0], false, true), "--A");
}
