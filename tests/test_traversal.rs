use phylonode::model::{ChildSpec, Node, Strategy, Tree};

/// Tree `((A,B)X,(C,D,E)Y)R;`
fn sample_tree() -> Tree {
    let tree = Tree::from_newick("((A,B)X,(C,D,E)Y)R;").unwrap();
    let root = tree.root_index();
    assert_eq!(tree[root].name(), "R");
    assert!(tree.is_valid());
    tree
}

fn names<'a>(nodes: impl Iterator<Item = &'a Node>) -> Vec<&'a str> {
    nodes.map(Node::name).collect()
}

#[test]
fn test_pre_order() {
    let tree = sample_tree();
    let root = tree.root_index();

    assert_eq!(
        names(tree.pre_order_iter(root)),
        vec!["R", "X", "A", "B", "Y", "C", "D", "E"]
    );
    assert_eq!(
        names(tree.traverse(root, Strategy::PreOrder)),
        names(tree.pre_order_iter(root))
    );
}

#[test]
fn test_post_order() {
    let tree = sample_tree();
    let root = tree.root_index();

    assert_eq!(
        names(tree.post_order_iter(root)),
        vec!["A", "B", "X", "C", "D", "E", "Y", "R"]
    );
    assert_eq!(
        names(tree.traverse(root, Strategy::PostOrder)),
        names(tree.post_order_iter(root))
    );
}

#[test]
fn test_traversal_of_subtree_and_leaf() {
    let tree = sample_tree();
    let root = tree.root_index();
    let y = tree.get_descendants_by_name(root, "Y")[0];
    let c = tree.get_leaves_by_name(root, "C")[0];

    assert_eq!(names(tree.pre_order_iter(y)), vec!["Y", "C", "D", "E"]);
    assert_eq!(names(tree.post_order_iter(c)), vec!["C"]);
    assert_eq!(names(tree.pre_order_iter(c)), vec!["C"]);
}

#[test]
fn test_descendants_exclude_start() {
    let tree = sample_tree();
    let root = tree.root_index();

    let descendants = tree.get_descendants(root);
    assert_eq!(descendants.len(), 7);
    assert!(!descendants.contains(&root));
    assert_eq!(
        names(tree.iter_descendants(root, Strategy::PostOrder)),
        vec!["A", "B", "X", "C", "D", "E", "Y"]
    );
}

#[test]
fn test_leaves_and_names() {
    let tree = sample_tree();
    let root = tree.root_index();

    assert_eq!(tree.get_leaf_names(root), vec!["A", "B", "C", "D", "E"]);
    assert_eq!(tree.num_leaves(root), 5);
    assert_eq!(tree.get_leaves(root).len(), 5);
    assert!(tree.iter_leaves(root).all(Node::is_leaf));

    let a = tree.get_leaves_by_name(root, "A")[0];
    assert_eq!(tree.num_leaves(a), 1);
    assert!(tree.get_leaves_by_name(root, "X").is_empty());
    assert_eq!(tree.get_descendants_by_name(root, "X").len(), 1);
}

#[test]
fn test_contains() {
    let tree = sample_tree();
    let root = tree.root_index();
    let x = tree.get_descendants_by_name(root, "X")[0];
    let c = tree.get_leaves_by_name(root, "C")[0];

    assert!(tree.contains_name(root, "D"));
    assert!(tree.contains_node(root, c));
    assert!(!tree.contains_node(x, c));
    assert!(!tree.contains_name(x, "X"));
    assert!(!tree.contains_node(root, root));
}

#[test]
fn test_collapsed_nodes_are_leaves_in_traversal() {
    let mut tree = sample_tree();
    let root = tree.root_index();
    let y = tree.get_descendants_by_name(root, "Y")[0];

    tree.collapse(y);

    assert_eq!(names(tree.pre_order_iter(root)), vec!["R", "X", "A", "B", "Y"]);
    assert_eq!(names(tree.post_order_iter(root)), vec!["A", "B", "X", "Y", "R"]);
    assert_eq!(tree.get_leaf_names(root), vec!["A", "B", "Y"]);
    assert_eq!(tree.children(y).len(), 3);
}

#[test]
fn test_deep_tree_does_not_overflow() {
    // A caterpillar of depth 100_000 would blow a recursive traversal
    let mut tree = Tree::new();
    let mut current = tree.root_index();
    for _ in 0..100_000 {
        tree.add_child(current, ChildSpec::new().with_name("leaf")).unwrap();
        current = tree.add_child(current, ChildSpec::new()).unwrap();
    }
    let root = tree.root_index();

    assert_eq!(tree.pre_order_iter(root).count(), 200_001);
    assert_eq!(tree.post_order_iter(root).count(), 200_001);
    assert_eq!(tree.num_leaves(root), 100_001);
}

#[test]
fn test_deep_newick_round_trip() {
    let mut tree = Tree::new();
    let mut current = tree.root_index();
    for _ in 0..100_000 {
        tree.add_child(current, ChildSpec::new().with_name("leaf")).unwrap();
        current = tree.add_child(current, ChildSpec::new()).unwrap();
    }
    let newick = tree.to_newick();

    let reread = Tree::from_newick(&newick).unwrap();
    let root = reread.root_index();
    assert_eq!(reread.num_leaves(root), 100_001);
    assert_eq!(reread.pre_order_iter(root).count(), 200_001);
    assert_eq!(reread.to_newick(), newick);
}
