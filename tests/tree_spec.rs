use docbranch::models::Branch;
use docbranch::tree::{BranchTree, TreeError};
use speculate2::speculate;
use uuid::Uuid;

fn questions(path: &[&Branch]) -> Vec<String> {
    path.iter().map(|b| b.question.clone()).collect()
}

speculate! {
    before {
        let mut tree = BranchTree::new();
    }

    describe "create_branch" {
        it "creates a root when no parent is given" {
            let id = tree.create_branch(None, "q1", "a1").expect("create failed");

            assert_eq!(tree.len(), 1);
            assert!(tree.get(id).unwrap().is_root());
            assert_eq!(tree.current(), Some(id));
        }

        it "appends children in creation order" {
            let root = tree.create_branch(None, "root", "a").unwrap();
            let first = tree.create_branch(Some(root), "first", "a").unwrap();
            let second = tree.create_branch(Some(root), "second", "a").unwrap();

            let children: Vec<Uuid> = tree.children(root).iter().map(|b| b.id).collect();
            assert_eq!(children, vec![first, second]);
            assert_eq!(tree.current(), Some(second));
        }

        it "keeps several independent roots" {
            let a = tree.create_branch(None, "a", "1").unwrap();
            let b = tree.create_branch(None, "b", "2").unwrap();

            let roots: Vec<Uuid> = tree.roots().iter().map(|r| r.id).collect();
            assert_eq!(roots, vec![a, b]);
        }

        it "rejects an unknown parent and leaves the tree unchanged" {
            let root = tree.create_branch(None, "q1", "a1").unwrap();
            let missing = Uuid::new_v4();

            let err = tree.create_branch(Some(missing), "q2", "a2").unwrap_err();

            assert_eq!(err, TreeError::ParentNotFound(missing));
            assert_eq!(tree.len(), 1);
            assert_eq!(tree.current(), Some(root));
        }
    }

    describe "get_branch_path" {
        it "returns the root-to-node path" {
            let n1 = tree.create_branch(None, "q1", "a1").unwrap();
            let n2 = tree.create_branch(Some(n1), "q2", "a2").unwrap();

            let path = tree.get_branch_path(n2);
            assert_eq!(path.iter().map(|b| b.id).collect::<Vec<_>>(), vec![n1, n2]);
            assert_eq!(questions(&path), vec!["q1", "q2"]);
        }

        it "is empty for an unknown id" {
            tree.create_branch(None, "q1", "a1").unwrap();
            assert!(tree.get_branch_path(Uuid::new_v4()).is_empty());
        }

        it "never includes siblings" {
            let root = tree.create_branch(None, "root", "a").unwrap();
            let left = tree.create_branch(Some(root), "left", "a").unwrap();
            tree.create_branch(Some(root), "right", "a").unwrap();
            let deep = tree.create_branch(Some(left), "deep", "a").unwrap();

            assert_eq!(questions(&tree.get_branch_path(deep)), vec!["root", "left", "deep"]);
        }
    }

    describe "delete_branch" {
        it "removes the node and all of its descendants" {
            let n1 = tree.create_branch(None, "q1", "a1").unwrap();
            let n2 = tree.create_branch(Some(n1), "q2", "a2").unwrap();

            let removed = tree.delete_branch(n1);

            assert_eq!(removed.len(), 2);
            assert!(removed.contains(&n1) && removed.contains(&n2));
            assert!(tree.is_empty());
            assert!(tree.get_branch_path(n2).is_empty());
        }

        it "leaves siblings and ancestors in place" {
            let root = tree.create_branch(None, "root", "a").unwrap();
            let left = tree.create_branch(Some(root), "left", "a").unwrap();
            let right = tree.create_branch(Some(root), "right", "a").unwrap();

            tree.delete_branch(left);

            assert_eq!(tree.len(), 2);
            assert_eq!(tree.children(root).iter().map(|b| b.id).collect::<Vec<_>>(), vec![right]);
        }

        it "clears the current branch when it was removed" {
            let root = tree.create_branch(None, "root", "a").unwrap();
            tree.create_branch(Some(root), "child", "a").unwrap();

            tree.delete_branch(root);
            assert_eq!(tree.current(), None);
        }

        it "keeps the current branch when it survives" {
            let a = tree.create_branch(None, "a", "1").unwrap();
            let b = tree.create_branch(None, "b", "2").unwrap();
            tree.select_branch(b);

            tree.delete_branch(a);
            assert_eq!(tree.current(), Some(b));
        }

        it "returns nothing for an unknown id" {
            tree.create_branch(None, "q", "a").unwrap();
            assert!(tree.delete_branch(Uuid::new_v4()).is_empty());
            assert_eq!(tree.len(), 1);
        }
    }

    describe "forest" {
        it "nests children under their parents" {
            let root = tree.create_branch(None, "root", "a").unwrap();
            let child = tree.create_branch(Some(root), "child", "a").unwrap();
            tree.create_branch(Some(child), "grandchild", "a").unwrap();

            let forest = tree.forest();
            assert_eq!(forest.len(), 1);
            assert_eq!(forest[0].branch.id, root);
            assert_eq!(forest[0].children[0].branch.id, child);
            assert_eq!(forest[0].children[0].children[0].branch.question, "grandchild");
        }
    }

    describe "render" {
        it "marks only the selected branch" {
            let root = tree.create_branch(None, "root question", "a").unwrap();
            tree.create_branch(Some(root), "follow up", "b").unwrap();
            tree.select_branch(root);

            let rendered = tree.render();

            assert!(rendered.contains("● root question"));
            assert!(rendered.contains("└── ○ follow up"));
            assert_eq!(rendered.matches('●').count(), 1);
        }

        it "marks nothing for a freshly loaded tree" {
            let root = Branch::new(None, "root", "a");
            let rebuilt = BranchTree::from_branches(vec![root]);

            assert_eq!(rebuilt.current(), None);
            assert!(!rebuilt.render().contains('●'));
        }
    }

    describe "from_branches" {
        it "rebuilds a tree from flat records in any order" {
            let root = Branch::new(None, "root", "a");
            let child = Branch::new(Some(root.id), "child", "b");
            let grandchild = Branch::new(Some(child.id), "grandchild", "c");

            let rebuilt = BranchTree::from_branches(vec![
                grandchild.clone(),
                child.clone(),
                root.clone(),
            ]);

            assert_eq!(rebuilt.len(), 3);
            assert_eq!(
                questions(&rebuilt.get_branch_path(grandchild.id)),
                vec!["root", "child", "grandchild"]
            );
        }

        it "skips branches whose parent is missing" {
            let orphan = Branch::new(Some(Uuid::new_v4()), "orphan", "a");
            let root = Branch::new(None, "root", "b");

            let rebuilt = BranchTree::from_branches(vec![orphan.clone(), root]);

            assert_eq!(rebuilt.len(), 1);
            assert!(!rebuilt.contains(orphan.id));
        }
    }
}
