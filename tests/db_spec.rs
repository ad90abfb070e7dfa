use docbranch::db::Database;
use docbranch::highlight::geometry::normalize;
use docbranch::models::*;
use speculate2::speculate;
use uuid::Uuid;

fn create_test_document(db: &Database) -> Document {
    db.create_document(CreateDocumentInput {
        title: "Test Document".to_string(),
        text: "Page one text\n\nPage two text".to_string(),
        pages: vec!["Page one text".to_string(), "Page two text".to_string()],
    })
    .expect("Failed to create document")
}

fn test_highlight(page_number: u32, note: Option<&str>) -> HighlightRegion {
    HighlightRegion {
        id: Uuid::new_v4(),
        page_number,
        rect: normalize(10.0, 20.0, 110.0, 40.0),
        text: "selected words".to_string(),
        color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
        note: note.map(str::to_string),
        created_at: chrono::Utc::now(),
    }
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "documents" {
        it "stores a document with its pages" {
            let doc = create_test_document(&db);

            let found = db.get_document(doc.id).expect("Query failed").expect("Document missing");
            assert_eq!(found.title, "Test Document");
            assert_eq!(found.full_text, doc.full_text);
            assert_eq!(found.page_count, 2);

            let pages = db.get_document_pages(doc.id).expect("Query failed");
            assert_eq!(pages.len(), 2);
            assert_eq!(pages[0].page_number, 1);
            assert_eq!(pages[1].text, "Page two text");
        }

        it "stores the whole text as one page when none are given" {
            let doc = db.create_document(CreateDocumentInput {
                title: "Single".to_string(),
                text: "Only text".to_string(),
                pages: vec![],
            }).expect("Failed to create");

            assert_eq!(doc.page_count, 1);
            assert_eq!(db.get_document_pages(doc.id).unwrap()[0].text, "Only text");
        }

        it "returns None for a non-existent document" {
            assert!(db.get_document(Uuid::new_v4()).expect("Query failed").is_none());
        }

        it "lists documents without their text" {
            create_test_document(&db);
            create_test_document(&db);

            let docs = db.list_documents().expect("Query failed");
            assert_eq!(docs.len(), 2);
            assert!(docs.iter().all(|d| d.title == "Test Document"));
        }

        it "deletes a document with its branches and highlights" {
            let doc = create_test_document(&db);
            db.insert_branch(doc.id, &Branch::new(None, "q", "a")).unwrap();
            db.insert_highlight(doc.id, &test_highlight(1, None)).unwrap();

            assert!(db.delete_document(doc.id).expect("Delete failed"));
            assert!(db.get_document(doc.id).unwrap().is_none());
            assert!(db.get_document_pages(doc.id).unwrap().is_empty());
            assert!(db.get_branches(doc.id).unwrap().is_empty());
            assert!(db.get_highlights(doc.id).unwrap().is_empty());
        }

        it "reports false when deleting a missing document" {
            assert!(!db.delete_document(Uuid::new_v4()).unwrap());
        }
    }

    describe "branches" {
        it "round-trips every field" {
            let doc = create_test_document(&db);
            let root = Branch::new(None, "What is this?", "A test.");
            db.insert_branch(doc.id, &root).unwrap();

            let stored = db.get_branches(doc.id).unwrap();
            assert_eq!(stored.len(), 1);
            assert_eq!(stored[0].id, root.id);
            assert_eq!(stored[0].parent_id, None);
            assert_eq!(stored[0].question, root.question);
            assert_eq!(stored[0].answer, root.answer);
            assert_eq!(stored[0].created_at.timestamp_micros(), root.created_at.timestamp_micros());
        }

        it "rebuilds the tree with parent links" {
            let doc = create_test_document(&db);
            let root = Branch::new(None, "q1", "a1");
            let child = Branch::new(Some(root.id), "q2", "a2");
            let sibling = Branch::new(Some(root.id), "q3", "a3");
            for b in [&root, &child, &sibling] {
                db.insert_branch(doc.id, b).unwrap();
            }

            let tree = db.load_branch_tree(doc.id).expect("Load failed");
            assert_eq!(tree.len(), 3);
            let children: Vec<Uuid> = tree.children(root.id).iter().map(|b| b.id).collect();
            assert_eq!(children, vec![child.id, sibling.id]);
        }

        it "keeps trees of different documents apart" {
            let a = create_test_document(&db);
            let b = create_test_document(&db);
            db.insert_branch(a.id, &Branch::new(None, "q", "a")).unwrap();

            assert_eq!(db.load_branch_tree(a.id).unwrap().len(), 1);
            assert!(db.load_branch_tree(b.id).unwrap().is_empty());
        }

        it "deletes a subtree" {
            let doc = create_test_document(&db);
            let mut tree = db.load_branch_tree(doc.id).unwrap();
            let root = tree.create_branch(None, "q1", "a1").unwrap();
            let child = tree.create_branch(Some(root), "q2", "a2").unwrap();
            for id in [root, child] {
                db.insert_branch(doc.id, tree.get(id).unwrap()).unwrap();
            }

            let removed = tree.delete_branch(root);
            assert_eq!(db.delete_branches(&removed).unwrap(), 2);
            assert!(db.get_branches(doc.id).unwrap().is_empty());
        }
    }

    describe "highlights" {
        it "round-trips every field" {
            let doc = create_test_document(&db);
            let highlight = test_highlight(2, Some("check this"));
            db.insert_highlight(doc.id, &highlight).unwrap();

            let found = db.get_highlight(highlight.id).unwrap().expect("Highlight missing");
            assert_eq!(found.page_number, 2);
            assert_eq!(found.rect, highlight.rect);
            assert_eq!(found.text, highlight.text);
            assert_eq!(found.color, highlight.color);
            assert_eq!(found.note, highlight.note);
        }

        it "lists highlights by page" {
            let doc = create_test_document(&db);
            db.insert_highlight(doc.id, &test_highlight(2, None)).unwrap();
            db.insert_highlight(doc.id, &test_highlight(1, None)).unwrap();

            let pages: Vec<u32> = db.get_highlights(doc.id).unwrap().iter().map(|h| h.page_number).collect();
            assert_eq!(pages, vec![1, 2]);
        }

        it "updates colour and note independently" {
            let doc = create_test_document(&db);
            let highlight = test_highlight(1, Some("first"));
            db.insert_highlight(doc.id, &highlight).unwrap();

            let updated = db.update_highlight(highlight.id, HighlightUpdate {
                color: Some("#00ff00".to_string()),
                note: None,
            }).unwrap().expect("Highlight missing");

            assert_eq!(updated.color, "#00ff00");
            assert_eq!(updated.note.as_deref(), Some("first"));
            assert_eq!(db.get_highlight(highlight.id).unwrap().unwrap().color, "#00ff00");
        }

        it "clears a note when given an explicit null" {
            let doc = create_test_document(&db);
            let highlight = test_highlight(1, Some("first"));
            db.insert_highlight(doc.id, &highlight).unwrap();

            let updated = db.update_highlight(highlight.id, HighlightUpdate {
                color: None,
                note: Some(None),
            }).unwrap().expect("Highlight missing");

            assert_eq!(updated.note, None);
            assert_eq!(db.get_highlight(highlight.id).unwrap().unwrap().note, None);
        }

        it "returns None when updating a missing highlight" {
            let result = db.update_highlight(Uuid::new_v4(), HighlightUpdate::default()).unwrap();
            assert!(result.is_none());
        }

        it "deletes a single highlight" {
            let doc = create_test_document(&db);
            let keep = test_highlight(1, None);
            let removed = test_highlight(1, None);
            db.insert_highlight(doc.id, &keep).unwrap();
            db.insert_highlight(doc.id, &removed).unwrap();

            assert!(db.delete_highlight(removed.id).unwrap());
            assert!(!db.delete_highlight(removed.id).unwrap());
            assert_eq!(db.get_highlights(doc.id).unwrap().len(), 1);
        }

        it "survives deleting every branch" {
            let doc = create_test_document(&db);
            let branch = Branch::new(None, "q", "a");
            db.insert_branch(doc.id, &branch).unwrap();
            db.insert_highlight(doc.id, &test_highlight(1, None)).unwrap();

            db.delete_branches(&[branch.id]).unwrap();
            assert_eq!(db.get_highlights(doc.id).unwrap().len(), 1);
        }
    }

    describe "summaries" {
        it "stores a document summary" {
            let doc = create_test_document(&db);

            let saved = db.save_summary(doc.id, None, "Test Document", "Short summary").unwrap();

            let found = db.get_summary(saved.id).unwrap().expect("Summary missing");
            assert_eq!(found.document_id, doc.id);
            assert_eq!(found.branch_id, None);
            assert_eq!(found.title, "Test Document");
            assert_eq!(found.content, "Short summary");
            assert_eq!(found.created_at.timestamp_micros(), saved.created_at.timestamp_micros());
        }

        it "overwrites the summary of the same branch and keeps its id" {
            let doc = create_test_document(&db);
            let branch = Branch::new(None, "q", "a");
            db.insert_branch(doc.id, &branch).unwrap();

            let first = db.save_summary(doc.id, Some(branch.id), "q", "old").unwrap();
            let second = db.save_summary(doc.id, Some(branch.id), "q", "new").unwrap();

            assert_eq!(first.id, second.id);
            assert_eq!(second.created_at.timestamp_micros(), first.created_at.timestamp_micros());
            let all = db.get_summaries(doc.id).unwrap();
            assert_eq!(all.len(), 1);
            assert_eq!(all[0].content, "new");
        }

        it "keeps document and branch summaries apart" {
            let doc = create_test_document(&db);
            let branch = Branch::new(None, "q", "a");
            db.insert_branch(doc.id, &branch).unwrap();

            db.save_summary(doc.id, None, "doc", "whole document").unwrap();
            db.save_summary(doc.id, Some(branch.id), "q", "one path").unwrap();

            assert_eq!(db.get_summaries(doc.id).unwrap().len(), 2);
        }

        it "updates title and content independently" {
            let doc = create_test_document(&db);
            let saved = db.save_summary(doc.id, None, "title", "content").unwrap();

            let updated = db.update_summary(saved.id, UpdateSummaryInput {
                title: None,
                content: Some("edited".to_string()),
            }).unwrap().expect("Summary missing");

            assert_eq!(updated.title, "title");
            assert_eq!(updated.content, "edited");
            assert_eq!(db.get_summary(saved.id).unwrap().unwrap().content, "edited");
        }

        it "returns None when updating a missing summary" {
            let result = db.update_summary(Uuid::new_v4(), UpdateSummaryInput::default()).unwrap();
            assert!(result.is_none());
        }

        it "deletes a summary" {
            let doc = create_test_document(&db);
            let saved = db.save_summary(doc.id, None, "title", "content").unwrap();

            assert!(db.delete_summary(saved.id).unwrap());
            assert!(!db.delete_summary(saved.id).unwrap());
            assert!(db.get_summaries(doc.id).unwrap().is_empty());
        }

        it "goes away with its branch" {
            let doc = create_test_document(&db);
            let branch = Branch::new(None, "q", "a");
            db.insert_branch(doc.id, &branch).unwrap();
            db.save_summary(doc.id, Some(branch.id), "q", "path").unwrap();
            db.save_summary(doc.id, None, "doc", "document").unwrap();

            db.delete_branches(&[branch.id]).unwrap();

            let left = db.get_summaries(doc.id).unwrap();
            assert_eq!(left.len(), 1);
            assert_eq!(left[0].branch_id, None);
        }

        it "goes away with its document" {
            let doc = create_test_document(&db);
            let saved = db.save_summary(doc.id, None, "doc", "document").unwrap();

            db.delete_document(doc.id).unwrap();
            assert!(db.get_summary(saved.id).unwrap().is_none());
        }
    }

    describe "on disk" {
        it "persists across reopen" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("docbranch.db");

            let doc_id = {
                let disk = Database::open(path.clone()).expect("Open failed");
                disk.migrate().expect("Migrate failed");
                let doc = create_test_document(&disk);
                disk.insert_branch(doc.id, &Branch::new(None, "q", "a")).unwrap();
                doc.id
            };

            let reopened = Database::open(path).expect("Reopen failed");
            reopened.migrate().expect("Migrate failed");
            assert!(reopened.get_document(doc_id).unwrap().is_some());
            assert_eq!(reopened.load_branch_tree(doc_id).unwrap().len(), 1);
        }
    }
}
