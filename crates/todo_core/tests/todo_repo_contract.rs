use std::collections::HashSet;
use tempfile::TempDir;
use todo_core::{
    open_repository, FileTodoRepository, MemoryTodoRepository, SqliteTodoRepository, StoreKind,
    TodoPatch, TodoRepository,
};

/// Every backing store, each paired with the temp dir that keeps it alive.
fn stores() -> Vec<(&'static str, Box<dyn TodoRepository>, TempDir)> {
    let memory_dir = tempfile::tempdir().unwrap();
    let file_dir = tempfile::tempdir().unwrap();
    let sqlite_dir = tempfile::tempdir().unwrap();

    let file_repo = FileTodoRepository::new(file_dir.path().join("todos.json"));
    let sqlite_repo = SqliteTodoRepository::open(sqlite_dir.path().join("todos.db")).unwrap();

    vec![
        (
            "memory",
            Box::new(MemoryTodoRepository::new()) as Box<dyn TodoRepository>,
            memory_dir,
        ),
        ("file", Box::new(file_repo) as Box<dyn TodoRepository>, file_dir),
        ("sqlite", Box::new(sqlite_repo) as Box<dyn TodoRepository>, sqlite_dir),
    ]
}

#[test]
fn create_and_get_roundtrip() {
    for (name, repo, _dir) in stores() {
        let created = repo.create("buy milk").unwrap();
        assert!(created.id > 0, "{name}");
        assert!(!created.completed, "{name}");

        let loaded = repo.get(created.id).unwrap().unwrap();
        assert_eq!(loaded.title, "buy milk", "{name}");
        assert!(!loaded.completed, "{name}");
        assert_eq!(loaded, created, "{name}");
    }
}

#[test]
fn ids_strictly_increase_across_deletes() {
    for (name, repo, _dir) in stores() {
        let mut last = 0;
        for round in 0..5 {
            let todo = repo.create(&format!("round {round}")).unwrap();
            assert!(todo.id > last, "{name}: {} after {last}", todo.id);
            last = todo.id;
            if round % 2 == 0 {
                // Deleting the newest todo must not free its id.
                assert!(repo.delete(todo.id).unwrap(), "{name}");
            }
        }
    }
}

#[test]
fn filtered_lists_partition_the_full_list() {
    for (name, repo, _dir) in stores() {
        for (index, title) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
            let todo = repo.create(title).unwrap();
            if index % 2 == 1 {
                repo.update(todo.id, &TodoPatch::completed(true)).unwrap();
            }
        }

        let all = repo.list(None).unwrap();
        let done = repo.list(Some(true)).unwrap();
        let pending = repo.list(Some(false)).unwrap();

        assert!(done.iter().all(|todo| todo.completed), "{name}");
        assert!(pending.iter().all(|todo| !todo.completed), "{name}");

        let done_ids: HashSet<_> = done.iter().map(|todo| todo.id).collect();
        let pending_ids: HashSet<_> = pending.iter().map(|todo| todo.id).collect();
        let all_ids: HashSet<_> = all.iter().map(|todo| todo.id).collect();
        assert!(done_ids.is_disjoint(&pending_ids), "{name}");
        assert_eq!(
            done_ids.union(&pending_ids).copied().collect::<HashSet<_>>(),
            all_ids,
            "{name}"
        );
        assert_eq!(all.len(), 5, "{name}");
    }
}

#[test]
fn list_on_empty_store_is_empty_for_every_filter() {
    for (name, repo, _dir) in stores() {
        assert!(repo.list(None).unwrap().is_empty(), "{name}");
        assert!(repo.list(Some(true)).unwrap().is_empty(), "{name}");
        assert!(repo.list(Some(false)).unwrap().is_empty(), "{name}");
    }
}

#[test]
fn get_returns_none_for_unknown_and_deleted_ids() {
    for (name, repo, _dir) in stores() {
        assert!(repo.get(1).unwrap().is_none(), "{name}");
        assert!(repo.get(-3).unwrap().is_none(), "{name}");

        let todo = repo.create("short lived").unwrap();
        repo.delete(todo.id).unwrap();
        assert!(repo.get(todo.id).unwrap().is_none(), "{name}");
    }
}

#[test]
fn empty_patch_returns_unchanged_record() {
    for (name, repo, _dir) in stores() {
        let todo = repo.create("steady").unwrap();
        let updated = repo.update(todo.id, &TodoPatch::default()).unwrap().unwrap();
        assert_eq!(updated, todo, "{name}");
    }
}

#[test]
fn partial_updates_touch_only_present_fields() {
    for (name, repo, _dir) in stores() {
        let todo = repo.create("Walk dog").unwrap();

        let updated = repo
            .update(todo.id, &TodoPatch::completed(true))
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Walk dog", "{name}");
        assert!(updated.completed, "{name}");

        let updated = repo
            .update(todo.id, &TodoPatch::title("Walk cat"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Walk cat", "{name}");
        assert!(updated.completed, "{name}");

        let both = TodoPatch {
            title: Some("Feed fish".to_string()),
            completed: Some(false),
        };
        let updated = repo.update(todo.id, &both).unwrap().unwrap();
        assert_eq!(updated.title, "Feed fish", "{name}");
        assert!(!updated.completed, "{name}");
        assert_eq!(repo.get(todo.id).unwrap().unwrap(), updated, "{name}");
    }
}

#[test]
fn update_of_unknown_id_creates_nothing() {
    for (name, repo, _dir) in stores() {
        let result = repo.update(42, &TodoPatch::title("ghost")).unwrap();
        assert!(result.is_none(), "{name}");
        assert!(repo.list(None).unwrap().is_empty(), "{name}");
    }
}

#[test]
fn delete_is_idempotent() {
    for (name, repo, _dir) in stores() {
        let todo = repo.create("once").unwrap();
        assert!(repo.delete(todo.id).unwrap(), "{name}");
        assert!(!repo.delete(todo.id).unwrap(), "{name}");
        assert!(!repo.delete(999).unwrap(), "{name}");
    }
}

#[test]
fn create_update_delete_scenario() {
    for (name, repo, _dir) in stores() {
        let a = repo.create("a").unwrap();
        let b = repo.create("b").unwrap();
        assert_eq!((a.id, b.id), (1, 2), "{name}");
        assert_eq!(repo.list(None).unwrap(), vec![a.clone(), b.clone()], "{name}");

        repo.update(a.id, &TodoPatch::completed(true)).unwrap();
        assert_eq!(repo.list(Some(false)).unwrap(), vec![b.clone()], "{name}");

        assert!(repo.delete(b.id).unwrap(), "{name}");
        let remaining = repo.list(None).unwrap();
        assert_eq!(remaining.len(), 1, "{name}");
        assert_eq!(remaining[0].id, a.id, "{name}");
        assert!(remaining[0].completed, "{name}");
        assert!(repo.get(2).unwrap().is_none(), "{name}");
    }
}

#[test]
fn listing_follows_insertion_order() {
    for (name, repo, _dir) in stores() {
        let titles = ["first", "second", "third", "fourth"];
        for title in titles {
            repo.create(title).unwrap();
        }
        repo.delete(2).unwrap();
        repo.update(3, &TodoPatch::title("third, edited")).unwrap();

        let listed: Vec<_> = repo
            .list(None)
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(listed, vec!["first", "third, edited", "fourth"], "{name}");
    }
}

#[test]
fn empty_titles_are_accepted_by_every_store() {
    for (name, repo, _dir) in stores() {
        let todo = repo.create("").unwrap();
        assert_eq!(repo.get(todo.id).unwrap().unwrap().title, "", "{name}");
    }
}

#[test]
fn open_repository_selects_each_store() {
    let dir = tempfile::tempdir().unwrap();
    let kinds = [
        StoreKind::Memory,
        StoreKind::File(dir.path().join("selected.json")),
        StoreKind::Sqlite(dir.path().join("selected.db")),
    ];

    for kind in kinds {
        let repo = open_repository(&kind).unwrap();
        let todo = repo.create(kind.name()).unwrap();
        assert_eq!(repo.get(todo.id).unwrap().unwrap().title, kind.name());
    }
}
