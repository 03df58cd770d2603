//! Property tests: random operation sequences checked against a plain
//! `HashMap` model.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use taskd_store::{InMemoryTaskStore, PageRequest, TaskStore, DEFAULT_PAGE_LIMIT};
use taskd_types::{TaskDraft, TaskId, TaskStatus};

#[derive(Clone, Debug)]
enum Op {
    Create(String, bool),
    Update(usize, String, bool),
    Delete(usize),
    DeleteMissing,
    DeleteAll,
}

fn status(done: bool) -> TaskStatus {
    if done {
        TaskStatus::Done
    } else {
        TaskStatus::Pending
    }
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ]{1,16}").expect("Invalid regex")
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (name_strategy(), any::<bool>()).prop_map(|(n, d)| Op::Create(n, d)),
        2 => (any::<usize>(), name_strategy(), any::<bool>())
            .prop_map(|(i, n, d)| Op::Update(i, n, d)),
        3 => any::<usize>().prop_map(Op::Delete),
        1 => Just(Op::DeleteMissing),
        1 => Just(Op::DeleteAll),
    ]
}

/// Collect every task across all pages.
fn all_pages(store: &InMemoryTaskStore) -> Vec<taskd_types::Task> {
    let first = store.list(PageRequest::new(1)).unwrap();
    let pages = first.pagination.pages;
    let mut all = first.data;
    for page in 2..=pages {
        all.extend(store.list(PageRequest::new(page as i64)).unwrap().data);
    }
    all
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn store_matches_model(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let store = InMemoryTaskStore::new();
        let mut model: HashMap<TaskId, TaskDraft> = HashMap::new();
        let mut live: Vec<TaskId> = Vec::new();

        for op in ops {
            match op {
                Op::Create(name, done) => {
                    let draft = TaskDraft::new(name, status(done));
                    let task = store.create(draft.clone()).unwrap();
                    prop_assert!(!model.contains_key(&task.id));
                    model.insert(task.id, draft);
                    live.push(task.id);
                }
                Op::Update(i, name, done) if !live.is_empty() => {
                    let id = live[i % live.len()];
                    let draft = TaskDraft::new(name, status(done));
                    let task = store.update(&id, draft.clone()).unwrap();
                    prop_assert_eq!(task.id, id);
                    model.insert(id, draft);
                }
                Op::Delete(i) if !live.is_empty() => {
                    let id = live.swap_remove(i % live.len());
                    let before = store.len();
                    store.delete(&id).unwrap();
                    model.remove(&id);
                    prop_assert_eq!(store.len(), before - 1);
                    prop_assert!(store.get(&id).unwrap_err().is_not_found());
                }
                Op::Update(..) | Op::Delete(_) | Op::DeleteMissing => {
                    let missing = TaskId::generate();
                    prop_assert!(store.delete(&missing).unwrap_err().is_not_found());
                }
                Op::DeleteAll => {
                    store.delete_all().unwrap();
                    model.clear();
                    live.clear();
                }
            }

            prop_assert!(store.check_integrity().is_ok());
            prop_assert_eq!(store.len(), model.len());
        }

        // Every surviving task reads back with the model's content.
        for (id, draft) in &model {
            let task = store.get(id).unwrap();
            prop_assert_eq!(&task.to_draft(), draft);
        }

        // Pages cover the store exactly once.
        let listed = all_pages(&store);
        let ids: HashSet<TaskId> = listed.iter().map(|t| t.id).collect();
        prop_assert_eq!(listed.len(), model.len());
        prop_assert_eq!(ids.len(), model.len());
        for id in model.keys() {
            prop_assert!(ids.contains(id));
        }
    }

    #[test]
    fn pagination_covers_all_records(n in 0usize..450) {
        let store = InMemoryTaskStore::new();
        let mut created = HashSet::new();
        for i in 0..n {
            let draft = TaskDraft::new(format!("t{i}"), TaskStatus::Pending);
            created.insert(store.create(draft).unwrap().id);
        }

        let expected_pages = n.div_ceil(DEFAULT_PAGE_LIMIT);
        let first = store.list(PageRequest::new(1)).unwrap();
        prop_assert_eq!(first.pagination.pages, expected_pages);

        let listed = all_pages(&store);
        let seen: HashSet<TaskId> = listed.iter().map(|t| t.id).collect();
        prop_assert_eq!(listed.len(), n);
        prop_assert_eq!(seen, created);

        let beyond = store.list(PageRequest::new(expected_pages as i64 + 1)).unwrap();
        prop_assert!(beyond.is_empty());
        prop_assert!(!beyond.pagination.has_next);
    }

    #[test]
    fn created_ids_are_pairwise_distinct(n in 1usize..300) {
        let store = InMemoryTaskStore::new();
        let ids: HashSet<TaskId> = (0..n)
            .map(|i| store.create(TaskDraft::new(format!("t{i}"), TaskStatus::Done)).unwrap().id)
            .collect();
        prop_assert_eq!(ids.len(), n);
    }
}
