use manuscript_core::db::open_db_in_memory;
use manuscript_core::{
    load_state, reduce, save_state, DraftIndex, EditorEvent, EditorState, KvStore,
    PersistedState, SequentialIdGenerator, SqliteKvStore, STATE_KEY,
};
use std::collections::BTreeSet;

fn populated_state() -> EditorState {
    let mut state = EditorState::default();
    let mut ids = SequentialIdGenerator::new();
    let events = vec![
        EditorEvent::ReplaceDraft {
            draft: DraftIndex::FIRST,
            raw_text: "first a\n\nfirst b".to_string(),
        },
        EditorEvent::ReplaceDraft {
            draft: DraftIndex::THIRD,
            raw_text: "third a".to_string(),
        },
        EditorEvent::SetDraftAlias {
            draft: DraftIndex::SECOND,
            alias: "Reviewer notes".to_string(),
        },
        EditorEvent::AddAllFromDraft {
            draft: DraftIndex::FIRST,
        },
        EditorEvent::InsertDetached {
            text: "![fig](data:image/png;base64,AA==)".to_string(),
            at_index: Some(1),
        },
        EditorEvent::Dismiss {
            paragraph_id: "para-3".to_string(),
        },
        EditorEvent::Dismiss {
            paragraph_id: "para-1".to_string(),
        },
    ];
    for event in events {
        reduce(&mut state, event, &mut ids).unwrap();
    }
    state
}

#[test]
fn save_then_load_reproduces_state() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    let state = populated_state();

    save_state(&store, &state).unwrap();
    let loaded = load_state(&store);

    assert_eq!(loaded.drafts(), state.drafts());
    assert_eq!(loaded.final_paragraphs(), state.final_paragraphs());
    assert_eq!(loaded.dismissed(), state.dismissed());
    assert_eq!(loaded.reflected(), state.reflected());
}

#[test]
fn dismissed_set_is_stored_as_ordered_list() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    save_state(&store, &populated_state()).unwrap();

    let blob = store.get(STATE_KEY).unwrap().unwrap();
    let persisted: PersistedState = serde_json::from_str(&blob).unwrap();
    assert_eq!(persisted.dismissed_paragraph_ids, vec!["para-1", "para-3"]);

    let image = &persisted.final_paragraphs[1];
    assert_eq!(image.original_id, None);
    assert!(!blob.contains("\"originalId\":null"));
}

#[test]
fn duplicated_dismissed_ids_collapse_into_a_set() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    store
        .set(
            STATE_KEY,
            r#"{"drafts":[{"id":1,"title":"Draft 1"},{"id":2,"title":"Draft 2"},{"id":3,"title":"Draft 3"}],
                "finalParagraphs":[],
                "dismissedParagraphIds":["para-2","para-2","para-1"]}"#,
        )
        .unwrap();

    let loaded = load_state(&store);
    let expected: BTreeSet<String> = ["para-1", "para-2"].map(String::from).into();
    assert_eq!(loaded.dismissed(), &expected);
}

#[test]
fn missing_or_malformed_blob_yields_default_state() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    assert_eq!(load_state(&store), EditorState::default());

    for blob in [
        "{",
        "[]",
        r#"{"drafts":[{"id":1,"title":"Draft 1"}]}"#,
        r#"{"drafts":[{"id":1,"title":"Draft 1"},{"id":2,"title":"Draft 2"},{"id":3,"title":"Draft 3"}],"finalParagraphs":[{"id":"final-1","text":"x","sourceDraftIndex":9}]}"#,
    ] {
        store.set(STATE_KEY, blob).unwrap();
        assert_eq!(load_state(&store), EditorState::default(), "blob: {blob}");
    }
}
