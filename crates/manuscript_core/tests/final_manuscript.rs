use manuscript_core::{
    reduce, split_chunks, DraftIndex, EditorEvent, EditorState, SequentialIdGenerator, StateChange,
};

fn replace(state: &mut EditorState, ids: &mut SequentialIdGenerator, draft: DraftIndex, text: &str) {
    reduce(
        state,
        EditorEvent::ReplaceDraft {
            draft,
            raw_text: text.to_string(),
        },
        ids,
    )
    .unwrap();
}

fn final_texts(state: &EditorState) -> Vec<String> {
    state
        .final_paragraphs()
        .iter()
        .map(|paragraph| paragraph.text.clone())
        .collect()
}

#[test]
fn splitting_keeps_order_and_collapses_blank_runs() {
    assert_eq!(split_chunks("A\n\nB\n\n\nC"), vec!["A", "B", "C"]);
    assert_eq!(split_chunks("  A  \n\n\n\n  B\t"), vec!["A", "B"]);
}

#[test]
fn appended_paragraph_becomes_reflected() {
    let mut state = EditorState::default();
    let mut ids = SequentialIdGenerator::new();
    replace(&mut state, &mut ids, DraftIndex::FIRST, "one\n\ntwo");
    let source = state.draft(DraftIndex::FIRST).paragraphs[1].clone();

    assert!(!state.reflected().contains(&source.id));

    reduce(
        &mut state,
        EditorEvent::AppendFinal {
            paragraph: source.clone(),
            at_index: None,
        },
        &mut ids,
    )
    .unwrap();

    assert!(state.reflected().contains(&source.id));
    assert_eq!(state.final_paragraphs()[0].id, "final-3");
    assert_eq!(
        state.final_paragraphs()[0].original_id.as_deref(),
        Some(source.id.as_str())
    );
}

#[test]
fn add_all_is_idempotent_and_skips_reflected_paragraphs() {
    let mut state = EditorState::default();
    let mut ids = SequentialIdGenerator::new();
    replace(&mut state, &mut ids, DraftIndex::SECOND, "a\n\nb\n\nc");
    let first = state.draft(DraftIndex::SECOND).paragraphs[0].clone();
    reduce(
        &mut state,
        EditorEvent::AppendFinal {
            paragraph: first,
            at_index: None,
        },
        &mut ids,
    )
    .unwrap();

    let change = reduce(
        &mut state,
        EditorEvent::AddAllFromDraft {
            draft: DraftIndex::SECOND,
        },
        &mut ids,
    )
    .unwrap();
    assert_eq!(change, StateChange::Final);
    assert_eq!(final_texts(&state), vec!["a", "b", "c"]);
    let after_once = state.clone();

    let change = reduce(
        &mut state,
        EditorEvent::AddAllFromDraft {
            draft: DraftIndex::SECOND,
        },
        &mut ids,
    )
    .unwrap();
    assert_eq!(change, StateChange::Unchanged);
    assert_eq!(state, after_once);
}

#[test]
fn move_then_move_back_restores_order() {
    let mut state = EditorState::default();
    let mut ids = SequentialIdGenerator::new();
    replace(&mut state, &mut ids, DraftIndex::FIRST, "p\n\nq\n\nr\n\ns");
    reduce(
        &mut state,
        EditorEvent::AddAllFromDraft {
            draft: DraftIndex::FIRST,
        },
        &mut ids,
    )
    .unwrap();
    let original = final_texts(&state);

    for (i, j) in [(0, 3), (3, 0), (1, 2), (2, 1), (0, 1)] {
        reduce(&mut state, EditorEvent::MoveFinal { from: i, to: j }, &mut ids).unwrap();
        reduce(&mut state, EditorEvent::MoveFinal { from: j, to: i }, &mut ids).unwrap();
        assert_eq!(final_texts(&state), original, "move({i},{j}) round trip");
    }
}

#[test]
fn remove_all_from_draft_survives_source_replacement() {
    let mut state = EditorState::default();
    let mut ids = SequentialIdGenerator::new();
    replace(&mut state, &mut ids, DraftIndex::FIRST, "old one\n\nold two");
    replace(&mut state, &mut ids, DraftIndex::THIRD, "keep me");
    for draft in [DraftIndex::FIRST, DraftIndex::THIRD] {
        reduce(&mut state, EditorEvent::AddAllFromDraft { draft }, &mut ids).unwrap();
    }

    replace(&mut state, &mut ids, DraftIndex::FIRST, "brand new");
    assert_eq!(final_texts(&state), vec!["old one", "old two", "keep me"]);

    reduce(
        &mut state,
        EditorEvent::RemoveAllFromDraft {
            draft: DraftIndex::FIRST,
        },
        &mut ids,
    )
    .unwrap();
    assert_eq!(final_texts(&state), vec!["keep me"]);
}

#[test]
fn replacing_draft_keeps_final_copies_with_dangling_links() {
    let mut state = EditorState::default();
    let mut ids = SequentialIdGenerator::new();
    replace(&mut state, &mut ids, DraftIndex::FIRST, "x");
    reduce(
        &mut state,
        EditorEvent::AddAllFromDraft {
            draft: DraftIndex::FIRST,
        },
        &mut ids,
    )
    .unwrap();

    replace(&mut state, &mut ids, DraftIndex::FIRST, "x");
    let new_id = state.draft(DraftIndex::FIRST).paragraphs[0].id.clone();

    assert_eq!(state.final_paragraphs().len(), 1);
    assert!(state.reflected().contains("para-1"));
    assert!(!state.is_reflected(&new_id));
}

#[test]
fn final_ids_are_never_reused() {
    let mut state = EditorState::default();
    let mut ids = SequentialIdGenerator::new();
    replace(&mut state, &mut ids, DraftIndex::FIRST, "x\n\ny");
    reduce(
        &mut state,
        EditorEvent::AddAllFromDraft {
            draft: DraftIndex::FIRST,
        },
        &mut ids,
    )
    .unwrap();
    let removed = state.final_paragraphs()[0].id.clone();
    reduce(&mut state, EditorEvent::RemoveFinal { id: removed.clone() }, &mut ids).unwrap();
    reduce(
        &mut state,
        EditorEvent::AddAllFromDraft {
            draft: DraftIndex::FIRST,
        },
        &mut ids,
    )
    .unwrap();

    assert_eq!(final_texts(&state), vec!["y", "x"]);
    assert!(state
        .final_paragraphs()
        .iter()
        .all(|paragraph| paragraph.id != removed));
}
