use onepercent_core::{
    EntryRepository, Journal, NewEntry, RepoError, SectionRepository, ValidationError,
};

fn entry(journal: &Journal, title: &str, section_id: Option<i64>) -> i64 {
    journal
        .entries()
        .unwrap()
        .add_entry(&NewEntry {
            title: title.to_string(),
            body: String::new(),
            section_id,
        })
        .unwrap()
}

fn section(journal: &Journal, name: &str) -> i64 {
    journal.sections().unwrap().add_section(name).unwrap()
}

fn positions(journal: &Journal, ids: &[i64]) -> Vec<i64> {
    let repo = journal.entries().unwrap();
    ids.iter()
        .map(|id| repo.get_entry(*id).unwrap().unwrap().position)
        .collect()
}

fn entry_count(journal: &Journal) -> i64 {
    journal
        .connection()
        .query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn new_entries_append_within_their_group() {
    let journal = Journal::open_in_memory().unwrap();
    let s = section(&journal, "Work");
    let a = entry(&journal, "a", Some(s));
    let b = entry(&journal, "b", Some(s));
    let free = entry(&journal, "free", None);

    assert_eq!(positions(&journal, &[a, b, free]), vec![0, 1, 0]);
}

#[test]
fn reorder_assigns_dense_positions_in_given_order() {
    let journal = Journal::open_in_memory().unwrap();
    let s = section(&journal, "Work");
    let a = entry(&journal, "A", Some(s));
    let b = entry(&journal, "B", Some(s));
    let c = entry(&journal, "C", Some(s));

    let repo = journal.entries().unwrap();
    repo.reorder_entries(&[c, a, b]).unwrap();
    assert_eq!(positions(&journal, &[c, a, b]), vec![0, 1, 2]);

    let titles: Vec<String> = repo
        .entries_for_section(s)
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, vec!["C", "A", "B"]);

    // Same order again is a no-op in effect.
    repo.reorder_entries(&[c, a, b]).unwrap();
    assert_eq!(positions(&journal, &[c, a, b]), vec![0, 1, 2]);
}

#[test]
fn reorder_rejects_duplicate_ids_without_writing() {
    let journal = Journal::open_in_memory().unwrap();
    let a = entry(&journal, "A", None);
    let b = entry(&journal, "B", None);

    let err = journal
        .entries()
        .unwrap()
        .reorder_entries(&[b, a, b])
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateReorderId { id, .. } if id == b));
    assert_eq!(positions(&journal, &[a, b]), vec![0, 1]);
}

#[test]
fn failed_reorder_rolls_back_every_position() {
    let journal = Journal::open_in_memory().unwrap();
    let a = entry(&journal, "A", None);
    let b = entry(&journal, "B", None);
    let c = entry(&journal, "C", None);

    journal
        .connection()
        .execute_batch(
            "CREATE TRIGGER fail_third_position
             BEFORE UPDATE OF position ON entries
             WHEN NEW.position = 2
             BEGIN
                 SELECT RAISE(ABORT, 'injected failure');
             END;",
        )
        .unwrap();

    let result = journal.entries().unwrap().reorder_entries(&[c, b, a]);
    assert!(result.is_err());
    assert_eq!(positions(&journal, &[a, b, c]), vec![0, 1, 2]);
}

#[test]
fn reorder_sections_orders_the_global_list() {
    let journal = Journal::open_in_memory().unwrap();
    let x = section(&journal, "X");
    let y = section(&journal, "Y");
    let z = section(&journal, "Z");

    let repo = journal.sections().unwrap();
    repo.reorder_sections(&[z, x, y]).unwrap();
    let ids: Vec<i64> = repo.list_sections().unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![z, x, y]);
}

#[test]
fn section_name_is_trimmed_and_must_not_be_blank() {
    let journal = Journal::open_in_memory().unwrap();
    let repo = journal.sections().unwrap();
    let id = repo.add_section("  Reading list ").unwrap();
    assert_eq!(repo.get_section(id).unwrap().unwrap().name, "Reading list");

    let err = repo.add_section("   ").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankSectionName)
    ));
}

#[test]
fn deleting_section_releases_its_entries() {
    let journal = Journal::open_in_memory().unwrap();
    let doomed = section(&journal, "Doomed");
    let kept = section(&journal, "Kept");
    let a = entry(&journal, "a", Some(doomed));
    let b = entry(&journal, "b", Some(doomed));
    let other = entry(&journal, "other", Some(kept));
    let before = entry_count(&journal);

    journal.sections().unwrap().delete_section(doomed).unwrap();

    assert_eq!(entry_count(&journal), before);
    let entries = journal.entries().unwrap();
    assert!(entries.get_entry(a).unwrap().unwrap().is_free_floating());
    assert!(entries.get_entry(b).unwrap().unwrap().is_free_floating());
    assert_eq!(
        entries.get_entry(other).unwrap().unwrap().section_id,
        Some(kept)
    );
    assert!(journal.sections().unwrap().get_section(doomed).unwrap().is_none());

    let unassigned: Vec<i64> = entries.unassigned_entries().unwrap().iter().map(|e| e.id).collect();
    assert_eq!(unassigned.len(), 2);
    assert!(unassigned.contains(&a) && unassigned.contains(&b));
}

#[test]
fn failed_section_delete_leaves_entries_attached() {
    let journal = Journal::open_in_memory().unwrap();
    let s = section(&journal, "Stuck");
    let a = entry(&journal, "a", Some(s));

    journal
        .connection()
        .execute_batch(
            "CREATE TRIGGER block_section_delete
             BEFORE DELETE ON sections
             BEGIN
                 SELECT RAISE(ABORT, 'injected failure');
             END;",
        )
        .unwrap();

    assert!(journal.sections().unwrap().delete_section(s).is_err());
    let entry = journal.entries().unwrap().get_entry(a).unwrap().unwrap();
    assert_eq!(entry.section_id, Some(s));
    assert!(journal.sections().unwrap().get_section(s).unwrap().is_some());
}

#[test]
fn deleting_unknown_section_is_a_no_op() {
    let journal = Journal::open_in_memory().unwrap();
    let a = entry(&journal, "a", None);
    journal.sections().unwrap().delete_section(999).unwrap();
    assert_eq!(positions(&journal, &[a]), vec![0]);
}

#[test]
fn move_entry_appends_to_target_group() {
    let journal = Journal::open_in_memory().unwrap();
    let s = section(&journal, "Target");
    let existing = entry(&journal, "existing", Some(s));
    let moving = entry(&journal, "moving", None);

    let repo = journal.entries().unwrap();
    repo.move_entry(moving, Some(s)).unwrap();
    let moved = repo.get_entry(moving).unwrap().unwrap();
    assert_eq!(moved.section_id, Some(s));
    assert_eq!(moved.position, 1);
    assert_eq!(positions(&journal, &[existing]), vec![0]);

    repo.move_entry(moving, None).unwrap();
    assert!(repo.get_entry(moving).unwrap().unwrap().is_free_floating());
}

#[test]
fn update_entry_changes_only_title_and_body() {
    let journal = Journal::open_in_memory().unwrap();
    let s = section(&journal, "S");
    let id = entry(&journal, "draft", Some(s));
    let repo = journal.entries().unwrap();
    let before = repo.get_entry(id).unwrap().unwrap();

    repo.update_entry(id, "final", "body text").unwrap();
    let after = repo.get_entry(id).unwrap().unwrap();
    assert_eq!(after.title, "final");
    assert_eq!(after.body, "body text");
    assert_eq!(after.section_id, before.section_id);
    assert_eq!(after.position, before.position);
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn search_matches_title_or_body_case_insensitively() {
    let journal = Journal::open_in_memory().unwrap();
    let repo = journal.entries().unwrap();
    let by_title = repo
        .add_entry(&NewEntry {
            title: "Garden plan".to_string(),
            ..NewEntry::default()
        })
        .unwrap();
    let by_body = repo
        .add_entry(&NewEntry {
            title: "Misc".to_string(),
            body: "water the GARDEN".to_string(),
            section_id: None,
        })
        .unwrap();
    repo.add_entry(&NewEntry::blank(None)).unwrap();

    let hits: Vec<i64> = repo
        .search_entries("garden")
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(hits.len(), 2);
    assert!(hits.contains(&by_title) && hits.contains(&by_body));
    assert!(repo.search_entries("nothing like this").unwrap().is_empty());
}

#[test]
fn delete_entry_removes_only_that_row() {
    let journal = Journal::open_in_memory().unwrap();
    let a = entry(&journal, "a", None);
    let b = entry(&journal, "b", None);
    let repo = journal.entries().unwrap();
    repo.delete_entry(a).unwrap();
    repo.delete_entry(a).unwrap();
    assert!(repo.get_entry(a).unwrap().is_none());
    assert!(repo.get_entry(b).unwrap().is_some());
}
