use chrono::{Duration as DateDuration, NaiveDate, Utc};
use onepercent_core::calendar::local_midnight_ms;
use onepercent_core::{
    current_week_range, AddTaskError, AddTaskService, EditorError, EntryEditor, EntryRepository,
    IndexService, Journal, NewEntry, NewTask, SectionRepository, Table, TaskDraft,
    TaskRepository,
};
use std::time::{Duration, Instant};

const QUIET: Duration = Duration::from_millis(500);

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn index_service(
    journal: &Journal,
) -> IndexService<
    onepercent_core::SqliteTaskRepository<'_>,
    onepercent_core::SqliteEntryRepository<'_>,
    onepercent_core::SqliteSectionRepository<'_>,
> {
    IndexService::new(
        journal.tasks().unwrap(),
        journal.entries().unwrap(),
        journal.sections().unwrap(),
    )
}

#[test]
fn add_task_trims_name_and_stores_local_midnight() {
    let journal = Journal::open_in_memory().unwrap();
    let service = AddTaskService::new(journal.tasks().unwrap());
    let draft = TaskDraft {
        name: "  buy milk  ".to_string(),
        date: Some(date(2026, 2, 25)),
    };
    assert!(draft.is_complete());

    let id = service.submit(&draft, &Utc).unwrap();
    let task = journal.tasks().unwrap().get_task(id).unwrap().unwrap();
    assert_eq!(task.name, "buy milk");
    assert_eq!(task.due_date, local_midnight_ms(date(2026, 2, 25), &Utc));
}

#[test]
fn add_task_rejects_incomplete_drafts() {
    let journal = Journal::open_in_memory().unwrap();
    let service = AddTaskService::new(journal.tasks().unwrap());

    let blank = TaskDraft {
        name: " \t".to_string(),
        date: Some(date(2026, 2, 25)),
    };
    assert!(!blank.is_complete());
    assert!(matches!(
        service.submit(&blank, &Utc),
        Err(AddTaskError::BlankName)
    ));

    let undated = TaskDraft {
        name: "call".to_string(),
        date: None,
    };
    assert!(matches!(
        service.submit(&undated, &Utc),
        Err(AddTaskError::MissingDate)
    ));
    assert_eq!(journal.tasks().unwrap().earliest_due_date().unwrap(), None);
}

#[test]
fn add_task_rejects_dates_outside_supported_years() {
    let journal = Journal::open_in_memory().unwrap();
    let service = AddTaskService::new(journal.tasks().unwrap());
    for day in [NaiveDate::MIN, date(1500, 6, 1), date(3000, 1, 1), NaiveDate::MAX] {
        let draft = TaskDraft {
            name: "out of range".to_string(),
            date: Some(day),
        };
        assert!(matches!(
            service.submit(&draft, &Utc),
            Err(AddTaskError::DateOutOfRange(rejected)) if rejected == day
        ));
    }
    assert_eq!(journal.tasks().unwrap().earliest_due_date().unwrap(), None);

    for day in [date(1900, 1, 1), date(2999, 12, 31)] {
        let draft = TaskDraft {
            name: "edge".to_string(),
            date: Some(day),
        };
        service.submit(&draft, &Utc).unwrap();
    }
    let view = index_service(&journal)
        .index_view(date(2026, 2, 25), &Utc)
        .unwrap();
    assert_eq!(view.past_weeks[0].sunday, date(1899, 12, 31));
}

#[test]
fn index_view_groups_entries_and_lists_weeks() {
    let journal = Journal::open_in_memory().unwrap();
    let today = date(2026, 2, 25);
    journal
        .tasks()
        .unwrap()
        .add_task(&NewTask {
            name: "old".to_string(),
            due_date: local_midnight_ms(date(2026, 2, 10), &Utc),
        })
        .unwrap();

    let service = index_service(&journal);
    let work = service.create_section("Work").unwrap();
    let home = service.create_section("Home").unwrap();
    let w1 = service.create_entry(Some(work)).unwrap();
    let w2 = service.create_entry(Some(work)).unwrap();
    let free = service.create_entry(None).unwrap();
    service.reorder_entries(&[w2, w1]).unwrap();
    service.reorder_sections(&[home, work]).unwrap();

    let view = service.index_view(today, &Utc).unwrap();
    assert_eq!(view.current_weeks.len(), 4);
    assert_eq!(view.current_weeks[0], current_week_range(today));
    let past: Vec<NaiveDate> = view.past_weeks.iter().map(|w| w.sunday).collect();
    assert_eq!(past, vec![date(2026, 2, 8), date(2026, 2, 15)]);

    let section_ids: Vec<i64> = view.sections.iter().map(|s| s.section.id).collect();
    assert_eq!(section_ids, vec![home, work]);
    assert!(view.sections[0].entries.is_empty());
    let work_entries: Vec<i64> = view.sections[1].entries.iter().map(|e| e.id).collect();
    assert_eq!(work_entries, vec![w2, w1]);
    let unassigned: Vec<i64> = view.unassigned.iter().map(|e| e.id).collect();
    assert_eq!(unassigned, vec![free]);
}

#[test]
fn index_watch_refreshes_after_section_delete() {
    let journal = Journal::open_in_memory().unwrap();
    let today = date(2026, 2, 25);
    let service = index_service(&journal);
    let section = service.create_section("Gone soon").unwrap();
    let entry = service.create_entry(Some(section)).unwrap();

    let live = service.watch(journal.changes(), today, Utc);
    let before = live.current().unwrap();
    assert_eq!(before.sections.len(), 1);
    assert!(before.unassigned.is_empty());

    service.delete_section(section).unwrap();
    let after = live.poll().expect("index changed").unwrap();
    assert!(after.sections.is_empty());
    assert_eq!(after.unassigned.len(), 1);
    assert_eq!(after.unassigned[0].id, entry);
}

#[test]
fn past_weeks_empty_without_tasks() {
    let journal = Journal::open_in_memory().unwrap();
    let view = index_service(&journal)
        .index_view(date(2026, 2, 25), &Utc)
        .unwrap();
    assert!(view.past_weeks.is_empty());
    // A task in the current week adds no past week either.
    journal
        .tasks()
        .unwrap()
        .add_task(&NewTask {
            name: "this week".to_string(),
            due_date: local_midnight_ms(date(2026, 2, 22), &Utc),
        })
        .unwrap();
    let view = index_service(&journal)
        .index_view(date(2026, 2, 25), &Utc)
        .unwrap();
    assert!(view.past_weeks.is_empty());
    assert_eq!(
        view.current_weeks[3].saturday,
        date(2026, 2, 22) + DateDuration::days(27)
    );
}

#[test]
fn editor_coalesces_burst_into_one_write() {
    let journal = Journal::open_in_memory().unwrap();
    let repo = journal.entries().unwrap();
    let id = repo.add_entry(&NewEntry::blank(None)).unwrap();
    let writes = journal.changes().subscribe(&[Table::Entries]);

    let t0 = Instant::now();
    let mut editor = EntryEditor::open(&repo, id, QUIET).unwrap();
    editor.set_title_at("G", t0);
    editor.set_title_at("Gr", t0 + Duration::from_millis(100));
    editor.set_body_at("eggs", t0 + Duration::from_millis(200));

    assert!(!editor.tick(t0 + Duration::from_millis(650)).unwrap());
    assert_eq!(writes.drain(), 0);
    assert!(editor.tick(t0 + Duration::from_millis(700)).unwrap());
    assert_eq!(writes.drain(), 1);
    assert!(!editor.has_pending_save());

    let stored = repo.get_entry(id).unwrap().unwrap();
    assert_eq!(stored.title, "Gr");
    assert_eq!(stored.body, "eggs");

    drop(editor);
    assert_eq!(writes.drain(), 0);
}

#[test]
fn editor_ignores_edits_that_change_nothing() {
    let journal = Journal::open_in_memory().unwrap();
    let repo = journal.entries().unwrap();
    let id = repo
        .add_entry(&NewEntry {
            title: "same".to_string(),
            ..NewEntry::default()
        })
        .unwrap();

    let mut editor = EntryEditor::open(&repo, id, QUIET).unwrap();
    editor.set_title("same");
    editor.set_body("");
    assert!(!editor.has_pending_save());
}

#[test]
fn editor_does_not_write_before_load() {
    let journal = Journal::open_in_memory().unwrap();
    let repo = journal.entries().unwrap();
    let id = repo
        .add_entry(&NewEntry {
            title: "stored".to_string(),
            ..NewEntry::default()
        })
        .unwrap();

    let mut editor = EntryEditor::new(&repo, id, QUIET);
    editor.set_title("typed too early");
    assert!(!editor.has_pending_save());
    editor.save_now().unwrap();
    assert_eq!(repo.get_entry(id).unwrap().unwrap().title, "stored");

    assert!(editor.load().unwrap());
    assert_eq!(editor.title(), "stored");
}

#[test]
fn editor_flushes_pending_edit_on_drop() {
    let journal = Journal::open_in_memory().unwrap();
    let repo = journal.entries().unwrap();
    let id = repo.add_entry(&NewEntry::blank(None)).unwrap();

    {
        let mut editor = EntryEditor::open(&repo, id, QUIET).unwrap();
        editor.set_body("left before quiet period");
        assert!(editor.has_pending_save());
    }

    let stored = repo.get_entry(id).unwrap().unwrap();
    assert_eq!(stored.body, "left before quiet period");
}

#[test]
fn editor_save_now_writes_immediately() {
    let journal = Journal::open_in_memory().unwrap();
    let repo = journal.entries().unwrap();
    let id = repo.add_entry(&NewEntry::blank(None)).unwrap();

    let mut editor = EntryEditor::open(&repo, id, QUIET).unwrap();
    editor.set_title("now");
    editor.save_now().unwrap();
    assert!(!editor.has_pending_save());
    assert_eq!(repo.get_entry(id).unwrap().unwrap().title, "now");
}

#[test]
fn editor_open_fails_for_missing_entry() {
    let journal = Journal::open_in_memory().unwrap();
    let repo = journal.entries().unwrap();
    let result = EntryEditor::open(&repo, 12345, QUIET);
    assert!(matches!(result, Err(EditorError::EntryNotFound(12345))));
}

#[test]
fn deleting_section_from_index_keeps_entries_searchable() {
    let journal = Journal::open_in_memory().unwrap();
    let service = index_service(&journal);
    let section = service.create_section("Recipes").unwrap();
    let id = service.create_entry(Some(section)).unwrap();
    journal
        .entries()
        .unwrap()
        .update_entry(id, "Pancakes", "flour, eggs")
        .unwrap();

    service.delete_section(section).unwrap();
    assert!(journal.sections().unwrap().list_sections().unwrap().is_empty());
    let hits = service.search_entries("PANCAKE").unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].is_free_floating());
}
