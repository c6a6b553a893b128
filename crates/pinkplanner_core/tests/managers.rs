use chrono::{Duration, NaiveDate, TimeZone, Utc};
use pinkplanner_core::service::category_service::{CategoryInput, CategoryService};
use pinkplanner_core::service::event_service::EventService;
use pinkplanner_core::service::habit_service::HabitService;
use pinkplanner_core::service::note_service::NoteService;
use pinkplanner_core::service::task_service::TaskService;
use pinkplanner_core::{
    Clock, CompletionCarry, CompletionLedger, EntityKind, EventInput, FixedClock, HabitInput,
    MemoryStateRepository, NoteInput, ServiceError, StateStore, TaskInput, TaskPriority,
    TaskStatus, ValidationError, NO_CATEGORY_LABEL,
};
use std::collections::HashSet;
use std::rc::Rc;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn fixed_clock() -> Rc<FixedClock> {
    Rc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 5, 6, 8, 30, 0).unwrap(),
        date(2024, 5, 6),
    ))
}

fn store_with(clock: Rc<FixedClock>) -> StateStore<MemoryStateRepository> {
    let clock: Rc<dyn Clock> = clock;
    StateStore::bootstrap(MemoryStateRepository::new(), clock)
}

#[test]
fn created_ids_are_unique_and_immediately_visible() {
    let clock = fixed_clock();
    let mut store = store_with(Rc::clone(&clock));
    let mut tasks = TaskService::new(&mut store);

    let mut ids = HashSet::new();
    for index in 0..5 {
        // Same instant for every create forces the collision path.
        clock.set_now(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
        let task = tasks.create(TaskInput::titled(format!("task {index}"))).unwrap();
        assert!(task.id.starts_with("task_"));
        assert!(ids.insert(task.id.clone()), "duplicate id {}", task.id);
        assert_eq!(tasks.get(&task.id), Some(&task));
    }
    assert_eq!(tasks.list().len(), 5);
}

#[test]
fn task_create_fills_defaults() {
    let mut store = store_with(fixed_clock());
    let task = TaskService::new(&mut store)
        .create(TaskInput::titled("  Water plants  "))
        .unwrap();

    assert_eq!(task.title, "Water plants");
    assert_eq!(task.status, TaskStatus::NotStarted);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert_eq!(task.created_at, task.updated_at);
    assert!(task.due_date.is_none());
}

#[test]
fn blank_title_is_rejected_without_writing() {
    let mut store = store_with(fixed_clock());
    let err = TaskService::new(&mut store)
        .create(TaskInput::titled("   "))
        .unwrap_err();

    assert_eq!(err, ServiceError::Validation(ValidationError::BlankField("title")));
    assert!(store.get().tasks.is_empty());
}

#[test]
fn task_update_reads_back_input_fields() {
    let mut store = store_with(fixed_clock());
    let mut tasks = TaskService::new(&mut store);
    let created = tasks.quick_add("Draft essay").unwrap();

    let input = TaskInput {
        title: "Final essay".to_string(),
        description: "Chapter 2 and 3".to_string(),
        status: Some(TaskStatus::AlmostDone),
        due_date: Some(date(2024, 5, 10)),
        category_id: Some("cat_school".to_string()),
        priority: Some(TaskPriority::High),
    };
    tasks.update(&created.id, input.clone()).unwrap();

    let stored = tasks.get(&created.id).unwrap();
    assert_eq!(stored.title, input.title);
    assert_eq!(stored.description, input.description);
    assert_eq!(Some(stored.status.clone()), input.status);
    assert_eq!(stored.due_date, input.due_date);
    assert_eq!(stored.category_id, input.category_id);
    assert_eq!(Some(stored.priority.clone()), input.priority);
    assert_eq!(stored.created_at, created.created_at);
    assert!(stored.updated_at > created.updated_at);
}

#[test]
fn update_of_missing_task_is_not_found() {
    let mut store = store_with(fixed_clock());
    let err = TaskService::new(&mut store)
        .update("task_404", TaskInput::titled("Ghost"))
        .unwrap_err();

    assert_eq!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Task,
            id: "task_404".to_string()
        }
    );
}

#[test]
fn set_status_str_rejects_unknown_values() {
    let mut store = store_with(fixed_clock());
    let mut tasks = TaskService::new(&mut store);
    let task = tasks.quick_add("Laundry").unwrap();

    let err = tasks.set_status_str(&task.id, "blocked").unwrap_err();
    assert_eq!(
        err,
        ServiceError::Validation(ValidationError::UnknownStatus("blocked".to_string()))
    );
    assert_eq!(tasks.get(&task.id).unwrap().status, TaskStatus::NotStarted);

    let done = tasks.set_status_str(&task.id, "done").unwrap();
    assert_eq!(done.status, TaskStatus::Done);
}

#[test]
fn delete_is_idempotent_for_every_kind() {
    let mut store = store_with(fixed_clock());

    let task = TaskService::new(&mut store).quick_add("Call mom").unwrap();
    assert!(TaskService::new(&mut store).delete(&task.id));
    assert!(!TaskService::new(&mut store).delete(&task.id));
    assert!(TaskService::new(&mut store).get(&task.id).is_none());

    let event = EventService::new(&mut store)
        .create(EventInput::on("Recital", date(2024, 5, 9)))
        .unwrap();
    assert!(EventService::new(&mut store).delete(&event.id));
    assert!(!EventService::new(&mut store).delete(&event.id));

    let note = NoteService::new(&mut store)
        .create(NoteInput {
            title: "Ideas".to_string(),
            ..NoteInput::default()
        })
        .unwrap();
    assert!(NoteService::new(&mut store).delete(&note.id));
    assert!(!NoteService::new(&mut store).delete(&note.id));
    assert!(store.get().notes.is_empty());
}

#[test]
fn habit_toggle_twice_restores_the_day() {
    let mut store = store_with(fixed_clock());
    let mut habits = HabitService::new(&mut store);
    let habit = habits
        .create(HabitInput {
            name: "Drink water".to_string(),
            frequency: "daily".to_string(),
            color: "#a0e7e5".to_string(),
        })
        .unwrap();
    let day = date(2024, 5, 6);

    assert!(habits.toggle_completion(&habit.id, day).unwrap());
    assert!(habits.get(&habit.id).unwrap().is_completed_on(day));
    assert!(!habits.toggle_completion(&habit.id, day).unwrap());
    assert!(!habits.get(&habit.id).unwrap().is_completed_on(day));
}

#[test]
fn habit_update_carries_or_replaces_completions() {
    let mut store = store_with(fixed_clock());
    let mut habits = HabitService::new(&mut store);
    let habit = habits
        .create(HabitInput {
            name: "Read".to_string(),
            frequency: "daily".to_string(),
            color: "#b4f8c8".to_string(),
        })
        .unwrap();
    let day = date(2024, 5, 5);
    habits.toggle_completion(&habit.id, day).unwrap();

    let renamed = HabitInput {
        name: "Read 20 pages".to_string(),
        frequency: "daily".to_string(),
        color: "#b4f8c8".to_string(),
    };
    let carried = habits
        .update(&habit.id, renamed.clone(), CompletionCarry::CarryForward)
        .unwrap();
    assert_eq!(carried.name, "Read 20 pages");
    assert!(carried.is_completed_on(day));

    let replaced = habits
        .update(&habit.id, renamed, CompletionCarry::Replace(CompletionLedger::new()))
        .unwrap();
    assert!(replaced.completions.is_empty());
    assert_eq!(habits.get(&habit.id), Some(&replaced));
}

#[test]
fn toggling_a_missing_habit_is_not_found() {
    let mut store = store_with(fixed_clock());
    let err = HabitService::new(&mut store)
        .toggle_completion("habit_404", date(2024, 5, 6))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            kind: EntityKind::Habit,
            ..
        }
    ));
}

#[test]
fn notes_sort_pinned_first_then_most_recent() {
    let clock = fixed_clock();
    let mut store = store_with(Rc::clone(&clock));
    let mut notes = NoteService::new(&mut store);
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

    clock.set_now(t0);
    let b = notes
        .create(NoteInput {
            title: "B".to_string(),
            pinned: true,
            ..NoteInput::default()
        })
        .unwrap();
    clock.set_now(t0 + Duration::hours(1));
    let a = notes
        .create(NoteInput {
            title: "A".to_string(),
            ..NoteInput::default()
        })
        .unwrap();
    clock.set_now(t0 + Duration::hours(2));
    let c = notes
        .create(NoteInput {
            title: "C".to_string(),
            ..NoteInput::default()
        })
        .unwrap();

    let order: Vec<&str> = notes
        .sorted_for_display()
        .into_iter()
        .map(|note| note.id.as_str())
        .collect();
    assert_eq!(order, vec![b.id.as_str(), c.id.as_str(), a.id.as_str()]);
}

#[test]
fn deleting_a_referenced_category_leaves_the_task_dangling() {
    let mut store = store_with(fixed_clock());
    let mut input = TaskInput::titled("Shift schedule");
    input.category_id = Some("cat_work".to_string());
    let task = TaskService::new(&mut store).create(input).unwrap();

    assert!(CategoryService::new(&mut store).delete("cat_work"));

    let kept = TaskService::new(&mut store).get(&task.id).cloned().unwrap();
    assert_eq!(kept.category_id.as_deref(), Some("cat_work"));
    let categories = CategoryService::new(&mut store);
    assert!(categories.resolve(kept.category_id.as_deref()).is_none());
    assert_eq!(
        categories.label_for(kept.category_id.as_deref()),
        NO_CATEGORY_LABEL
    );
}

#[test]
fn task_queries_follow_due_dates_and_statuses() {
    let mut store = store_with(fixed_clock());
    let mut tasks = TaskService::new(&mut store);
    for (title, day) in [("a", 6), ("b", 7), ("c", 9), ("d", 6)] {
        let mut input = TaskInput::titled(title);
        input.due_date = Some(date(2024, 5, day));
        tasks.create(input).unwrap();
    }
    let done_id = tasks.list()[1].id.clone();
    tasks.set_status(&done_id, TaskStatus::Done).unwrap();

    let due_today: Vec<&str> = tasks
        .due_on(date(2024, 5, 6))
        .into_iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(due_today, vec!["a", "d"]);
    assert_eq!(tasks.in_range(date(2024, 5, 7), date(2024, 5, 9)).len(), 2);
    assert_eq!(tasks.by_status(TaskStatus::Done).len(), 1);

    let counts = tasks.status_counts();
    assert_eq!(counts[0], (TaskStatus::NotStarted, 3));
    assert_eq!(counts[3], (TaskStatus::Done, 1));
}

#[test]
fn toggle_pin_flips_the_flag_and_moves_the_note_up() {
    let clock = fixed_clock();
    let mut store = store_with(Rc::clone(&clock));
    let mut notes = NoteService::new(&mut store);
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

    clock.set_now(t0);
    let older = notes
        .create(NoteInput {
            title: "Older".to_string(),
            ..NoteInput::default()
        })
        .unwrap();
    clock.set_now(t0 + Duration::hours(1));
    let newer = notes
        .create(NoteInput {
            title: "Newer".to_string(),
            ..NoteInput::default()
        })
        .unwrap();
    assert_eq!(notes.sorted_for_display()[0].id, newer.id);

    clock.set_now(t0 + Duration::minutes(30));
    let pinned = notes.toggle_pin(&older.id).unwrap();
    assert!(pinned.pinned);
    assert_eq!(pinned.updated_at, Some(t0 + Duration::minutes(30)));
    assert_eq!(pinned.created_at, older.created_at);
    assert_eq!(notes.sorted_for_display()[0].id, older.id);

    clock.set_now(t0 + Duration::minutes(40));
    let unpinned = notes.toggle_pin(&older.id).unwrap();
    assert!(!unpinned.pinned);
    assert_eq!(notes.sorted_for_display()[0].id, newer.id);
}

#[test]
fn toggle_pin_of_missing_note_is_not_found() {
    let mut store = store_with(fixed_clock());
    let err = NoteService::new(&mut store)
        .toggle_pin("note_0")
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test]
fn notes_with_equal_updated_at_keep_stored_order() {
    let clock = fixed_clock();
    let mut store = store_with(Rc::clone(&clock));
    let mut notes = NoteService::new(&mut store);
    let at = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();

    let mut created = Vec::new();
    for title in ["first", "second", "third"] {
        clock.set_now(at);
        let note = notes
            .create(NoteInput {
                title: title.to_string(),
                ..NoteInput::default()
            })
            .unwrap();
        created.push(note.id);
    }

    let order: Vec<&str> = notes
        .sorted_for_display()
        .into_iter()
        .map(|note| note.title.as_str())
        .collect();
    assert_eq!(order, vec!["first", "second", "third"]);
    assert_eq!(notes.list().len(), created.len());
}

#[test]
fn event_queries_match_exact_day_and_inclusive_range() {
    let mut store = store_with(fixed_clock());
    let mut events = EventService::new(&mut store);
    for (title, day) in [("Dentist", 8), ("Recital", 10), ("Study group", 8), ("Trip", 14)] {
        events
            .create(EventInput::on(title, date(2024, 5, day)))
            .unwrap();
    }

    let on_eighth: Vec<&str> = events
        .on(date(2024, 5, 8))
        .into_iter()
        .map(|event| event.title.as_str())
        .collect();
    assert_eq!(on_eighth, vec!["Dentist", "Study group"]);
    assert!(events.on(date(2024, 5, 9)).is_empty());

    let ranged: Vec<&str> = events
        .in_range(date(2024, 5, 8), date(2024, 5, 10))
        .into_iter()
        .map(|event| event.title.as_str())
        .collect();
    assert_eq!(ranged, vec!["Dentist", "Recital", "Study group"]);
    assert_eq!(events.in_range(date(2024, 5, 14), date(2024, 5, 14)).len(), 1);
    assert!(events.in_range(date(2024, 5, 11), date(2024, 5, 13)).is_empty());
}

#[test]
fn habit_delete_removes_once() {
    let mut store = store_with(fixed_clock());
    let habit = HabitService::new(&mut store)
        .create(HabitInput {
            name: "Stretch".to_string(),
            frequency: "daily".to_string(),
            color: "#ffaebc".to_string(),
        })
        .unwrap();

    assert!(HabitService::new(&mut store).delete(&habit.id));
    assert!(!HabitService::new(&mut store).delete(&habit.id));
    assert!(HabitService::new(&mut store).get(&habit.id).is_none());
    assert!(store.get().habits.is_empty());
}

#[test]
fn blank_category_name_is_rejected_without_writing() {
    let mut store = store_with(fixed_clock());
    let err = CategoryService::new(&mut store)
        .create(CategoryInput::new("  ", "var(--pink-accent)"))
        .unwrap_err();

    assert_eq!(err, ServiceError::Validation(ValidationError::BlankField("name")));
    assert_eq!(store.get().categories.len(), 3);
}
