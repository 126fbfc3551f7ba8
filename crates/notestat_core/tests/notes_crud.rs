use notestat_core::db::open_db_in_memory;
use notestat_core::{
    NoteDraft, NoteRepository, NoteService, NoteServiceError, NoteValidationError,
    SqliteNoteRepository, Tag,
};
use rusqlite::params;

const ALICE: &str = "user-alice";
const BOB: &str = "user-bob";

#[test]
fn create_persists_full_note_with_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let created = service
        .create_note(
            ALICE,
            NoteDraft::new(
                "My first note",
                "note is just a note",
                [Tag::Business, Tag::Important],
            ),
        )
        .unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(created.user_id, ALICE);
    assert_eq!(created.title, "My first note");
    assert_eq!(created.text, "note is just a note");
    assert!(created.created_at > 0);
    assert!(created.tags.contains(&Tag::Business));
    assert!(created.tags.contains(&Tag::Important));

    let json = serde_json::to_value(&created).unwrap();
    assert_eq!(json["tags"], serde_json::json!(["BUSINESS", "IMPORTANT"]));
}

#[test]
fn create_rejects_blank_fields_without_persisting() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut service = NoteService::new(repo);

        let err = service
            .create_note(ALICE, NoteDraft::new("   ", "text", [Tag::Business]))
            .unwrap_err();
        assert!(matches!(
            err,
            NoteServiceError::Validation(NoteValidationError::BlankTitle)
        ));

        let err = service
            .create_note(ALICE, NoteDraft::new("Title", "   ", []))
            .unwrap_err();
        assert!(matches!(
            err,
            NoteServiceError::Validation(NoteValidationError::BlankText)
        ));

        let err = service
            .create_note(" ", NoteDraft::new("Title", "text", []))
            .unwrap_err();
        assert!(matches!(
            err,
            NoteServiceError::Validation(NoteValidationError::BlankUserId)
        ));
    }

    assert_eq!(note_count(&conn), 0);
}

#[test]
fn update_replaces_title_text_and_tags_wholesale() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    let created = service
        .create_note(ALICE, NoteDraft::new("old", "old text", [Tag::Personal]))
        .unwrap();

    let updated = service
        .update_note(
            ALICE,
            &created.id,
            NoteDraft::new("new", "new text", [Tag::Business]),
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_id, ALICE);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.title, "new");
    assert_eq!(updated.text, "new text");
    assert_eq!(updated.tags.into_iter().collect::<Vec<_>>(), vec![Tag::Business]);

    let cleared = service
        .update_note(ALICE, &created.id, NoteDraft::new("new", "new text", []))
        .unwrap();
    assert!(cleared.tags.is_empty());
}

#[test]
fn update_and_delete_missing_note_return_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);

    let err = service
        .update_note(ALICE, "missing-id", NoteDraft::new("t", "x", []))
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(ref id) if id == "missing-id"));

    let err = service.delete_note(ALICE, "missing-id").unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(_)));

    let err = service.get_note_text(ALICE, "missing-id").unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(_)));

    let err = service.get_note_stats(ALICE, "missing-id").unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(_)));
}

#[test]
fn delete_removes_note_and_its_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
        let mut service = NoteService::new(repo);
        let created = service
            .create_note(ALICE, NoteDraft::new("t", "text", [Tag::Important]))
            .unwrap();
        service.delete_note(ALICE, &created.id).unwrap();
        created.id
    };

    assert_eq!(note_count(&conn), 0);
    let tag_rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM note_tags WHERE note_id = ?1;",
            params![id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tag_rows, 0);
}

#[test]
fn text_view_returns_only_text_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    let created = service
        .create_note(ALICE, NoteDraft::new("t", "note is just a note", []))
        .unwrap();

    let text = service.get_note_text(ALICE, &created.id).unwrap();
    assert_eq!(text.id, created.id);
    assert_eq!(text.text, "note is just a note");

    let json = serde_json::to_value(&text).unwrap();
    assert!(json.get("title").is_none());
    assert!(json.get("createdDate").is_none());
    assert_eq!(json["userId"], serde_json::json!(ALICE));
}

#[test]
fn other_users_cannot_see_or_touch_a_note() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let mut service = NoteService::new(repo);
    let created = service
        .create_note(ALICE, NoteDraft::new("private", "alice only", [Tag::Personal]))
        .unwrap();

    let missing = service
        .update_note(BOB, "no-such-note", NoteDraft::new("t", "x", []))
        .unwrap_err();
    let foreign = service
        .update_note(BOB, &created.id, NoteDraft::new("hijack", "x", []))
        .unwrap_err();
    assert!(matches!(foreign, NoteServiceError::NoteNotFound(_)));
    // Same variant and message shape for "missing" and "not mine".
    assert_eq!(
        missing.to_string().replace("no-such-note", "<id>"),
        foreign.to_string().replace(created.id.as_str(), "<id>")
    );

    assert!(matches!(
        service.get_note_text(BOB, &created.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));
    assert!(matches!(
        service.get_note_stats(BOB, &created.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));
    assert!(matches!(
        service.delete_note(BOB, &created.id),
        Err(NoteServiceError::NoteNotFound(_))
    ));

    let untouched = service.get_note_text(ALICE, &created.id).unwrap();
    assert_eq!(untouched.text, "alice only");

    let repo = service.into_inner();
    assert!(repo.find_one(&created.id, BOB).unwrap().is_none());
    let own = repo.find_one(&created.id, ALICE).unwrap().unwrap();
    assert_eq!(own.title, "private");
}

fn note_count(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap()
}
