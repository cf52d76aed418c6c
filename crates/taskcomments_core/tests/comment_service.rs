use rusqlite::Connection;
use taskcomments_core::db::open_db_in_memory;
use taskcomments_core::{
    CommentService, CommentServiceError, CommentValidationError, FieldUpdate,
    SqliteCommentRepository, SqliteTaskRepository, TaskId, TaskService, TaskServiceError,
};

fn comment_service(conn: &Connection) -> CommentService<SqliteCommentRepository<'_>> {
    CommentService::new(SqliteCommentRepository::try_new(conn).unwrap())
}

fn create_task(conn: &Connection, title: &str) -> TaskId {
    TaskService::new(SqliteTaskRepository::try_new(conn).unwrap())
        .create_task(Some(title))
        .unwrap()
        .id
}

#[test]
fn create_trims_body_and_author() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "Test Task");
    let service = comment_service(&conn);

    let created = service
        .create_comment(task_id, Some("  This is a comment \n"), Some("  Yug "))
        .unwrap();
    assert_eq!(created.task_id, task_id);
    assert_eq!(created.body, "This is a comment");
    assert_eq!(created.author.as_deref(), Some("Yug"));
}

#[test]
fn create_normalizes_blank_author_to_none() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);

    let created = service.create_comment(task_id, Some("hi"), Some("   ")).unwrap();
    assert_eq!(created.author, None);
}

#[test]
fn create_rejects_blank_body_before_task_lookup() {
    let conn = open_db_in_memory().unwrap();
    let service = comment_service(&conn);

    let err = service.create_comment(404, Some(" \t "), None).unwrap_err();
    assert!(matches!(
        err,
        CommentServiceError::Validation(CommentValidationError::BodyEmpty)
    ));

    let err = service.create_comment(404, None, Some("Yug")).unwrap_err();
    assert!(matches!(
        err,
        CommentServiceError::Validation(CommentValidationError::BodyRequired)
    ));
}

#[test]
fn create_on_missing_task_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = comment_service(&conn);

    let err = service.create_comment(404, Some("hi"), None).unwrap_err();
    assert!(matches!(err, CommentServiceError::TaskNotFound(404)));
}

#[test]
fn create_rejects_overlong_author() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);

    let author = "x".repeat(129);
    let err = service
        .create_comment(task_id, Some("hi"), Some(&author))
        .unwrap_err();
    assert!(matches!(
        err,
        CommentServiceError::Validation(CommentValidationError::AuthorTooLong { .. })
    ));
}

#[test]
fn list_returns_empty_for_task_without_comments_and_not_found_for_missing_task() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);

    assert!(service.list_comments(task_id).unwrap().is_empty());
    assert!(matches!(
        service.list_comments(task_id + 1),
        Err(CommentServiceError::TaskNotFound(_))
    ));
}

#[test]
fn list_returns_comments_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);

    for body in ["first", "second", "third"] {
        service.create_comment(task_id, Some(body), None).unwrap();
    }

    let listed = service.list_comments(task_id).unwrap();
    let bodies: Vec<_> = listed.iter().map(|comment| comment.body.as_str()).collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at <= pair[1].created_at));
}

#[test]
fn update_with_body_persists_on_later_fetch() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);
    let created = service.create_comment(task_id, Some("initial"), Some("Yug")).unwrap();

    let updated = service
        .update_comment(created.id, FieldUpdate::Set(" updated ".into()), FieldUpdate::Keep)
        .unwrap();
    assert_eq!(updated.body, "updated");
    assert_eq!(updated.author.as_deref(), Some("Yug"));

    let fetched = service.get_comment(created.id).unwrap();
    assert_eq!(fetched.body, "updated");
}

#[test]
fn update_without_body_leaves_body_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);
    let created = service.create_comment(task_id, Some("keep"), Some("Yug")).unwrap();

    let updated = service
        .update_comment(created.id, FieldUpdate::Keep, FieldUpdate::Set("Ana".into()))
        .unwrap();
    assert_eq!(updated.body, "keep");
    assert_eq!(updated.author.as_deref(), Some("Ana"));
}

#[test]
fn update_author_precedence_rules() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);
    let created = service.create_comment(task_id, Some("b"), Some("Yug")).unwrap();

    let kept = service
        .update_comment(created.id, FieldUpdate::Set("b2".into()), FieldUpdate::Keep)
        .unwrap();
    assert_eq!(kept.author.as_deref(), Some("Yug"));

    let blank = service
        .update_comment(created.id, FieldUpdate::Keep, FieldUpdate::Set("  ".into()))
        .unwrap();
    assert_eq!(blank.author, None);

    service
        .update_comment(created.id, FieldUpdate::Keep, FieldUpdate::Set("Ana".into()))
        .unwrap();
    let cleared = service
        .update_comment(created.id, FieldUpdate::Keep, FieldUpdate::Clear)
        .unwrap();
    assert_eq!(cleared.author, None);
}

#[test]
fn update_rejects_null_or_blank_body() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);
    let created = service.create_comment(task_id, Some("text"), None).unwrap();

    assert!(matches!(
        service.update_comment(created.id, FieldUpdate::Clear, FieldUpdate::Keep),
        Err(CommentServiceError::Validation(CommentValidationError::BodyRequired))
    ));
    assert!(matches!(
        service.update_comment(created.id, FieldUpdate::Set("   ".into()), FieldUpdate::Keep),
        Err(CommentServiceError::Validation(CommentValidationError::BodyEmpty))
    ));
    assert_eq!(service.get_comment(created.id).unwrap().body, "text");
}

#[test]
fn update_missing_comment_is_not_found_even_with_invalid_payload() {
    let conn = open_db_in_memory().unwrap();
    let service = comment_service(&conn);

    assert!(matches!(
        service.update_comment(9, FieldUpdate::Set("  ".into()), FieldUpdate::Keep),
        Err(CommentServiceError::CommentNotFound(9))
    ));
}

#[test]
fn delete_twice_reports_not_found_the_second_time() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);
    let created = service.create_comment(task_id, Some("to delete"), None).unwrap();

    service.delete_comment(created.id).unwrap();
    assert!(matches!(
        service.delete_comment(created.id),
        Err(CommentServiceError::CommentNotFound(id)) if id == created.id
    ));
    assert!(matches!(
        service.get_comment(created.id),
        Err(CommentServiceError::CommentNotFound(_))
    ));
}

#[test]
fn storage_failure_surfaces_as_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let task_id = create_task(&conn, "t");
    let service = comment_service(&conn);
    let created = service.create_comment(task_id, Some("safe"), None).unwrap();

    conn.execute_batch(
        "CREATE TRIGGER fail_comment_updates BEFORE UPDATE OF body ON comments
         BEGIN SELECT RAISE(ABORT, 'disk on fire'); END;",
    )
    .unwrap();

    let err = service
        .update_comment(created.id, FieldUpdate::Set("lost".into()), FieldUpdate::Keep)
        .unwrap_err();
    assert!(matches!(err, CommentServiceError::Storage(_)));
    assert_eq!(service.get_comment(created.id).unwrap().body, "safe");
}

#[test]
fn task_service_rejects_blank_title_and_missing_task() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.create_task(Some("  ")),
        Err(TaskServiceError::Validation(_))
    ));
    assert!(matches!(
        service.get_task(3),
        Err(TaskServiceError::TaskNotFound(3))
    ));
    assert!(matches!(
        service.delete_task(3),
        Err(TaskServiceError::TaskNotFound(3))
    ));
}
