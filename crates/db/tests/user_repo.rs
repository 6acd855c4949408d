//! Integration tests for `UserRepo`.
//!
//! Exercises the repository against a real database:
//! - Passport lifecycle (create, fetch, update, delete)
//! - Filtered and paginated listing
//! - Unique passport constraint
//! - NotFound / NoFieldsToUpdate / InvalidIdentifierFormat paths
//! - Rollback when an operation is cancelled

use std::time::Duration;

use assert_matches::assert_matches;
use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::pagination::PageRequest;
use timetrack_core::patch::Patch;
use timetrack_db::models::user::{CreateUser, UpdateUser, UserFilter};
use timetrack_db::repositories::UserRepo;
use timetrack_db::DbError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(passport: &str, name: &str) -> CreateUser {
    CreateUser {
        passport: passport.to_string(),
        name: Some(name.to_string()),
        surname: None,
        address: None,
    }
}

fn set(value: &str) -> Patch<Option<String>> {
    Patch::Set(Some(value.to_string()))
}

async fn count_users(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: passport lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_passport_lifecycle(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("1234 567890", "Ann"))
        .await
        .unwrap();

    let user = UserRepo::find_by_passport(&pool, "1234 567890")
        .await
        .unwrap();
    assert_eq!(user.id, id);
    assert_eq!(user.passport_series, "1234");
    assert_eq!(user.passport_number, "567890");
    assert_eq!(user.passport(), "1234 567890");
    assert_eq!(user.name.as_deref(), Some("Ann"));

    let patch = UpdateUser {
        surname: set("Lee"),
        ..Default::default()
    };
    UserRepo::update_by_passport(&pool, "1234 567890", &patch)
        .await
        .unwrap();

    let user = UserRepo::find_by_passport(&pool, "1234 567890")
        .await
        .unwrap();
    assert_eq!(user.surname.as_deref(), Some("Lee"));
    assert_eq!(user.name.as_deref(), Some("Ann"));

    UserRepo::delete_by_passport(&pool, "1234 567890")
        .await
        .unwrap();

    let err = UserRepo::find_by_passport(&pool, "1234 567890")
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "User", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_id(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("4510 000001", "Bob"))
        .await
        .unwrap();

    let user = UserRepo::find_by_id(&pool, id).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Bob"));
    assert!(user.surname.is_none());

    let err = UserRepo::find_by_id(&pool, id + 1000).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Test: unique passport constraint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_passport_is_store_error(pool: PgPool) {
    let first = UserRepo::create(&pool, &new_user("1111 222222", "First"))
        .await
        .unwrap();

    let err = UserRepo::create(&pool, &new_user("1111 222222", "Second"))
        .await
        .unwrap_err();
    match err {
        DbError::Store(sqlx::Error::Database(db_err)) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_users_passport"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }

    let user = UserRepo::find_by_id(&pool, first).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("First"));
    assert_eq!(count_users(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_series_different_number_is_allowed(pool: PgPool) {
    UserRepo::create(&pool, &new_user("1111 000001", "A"))
        .await
        .unwrap();
    UserRepo::create(&pool, &new_user("1111 000002", "B"))
        .await
        .unwrap();
    assert_eq!(count_users(&pool).await, 2);
}

// ---------------------------------------------------------------------------
// Test: malformed identifiers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_passport_is_rejected_everywhere(pool: PgPool) {
    let err = UserRepo::create(&pool, &new_user("1234567890", "Ann"))
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::InvalidIdentifierFormat(_)));

    let err = UserRepo::find_by_passport(&pool, "").await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::InvalidIdentifierFormat(_)));

    let err = UserRepo::delete_by_passport(&pool, "12 34 56").await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::InvalidIdentifierFormat(_)));

    let patch = UpdateUser {
        name: set("X"),
        ..Default::default()
    };
    let err = UserRepo::update_by_passport(&pool, "1234 ", &patch)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::InvalidIdentifierFormat(_)));

    assert_eq!(count_users(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Test: updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_with_empty_patch_fails(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("2222 333333", "Ann"))
        .await
        .unwrap();

    let err = UserRepo::update_by_id(&pool, id, &UpdateUser::default())
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NoFieldsToUpdate));

    let err = UserRepo::update_by_passport(&pool, "2222 333333", &UpdateUser::default())
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NoFieldsToUpdate));

    let user = UserRepo::find_by_id(&pool, id).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Ann"));
    assert_eq!(user.created_at, user.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_by_id_sets_and_clears(pool: PgPool) {
    let id = UserRepo::create(
        &pool,
        &CreateUser {
            passport: "3333 444444".to_string(),
            name: Some("Ann".to_string()),
            surname: Some("Old".to_string()),
            address: Some("Somewhere".to_string()),
        },
    )
    .await
    .unwrap();

    let patch = UpdateUser {
        name: set("Anna"),
        surname: Patch::Absent,
        address: Patch::Set(None),
    };
    UserRepo::update_by_id(&pool, id, &patch).await.unwrap();

    let user = UserRepo::find_by_id(&pool, id).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Anna"));
    assert_eq!(user.surname.as_deref(), Some("Old"));
    assert!(user.address.is_none());
    assert!(user.updated_at >= user.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_id_is_not_found(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("5555 666666", "Ann"))
        .await
        .unwrap();

    let patch = UpdateUser {
        name: set("Ghost"),
        ..Default::default()
    };
    let err = UserRepo::update_by_id(&pool, id + 1000, &patch)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { .. }));

    let err = UserRepo::update_by_passport(&pool, "0000 000000", &patch)
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { .. }));

    let user = UserRepo::find_by_id(&pool, id).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Ann"));
    assert_eq!(count_users(&pool).await, 1);
}

// ---------------------------------------------------------------------------
// Test: deletes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_by_id(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("7777 888888", "Ann"))
        .await
        .unwrap();
    let other = UserRepo::create(&pool, &new_user("7777 888889", "Bob"))
        .await
        .unwrap();

    UserRepo::delete_by_id(&pool, id).await.unwrap();

    let err = UserRepo::find_by_id(&pool, id).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { .. }));
    assert!(UserRepo::find_by_id(&pool, other).await.is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_is_not_found(pool: PgPool) {
    UserRepo::create(&pool, &new_user("7777 000000", "Ann"))
        .await
        .unwrap();

    let err = UserRepo::delete_by_id(&pool, 999_999).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { .. }));

    let err = UserRepo::delete_by_passport(&pool, "7777 000001")
        .await
        .unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { .. }));

    assert_eq!(count_users(&pool).await, 1);
}

// ---------------------------------------------------------------------------
// Test: listing
// ---------------------------------------------------------------------------

async fn seed(pool: &PgPool) {
    let rows = [
        ("1000 000001", "Ann", "Lee", "Main St"),
        ("1000 000002", "Ann", "Kim", "Main St"),
        ("2000 000003", "Bob", "Lee", "Main St"),
        ("2000 000004", "Cat", "Lee", "Side St"),
    ];
    for (passport, name, surname, address) in rows {
        UserRepo::create(
            pool,
            &CreateUser {
                passport: passport.to_string(),
                name: Some(name.to_string()),
                surname: Some(surname.to_string()),
                address: Some(address.to_string()),
            },
        )
        .await
        .unwrap();
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_without_filters_returns_all(pool: PgPool) {
    seed(&pool).await;
    let users = UserRepo::list(&pool, &UserFilter::default(), &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(users.len(), 4);
    assert!(users.windows(2).all(|w| w[0].id < w[1].id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_one_filter(pool: PgPool) {
    seed(&pool).await;

    let filter = UserFilter {
        surname: Some("Lee".to_string()),
        ..Default::default()
    };
    let users = UserRepo::list(&pool, &filter, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.surname.as_deref() == Some("Lee")));

    let filter = UserFilter {
        passport_series: Some("2000".to_string()),
        ..Default::default()
    };
    let users = UserRepo::list(&pool, &filter, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(users.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_with_all_filters_intersects(pool: PgPool) {
    seed(&pool).await;

    let filter = UserFilter {
        passport_series: Some("1000".to_string()),
        passport_number: Some("000001".to_string()),
        name: Some("Ann".to_string()),
        surname: Some("Lee".to_string()),
        address: Some("Main St".to_string()),
    };
    let users = UserRepo::list(&pool, &filter, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].passport(), "1000 000001");

    let filter = UserFilter {
        name: Some("Ann".to_string()),
        surname: Some("Lee".to_string()),
        address: Some("Side St".to_string()),
        ..Default::default()
    };
    let users = UserRepo::list(&pool, &filter, &PageRequest::default())
        .await
        .unwrap();
    assert!(users.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_ignores_empty_filter_values(pool: PgPool) {
    seed(&pool).await;
    let filter = UserFilter {
        name: Some(String::new()),
        address: Some(String::new()),
        ..Default::default()
    };
    let users = UserRepo::list(&pool, &filter, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(users.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_no_match_is_empty_not_error(pool: PgPool) {
    seed(&pool).await;
    let filter = UserFilter {
        name: Some("Nobody".to_string()),
        ..Default::default()
    };
    let users = UserRepo::list(&pool, &filter, &PageRequest::default())
        .await
        .unwrap();
    assert!(users.is_empty());
}

// Page 1 must start at the first row: the page size is not reused as offset.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_pagination_offsets_by_page(pool: PgPool) {
    seed(&pool).await;
    let all = UserRepo::list(&pool, &UserFilter::default(), &PageRequest::default())
        .await
        .unwrap();

    let first = UserRepo::list(
        &pool,
        &UserFilter::default(),
        &PageRequest::new(1, 3).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(first, all[..3].to_vec());

    let second = UserRepo::list(
        &pool,
        &UserFilter::default(),
        &PageRequest::new(2, 3).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(second, all[3..].to_vec());

    let past_end = UserRepo::list(
        &pool,
        &UserFilter::default(),
        &PageRequest::new(3, 3).unwrap(),
    )
    .await
    .unwrap();
    assert!(past_end.is_empty());
}

// ---------------------------------------------------------------------------
// Test: cancellation
// ---------------------------------------------------------------------------

/// Run `op` while another transaction holds `FOR UPDATE` on user `id`, and
/// cancel it by timeout once it is seen waiting on that lock.
///
/// Returns whether the operation's statement was observed blocked, which
/// means it had already opened its own transaction when it was dropped.
async fn cancel_while_row_locked<F>(
    pool: &PgPool,
    id: i64,
    statement_prefix: &str,
    op: F,
) -> bool
where
    F: std::future::Future,
{
    let mut lock_tx = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_one(&mut *lock_tx)
        .await
        .unwrap();

    let pattern = format!("{statement_prefix}%");
    let observe_wait = async {
        for _ in 0..40 {
            let waiting: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM pg_stat_activity \
                 WHERE datname = current_database() \
                   AND wait_event_type = 'Lock' \
                   AND query LIKE $1",
            )
            .bind(&pattern)
            .fetch_one(pool)
            .await
            .unwrap();
            if waiting > 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    };

    let (outcome, observed) = tokio::join!(
        tokio::time::timeout(Duration::from_millis(600), op),
        observe_wait
    );
    assert!(outcome.is_err(), "operation should still be blocked when cancelled");

    lock_tx.rollback().await.unwrap();
    // Give a dropped-but-uncommitted statement time to proceed past the lock.
    tokio::time::sleep(Duration::from_millis(100)).await;
    observed
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelled_update_rolls_back(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("9999 000000", "Ann"))
        .await
        .unwrap();

    let patch = UpdateUser {
        name: set("Changed"),
        surname: set("Changed"),
        ..Default::default()
    };
    let update = UserRepo::update_by_id(&pool, id, &patch);
    let observed = cancel_while_row_locked(&pool, id, "UPDATE users", update).await;
    assert!(observed, "update never reached its own transaction");

    let user = UserRepo::find_by_id(&pool, id).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Ann"));
    assert!(user.surname.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancelled_delete_keeps_row(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("9999 000001", "Ann"))
        .await
        .unwrap();

    let delete = UserRepo::delete_by_id(&pool, id);
    let observed = cancel_while_row_locked(&pool, id, "DELETE FROM users", delete).await;
    assert!(observed, "delete never reached its own transaction");

    let user = UserRepo::find_by_id(&pool, id).await.unwrap();
    assert_eq!(user.id, id);
    assert_eq!(count_users(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completed_update_survives_later_cancellation(pool: PgPool) {
    let id = UserRepo::create(&pool, &new_user("9999 000002", "Ann"))
        .await
        .unwrap();

    let first = UpdateUser {
        name: set("First"),
        ..Default::default()
    };
    tokio::time::timeout(Duration::from_secs(5), UserRepo::update_by_id(&pool, id, &first))
        .await
        .expect("update should finish well inside the timeout")
        .unwrap();

    let second = UpdateUser {
        name: set("Second"),
        address: set("Elsewhere"),
        ..Default::default()
    };
    let update = UserRepo::update_by_id(&pool, id, &second);
    let observed = cancel_while_row_locked(&pool, id, "UPDATE users", update).await;
    assert!(observed);

    let user = UserRepo::find_by_id(&pool, id).await.unwrap();
    assert_eq!(user.name.as_deref(), Some("First"));
    assert!(user.address.is_none());
}
