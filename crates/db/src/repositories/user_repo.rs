//! Repository for the `users` table.

use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::pagination::PageRequest;
use timetrack_core::passport::PassportId;
use timetrack_core::types::DbId;

use crate::clause::{bind_query, bind_query_as, Assignments, SetClause, WhereClause};
use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};
use crate::DbResult;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, passport_series, passport_number, name, surname, address, \
                       created_at, updated_at";

const ENTITY: &str = "User";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the generated id.
    ///
    /// A duplicate passport pair surfaces as a store error from the
    /// `uq_users_passport` constraint.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> DbResult<DbId> {
        let passport = PassportId::decode(&input.passport)?;

        let mut tx = pool.begin().await?;
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO users (passport_series, passport_number, name, surname, address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&passport.series)
        .bind(&passport.number)
        .bind(&input.name)
        .bind(&input.surname)
        .bind(&input.address)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::debug!(user_id = id, "User created");
        Ok(id)
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<User> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found_by_id(ENTITY, id).into())
    }

    /// Find a user by the `"SERIES NUMBER"` passport identifier.
    pub async fn find_by_passport(pool: &PgPool, identifier: &str) -> DbResult<User> {
        let passport = PassportId::decode(identifier)?;
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE passport_series = $1 AND passport_number = $2"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&passport.series)
            .bind(&passport.number)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CoreError::not_found_by_passport(ENTITY, &passport).into())
    }

    /// List users matching every present filter, one page at a time.
    ///
    /// No match is an empty list, not an error.
    pub async fn list(
        pool: &PgPool,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> DbResult<Vec<User>> {
        let predicate = filter
            .conditions()
            .into_iter()
            .fold(WhereClause::new(), |clause, (column, value)| {
                clause.eq(column, value)
            })
            .paginate(page);

        let query = format!(
            "SELECT {COLUMNS} FROM users {} ORDER BY id {}",
            predicate.where_clause, predicate.pagination
        );
        let users = bind_query_as(sqlx::query_as::<_, User>(&query), &predicate.binds)
            .fetch_all(pool)
            .await?;
        Ok(users)
    }

    /// Delete a user by ID. Fails with `NotFound` if no row was deleted.
    pub async fn delete_by_id(pool: &PgPool, id: DbId) -> DbResult<()> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found_by_id(ENTITY, id).into());
        }
        tx.commit().await?;

        tracing::debug!(user_id = id, "User deleted");
        Ok(())
    }

    /// Delete a user by passport. Fails with `NotFound` if no row was deleted.
    pub async fn delete_by_passport(pool: &PgPool, identifier: &str) -> DbResult<()> {
        let passport = PassportId::decode(identifier)?;

        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "DELETE FROM users WHERE passport_series = $1 AND passport_number = $2",
        )
        .bind(&passport.series)
        .bind(&passport.number)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found_by_passport(ENTITY, &passport).into());
        }
        tx.commit().await?;

        tracing::debug!(%passport, "User deleted");
        Ok(())
    }

    /// Apply a partial update to the user with the given ID.
    ///
    /// Fails with `NoFieldsToUpdate` before touching the store when `input`
    /// sets nothing, and with `NotFound` when no row matched.
    pub async fn update_by_id(pool: &PgPool, id: DbId, input: &UpdateUser) -> DbResult<()> {
        let assignments = Self::assignments(input)?;
        let query = format!(
            "UPDATE users SET {} WHERE id = ${}",
            assignments.clause,
            assignments.next_index()
        );

        let mut tx = pool.begin().await?;
        let result = bind_query(sqlx::query(&query), &assignments.binds)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found_by_id(ENTITY, id).into());
        }
        tx.commit().await?;

        tracing::debug!(user_id = id, "User updated");
        Ok(())
    }

    /// Apply a partial update to the user with the given passport.
    pub async fn update_by_passport(
        pool: &PgPool,
        identifier: &str,
        input: &UpdateUser,
    ) -> DbResult<()> {
        let passport = PassportId::decode(identifier)?;
        let assignments = Self::assignments(input)?;
        let series_idx = assignments.next_index();
        let query = format!(
            "UPDATE users SET {} WHERE passport_series = ${series_idx} AND passport_number = ${}",
            assignments.clause,
            series_idx + 1
        );

        let mut tx = pool.begin().await?;
        let result = bind_query(sqlx::query(&query), &assignments.binds)
            .bind(&passport.series)
            .bind(&passport.number)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found_by_passport(ENTITY, &passport).into());
        }
        tx.commit().await?;

        tracing::debug!(%passport, "User updated");
        Ok(())
    }

    /// Fixed list of patchable columns.
    fn assignments(input: &UpdateUser) -> DbResult<Assignments> {
        let assignments = SetClause::new()
            .set("name", &input.name)
            .set("surname", &input.surname)
            .set("address", &input.address)
            .finish()?;
        Ok(assignments)
    }
}
