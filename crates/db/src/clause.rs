//! Dynamic `WHERE` and `SET` clause construction.
//!
//! Both builders take column names as `&'static str` from a fixed list owned
//! by the calling repository and never splice caller values into SQL text.
//! Every value becomes a `$n` placeholder plus an entry in an ordered bind
//! list, and `n` always equals the entry's 1-based position in that list.

use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryAs};
use sqlx::Postgres;
use timetrack_core::error::CoreError;
use timetrack_core::pagination::PageRequest;
use timetrack_core::patch::Patch;

/// A value bound to one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    /// Nullable text column.
    Text(Option<String>),
    BigInt(i64),
}

// ---------------------------------------------------------------------------
// WHERE
// ---------------------------------------------------------------------------

/// Accumulates `column = $n` equality predicates joined with `AND`.
#[derive(Debug, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = $n` when `value` is present and non-empty.
    ///
    /// Absent and empty values add nothing: no `IS NULL`, no wildcard.
    pub fn eq(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let idx = self.binds.len() + 1;
            self.conditions.push(format!("{column} = ${idx}"));
            self.binds.push(BindValue::Text(Some(value.to_string())));
        }
        self
    }

    /// Finish the clause and append the `LIMIT` / `OFFSET` binds.
    pub fn paginate(mut self, page: &PageRequest) -> Predicate {
        let where_clause = if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        };

        let limit_idx = self.binds.len() + 1;
        let pagination = format!("LIMIT ${limit_idx} OFFSET ${}", limit_idx + 1);
        self.binds.push(BindValue::BigInt(page.limit()));
        self.binds.push(BindValue::BigInt(page.offset()));

        Predicate {
            where_clause,
            pagination,
            binds: self.binds,
        }
    }
}

/// A finished filter: SQL fragments plus the binds they reference, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    /// `WHERE a = $1 AND b = $2`, or empty when nothing is filtered.
    pub where_clause: String,
    /// `LIMIT $n OFFSET $n+1`.
    pub pagination: String,
    /// Filter values followed by limit and offset.
    pub binds: Vec<BindValue>,
}

// ---------------------------------------------------------------------------
// SET
// ---------------------------------------------------------------------------

/// Accumulates `column = $n` assignments for an `UPDATE`.
#[derive(Debug, Default)]
pub struct SetClause {
    assignments: Vec<String>,
    binds: Vec<BindValue>,
}

impl SetClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `column` when the patch field is [`Patch::Set`].
    ///
    /// `Set(None)` writes NULL; `Absent` leaves the column out.
    pub fn set(mut self, column: &'static str, value: &Patch<Option<String>>) -> Self {
        if let Patch::Set(value) = value {
            let idx = self.binds.len() + 1;
            self.assignments.push(format!("{column} = ${idx}"));
            self.binds.push(BindValue::Text(value.clone()));
        }
        self
    }

    /// Finish the clause. Fails with [`CoreError::NoFieldsToUpdate`] when
    /// nothing was assigned.
    pub fn finish(self) -> Result<Assignments, CoreError> {
        if self.assignments.is_empty() {
            return Err(CoreError::NoFieldsToUpdate);
        }
        Ok(Assignments {
            clause: self.assignments.join(", "),
            binds: self.binds,
        })
    }
}

/// A finished, non-empty `SET` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignments {
    /// `a = $1, b = $2`.
    pub clause: String,
    pub binds: Vec<BindValue>,
}

impl Assignments {
    /// Placeholder index for the first bind after the assignments, used by
    /// the `WHERE` part of the statement.
    pub fn next_index(&self) -> usize {
        self.binds.len() + 1
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Bind `binds` in order onto a statement.
pub fn bind_query<'q>(
    query: Query<'q, Postgres, PgArguments>,
    binds: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    binds.iter().fold(query, |q, value| match value {
        BindValue::Text(v) => q.bind(v.as_deref()),
        BindValue::BigInt(v) => q.bind(*v),
    })
}

/// Bind `binds` in order onto a typed row query.
pub fn bind_query_as<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    binds: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    binds.iter().fold(query, |q, value| match value {
        BindValue::Text(v) => q.bind(v.as_deref()),
        BindValue::BigInt(v) => q.bind(*v),
    })
}
