//! User record queries
//!
//! Every read renders a `UserQuery` into exactly one `SELECT`. Projections
//! and the find-first limit are part of the SQL, so only the requested
//! columns and rows leave the database.

use chrono::NaiveDateTime;
use roster_core::{
    error::Result,
    filter::UserFilter,
    query::UserQuery,
    types::{GenderCode, NewUser, RecordId, User, UserContact},
    RosterError,
};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

const USER_COLUMNS: &str = "id, user_id, name, mail, city, gender, is_active, registered_at";

const CONTACT_COLUMNS: &str = "name, mail";

/// Rows per multi-row INSERT; 7 binds per row stays well below SQLite's
/// 32766 bound-parameter limit.
const INSERT_CHUNK_ROWS: usize = 500;

#[derive(Debug, FromRow)]
struct UserRow {
    id: RecordId,
    user_id: i64,
    name: String,
    mail: String,
    city: String,
    gender: GenderCode,
    is_active: bool,
    registered_at: NaiveDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            mail: row.mail,
            city: row.city,
            gender: row.gender,
            is_active: row.is_active,
            registered_at: row.registered_at,
        }
    }
}

/// Append `filter` as a SQL boolean expression
fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &UserFilter) {
    match filter {
        UserFilter::Active => {
            builder.push("is_active = 1");
        }
        UserFilter::Gender(code) => {
            builder.push("gender = ").push_bind(*code);
        }
        UserFilter::RegisteredSince(since) => {
            builder.push("registered_at >= ").push_bind(*since);
        }
        UserFilter::ExternalId(user_id) => {
            builder.push("user_id = ").push_bind(*user_id);
        }
        UserFilter::All(terms) if terms.is_empty() => {
            builder.push("1 = 1");
        }
        UserFilter::All(terms) => {
            builder.push("(");
            for (i, term) in terms.iter().enumerate() {
                if i > 0 {
                    builder.push(" AND ");
                }
                push_filter(builder, term);
            }
            builder.push(")");
        }
    }
}

/// `SELECT <columns> FROM users [WHERE ...] ORDER BY id`
fn select(columns: &str, query: &UserQuery) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new(format!("SELECT {columns} FROM users"));

    let predicate = query.predicate();
    if !predicate.is_trivial() {
        builder.push(" WHERE ");
        push_filter(&mut builder, &predicate);
    }
    builder.push(" ORDER BY id");

    builder
}

/// Materialize every record matching `query`
pub async fn get_matching(pool: &SqlitePool, query: &UserQuery) -> Result<Vec<User>> {
    let mut builder = select(USER_COLUMNS, query);
    let rows = builder
        .build_query_as::<UserRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(User::from).collect())
}

/// Materialize the name/mail projection of every record matching `query`
///
/// Only the two projected columns are selected.
pub async fn get_contacts(pool: &SqlitePool, query: &UserQuery) -> Result<Vec<UserContact>> {
    let mut builder = select(CONTACT_COLUMNS, query);
    let rows = builder
        .build_query_as::<(String, String)>()
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(name, mail)| UserContact { name, mail })
        .collect())
}

/// First record matching `query` (`LIMIT 1`)
pub async fn find_first(pool: &SqlitePool, query: &UserQuery) -> Result<Option<User>> {
    let mut builder = select(USER_COLUMNS, query);
    builder.push(" LIMIT 1");

    let row = builder
        .build_query_as::<UserRow>()
        .fetch_optional(pool)
        .await?;

    Ok(row.map(User::from))
}

/// Get a record by primary key
pub async fn get_by_id(pool: &SqlitePool, id: RecordId) -> Result<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

/// Count all records
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Insert every record inside one transaction and commit once
///
/// Rows are written with multi-row `INSERT` statements. If any row is
/// rejected the transaction is dropped and rolled back, so nothing from the
/// batch is persisted.
pub async fn create_many(pool: &SqlitePool, users: &[NewUser]) -> Result<u64> {
    if users.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for chunk in users.chunks(INSERT_CHUNK_ROWS) {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO users (user_id, name, mail, city, gender, is_active, registered_at) ",
        );
        builder.push_values(chunk, |mut row, user| {
            row.push_bind(user.user_id)
                .push_bind(user.name.clone())
                .push_bind(user.mail.clone())
                .push_bind(user.city.clone())
                .push_bind(user.gender)
                .push_bind(user.is_active)
                .push_bind(user.registered_at);
        });

        inserted += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    tracing::debug!(inserted, "bulk insert committed");

    Ok(inserted)
}

/// Insert one record
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    let result = sqlx::query(
        "INSERT INTO users (user_id, name, mail, city, gender, is_active, registered_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.user_id)
    .bind(&user.name)
    .bind(&user.mail)
    .bind(&user.city)
    .bind(user.gender)
    .bind(user.is_active)
    .bind(user.registered_at)
    .execute(pool)
    .await?;

    Ok(user.into_user(RecordId::new(result.last_insert_rowid())))
}

/// Overwrite every column of an existing record
pub async fn update(pool: &SqlitePool, id: RecordId, user: NewUser) -> Result<User> {
    let result = sqlx::query(
        "UPDATE users
         SET user_id = ?, name = ?, mail = ?, city = ?, gender = ?, is_active = ?, registered_at = ?
         WHERE id = ?",
    )
    .bind(user.user_id)
    .bind(&user.name)
    .bind(&user.mail)
    .bind(&user.city)
    .bind(user.gender)
    .bind(user.is_active)
    .bind(user.registered_at)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RosterError::not_found("User", id.to_string()));
    }

    Ok(user.into_user(id))
}

/// Delete a record
pub async fn delete(pool: &SqlitePool, id: RecordId) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RosterError::not_found("User", id.to_string()));
    }

    Ok(())
}
