/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     phone VARCHAR(255) NOT NULL UNIQUE,
///     birth_date DATE,
///     gender VARCHAR(255) NOT NULL DEFAULT '',
///     about TEXT NOT NULL DEFAULT '',
///     occupation VARCHAR(255) NOT NULL DEFAULT '',
///     email VARCHAR(255) NOT NULL UNIQUE,
///     province_id VARCHAR(255) NOT NULL DEFAULT '',
///     city_id VARCHAR(255) NOT NULL DEFAULT '',
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Every function takes any PostgreSQL executor, so the same query runs on
/// the pool or inside a transaction (`&mut *tx`).
///
/// # Example
///
/// ```no_run
/// use okefin_shared::models::user::{User, CreateUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     name: "Ana".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     phone: "0811".to_string(),
///     birth_date: None,
///     occupation: "eng".to_string(),
///     email: "a@x.com".to_string(),
///     province_id: "11".to_string(),
///     city_id: "1101".to_string(),
/// }).await?;
///
/// let found = User::find_by_phone(&pool, "0811").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

const USER_COLUMNS: &str = "id, name, password_hash, phone, birth_date, gender, about, \
     occupation, email, province_id, city_id, is_admin, created_at, updated_at";

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Display name (`nama`)
    pub name: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Phone number, unique, used as the login identifier
    pub phone: String,

    pub birth_date: Option<NaiveDate>,

    pub gender: String,

    pub about: String,

    pub occupation: String,

    /// Email address, unique
    pub email: String,

    /// Region-service province id (may be empty)
    pub province_id: String,

    /// Region-service city id (may be empty)
    pub city_id: String,

    /// Grants access to category management
    pub is_admin: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub occupation: String,
    pub email: String,
    pub province_id: String,
    pub city_id: String,
}

/// Input for updating an existing user
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub about: Option<String>,
    pub occupation: Option<String>,
    pub email: Option<String>,
    pub province_id: Option<String>,
    pub city_id: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.birth_date.is_none()
            && self.gender.is_none()
            && self.about.is_none()
            && self.occupation.is_none()
            && self.email.is_none()
            && self.province_id.is_none()
            && self.city_id.is_none()
    }
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the email or phone is
    /// already registered.
    pub async fn create<'e, E: PgExecutor<'e>>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users (name, password_hash, phone, birth_date, occupation, email, province_id, city_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.name)
            .bind(data.password_hash)
            .bind(data.phone)
            .bind(data.birth_date)
            .bind(data.occupation)
            .bind(data.email)
            .bind(data.province_id)
            .bind(data.city_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_email<'e, E: PgExecutor<'e>>(
        executor: E,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// Finds a user by phone number (the login identifier)
    pub async fn find_by_phone<'e, E: PgExecutor<'e>>(
        executor: E,
        phone: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE phone = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(phone)
            .fetch_optional(executor)
            .await
    }

    /// Updates an existing user
    ///
    /// Only `Some` fields in `data` are written; `updated_at` is always
    /// refreshed. Returns `None` if the user doesn't exist.
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        let text_fields = [
            ("name", data.name.is_some()),
            ("gender", data.gender.is_some()),
            ("about", data.about.is_some()),
            ("occupation", data.occupation.is_some()),
            ("email", data.email.is_some()),
            ("province_id", data.province_id.is_some()),
            ("city_id", data.city_id.is_some()),
        ];
        for (column, present) in text_fields {
            if present {
                bind_count += 1;
                query.push_str(&format!(", {} = ${}", column, bind_count));
            }
        }
        if data.birth_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", birth_date = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {}", USER_COLUMNS));

        // Binds must follow the same order as the SET clauses above
        let mut q = sqlx::query_as::<_, User>(&query).bind(id);
        for value in [
            data.name,
            data.gender,
            data.about,
            data.occupation,
            data.email,
            data.province_id,
            data.city_id,
        ]
        .into_iter()
        .flatten()
        {
            q = q.bind(value);
        }
        if let Some(birth_date) = data.birth_date {
            q = q.bind(birth_date);
        }

        q.fetch_optional(executor).await
    }

    /// Grants or revokes administrator rights
    pub async fn set_admin<'e, E: PgExecutor<'e>>(executor: E, id: i64, is_admin: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_admin = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(is_admin)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists users ordered by id
    pub async fn list<'e, E: PgExecutor<'e>>(executor: E, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());

        let update = UpdateUser {
            about: Some("hello".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: 1,
            name: "Ana".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            phone: "0811".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2000, 1, 1),
            gender: String::new(),
            about: String::new(),
            occupation: "eng".to_string(),
            email: "a@x.com".to_string(),
            province_id: "11".to_string(),
            city_id: "1101".to_string(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["birth_date"], "2000-01-01");
    }
}
