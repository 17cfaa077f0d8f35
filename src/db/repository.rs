//! Repository pattern implementation for the data access layer
//!
//! The user repository is the credential store: it owns the email-uniqueness
//! invariant by mapping the engine's UNIQUE-constraint failures to Conflict,
//! so concurrent writers serialize at the database rather than in
//! application code. The workout repository is the dependent-resource store
//! consumed by account deletion.

use crate::core::error::{LiftlogError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{User, Workout};
use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row};
use std::sync::Arc;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Find an entity by its ID
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Find all entities
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<()>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<()>;

    /// Delete an entity by its ID
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Map a UNIQUE-constraint failure on users.email to Conflict
fn map_email_conflict(e: rusqlite::Error) -> LiftlogError {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            LiftlogError::Conflict("email already registered".to_string())
        }
        other => LiftlogError::DatabaseError(other),
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        is_admin: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn workout_from_row(row: &Row<'_>) -> rusqlite::Result<Workout> {
    Ok(Workout {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        notes: row.get(3)?,
        duration_min: row.get(4)?,
        performed_at: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const USER_COLUMNS: &str = "id, email, password_hash, is_admin, created_at";
const WORKOUT_COLUMNS: &str = "id, user_id, title, notes, duration_min, performed_at, created_at";

/// Repository for User entities (the credential store)
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find a user by email
    ///
    /// Callers are expected to pass a normalized (trimmed, lowercased)
    /// email; the store compares exactly.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                    [&email],
                    user_from_row,
                )
                .optional()
                .map_err(LiftlogError::DatabaseError)
            })
            .await
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                    [&id],
                    user_from_row,
                )
                .optional()
                .map_err(LiftlogError::DatabaseError)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM users ORDER BY created_at DESC",
                        USER_COLUMNS
                    ))
                    .map_err(LiftlogError::DatabaseError)?;

                let users = stmt
                    .query_map([], user_from_row)
                    .map_err(LiftlogError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(LiftlogError::DatabaseError)?;

                Ok(users)
            })
            .await
    }

    /// Insert a new user; fails with Conflict when the email is taken
    async fn create(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, email, password_hash, is_admin) VALUES (?, ?, ?, ?)",
                    rusqlite::params![&user.id, &user.email, &user.password_hash, user.is_admin],
                )
                .map_err(map_email_conflict)?;
                Ok(())
            })
            .await
    }

    /// Update a user; fails with Conflict when the new email belongs to a
    /// different user
    async fn update(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db
            .execute(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE users SET email = ?, password_hash = ?, is_admin = ? WHERE id = ?",
                        rusqlite::params![
                            &user.email,
                            &user.password_hash,
                            user.is_admin,
                            &user.id
                        ],
                    )
                    .map_err(map_email_conflict)?;

                if changed == 0 {
                    return Err(LiftlogError::NotFound(format!(
                        "User with id {} not found",
                        user.id
                    )));
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                let changed = conn
                    .execute("DELETE FROM users WHERE id = ?", [&id])
                    .map_err(LiftlogError::DatabaseError)?;

                if changed == 0 {
                    return Err(LiftlogError::NotFound(format!(
                        "User with id {} not found",
                        id
                    )));
                }
                Ok(())
            })
            .await
    }
}

/// Repository for Workout entities (the dependent-resource store)
pub struct WorkoutRepository {
    db: Arc<DatabaseManager>,
}

impl WorkoutRepository {
    /// Create a new WorkoutRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find workouts owned by a user
    pub async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Workout>> {
        let user_id = user_id.to_string();
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM workouts WHERE user_id = ? ORDER BY created_at DESC",
                        WORKOUT_COLUMNS
                    ))
                    .map_err(LiftlogError::DatabaseError)?;

                let workouts = stmt
                    .query_map([&user_id], workout_from_row)
                    .map_err(LiftlogError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(LiftlogError::DatabaseError)?;

                Ok(workouts)
            })
            .await
    }

    /// Delete every workout owned by a user, returning how many were removed
    ///
    /// This is the cascade hook invoked by account deletion, before the
    /// account row itself is removed.
    pub async fn delete_all_owned_by(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.db
            .execute(move |conn| {
                conn.execute("DELETE FROM workouts WHERE user_id = ?", [&user_id])
                    .map_err(LiftlogError::DatabaseError)
            })
            .await
    }
}

#[async_trait]
impl Repository<Workout> for WorkoutRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Workout>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM workouts WHERE id = ?", WORKOUT_COLUMNS),
                    [&id],
                    workout_from_row,
                )
                .optional()
                .map_err(LiftlogError::DatabaseError)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<Workout>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM workouts ORDER BY created_at DESC",
                        WORKOUT_COLUMNS
                    ))
                    .map_err(LiftlogError::DatabaseError)?;

                let workouts = stmt
                    .query_map([], workout_from_row)
                    .map_err(LiftlogError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(LiftlogError::DatabaseError)?;

                Ok(workouts)
            })
            .await
    }

    async fn create(&self, workout: &Workout) -> Result<()> {
        let workout = workout.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO workouts (id, user_id, title, notes, duration_min, performed_at) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        &workout.id,
                        &workout.user_id,
                        &workout.title,
                        &workout.notes,
                        &workout.duration_min,
                        &workout.performed_at,
                    ],
                )
                .map_err(LiftlogError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    async fn update(&self, workout: &Workout) -> Result<()> {
        let workout = workout.clone();
        self.db
            .execute(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE workouts SET title = ?, notes = ?, duration_min = ?, performed_at = ? \
                         WHERE id = ?",
                        rusqlite::params![
                            &workout.title,
                            &workout.notes,
                            &workout.duration_min,
                            &workout.performed_at,
                            &workout.id,
                        ],
                    )
                    .map_err(LiftlogError::DatabaseError)?;

                if changed == 0 {
                    return Err(LiftlogError::NotFound(format!(
                        "Workout with id {} not found",
                        workout.id
                    )));
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                let changed = conn
                    .execute("DELETE FROM workouts WHERE id = ?", [&id])
                    .map_err(LiftlogError::DatabaseError)?;

                if changed == 0 {
                    return Err(LiftlogError::NotFound(format!(
                        "Workout with id {} not found",
                        id
                    )));
                }
                Ok(())
            })
            .await
    }
}
