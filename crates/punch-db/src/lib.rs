//! Storage layer for the attendance ledger.
//!
//! Provides the durable append-only event store using `rusqlite`, and
//! the [`Ledger`] operations layered on top of it.
//!
//! # Thread Safety
//!
//! [`EventStore`] wraps a `rusqlite::Connection`, which is `Send` but
//! not `Sync`. A store can be moved between threads but not shared
//! without external synchronization. Cross-process safety comes from
//! SQLite itself: every mutation is a single-row insert serialized by
//! the database write lock.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in ISO 8601 format at second
//! precision (e.g., `2024-01-01T09:00:00Z`), always UTC, so
//! lexicographic ordering matches chronological ordering. Sequence ids
//! come from `INTEGER PRIMARY KEY AUTOINCREMENT` and are never reused,
//! even after deletion by hand.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, TransactionBehavior, params};
use thiserror::Error;

use punch_core::{AdminOracle, ClockAction, ClockEvent, SessionState, UserId, resolve_session};

/// Errors from the durability layer. Fatal for the current operation;
/// the caller surfaces them rather than retrying silently.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored event timestamp.
    #[error("invalid timestamp for event {event_id}: {timestamp}")]
    TimestampParse {
        event_id: i64,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row failed domain validation.
    #[error("invalid row for event {event_id}: {message}")]
    InvalidRow { event_id: i64, message: String },
}

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The user is already clocked in; nothing was appended.
    #[error("{user} is already clocked in")]
    AlreadyActive {
        user: UserId,
        /// When the open session started, if known.
        since: Option<DateTime<Utc>>,
    },
    /// The actor is not allowed to run this query; nothing ran.
    #[error("{actor} does not have permission for this query")]
    PermissionDenied { actor: UserId },
    /// The durability layer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(StoreError::Sqlite(err))
    }
}

/// Durable append-only store of clock events.
///
/// See the [module documentation](self) for thread safety and schema
/// notes.
pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    /// Opens a store at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory store.
    ///
    /// Useful for testing. The store is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initializes the schema. Idempotent.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS clock_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                action TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_clock_events_user_time
                ON clock_events(user_id, timestamp);
            ",
        )?;
        Ok(())
    }

    /// Appends one event with the next sequence id and the current
    /// wall-clock UTC second, and returns the materialized row.
    ///
    /// This is the only mutation the store supports; rows are never
    /// updated or deleted.
    pub fn append(
        &mut self,
        user: &UserId,
        action: ClockAction,
    ) -> Result<ClockEvent, StoreError> {
        insert_event(&self.conn, user, action, Utc::now().trunc_subsecs(0))
    }

    /// Full materialization of one user's history, ordered by
    /// timestamp ascending with ties broken by id.
    pub fn events_for(&self, user: &UserId) -> Result<Vec<ClockEvent>, StoreError> {
        query_events(&self.conn, Some(user))
    }

    /// Full materialization of every user's history in the same order.
    pub fn all_events(&self) -> Result<Vec<ClockEvent>, StoreError> {
        query_events(&self.conn, None)
    }
}

fn insert_event(
    conn: &Connection,
    user: &UserId,
    action: ClockAction,
    timestamp: DateTime<Utc>,
) -> Result<ClockEvent, StoreError> {
    conn.execute(
        "INSERT INTO clock_events (user_id, action, timestamp) VALUES (?, ?, ?)",
        params![user.as_str(), action.as_str(), format_timestamp(timestamp)],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, user = %user, action = %action, "event appended");
    Ok(ClockEvent {
        id,
        user_id: user.clone(),
        action,
        timestamp,
    })
}

fn query_events(conn: &Connection, user: Option<&UserId>) -> Result<Vec<ClockEvent>, StoreError> {
    let mut events = Vec::new();
    let mut push_rows = |rows: &mut rusqlite::Rows<'_>| -> Result<(), StoreError> {
        while let Some(row) = rows.next()? {
            let id: i64 = row.get(0)?;
            let user_id: String = row.get(1)?;
            let action: String = row.get(2)?;
            let timestamp: String = row.get(3)?;
            events.push(parse_event(id, &user_id, &action, &timestamp)?);
        }
        Ok(())
    };

    match user {
        Some(user) => {
            let mut stmt = conn.prepare(
                "
                SELECT id, user_id, action, timestamp
                FROM clock_events
                WHERE user_id = ?
                ORDER BY timestamp ASC, id ASC
                ",
            )?;
            let mut rows = stmt.query([user.as_str()])?;
            push_rows(&mut rows)?;
        }
        None => {
            let mut stmt = conn.prepare(
                "
                SELECT id, user_id, action, timestamp
                FROM clock_events
                ORDER BY timestamp ASC, id ASC
                ",
            )?;
            let mut rows = stmt.query([])?;
            push_rows(&mut rows)?;
        }
    }

    Ok(events)
}

fn parse_event(
    id: i64,
    user_id: &str,
    action: &str,
    timestamp: &str,
) -> Result<ClockEvent, StoreError> {
    let user_id = UserId::new(user_id).map_err(|err| StoreError::InvalidRow {
        event_id: id,
        message: err.to_string(),
    })?;
    let action: ClockAction = action.parse().map_err(|err: punch_core::UnknownClockAction| {
        StoreError::InvalidRow {
            event_id: id,
            message: err.to_string(),
        }
    })?;
    let timestamp = parse_timestamp(timestamp, id)?;
    Ok(ClockEvent {
        id,
        user_id,
        action,
        timestamp,
    })
}

fn parse_timestamp(timestamp: &str, event_id: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| StoreError::TimestampParse {
            event_id,
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The attendance ledger: state-changing operations and gated queries
/// layered on the event store.
///
/// Owns the store handle explicitly; open it at startup and drop it at
/// shutdown. There is no process-global connection.
pub struct Ledger {
    store: EventStore,
}

impl Ledger {
    /// Opens the ledger over a store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            store: EventStore::open(path)?,
        })
    }

    /// Opens the ledger over an in-memory store.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            store: EventStore::open_in_memory()?,
        })
    }

    /// Wraps an already-open store.
    #[must_use]
    pub const fn new(store: EventStore) -> Self {
        Self { store }
    }

    /// Read-only access to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &EventStore {
        &self.store
    }

    /// Clocks the user in, unless they already are.
    ///
    /// Fails with [`LedgerError::AlreadyActive`] and appends nothing
    /// when the derived state is active. The state check and the
    /// append run inside one immediate transaction so concurrent
    /// writers serialize instead of double-admitting.
    pub fn try_clock_in(&mut self, user: &UserId) -> Result<ClockEvent, LedgerError> {
        let tx = self
            .store
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let history = query_events(&tx, Some(user))?;
        let state = resolve_session(user, &history);
        if state.active {
            tracing::debug!(user = %user, "clock-in rejected, already active");
            return Err(LedgerError::AlreadyActive {
                user: user.clone(),
                since: state.last_transition_at,
            });
        }

        let event = insert_event(&tx, user, ClockAction::In, Utc::now().trunc_subsecs(0))?;
        tx.commit()?;
        Ok(event)
    }

    /// Clocks the user out, unconditionally.
    ///
    /// Policy decision: clocking out while not active is accepted and
    /// recorded rather than rejected. The orphan clock-out never pairs
    /// with anything, so it contributes nothing to worked-time totals.
    pub fn clock_out(&mut self, user: &UserId) -> Result<ClockEvent, LedgerError> {
        let event = insert_event(
            &self.store.conn,
            user,
            ClockAction::Out,
            Utc::now().trunc_subsecs(0),
        )?;
        Ok(event)
    }

    /// Derives the user's current session state from their history.
    pub fn session_for(&self, user: &UserId) -> Result<SessionState, StoreError> {
        let history = self.store.events_for(user)?;
        Ok(resolve_session(user, &history))
    }

    /// The subject's full history, gated: a non-admin actor may only
    /// query their own.
    ///
    /// The permission check runs before any storage access.
    pub fn log_for(
        &self,
        actor: &UserId,
        subject: &UserId,
        oracle: &dyn AdminOracle,
    ) -> Result<Vec<ClockEvent>, LedgerError> {
        if actor != subject && !oracle.is_admin(actor) {
            tracing::warn!(actor = %actor, subject = %subject, "cross-user log denied");
            return Err(LedgerError::PermissionDenied {
                actor: actor.clone(),
            });
        }
        Ok(self.store.events_for(subject)?)
    }

    /// The set of all users whose derived state is active. Admin only.
    ///
    /// Computed by grouping the full event table per user and applying
    /// the session resolver to each history, so the result is exactly
    /// `{ user : resolve_session(user, history).active }`.
    pub fn active_users(
        &self,
        actor: &UserId,
        oracle: &dyn AdminOracle,
    ) -> Result<BTreeSet<UserId>, LedgerError> {
        if !oracle.is_admin(actor) {
            tracing::warn!(actor = %actor, "active roster denied");
            return Err(LedgerError::PermissionDenied {
                actor: actor.clone(),
            });
        }

        let mut by_user: BTreeMap<UserId, Vec<ClockEvent>> = BTreeMap::new();
        for event in self.store.all_events()? {
            by_user
                .entry(event.user_id.clone())
                .or_default()
                .push(event);
        }

        Ok(by_user
            .iter()
            .filter(|(user, history)| resolve_session(user, history).active)
            .map(|(user, _)| user.clone())
            .collect())
    }
}
