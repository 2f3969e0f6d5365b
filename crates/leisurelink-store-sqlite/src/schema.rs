//! SQL schema for the LeisureLink SQLite store.
//!
//! Table and column names follow the application's own database so fixture
//! files can be inspected with the same queries.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS blobs (
    oid   INTEGER PRIMARY KEY AUTOINCREMENT,
    data  BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id               TEXT PRIMARY KEY,
    app_user_roles   INTEGER NOT NULL,
    is_activated     INTEGER NOT NULL,
    email            TEXT NOT NULL UNIQUE,
    password         TEXT NOT NULL,   -- PHC string
    user_details_id  TEXT            -- set once user_details exists
);

CREATE TABLE IF NOT EXISTS user_details (
    id            TEXT PRIMARY KEY,
    address       TEXT NOT NULL,
    birth_date    TEXT NOT NULL,     -- YYYY-MM-DD
    last_name     TEXT NOT NULL,
    name          TEXT NOT NULL,
    phone_number  TEXT NOT NULL,
    photo         INTEGER REFERENCES blobs(oid),
    user_id       TEXT NOT NULL REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS events (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    description  TEXT NOT NULL,
    address      TEXT NOT NULL,
    start_date   TEXT NOT NULL,      -- RFC 3339 UTC
    end_date     TEXT NOT NULL,
    location     TEXT NOT NULL,      -- SRID=4326;POINT(lon lat)
    CHECK (end_date > start_date)
);

CREATE TABLE IF NOT EXISTS event_images (
    id        TEXT PRIMARY KEY,
    image     INTEGER NOT NULL REFERENCES blobs(oid),
    event_id  TEXT NOT NULL REFERENCES events(id)
);

CREATE TABLE IF NOT EXISTS event_categories (
    id    TEXT PRIMARY KEY,
    name  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS events_categories (
    events_id      TEXT NOT NULL REFERENCES events(id),
    categories_id  TEXT NOT NULL REFERENCES event_categories(id),
    PRIMARY KEY (events_id, categories_id)
);

CREATE TABLE IF NOT EXISTS comments (
    id            TEXT PRIMARY KEY,
    content       TEXT NOT NULL,
    comment_date  TEXT NOT NULL,
    grade         INTEGER NOT NULL CHECK (grade BETWEEN 1 AND 5),
    event_id      TEXT NOT NULL REFERENCES events(id),
    user_id       TEXT NOT NULL REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS events_comments (
    event_id     TEXT NOT NULL REFERENCES events(id),
    comments_id  TEXT NOT NULL REFERENCES comments(id),
    PRIMARY KEY (event_id, comments_id)
);

CREATE TABLE IF NOT EXISTS members (
    id        TEXT PRIMARY KEY,
    status    TEXT NOT NULL,   -- 'STATUS_ACTIVE' | 'STATUS_INACTIVE'
    type      TEXT NOT NULL,   -- 'ROLE_HOST' | 'ROLE_GUEST'
    event_id  TEXT NOT NULL REFERENCES events(id),
    user_id   TEXT NOT NULL REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS members_event_idx ON members(event_id, type);
CREATE INDEX IF NOT EXISTS comments_event_idx ON comments(event_id);

PRAGMA user_version = 1;
";
