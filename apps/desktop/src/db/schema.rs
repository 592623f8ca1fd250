//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local SQLite database.
pub const SCHEMA: &str = r#"
-- Classes, in display order
CREATE TABLE IF NOT EXISTS classes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    position INTEGER NOT NULL
);

-- Topics, owned by one class
CREATE TABLE IF NOT EXISTS topics (
    id TEXT PRIMARY KEY,
    class_id TEXT NOT NULL REFERENCES classes(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    position INTEGER NOT NULL
);

-- Flashcards with their scheduling fields
CREATE TABLE IF NOT EXISTS flashcards (
    id TEXT PRIMARY KEY,
    topic_id TEXT NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    stickers TEXT NOT NULL DEFAULT '[]',
    interval_days REAL NOT NULL DEFAULT 0,
    ease REAL NOT NULL DEFAULT 2.5,
    due_date INTEGER NOT NULL DEFAULT 0,
    position INTEGER NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_topics_class ON topics(class_id, position);
CREATE INDEX IF NOT EXISTS idx_flashcards_topic ON flashcards(topic_id, position);
CREATE INDEX IF NOT EXISTS idx_flashcards_due ON flashcards(due_date);
"#;

/// Record the schema version if none is stored yet.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT INTO schema_version (version)
SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM schema_version)
"#;
