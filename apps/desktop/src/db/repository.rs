//! SQLite persistence for the class hierarchy.

use crate::db::error::DbError;
use crate::db::schema::{INIT_SCHEMA_VERSION, SCHEMA, SCHEMA_VERSION};
use rusqlite::{params, Connection};
use std::path::Path;
use studydeck_core::{ClassEntity, Flashcard, PersistError, Persistence, Schedule, TopicEntity};
use uuid::Uuid;

type Result<T> = std::result::Result<T, DbError>;

/// SQLite implementation of the persistence collaborator.
///
/// Saving replaces the whole tree inside one transaction; `position`
/// columns keep sibling order stable across reloads.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(SCHEMA)?;
        self.conn.execute(INIT_SCHEMA_VERSION, params![SCHEMA_VERSION])?;

        let found = self.schema_version()?;
        if found > SCHEMA_VERSION {
            return Err(DbError::UnsupportedSchema {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(())
    }

    /// Highest schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i32> {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get::<_, i32>(0)
            })
            .map_err(Into::into)
    }

    /// Load the full tree in stored order.
    pub fn load_classes(&self) -> Result<Vec<ClassEntity>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM classes ORDER BY position")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut classes = Vec::with_capacity(rows.len());
        for (id, name) in rows {
            let topics = self.load_topics(&id)?;
            classes.push(ClassEntity {
                id: parse_id(&id)?,
                name,
                topics,
            });
        }
        Ok(classes)
    }

    fn load_topics(&self, class_id: &str) -> Result<Vec<TopicEntity>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name FROM topics WHERE class_id = ?1 ORDER BY position")?;
        let rows = stmt
            .query_map(params![class_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut topics = Vec::with_capacity(rows.len());
        for (id, name) in rows {
            let flashcards = self.load_flashcards(&id)?;
            topics.push(TopicEntity {
                id: parse_id(&id)?,
                name,
                flashcards,
            });
        }
        Ok(topics)
    }

    fn load_flashcards(&self, topic_id: &str) -> Result<Vec<Flashcard>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, front, back, stickers, interval_days, ease, due_date
             FROM flashcards WHERE topic_id = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![topic_id], Self::row_to_flashcard)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| -> Result<Flashcard> {
                Ok(Flashcard {
                    id: parse_id(&row.id)?,
                    front: row.front,
                    back: row.back,
                    stickers: serde_json::from_str(&row.stickers)?,
                    schedule: row.schedule,
                })
            })
            .collect()
    }

    fn row_to_flashcard(row: &rusqlite::Row) -> rusqlite::Result<FlashcardRow> {
        Ok(FlashcardRow {
            id: row.get(0)?,
            front: row.get(1)?,
            back: row.get(2)?,
            stickers: row.get(3)?,
            schedule: Schedule {
                interval: row.get(4)?,
                ease: row.get(5)?,
                due_date: row.get(6)?,
            },
        })
    }

    /// Replace the stored tree.
    pub fn save_classes(&self, classes: &[ClassEntity]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM flashcards", [])?;
        tx.execute("DELETE FROM topics", [])?;
        tx.execute("DELETE FROM classes", [])?;

        {
            let mut insert_class =
                tx.prepare("INSERT INTO classes (id, name, position) VALUES (?1, ?2, ?3)")?;
            let mut insert_topic = tx.prepare(
                "INSERT INTO topics (id, class_id, name, position) VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut insert_card = tx.prepare(
                "INSERT INTO flashcards (id, topic_id, front, back, stickers, interval_days, ease, due_date, position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for (class_pos, class) in classes.iter().enumerate() {
                let class_id = class.id.to_string();
                insert_class.execute(params![class_id, class.name, class_pos as i64])?;

                for (topic_pos, topic) in class.topics.iter().enumerate() {
                    let topic_id = topic.id.to_string();
                    insert_topic.execute(params![topic_id, class_id, topic.name, topic_pos as i64])?;

                    for (card_pos, card) in topic.flashcards.iter().enumerate() {
                        let stickers = serde_json::to_string(&card.stickers)?;
                        insert_card.execute(params![
                            card.id.to_string(),
                            topic_id,
                            card.front,
                            card.back,
                            stickers,
                            card.schedule.interval,
                            card.schedule.ease,
                            card.schedule.due_date,
                            card_pos as i64,
                        ])?;
                    }
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}

impl Persistence for SqliteRepository {
    fn load(&self) -> std::result::Result<Vec<ClassEntity>, PersistError> {
        self.load_classes().map_err(Into::into)
    }

    fn save(&self, classes: &[ClassEntity]) -> std::result::Result<(), PersistError> {
        self.save_classes(classes).map_err(Into::into)
    }
}

struct FlashcardRow {
    id: String,
    front: String,
    back: String,
    stickers: String,
    schedule: Schedule,
}

fn parse_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|_| DbError::InvalidData(format!("invalid id: {value}")))
}
