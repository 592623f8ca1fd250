//! Card store: the canonical class → topic → flashcard tree.
//!
//! Every mutation saves the full tree through the injected [`Persistence`]
//! collaborator and returns an owned copy of the updated subtree, so callers
//! holding a selection can refresh it instead of reading a stale copy.

use crate::error::{Result, StoreError};
use crate::import::parse_bulk_input;
use crate::persist::{MemoryPersistence, Persistence};
use crate::stickers::{self, StickerPicker};
use crate::text::organize_text;
use crate::types::{ClassEntity, EntityKind, Flashcard, Schedule, TopicEntity};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of a bulk import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub topic: TopicEntity,
}

pub struct CardStore {
    classes: Vec<ClassEntity>,
    persistence: Box<dyn Persistence>,
    initial_schedule: Schedule,
}

impl CardStore {
    /// Load the hierarchy from `persistence`. Load failures fall back to an
    /// empty tree.
    pub fn load(persistence: Box<dyn Persistence>) -> Self {
        let classes = match persistence.load() {
            Ok(classes) => classes,
            Err(e) => {
                warn!(error = %e, "failed to load study data, starting empty");
                Vec::new()
            }
        };
        Self {
            classes,
            persistence,
            initial_schedule: Schedule::default(),
        }
    }

    /// Schedule given to newly created cards, normally the reviewing
    /// algorithm's [`initial_schedule`](crate::SpacedRepetitionAlgorithm::initial_schedule).
    pub fn with_initial_schedule(mut self, schedule: Schedule) -> Self {
        self.initial_schedule = schedule;
        self
    }

    /// Store backed by an ephemeral in-memory document.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryPersistence::new()))
    }

    pub fn classes(&self) -> &[ClassEntity] {
        &self.classes
    }

    pub fn class(&self, class_id: Uuid) -> Option<&ClassEntity> {
        self.classes.iter().find(|c| c.id == class_id)
    }

    pub fn topic(&self, class_id: Uuid, topic_id: Uuid) -> Option<&TopicEntity> {
        self.class(class_id).and_then(|c| c.topic(topic_id))
    }

    /// Find a topic by id alone, with its owning class.
    pub fn find_topic(&self, topic_id: Uuid) -> Option<(&ClassEntity, &TopicEntity)> {
        self.classes
            .iter()
            .find_map(|class| class.topic(topic_id).map(|topic| (class, topic)))
    }

    pub fn flashcard(&self, card_id: Uuid) -> Option<&Flashcard> {
        self.classes
            .iter()
            .flat_map(|c| c.topics.iter())
            .flat_map(|t| t.flashcards.iter())
            .find(|f| f.id == card_id)
    }

    pub fn create_class(&mut self, name: &str) -> Result<ClassEntity> {
        let name = required(name, "class name")?;
        let class = ClassEntity::new(name);
        self.classes.push(class.clone());
        self.persist();
        Ok(class)
    }

    pub fn create_topic(&mut self, class_id: Uuid, name: &str) -> Result<TopicEntity> {
        let class = self
            .class_mut(class_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Class, class_id))?;
        let name = required(name, "topic name")?;
        let topic = TopicEntity::new(name);
        class.topics.push(topic.clone());
        self.persist();
        Ok(topic)
    }

    /// Add a card to a topic. Returns the updated topic; the new card is last.
    pub fn create_flashcard(
        &mut self,
        class_id: Uuid,
        topic_id: Uuid,
        front: &str,
        back: &str,
        stickers: Vec<String>,
    ) -> Result<TopicEntity> {
        let topic = self.insert_flashcard(class_id, topic_id, front, back, stickers)?.clone();
        self.persist();
        Ok(topic)
    }

    /// Parse bulk text and create a card per accepted line, each with fresh
    /// random stickers. Rejected pairs are counted, not fatal.
    pub fn import_bulk<R: Rng + ?Sized>(
        &mut self,
        class_id: Uuid,
        topic_id: Uuid,
        text: &str,
        picker: &StickerPicker,
        rng: &mut R,
    ) -> Result<ImportReport> {
        if self.topic(class_id, topic_id).is_none() {
            return Err(StoreError::not_found(EntityKind::Topic, topic_id));
        }

        let raw_cards = parse_bulk_input(text);
        let non_blank = text.lines().filter(|l| !l.trim().is_empty()).count();
        let mut imported = 0;
        let mut skipped = non_blank - raw_cards.len();

        for raw in raw_cards {
            let stickers = picker.random(rng);
            match self.insert_flashcard(class_id, topic_id, &raw.front, &raw.back, stickers) {
                Ok(_) => imported += 1,
                Err(e) => {
                    debug!(line = raw.line_number, error = %e, "skipping import line");
                    skipped += 1;
                }
            }
        }

        if imported > 0 {
            self.persist();
        }

        let topic = self
            .topic(class_id, topic_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Topic, topic_id))?;

        Ok(ImportReport {
            imported,
            skipped,
            topic,
        })
    }

    /// Apply scheduler output to a card. Missing cards are ignored.
    pub fn update_flashcard_scheduling(
        &mut self,
        card_id: Uuid,
        schedule: Schedule,
    ) -> Option<Flashcard> {
        let Some(card) = self.flashcard_mut(card_id) else {
            debug!(%card_id, "scheduling update for deleted card ignored");
            return None;
        };
        card.schedule = schedule;
        let updated = card.clone();
        self.persist();
        Some(updated)
    }

    /// Remove a class with all of its topics and cards.
    pub fn delete_class(&mut self, class_id: Uuid) -> &[ClassEntity] {
        match self.classes.iter().position(|c| c.id == class_id) {
            Some(index) => {
                let removed = self.classes.remove(index);
                debug!(%class_id, cards = removed.card_count(), "class deleted");
                self.persist();
            }
            None => debug!(%class_id, "delete of unknown class ignored"),
        }
        &self.classes
    }

    /// Remove a topic and its cards. Returns the updated class, if it exists.
    pub fn delete_topic(&mut self, class_id: Uuid, topic_id: Uuid) -> Option<ClassEntity> {
        let class = self.class_mut(class_id)?;
        let before = class.topics.len();
        class.topics.retain(|t| t.id != topic_id);
        let removed = class.topics.len() != before;
        let updated = class.clone();
        if removed {
            self.persist();
        } else {
            debug!(%topic_id, "delete of unknown topic ignored");
        }
        Some(updated)
    }

    /// Remove a card. Returns the updated topic, if it exists.
    pub fn delete_flashcard(&mut self, topic_id: Uuid, card_id: Uuid) -> Option<TopicEntity> {
        let topic = self.topic_by_id_mut(topic_id)?;
        let before = topic.flashcards.len();
        topic.flashcards.retain(|f| f.id != card_id);
        let removed = topic.flashcards.len() != before;
        let updated = topic.clone();
        if removed {
            self.persist();
        } else {
            debug!(%card_id, "delete of unknown flashcard ignored");
        }
        Some(updated)
    }

    fn insert_flashcard(
        &mut self,
        class_id: Uuid,
        topic_id: Uuid,
        front: &str,
        back: &str,
        stickers: Vec<String>,
    ) -> Result<&TopicEntity> {
        if front.trim().is_empty() || back.trim().is_empty() {
            return Err(StoreError::validation("flashcard front and back are required"));
        }

        let schedule = self.initial_schedule;
        let topic = self
            .class_mut(class_id)
            .and_then(|c| c.topics.iter_mut().find(|t| t.id == topic_id))
            .ok_or_else(|| StoreError::not_found(EntityKind::Topic, topic_id))?;

        topic.flashcards.push(Flashcard {
            id: Uuid::new_v4(),
            front: organize_text(front),
            back: organize_text(back),
            stickers: stickers::normalize(stickers),
            schedule,
        });

        Ok(topic)
    }

    fn class_mut(&mut self, class_id: Uuid) -> Option<&mut ClassEntity> {
        self.classes.iter_mut().find(|c| c.id == class_id)
    }

    fn topic_by_id_mut(&mut self, topic_id: Uuid) -> Option<&mut TopicEntity> {
        self.classes
            .iter_mut()
            .flat_map(|c| c.topics.iter_mut())
            .find(|t| t.id == topic_id)
    }

    fn flashcard_mut(&mut self, card_id: Uuid) -> Option<&mut Flashcard> {
        self.classes
            .iter_mut()
            .flat_map(|c| c.topics.iter_mut())
            .flat_map(|t| t.flashcards.iter_mut())
            .find(|f| f.id == card_id)
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.classes) {
            warn!(error = %e, "failed to save study data");
        }
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StoreError::validation(format!("{field} is required")))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersistError;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FailingPersistence;

    impl Persistence for FailingPersistence {
        fn load(&self) -> std::result::Result<Vec<ClassEntity>, PersistError> {
            Err(PersistError::UnsupportedVersion(0))
        }

        fn save(&self, _: &[ClassEntity]) -> std::result::Result<(), PersistError> {
            Err(PersistError::UnsupportedVersion(0))
        }
    }

    fn store_with_topic() -> (CardStore, Uuid, Uuid) {
        let mut store = CardStore::in_memory();
        let class = store.create_class("Chemistry").unwrap();
        let topic = store.create_topic(class.id, "Acids").unwrap();
        (store, class.id, topic.id)
    }

    fn sticker(s: &str) -> Vec<String> {
        vec![s.to_string()]
    }

    #[test]
    fn create_class_rejects_blank_name() {
        let mut store = CardStore::in_memory();
        assert!(matches!(store.create_class("   "), Err(StoreError::Validation(_))));
        assert!(store.classes().is_empty());
    }

    #[test]
    fn create_class_appends_empty_class() {
        let mut store = CardStore::in_memory();
        let first = store.create_class("Math").unwrap();
        let second = store.create_class(" Art ").unwrap();
        assert!(first.topics.is_empty());
        assert_eq!(second.name, "Art");
        let names: Vec<_> = store.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Math", "Art"]);
    }

    #[test]
    fn create_topic_requires_class_and_name() {
        let mut store = CardStore::in_memory();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.create_topic(missing, "Algebra"),
            Err(StoreError::NotFound { kind: EntityKind::Class, .. })
        ));

        let class = store.create_class("Math").unwrap();
        assert!(matches!(store.create_topic(class.id, ""), Err(StoreError::Validation(_))));

        let topic = store.create_topic(class.id, "Algebra").unwrap();
        assert!(topic.flashcards.is_empty());
        assert_eq!(store.class(class.id).unwrap().topics.len(), 1);
    }

    #[test]
    fn create_flashcard_initializes_schedule_and_reflows_text() {
        let (mut store, class_id, topic_id) = store_with_topic();
        let topic = store
            .create_flashcard(class_id, topic_id, "pH of water?", "Neutral\n7", sticker("⚡"))
            .unwrap();

        let card = topic.flashcards.last().unwrap();
        assert_eq!(card.front, "pH of water?");
        assert_eq!(card.back, "> Neutral\n> 7");
        assert_eq!(card.stickers, vec!["⚡"]);
        assert_eq!(card.schedule, Schedule { interval: 0.0, ease: 2.5, due_date: 0 });
    }

    #[test]
    fn create_flashcard_validation_and_missing_topic() {
        let (mut store, class_id, topic_id) = store_with_topic();
        assert!(matches!(
            store.create_flashcard(class_id, topic_id, "  ", "back", Vec::new()),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.create_flashcard(class_id, Uuid::new_v4(), "front", "back", Vec::new()),
            Err(StoreError::NotFound { kind: EntityKind::Topic, .. })
        ));
        assert!(store.topic(class_id, topic_id).unwrap().flashcards.is_empty());
    }

    #[test]
    fn update_scheduling_applies_patch() {
        let (mut store, class_id, topic_id) = store_with_topic();
        let topic = store.create_flashcard(class_id, topic_id, "Q", "A", Vec::new()).unwrap();
        let card_id = topic.flashcards[0].id;

        let patch = Schedule { interval: 1.0, ease: 2.5, due_date: 42 };
        let updated = store.update_flashcard_scheduling(card_id, patch).unwrap();
        assert_eq!(updated.schedule, patch);
        assert_eq!(store.flashcard(card_id).unwrap().schedule, patch);
    }

    #[test]
    fn update_scheduling_for_missing_card_is_noop() {
        let (mut store, _, _) = store_with_topic();
        let before = store.classes().to_vec();
        assert!(store
            .update_flashcard_scheduling(Uuid::new_v4(), Schedule::default())
            .is_none());
        assert_eq!(store.classes(), before.as_slice());
    }

    #[test]
    fn deleting_unknown_ids_leaves_store_unchanged() {
        let (mut store, class_id, topic_id) = store_with_topic();
        store.create_flashcard(class_id, topic_id, "Q", "A", Vec::new()).unwrap();
        let before = store.classes().to_vec();

        store.delete_class(Uuid::new_v4());
        assert_eq!(store.delete_topic(Uuid::new_v4(), topic_id), None);
        store.delete_topic(class_id, Uuid::new_v4());
        assert_eq!(store.delete_flashcard(Uuid::new_v4(), Uuid::new_v4()), None);
        store.delete_flashcard(topic_id, Uuid::new_v4());

        assert_eq!(store.classes(), before.as_slice());
    }

    #[test]
    fn delete_class_cascades() {
        let (mut store, class_id, topic_id) = store_with_topic();
        let topic = store.create_flashcard(class_id, topic_id, "Q", "A", Vec::new()).unwrap();
        let card_id = topic.flashcards[0].id;

        let remaining = store.delete_class(class_id);
        assert!(remaining.is_empty());
        assert!(store.find_topic(topic_id).is_none());
        assert!(store.flashcard(card_id).is_none());
    }

    #[test]
    fn new_cards_use_configured_initial_schedule() {
        let initial = Schedule {
            interval: 0.0,
            ease: 2.0,
            due_date: 0,
        };
        let mut store = CardStore::in_memory().with_initial_schedule(initial);
        let class = store.create_class("Chemistry").unwrap();
        let topic = store.create_topic(class.id, "Acids").unwrap();

        let topic = store
            .create_flashcard(class.id, topic.id, "Q", "A", Vec::new())
            .unwrap();
        assert_eq!(topic.flashcards[0].schedule, initial);

        let report = store
            .import_bulk(
                class.id,
                topic.id,
                "Q2, A2",
                &StickerPicker::default(),
                &mut StdRng::seed_from_u64(3),
            )
            .unwrap();
        assert_eq!(report.topic.flashcards[1].schedule, initial);
    }

    #[test]
    fn class_card_count_spans_topics() {
        let (mut store, class_id, topic_id) = store_with_topic();
        let other = store.create_topic(class_id, "Bases").unwrap();
        store.create_flashcard(class_id, topic_id, "Q1", "A1", Vec::new()).unwrap();
        store.create_flashcard(class_id, other.id, "Q2", "A2", Vec::new()).unwrap();
        store.create_flashcard(class_id, other.id, "Q3", "A3", Vec::new()).unwrap();

        assert_eq!(store.class(class_id).unwrap().card_count(), 3);
    }

    #[test]
    fn delete_topic_cascades_and_returns_class() {
        let (mut store, class_id, topic_id) = store_with_topic();
        let topic = store.create_flashcard(class_id, topic_id, "Q", "A", Vec::new()).unwrap();
        let card_id = topic.flashcards[0].id;

        let class = store.delete_topic(class_id, topic_id).unwrap();
        assert!(class.topics.is_empty());
        assert!(store.flashcard(card_id).is_none());
    }

    #[test]
    fn delete_flashcard_returns_updated_topic() {
        let (mut store, class_id, topic_id) = store_with_topic();
        store.create_flashcard(class_id, topic_id, "Q1", "A1", Vec::new()).unwrap();
        let topic = store.create_flashcard(class_id, topic_id, "Q2", "A2", Vec::new()).unwrap();
        let first = topic.flashcards[0].id;

        let topic = store.delete_flashcard(topic_id, first).unwrap();
        assert_eq!(topic.flashcards.len(), 1);
        assert_eq!(topic.flashcards[0].front, "Q2");
    }

    #[test]
    fn import_bulk_creates_valid_pairs() {
        let (mut store, class_id, topic_id) = store_with_topic();
        let mut rng = StdRng::seed_from_u64(1);
        let report = store
            .import_bulk(
                class_id,
                topic_id,
                "Q1,A1\nbad-line\n\"Q,2\",\"A2\"",
                &StickerPicker::default(),
                &mut rng,
            )
            .unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 1);
        let faces: Vec<_> = report
            .topic
            .flashcards
            .iter()
            .map(|f| (f.front.as_str(), f.back.as_str()))
            .collect();
        assert_eq!(faces, vec![("Q1", "A1"), ("Q,2", "A2")]);
        assert!(report.topic.flashcards.iter().all(|f| f.stickers.len() == 3));
    }

    #[test]
    fn import_bulk_skips_empty_faces() {
        let (mut store, class_id, topic_id) = store_with_topic();
        let mut rng = StdRng::seed_from_u64(2);
        let report = store
            .import_bulk(class_id, topic_id, ",A\nQ,\nQ,A", &StickerPicker::default(), &mut rng)
            .unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn import_bulk_into_missing_topic_fails() {
        let mut store = CardStore::in_memory();
        let mut rng = StdRng::seed_from_u64(3);
        let result = store.import_bulk(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Q,A",
            &StickerPicker::default(),
            &mut rng,
        );
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn mutations_are_saved_and_reloaded() {
        let persistence = MemoryPersistence::new();
        let mut store = CardStore::load(Box::new(persistence.clone()));
        let class = store.create_class("Physics").unwrap();
        let topic = store.create_topic(class.id, "Optics").unwrap();
        store
            .create_flashcard(class.id, topic.id, "Lens", "Refracts", sticker("🌈"))
            .unwrap();

        let reloaded = CardStore::load(Box::new(persistence));
        assert_eq!(reloaded.classes(), store.classes());
    }

    #[test]
    fn load_failure_degrades_to_empty() {
        let corrupt = MemoryPersistence::with_document("{ definitely not json");
        assert!(CardStore::load(Box::new(corrupt)).classes().is_empty());
    }

    #[test]
    fn save_failure_does_not_fail_mutation() {
        let mut store = CardStore::load(Box::new(FailingPersistence));
        let class = store.create_class("Latin").unwrap();
        assert_eq!(store.class(class.id).map(|c| c.name.as_str()), Some("Latin"));
    }
}
