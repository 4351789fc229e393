//! Scratch notepad and categorized task notes

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::KeyValueStore;

const NOTEPAD_KEY: &str = "notepad.content";
const TASK_NOTES_KEY: &str = "notes.tasks";

/// A single free-form note
pub struct NotePad;

impl NotePad {
    pub fn load(store: &dyn KeyValueStore) -> String {
        store.get(NOTEPAD_KEY).unwrap_or_default()
    }

    pub fn save(store: &mut dyn KeyValueStore, text: &str) -> Result<(), String> {
        store.set(NOTEPAD_KEY, text)?;
        info!("Notepad saved ({} chars)", text.chars().count());
        Ok(())
    }

    pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), String> {
        store.remove(NOTEPAD_KEY)?;
        info!("Notepad cleared");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Study,
    Personal,
    Important,
    Idea,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Study => "study",
            Category::Personal => "personal",
            Category::Important => "important",
            Category::Idea => "idea",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "study" => Ok(Category::Study),
            "personal" => Ok(Category::Personal),
            "important" => Ok(Category::Important),
            "idea" => Ok(Category::Idea),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNote {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Task notes list; every change is written back to the store
#[derive(Debug, Clone, Default)]
pub struct TaskNotes {
    notes: Vec<TaskNote>,
}

impl TaskNotes {
    /// Load notes from the store. A value that is not a JSON list is treated
    /// as a note saved by the old single-text format and migrated.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(TASK_NOTES_KEY) else {
            return Self::default();
        };

        match serde_json::from_str::<Vec<TaskNote>>(&raw) {
            Ok(notes) => Self { notes },
            Err(e) => {
                warn!("Failed to parse saved task notes, migrating as plain text: {}", e);
                let now = Utc::now();
                Self {
                    notes: vec![TaskNote {
                        id: new_id(now, 0),
                        text: raw,
                        created_at: now,
                        last_edited: None,
                        category: None,
                    }],
                }
            }
        }
    }

    pub fn all(&self) -> &[TaskNote] {
        &self.notes
    }

    /// Add a note at the top of the list. Blank text is rejected.
    pub fn add(
        &mut self,
        store: &mut dyn KeyValueStore,
        text: &str,
        category: Option<Category>,
    ) -> Result<TaskNote, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("Note text is empty".to_string());
        }

        let now = Utc::now();
        let mut salt = self.notes.len();
        while self.notes.iter().any(|note| note.id == new_id(now, salt)) {
            salt += 1;
        }
        let note = TaskNote {
            id: new_id(now, salt),
            text: text.to_string(),
            created_at: now,
            last_edited: None,
            category,
        };
        let mut notes = self.notes.clone();
        notes.insert(0, note.clone());
        self.commit(store, notes)?;
        Ok(note)
    }

    pub fn update(
        &mut self,
        store: &mut dyn KeyValueStore,
        id: &str,
        text: &str,
        category: Option<Category>,
    ) -> Result<TaskNote, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("Note text is empty".to_string());
        }

        let mut notes = self.notes.clone();
        let note = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| format!("No note with id {}", id))?;
        note.text = text.to_string();
        note.category = category;
        note.last_edited = Some(Utc::now());
        let updated = note.clone();

        self.commit(store, notes)?;
        Ok(updated)
    }

    pub fn delete(&mut self, store: &mut dyn KeyValueStore, id: &str) -> Result<(), String> {
        let mut notes = self.notes.clone();
        notes.retain(|note| note.id != id);
        if notes.len() == self.notes.len() {
            return Err(format!("No note with id {}", id));
        }
        self.commit(store, notes)
    }

    /// Notes whose text contains `query` (case-insensitive), optionally in one category
    pub fn search(&self, query: Option<&str>, category: Option<Category>) -> Vec<&TaskNote> {
        let query = query.map(str::to_lowercase);
        self.notes
            .iter()
            .filter(|note| category.map_or(true, |c| note.category == Some(c)))
            .filter(|note| {
                query
                    .as_deref()
                    .map_or(true, |q| note.text.to_lowercase().contains(q))
            })
            .collect()
    }

    /// Persist `notes` and adopt them; on failure the current list is kept
    fn commit(&mut self, store: &mut dyn KeyValueStore, notes: Vec<TaskNote>) -> Result<(), String> {
        let raw = serde_json::to_string(&notes)
            .map_err(|e| format!("Failed to serialize task notes: {}", e))?;
        store.set(TASK_NOTES_KEY, &raw)?;
        info!("Saved {} task notes", notes.len());
        self.notes = notes;
        Ok(())
    }
}

fn new_id(now: DateTime<Utc>, salt: usize) -> String {
    format!("{}{}", now.timestamp_millis(), salt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn notepad_save_load_clear() {
        let mut store = MemoryStore::new();
        assert_eq!(NotePad::load(&store), "");
        NotePad::save(&mut store, "draft").unwrap();
        assert_eq!(NotePad::load(&store), "draft");
        NotePad::clear(&mut store).unwrap();
        assert_eq!(NotePad::load(&store), "");
    }

    #[test]
    fn add_update_delete() {
        let mut store = MemoryStore::new();
        let mut notes = TaskNotes::load(&store);

        let first = notes.add(&mut store, "write report", Some(Category::Work)).unwrap();
        let second = notes.add(&mut store, "  read chapter 3 ", Some(Category::Study)).unwrap();
        assert_eq!(second.text, "read chapter 3");
        assert_ne!(first.id, second.id);
        assert_eq!(notes.all()[0].id, second.id);

        let edited = notes.update(&mut store, &first.id, "write summary", None).unwrap();
        assert!(edited.last_edited.is_some());
        assert_eq!(edited.category, None);

        notes.delete(&mut store, &second.id).unwrap();
        assert!(notes.delete(&mut store, &second.id).is_err());

        let reloaded = TaskNotes::load(&store);
        assert_eq!(reloaded.all().len(), 1);
        assert_eq!(reloaded.all()[0].text, "write summary");
    }

    #[test]
    fn blank_notes_are_rejected() {
        let mut store = MemoryStore::new();
        let mut notes = TaskNotes::default();
        assert!(notes.add(&mut store, "   ", None).is_err());
        assert!(notes.all().is_empty());
        assert!(notes.update(&mut store, "missing", "x", None).is_err());
    }

    #[test]
    fn search_by_text_and_category() {
        let mut store = MemoryStore::new();
        let mut notes = TaskNotes::default();
        notes.add(&mut store, "Email Alice", Some(Category::Work)).unwrap();
        notes.add(&mut store, "email landlord", Some(Category::Personal)).unwrap();
        notes.add(&mut store, "App idea", Some(Category::Idea)).unwrap();

        assert_eq!(notes.search(Some("EMAIL"), None).len(), 2);
        assert_eq!(notes.search(Some("email"), Some(Category::Work)).len(), 1);
        assert_eq!(notes.search(None, Some(Category::Idea)).len(), 1);
        assert_eq!(notes.search(None, None).len(), 3);
    }

    #[test]
    fn legacy_plain_text_is_migrated() {
        let mut store = MemoryStore::new();
        store.set(TASK_NOTES_KEY, "old free text").unwrap();
        let notes = TaskNotes::load(&store);
        assert_eq!(notes.all().len(), 1);
        assert_eq!(notes.all()[0].text, "old free text");
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), String> {
            Err("disk full".to_string())
        }

        fn remove(&mut self, _key: &str) -> Result<(), String> {
            Err("disk full".to_string())
        }
    }

    #[test]
    fn failed_save_leaves_notes_unchanged() {
        let mut store = MemoryStore::new();
        let mut notes = TaskNotes::default();
        let kept = notes.add(&mut store, "write report", Some(Category::Work)).unwrap();

        let mut broken = ReadOnlyStore(store);
        assert!(notes.add(&mut broken, "never saved", None).is_err());
        assert_eq!(notes.all().len(), 1);

        assert!(notes.update(&mut broken, &kept.id, "changed", None).is_err());
        assert_eq!(notes.all()[0].text, "write report");
        assert_eq!(notes.all()[0].last_edited, None);

        assert!(notes.delete(&mut broken, &kept.id).is_err());
        assert_eq!(notes.all(), std::slice::from_ref(&kept));
    }

    #[test]
    fn category_parsing() {
        assert_eq!("Idea".parse::<Category>(), Ok(Category::Idea));
        assert!("chores".parse::<Category>().is_err());
    }
}
