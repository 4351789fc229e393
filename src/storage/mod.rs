//! Storage module
//!
//! Local key-value persistence and the note utilities that live on top of it.
//! The timer itself keeps no persistent state.

pub mod kv;
pub mod notes;

pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use notes::{Category, NotePad, TaskNote, TaskNotes};
