//! Progress storage seam used by review sessions.

use std::collections::HashMap;

use crate::error::MemoryStoreError;
use crate::types::{NewWordProgress, ProgressState, WordProgress};

/// Persistence for word progress records of one learner.
pub trait ProgressStore {
    type Error: std::error::Error + 'static;

    /// Find the record for a word in a target language.
    fn find_by_word(
        &self,
        word_id: i64,
        language_id: i64,
    ) -> Result<Option<WordProgress>, Self::Error>;

    /// Create a record for a word answered for the first time.
    fn create(&mut self, progress: NewWordProgress) -> Result<WordProgress, Self::Error>;

    /// Replace the scheduling state of an existing record.
    fn update(
        &mut self,
        progress_id: i64,
        state: &ProgressState,
    ) -> Result<WordProgress, Self::Error>;
}

/// Progress store kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    records: HashMap<i64, WordProgress>,
    next_id: i64,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a record by id.
    pub fn get(&self, progress_id: i64) -> Option<&WordProgress> {
        self.records.get(&progress_id)
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete(&mut self, progress_id: i64) -> bool {
        self.records.remove(&progress_id).is_some()
    }

    /// All records ordered by id.
    pub fn all(&self) -> Vec<&WordProgress> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by_key(|p| p.id);
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProgressStore for InMemoryProgressStore {
    type Error = MemoryStoreError;

    fn find_by_word(
        &self,
        word_id: i64,
        language_id: i64,
    ) -> Result<Option<WordProgress>, Self::Error> {
        Ok(self
            .records
            .values()
            .find(|p| p.word_id == word_id && p.target_language_id == language_id)
            .cloned())
    }

    fn create(&mut self, progress: NewWordProgress) -> Result<WordProgress, Self::Error> {
        if self.find_by_word(progress.word_id, progress.target_language_id)?.is_some() {
            return Err(MemoryStoreError::Duplicate {
                word_id: progress.word_id,
                language_id: progress.target_language_id,
            });
        }

        self.next_id += 1;
        let record = WordProgress {
            id: self.next_id,
            word_id: progress.word_id,
            target_language_id: progress.target_language_id,
            state: progress.state,
        };
        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(
        &mut self,
        progress_id: i64,
        state: &ProgressState,
    ) -> Result<WordProgress, Self::Error> {
        let record = self
            .records
            .get_mut(&progress_id)
            .ok_or(MemoryStoreError::NotFound(progress_id))?;
        record.state = state.clone();
        Ok(record.clone())
    }
}
