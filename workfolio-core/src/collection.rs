use crate::{CoreError, NewWork, Work, WorkId, WorkPatch};
use chrono::{DateTime, Utc};

/// The authoritative, insertion-ordered set of works.
///
/// All mutation goes through this type so that id assignment and the
/// non-empty field rules hold no matter which backend owns it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkCollection {
    works: Vec<Work>,
}

impl WorkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(works: Vec<Work>) -> Self {
        Self { works }
    }

    pub fn as_slice(&self) -> &[Work] {
        &self.works
    }

    pub fn into_vec(self) -> Vec<Work> {
        self.works
    }

    pub fn len(&self) -> usize {
        self.works.len()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    /// One more than the largest id present, or 1 for an empty collection.
    pub fn next_id(&self) -> WorkId {
        self.works.iter().map(|w| w.id).max().unwrap_or(0) + 1
    }

    pub fn get(&self, id: WorkId) -> Result<&Work, CoreError> {
        self.works
            .iter()
            .find(|w| w.id == id)
            .ok_or(CoreError::NotFound(id))
    }

    fn position(&self, id: WorkId) -> Result<usize, CoreError> {
        self.works
            .iter()
            .position(|w| w.id == id)
            .ok_or(CoreError::NotFound(id))
    }

    pub fn insert(&mut self, new: NewWork, now: DateTime<Utc>) -> Result<Work, CoreError> {
        new.validate()?;
        let work = Work::from_new(self.next_id(), new, now);
        self.works.push(work.clone());
        Ok(work)
    }

    /// Applies `patch` to the work with `id`. The stored record is only
    /// replaced once the merged copy has passed validation.
    pub fn update(
        &mut self,
        id: WorkId,
        patch: &WorkPatch,
        now: DateTime<Utc>,
    ) -> Result<Work, CoreError> {
        let idx = self.position(id)?;
        let merged = self.works[idx].merged(patch, now);
        if patch.touches_required() {
            merged.validate()?;
        }
        self.works[idx] = merged.clone();
        Ok(merged)
    }

    pub fn remove(&mut self, id: WorkId) -> Result<Work, CoreError> {
        let idx = self.position(id)?;
        Ok(self.works.remove(idx))
    }
}
