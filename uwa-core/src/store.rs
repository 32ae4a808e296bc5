//! Identity record store.
//!
//! An in-memory table of generated records. All state sits behind a single
//! reader-writer lock; writers hold it across id allocation, duplicate
//! validation and insertion. Durability is delegated to [`PersistenceHook`]s,
//! which are notified after each successful mutation.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::matrix::EntityTypeProfile;
use crate::synthesis::{SynthesisError, UwaSynthesizer};
use crate::types::{EntityType, FieldName, RawFieldSet, UwaRecord};

/// Error types for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(u64),

    /// Token synthesis failed
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Another record already holds the token
    #[error("Token {token} already held by record {existing_id}")]
    DuplicateToken { token: String, existing_id: u64 },

    /// A restored record's token does not match its fields
    #[error("Token for record {id} does not match its fields")]
    TokenMismatch { id: u64 },

    /// A restored record reuses an id already in the store
    #[error("Record id already in use: {0}")]
    IdConflict(u64),

    /// An import row could not be interpreted
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A successful mutation, delivered to persistence hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEvent {
    Created(UwaRecord),
    Updated(UwaRecord),
    ActiveChanged { id: u64, active: bool },
    Deleted { id: u64 },
}

/// Caller-provided persistence collaborator.
///
/// Hooks run after the store lock is released, in registration order.
pub trait PersistenceHook: Send + Sync {
    /// Observe a committed mutation.
    fn on_event(&self, event: &RecordEvent);
}

/// Field a text filter matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// The raw token
    Token,
    /// One raw field
    Field(FieldName),
    /// Any raw field
    AnyField,
}

/// Case-insensitive substring predicate over one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub field: FilterField,
    pub needle: String,
}

/// Predicate over records. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Entity type equality
    pub entity_type: Option<EntityType>,
    /// Substring match
    pub text: Option<TextMatch>,
    /// Only active records
    pub active_only: bool,
}

impl RecordFilter {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builder: match an entity type.
    pub fn entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    /// Builder: match a substring in a field.
    pub fn text(mut self, field: FilterField, needle: impl Into<String>) -> Self {
        self.text = Some(TextMatch {
            field,
            needle: needle.into(),
        });
        self
    }

    /// Builder: only active records.
    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// Whether a record satisfies the filter.
    pub fn matches(&self, record: &UwaRecord) -> bool {
        if self.entity_type.is_some_and(|e| e != record.entity_type) {
            return false;
        }
        if self.active_only && !record.active {
            return false;
        }
        match &self.text {
            None => true,
            Some(m) => {
                let needle = m.needle.to_lowercase();
                let hit = |value: &str| value.to_lowercase().contains(&needle);
                match m.field {
                    FilterField::Token => hit(&record.token),
                    FilterField::Field(field) => record.fields.get(field).is_some_and(hit),
                    FilterField::AnyField => record.fields.iter().any(|(_, v)| hit(v)),
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    next_id: u64,
    // ids are allocated monotonically, so key order is insertion order
    records: BTreeMap<u64, UwaRecord>,
}

impl StoreState {
    fn holder_of(&self, token: &str, except: Option<u64>) -> Option<u64> {
        self.records
            .values()
            .find(|r| r.token == token && Some(r.id) != except)
            .map(|r| r.id)
    }
}

/// In-memory store of UWA records.
pub struct RecordStore {
    state: RwLock<StoreState>,
    synthesizer: UwaSynthesizer,
    reject_duplicate_tokens: bool,
    hooks: Vec<Arc<dyn PersistenceHook>>,
    store_id: String,
}

impl RecordStore {
    /// Create an empty store with the default synthesizer.
    pub fn new() -> Self {
        Self::with_synthesizer(UwaSynthesizer::new())
    }

    /// Create an empty store around a synthesizer.
    pub fn with_synthesizer(synthesizer: UwaSynthesizer) -> Self {
        Self {
            state: RwLock::new(StoreState {
                next_id: 1,
                records: BTreeMap::new(),
            }),
            synthesizer,
            reject_duplicate_tokens: true,
            hooks: Vec::new(),
            store_id: String::new(),
        }
    }

    /// Create a store from configuration.
    pub fn from_config(config: &crate::config::UwaConfig) -> Self {
        Self::with_synthesizer(config.synthesizer())
            .with_duplicate_tokens_rejected(config.reject_duplicate_tokens)
            .with_store_id(config.store_id.clone())
    }

    /// Builder: whether duplicate tokens are rejected.
    pub fn with_duplicate_tokens_rejected(mut self, reject: bool) -> Self {
        self.reject_duplicate_tokens = reject;
        self
    }

    /// Builder: id attached to log events.
    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = store_id.into();
        self
    }

    /// Builder: register a persistence hook.
    pub fn with_hook(mut self, hook: Arc<dyn PersistenceHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// The synthesizer used for create and update.
    pub fn synthesizer(&self) -> &UwaSynthesizer {
        &self.synthesizer
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Storage("record store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Storage("record store lock poisoned".to_string()))
    }

    fn notify(&self, event: RecordEvent) {
        for hook in &self.hooks {
            hook.on_event(&event);
        }
    }

    /// Synthesize a token and insert a new active record.
    pub fn create(
        &self,
        entity_type: EntityType,
        fields: RawFieldSet,
        profile: &EntityTypeProfile,
    ) -> Result<UwaRecord, StoreError> {
        let token = self.synthesizer.synthesize(entity_type, &fields, profile)?;

        let record = {
            let mut state = self.write()?;
            if self.reject_duplicate_tokens {
                if let Some(existing_id) = state.holder_of(&token, None) {
                    return Err(StoreError::DuplicateToken { token, existing_id });
                }
            }

            let id = state.next_id;
            state.next_id = next_id_after(id)?;

            let record = UwaRecord {
                id,
                token,
                entity_type,
                fields,
                created_at: Utc::now(),
                updated_at: None,
                active: true,
                profile_fingerprint: profile.fingerprint(),
            };
            state.records.insert(id, record.clone());
            record
        };

        tracing::debug!(
            store_id = %self.store_id,
            record_id = record.id,
            entity_type = %entity_type,
            "Created record"
        );
        self.notify(RecordEvent::Created(record.clone()));
        Ok(record)
    }

    /// Replace a record's fields and regenerate its token.
    pub fn update(
        &self,
        id: u64,
        fields: RawFieldSet,
        profile: &EntityTypeProfile,
    ) -> Result<UwaRecord, StoreError> {
        let record = {
            let mut state = self.write()?;
            let entity_type = state
                .records
                .get(&id)
                .map(|r| r.entity_type)
                .ok_or(StoreError::NotFound(id))?;

            let token = self.synthesizer.synthesize(entity_type, &fields, profile)?;
            if self.reject_duplicate_tokens {
                if let Some(existing_id) = state.holder_of(&token, Some(id)) {
                    return Err(StoreError::DuplicateToken { token, existing_id });
                }
            }

            let record = state.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            record.token = token;
            record.fields = fields;
            record.updated_at = Some(Utc::now());
            record.profile_fingerprint = profile.fingerprint();
            record.clone()
        };

        tracing::debug!(store_id = %self.store_id, record_id = id, "Updated record");
        self.notify(RecordEvent::Updated(record.clone()));
        Ok(record)
    }

    /// Remove a record permanently.
    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        {
            let mut state = self.write()?;
            state.records.remove(&id).ok_or(StoreError::NotFound(id))?;
        }

        tracing::debug!(store_id = %self.store_id, record_id = id, "Deleted record");
        self.notify(RecordEvent::Deleted { id });
        Ok(())
    }

    /// Mark a record active or inactive.
    pub fn set_active(&self, id: u64, active: bool) -> Result<(), StoreError> {
        {
            let mut state = self.write()?;
            let record = state.records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            record.active = active;
        }

        tracing::debug!(store_id = %self.store_id, record_id = id, active, "Changed record state");
        self.notify(RecordEvent::ActiveChanged { id, active });
        Ok(())
    }

    /// Get a record by id.
    pub fn get(&self, id: u64) -> Result<UwaRecord, StoreError> {
        let state = self.read()?;
        state.records.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Snapshot of all records in insertion order.
    pub fn records(&self) -> Result<Vec<UwaRecord>, StoreError> {
        let state = self.read()?;
        Ok(state.records.values().cloned().collect())
    }

    /// Get total count of stored records.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.records.len())
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.records.is_empty())
    }

    /// A restartable view of the records matching `filter`.
    pub fn filter(&self, filter: RecordFilter) -> RecordView<'_> {
        RecordView {
            store: self,
            filter,
        }
    }

    /// Load previously persisted records.
    ///
    /// Each record's token must equal the token derived from its fields, and
    /// its id must be unused. Records are validated and inserted one at a
    /// time; the id counter moves past the largest id seen. Hooks are not
    /// notified.
    pub fn restore(
        &self,
        records: impl IntoIterator<Item = UwaRecord>,
    ) -> Result<usize, StoreError> {
        let mut state = self.write()?;
        let mut restored = 0;

        for record in records {
            let derived = self.synthesizer.derive(record.entity_type, &record.fields)?;
            if derived != record.token {
                return Err(StoreError::TokenMismatch { id: record.id });
            }
            if state.records.contains_key(&record.id) {
                return Err(StoreError::IdConflict(record.id));
            }
            if self.reject_duplicate_tokens {
                if let Some(existing_id) = state.holder_of(&record.token, None) {
                    return Err(StoreError::DuplicateToken {
                        token: record.token,
                        existing_id,
                    });
                }
            }

            state.next_id = state.next_id.max(next_id_after(record.id)?);
            state.records.insert(record.id, record);
            restored += 1;
        }

        tracing::info!(store_id = %self.store_id, restored, "Restored records");
        Ok(restored)
    }
}

fn next_id_after(id: u64) -> Result<u64, StoreError> {
    id.checked_add(1)
        .ok_or_else(|| StoreError::Storage("record id space exhausted".to_string()))
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazily evaluated, restartable filter over a store.
///
/// Every call to [`RecordView::iter`] re-reads the current store state.
pub struct RecordView<'a> {
    store: &'a RecordStore,
    filter: RecordFilter,
}

impl RecordView<'_> {
    /// Iterate over matching records in insertion order.
    pub fn iter(&self) -> Result<std::vec::IntoIter<UwaRecord>, StoreError> {
        let state = self.store.read()?;
        let matching: Vec<UwaRecord> = state
            .records
            .values()
            .filter(|r| self.filter.matches(r))
            .cloned()
            .collect();
        Ok(matching.into_iter())
    }

    /// Number of currently matching records.
    pub fn count(&self) -> Result<usize, StoreError> {
        let state = self.store.read()?;
        Ok(state.records.values().filter(|r| self.filter.matches(r)).count())
    }
}
