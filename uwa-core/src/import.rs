//! Bulk import of field sets from an external tabular source.
//!
//! Rows are applied in input order and independently: a failing row never
//! prevents later rows from being created, and there is no cross-row
//! rollback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::matrix::ProfileSet;
use crate::store::{RecordStore, StoreError};
use crate::types::{EntityType, RawFieldSet, UnknownFieldPolicy, UwaRecord};

/// An untyped import row, as read from a CSV-like or JSON source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    /// Entity type name, parsed leniently
    pub entity_type: String,
    /// Raw field name -> value
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl ImportRow {
    /// Convert to typed inputs.
    pub fn parse(
        &self,
        policy: UnknownFieldPolicy,
    ) -> Result<(EntityType, RawFieldSet), StoreError> {
        let entity_type = self
            .entity_type
            .parse::<EntityType>()
            .map_err(|e| StoreError::InvalidRow(e.to_string()))?;
        let fields = RawFieldSet::from_pairs(&self.fields, policy)
            .map_err(|e| StoreError::InvalidRow(e.to_string()))?;
        Ok((entity_type, fields))
    }
}

impl RecordStore {
    /// Create one record per typed row, preserving input order.
    pub fn import(
        &self,
        rows: impl IntoIterator<Item = (EntityType, RawFieldSet)>,
        profiles: &ProfileSet,
    ) -> Vec<Result<UwaRecord, StoreError>> {
        let results: Vec<_> = rows
            .into_iter()
            .map(|(entity_type, fields)| {
                let profile = profiles.get(entity_type).ok_or_else(|| {
                    StoreError::InvalidRow(format!("no profile for {entity_type}"))
                })?;
                self.create(entity_type, fields, profile)
            })
            .collect();

        log_summary(&results);
        results
    }

    /// Parse and create one record per untyped row, preserving input order.
    pub fn import_rows(
        &self,
        rows: impl IntoIterator<Item = ImportRow>,
        profiles: &ProfileSet,
        policy: UnknownFieldPolicy,
    ) -> Vec<Result<UwaRecord, StoreError>> {
        let results: Vec<_> = rows
            .into_iter()
            .map(|row| {
                let (entity_type, fields) = row.parse(policy)?;
                let profile = profiles.get(entity_type).ok_or_else(|| {
                    StoreError::InvalidRow(format!("no profile for {entity_type}"))
                })?;
                self.create(entity_type, fields, profile)
            })
            .collect();

        log_summary(&results);
        results
    }
}

fn log_summary(results: &[Result<UwaRecord, StoreError>]) {
    let failed = results.iter().filter(|r| r.is_err()).count();
    tracing::info!(
        rows = results.len(),
        created = results.len() - failed,
        failed,
        "Import finished"
    );
}
