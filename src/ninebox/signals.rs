//! Read-only adapters over the external signal store and raw source systems.
//!
//! The traits mirror the collaborator contracts the engine consumes; the
//! in-memory implementations back the test suite, the demo command, and the
//! default server wiring.

use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{EmployeeId, RawSourceKind, SignalCategory, SignalSnapshot};

/// Failure reaching a collaborator on the scoring read path.
#[derive(Debug, thiserror::Error)]
pub enum SignalStoreError {
    #[error("signal store unavailable: {0}")]
    Unavailable(String),
}

/// Access to normalized talent signals.
///
/// More than one current snapshot may exist per category when several
/// feedback channels report it; the scorer aggregates them.
pub trait SignalStore: Send + Sync {
    fn current_signals(
        &self,
        employee: &EmployeeId,
        category: &SignalCategory,
    ) -> Result<Vec<SignalSnapshot>, SignalStoreError>;
}

/// Access to the latest raw record per source system (appraisal, goals,
/// potential assessments), on each system's documented scale.
pub trait RawSourceProvider: Send + Sync {
    fn latest_value(
        &self,
        employee: &EmployeeId,
        kind: RawSourceKind,
    ) -> Result<Option<f64>, SignalStoreError>;
}

/// Mutex-backed signal store so the engine can be exercised in isolation.
#[derive(Debug, Default)]
pub struct InMemorySignalStore {
    snapshots: Mutex<HashMap<EmployeeId, Vec<SignalSnapshot>>>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, employee: EmployeeId, snapshot: SignalSnapshot) {
        let mut snapshots = self.snapshots.lock().expect("signal store poisoned");
        snapshots.entry(employee).or_default().push(snapshot);
    }
}

impl SignalStore for InMemorySignalStore {
    fn current_signals(
        &self,
        employee: &EmployeeId,
        category: &SignalCategory,
    ) -> Result<Vec<SignalSnapshot>, SignalStoreError> {
        let snapshots = self.snapshots.lock().expect("signal store poisoned");
        Ok(snapshots
            .get(employee)
            .map(|all| {
                all.iter()
                    .filter(|snapshot| snapshot.is_current && snapshot.category == *category)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Mutex-backed raw source provider keeping one latest value per system.
#[derive(Debug, Default)]
pub struct InMemoryRawSources {
    values: Mutex<HashMap<(EmployeeId, RawSourceKind), f64>>,
}

impl InMemoryRawSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, employee: EmployeeId, kind: RawSourceKind, value: f64) {
        let mut values = self.values.lock().expect("raw source store poisoned");
        values.insert((employee, kind), value);
    }
}

impl RawSourceProvider for InMemoryRawSources {
    fn latest_value(
        &self,
        employee: &EmployeeId,
        kind: RawSourceKind,
    ) -> Result<Option<f64>, SignalStoreError> {
        let values = self.values.lock().expect("raw source store poisoned");
        Ok(values.get(&(employee.clone(), kind)).copied())
    }
}
