use crate::error::PondforgeError;
use pondforge_schemas::{MeasurementId, PondId};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub const POND_INDEX_CAPACITY: usize = 1000;
pub const CRITICAL_INDEX_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Every measurement of a pond.
    Pond,
    /// Only the critical measurements of a pond.
    Critical,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Pond => f.write_str("pond"),
            IndexKind::Critical => f.write_str("critical"),
        }
    }
}

/// Proof that an owner had room for one more element when it was issued.
///
/// Only `BoundedIndex::reserve` creates one; it is consumed by `commit`.
/// Crate-private: holders must commit before reserving the same owner again.
#[derive(Debug)]
#[must_use]
pub(crate) struct Reservation {
    kind: IndexKind,
    owner: PondId,
}

/// Append-only, per-pond lists of measurement ids with a hard ceiling.
///
/// A full list stays full: there is no eviction.
#[derive(Debug, Clone)]
pub struct BoundedIndex {
    kind: IndexKind,
    capacity: usize,
    entries: HashMap<PondId, Vec<MeasurementId>>,
}

impl BoundedIndex {
    pub fn new(kind: IndexKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            entries: HashMap::new(),
        }
    }

    /// Appends at the tail, or fails without touching the list.
    pub fn append(&mut self, owner: PondId, element: MeasurementId) -> Result<(), PondforgeError> {
        let reservation = self.reserve(owner)?;
        self.commit(reservation, element);
        Ok(())
    }

    /// Checks for room without mutating anything.
    pub(crate) fn reserve(&self, owner: PondId) -> Result<Reservation, PondforgeError> {
        if self.len(owner) + 1 > self.capacity {
            return Err(PondforgeError::CapacityExceeded {
                index: self.kind,
                pond_id: owner,
                capacity: self.capacity,
            });
        }
        Ok(Reservation {
            kind: self.kind,
            owner,
        })
    }

    /// Infallible second half of `reserve`. The caller must not have appended
    /// to the same owner between the two calls.
    pub(crate) fn commit(&mut self, reservation: Reservation, element: MeasurementId) {
        debug_assert_eq!(reservation.kind, self.kind);
        let list = self.entries.entry(reservation.owner).or_default();
        debug_assert!(list.len() < self.capacity);
        list.push(element);
    }

    /// The owner's ids in insertion order; empty for an unknown owner.
    pub fn get(&self, owner: PondId) -> &[MeasurementId] {
        self.entries.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, owner: PondId) -> usize {
        self.entries.get(&owner).map_or(0, Vec::len)
    }

    /// Owners with at least one entry, ascending.
    pub fn owners(&self) -> Vec<PondId> {
        let mut owners: Vec<PondId> = self.entries.keys().copied().collect();
        owners.sort_unstable();
        owners
    }
}
