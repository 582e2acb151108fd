//! Bandwidth reservation.
//!
//! The allocator is the only shared mutable collaborator of the compilers.
//! Reservations are keyed by the owning intent and are all-or-nothing: either
//! every requested point is reserved or the ledger is left untouched.
//! Allocating again for the same owner replaces its previous reservation.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;
use tracing::debug;

use crate::errors::{IntentError, IntentResult};
use crate::model::intent::Key;
use crate::model::net::ConnectPoint;

pub trait BandwidthAllocator: Send + Sync {
    /// Reserve `bps` on every point for `owner`.
    fn allocate(&self, owner: &Key, points: &BTreeSet<ConnectPoint>, bps: u64) -> IntentResult<()>;

    /// Drop every reservation held by `owner`. Unknown owners are ignored.
    fn release(&self, owner: &Key);
}

#[derive(Debug, Default)]
struct Ledger {
    used: BTreeMap<ConnectPoint, u64>,
    owners: BTreeMap<Key, Reservation>,
}

#[derive(Debug, Clone)]
struct Reservation {
    points: BTreeSet<ConnectPoint>,
    bps: u64,
}

impl Ledger {
    fn remove(&mut self, owner: &Key) -> Option<Reservation> {
        let res = self.owners.remove(owner)?;
        for point in &res.points {
            if let Some(used) = self.used.get_mut(point) {
                *used = used.saturating_sub(res.bps);
                if *used == 0 {
                    self.used.remove(point);
                }
            }
        }
        Some(res)
    }

    fn add(&mut self, owner: Key, res: Reservation) {
        for point in &res.points {
            *self.used.entry(point.clone()).or_insert(0) += res.bps;
        }
        self.owners.insert(owner, res);
    }
}

/// In-process allocator with a fixed capacity per connection point.
///
/// Points without an explicit capacity use the default capacity; with no
/// default they are unconstrained.
#[derive(Debug, Default)]
pub struct LocalBandwidthPool {
    capacities: BTreeMap<ConnectPoint, u64>,
    default_capacity: Option<u64>,
    ledger: Mutex<Ledger>,
}

impl LocalBandwidthPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_capacity(mut self, bps: u64) -> Self {
        self.default_capacity = Some(bps);
        self
    }

    pub fn with_capacity(mut self, point: ConnectPoint, bps: u64) -> Self {
        self.capacities.insert(point, bps);
        self
    }

    fn capacity(&self, point: &ConnectPoint) -> Option<u64> {
        self.capacities.get(point).copied().or(self.default_capacity)
    }

    /// Bandwidth currently reserved on `point` across all owners.
    pub fn used(&self, point: &ConnectPoint) -> u64 {
        self.ledger.lock().used.get(point).copied().unwrap_or(0)
    }

    pub fn reserved_by(&self, owner: &Key) -> Option<(BTreeSet<ConnectPoint>, u64)> {
        self.ledger
            .lock()
            .owners
            .get(owner)
            .map(|r| (r.points.clone(), r.bps))
    }
}

impl BandwidthAllocator for LocalBandwidthPool {
    fn allocate(&self, owner: &Key, points: &BTreeSet<ConnectPoint>, bps: u64) -> IntentResult<()> {
        let mut ledger = self.ledger.lock();
        let previous = ledger.remove(owner);

        let short = points.iter().find(|point| match self.capacity(point) {
            Some(cap) => ledger.used.get(*point).copied().unwrap_or(0).saturating_add(bps) > cap,
            None => false,
        });

        if let Some(point) = short {
            let msg = format!(
                "{bps}bps not available on {point} for {owner} (capacity {}, in use {})",
                self.capacity(point).unwrap_or(0),
                ledger.used.get(point).copied().unwrap_or(0),
            );
            if let Some(prev) = previous {
                ledger.add(owner.clone(), prev);
            }
            return Err(IntentError::resource_allocation(msg));
        }

        ledger.add(
            owner.clone(),
            Reservation {
                points: points.clone(),
                bps,
            },
        );
        debug!(owner = %owner, points = points.len(), bps, "bandwidth reserved");
        Ok(())
    }

    fn release(&self, owner: &Key) {
        if self.ledger.lock().remove(owner).is_some() {
            debug!(owner = %owner, "bandwidth released");
        }
    }
}
