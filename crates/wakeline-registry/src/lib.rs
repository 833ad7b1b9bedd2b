//! wakeline-registry: vessel lookups keyed by MMSI (sans-IO).
//!
//! Three independent stores, each built from a JSON document the caller
//! has already read:
//!
//! - ship base information ([`RecordStore<ShipBaseInfo>`])
//! - sailing performance ([`RecordStore<ShipPerformance>`])
//! - precomputed optimization suggestions ([`OptimizationStore`])
//!
//! None of them depend on the track simplification pipeline.

pub mod store;
pub mod types;

pub use store::{OptimizationStore, RecordStore};
pub use types::{LookupError, Mmsi, MmsiRecord, RecordKind, ShipBaseInfo, ShipPerformance};

/// Ship base information store.
pub type ShipRegistry = RecordStore<ShipBaseInfo>;

/// Ship performance store.
pub type PerformanceTable = RecordStore<ShipPerformance>;
