//! Snapshot decoding and reconciliation

pub mod reconciler;
pub mod snapshot;

pub use reconciler::{reconcile, ReconcileStats};
pub use snapshot::{
    decode_record, decode_records, AdvanceResponse, EntityRecord, InitRequest, InitResponse,
    RecordError, SnapshotResponse,
};
