use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope for a change event, carrying delivery metadata.
///
/// Notes:
/// - `source` names the collection that changed (e.g. "products").
/// - `sequence_number` increases by one per published change of a store, so a
///   subscriber can tell whether it missed notifications.
/// - `payload` is the domain-specific change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEnvelope<E> {
    event_id: Uuid,
    source: String,

    /// Monotonically increasing position in the store's change stream.
    sequence_number: u64,

    payload: E,
}

impl<E> ChangeEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        source: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            source: source.into(),
            sequence_number,
            payload,
        }
    }

    /// Wrap a payload with a fresh time-ordered event id.
    pub fn wrap(source: impl Into<String>, sequence_number: u64, payload: E) -> Self {
        Self::new(Uuid::now_v7(), source, sequence_number, payload)
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }
}
