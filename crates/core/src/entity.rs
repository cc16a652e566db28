//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// A product keeps its identifier across updates and sales; two records with the same
/// identifier describe the same row, whatever their other fields say.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// Whether `other` is the same entity (same identity, possibly different state).
    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
