//! Entity trait: identity that survives state changes.

/// An object defined by its identifier rather than its attributes.
///
/// Two products with the same id are the same product, even when one of them
/// carries a stale price.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
