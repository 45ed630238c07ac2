//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new one. A product's price is a value object; the
/// product itself is an [`Entity`](crate::Entity).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
