//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values.
/// They are immutable: to "change" one, build a new one.
///
/// `Money` is one: two amounts of 5.00 are the same amount. Items are not;
/// they are identified by their id.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
