//! Value object marker: equality by value, not identity.

/// Marker trait for value objects.
///
/// Invoice parts (customer, line item, tax snapshot, payment) carry no identity
/// of their own; two of them with the same attribute values are the same thing.
/// They live only inside the invoice that embeds them.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
