//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Every record the analytics engine produces (seasonal patterns, predictions,
/// reorder points, ABC buckets) is computed fresh from its inputs and compared
/// by value. None of them carry identity across calls, so they are freely
/// cloned and shared between tasks.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
