//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. `Money`, an option selection snapshot, or a customer
//! contact block are value objects.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by value. To "modify" one, build a
/// new one. Snapshots stored on an order (line items, selected options) are
/// value objects, which is what keeps historical orders stable when the live
/// catalog changes.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct SelectedOption { group_name: String, selection: String, extra_price: Money }
///
/// impl ValueObject for SelectedOption {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
