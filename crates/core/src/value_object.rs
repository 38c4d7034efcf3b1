//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// A value object has no identity of its own: two `Distribution` legs with the
/// same driver and plate are equal. Inside an aggregate they are replaced
/// wholesale or appended, never edited in place.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Winery {
///     name: String,
///     volume: f64,
/// }
///
/// impl ValueObject for Winery {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
