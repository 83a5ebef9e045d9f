//! Value object trait: equality by value, not identity.
//!
//! Every record flowing through the analytics engine (demand samples, item
//! snapshots, result records) is a value object: it has no lifecycle beyond the
//! call that produced it and two records with the same fields are the same.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one with the new values.
///
/// The trait requires:
/// - **Clone**: values are copied freely between the engine and its callers
/// - **PartialEq**: values are compared by their attributes
/// - **Debug**: values show up in logs and test failures
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct DemandSample {
///     period: NaiveDate,
///     demand: f64,
/// }
///
/// impl ValueObject for DemandSample {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
