//! Value object trait: equality by value, not identity.
//!
//! Every input record of the metrics engine is a value object. Two sales rows
//! with the same fields are the same row as far as any KPI is concerned.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" a
/// record, build a new one; calculators only ever borrow them.
///
/// ## Usage Pattern
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Reading {
///     sku_id: String,
///     units: f64,
/// }
///
/// impl ValueObject for Reading {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
