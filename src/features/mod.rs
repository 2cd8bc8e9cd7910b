//! Feature modules - Surfaces the grid pipeline runs against
//!
//! This module contains the in-memory element tree used as the table's
//! external representation: element handles, attributes, style and change
//! subscriptions.

pub mod document;

// Re-export commonly used types
pub use document::{Document, ElementId, ElementKind, SubscriptionId};
