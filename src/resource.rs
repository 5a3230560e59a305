//! The capability set a resource handler may implement.
//!
//! A handler binds a named resource to up to five CRUD operations. Every
//! method has a default body returning [`RestError::NotImplemented`], so a
//! handler overrides exactly the capabilities it supports; the dispatcher
//! translates the default into 404, wire-indistinguishable from an unknown
//! route. A handler overriding nothing is a legal, degenerate registration.
//!
//! Handlers own their backing store: construct the store in the application
//! and let the handler close over it (or hold it in a field). The dispatcher
//! never touches storage directly.
//!
//! Operations are async so a capability that cannot complete immediately
//! suspends the request instead of blocking the serving thread. Results are
//! plain [`serde_json::Value`]s; the core performs no schema validation.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{RestError, Result};

/// The five optional CRUD capabilities of a registered resource.
///
/// Implement only what the resource supports:
///
/// ```
/// use async_trait::async_trait;
/// use restish::{ResourceHandler, Result};
/// use serde_json::{Value, json};
///
/// struct Readonly;
///
/// #[async_trait]
/// impl ResourceHandler for Readonly {
///     async fn list_collection(&self) -> Result<Vec<Value>> {
///         Ok(vec![json!({"id": 1, "text": "hi"})])
///     }
/// }
/// ```
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    /// Return the full ordered collection.
    async fn list_collection(&self) -> Result<Vec<Value>> {
        Err(RestError::NotImplemented)
    }

    /// Return the instance with the given id, or [`RestError::NotFound`].
    async fn get_one(&self, id: &str) -> Result<Value> {
        let _ = id;
        Err(RestError::NotImplemented)
    }

    /// Store a new instance and return it with its assigned id.
    async fn create(&self, resource: Value) -> Result<Value> {
        let _ = resource;
        Err(RestError::NotImplemented)
    }

    /// Replace the instance with the given id, or fail with
    /// [`RestError::NotFound`].
    ///
    /// The dispatcher has already forced the resource's `id` field to the
    /// URL-supplied id before this is invoked.
    async fn update(&self, resource: Value, id: &str) -> Result<()> {
        let _ = (resource, id);
        Err(RestError::NotImplemented)
    }

    /// Remove the instance with the given id, or fail with
    /// [`RestError::NotFound`].
    async fn delete(&self, id: &str) -> Result<()> {
        let _ = id;
        Err(RestError::NotImplemented)
    }
}
