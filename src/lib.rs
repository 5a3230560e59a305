//! restish: a REST resource dispatch layer for axum.
//!
//! Register a named resource with whatever subset of the five CRUD
//! capabilities it implements, and get the conventional HTTP routes with
//! content negotiation across URL extensions, a callback override parameter,
//! and quality-weighted `Accept` headers.
//!
//! - **[`ResourceHandler`]**: the capability set (list, get, create, update,
//!   delete), every operation optional.
//! - **[`Encoder`]**: a representation format (MIME type + extension token +
//!   serialize/parse). Built-ins: [`JsonEncoder`], [`JsonpEncoder`],
//!   [`HtmlEncoder`]; register your own for anything else.
//! - **[`RestApi`]**: the registry; produces an [`axum::Router`] with four
//!   route patterns per resource.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use restish::{ResourceHandler, RestApi, Result};
//! use serde_json::{Value, json};
//! use std::sync::Arc;
//!
//! struct Greetings;
//!
//! #[async_trait]
//! impl ResourceHandler for Greetings {
//!     async fn list_collection(&self) -> Result<Vec<Value>> {
//!         Ok(vec![json!({"id": 1, "text": "hello"})])
//!     }
//! }
//!
//! let mut api = RestApi::new();
//! api.add_resource("greetings", Arc::new(Greetings)).unwrap();
//! let router = api.into_router();
//! // hand `router` to axum::serve(...)
//! # let _ = router;
//! ```

pub mod config;
pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod negotiation;
pub mod registry;
pub mod resource;
pub mod routes;

pub use config::ApiConfig;
pub use dispatch::CALLBACK_PARAM;
pub use encoding::{EncodeContext, Encoder, HtmlEncoder, JsonEncoder, JsonpEncoder, Payload};
pub use error::{RestError, Result};
pub use negotiation::{MediaRange, NegotiationContext, parse_accept, select_decoder, select_encoder};
pub use registry::RestApi;
pub use resource::ResourceHandler;
pub use routes::RouteSet;
