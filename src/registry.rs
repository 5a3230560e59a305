//! Resource registration and router assembly.
//!
//! [`RestApi`] is the registry: resources are added under unique names, each
//! with an ordered encoder sequence, and [`RestApi::into_router`] turns the
//! whole registry into an [`axum::Router`]. Routing state is built once here
//! and never mutated afterward; per-request state lives entirely in the
//! dispatcher.

use std::collections::HashSet;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::ApiConfig;
use crate::dispatch;
use crate::encoding::{Encoder, JsonEncoder, JsonpEncoder};
use crate::error::{RestError, Result};
use crate::resource::ResourceHandler;
use crate::routes::RouteSet;

/// Everything registered for one resource. Shared immutably across requests.
pub(crate) struct ResourceEntry {
    pub(crate) name: String,
    pub(crate) handler: Arc<dyn ResourceHandler>,
    pub(crate) encoders: Vec<Arc<dyn Encoder>>,
    pub(crate) routes: RouteSet,
    pub(crate) config: ApiConfig,
}

/// One route's view of a resource: the entry plus the extension the route
/// itself forces (collection-with-extension routes), if any.
pub(crate) struct RouteBinding {
    pub(crate) entry: Arc<ResourceEntry>,
    pub(crate) forced_extension: Option<String>,
}

/// Registry of REST resources; builds the conventional CRUD routes.
///
/// ```
/// use restish::{RestApi, ResourceHandler};
/// use std::sync::Arc;
///
/// struct Comments;
/// impl ResourceHandler for Comments {}
///
/// let mut api = RestApi::new();
/// api.add_resource("comments", Arc::new(Comments)).unwrap();
/// let router = api.into_router();
/// # let _ = router;
/// ```
#[derive(Default)]
pub struct RestApi {
    config: ApiConfig,
    entries: Vec<Arc<ResourceEntry>>,
    names: HashSet<String>,
}

impl RestApi {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ApiConfig) -> Self {
        RestApi {
            config,
            entries: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register a resource with the default encoder sequence
    /// (JSON first, then JSONP), making JSON the default representation.
    ///
    /// # Errors
    ///
    /// [`RestError::DuplicateResource`] if the name is already registered.
    pub fn add_resource(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<RouteSet> {
        let encoders: Vec<Arc<dyn Encoder>> = vec![
            Arc::new(JsonEncoder),
            Arc::new(JsonpEncoder::new(self.config.default_callback.clone())),
        ];
        self.add_resource_with_encoders(name, handler, encoders)
    }

    /// Register a resource with an explicit ordered encoder sequence.
    ///
    /// Order is significant: the first encoder is the default format and the
    /// tie-break for every negotiation fallback. The sequence is fixed at
    /// registration and never re-sorted.
    ///
    /// # Errors
    ///
    /// [`RestError::DuplicateResource`] if the name is already registered;
    /// [`RestError::NoEncoders`] if the sequence is empty;
    /// [`RestError::DuplicateExtension`] if two encoders share an extension
    /// token.
    pub fn add_resource_with_encoders(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ResourceHandler>,
        encoders: Vec<Arc<dyn Encoder>>,
    ) -> Result<RouteSet> {
        let name = name.into();
        if !self.names.insert(name.clone()) {
            return Err(RestError::DuplicateResource(name));
        }
        if encoders.is_empty() {
            self.names.remove(&name);
            return Err(RestError::NoEncoders(name));
        }
        let extensions: Vec<&str> = encoders.iter().map(|e| e.extension()).collect();
        if let Some(ext) = first_duplicate(&extensions) {
            self.names.remove(&name);
            return Err(RestError::DuplicateExtension(ext.to_string()));
        }
        let routes = RouteSet::for_resource(&self.config.prefix, &name, &extensions);
        self.entries.push(Arc::new(ResourceEntry {
            name,
            handler,
            encoders,
            routes: routes.clone(),
            config: self.config.clone(),
        }));
        Ok(routes)
    }

    /// The generated route set for a registered resource.
    #[must_use]
    pub fn routes(&self, name: &str) -> Option<&RouteSet> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.routes)
    }

    /// Assemble the axum router for every registered resource.
    ///
    /// Each resource contributes its collection route (with a trailing-slash
    /// alias), one concrete route per registered extension token, and its
    /// instance route. Every method
    /// router falls back to 404, so verb/shape combinations outside the
    /// dispatch table (POST to an instance, for example) are rejected rather
    /// than answered with 405.
    #[must_use]
    pub fn into_router(self) -> Router {
        let mut router = Router::new();
        for entry in self.entries {
            router = router.merge(resource_router(entry));
        }
        router
    }
}

fn first_duplicate<'a>(extensions: &[&'a str]) -> Option<&'a str> {
    let mut seen = HashSet::new();
    extensions.iter().find(|ext| !seen.insert(**ext)).copied()
}

fn resource_router(entry: Arc<ResourceEntry>) -> Router {
    let collection_methods = || {
        get(dispatch::list_collection)
            .post(dispatch::create_resource)
            .fallback(dispatch::reject)
    };

    // axum does no trailing-slash normalization; `/{name}/` is a distinct
    // path and must be registered as an alias of the collection route.
    let mut router = Router::new()
        .route(&entry.routes.collection, collection_methods())
        .route(
            &format!("{}/", entry.routes.collection),
            collection_methods(),
        )
        .with_state(Arc::new(RouteBinding {
            entry: entry.clone(),
            forced_extension: None,
        }));

    for encoder in &entry.encoders {
        let path = format!("{}.{}", entry.routes.collection, encoder.extension());
        router = router.merge(
            Router::new()
                .route(&path, collection_methods())
                .with_state(Arc::new(RouteBinding {
                    entry: entry.clone(),
                    forced_extension: Some(encoder.extension().to_string()),
                })),
        );
    }

    let instance_path = format!("{}/{{tail}}", entry.routes.collection);
    router.merge(
        Router::new()
            .route(
                &instance_path,
                get(dispatch::get_instance)
                    .put(dispatch::update_instance)
                    .delete(dispatch::delete_instance)
                    .fallback(dispatch::reject),
            )
            .with_state(Arc::new(RouteBinding {
                entry,
                forced_extension: None,
            })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nothing;
    impl ResourceHandler for Nothing {}

    #[test]
    fn test_register_returns_four_route_patterns() {
        let mut api = RestApi::new();
        let routes = api.add_resource("comments", Arc::new(Nothing)).unwrap();
        assert_eq!(routes.collection, "/comments");
        assert_eq!(
            routes.collection_extensions,
            vec!["/comments.json", "/comments.js"]
        );
        assert_eq!(routes.instance, "/comments/{id}");
        assert_eq!(routes.instance_extension, "/comments/{id}.{ext}");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut api = RestApi::new();
        api.add_resource("api", Arc::new(Nothing)).unwrap();
        let err = api.add_resource("api", Arc::new(Nothing)).unwrap_err();
        assert!(matches!(err, RestError::DuplicateResource(name) if name == "api"));
    }

    #[test]
    fn test_empty_encoder_sequence_rejected() {
        let mut api = RestApi::new();
        let err = api
            .add_resource_with_encoders("api", Arc::new(Nothing), Vec::new())
            .unwrap_err();
        assert!(matches!(err, RestError::NoEncoders(_)));
        // The failed registration must not occupy the name.
        assert!(api.add_resource("api", Arc::new(Nothing)).is_ok());
    }

    #[test]
    fn test_duplicate_extension_rejected() {
        let mut api = RestApi::new();
        let err = api
            .add_resource_with_encoders(
                "api",
                Arc::new(Nothing),
                vec![Arc::new(JsonEncoder), Arc::new(JsonEncoder)],
            )
            .unwrap_err();
        assert!(matches!(err, RestError::DuplicateExtension(ext) if ext == "json"));
    }

    #[test]
    fn test_routes_lookup() {
        let mut api = RestApi::new();
        api.add_resource("api", Arc::new(Nothing)).unwrap();
        assert!(api.routes("api").is_some());
        assert!(api.routes("other").is_none());
    }

    #[test]
    fn test_prefix_applies_to_routes() {
        let mut api = RestApi::with_config(ApiConfig {
            prefix: "/v1".to_string(),
            ..Default::default()
        });
        let routes = api.add_resource("api", Arc::new(Nothing)).unwrap();
        assert_eq!(routes.collection, "/v1/api");
    }
}
