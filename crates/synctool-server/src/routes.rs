use crate::auth::require_token;
use crate::error::ApiResult;
use crate::state::ServerContext;
use axum::{extract::Request, middleware, middleware::Next, response::Json, routing::get, Router};
use std::sync::Arc;
use synctool_core::{serialize_querysets, Queryset};
use synctool_models::SyncRecord;
use tracing::info;

type QuerysetProvider = Arc<dyn Fn() -> Vec<Queryset> + Send + Sync>;

enum Endpoint {
    Querysets(QuerysetProvider),
    AppDump(String),
}

/// Registrar mapping URL paths to feed views, all gated by the token
/// check.
///
/// # Example
///
/// ```no_run
/// use synctool_core::Queryset;
/// use synctool_models::ModelLabel;
/// use synctool_server::Route;
///
/// let route = Route::new("token")
///     .queryset("recent-posts", || {
///         vec![Queryset::all(ModelLabel::new("blog", "post")).filter("published = 1")]
///     })
///     .app("blogs", "blog");
/// ```
pub struct Route {
    api_token: String,
    endpoints: Vec<(String, Endpoint)>,
}

impl Route {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            endpoints: Vec::new(),
        }
    }

    /// Registers a view serving the querysets returned by `provider`.
    pub fn queryset<F>(mut self, path: impl Into<String>, provider: F) -> Self
    where
        F: Fn() -> Vec<Queryset> + Send + Sync + 'static,
    {
        self.endpoints
            .push((path.into(), Endpoint::Querysets(Arc::new(provider))));
        self
    }

    /// Registers a view dumping every registered model of `app_label`.
    pub fn app(mut self, path: impl Into<String>, app_label: impl Into<String>) -> Self {
        self.endpoints
            .push((path.into(), Endpoint::AppDump(app_label.into())));
        self
    }

    /// Builds the axum router. Each path is reachable with and without a
    /// trailing slash.
    pub fn into_router(self, ctx: ServerContext) -> Router {
        if self.endpoints.is_empty() {
            return Router::new();
        }

        let ctx = Arc::new(ctx);
        let mut router = Router::new();

        for (path, endpoint) in self.endpoints {
            let ctx = Arc::clone(&ctx);
            let endpoint = Arc::new(endpoint);
            let handler = move || {
                let ctx = Arc::clone(&ctx);
                let endpoint = Arc::clone(&endpoint);
                async move { serve_feed(&ctx, &endpoint) }
            };

            info!(path = %path, "registered feed route");
            router = router
                .route(&format!("/{}", path), get(handler.clone()))
                .route(&format!("/{}/", path), get(handler));
        }

        // route_layer so unknown paths still 404 instead of challenging
        let token = self.api_token;
        router.route_layer(middleware::from_fn(move |request: Request, next: Next| {
            let token = token.clone();
            async move { require_token(&token, request, next).await }
        }))
    }
}

fn serve_feed(ctx: &ServerContext, endpoint: &Endpoint) -> ApiResult<Json<Vec<SyncRecord>>> {
    let querysets = match endpoint {
        Endpoint::Querysets(provider) => provider(),
        Endpoint::AppDump(app_label) => ctx
            .registry
            .models_for_app(app_label)?
            .iter()
            .map(|model| Queryset::all(model.label()))
            .collect(),
    };

    let records = serialize_querysets(&ctx.db, &ctx.registry, &querysets)?;
    Ok(Json(records))
}
