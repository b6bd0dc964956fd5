//! Per-command context threaded from the dispatcher into the engine

use acal_core::ExError;
use acal_core_types::RequestContext;
use acal_store::CatalogConfig;

/// Settings and correlation for one dispatched command
#[derive(Debug, Clone, Default)]
pub struct EngineContext {
    pub catalog: CatalogConfig,
    pub request: RequestContext,
}

impl EngineContext {
    pub fn new(catalog: CatalogConfig) -> Self {
        Self {
            catalog,
            request: RequestContext::default(),
        }
    }

    /// Same settings, fresh request id, tagged with where it came from
    pub fn for_request(&self, origin: impl Into<String>) -> Self {
        Self {
            catalog: self.catalog,
            request: RequestContext::new(origin),
        }
    }

    /// Attach this request's id to an error leaving the engine
    pub(crate) fn tag(&self, err: ExError) -> ExError {
        err.with_request_id(self.request.request_id)
    }
}
