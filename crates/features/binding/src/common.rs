use crate::options::{BindingOptions, QuerySpec};
use scms_domain::{PersistenceKey, ViewContext};
use scms_store::{FetchRequest, StoreError};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Builds the query for the current view.
pub type QuerySource = Arc<dyn Fn(&ViewContext) -> QuerySpec + Send + Sync>;

/// Invoked with every fetch error before it is returned.
pub type ErrorHandler = Arc<dyn Fn(&StoreError) + Send + Sync>;

/// The parts every binding shares: options, query source, error handler and loading flag.
#[derive(Clone)]
pub(crate) struct BindingCore {
    pub(crate) options: BindingOptions,
    source: QuerySource,
    on_error: Option<ErrorHandler>,
    loading: Arc<AtomicBool>,
}

impl fmt::Debug for BindingCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingCore")
            .field("options", &self.options)
            .field("error_handler", &self.on_error.is_some())
            .field("loading", &self.is_loading())
            .finish_non_exhaustive()
    }
}

impl BindingCore {
    pub(crate) fn new(options: BindingOptions, source: QuerySource) -> Self {
        Self { options, source, on_error: None, loading: Arc::new(AtomicBool::new(false)) }
    }

    pub(crate) fn set_error_handler(&mut self, handler: ErrorHandler) {
        self.on_error = Some(handler);
    }

    pub(crate) fn key(&self, view: &ViewContext) -> PersistenceKey {
        self.options.persist.resolve(view)
    }

    pub(crate) fn request(&self, view: &ViewContext, key: PersistenceKey) -> FetchRequest {
        let QuerySpec { query, variables } = (self.source)(view);
        FetchRequest::new(query, key).variables(variables)
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Marks the binding as loading; `None` while another fetch is in flight.
    pub(crate) fn begin(&self) -> Option<LoadingGuard> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard { flag: Arc::clone(&self.loading) })
    }

    /// Hands the error to the handler and gives it back.
    pub(crate) fn report(&self, error: StoreError) -> StoreError {
        match &self.on_error {
            Some(handler) => handler(&error),
            None => warn!(error = %error, "Unhandled binding fetch error"),
        }
        error
    }
}

/// Clears the loading flag when the fetch completes, fails or is dropped.
#[derive(Debug)]
pub(crate) struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
