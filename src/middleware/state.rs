use std::sync::Arc;

use crate::config::SessionConfig;
use crate::issuer::SessionIssuer;
use crate::store::KeyValueStore;
use crate::validator::SessionValidator;

/// Shared state for session route handlers.
///
/// Issuer and validator hold the same store handle.
pub struct SessionState<S> {
    pub(super) issuer: SessionIssuer<S>,
    pub(super) validator: SessionValidator<S>,
    pub(super) session_path: String,
}

// Manual Clone: avoid derive adding an `S: Clone` bound.
impl<S> Clone for SessionState<S> {
    fn clone(&self) -> Self {
        Self {
            issuer: self.issuer.clone(),
            validator: self.validator.clone(),
            session_path: self.session_path.clone(),
        }
    }
}

impl<S: KeyValueStore> SessionState<S> {
    #[must_use]
    pub fn new(config: &SessionConfig, store: Arc<S>) -> Self {
        Self {
            issuer: SessionIssuer::new(store.clone(), config),
            validator: SessionValidator::new(store, config),
            session_path: config.session_path().to_owned(),
        }
    }

    #[must_use]
    pub fn issuer(&self) -> &SessionIssuer<S> {
        &self.issuer
    }

    #[must_use]
    pub fn validator(&self) -> &SessionValidator<S> {
        &self.validator
    }
}
