//! State

use std::sync::Arc;

use appointime_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) admin_token: Option<String>,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext) -> Self {
        Self {
            app,
            admin_token: None,
        }
    }

    #[must_use]
    pub(crate) fn with_admin_token(mut self, admin_token: Option<String>) -> Self {
        self.admin_token = admin_token.filter(|token| !token.trim().is_empty());
        self
    }

    #[must_use]
    pub(crate) fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
