use std::sync::Arc;

use snipit_config::AppConfig;
use snipit_models::{SnippetStore, UserStore};

use crate::templates::{TemplateCache, new_template_cache};

/// Dependencies shared by every handler.
///
/// Built once at startup and cloned per request; nothing in here is mutated
/// after construction.
#[derive(Clone, Debug)]
pub struct AppState {
    pub snippets: Arc<dyn SnippetStore>,
    pub users: Arc<dyn UserStore>,
    pub templates: Arc<TemplateCache>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        snippets: Arc<dyn SnippetStore>,
        users: Arc<dyn UserStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            snippets,
            users,
            templates: Arc::new(new_template_cache()),
            config: Arc::new(config),
        }
    }
}
