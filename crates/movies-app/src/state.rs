use std::sync::Arc;

use movies_dal::Pool;
use movies_types::PosterPolicy;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { app_config, pool }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub poster: PosterPolicy,
    /// Request body limit for multipart uploads
    pub upload_limit_mb: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            poster: PosterPolicy::default(),
            upload_limit_mb: 10,
        }
    }
}
