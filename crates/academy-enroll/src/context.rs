//! # Portal Context
//!
//! Shared state passed between dashboard views, such as which athlete the
//! parent has selected. Cloning shares the same underlying state.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PortalContext {
    selected_athlete: Arc<RwLock<Option<String>>>,
}

impl PortalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn select_athlete(&self, athlete_id: impl Into<String>) {
        let id = athlete_id.into();
        debug!(athlete_id = %id, "Athlete selected");
        *self.selected_athlete.write().await = Some(id);
    }

    pub async fn selected_athlete(&self) -> Option<String> {
        self.selected_athlete.read().await.clone()
    }

    pub async fn clear_selection(&self) {
        *self.selected_athlete.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_selection_is_shared_between_clones() {
        let context = PortalContext::new();
        let view = context.clone();

        context.select_athlete("ath-1").await;
        assert_eq!(view.selected_athlete().await.as_deref(), Some("ath-1"));

        view.clear_selection().await;
        assert!(context.selected_athlete().await.is_none());
    }
}
