//! Check command handler
//!
//! Validates configuration and prints the resolved cache layout.

use crate::config::Settings;
use crate::error::AppResult;

/// Handler for the check command
pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<()> {
        self.config.validate()?;
        let caches = super::open_caches(&self.config)?;
        let cache = &self.config.cache;

        println!("✓ Configuration is valid");
        println!("✓ Cache root: {}", cache.root().display());
        for line in self.layout_lines(&caches) {
            println!("  {}", line);
        }
        println!("✓ Logger level: {}", self.config.logger.level);
        Ok(())
    }

    fn layout_lines(&self, caches: &crate::namespaces::ForumCaches) -> Vec<String> {
        let cache = &self.config.cache;
        vec![
            format!(
                "{} -> {} (hot threads {}s, personalized page 1 {}s, followed feed {}s)",
                cache.explore.namespace,
                caches.explore.store().dir().display(),
                cache.explore.hot_threads_max_age,
                cache.explore.personalized_max_age,
                cache.explore.user_like_max_age,
            ),
            format!(
                "{} -> {} (followed forums {}s)",
                cache.liked_forum.namespace,
                caches.liked_forum.store().dir().display(),
                cache.liked_forum.max_age,
            ),
            format!(
                "{} -> {} (profile page 1 {}s)",
                cache.user_profile.namespace,
                caches.user_profile.store().dir().display(),
                cache.user_profile.max_age,
            ),
        ]
    }
}
