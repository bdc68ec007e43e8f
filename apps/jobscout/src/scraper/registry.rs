use std::collections::HashMap;
use std::sync::Arc;

use super::{GreenhouseScraper, LeverScraper, Scraper};
use crate::errors::AppError;

/// Platform id → adapter. Built once at startup; read-only afterwards.
#[derive(Clone, Default)]
pub struct ScraperRegistry {
    scrapers: HashMap<&'static str, Arc<dyn Scraper>>,
}

impl ScraperRegistry {
    /// Registry with every built-in adapter.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register(Arc::new(LeverScraper::new()));
        registry.register(Arc::new(GreenhouseScraper::new()));
        registry
    }

    pub fn register(&mut self, scraper: Arc<dyn Scraper>) {
        self.scrapers.insert(scraper.name(), scraper);
    }

    pub fn get(&self, platform: &str) -> Result<Arc<dyn Scraper>, AppError> {
        self.scrapers.get(platform).cloned().ok_or_else(|| {
            AppError::NotFound(format!("no scraper registered for platform: {platform}"))
        })
    }

    /// Registered platform ids, sorted.
    pub fn platforms(&self) -> Vec<&'static str> {
        let mut platforms: Vec<_> = self.scrapers.keys().copied().collect();
        platforms.sort_unstable();
        platforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_platforms() {
        let registry = ScraperRegistry::new();
        assert_eq!(registry.platforms(), vec!["greenhouse", "lever"]);
        assert_eq!(registry.get("lever").unwrap().name(), "lever");
    }

    #[test]
    fn test_unknown_platform_is_not_found() {
        let registry = ScraperRegistry::new();
        let err = registry.get("workday").err().unwrap();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("workday")));
    }
}
