use crate::core::{AdminError, Result};
use crate::resource::DEFAULT_CACHE_PAGES;
use crate::table::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use std::env;
use std::time::Duration;

/// Dashboard client configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend root, e.g. `http://localhost:8000/api`
    pub base_url: String,

    /// Page size used when a page first mounts
    pub default_page_size: usize,

    /// Choices offered by the rows-per-page selector
    pub page_size_options: Vec<usize>,

    /// Pages kept per resource list
    pub cache_capacity: usize,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl DashboardConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            cache_capacity: DEFAULT_CACHE_PAGES,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn cache_capacity(mut self, pages: usize) -> Self {
        self.cache_capacity = pages;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reads `BACKOFFICE_API_URL`, `BACKOFFICE_PAGE_SIZE`,
    /// `BACKOFFICE_CACHE_PAGES` and `BACKOFFICE_TIMEOUT_SECS`. Unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("BACKOFFICE_API_URL")
            .unwrap_or_else(|| "http://localhost:8000/api".to_string());
        let mut config = Self::new(&base_url);

        if let Some(raw) = lookup("BACKOFFICE_PAGE_SIZE") {
            config.default_page_size = parse_var("BACKOFFICE_PAGE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("BACKOFFICE_CACHE_PAGES") {
            config.cache_capacity = parse_var("BACKOFFICE_CACHE_PAGES", &raw)?;
        }
        if let Some(raw) = lookup("BACKOFFICE_TIMEOUT_SECS") {
            config.request_timeout =
                Duration::from_secs(parse_var("BACKOFFICE_TIMEOUT_SECS", &raw)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(AdminError::Config("base_url cannot be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AdminError::Config(
                "base_url must start with http:// or https://".to_string(),
            ));
        }
        if self.default_page_size == 0 {
            return Err(AdminError::Config(
                "default_page_size must be > 0".to_string(),
            ));
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(AdminError::Config(format!(
                "default_page_size {} is not one of the page size options",
                self.default_page_size
            )));
        }
        if self.cache_capacity == 0 {
            return Err(AdminError::Config("cache_capacity must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000/api")
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AdminError::Config(format!("{} has an invalid value '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.page_size_options, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("BACKOFFICE_API_URL", "https://api.padaria.dev"),
            ("BACKOFFICE_PAGE_SIZE", "20"),
            ("BACKOFFICE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.padaria.dev");
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_PAGES);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(DashboardConfig::from_lookup(lookup(&[("BACKOFFICE_PAGE_SIZE", "ten")])).is_err());
        assert!(DashboardConfig::from_lookup(lookup(&[("BACKOFFICE_PAGE_SIZE", "15")])).is_err());
        assert!(DashboardConfig::new("ftp://x").validate().is_err());
        assert!(DashboardConfig::default().cache_capacity(0).validate().is_err());
    }
}
