use crate::config::types::{
    BrowserConfig, BrowserMode, Config, CrawlerConfig, LinksConfig, SectionEntry,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_sections(&config.sections)?;
    validate_links_config(&config.links)?;
    Ok(())
}

/// Validates crawl limits and heuristics
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_per_seed < 1 || config.max_pages_per_seed > 1000 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_seed must be between 1 and 1000, got {}",
            config.max_pages_per_seed
        )));
    }

    if config.render_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "render_timeout_ms must be >= 100ms, got {}ms",
            config.render_timeout_ms
        )));
    }

    if !config.next_link_marker.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "next_link_marker must start with '/', got '{}'",
            config.next_link_marker
        )));
    }

    if config.title_separator.is_empty() {
        return Err(ConfigError::Validation(
            "title_separator cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the rendering backend settings
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    match (&config.mode, &config.ws_url) {
        (BrowserMode::Connect, None) => Err(ConfigError::Validation(
            "ws_url is required when browser mode is 'connect'".to_string(),
        )),
        (BrowserMode::Connect, Some(ws_url)) => {
            let url = Url::parse(ws_url)
                .map_err(|e| ConfigError::InvalidUrl(format!("Invalid ws_url: {}", e)))?;
            if url.scheme() != "ws" && url.scheme() != "wss" {
                return Err(ConfigError::Validation(format!(
                    "ws_url '{}' must use the ws or wss scheme",
                    ws_url
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Validates section entries and their seeds
fn validate_sections(sections: &[SectionEntry]) -> Result<(), ConfigError> {
    for section in sections {
        if section.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "section name cannot be empty".to_string(),
            ));
        }

        if section.seeds.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Section '{}' must have at least one seed URL",
                section.name
            )));
        }

        for seed in &section.seeds {
            validate_page_url(seed, "seed")?;
        }
    }

    Ok(())
}

/// Validates link inventory settings
fn validate_links_config(config: &LinksConfig) -> Result<(), ConfigError> {
    for page in &config.pages {
        validate_page_url(page, "link page")?;
    }

    if config.markers.iter().any(|marker| marker.is_empty()) {
        return Err(ConfigError::Validation(
            "link markers cannot be empty".to_string(),
        ));
    }

    if config.max_text_len == 0 {
        return Err(ConfigError::Validation(
            "max_text_len must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a page URL parses and uses HTTP(S)
fn validate_page_url(raw: &str, what: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} URL '{}': {}", what, raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} URL '{}' must use the http or https scheme",
            what, raw
        )));
    }

    Ok(())
}
