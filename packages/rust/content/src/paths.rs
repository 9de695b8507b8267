//! Request path builders.
//!
//! Each builder concatenates configuration fields in a fixed order. There is
//! no encoding and no validation: a missing field renders as the empty string,
//! so a malformed configuration yields a malformed path rather than an error.

use ftapi_shared::{API_ITEM_PATH, API_KEY, Config, PAGE_MAIN_CONTENT, PAGE_PATH};

/// Query-string separator and parameter name placed before the API key.
pub const API_PARAM: &str = "?apiKey=";

/// `apiItemPath + id + API_PARAM + apiKey`
pub fn build_item_path(config: &Config, id: &str) -> String {
    format!(
        "{}{id}{API_PARAM}{}",
        field(config, API_ITEM_PATH),
        field(config, API_KEY)
    )
}

/// `pagePath + id + API_PARAM + apiKey`
pub fn build_page_path(config: &Config, id: &str) -> String {
    format!(
        "{}{id}{API_PARAM}{}",
        field(config, PAGE_PATH),
        field(config, API_KEY)
    )
}

/// `pagePath + id + pageMainContent + API_PARAM + apiKey`
pub fn build_page_content_path(config: &Config, id: &str) -> String {
    format!(
        "{}{id}{}{API_PARAM}{}",
        field(config, PAGE_PATH),
        field(config, PAGE_MAIN_CONTENT),
        field(config, API_KEY)
    )
}

/// `pagePath + API_PARAM + apiKey`
pub fn build_collection_path(config: &Config) -> String {
    format!(
        "{}{API_PARAM}{}",
        field(config, PAGE_PATH),
        field(config, API_KEY)
    )
}

/// Render a field for a path; absent keys become "".
fn field(config: &Config, key: &str) -> String {
    config.get(key).map(ToString::to_string).unwrap_or_default()
}

/// Replace the API key in a built path for logging.
pub(crate) fn redact(path: &str) -> String {
    match path.find(API_PARAM) {
        Some(idx) => format!("{}{API_PARAM}***", &path[..idx]),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_path_joins_item_path_id_and_key() {
        let config = Config::new()
            .with(API_ITEM_PATH, "path/")
            .with(API_KEY, "key");
        assert_eq!(build_item_path(&config, "id"), "path/id?apiKey=key");
    }

    #[test]
    fn page_path_joins_page_path_id_and_key() {
        let config = Config::new().with(PAGE_PATH, "path/").with(API_KEY, "key");
        assert_eq!(build_page_path(&config, "id"), "path/id?apiKey=key");
    }

    #[test]
    fn page_content_path_puts_suffix_after_id() {
        let config = Config::new()
            .with(PAGE_PATH, "path/")
            .with(PAGE_MAIN_CONTENT, "pmc/")
            .with(API_KEY, "key");
        assert_eq!(
            build_page_content_path(&config, "id"),
            ["path/", "id", "pmc/", API_PARAM, "key"].concat()
        );
    }

    #[test]
    fn collection_path_has_no_id() {
        let config = Config::new().with(PAGE_PATH, "path/").with(API_KEY, "key");
        assert_eq!(build_collection_path(&config), "path/?apiKey=key");
    }

    #[test]
    fn missing_fields_render_empty() {
        let config = Config::new().with(API_KEY, "key");
        assert_eq!(build_item_path(&config, "id"), "id?apiKey=key");
        assert_eq!(build_collection_path(&Config::new()), "?apiKey=");
    }

    #[test]
    fn non_string_values_use_display_form() {
        let config = Config::new().with(PAGE_PATH, "p/").with(API_KEY, 42_i64);
        assert_eq!(build_page_path(&config, "7"), "p/7?apiKey=42");
    }

    #[test]
    fn default_config_paths() {
        let config = ftapi_shared::instance_config(Some("bar")).unwrap();
        assert_eq!(
            build_page_content_path(&config, "abc"),
            "http://api.ft.com/site/v1/pages/abc/main-content?apiKey=bar"
        );
    }

    #[test]
    fn redact_hides_api_key() {
        assert_eq!(redact("p/1?apiKey=secret"), "p/1?apiKey=***");
        assert_eq!(redact("no-key-here"), "no-key-here");
    }
}
