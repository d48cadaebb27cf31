//! Autocomplete sources.
//!
//! A source answers a search with one page of options and whether a later
//! page exists. [`UrlSource`] fetches results from an HTTP endpoint whose
//! URL is a Liquid template; when the template does not mention `page` or
//! `per_page` the endpoint is assumed to return everything and the source
//! filters and pages locally.

use crate::error::{AutocompleteError, Result};
use crate::mapping::{display_text, lookup, ResultMapping};
use crate::option::AutocompleteOption;
use crate::settings::AutocompleteSettings;
use async_trait::async_trait;
use flexform_fields::{Options, Values};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

static PAGE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{-?\s*(page|per_page)\b").expect("Failed to compile page token regex")
});

/// One autocomplete request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
    /// 1-based
    #[serde(default = "first_page")]
    pub page: usize,
    pub per_page: usize,
    /// Current values of the record being edited, visible to URL templates
    /// as `record`
    #[serde(default)]
    pub values: Values,
}

fn first_page() -> usize {
    1
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, page: usize, per_page: usize) -> Self {
        Self {
            term: term.into(),
            page: page.max(1),
            per_page: per_page.max(1),
            values: Values::new(),
        }
    }

    pub fn with_values(mut self, values: Values) -> Self {
        self.values = values;
        self
    }
}

/// One page of results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub options: Vec<AutocompleteOption>,
    pub more: bool,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `{results: [{id, text, value, extra}], pagination: {more}}`
    pub fn to_response(&self) -> Value {
        let results: Vec<Value> = self.options.iter().map(AutocompleteOption::to_result).collect();
        json!({
            "results": results,
            "pagination": {"more": self.more},
        })
    }
}

/// Anything that can answer autocomplete searches
#[async_trait]
pub trait AutocompleteSource: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage>;
}

/// A source backed by an HTTP endpoint returning JSON
#[derive(Debug, Clone)]
pub struct UrlSource {
    url: String,
    mapping: ResultMapping,
    search_fields: Vec<String>,
    client: reqwest::Client,
}

impl UrlSource {
    pub fn new(url: impl Into<String>, mapping: ResultMapping, settings: &AutocompleteSettings) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            mapping,
            search_fields: Vec::new(),
            client: settings.build_client()?,
        })
    }

    /// Build from a field's `url`, `mapping` and `search_fields` options
    pub fn from_options(field: &str, options: &Options, settings: &AutocompleteSettings) -> Result<Self> {
        let config = |message: String| AutocompleteError::Config {
            field: field.to_string(),
            message,
        };
        let url = match options.get("url") {
            Some(Value::String(url)) => url.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => return Err(config(format!("url must be a string, got {}", other))),
        };
        let mapping = match options.get("mapping") {
            Some(value) if !value.is_null() => serde_json::from_value(value.clone())
                .map_err(|e| config(format!("invalid mapping: {}", e)))?,
            _ => ResultMapping::default(),
        };
        let search_fields = match options.get("search_fields") {
            Some(value) if !value.is_null() => serde_json::from_value(value.clone())
                .map_err(|e| config(format!("invalid search_fields: {}", e)))?,
            _ => Vec::new(),
        };
        Ok(Self::new(url, mapping, settings)?.with_search_fields(search_fields))
    }

    pub fn with_search_fields(mut self, fields: Vec<String>) -> Self {
        self.search_fields = fields;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn url_template(&self) -> &str {
        &self.url
    }

    /// True when the endpoint pages its own results
    pub fn paginates_remotely(&self) -> bool {
        PAGE_TOKEN.is_match(&self.url)
    }

    /// Render the URL template for `query`
    pub fn render_url(&self, query: &SearchQuery) -> Result<String> {
        let template = liquid::ParserBuilder::with_stdlib()
            .build()
            .and_then(|parser| parser.parse(&self.url))
            .map_err(|e| AutocompleteError::Template {
                message: e.to_string(),
            })?;

        let mut globals = liquid::Object::new();
        globals.insert("page".into(), liquid::model::Value::scalar(query.page as i64));
        globals.insert("per_page".into(), liquid::model::Value::scalar(query.per_page as i64));
        globals.insert("term".into(), liquid::model::Value::scalar(query.term.clone()));
        globals.insert(
            "record".into(),
            liquid::model::to_value(&query.values).unwrap_or(liquid::model::Value::Nil),
        );

        template
            .render(&globals)
            .map_err(|e| AutocompleteError::Template {
                message: e.to_string(),
            })
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        let parsed = url::Url::parse(url).map_err(|e| AutocompleteError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(url = %parsed, "fetching autocomplete results");

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AutocompleteError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.json::<Value>().await?)
    }

    /// Every word of the term appears in one of the searched texts
    fn matches(&self, item: &Value, option: &AutocompleteOption, words: &[String]) -> bool {
        let texts: Vec<String> = if self.search_fields.is_empty() {
            vec![option.text.to_lowercase()]
        } else {
            self.search_fields
                .iter()
                .filter_map(|path| lookup(item, path))
                .map(|value| display_text(value).to_lowercase())
                .collect()
        };
        words
            .iter()
            .all(|word| texts.iter().any(|text| text.contains(word.as_str())))
    }
}

#[async_trait]
impl AutocompleteSource for UrlSource {
    async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        if self.url.trim().is_empty() {
            return Ok(SearchPage::empty());
        }

        let url = self.render_url(query)?;
        let response = self.fetch(&url).await?;
        let results = self.mapping.extract(&response);

        if self.paginates_remotely() {
            let more = results.len() >= query.per_page;
            let options = results.into_iter().map(|(_, option)| option).collect();
            return Ok(SearchPage { options, more });
        }

        let words: Vec<String> = query
            .term
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let matching: Vec<AutocompleteOption> = results
            .into_iter()
            .filter(|(item, option)| self.matches(item, option, &words))
            .map(|(_, option)| option)
            .collect();

        let per_page = query.per_page.max(1);
        let start = (query.page.max(1) - 1).saturating_mul(per_page);
        let end = start.saturating_add(per_page);
        let more = end < matching.len();
        let options = matching.into_iter().skip(start).take(per_page).collect();
        tracing::trace!(start, end, more, "paged autocomplete results locally");
        Ok(SearchPage { options, more })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn source(url: &str) -> UrlSource {
        UrlSource::new(url, ResultMapping::default(), &AutocompleteSettings::default()).unwrap()
    }

    #[rstest]
    #[case("https://api.example.com/people?page={{page}}&size={{per_page}}", true)]
    #[case("https://api.example.com/people?size={{ per_page }}", true)]
    #[case("https://api.example.com/people?q={{term}}", false)]
    #[case("https://api.example.com/people", false)]
    fn test_detects_remote_pagination(#[case] url: &str, #[case] remote: bool) {
        assert_eq!(source(url).paginates_remotely(), remote);
    }

    #[test]
    fn test_renders_tokens_and_record_values() {
        let mut values = Values::new();
        values.insert("crust".into(), json!("thin"));
        let query = SearchQuery::new("ham", 2, 10).with_values(values);
        let url = source("https://api.example.com/t?p={{page}}&n={{per_page}}&q={{term}}&c={{record.crust}}")
            .render_url(&query)
            .unwrap();
        assert_eq!(url, "https://api.example.com/t?p=2&n=10&q=ham&c=thin");
    }

    #[test]
    fn test_response_shape() {
        let page = SearchPage {
            options: vec![AutocompleteOption::new("5", "Alice")],
            more: true,
        };
        assert_eq!(
            page.to_response(),
            json!({
                "results": [{
                    "id": r#"{"extra":{},"id":"5","text":"Alice"}"#,
                    "text": "Alice",
                    "extra": {}
                }],
                "pagination": {"more": true}
            })
        );
    }

    #[test]
    fn test_bad_options_are_config_errors() {
        let options: Options = serde_json::from_value(json!({"url": 5})).unwrap();
        let error = UrlSource::from_options("people", &options, &AutocompleteSettings::default())
            .unwrap_err();
        assert!(matches!(error, AutocompleteError::Config { ref field, .. } if field == "people"));
    }
}
