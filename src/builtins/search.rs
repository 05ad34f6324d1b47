use std::sync::Arc;

use url::Url;

use crate::directory::{Capability, DirectoryBuilder};
use crate::error::{MenuError, MenuResult};
use crate::types::TypeKey;

pub trait SearchUrlBuilder: Send + Sync {
    fn id(&self) -> &'static str;
    fn label(&self) -> &'static str;
    fn build_url(&self, query: &str) -> MenuResult<Url>;
}

pub const SEARCH_URL: Capability<dyn SearchUrlBuilder> = Capability::new(
    TypeKey::new("search-url"),
    "Web search",
    "Builds a search URL for selected text",
);

#[derive(Debug, Clone, Copy)]
pub struct QueryParamSearch {
    pub id: &'static str,
    pub label: &'static str,
    pub base: &'static str,
    pub param: &'static str,
}

impl SearchUrlBuilder for QueryParamSearch {
    fn id(&self) -> &'static str {
        self.id
    }

    fn label(&self) -> &'static str {
        self.label
    }

    fn build_url(&self, query: &str) -> MenuResult<Url> {
        let query = checked_query(query)?;
        Url::parse_with_params(self.base, &[(self.param, query)]).map_err(|source| {
            MenuError::invalid_argument(format!("bad search base {}: {source}", self.base))
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArticleSearch {
    pub id: &'static str,
    pub label: &'static str,
    pub base: &'static str,
}

impl SearchUrlBuilder for ArticleSearch {
    fn id(&self) -> &'static str {
        self.id
    }

    fn label(&self) -> &'static str {
        self.label
    }

    fn build_url(&self, query: &str) -> MenuResult<Url> {
        let title = checked_query(query)?
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        let mut url = Url::parse(self.base).map_err(|source| {
            MenuError::invalid_argument(format!("bad article base {}: {source}", self.base))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                MenuError::invalid_argument(format!(
                    "article base cannot hold a path: {}",
                    self.base
                ))
            })?
            .pop_if_empty()
            .push(&title);
        Ok(url)
    }
}

fn checked_query(query: &str) -> MenuResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(MenuError::invalid_argument("search phrase is empty"));
    }
    Ok(trimmed)
}

pub const DUCKDUCKGO: QueryParamSearch = QueryParamSearch {
    id: "duckduckgo",
    label: "DuckDuckGo",
    base: "https://duckduckgo.com/",
    param: "q",
};

pub const GOOGLE: QueryParamSearch = QueryParamSearch {
    id: "google",
    label: "Google",
    base: "https://www.google.com/search",
    param: "q",
};

pub const WIKIPEDIA: ArticleSearch = ArticleSearch {
    id: "wikipedia",
    label: "Wikipedia",
    base: "https://en.wikipedia.org/wiki/",
};

pub fn register(builder: &mut DirectoryBuilder) -> MenuResult<()> {
    for engine in [DUCKDUCKGO, GOOGLE] {
        builder.register(&SEARCH_URL, engine.id, Arc::new(engine))?;
    }
    builder.register(&SEARCH_URL, WIKIPEDIA.id, Arc::new(WIKIPEDIA))?;
    Ok(())
}
