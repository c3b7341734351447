//! Page-by-page fetching.
//!
//! Pages are fetched strictly one after another; each page request is
//! a fresh variant of the base request with the page query parameter
//! rewritten.

use serde_json::Value;
use url::Url;

use jsonscrape_core::extract::page_is_empty;
use jsonscrape_core::retry::RetryPolicy;
use jsonscrape_core::settings::{PaginationSpec, RequestSpec};

use crate::error::Error;
use crate::fetch::fetch_json_once;
use crate::transport::HttpTransport;

/// Set or replace a query parameter on a URL. Any existing value for
/// `key` is removed first, so repeated application never accumulates
/// duplicates.
pub fn with_query_param(url: &str, key: &str, value: &str) -> Result<String, Error> {
    let mut parsed =
        Url::parse(url).map_err(|e| Error::Config(format!("Invalid URL {url}: {e}")))?;

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    {
        let mut pairs = parsed.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(key, value);
    }

    Ok(parsed.to_string())
}

/// Fetch every page for a request.
///
/// With pagination disabled this is a single fetch. Otherwise pages
/// run from `start_page` to at most `max_pages`; when
/// `stop_when_empty` is set, iteration stops after appending the
/// first empty page (null, empty array, or object with no keys).
pub async fn fetch_all_pages<T: HttpTransport>(
    transport: &T,
    request: &RequestSpec,
    pagination: &PaginationSpec,
    policy: &RetryPolicy,
) -> Result<Vec<Value>, Error> {
    if !pagination.enabled {
        let single = fetch_json_once(transport, request, policy).await?;
        return Ok(vec![single]);
    }

    let mut pages = Vec::new();
    let mut page = pagination.start_page;

    while page <= pagination.max_pages {
        let page_url = with_query_param(&request.url, &pagination.param_name, &page.to_string())?;
        let page_request = request.with_url(page_url);

        let json = fetch_json_once(transport, &page_request, policy).await?;
        let is_empty = page_is_empty(&json);
        pages.push(json);

        if pagination.stop_when_empty && is_empty {
            break;
        }

        page += 1;
    }

    Ok(pages)
}
