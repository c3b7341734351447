//! The scrape orchestrator: fetch, extract, transform, write.
//!
//! Each stage failure is logged with its stage tag and re-thrown
//! unchanged; nothing is recovered silently.

use std::path::PathBuf;

use serde::Serialize;

use jsonscrape_core::extract::extract_records;
use jsonscrape_core::settings::Settings;
use jsonscrape_core::transform::transform_records;

use crate::error::Error;
use crate::output::write_output;
use crate::paginate::fetch_all_pages;
use crate::transport::HttpTransport;

/// Result of one completed scrape run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub record_count: usize,
    pub output_path: PathBuf,
    pub format: String,
}

/// Run a full scrape with the given settings.
///
/// A run is stateless: nothing persists between invocations beyond
/// the output artifact.
pub async fn run_scrape<T: HttpTransport>(
    transport: &T,
    settings: &Settings,
) -> Result<RunSummary, Error> {
    // Settings loading already validated the URL; guard again for
    // callers that build Settings by hand.
    if settings.request.url.is_empty() {
        let err = Error::Config("Missing request.url in settings".to_string());
        log::error!("[validateSettings] {err}");
        return Err(err);
    }

    let pages = match fetch_all_pages(
        transport,
        &settings.request,
        &settings.pagination,
        &settings.retry,
    )
    .await
    {
        Ok(pages) => pages,
        Err(err) => {
            log::error!("[fetch] {url}: {err}", url = settings.request.url);
            return Err(err);
        }
    };

    let raw_records = extract_records(&pages, settings.response_path.as_deref());
    let output_records = transform_records(&raw_records, &settings.mapping, &settings.filters);

    let written = match write_output(&output_records, &settings.output) {
        Ok(written) => written,
        Err(err) => {
            log::error!("[writeOutput] {err}");
            return Err(err);
        }
    };

    Ok(RunSummary {
        record_count: output_records.len(),
        output_path: written.file_path,
        format: written.format.to_string(),
    })
}
