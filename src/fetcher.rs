extern crate reqwest;

use crate::result;

pub const DEFAULT_BASE_URL: &str = "https://webservices.umoiq.com";

pub type FetchFn = fn(&str) -> result::NextBusResult<Vec<u8>>;

/// Same shape as `fetch`: base url, agency, stop.
pub type FeedFn = fn(&str, &str, &str) -> result::NextBusResult<Vec<u8>>;

pub fn prediction_url(base_url: &str, agency: &str, stop_id: &str) -> result::NextBusResult<String> {
    if agency.is_empty() {
        return Err(result::NextBusError::InvalidIdentifier("agency".to_string()));
    }
    if stop_id.is_empty() {
        return Err(result::NextBusError::InvalidIdentifier("stop".to_string()));
    }

    return Ok(format!(
        "{base_url}/service/publicJSONFeed?command=predictions&a={agency}&stopId={stop_id}",
        base_url = base_url.trim_end_matches('/'), agency = agency, stop_id = stop_id));
}

pub fn fetch(base_url: &str, agency: &str, stop_id: &str) -> result::NextBusResult<Vec<u8>> {
    return fetch_ext(base_url, agency, stop_id, real_fetch);
}

pub fn fetch_ext(base_url: &str, agency: &str, stop_id: &str, fetch_fn: FetchFn) -> result::NextBusResult<Vec<u8>> {
    let url = prediction_url(base_url, agency, stop_id)?;
    debug!("Fetching {}", url);
    return fetch_fn(&url);
}

pub fn real_fetch(url: &str) -> result::NextBusResult<Vec<u8>> {
    use std::io::Read;

    let client = reqwest::blocking::Client::new();
    let mut response = client.get(url)
        .header(reqwest::header::USER_AGENT, concat!("nextbus-dash/", env!("CARGO_PKG_VERSION")))
        .send()?
        .error_for_status()?;
    let mut response_body = vec![];
    response.read_to_end(&mut response_body)?;
    return Ok(response_body);
}
