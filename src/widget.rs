use crate::fetcher;
use crate::nextbus;
use crate::result;
use crate::settings::Settings;

/// Shown when the request itself fails (connect, timeout, non-2xx).
pub const REQUEST_ERROR_TOKEN: &str = "ERROR REQ";
/// Shown when a response arrived but couldn't be read or decoded.
pub const ERROR_TOKEN: &str = "ERROR";

#[derive(Debug, PartialEq)]
pub struct Panel {
    pub title: String,
    pub body: String,
    pub wrap: bool,
}

pub struct Widget {
    settings: Settings,
    feed_fn: fetcher::FeedFn,
}

impl Widget {
    pub fn new(settings: Settings) -> Widget {
        return Widget::with_feed_fn(settings, fetcher::fetch);
    }

    fn with_feed_fn(settings: Settings, feed_fn: fetcher::FeedFn) -> Widget {
        return Widget{
            settings: settings,
            feed_fn: feed_fn,
        };
    }

    pub fn settings(&self) -> &Settings {
        return &self.settings;
    }

    pub fn refresh(&self) -> Panel {
        return Panel{
            title: self.settings.title.clone(),
            body: self.content(),
            wrap: false,
        };
    }

    fn content(&self) -> String {
        let response_body = match (self.feed_fn)(
            &self.settings.base_url, &self.settings.agency, &self.settings.stop_id) {
            Ok(body) => body,
            Err(err) => {
                error!("Failed to make request to prediction service. ERROR: {}", err);
                return error_token(&err).to_string();
            }
        };

        match nextbus::format_predictions(&response_body) {
            Ok(text) => return text,
            Err(err) => {
                error!("Failed to decode prediction feed. ERROR: {}", err);
                return error_token(&err).to_string();
            }
        }
    }
}

fn error_token(err: &result::NextBusError) -> &'static str {
    match *err {
        result::NextBusError::HttpError(_) => REQUEST_ERROR_TOKEN,
        _ => ERROR_TOKEN,
    }
}
