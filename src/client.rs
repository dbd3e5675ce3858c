use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use reqwest::blocking::Client as HttpClient;
use tracing::debug;

use crate::{
    error::Error,
    parser::parse_page,
    transaction::{Page, PageNumber},
};

pub const DEFAULT_URL_TEMPLATE: &str = "http://resttest.bench.co/transactions/{page}.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const PAGE_PLACEHOLDER: &str = "{page}";

/// Anything able to hand out pages of transactions, one at a time.
#[cfg_attr(test, automock)]
pub trait PageSource {
    fn fetch_page(&self, page: PageNumber) -> Result<Page, Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Page URL, with `{page}` standing for the page number.
    pub url_template: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Blocking client for the paginated transaction API.
pub struct ApiClient {
    http_client: HttpClient,
    url_template: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        if !config.url_template.contains(PAGE_PLACEHOLDER) {
            return Err(Error::InvalidUrlTemplate(config.url_template));
        }
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::ClientSetup(e.to_string()))?;
        Ok(Self {
            http_client,
            url_template: config.url_template,
        })
    }

    pub fn page_url(&self, page: PageNumber) -> String {
        self.url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    fn request_error(url: String, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout { url }
        } else if error.is_connect() {
            Error::Connection {
                url,
                reason: error.to_string(),
            }
        } else {
            Error::Request {
                url,
                reason: error.to_string(),
            }
        }
    }
}

impl PageSource for ApiClient {
    fn fetch_page(&self, page: PageNumber) -> Result<Page, Error> {
        let url = self.page_url(page);
        debug!(%url, "requesting page {}", page);

        let response = match self.http_client.get(&url).send() {
            Ok(response) => response,
            Err(error) => return Err(Self::request_error(url, error)),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        // A timeout can also hit while the body is still streaming in.
        let body = match response.text() {
            Ok(body) => body,
            Err(error) => return Err(Self::request_error(url, error)),
        };
        parse_page(&body, page)
    }
}
