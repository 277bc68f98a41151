use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::Error;

pub static USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/106.0.0.0 Safari/537.36";

/// A completed GET request.
#[derive(Clone, Debug)]
pub struct Fetched {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl Fetched {
    /// Anything other than 200 is treated as a failure.
    pub fn require_ok(self) -> crate::Result<Self> {
        if self.status == 200 {
            Ok(self)
        } else {
            Err(Error::Status(self.status, self.url))
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Anything able to GET a url.
pub trait Transport {
    fn get(&self, url: &str) -> crate::Result<Fetched>;

    /// Fetches a page and returns its text, provided the server answered with a 200.
    fn get_page(&self, url: &str) -> crate::Result<String> {
        Ok(self.get(url)?.require_ok()?.text())
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xml,image/*"));
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> crate::Result<Fetched> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.bytes()?.to_vec();
        Ok(Fetched { url, status, body })
    }
}
