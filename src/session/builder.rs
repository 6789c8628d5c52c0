use super::Session;
use crate::error::{Result, SessionError};
use fantoccini::ClientBuilder;
use serde_json::{json, Map, Value};
use std::time::Duration;
use url::Url;

pub struct SessionBuilder {
    webdriver_url: String,
    render_timeout: Duration,
    proxy: Option<String>,
    headless: bool,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            render_timeout: Duration::from_secs(600),
            proxy: None,
            headless: true,
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    pub fn render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn headless(mut self, enabled: bool) -> Self {
        self.headless = enabled;
        self
    }

    pub async fn connect(self) -> Result<Session> {
        Url::parse(&self.webdriver_url)
            .map_err(|e| SessionError::Init(format!("Invalid webdriver URL: {}", e)))?;

        let caps = chrome_capabilities(self.headless, self.proxy.as_deref());

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&self.webdriver_url)
            .await
            .map_err(|e| SessionError::Init(e.to_string()))?;

        Ok(Session::new(client, self.render_timeout))
    }
}

/// Build the `goog:chromeOptions` capability map for a scraping session.
/// All traffic goes through `proxy` when one is configured.
fn chrome_capabilities(headless: bool, proxy: Option<&str>) -> Map<String, Value> {
    let mut args = vec!["--no-sandbox".to_string()];

    if headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
        args.push("--disable-dev-shm-usage".to_string());
    }

    if let Some(proxy) = proxy {
        args.push(format!("--proxy-server={}", proxy));
    }

    let mut caps = Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}
