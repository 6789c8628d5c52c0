mod builder;

use crate::error::{Result, SessionError};
pub use builder::SessionBuilder;
use fantoccini::{Client, Locator};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A headless browser session. Scarce OS-level resource: acquired once
/// before navigation, released exactly once via [`Session::close`].
pub struct Session {
    client: Client,
    render_timeout: Duration,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub(crate) fn new(client: Client, render_timeout: Duration) -> Self {
        Self {
            client,
            render_timeout,
        }
    }

    /// Navigate to `url` and return the current DOM serialization without
    /// waiting for client-side rendering.
    pub async fn fetch_raw(&mut self, url: &str) -> Result<String> {
        self.client
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation(e.to_string()))?;
        self.page_source().await
    }

    /// Poll the live DOM until an element with the given class is present,
    /// then return the up-to-date serialization. Navigation completion does
    /// not imply render completion; reading the page before the marker
    /// appears yields empty or partial results.
    ///
    /// Only "no such element" keeps the poll going; any other WebDriver
    /// failure (dead session, invalid locator) surfaces immediately rather
    /// than being misreported as a render timeout.
    pub async fn wait_for_marker(&mut self, css_class: &str) -> Result<String> {
        let locator = format!(".{}", css_class);
        let client = self.client.clone();

        let check = move || {
            let mut client = client.clone();
            let locator = locator.clone();
            async move {
                match client.find(Locator::Css(&locator)).await {
                    Ok(_) => Ok(true),
                    Err(e) if e.is_no_such_element() => Ok(false),
                    Err(e) => Err(SessionError::Command(e.to_string())),
                }
            }
        };

        match poll_until(check, self.render_timeout).await {
            Ok(()) => self.page_source().await,
            Err(WaitFailure::TimedOut { waited }) => Err(SessionError::RenderTimeout {
                marker: css_class.to_string(),
                waited_secs: waited.as_secs(),
            }
            .into()),
            Err(WaitFailure::Failed(e)) => Err(e.into()),
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        self.client
            .source()
            .await
            .map_err(|e| SessionError::Command(e.to_string()).into())
    }

    /// End the WebDriver session, terminating the browser process.
    pub async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| SessionError::Command(e.to_string()).into())
    }
}

#[derive(Debug)]
enum WaitFailure {
    TimedOut { waited: Duration },
    Failed(SessionError),
}

/// Run `check` every [`POLL_INTERVAL`] until it reports present, the
/// deadline passes, or it fails. The deadline is evaluated after each
/// check, so the wait is bounded by `timeout` plus at most one interval.
async fn poll_until<F, Fut>(
    mut check: F,
    timeout: Duration,
) -> std::result::Result<(), WaitFailure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<bool, SessionError>>,
{
    let start = Instant::now();
    loop {
        match check().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => return Err(WaitFailure::Failed(e)),
        }

        if start.elapsed() >= timeout {
            return Err(WaitFailure::TimedOut {
                waited: start.elapsed(),
            });
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
