use crate::config::Config;
use crate::SpiderError;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace, warn};

/// Substrings that mark a rendered href as a candidate document, matched case-insensitively.
///
/// Looser than the static extension check: links generated client-side often hide the
/// extension behind a query string or a route.
pub const KEYWORDS: [&str; 2] = ["pdf", "quarterly"];

/// A blocking, scripted browser session that renders a page and reports its anchors.
pub trait Render: Send + Sync {
    /// Render `url`, wait for at least one hyperlink to appear, and return the `href` of every
    /// anchor on the page in document order.
    fn render_links(&self, url: &str) -> Result<Vec<String>, SpiderError>;
}

/// Dynamic-rendering capability; `Unavailable` is a normal state, not an error.
#[derive(Clone, Default)]
pub enum Renderer {
    Available(Arc<dyn Render>),
    #[default]
    Unavailable,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Renderer::Available"),
            Self::Unavailable => f.write_str("Renderer::Unavailable"),
        }
    }
}

impl Renderer {
    pub fn available(render: impl Render + 'static) -> Self {
        Self::Available(Arc::new(render))
    }

    /// Launch headless Chrome; if the launch fails the capability is `Unavailable`.
    #[cfg(feature = "dynamic")]
    pub fn detect(config: &Config) -> Self {
        match chrome::HeadlessChrome::launch(config) {
            Ok(chrome) => {
                debug!("headless chrome launched; dynamic extraction enabled");
                Self::available(chrome)
            }
            Err(err) => {
                warn!("headless chrome unavailable, static extraction only, error({err})");
                Self::Unavailable
            }
        }
    }

    /// This build has no headless browser; always `Unavailable`.
    #[cfg(not(feature = "dynamic"))]
    pub fn detect(_config: &Config) -> Self {
        warn!("built without the `dynamic` feature; static extraction only");
        Self::Unavailable
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Keyword-matching hrefs from the rendered `url`; `Ok(None)` when the capability is
    /// unavailable.
    pub async fn extract_links(&self, url: &str) -> Result<Option<Vec<String>>, SpiderError> {
        let Self::Available(render) = self else {
            trace!("no renderer; skipping dynamic extraction of {url}");
            return Ok(None);
        };

        let render = Arc::clone(render);
        let target = url.to_string();
        let hrefs = tokio::task::spawn_blocking(move || render.render_links(&target))
            .await
            .map_err(|err| SpiderError::Render {
                url: url.to_string(),
                reason: err.to_string(),
            })??;

        let links = filter_keywords(hrefs);
        debug!("dynamic extraction found {} links on {url}", links.len());
        Ok(Some(links))
    }
}

/// Keep hrefs containing any of [`KEYWORDS`], preserving order.
pub fn filter_keywords(hrefs: Vec<String>) -> Vec<String> {
    hrefs
        .into_iter()
        .filter(|href| {
            let href = href.to_lowercase();
            KEYWORDS.iter().any(|keyword| href.contains(keyword))
        })
        .collect()
}

/// Failure of one use of a [`Session`].
#[cfg_attr(not(feature = "dynamic"), allow(dead_code))]
pub(crate) enum SessionError {
    /// The connection to the session is gone; a fresh launch may succeed.
    Lost(SpiderError),
    /// The session is fine but the work failed.
    Failed(SpiderError),
}

type Launch<S> = Box<dyn Fn() -> Result<S, SpiderError> + Send + Sync>;

/// A long-lived session that is launched on demand and relaunched once when its connection has
/// dropped.
#[cfg_attr(not(feature = "dynamic"), allow(dead_code))]
pub(crate) struct Session<S> {
    current: Mutex<Option<Arc<S>>>,
    launch: Launch<S>,
}

#[cfg_attr(not(feature = "dynamic"), allow(dead_code))]
impl<S> Session<S> {
    pub(crate) fn new(launch: impl Fn() -> Result<S, SpiderError> + Send + Sync + 'static) -> Self {
        Self {
            current: Mutex::new(None),
            launch: Box::new(launch),
        }
    }

    /// Launch now and keep the session for later use.
    pub(crate) fn warm(&self) -> Result<(), SpiderError> {
        self.acquire().map(|_| ())
    }

    fn acquire(&self) -> Result<Arc<S>, SpiderError> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = current.as_ref() {
            return Ok(Arc::clone(session));
        }
        let session = Arc::new((self.launch)()?);
        *current = Some(Arc::clone(&session));
        Ok(session)
    }

    fn discard(&self) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Run `work` on the live session; on [`SessionError::Lost`] relaunch and try once more.
    pub(crate) fn with<T>(
        &self,
        work: impl Fn(&S) -> Result<T, SessionError>,
    ) -> Result<T, SpiderError> {
        let session = self.acquire()?;
        match work(session.as_ref()) {
            Ok(value) => Ok(value),
            Err(SessionError::Failed(err)) => Err(err),
            Err(SessionError::Lost(err)) => {
                warn!("browser session lost, relaunching, error({err})");
                self.discard();
                let session = self.acquire()?;
                match work(session.as_ref()) {
                    Ok(value) => Ok(value),
                    Err(SessionError::Lost(err)) | Err(SessionError::Failed(err)) => Err(err),
                }
            }
        }
    }
}

#[cfg(feature = "dynamic")]
mod chrome {
    use super::{Render, Session, SessionError};
    use crate::config::Config;
    use crate::SpiderError;
    use headless_chrome::{Browser, LaunchOptions, Tab};
    use std::ffi::OsString;
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::{debug, trace, warn};

    /// How long Chrome keeps an unused connection before dropping it.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

    pub(super) struct HeadlessChrome {
        session: Session<Browser>,
        wait: Duration,
    }

    impl HeadlessChrome {
        /// Launch Chrome with the configured user agent. Later renders relaunch it if the
        /// connection has dropped in the meantime.
        pub(super) fn launch(config: &Config) -> Result<Self, SpiderError> {
            let user_agent = config.user_agent.clone();
            let session = Session::new(move || start(&user_agent));
            session.warm()?;
            Ok(Self {
                session,
                wait: config.render_timeout,
            })
        }
    }

    fn start(user_agent: &str) -> Result<Browser, SpiderError> {
        let mut user_agent_arg = OsString::from("--user-agent=");
        user_agent_arg.push(user_agent);

        let options = LaunchOptions {
            headless: true,
            sandbox: false,
            idle_browser_timeout: IDLE_TIMEOUT,
            args: vec![user_agent_arg.as_os_str()],
            ..Default::default()
        };
        debug!("launching headless chrome");
        Browser::new(options).map_err(|err| SpiderError::Render {
            url: String::new(),
            reason: err.to_string(),
        })
    }

    fn render_err(url: &str, err: anyhow::Error) -> SpiderError {
        SpiderError::Render {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }

    fn anchors(tab: &Tab, url: &str, wait: Duration) -> Result<Vec<String>, anyhow::Error> {
        tab.navigate_to(url)?;
        tab.wait_for_element_with_custom_timeout("a", wait)?;

        let mut hrefs = Vec::new();
        for anchor in tab.find_elements("a")? {
            if let Some(href) = anchor.get_attribute_value("href")? {
                hrefs.push(href);
            }
        }
        Ok(hrefs)
    }

    impl Render for HeadlessChrome {
        fn render_links(&self, url: &str) -> Result<Vec<String>, SpiderError> {
            self.session.with(|browser| {
                let tab: Arc<Tab> = browser
                    .new_tab()
                    .map_err(|err| SessionError::Lost(render_err(url, err)))?;

                let hrefs = anchors(&tab, url, self.wait);
                if let Err(err) = tab.close(true) {
                    warn!("failed to close tab for {url}, error({err})");
                }

                let hrefs = hrefs.map_err(|err| SessionError::Failed(render_err(url, err)))?;
                trace!("rendered {url}: {} anchors", hrefs.len());
                Ok(hrefs)
            })
        }
    }
}
