//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the crawl together:
//! - Resolving the seed URL into the crawl root
//! - Spawning one task per discovered URL
//! - Checking each URL with HEAD and GET and classifying the outcome
//! - Expanding internal pages into child tasks
//! - Closing the result stream once no task is left in flight

use crate::config::{validate, CheckerConfig};
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::in_flight::InFlight;
use crate::crawler::limiter::RateLimiter;
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::crawler::stream::{self, ResultStream};
use crate::crawler::visited::VisitedSet;
use crate::output::ProgressBar;
use crate::state::status::{PROBLEM_NON_OK, STATUS_BOT_BLOCKED};
use crate::state::{CheckResult, CrawlState};
use crate::url::{canonicalise_child, canonicalise_root, is_link_ok_to_add, visit_key};
use crate::LinkCheckError;
use reqwest::{Client, Response};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// Checks every link reachable from a seed URL
///
/// A `LinkChecker` runs a single crawl. Create it, take the stream with
/// [`LinkChecker::results`], then call [`LinkChecker::check`]. `check` only
/// returns once the crawl is finished, so the stream must be drained
/// concurrently when the crawl can produce more results than the stream's
/// capacity.
///
/// # Example
///
/// ```no_run
/// use linkchecker::{CheckerConfig, LinkChecker};
///
/// # async fn run() -> linkchecker::Result<()> {
/// let mut checker = LinkChecker::new(CheckerConfig::default())?;
/// let results = checker.results().expect("results are taken once");
///
/// let collector = tokio::spawn(results.collect_all());
/// checker.check("https://example.com").await?;
///
/// for result in collector.await.unwrap() {
///     println!("{}", result);
/// }
/// # Ok(())
/// # }
/// ```
pub struct LinkChecker {
    fetcher: Fetcher,
    limiter: Arc<RateLimiter>,
    extractor: Arc<dyn LinkExtractor>,
    visited: Arc<VisitedSet>,
    progress: Arc<ProgressBar>,
    user_agent: String,
    sender: Option<mpsc::Sender<CheckResult>>,
    results: Option<ResultStream>,
}

impl LinkChecker {
    /// Creates a new checker from a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(LinkChecker)` - Ready to run one crawl
    /// * `Err(LinkCheckError)` - The configuration is invalid or the HTTP
    ///   client could not be built
    pub fn new(config: CheckerConfig) -> Result<Self, LinkCheckError> {
        validate(&config)?;

        let fetcher = Fetcher::new(&config)?;
        let limiter = RateLimiter::from_limits(config.rate_limits())?;
        let (sender, results) =
            stream::channel(config.checker.buffer_size, config.checker.verbose);

        tracing::debug!(
            "Created link checker with {:?}, buffer size {}",
            limiter,
            config.checker.buffer_size
        );

        Ok(Self {
            fetcher,
            limiter: Arc::new(limiter),
            extractor: Arc::new(HtmlLinkExtractor::new()),
            visited: Arc::new(VisitedSet::new()),
            progress: Arc::new(ProgressBar::new()),
            user_agent: config.checker.user_agent,
            sender: Some(sender),
            results: Some(results),
        })
    }

    /// Uses `client` for every request instead of the default client
    pub fn with_client(mut self, client: Client) -> Self {
        self.fetcher = Fetcher::with_client(client, &self.user_agent);
        self
    }

    /// Uses `extractor` to find links in page bodies
    pub fn with_extractor(mut self, extractor: impl LinkExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Uses `progress` to report scheduled and started tasks
    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = progress;
        self
    }

    /// Takes the result stream; returns `None` once it has been taken
    pub fn results(&mut self) -> Option<ResultStream> {
        self.results.take()
    }

    /// The progress bar this checker reports to
    pub fn progress(&self) -> Arc<ProgressBar> {
        Arc::clone(&self.progress)
    }

    /// Number of URLs claimed so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Crawls the site at `seed` and returns once every task has finished
    ///
    /// The result stream is closed when this returns. A seed that cannot be
    /// parsed is reported as a Down result rather than as an error.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The crawl ran to completion
    /// * `Err(LinkCheckError::AlreadyChecked)` - This checker already ran
    pub async fn check(&mut self, seed: &str) -> Result<(), LinkCheckError> {
        let sender = self.sender.take().ok_or(LinkCheckError::AlreadyChecked)?;
        let seed = seed.trim();

        tracing::info!("Checking links on {}", seed);

        let (root_url, root) = match canonicalise_root(&self.fetcher, seed).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("Unable to resolve seed {}: {}", seed, e);
                self.progress.add(1);
                self.progress.completed();
                let result = CheckResult::new(seed, seed).down(None, e.to_string());
                if sender.send(result).await.is_err() {
                    tracing::debug!("Result stream closed before the seed was reported");
                }
                return Ok(());
            }
        };

        let in_flight = InFlight::new();
        let crawl = Arc::new(Crawl {
            fetcher: self.fetcher.clone(),
            limiter: Arc::clone(&self.limiter),
            extractor: Arc::clone(&self.extractor),
            visited: Arc::clone(&self.visited),
            progress: Arc::clone(&self.progress),
            in_flight: Arc::clone(&in_flight),
            root,
            sender,
        });

        crawl.dispatch(root_url.clone(), root_url);
        // Only tasks hold the sender from here on
        drop(crawl);

        in_flight.wait_idle().await;

        tracing::info!(
            "Finished checking {}: {} urls visited",
            seed,
            self.visited.len()
        );
        Ok(())
    }
}

impl std::fmt::Debug for LinkChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkChecker")
            .field("limiter", &self.limiter)
            .field("visited", &self.visited.len())
            .field("checked", &self.sender.is_none())
            .finish()
    }
}

/// Crawls `seed` in the background and returns its result stream
///
/// The stream ends once the crawl has finished.
///
/// # Panics
///
/// Panics when called outside a tokio runtime, since the crawl is spawned
/// onto the current runtime.
///
/// # Example
///
/// ```no_run
/// use linkchecker::{check_site_links, CheckerConfig};
///
/// # async fn run() -> linkchecker::Result<()> {
/// let mut results = check_site_links("https://example.com", CheckerConfig::default())?;
/// while let Some(result) = results.recv().await {
///     println!("{}", result);
/// }
/// # Ok(())
/// # }
/// ```
pub fn check_site_links(seed: &str, config: CheckerConfig) -> Result<ResultStream, LinkCheckError> {
    let mut checker = LinkChecker::new(config)?;
    let results = checker.results().ok_or(LinkCheckError::AlreadyChecked)?;
    let seed = seed.to_string();

    tokio::spawn(async move {
        if let Err(e) = checker.check(&seed).await {
            tracing::error!("Crawl of {} failed: {}", seed, e);
        }
    });

    Ok(results)
}

/// Shared context of one running crawl
///
/// Every task holds an `Arc<Crawl>`, and with it a sender of the result
/// stream, so the stream closes when the last task finishes.
struct Crawl {
    fetcher: Fetcher,
    limiter: Arc<RateLimiter>,
    extractor: Arc<dyn LinkExtractor>,
    visited: Arc<VisitedSet>,
    progress: Arc<ProgressBar>,
    in_flight: Arc<InFlight>,
    root: CrawlState,
    sender: mpsc::Sender<CheckResult>,
}

impl Crawl {
    /// Spawns a task checking `url`
    ///
    /// The task is counted as in flight before it is spawned, so the count
    /// cannot drop to zero while a parent is still dispatching children.
    fn dispatch(self: &Arc<Self>, url: String, referring_site: String) {
        self.progress.add(1);
        let guard = self.in_flight.enter();
        let crawl = Arc::clone(self);

        tokio::spawn(async move {
            let _guard = guard;
            crawl.visit(url, referring_site).await;
        });
    }

    /// Checks one URL and, for internal pages, expands its links
    async fn visit(self: Arc<Self>, url: String, referring_site: String) {
        self.progress.completed();

        if !self.visited.claim(&visit_key(&url)) {
            tracing::trace!("Skipping {}, already claimed", url);
            return;
        }

        tracing::debug!("Checking {} (linked from {})", url, referring_site);
        let result = CheckResult::new(url.as_str(), referring_site);

        let parsed = match Url::parse(&url) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.emit(result.down(None, e.to_string())).await;
                return;
            }
        };
        let host = parsed.host_str().unwrap_or_default().to_string();

        let head_code = match self.fetcher.head_status(&url).await {
            Ok(code) => code,
            Err(e) => {
                self.emit(failed(result, e)).await;
                return;
            }
        };

        if head_code == 429 || head_code == STATUS_BOT_BLOCKED {
            self.emit(result.classified(head_code, &host)).await;
            return;
        }

        if !self.root.is_internal(&parsed) {
            self.check_external(result, head_code, &host).await;
            return;
        }

        let response = match self.fetcher.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                self.emit(failed(result, e)).await;
                return;
            }
        };

        let code = response.status().as_u16();
        if code != 200 {
            let classified = result.classified(code, &host);
            let classified = if classified.is_up() {
                // Only a full 200 counts for an internal page
                classified.down(Some(code), PROBLEM_NON_OK)
            } else {
                classified
            };
            self.emit(classified).await;
            return;
        }

        self.emit(result.up(code)).await;
        self.expand(&url, response).await;
    }

    /// Classifies an external link; external pages are never expanded
    async fn check_external(&self, result: CheckResult, head_code: u16, host: &str) {
        let from_head = result.clone().classified(head_code, host);
        if from_head.is_up() {
            self.emit(from_head).await;
            return;
        }

        // Plenty of servers answer HEAD with 405 or 404, so confirm with GET
        tracing::debug!(
            "HEAD {} answered {}, retrying with GET",
            result.url,
            head_code
        );
        match self.fetcher.get(&result.url).await {
            Ok(response) => {
                let code = response.status().as_u16();
                self.emit(result.classified(code, host)).await;
            }
            Err(e) => self.emit(failed(result, e)).await,
        }
    }

    /// Dispatches a task for every new link on the page at `url`
    async fn expand(self: &Arc<Self>, url: &str, response: Response) {
        let body = match self.fetcher.read_body(url, response).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Unable to read body of {}: {}", url, e);
                return;
            }
        };

        let hrefs = match self.extractor.extract(&body) {
            Ok(hrefs) => hrefs,
            Err(e) => {
                tracing::warn!("Unable to extract links from {}: {}", url, e);
                return;
            }
        };

        let mut seen_on_page = HashSet::new();

        for href in hrefs {
            if !is_link_ok_to_add(&href, &self.root) {
                continue;
            }

            let child = match canonicalise_child(&href, &self.root) {
                Ok(child) => child,
                Err(e) => {
                    let raw = href.trim();
                    if self.visited.claim(raw) {
                        tracing::debug!("Malformed link {} on {}: {}", raw, url, e);
                        let result = CheckResult::new(raw, url).down(None, e.to_string());
                        self.emit(result).await;
                    }
                    continue;
                }
            };

            let key = visit_key(&child);
            if !seen_on_page.insert(key.clone()) || self.visited.is_visited(&key) {
                continue;
            }

            if let Err(e) = self.limiter.wait().await {
                tracing::warn!("Not checking {}: {}", child, e);
                continue;
            }

            self.dispatch(child, url.to_string());
        }
    }

    async fn emit(&self, result: CheckResult) {
        if self.sender.send(result).await.is_err() {
            tracing::debug!("Result stream closed, dropping result");
        }
    }
}

/// Turns a transport failure into a result
///
/// Timeouts usually mean the server is throttling us, so they count as rate
/// limited rather than down.
fn failed(result: CheckResult, err: FetchError) -> CheckResult {
    if err.is_timeout() {
        result.rate_limited(None, err.to_string())
    } else {
        result.down(None, err.to_string())
    }
}
