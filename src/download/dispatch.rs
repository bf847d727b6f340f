//! Per-post dispatch: classification, resolution, and fetch orchestration.

use crate::download::fetcher::{FetchStatus, Fetcher};
use crate::download::session::SessionCounters;
use crate::media::{classify, DownloadTarget, PostKind, SavedPost};
use crate::redgifs::{RedgifsClient, Resolution};

/// Outcome of one unit of work (a post, or one gallery item).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Downloaded,
    Skipped,
    Failed,

    /// Content permanently removed upstream. Expected, counted separately.
    Gone,

    /// Post type out of scope.
    Ignored,
}

/// Whether the session should keep consuming the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Routes each saved post to the right pipeline and reports every unit of
/// work to the session counters.
///
/// No error escapes a post: a failing unit is recorded as
/// [`Outcome::Failed`] and the run moves on.
pub struct Dispatcher<'a> {
    fetcher: &'a Fetcher,
    redgifs: &'a mut RedgifsClient,
    skip_limit: u32,
}

impl<'a> Dispatcher<'a> {
    pub fn new(fetcher: &'a Fetcher, redgifs: &'a mut RedgifsClient, skip_limit: u32) -> Self {
        Self {
            fetcher,
            redgifs,
            skip_limit,
        }
    }

    /// Process one saved post to completion.
    ///
    /// Returns [`Flow::Stop`] as soon as the consecutive-skip limit is
    /// reached, which can happen between gallery items.
    pub async fn dispatch_post(
        &mut self,
        post: &SavedPost,
        counters: &mut SessionCounters,
    ) -> Flow {
        match classify(post) {
            PostKind::Gallery(targets) => self.process_targets(targets, counters).await,
            PostKind::DirectImage(target) => self.process_targets([target], counters).await,
            PostKind::ExternalVideo { post_url, filename } => {
                self.process_external_video(&post_url, filename, counters)
                    .await
            }
            PostKind::Unrecognized => {
                tracing::trace!(title = %post.title, url = %post.url, "ignoring post");
                counters.record(Outcome::Ignored);
                Flow::Continue
            }
        }
    }

    /// Fetch a sequence of targets independently; one failure never aborts
    /// the remaining siblings, only the skip limit does.
    async fn process_targets(
        &mut self,
        targets: impl IntoIterator<Item = DownloadTarget>,
        counters: &mut SessionCounters,
    ) -> Flow {
        for target in targets {
            let outcome = self.fetch_outcome(&target).await;
            counters.record(outcome);
            if self.limit_reached(counters) {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    async fn process_external_video(
        &mut self,
        post_url: &str,
        filename: String,
        counters: &mut SessionCounters,
    ) -> Flow {
        let outcome = match self.redgifs.resolve(post_url).await {
            Ok(Resolution::Media(source_url)) => {
                let target = DownloadTarget {
                    source_url,
                    filename,
                    verify_size: true,
                };
                self.fetch_outcome(&target).await
            }
            Ok(Resolution::Gone) => Outcome::Gone,
            Ok(Resolution::NotFound) => Outcome::Failed,
            Err(e) => {
                tracing::error!(url = %post_url, error = %e, "failed to resolve video post");
                Outcome::Failed
            }
        };

        counters.record(outcome);
        if self.limit_reached(counters) {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    async fn fetch_outcome(&self, target: &DownloadTarget) -> Outcome {
        match self.fetcher.fetch(target).await {
            Ok(FetchStatus::Skipped) => Outcome::Skipped,
            Ok(FetchStatus::Downloaded) => Outcome::Downloaded,
            Err(e) => {
                tracing::warn!(file = %target.filename, error = %e, "download failed");
                Outcome::Failed
            }
        }
    }

    fn limit_reached(&self, counters: &SessionCounters) -> bool {
        self.skip_limit > 0 && counters.consecutive_skips >= self.skip_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::download::retry::RetryPolicy;

    fn fetcher(server_dir: &TempDir) -> Fetcher {
        Fetcher::new(reqwest::Client::new(), server_dir.path().to_path_buf())
            .with_retry_policy(RetryPolicy::new(2, Duration::from_millis(1)))
    }

    fn redgifs(server: &MockServer) -> RedgifsClient {
        RedgifsClient::with_base_url(reqwest::Client::new(), server.uri())
    }

    fn target(server: &MockServer, remote: &str, filename: &str) -> DownloadTarget {
        DownloadTarget {
            source_url: format!("{}{}", server.uri(), remote),
            filename: filename.to_string(),
            verify_size: false,
        }
    }

    #[tokio::test]
    async fn test_failed_item_does_not_abort_siblings() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/1.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"one"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/3.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"three"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&dir);
        let mut redgifs = redgifs(&server);
        let mut dispatcher = Dispatcher::new(&fetcher, &mut redgifs, 0);
        let mut counters = SessionCounters::default();

        let flow = dispatcher
            .process_targets(
                [
                    target(&server, "/1.jpg", "album_1.jpg"),
                    target(&server, "/2.jpg", "album_2.jpg"),
                    target(&server, "/3.jpg", "album_3.jpg"),
                ],
                &mut counters,
            )
            .await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(counters.downloaded, 2);
        assert_eq!(counters.failed, 1);
        assert!(dir.path().join("album_3.jpg").exists());
    }

    #[tokio::test]
    async fn test_skip_limit_stops_mid_sequence() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("album_1.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("album_2.jpg"), b"y").unwrap();

        // Item 3 must never be requested.
        Mock::given(method("GET"))
            .and(path("/3.jpg"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let fetcher = fetcher(&dir);
        let mut redgifs = redgifs(&server);
        let mut dispatcher = Dispatcher::new(&fetcher, &mut redgifs, 2);
        let mut counters = SessionCounters::default();

        let flow = dispatcher
            .process_targets(
                [
                    target(&server, "/1.jpg", "album_1.jpg"),
                    target(&server, "/2.jpg", "album_2.jpg"),
                    target(&server, "/3.jpg", "album_3.jpg"),
                ],
                &mut counters,
            )
            .await;

        assert_eq!(flow, Flow::Stop);
        assert_eq!(counters.skipped, 2);
        assert_eq!(counters.consecutive_skips, 2);
    }

    #[tokio::test]
    async fn test_gone_video_counts_upstream_deleted_without_fetch() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/v2/auth/temporary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/gifs/deadclip"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let fetcher = fetcher(&dir);
        let mut redgifs = redgifs(&server);
        let mut dispatcher = Dispatcher::new(&fetcher, &mut redgifs, 0);
        let mut counters = SessionCounters::default();

        let post = SavedPost {
            title: "removed clip".to_string(),
            url: "https://www.redgifs.com/watch/deadclip".to_string(),
            is_gallery: false,
            gallery_items: Vec::new(),
        };

        let flow = dispatcher.dispatch_post(&post, &mut counters).await;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(counters.upstream_deleted, 1);
        assert_eq!(counters.downloaded, 0);
        assert_eq!(counters.failed, 0);
        // Gone does not break a run of skips.
        assert_eq!(counters.consecutive_skips, 0);
    }

    #[tokio::test]
    async fn test_resolved_video_is_fetched_with_size_verification() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/v2/auth/temporary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/gifs/goodclip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "gif": { "urls": { "hd": format!("{}/cdn/goodclip.mp4", server.uri()) } }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cdn/goodclip.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"video bytes"))
            .expect(1)
            .mount(&server)
            .await;
        // Verification path for the second dispatch of the same post.
        Mock::given(method("HEAD"))
            .and(path("/cdn/goodclip.mp4"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-length", "11"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = fetcher(&dir);
        let mut redgifs = redgifs(&server);
        let mut dispatcher = Dispatcher::new(&fetcher, &mut redgifs, 0);
        let mut counters = SessionCounters::default();

        let post = SavedPost {
            title: "nice: clip".to_string(),
            url: "https://www.redgifs.com/watch/goodclip".to_string(),
            is_gallery: false,
            gallery_items: Vec::new(),
        };

        dispatcher.dispatch_post(&post, &mut counters).await;
        assert_eq!(counters.downloaded, 1);
        assert_eq!(std::fs::read(dir.path().join("nice clip.mp4")).unwrap(), b"video bytes");

        // Second dispatch with no upstream change is a verified skip.
        dispatcher.dispatch_post(&post, &mut counters).await;
        assert_eq!(counters.downloaded, 1);
        assert_eq!(counters.skipped, 1);
    }

    #[tokio::test]
    async fn test_unrecognized_post_is_ignored() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        let fetcher = fetcher(&dir);
        let mut redgifs = redgifs(&server);
        let mut dispatcher = Dispatcher::new(&fetcher, &mut redgifs, 0);
        let mut counters = SessionCounters::default();

        let post = SavedPost {
            title: "text post".to_string(),
            url: "https://www.reddit.com/r/rust/comments/abc/".to_string(),
            is_gallery: false,
            gallery_items: Vec::new(),
        };

        let flow = dispatcher.dispatch_post(&post, &mut counters).await;
        assert_eq!(flow, Flow::Continue);
        assert_eq!(counters.ignored, 1);
        assert_eq!(counters.consecutive_skips, 0);
    }
}
