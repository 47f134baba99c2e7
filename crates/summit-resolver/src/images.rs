use std::sync::Arc;

use summit_core::{Event, EventId, PortalConfig, ResolveError};
use tracing::info;

use crate::chain::{first_success, Attempt};
use crate::events::EventResolver;
use crate::fetch::{FetchedImage, Fetcher};

/// Cache lifetime for successfully resolved image bytes and for the static
/// mock-data redirect.
pub const IMAGE_MAX_AGE_SECS: u64 = 86_400;
/// Shorter lifetime for the terminal degraded redirect, so a recovered
/// upstream is picked up within the hour.
pub const DEGRADED_MAX_AGE_SECS: u64 = 3_600;

/// Which of an event's two image slots is being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Banner,
    Thumbnail,
}

impl ImageKind {
    /// The event field this kind reads. The thumbnail slot falls back to
    /// the full banner when no dedicated thumbnail filename is set.
    fn filename_field(self, event: &Event) -> Option<String> {
        let non_empty = |s: &String| !s.trim().is_empty();
        match self {
            Self::Banner => event.banner_image.clone().filter(|s| non_empty(s)),
            Self::Thumbnail => event
                .banner_thumbnail
                .clone()
                .filter(|s| non_empty(s))
                .or_else(|| event.banner_image.clone().filter(|s| non_empty(s))),
        }
    }

    /// Direct per-event endpoints tried before any filename lookup, in order.
    fn direct_candidates(self, config: &PortalConfig, id: &EventId) -> Vec<(&'static str, String)> {
        match self {
            Self::Banner => vec![
                (
                    "event_banner_endpoint",
                    config.upstream_url(&format!("events/{}/banner-image", id.as_str())),
                ),
                (
                    "event_image_endpoint",
                    config.upstream_url(&format!("events/{}/image", id.as_str())),
                ),
            ],
            Self::Thumbnail => vec![
                (
                    "event_thumbnail_endpoint",
                    config.upstream_url(&format!("events/{}/banner-thumbnail", id.as_str())),
                ),
                (
                    "event_thumb_endpoint",
                    config.upstream_url(&format!("events/{}/thumb", id.as_str())),
                ),
            ],
        }
    }
}

/// Terminal reply of an image resolution. Never an error: every request
/// ends in bytes or a redirect.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageReply {
    Bytes {
        image: FetchedImage,
        max_age_secs: u64,
    },
    Redirect {
        location: String,
        max_age_secs: u64,
    },
}

/// Outcome of the direct per-event tier.
enum DirectImage {
    Fetched(FetchedImage),
    /// Mock-data mode: skip fetching and send the static asset.
    Fallback,
    /// Every direct endpoint failed; continue to filename resolution.
    Miss,
}

/// Derive a thumbnail filename from a full-size one: `abc.jpg` becomes
/// `abc_thumb.jpg`. Filenames already carrying `_thumb` pass through.
pub fn thumbnail_filename(filename: &str) -> String {
    if filename.contains("_thumb") {
        return filename.to_string();
    }
    match filename.rfind('.') {
        Some(dot) => format!("{}_thumb{}", &filename[..dot], &filename[dot..]),
        None => format!("{filename}_thumb"),
    }
}

/// Hook for the route layer to supply extra filename candidate URLs, for
/// example the portal's own banner-image proxy.
pub type PathGenerator = dyn Fn(&str, &EventId) -> Vec<String> + Send + Sync;

/// Resolves event imagery with the same guarantee the event resolver gives
/// data: a reply is always produced, degrading through direct endpoints,
/// filename lookups, and finally a static placeholder redirect.
pub struct ImageResolver {
    config: Arc<PortalConfig>,
    fetcher: Arc<dyn Fetcher>,
}

impl ImageResolver {
    pub fn new(config: Arc<PortalConfig>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Try a filename against an ordered candidate URL list, first hit wins.
    pub async fn resolve_for_filename(
        &self,
        candidates: &[String],
    ) -> Result<FetchedImage, ResolveError> {
        let attempts = candidates
            .iter()
            .map(|url| {
                let fetcher = self.fetcher.clone();
                let headers = self.config.auth_headers();
                let url = url.clone();
                Attempt::new("filename_candidate", async move {
                    fetcher.get_bytes(&url, &headers).await
                })
            })
            .collect();
        first_success("image", attempts).await.map(|win| win.value)
    }

    /// Default candidate locations for a bare filename, in priority order.
    pub fn default_filename_candidates(&self, filename: &str) -> Vec<String> {
        vec![
            self.config.upstream_url(&format!("images/{filename}")),
            self.config.upstream_url(&format!("uploads/events/{filename}")),
        ]
    }

    async fn resolve_direct(&self, id: &EventId, kind: ImageKind) -> DirectImage {
        if self.config.use_mock_data {
            return DirectImage::Fallback;
        }
        let attempts = kind
            .direct_candidates(&self.config, id)
            .into_iter()
            .map(|(name, url)| {
                let fetcher = self.fetcher.clone();
                let headers = self.config.auth_headers();
                Attempt::new(name, async move { fetcher.get_bytes(&url, &headers).await })
            })
            .collect();
        match first_success("event_image", attempts).await {
            Ok(win) => DirectImage::Fetched(win.value),
            Err(_) => DirectImage::Miss,
        }
    }

    /// Full per-event image resolution. Infallible by construction.
    ///
    /// Tiers, in order: direct per-event endpoints; the event record's own
    /// filename tried against route-supplied candidate URLs; the static
    /// placeholder redirect.
    pub async fn handle_image_request(
        &self,
        events: &EventResolver,
        id: &EventId,
        kind: ImageKind,
        path_gen: &PathGenerator,
    ) -> ImageReply {
        match self.resolve_direct(id, kind).await {
            DirectImage::Fetched(image) => {
                return ImageReply::Bytes {
                    image,
                    max_age_secs: IMAGE_MAX_AGE_SECS,
                };
            }
            DirectImage::Fallback => {
                return ImageReply::Redirect {
                    location: self.config.fallback_asset_path.clone(),
                    max_age_secs: IMAGE_MAX_AGE_SECS,
                };
            }
            DirectImage::Miss => {}
        }

        // Filename tier: pull the event record (itself infallible) and try
        // its banner filename where images are hosted.
        let event = events.event_by_id(id).await.into_inner();
        if let Some(raw) = kind.filename_field(&event) {
            let filename = match kind {
                ImageKind::Banner => raw,
                ImageKind::Thumbnail => thumbnail_filename(&raw),
            };

            // Already-absolute URLs are fetched as-is, not re-rooted.
            let candidates = if filename.starts_with("http://") || filename.starts_with("https://")
            {
                vec![filename.clone()]
            } else {
                path_gen(&filename, id)
            };

            match self.resolve_for_filename(&candidates).await {
                Ok(image) => {
                    return ImageReply::Bytes {
                        image,
                        max_age_secs: IMAGE_MAX_AGE_SECS,
                    };
                }
                Err(err) => {
                    info!(id = %id, image = ?kind, kind = err.error_kind(),
                        "filename candidates exhausted, degrading to placeholder");
                }
            }
        }

        ImageReply::Redirect {
            location: self.config.fallback_asset_path.clone(),
            max_age_secs: DEGRADED_MAX_AGE_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockFetcher, MockReply};
    use summit_core::config::Environment;

    fn config() -> PortalConfig {
        let mut config = PortalConfig::default();
        config.environment = Environment::Production;
        config.upstream_base_url = "https://up.example.com/v1".to_string();
        config.internal_base_url = "http://127.0.0.1:9000".to_string();
        config.set_bearer_token("tok");
        config
    }

    struct Fixture {
        images: ImageResolver,
        events: EventResolver,
        mock: Arc<MockFetcher>,
    }

    fn fixture(config: PortalConfig, mock: MockFetcher) -> Fixture {
        let config = Arc::new(config);
        let mock = Arc::new(mock);
        Fixture {
            images: ImageResolver::new(config.clone(), mock.clone()),
            events: EventResolver::new(config, mock.clone()),
            mock,
        }
    }

    fn no_extra_paths() -> Box<PathGenerator> {
        Box::new(|_, _| Vec::new())
    }

    fn upstream_image_paths() -> Box<PathGenerator> {
        Box::new(|filename, _| {
            vec![
                format!("https://up.example.com/v1/images/{filename}"),
                format!("https://up.example.com/v1/uploads/events/{filename}"),
            ]
        })
    }

    #[test]
    fn thumbnail_filename_inserts_before_extension() {
        assert_eq!(thumbnail_filename("abc.jpg"), "abc_thumb.jpg");
        assert_eq!(thumbnail_filename("a.b.c.png"), "a.b.c_thumb.png");
        assert_eq!(thumbnail_filename("noext"), "noext_thumb");
    }

    #[test]
    fn thumbnail_filename_is_idempotent() {
        assert_eq!(thumbnail_filename("abc_thumb.jpg"), "abc_thumb.jpg");
        assert_eq!(thumbnail_filename("x_thumbnail.png"), "x_thumbnail.png");
    }

    #[tokio::test]
    async fn direct_banner_endpoints_are_tried_in_order() {
        let f = fixture(
            config(),
            MockFetcher::new().on("/events/177/image", MockReply::jpeg(&[9])),
        );

        let reply = f
            .images
            .handle_image_request(&f.events, &EventId::from(177), ImageKind::Banner, &no_extra_paths())
            .await;

        assert!(matches!(reply, ImageReply::Bytes { max_age_secs: IMAGE_MAX_AGE_SECS, .. }));
        let urls = f.mock.call_urls();
        assert!(urls[0].ends_with("/events/177/banner-image"));
        assert!(urls[1].ends_with("/events/177/image"));
    }

    #[tokio::test]
    async fn direct_endpoints_carry_auth_headers() {
        let f = fixture(
            config(),
            MockFetcher::new().on("/banner-image", MockReply::jpeg(&[1])),
        );

        f.images
            .handle_image_request(&f.events, &EventId::from(1), ImageKind::Banner, &no_extra_paths())
            .await;

        assert_eq!(f.mock.calls()[0].headers[0].1, "Bearer tok");
    }

    #[tokio::test]
    async fn mock_data_mode_redirects_without_any_fetch() {
        let mut config = config();
        config.use_mock_data = true;
        let f = fixture(config, MockFetcher::new());

        let reply = f
            .images
            .handle_image_request(&f.events, &EventId::from(177), ImageKind::Banner, &no_extra_paths())
            .await;

        assert_eq!(
            reply,
            ImageReply::Redirect {
                location: "/static/event-placeholder.png".to_string(),
                max_age_secs: IMAGE_MAX_AGE_SECS,
            }
        );
        assert_eq!(f.mock.call_count(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_event_filename_when_direct_endpoints_miss() {
        // Direct endpoints down; event record comes from the sample set and
        // its banner filename resolves at the second candidate location.
        let f = fixture(
            config(),
            MockFetcher::new().on(
                "/uploads/events/innovation-week-tz-2025.jpg",
                MockReply::jpeg(&[7, 7]),
            ),
        );

        let reply = f
            .images
            .handle_image_request(
                &f.events,
                &EventId::from(177),
                ImageKind::Banner,
                &upstream_image_paths(),
            )
            .await;

        match reply {
            ImageReply::Bytes { image, max_age_secs } => {
                assert_eq!(image.bytes.as_ref(), &[7, 7]);
                assert_eq!(max_age_secs, IMAGE_MAX_AGE_SECS);
            }
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn thumbnail_uses_the_dedicated_thumbnail_filename() {
        let mut config = config();
        // Sample short-circuit keeps the event lookup off the network.
        config.use_sample_data = true;
        let f = fixture(
            config,
            MockFetcher::new().on("/images/innovation-week-tz-2025_thumb.jpg", MockReply::jpeg(&[3])),
        );

        let reply = f
            .images
            .handle_image_request(
                &f.events,
                &EventId::from(177),
                ImageKind::Thumbnail,
                &upstream_image_paths(),
            )
            .await;

        assert!(matches!(reply, ImageReply::Bytes { .. }));
        // The sample record's thumbnail already ends in _thumb, so the
        // derived name is unchanged.
        let urls = f.mock.call_urls();
        assert!(urls
            .iter()
            .any(|u| u.ends_with("/images/innovation-week-tz-2025_thumb.jpg")));
    }

    #[tokio::test]
    async fn thumbnail_derives_filename_when_only_the_banner_is_set() {
        let event_json = serde_json::json!({"id": 500, "name": "Banner Only", "bannerImage": "hero.jpg"});
        let f = fixture(
            config(),
            MockFetcher::new()
                .on("api/events/500", MockReply::Json(event_json))
                .on("/images/hero_thumb.jpg", MockReply::jpeg(&[4])),
        );

        let reply = f
            .images
            .handle_image_request(
                &f.events,
                &EventId::from(500),
                ImageKind::Thumbnail,
                &upstream_image_paths(),
            )
            .await;

        assert!(matches!(reply, ImageReply::Bytes { .. }));
        assert!(f
            .mock
            .call_urls()
            .iter()
            .any(|u| u.ends_with("/images/hero_thumb.jpg")));
    }

    #[tokio::test]
    async fn absolute_filename_url_is_fetched_as_is() {
        let absolute = "https://cdn.example.net/banners/full.jpg";
        let event_json = serde_json::json!({"id": 800, "name": "CDN Event", "bannerImage": absolute});
        let f = fixture(
            config(),
            MockFetcher::new()
                .on("api/events/800", MockReply::Json(event_json))
                .on("cdn.example.net", MockReply::jpeg(&[5])),
        );

        let reply = f
            .images
            .handle_image_request(
                &f.events,
                &EventId::from(800),
                ImageKind::Banner,
                &upstream_image_paths(),
            )
            .await;

        assert!(matches!(reply, ImageReply::Bytes { .. }));
        assert!(f.mock.call_urls().iter().any(|u| u == absolute));
    }

    #[tokio::test]
    async fn third_of_four_candidates_wins_in_order() {
        let f = fixture(
            config(),
            MockFetcher::new().on("/c3/", MockReply::jpeg(&[3])),
        );
        let candidates: Vec<String> = (1..=4)
            .map(|i| format!("https://up.example.com/c{i}/banner.jpg"))
            .collect();

        let image = f.images.resolve_for_filename(&candidates).await.unwrap();
        assert_eq!(image.bytes.as_ref(), &[3]);

        let urls = f.mock.call_urls();
        assert_eq!(urls.len(), 3, "fourth candidate must never be fetched");
        assert!(urls[0].contains("/c1/"));
        assert!(urls[1].contains("/c2/"));
        assert!(urls[2].contains("/c3/"));
    }

    #[tokio::test]
    async fn exhausted_candidates_surface_a_typed_error() {
        let f = fixture(config(), MockFetcher::new());
        let candidates = vec![
            "https://up.example.com/a.jpg".to_string(),
            "https://up.example.com/b.jpg".to_string(),
        ];
        let err = f.images.resolve_for_filename(&candidates).await.unwrap_err();
        assert!(matches!(err, ResolveError::Exhausted { ref failures, .. } if failures.len() == 2));
    }

    #[tokio::test]
    async fn worst_case_still_replies_with_degraded_redirect() {
        // Everything down: no direct endpoints, no event data, no candidates.
        let f = fixture(config(), MockFetcher::new());

        let reply = f
            .images
            .handle_image_request(
                &f.events,
                &EventId::from(999_999),
                ImageKind::Thumbnail,
                &upstream_image_paths(),
            )
            .await;

        match reply {
            ImageReply::Redirect { location, max_age_secs } => {
                assert_eq!(location, "/static/event-placeholder.png");
                assert_eq!(max_age_secs, DEGRADED_MAX_AGE_SECS);
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn event_without_any_filename_degrades_with_short_cache() {
        let event_json = serde_json::json!({"id": 300, "name": "No Banner"});
        let f = fixture(
            config(),
            MockFetcher::new().on("api/events/300", MockReply::Json(event_json)),
        );

        let reply = f
            .images
            .handle_image_request(
                &f.events,
                &EventId::from(300),
                ImageKind::Banner,
                &upstream_image_paths(),
            )
            .await;

        assert!(matches!(
            reply,
            ImageReply::Redirect { max_age_secs: DEGRADED_MAX_AGE_SECS, .. }
        ));
    }
}
