use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use super::{caption_title, shortcode, LABEL_IMAGE, LABEL_VIDEO};
use crate::{
    common::request::RequestClient,
    extractors::{ExtractedMedia, ExtractionError, MediaLink, Strategy, QUALITY_ORIGINAL},
};

const ASBD_ID: &str = "129477";

/// Queries Instagram's GraphQL query endpoint with each known query hash.
#[derive(Debug, Clone)]
pub struct InstagramApi {
    client: RequestClient,
    base_url: Url,
    app_id: String,
    query_hashes: Vec<String>,
}
impl InstagramApi {
    #[must_use]
    pub const fn new(
        client: RequestClient,
        base_url: Url,
        app_id: String,
        query_hashes: Vec<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            app_id,
            query_hashes,
        }
    }

    fn query_url(&self, query_hash: &str, shortcode: &str) -> Result<Url, ExtractionError> {
        let variables = serde_json::json!({
            "shortcode": shortcode,
            "child_comment_count": 3,
            "fetch_comment_count": 40,
            "parent_comment_count": 24,
            "has_threaded_comments": true,
        });

        let query = {
            let mut q = form_urlencoded::Serializer::new(String::new());

            q.append_pair("query_hash", query_hash);
            q.append_pair("variables", &variables.to_string());

            q.finish()
        };

        let mut url = self
            .base_url
            .join("/graphql/query/")
            .map_err(|e| ExtractionError::Other(format!("Invalid Instagram base URL: {e}")))?;
        url.set_query(Some(&query));

        Ok(url)
    }

    async fn query(&self, query_hash: &str, shortcode: &str) -> Result<ShortcodeMedia, ExtractionError> {
        let url = self.query_url(query_hash, shortcode)?;
        trace!(%url, "Querying Instagram API");

        let resp = self
            .client
            .get(url)
            .header("X-IG-App-ID", self.app_id.as_str())
            .header("X-ASBD-ID", ASBD_ID)
            .header("X-IG-WWW-Claim", "0")
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(ExtractionError::UnexpectedResponse(format!(
                "status {}",
                resp.status()
            )));
        }

        resp.json::<ApiResponse>()
            .await?
            .data
            .and_then(|x| x.shortcode_media)
            .ok_or_else(|| ExtractionError::UnexpectedResponse("no shortcode_media".to_string()))
    }
}

#[async_trait::async_trait]
impl Strategy for InstagramApi {
    fn name(&self) -> &'static str {
        "instagram_api"
    }

    fn description(&self) -> &'static str {
        "Read post media from Instagram's GraphQL endpoint"
    }

    async fn attempt(&self, url: &Url) -> Result<ExtractedMedia, ExtractionError> {
        let shortcode = shortcode(url.as_str())?;
        debug!(shortcode, "Instagram post shortcode");

        let mut answered_without_media = false;

        for query_hash in &self.query_hashes {
            let media = match self.query(query_hash, shortcode).await {
                Ok(media) => media,
                Err(e) => {
                    debug!(query_hash, "Instagram API query rejected: {e}");
                    continue;
                }
            };

            let links = media.links();
            if links.is_empty() {
                debug!(query_hash, "Instagram API answered without usable media");
                answered_without_media = true;
                continue;
            }

            return ExtractedMedia::new(self.name(), caption_title(media.caption()), links)
                .map(|x| x.with_thumbnail(media.thumbnail_src.as_deref()));
        }

        if answered_without_media {
            return Err(ExtractionError::NoMedia);
        }

        Err(ExtractionError::UnexpectedResponse(
            "every query hash was rejected".to_string(),
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Option<ApiData>,
}

#[derive(Debug, Deserialize)]
struct ApiData {
    #[serde(default)]
    shortcode_media: Option<ShortcodeMedia>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Edges<T> {
    #[serde(default)]
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct CaptionNode {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ShortcodeMedia {
    #[serde(default)]
    is_video: bool,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(default)]
    display_url: Option<String>,
    #[serde(default)]
    thumbnail_src: Option<String>,
    #[serde(default)]
    edge_media_to_caption: Option<Edges<CaptionNode>>,
    /// Carousel posts carry one node per slide
    #[serde(default)]
    edge_sidecar_to_children: Option<Edges<ShortcodeMedia>>,
}
impl ShortcodeMedia {
    fn caption(&self) -> Option<&str> {
        self.edge_media_to_caption
            .as_ref()
            .and_then(|x| x.edges.first())
            .and_then(|x| x.node.text.as_deref())
    }

    fn link(&self) -> Option<MediaLink> {
        let video = self
            .video_url
            .as_deref()
            .filter(|_| self.is_video)
            .and_then(|x| MediaLink::parse(LABEL_VIDEO, x, QUALITY_ORIGINAL).ok());

        video.or_else(|| {
            self.display_url
                .as_deref()
                .and_then(|x| MediaLink::parse(LABEL_IMAGE, x, QUALITY_ORIGINAL).ok())
        })
    }

    fn links(&self) -> Vec<MediaLink> {
        let children = self
            .edge_sidecar_to_children
            .iter()
            .flat_map(|x| &x.edges)
            .filter_map(|x| x.node.link())
            .collect::<Vec<_>>();

        if children.is_empty() {
            self.link().into_iter().collect()
        } else {
            children
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::common::request::Client;

    fn strategy(server: &MockServer, hashes: &[&str]) -> InstagramApi {
        InstagramApi::new(
            Client::base(Duration::from_secs(5)).expect("client"),
            Url::parse(&server.uri()).expect("valid uri"),
            "936619743392459".to_string(),
            hashes.iter().map(ToString::to_string).collect(),
        )
    }

    fn post_url() -> Url {
        Url::parse("https://www.instagram.com/p/ABC123/").expect("valid url")
    }

    #[tokio::test]
    async fn falls_through_rejected_hashes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/graphql/query/"))
            .and(query_param("query_hash", "stale"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/graphql/query/"))
            .and(query_param("query_hash", "fresh"))
            .and(header("X-IG-App-ID", "936619743392459"))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"shortcode_media": {
                    "is_video": true,
                    "video_url": "https://cdn.example.com/clip.mp4",
                    "display_url": "https://cdn.example.com/cover.jpg",
                    "edge_media_to_caption": {"edges": [{"node": {"text": "Hello there"}}]}
                }}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let media = strategy(&server, &["stale", "fresh"])
            .attempt(&post_url())
            .await
            .expect("second hash succeeds");

        assert_eq!(media.source(), "instagram_api");
        assert_eq!(media.title(), "Hello there");
        assert_eq!(media.links().len(), 1);
        assert_eq!(media.links()[0].label, LABEL_VIDEO);
        assert_eq!(media.links()[0].url.path(), "/clip.mp4");
    }

    #[tokio::test]
    async fn image_post_uses_display_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/graphql/query/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"shortcode_media": {
                    "is_video": false,
                    "display_url": "https://cdn.example.com/photo.jpg"
                }}
            })))
            .mount(&server)
            .await;

        let media = strategy(&server, &["hash"])
            .attempt(&post_url())
            .await
            .expect("image post");

        assert_eq!(media.title(), super::super::DEFAULT_TITLE);
        assert_eq!(media.links()[0].label, LABEL_IMAGE);
        assert_eq!(media.links()[0].quality, QUALITY_ORIGINAL);
    }

    #[tokio::test]
    async fn carousel_lists_every_slide() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/graphql/query/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"shortcode_media": {
                    "display_url": "https://cdn.example.com/first.jpg",
                    "edge_sidecar_to_children": {"edges": [
                        {"node": {"display_url": "https://cdn.example.com/1.jpg"}},
                        {"node": {"is_video": true, "video_url": "https://cdn.example.com/2.mp4"}}
                    ]}
                }}
            })))
            .mount(&server)
            .await;

        let media = strategy(&server, &["hash"])
            .attempt(&post_url())
            .await
            .expect("carousel post");

        let labels = media.links().iter().map(|x| x.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, [LABEL_IMAGE, LABEL_VIDEO]);
    }

    #[tokio::test]
    async fn every_hash_rejected_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
            .expect(2)
            .mount(&server)
            .await;

        let res = strategy(&server, &["a", "b"]).attempt(&post_url()).await;

        assert!(matches!(res, Err(ExtractionError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn hash_without_usable_media_falls_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/graphql/query/"))
            .and(query_param("query_hash", "empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"shortcode_media": {"is_video": true}}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/graphql/query/"))
            .and(query_param("query_hash", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"shortcode_media": {"display_url": "https://cdn.example.com/photo.jpg"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let media = strategy(&server, &["empty", "full"])
            .attempt(&post_url())
            .await
            .expect("second hash has media");

        assert_eq!(media.links()[0].url.path(), "/photo.jpg");
    }

    #[tokio::test]
    async fn answers_without_media_are_no_media() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"shortcode_media": {"display_url": "not a url"}}
            })))
            .mount(&server)
            .await;

        let res = strategy(&server, &["a", "b"]).attempt(&post_url()).await;

        assert!(matches!(res, Err(ExtractionError::NoMedia)));
    }

    #[test]
    fn edges_field_is_optional() {
        let media: ShortcodeMedia = serde_json::from_value(serde_json::json!({
            "display_url": "https://cdn.example.com/photo.jpg",
            "edge_media_to_caption": {},
            "edge_sidecar_to_children": {}
        }))
        .expect("valid payload");

        assert!(media.caption().is_none());
        assert_eq!(media.links().len(), 1);
        assert_eq!(media.links()[0].label, LABEL_IMAGE);
    }

    #[tokio::test]
    async fn url_without_shortcode_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let url = Url::parse("https://www.instagram.com/someuser/").expect("valid url");
        let res = strategy(&server, &["a"]).attempt(&url).await;

        assert!(matches!(res, Err(ExtractionError::MissingShortcode)));
    }
}
