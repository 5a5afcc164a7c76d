//! The streamed PNG response handed back to the HTTP glue.

use tokio::sync::mpsc;

use crate::options::{Mode, ResponseInit};

/// `content-type` for every successful render.
const CONTENT_TYPE_PNG: &str = "image/png";

/// Cache policy in development: never cache.
const CACHE_CONTROL_DEV: &str = "no-cache, no-store";

/// Cache policy in production: rendered images are immutable for a year.
const CACHE_CONTROL_PROD: &str = "public, immutable, no-transform, max-age=31536000";

/// A streamed response body.
///
/// Today the pipeline emits the whole PNG as a single chunk and closes the
/// stream; consumers must still drain until `None` rather than assume one
/// chunk.
pub struct ByteStream {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ByteStream {
    /// A body carrying one chunk followed by end-of-stream.
    pub(crate) fn single(chunk: Vec<u8>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // A fresh bounded(1) channel always accepts its first chunk.
        let _ = tx.try_send(chunk);
        Self { rx }
    }

    /// Next body chunk, or `None` once the stream is closed.
    pub async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }

    /// Drain the stream into one buffer.
    pub async fn into_bytes(mut self) -> Vec<u8> {
        let mut bytes = Vec::new();
        while let Some(chunk) = self.next_chunk().await {
            bytes.extend_from_slice(&chunk);
        }
        bytes
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream").finish_non_exhaustive()
    }
}

/// An HTTP image response: status, headers, and a streamed PNG body.
#[derive(Debug)]
pub struct ImageResponse {
    /// Response status code.
    pub status: u16,
    /// Optional status text.
    pub status_text: Option<String>,
    /// Response headers in emission order.
    pub headers: Vec<(String, String)>,
    /// The PNG body.
    pub body: ByteStream,
}

impl ImageResponse {
    /// Build the response for a finished render.
    pub(crate) fn png(png: Vec<u8>, mode: Mode, init: &ResponseInit) -> Self {
        Self {
            status: init.status.unwrap_or(200),
            status_text: init.status_text.clone(),
            headers: merged_headers(mode, init),
            body: ByteStream::single(png),
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Pipeline default headers with the caller's overrides merged in.
fn merged_headers(mode: Mode, init: &ResponseInit) -> Vec<(String, String)> {
    let cache_control = match mode {
        Mode::Development => CACHE_CONTROL_DEV,
        Mode::Production => CACHE_CONTROL_PROD,
    };
    let mut headers = vec![
        ("content-type".to_string(), CONTENT_TYPE_PNG.to_string()),
        ("cache-control".to_string(), cache_control.to_string()),
    ];

    for (name, value) in &init.headers {
        match headers
            .iter_mut()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.clone(),
            None => headers.push((name.clone(), value.clone())),
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn body_yields_one_chunk_then_closes() {
        let mut body = ByteStream::single(vec![1, 2, 3]);
        assert_eq!(body.next_chunk().await, Some(vec![1, 2, 3]));
        assert_eq!(body.next_chunk().await, None);
    }

    #[tokio::test]
    async fn into_bytes_collects_the_body() {
        let body = ByteStream::single(b"png".to_vec());
        assert_eq!(body.into_bytes().await, b"png");
    }

    #[test]
    fn development_mode_disables_caching() {
        let headers = merged_headers(Mode::Development, &ResponseInit::default());
        assert!(headers.contains(&("cache-control".into(), "no-cache, no-store".into())));
    }

    #[test]
    fn production_mode_caches_immutably() {
        let headers = merged_headers(Mode::Production, &ResponseInit::default());
        assert!(headers.contains(&(
            "cache-control".into(),
            "public, immutable, no-transform, max-age=31536000".into()
        )));
    }

    #[test]
    fn caller_headers_replace_defaults_case_insensitively() {
        let init = ResponseInit {
            headers: vec![
                ("Cache-Control".into(), "private".into()),
                ("x-card".into(), "1".into()),
            ],
            ..ResponseInit::default()
        };
        let headers = merged_headers(Mode::Production, &init);

        let cache: Vec<_> = headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("cache-control"))
            .collect();
        assert_eq!(cache.len(), 1, "override must replace, not duplicate");
        assert_eq!(cache[0].1, "private");
        assert!(headers.contains(&("x-card".into(), "1".into())));
    }

    #[test]
    fn caller_status_overrides_default() {
        let init = ResponseInit {
            status: Some(201),
            status_text: Some("Created".into()),
            ..ResponseInit::default()
        };
        let response = ImageResponse::png(Vec::new(), Mode::Production, &init);
        assert_eq!(response.status, 201);
        assert_eq!(response.status_text.as_deref(), Some("Created"));
    }
}
