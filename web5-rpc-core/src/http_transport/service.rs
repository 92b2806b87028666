//! # HTTP-call Capability
//!
//! The HTTP transport clients never talk to the network directly. They build an
//! `http::Request` and hand it to an [`HttpService`], which returns the response head and a
//! lazily-consumed [`DataStream`] body.
//!
//! `reqwest::Client` implements [`HttpService`] and is the default. Tests and embedders can
//! plug in anything else (an in-process server, a recording fake, ...).
use crate::BoxError;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt, TryStreamExt};
use std::{
    fmt::Debug,
    pin::Pin,
    task::{Context, Poll},
};

/// Performs a single HTTP round trip.
#[async_trait]
pub trait HttpService: Send + Sync {
    async fn call(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<DataStream>, BoxError>;
}

#[async_trait]
impl HttpService for reqwest::Client {
    async fn call(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<DataStream>, BoxError> {
        let request = reqwest::Request::try_from(request)?;
        let response = self.execute(request).await?;

        let mut builder = http::Response::builder()
            .status(response.status())
            .version(response.version());

        if let Some(headers) = builder.headers_mut() {
            *headers = response.headers().clone();
        }

        Ok(builder.body(DataStream::new(response.bytes_stream()))?)
    }
}

/// A lazily-consumed stream of bytes.
///
/// Nothing is read from the underlying source until the stream is polled, so large payloads
/// are never buffered unless the consumer asks for it with [`DataStream::into_bytes`].
pub struct DataStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>,
}

impl DataStream {
    /// Wraps any stream of byte chunks.
    pub fn new<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            inner: Box::pin(stream.map_err(|e| -> BoxError { e.into() })),
        }
    }

    /// A stream yielding the given chunks in order.
    pub fn from_chunks(chunks: Vec<Bytes>) -> Self {
        Self::new(tokio_stream::iter(chunks.into_iter().map(Ok::<_, BoxError>)))
    }

    /// A stream yielding nothing.
    pub fn empty() -> Self {
        Self::from_chunks(Vec::new())
    }

    /// Drains the stream into a single buffer.
    pub async fn into_bytes(mut self) -> Result<Bytes, BoxError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.inner.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl Stream for DataStream {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Debug for DataStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStream").finish_non_exhaustive()
    }
}

impl From<Bytes> for DataStream {
    fn from(bytes: Bytes) -> Self {
        Self::from_chunks(vec![bytes])
    }
}

impl From<Vec<u8>> for DataStream {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

impl From<&'static str> for DataStream {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

impl From<String> for DataStream {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_into_bytes_concatenates_chunks() {
        let stream = DataStream::from_chunks(vec![
            Bytes::from_static(b"hello"),
            Bytes::from_static(b", "),
            Bytes::from_static(b"world"),
        ]);

        assert_eq!(stream.into_bytes().await.unwrap(), "hello, world");
    }

    #[tokio::test]
    async fn test_stream_yields_chunks_in_order() {
        let stream = DataStream::from_chunks(vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);

        let chunks: Vec<Bytes> = stream.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]);
    }

    #[tokio::test]
    async fn test_error_chunk_stops_draining() {
        let stream = DataStream::new(tokio_stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("connection reset")),
        ]));

        let err = stream.into_bytes().await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");
    }

    #[tokio::test]
    async fn test_empty_stream() {
        assert!(DataStream::empty().into_bytes().await.unwrap().is_empty());
    }
}
