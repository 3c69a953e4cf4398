//! Single-consumption request bodies.
//!
//! A [`RequestBody`] is either a buffered chunk of bytes or a live stream
//! handed over by the transport. Either way it can be taken exactly once:
//! [`RequestBody::take_reader`] moves the source out into a [`BodyReader`]
//! and leaves the body marked as consumed. Dropping the reader releases the
//! underlying stream, so every exit path of a caller closes it.
//!
//! ```rust
//! use formgate_core::body::RequestBody;
//!
//! let mut body = RequestBody::from_static(b"{\"name\":\"a\"}");
//! let bytes = body.take_reader().unwrap().read_limited(1024).unwrap();
//! assert_eq!(&bytes[..], b"{\"name\":\"a\"}");
//!
//! // A second take sees the body as consumed
//! assert!(body.take_reader().is_none());
//! ```

use crate::Error;
use bytes::Bytes;
use std::fmt;
use std::io::{Cursor, Read};

// Re-export Bytes for convenience
pub use bytes;

type BoxedStream = Box<dyn Read + Send>;

enum Source {
    Buffered(Bytes),
    Stream(BoxedStream),
    Consumed,
}

/// A request body that can be read at most once.
pub struct RequestBody {
    source: Source,
}

impl RequestBody {
    /// Create an empty request body.
    #[inline]
    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    /// Create from `Bytes` (zero-copy).
    #[inline]
    pub fn from_bytes(bytes: Bytes) -> Self {
        Self {
            source: Source::Buffered(bytes),
        }
    }

    /// Create from a byte slice (copies data).
    #[inline]
    pub fn from_slice(slice: &[u8]) -> Self {
        Self::from_bytes(Bytes::copy_from_slice(slice))
    }

    /// Create from a `Vec<u8>` (zero-copy conversion).
    #[inline]
    pub fn from_vec(vec: Vec<u8>) -> Self {
        Self::from_bytes(Bytes::from(vec))
    }

    /// Create from a static byte array (zero-copy).
    #[inline]
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Self::from_bytes(Bytes::from_static(bytes))
    }

    /// Wrap a live stream supplied by the transport.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            source: Source::Stream(Box::new(reader)),
        }
    }

    /// Whether the body has already been handed out.
    #[inline]
    pub fn is_consumed(&self) -> bool {
        matches!(self.source, Source::Consumed)
    }

    /// Take the body source, leaving this body consumed.
    ///
    /// Returns `None` if the body was taken before.
    pub fn take_reader(&mut self) -> Option<BodyReader> {
        let stream: BoxedStream = match std::mem::replace(&mut self.source, Source::Consumed) {
            Source::Buffered(bytes) => Box::new(Cursor::new(bytes)),
            Source::Stream(stream) => stream,
            Source::Consumed => return None,
        };

        Some(BodyReader {
            inner: Some(stream),
        })
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Buffered(bytes) => f
                .debug_struct("RequestBody")
                .field("buffered", &bytes.len())
                .finish(),
            Source::Stream(_) => f.debug_struct("RequestBody").field("stream", &true).finish(),
            Source::Consumed => f
                .debug_struct("RequestBody")
                .field("consumed", &true)
                .finish(),
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(vec: Vec<u8>) -> Self {
        Self::from_vec(vec)
    }
}

impl From<&'static str> for RequestBody {
    fn from(s: &'static str) -> Self {
        Self::from_static(s.as_bytes())
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        Self::from_vec(s.into_bytes())
    }
}

/// Scoped owner of a taken body stream.
///
/// The stream is released when the reader is dropped or [`close`d](Self::close).
pub struct BodyReader {
    inner: Option<BoxedStream>,
}

impl BodyReader {
    /// Read the whole stream into memory, failing once more than `limit`
    /// bytes arrive.
    pub fn read_limited(&mut self, limit: usize) -> Result<Bytes, Error> {
        let stream = self.inner.as_mut().ok_or(Error::BodyConsumed)?;

        let mut buf = Vec::new();
        stream
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut buf)?;

        if buf.len() > limit {
            return Err(Error::PayloadTooLarge(format!(
                "request body exceeds {} bytes",
                limit
            )));
        }

        Ok(Bytes::from(buf))
    }

    /// Release the stream now instead of at end of scope.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(stream) = self.inner.take() {
            drop(stream);
            tracing::trace!("request body released");
        }
    }
}

impl Drop for BodyReader {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Tracked {
        data: Cursor<Vec<u8>>,
        dropped: Arc<AtomicBool>,
    }

    impl Read for Tracked {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.data.read(buf)
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    fn tracked(data: &[u8]) -> (RequestBody, Arc<AtomicBool>) {
        let dropped = Arc::new(AtomicBool::new(false));
        let body = RequestBody::from_reader(Tracked {
            data: Cursor::new(data.to_vec()),
            dropped: dropped.clone(),
        });
        (body, dropped)
    }

    #[test]
    fn test_buffered_read() {
        let mut body = RequestBody::from_vec(b"hello".to_vec());
        let mut reader = body.take_reader().unwrap();
        assert_eq!(&reader.read_limited(16).unwrap()[..], b"hello");
    }

    #[test]
    fn test_take_once() {
        let mut body = RequestBody::from("data");
        assert!(!body.is_consumed());
        assert!(body.take_reader().is_some());
        assert!(body.is_consumed());
        assert!(body.take_reader().is_none());
    }

    #[test]
    fn test_limit_exact_fits() {
        let mut body = RequestBody::from_static(b"12345");
        let bytes = body.take_reader().unwrap().read_limited(5).unwrap();
        assert_eq!(bytes.len(), 5);
    }

    #[test]
    fn test_limit_exceeded() {
        let mut body = RequestBody::from_static(b"123456");
        let err = body.take_reader().unwrap().read_limited(5).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge(_)));
    }

    #[test]
    fn test_stream_released_on_drop() {
        let (mut body, dropped) = tracked(b"{}");
        {
            let mut reader = body.take_reader().unwrap();
            reader.read_limited(64).unwrap();
            assert!(!dropped.load(Ordering::SeqCst));
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_stream_released_on_close() {
        let (mut body, dropped) = tracked(b"{}");
        let reader = body.take_reader().unwrap();
        reader.close();
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_read_after_close_is_consumed() {
        let mut reader = RequestBody::from_static(b"x").take_reader().unwrap();
        reader.release();
        assert!(matches!(reader.read_limited(8), Err(Error::BodyConsumed)));
    }

    #[test]
    fn test_debug_does_not_dump_bytes() {
        let body = RequestBody::from_static(b"secret");
        assert_eq!(format!("{:?}", body), "RequestBody { buffered: 6 }");
    }
}
