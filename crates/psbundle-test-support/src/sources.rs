//! Byte sources that misbehave on purpose.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Reader that yields a prefix, then fails every subsequent read.
#[derive(Debug)]
pub struct FailingReader {
    prefix: Vec<u8>,
    offset: usize,
    kind: io::ErrorKind,
    failures: usize,
}

impl FailingReader {
    /// Yield `prefix`, then fail with an `Other` error.
    #[must_use]
    pub fn after(prefix: impl Into<Vec<u8>>) -> Self {
        Self::with_kind(prefix, io::ErrorKind::Other)
    }

    /// Yield `prefix`, then fail with the given error kind.
    #[must_use]
    pub fn with_kind(prefix: impl Into<Vec<u8>>, kind: io::ErrorKind) -> Self {
        Self {
            prefix: prefix.into(),
            offset: 0,
            kind,
            failures: 0,
        }
    }

    /// Number of prefix bytes handed out so far.
    #[must_use]
    pub const fn bytes_served(&self) -> usize {
        self.offset
    }

    /// Number of failed reads observed so far.
    #[must_use]
    pub const fn failures(&self) -> usize {
        self.failures
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if let Some(remaining) = this.prefix.get(this.offset..)
            && !remaining.is_empty()
        {
            let take = remaining.len().min(buf.remaining());
            buf.put_slice(&remaining[..take]);
            this.offset += take;
            return Poll::Ready(Ok(()));
        }

        this.failures += 1;
        Poll::Ready(Err(io::Error::new(this.kind, "source failed mid-read")))
    }
}
