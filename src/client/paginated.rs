//! Paged stream for lazy iteration over list endpoints.
//!
//! This module provides a [`PagedStream`] that implements the `Stream` trait,
//! fetching pages on demand and yielding individual items so callers never
//! hold more than one page in memory.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::de::DeserializeOwned;

use super::ClientInner;
use crate::Result;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: i32 = 200;

/// Type alias for a boxed future used internally.
type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// How the cursor advances between page fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageStyle {
    /// Item-offset cursor: starts at 0, advances by the page size.
    Position,
    /// Sequential page numbers: starts at 1, advances by one.
    PageNumber,
}

impl PageStyle {
    fn initial_cursor(self) -> i32 {
        match self {
            PageStyle::Position => 0,
            PageStyle::PageNumber => 1,
        }
    }

    fn advance(self, cursor: i32, page_size: i32) -> i32 {
        match self {
            PageStyle::Position => cursor + page_size,
            PageStyle::PageNumber => cursor + 1,
        }
    }
}

/// A stream that lazily fetches pages from a list endpoint.
///
/// The stream yields individual items from each page, automatically fetching
/// the next page when the current one is exhausted. A page shorter than the
/// requested size marks the end of the collection, so the stream terminates
/// naturally without a count from the server. Dropping the stream cancels
/// any in-flight page fetch.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
///
/// # async fn example(client: certforge_rs::CertforgeClient) -> certforge_rs::Result<()> {
/// // Stream all certificates lazily
/// let mut stream = client.certificates().list_stream(None);
///
/// while let Some(result) = stream.next().await {
///     let certificate = result?;
///     println!("{:?}", certificate);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PagedStream<T> {
    /// Function to fetch a page by cursor value.
    fetch_page: Box<dyn Fn(i32) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>,
    /// Items from the most recent page, yielded front to back.
    buffered: VecDeque<T>,
    /// Requested page size, also the termination threshold.
    page_size: i32,
    /// Cursor style for this endpoint.
    style: PageStyle,
    /// Next cursor value to fetch, None once exhausted.
    next: Option<i32>,
    /// Current in-flight fetch future.
    pending: Option<BoxFuture<'static, Result<Vec<T>>>>,
}

impl<T> PagedStream<T> {
    pub(crate) fn with_style<F>(style: PageStyle, page_size: i32, fetch_page: F) -> Self
    where
        F: Fn(i32) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync + 'static,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            buffered: VecDeque::new(),
            page_size: page_size.max(1),
            style,
            next: Some(style.initial_cursor()),
            pending: None,
        }
    }

    /// Create a stream over an endpoint whose cursor is an item offset.
    ///
    /// `fetch_page` is called with the offset of the first item to return
    /// (0, then `page_size`, then `2 * page_size`, and so on).
    pub fn by_position<F>(page_size: i32, fetch_page: F) -> Self
    where
        F: Fn(i32) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync + 'static,
    {
        Self::with_style(PageStyle::Position, page_size, fetch_page)
    }

    /// Create a stream over an endpoint addressed by sequential page numbers.
    ///
    /// `fetch_page` is called with the page number, starting at 1.
    pub fn by_page<F>(page_size: i32, fetch_page: F) -> Self
    where
        F: Fn(i32) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync + 'static,
    {
        Self::with_style(PageStyle::PageNumber, page_size, fetch_page)
    }
}

impl<T> Stream for PagedStream<T>
where
    T: Unpin,
{
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            // Yield buffered items from the most recent page first
            if let Some(item) = this.buffered.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            // Buffer drained, drive the in-flight fetch if there is one
            if let Some(fut) = this.pending.as_mut() {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(batch)) => {
                        this.pending = None;

                        // A short or empty batch is the server's last page
                        if (batch.len() as i32) < this.page_size {
                            this.next = None;
                        } else {
                            let (style, page_size) = (this.style, this.page_size);
                            this.next = this.next.map(|cursor| style.advance(cursor, page_size));
                        }

                        this.buffered.extend(batch);
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending = None;
                        this.next = None; // Stop on error
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => {
                        return Poll::Pending;
                    }
                }
            }

            // No pending fetch, start one if the cursor has anywhere to go
            if let Some(cursor) = this.next {
                this.pending = Some((this.fetch_page)(cursor));
                continue;
            }

            // No more pages to fetch
            return Poll::Ready(None);
        }
    }
}

impl<T> Unpin for PagedStream<T> {}

/// Builder for creating paged streams with query parameters.
pub(crate) struct PagedStreamBuilder<T> {
    inner: Arc<ClientInner>,
    path: String,
    page_size: i32,
    style: PageStyle,
    _marker: std::marker::PhantomData<T>,
}

impl<T: DeserializeOwned + Unpin + Send + 'static> PagedStreamBuilder<T> {
    /// Create a new builder, defaulting to position-based pagination.
    pub(crate) fn new(inner: Arc<ClientInner>, path: impl Into<String>) -> Self {
        Self {
            inner,
            path: path.into(),
            page_size: DEFAULT_PAGE_SIZE,
            style: PageStyle::Position,
            _marker: std::marker::PhantomData,
        }
    }

    /// Set the number of items requested per page.
    pub fn page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Address pages by sequential page number instead of item offset.
    pub fn page_numbered(mut self) -> Self {
        self.style = PageStyle::PageNumber;
        self
    }

    /// Build the stream with optional additional query parameters.
    pub fn build_with_query<Q>(self, query: Option<Q>) -> PagedStream<T>
    where
        Q: serde::Serialize + Clone + Send + Sync + 'static,
    {
        let inner = self.inner;
        let path = self.path;
        let page_size = self.page_size.max(1);
        let style = self.style;

        PagedStream::with_style(style, page_size, move |cursor: i32| {
            let inner = inner.clone();
            let path = path.clone();
            let query = query.clone();

            Box::pin(async move {
                #[derive(serde::Serialize)]
                struct PageQuery<Q> {
                    size: i32,
                    #[serde(skip_serializing_if = "Option::is_none")]
                    position: Option<i32>,
                    #[serde(skip_serializing_if = "Option::is_none")]
                    page: Option<i32>,
                    #[serde(flatten)]
                    extra: Option<Q>,
                }

                let page_query = PageQuery {
                    size: page_size,
                    position: (style == PageStyle::Position).then_some(cursor),
                    page: (style == PageStyle::PageNumber).then_some(cursor),
                    extra: query,
                };

                inner.get_with_query::<Vec<T>, _>(&path, &page_query).await
            })
        })
    }
}
