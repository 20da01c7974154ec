//! Offset-based pagination over list endpoints.
//!
//! [`paginate`] drives a page-fetch function and feeds each element to a
//! handler. Only one page is held at a time and the fetch function is the
//! only place that does I/O.

use crate::error::ConnectorResult;
use log::trace;

/// How a search walks the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Read every page, starting at the backend's first offset.
    FullScan,
    /// Read exactly one page. The offset is the caller's 1-based position.
    Explicit { offset: usize },
}

impl PageMode {
    /// Pick the mode from the caller's page offset; 0 means all data.
    pub fn from_offset(offset: usize) -> Self {
        if offset < 1 {
            Self::FullScan
        } else {
            Self::Explicit { offset }
        }
    }
}

/// Page walk parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub mode: PageMode,
    pub page_size: usize,
    /// First offset of the backend, 0 or 1 depending on the API.
    pub start_offset: usize,
}

impl PageRequest {
    pub fn new(page_size: usize, page_offset: usize) -> Self {
        Self {
            mode: PageMode::from_offset(page_offset),
            page_size,
            start_offset: 0,
        }
    }

    pub fn with_start_offset(mut self, start_offset: usize) -> Self {
        self.start_offset = start_offset;
        self
    }
}

/// Walk pages and hand each element to `handler`.
///
/// `fetch(start, size)` returns one page. `handler` returns `false` to stop
/// early. In full-scan mode the result is the number of elements handled,
/// including the one that stopped the scan; an empty page or a page shorter
/// than `page_size` ends the scan. In explicit mode a single page at
/// `offset - 1` is read and the result is the size of that page.
pub async fn paginate<T, F, H>(
    request: PageRequest,
    mut fetch: F,
    mut handler: H,
) -> ConnectorResult<usize>
where
    F: AsyncFnMut(usize, usize) -> ConnectorResult<Vec<T>>,
    H: AsyncFnMut(T) -> ConnectorResult<bool>,
{
    let size = request.page_size.max(1);

    match request.mode {
        PageMode::FullScan => {
            let mut start = request.start_offset;
            let mut count = 0;
            loop {
                let page = fetch(start, size).await?;
                trace!("Fetched page at {} with {} elements", start, page.len());
                if page.is_empty() {
                    return Ok(count);
                }
                let len = page.len();
                for item in page {
                    count += 1;
                    if !handler(item).await? {
                        return Ok(count);
                    }
                }
                if len < size {
                    return Ok(count);
                }
                start += size;
            }
        }
        PageMode::Explicit { offset } => {
            let start = offset - 1;
            let page = fetch(start, size).await?;
            let len = page.len();
            trace!("Fetched page at {} with {} elements", start, len);
            for item in page {
                if !handler(item).await? {
                    break;
                }
            }
            Ok(len)
        }
    }
}
