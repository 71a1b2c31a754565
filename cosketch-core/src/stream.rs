//! Async adapter over a fragment stream.
//!
//! The extractor itself is synchronous; this wraps it for callers whose
//! transport hands them a [`Stream`] of text deltas (an SSE body, a model
//! SDK's delta stream). Cancellation is the transport's concern: dropping
//! the returned stream drops the extractor with it, and no resources leak
//! because it holds none.

use futures::Stream;
use futures::StreamExt;

use crate::event::StreamEvent;
use crate::extract::StreamExtractor;

/// Turn a stream of text fragments into a stream of extraction events.
///
/// A fresh [`StreamExtractor`] is created per call, one per request. The
/// output ends with exactly one terminal event: `done`, or `error` if the
/// fragments never formed a complete turn. Callers that need to attach token
/// usage to `done` should drive a [`StreamExtractor`] directly instead.
pub fn extract_events<S>(fragments: S) -> impl Stream<Item = StreamEvent>
where
    S: Stream<Item = String>,
{
    async_stream::stream! {
        let mut extractor = StreamExtractor::new();
        futures::pin_mut!(fragments);
        while let Some(fragment) = fragments.next().await {
            for event in extractor.feed(&fragment) {
                yield event;
            }
        }
        for event in extractor.finish(None) {
            yield event;
        }
    }
}
