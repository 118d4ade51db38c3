use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingSource {
    calls: AtomicUsize,
    reply: Option<&'static str>,
    fail: bool,
}

impl CountingSource {
    fn new(reply: Option<&'static str>, fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply,
            fail,
        }
    }
}

#[async_trait]
impl DescriptionSource for CountingSource {
    async fn description(&self, _id: EventId) -> Result<Option<String>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            let err = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
            return Err(SourceError::Decode(err));
        }
        Ok(self.reply.map(str::to_string))
    }
}

#[tokio::test]
async fn description_is_fetched_once() {
    let source = CountingSource::new(Some("Bring water."), false);
    let mut cache = DescriptionCache::new();
    assert_eq!(cache.get(EventId(1)), None);

    assert_eq!(cache.load(&source, EventId(1)).await, "Bring water.");
    assert_eq!(cache.load(&source, EventId(1)).await, "Bring water.");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get(EventId(1)), Some("Bring water."));
}

#[tokio::test]
async fn failure_caches_fallback_text() {
    let source = CountingSource::new(None, true);
    let mut cache = DescriptionCache::new();

    assert_eq!(cache.load(&source, EventId(2)).await, NO_DESCRIPTION);
    assert_eq!(cache.load(&source, EventId(2)).await, NO_DESCRIPTION);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_description_uses_fallback() {
    let source = CountingSource::new(None, false);
    let mut cache = DescriptionCache::new();
    assert_eq!(cache.load(&source, EventId(3)).await, NO_DESCRIPTION);
    assert_eq!(cache.len(), 1);
}
