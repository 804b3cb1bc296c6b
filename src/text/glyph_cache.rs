use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use futures::channel::oneshot;
use log::{debug, warn};

use super::GlyphKey;
use crate::element::Bitmap;
use crate::error::{FryError, Result};

/// Provider of encoded emoji bitmaps
pub trait GlyphSource: Send + Sync {
    fn fetch(&self, key: &GlyphKey) -> Result<Vec<u8>>;
}

/// Reads `<root>/<key>.png`
#[derive(Debug, Clone)]
pub struct DirGlyphSource {
    root: PathBuf,
}

impl DirGlyphSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl GlyphSource for DirGlyphSource {
    fn fetch(&self, key: &GlyphKey) -> Result<Vec<u8>> {
        let path = self.root.join(format!("{key}.png"));
        std::fs::read(&path).map_err(|e| FryError::GlyphFetch {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Source used when no emoji directory is configured
#[derive(Debug, Default)]
pub struct NoGlyphSource;

impl GlyphSource for NoGlyphSource {
    fn fetch(&self, key: &GlyphKey) -> Result<Vec<u8>> {
        Err(FryError::GlyphFetch {
            key: key.to_string(),
            reason: "no emoji directory configured".to_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// One worker thread per fetch
    Background,
    /// Fetch on the calling thread; results still arrive through `poll`
    Inline,
}

enum GlyphSlot {
    Pending(oneshot::Receiver<Result<Bitmap>>),
    Ready(Bitmap),
    Failed,
}

/// Process-lifetime cache of emoji bitmaps keyed by [`GlyphKey`].
///
/// Every key is fetched at most once. Failures are cached too, so a missing
/// glyph keeps rendering as plain text without retrying.
pub struct GlyphCache {
    source: Arc<dyn GlyphSource>,
    mode: FetchMode,
    slots: HashMap<GlyphKey, GlyphSlot>,
}

impl GlyphCache {
    pub fn new(source: Arc<dyn GlyphSource>, mode: FetchMode) -> Self {
        Self {
            source,
            mode,
            slots: HashMap::new(),
        }
    }

    /// Bitmap for `key` if it has arrived. The first lookup starts the fetch.
    pub fn get(&mut self, key: &GlyphKey) -> Option<Bitmap> {
        match self.slots.get(key) {
            Some(GlyphSlot::Ready(bitmap)) => Some(bitmap.clone()),
            Some(GlyphSlot::Pending(_)) | Some(GlyphSlot::Failed) => None,
            None => {
                let receiver = self.start_fetch(key);
                self.slots.insert(key.clone(), GlyphSlot::Pending(receiver));
                None
            }
        }
    }

    fn start_fetch(&self, key: &GlyphKey) -> oneshot::Receiver<Result<Bitmap>> {
        debug!("Fetching emoji glyph {key}");
        let (sender, receiver) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let key = key.clone();
        let job = move || {
            let result = source.fetch(&key).and_then(|bytes| Bitmap::decode(&bytes));
            // The cache may have been dropped meanwhile
            let _ = sender.send(result);
        };
        match self.mode {
            FetchMode::Background => {
                std::thread::spawn(job);
            }
            FetchMode::Inline => job(),
        }
        receiver
    }

    /// Collect finished fetches. Returns true when a glyph became drawable.
    pub fn poll(&mut self) -> bool {
        let mut arrived = false;
        for (key, slot) in self.slots.iter_mut() {
            let GlyphSlot::Pending(receiver) = slot else {
                continue;
            };
            match receiver.try_recv() {
                Ok(None) => {}
                Ok(Some(Ok(bitmap))) => {
                    debug!("Emoji glyph {key} ready");
                    *slot = GlyphSlot::Ready(bitmap);
                    arrived = true;
                }
                Ok(Some(Err(e))) => {
                    warn!("Emoji glyph {key} unavailable: {e}");
                    *slot = GlyphSlot::Failed;
                }
                Err(oneshot::Canceled) => {
                    warn!("Emoji glyph {key} fetch was abandoned");
                    *slot = GlyphSlot::Failed;
                }
            }
        }
        arrived
    }

    pub fn has_pending(&self) -> bool {
        self.slots
            .values()
            .any(|slot| matches!(slot, GlyphSlot::Pending(_)))
    }
}
