#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use kiosk_core::{CardOffset, CardPlacer};
use kiosk_engine::{FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

enum Route {
    Bytes(Vec<u8>),
    Fail(FailureKind),
}

/// In-memory fetcher: serves scripted responses after a fixed delay and
/// records every request.
pub struct ScriptedFetcher {
    routes: HashMap<String, Route>,
    delays: HashMap<String, Duration>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            delays: HashMap::new(),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn image(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Route::Bytes(png(2, 2)));
        self
    }

    pub fn slow_image(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self.image(url)
    }

    pub fn raw(mut self, url: &str, bytes: &[u8]) -> Self {
        self.routes
            .insert(url.to_string(), Route::Bytes(bytes.to_vec()));
        self
    }

    pub fn failing(mut self, url: &str, kind: FailureKind) -> Self {
        self.routes.insert(url.to_string(), Route::Fail(kind));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls().iter().filter(|call| *call == url).count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(url).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.routes.get(url) {
            Some(Route::Bytes(bytes)) => Ok(FetchOutput {
                bytes: bytes.clone(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    content_type: Some("image/png".to_string()),
                    byte_len: bytes.len() as u64,
                },
            }),
            Some(Route::Fail(kind)) => Err(FetchError::new(kind.clone(), "scripted failure")),
            None => Err(FetchError::new(FailureKind::HttpStatus(404), "not scripted")),
        }
    }
}

/// Places every card at the same offset.
pub struct FixedPlacer(pub CardOffset);

impl CardPlacer for FixedPlacer {
    fn place(&mut self, _index: usize) -> CardOffset {
        self.0
    }
}
