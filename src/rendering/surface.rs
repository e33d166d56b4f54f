//! Drawing surface capability and its asynchronous lifecycle.
//!
//! A surface is created asynchronously through a [`SurfaceFactory`]. While
//! that is in flight the owning component sits in
//! [`SurfaceSlot::Initializing`]: interaction is ignored and resize or
//! view-apply requests are parked, then replayed once the surface is
//! installed. Every setup carries a [`CancellationToken`]; a setup whose token
//! was cancelled releases its surface instead of installing it.

use crate::{
    core::{
        bounds::Bounds,
        geo::{Point, Size},
        viewport::Transform,
    },
    rendering::context::Frame,
    MapError, Result,
};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

/// Minimal capability set the engine needs from a drawing backend
pub trait RenderSurface: Send {
    fn size(&self) -> Size;

    /// Surface rectangle in the host page frame
    fn bounding_rect(&self) -> Bounds;

    fn resize(&mut self, size: Size);

    /// Translation and scale of the world-pixel container
    fn set_transform(&mut self, transform: Transform);

    fn transform(&self) -> Transform;

    /// Replaces everything drawn with `frame`
    fn present(&mut self, frame: Frame);

    /// Frees all drawing resources; the surface is unusable afterwards
    fn release(&mut self);
}

/// Creates surfaces, possibly asynchronously
#[async_trait]
pub trait SurfaceFactory: Send + Sync {
    async fn create(&self, size: Size) -> Result<Box<dyn RenderSurface>>;
}

/// Shared flag telling an in-flight surface setup that it went stale
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether two handles refer to the same setup
    pub fn same_as(&self, other: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

/// Runs a surface setup; if the token was cancelled while it was running the
/// new surface is released and `Cancelled` is returned
pub async fn initialize_surface(
    factory: &dyn SurfaceFactory,
    size: Size,
    token: &CancellationToken,
) -> Result<Box<dyn RenderSurface>> {
    if token.is_cancelled() {
        return Err(MapError::Cancelled);
    }
    let mut surface = factory.create(size).await?;
    if token.is_cancelled() {
        log::debug!("surface setup went stale; releasing it");
        surface.release();
        return Err(MapError::Cancelled);
    }
    Ok(surface)
}

/// Requests parked while a surface is being set up; repeated requests collapse
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deferred {
    pub resize: Option<Size>,
    pub apply_view: bool,
}

impl Deferred {
    pub fn is_empty(&self) -> bool {
        self.resize.is_none() && !self.apply_view
    }
}

/// Where the component's surface currently is in its lifecycle
#[derive(Default)]
pub enum SurfaceSlot {
    #[default]
    Empty,
    Initializing {
        token: CancellationToken,
        deferred: Deferred,
    },
    Ready(Box<dyn RenderSurface>),
}

impl SurfaceSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, SurfaceSlot::Ready(_))
    }

    pub fn surface(&self) -> Option<&dyn RenderSurface> {
        match self {
            SurfaceSlot::Ready(surface) => Some(surface.as_ref()),
            _ => None,
        }
    }

    pub fn surface_mut(&mut self) -> Option<&mut (dyn RenderSurface + 'static)> {
        match self {
            SurfaceSlot::Ready(surface) => Some(surface.as_mut()),
            _ => None,
        }
    }

    /// Parks requests while initializing; returns false when not initializing
    pub fn defer(&mut self, resize: Option<Size>, apply_view: bool) -> bool {
        match self {
            SurfaceSlot::Initializing { deferred, .. } => {
                if resize.is_some() {
                    deferred.resize = resize;
                }
                deferred.apply_view |= apply_view;
                true
            }
            _ => false,
        }
    }

    /// Cancels a pending setup and releases a ready surface, leaving the slot empty
    pub fn teardown(&mut self) {
        match std::mem::take(self) {
            SurfaceSlot::Empty => {}
            SurfaceSlot::Initializing { token, .. } => token.cancel(),
            SurfaceSlot::Ready(mut surface) => surface.release(),
        }
    }
}

impl std::fmt::Debug for SurfaceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceSlot::Empty => write!(f, "Empty"),
            SurfaceSlot::Initializing { deferred, .. } => {
                f.debug_struct("Initializing").field("deferred", deferred).finish()
            }
            SurfaceSlot::Ready(surface) => f
                .debug_struct("Ready")
                .field("size", &surface.size())
                .finish(),
        }
    }
}

/// What a [`RecordingSurface`] has been asked to do
#[derive(Debug, Clone, Default)]
pub struct SurfaceRecord {
    pub size: Size,
    pub origin: Point,
    pub transform: Transform,
    pub transform_updates: usize,
    pub frames_presented: usize,
    pub last_frame: Option<Frame>,
    pub released: bool,
}

/// Headless surface that records every call; clones observe the same record
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    record: Arc<Mutex<SurfaceRecord>>,
    releases: Arc<AtomicUsize>,
}

impl RecordingSurface {
    pub fn new(size: Size, origin: Point) -> Self {
        Self::with_release_counter(size, origin, Arc::new(AtomicUsize::new(0)))
    }

    fn with_release_counter(size: Size, origin: Point, releases: Arc<AtomicUsize>) -> Self {
        Self {
            record: Arc::new(Mutex::new(SurfaceRecord {
                size,
                origin,
                ..SurfaceRecord::default()
            })),
            releases,
        }
    }

    /// Snapshot of everything recorded so far
    pub fn record(&self) -> SurfaceRecord {
        self.record
            .lock()
            .map(|record| record.clone())
            .unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut SurfaceRecord)) {
        if let Ok(mut record) = self.record.lock() {
            f(&mut record);
        }
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Size {
        self.record().size
    }

    fn bounding_rect(&self) -> Bounds {
        let record = self.record();
        Bounds::from_origin_and_size(record.origin, record.size.width, record.size.height)
    }

    fn resize(&mut self, size: Size) {
        self.update(|record| record.size = size);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.update(|record| {
            record.transform = transform;
            record.transform_updates += 1;
        });
    }

    fn transform(&self) -> Transform {
        self.record().transform
    }

    fn present(&mut self, frame: Frame) {
        self.update(|record| {
            record.frames_presented += 1;
            record.last_frame = Some(frame);
        });
    }

    fn release(&mut self) {
        let mut first = false;
        self.update(|record| {
            first = !record.released;
            record.released = true;
            record.last_frame = None;
        });
        if first {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Factory handing out [`RecordingSurface`]s and keeping a handle to each
#[derive(Debug, Clone, Default)]
pub struct RecordingSurfaceFactory {
    origin: Point,
    created: Arc<Mutex<Vec<RecordingSurface>>>,
    releases: Arc<AtomicUsize>,
    fail: bool,
}

impl RecordingSurfaceFactory {
    /// Surfaces placed at `origin` in the host page frame
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// A factory whose setups always fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Handles to every surface created so far, oldest first
    pub fn created(&self) -> Vec<RecordingSurface> {
        self.created
            .lock()
            .map(|created| created.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<RecordingSurface> {
        self.created().pop()
    }

    /// Number of surfaces released so far
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SurfaceFactory for RecordingSurfaceFactory {
    async fn create(&self, size: Size) -> Result<Box<dyn RenderSurface>> {
        if self.fail {
            return Err(MapError::SurfaceUnavailable(
                "recording factory set to fail".to_string(),
            ));
        }
        let surface = RecordingSurface::with_release_counter(size, self.origin, self.releases.clone());
        if let Ok(mut created) = self.created.lock() {
            created.push(surface.clone());
        }
        Ok(Box::new(surface))
    }
}
