//! Multi-source gravity field.
//!
//! Gravity is the sum of every registered [`GravitySource`] evaluated at a
//! position. The field is an explicit service object: the simulation creates
//! one at world start, shares it behind an `Arc` with every character and
//! free body, and drops it at world end. Tests build independent fields.
//!
//! The source set is stored as a copy-on-write snapshot. A query clones the
//! current `Arc<Vec<_>>` and iterates it without holding the lock, so it never
//! sees a half-applied registration.

mod body;
mod sources;

pub use body::GravityBody;
pub use sources::{PlanetGravity, UniformGravity};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use glam::Vec3;
use log::warn;

use crate::error::GravityError;
use crate::math::EPSILON_SQ;

/// Anything that contributes an acceleration at a world position.
///
/// Sources must be pure functions of position within a tick.
pub trait GravitySource: Send + Sync {
    fn gravity_at(&self, position: Vec3) -> Vec3;
}

/// Shared handle to a registered source. Identity is pointer identity.
pub type SourceHandle = Arc<dyn GravitySource>;

impl fmt::Debug for dyn GravitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GravitySource")
    }
}

/// Aggregated gravity and the up axis derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySample {
    pub gravity: Vec3,
    /// `-normalize(gravity)`, or the caller's fallback when gravity is zero.
    pub up: Vec3,
}

impl Default for GravitySample {
    fn default() -> Self {
        Self {
            gravity: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// Registry of active gravity sources.
#[derive(Default)]
pub struct GravityField {
    sources: RwLock<Arc<Vec<SourceHandle>>>,
    /// Set once the zero-gravity fallback has been reported for the current
    /// source set.
    fallback_reported: AtomicBool,
}

impl fmt::Debug for GravityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GravityField")
            .field("sources", &self.len())
            .finish()
    }
}

impl GravityField {
    /// Create an empty field. With no sources, gravity is zero everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source.
    ///
    /// Registering a source that is already active is a contract violation:
    /// the registry is left unchanged and [`GravityError::DuplicateSource`]
    /// is returned.
    pub fn register(&self, source: SourceHandle) -> Result<(), GravityError> {
        let mut guard = self.sources.write().unwrap_or_else(PoisonError::into_inner);
        if guard.iter().any(|active| same_source(active, &source)) {
            warn!("duplicate registration of gravity source ignored");
            return Err(GravityError::DuplicateSource);
        }

        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(source);
        *guard = Arc::new(next);
        self.fallback_reported.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// Remove a source.
    ///
    /// Unregistering a source that is not active is a contract violation:
    /// the registry is left unchanged and [`GravityError::UnknownSource`] is
    /// returned.
    pub fn unregister(&self, source: &SourceHandle) -> Result<(), GravityError> {
        let mut guard = self.sources.write().unwrap_or_else(PoisonError::into_inner);
        let Some(index) = guard.iter().position(|active| same_source(active, source)) else {
            warn!("unregistering an unknown gravity source ignored");
            return Err(GravityError::UnknownSource);
        };

        let mut next: Vec<SourceHandle> = guard.iter().cloned().collect();
        next.remove(index);
        *guard = Arc::new(next);
        self.fallback_reported.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// Whether `source` is currently registered.
    pub fn contains(&self, source: &SourceHandle) -> bool {
        self.snapshot().iter().any(|active| same_source(active, source))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Sum of every active source at `position`, in registration order.
    pub fn gravity_at(&self, position: Vec3) -> Vec3 {
        self.snapshot()
            .iter()
            .fold(Vec3::ZERO, |sum, source| sum + source.gravity_at(position))
    }

    /// `-normalize(gravity_at(position))`.
    ///
    /// When the aggregated gravity is zero there is no up axis; `fallback_up`
    /// (normally the character's current up) is returned instead.
    pub fn up_axis_at(&self, position: Vec3, fallback_up: Vec3) -> Vec3 {
        self.sample(position, fallback_up).up
    }

    /// Gravity and up axis in a single aggregation pass.
    pub fn sample(&self, position: Vec3, fallback_up: Vec3) -> GravitySample {
        let gravity = self.gravity_at(position);
        if gravity.length_squared() < EPSILON_SQ {
            if !self.fallback_reported.swap(true, Ordering::Relaxed) {
                warn!("aggregated gravity is zero at {position}, keeping the current up axis");
            }
            return GravitySample {
                gravity,
                up: fallback_up.try_normalize().unwrap_or(Vec3::Y),
            };
        }
        GravitySample {
            gravity,
            up: -gravity.normalize(),
        }
    }

    fn snapshot(&self) -> Arc<Vec<SourceHandle>> {
        Arc::clone(&self.sources.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Compare data pointers only; vtable pointers of the same type may differ
/// between codegen units.
fn same_source(a: &SourceHandle, b: &SourceHandle) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
