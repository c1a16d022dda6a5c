//! Render targets and the presentation surface.

use crate::chrome::Chrome;
use mosaic_features::{FeatureInput, ResolutionResult};
use mosaic_tenancy::TenantConfig;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Everything a surface needs to render a resolved feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    /// Tenant being served
    pub tenant: Arc<TenantConfig>,
    /// Tenant-relative route
    pub route: String,
    /// Resolved implementation and provenance
    pub resolution: ResolutionResult,
    /// Typed input for the implementation
    pub input: FeatureInput,
    /// Page framing
    pub chrome: Chrome,
}

/// Result of handling a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Render the resolved feature
    Render(RenderPlan),
    /// Navigate elsewhere; nothing is rendered
    Redirect { location: String },
    /// Not-found page
    NotFound { reason: String },
    /// Disabled-feature notice
    Disabled { feature: String },
}

impl PageOutcome {
    /// Render plan, if the outcome renders
    pub fn plan(&self) -> Option<&RenderPlan> {
        match self {
            PageOutcome::Render(plan) => Some(plan),
            _ => None,
        }
    }

    /// Redirect location, if the outcome redirects
    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            PageOutcome::Redirect { location } => Some(location),
            _ => None,
        }
    }

    /// Whether protected content is rendered
    pub fn renders(&self) -> bool {
        matches!(self, PageOutcome::Render(_))
    }
}

/// Consumer of page outcomes. Its rendering internals are its own.
pub trait PresentationSurface: Send {
    /// Render a resolved feature
    fn present(&mut self, plan: &RenderPlan);

    /// Navigate to `location`
    fn redirect(&mut self, location: &str);

    /// Show the not-found page
    fn not_found(&mut self, reason: &str);

    /// Show the disabled-feature notice
    fn disabled(&mut self, feature: &str);
}

/// Ticket for one in-flight render
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderTicket(u64);

impl RenderTicket {
    /// Generation the ticket was issued for
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Whether a committed outcome reached the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    /// Handed to the surface
    Applied,
    /// A newer render began first; discarded
    Stale,
}

/// A surface plus a generation counter.
///
/// Only the most recently issued ticket may commit; results of abandoned
/// renders are dropped without touching the surface.
///
/// # Examples
///
/// ```
/// use mosaic::{CommitStatus, PageOutcome, PresentationSurface, RenderPlan, RenderTarget};
///
/// #[derive(Default)]
/// struct Log(Vec<String>);
///
/// impl PresentationSurface for Log {
///     fn present(&mut self, plan: &RenderPlan) { self.0.push(plan.route.clone()) }
///     fn redirect(&mut self, location: &str) { self.0.push(location.to_string()) }
///     fn not_found(&mut self, reason: &str) { self.0.push(reason.to_string()) }
///     fn disabled(&mut self, feature: &str) { self.0.push(feature.to_string()) }
/// }
///
/// let target = RenderTarget::new(Log::default());
/// let slow = target.begin();
/// let fast = target.begin();
///
/// let home = PageOutcome::Redirect { location: "/centro-abc".into() };
/// assert_eq!(target.commit(fast, home.clone()), CommitStatus::Applied);
/// assert_eq!(target.commit(slow, home), CommitStatus::Stale);
/// assert_eq!(target.surface().0.len(), 1);
/// ```
pub struct RenderTarget<S: PresentationSurface> {
    surface: Mutex<S>,
    generation: AtomicU64,
}

impl<S: PresentationSurface> RenderTarget<S> {
    /// Wrap a surface
    pub fn new(surface: S) -> Self {
        Self {
            surface: Mutex::new(surface),
            generation: AtomicU64::new(0),
        }
    }

    /// Start a render, superseding any in flight
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is the newest one issued
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Hand `outcome` to the surface if `ticket` is still current
    pub fn commit(&self, ticket: RenderTicket, outcome: PageOutcome) -> CommitStatus {
        let mut surface = self.surface.lock();

        if !self.is_current(ticket) {
            mosaic_log::debug!(
                target: "mosaic::platform",
                "stale render discarded";
                ticket = ticket.0,
                current = self.generation.load(Ordering::SeqCst)
            );
            return CommitStatus::Stale;
        }

        match &outcome {
            PageOutcome::Render(plan) => surface.present(plan),
            PageOutcome::Redirect { location } => surface.redirect(location),
            PageOutcome::NotFound { reason } => surface.not_found(reason),
            PageOutcome::Disabled { feature } => surface.disabled(feature),
        }
        CommitStatus::Applied
    }

    /// Borrow the surface
    pub fn surface(&self) -> MutexGuard<'_, S> {
        self.surface.lock()
    }

    /// Unwrap the surface
    pub fn into_surface(self) -> S {
        self.surface.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl PresentationSurface for Recorder {
        fn present(&mut self, plan: &RenderPlan) {
            self.events.push(format!("present {}", plan.resolution.implementation.id));
        }

        fn redirect(&mut self, location: &str) {
            self.events.push(format!("redirect {}", location));
        }

        fn not_found(&mut self, reason: &str) {
            self.events.push(format!("not_found {}", reason));
        }

        fn disabled(&mut self, feature: &str) {
            self.events.push(format!("disabled {}", feature));
        }
    }

    #[test]
    fn test_tickets_increase() {
        let target = RenderTarget::new(Recorder::default());
        let first = target.begin();
        let second = target.begin();
        assert!(second > first);
        assert!(!target.is_current(first));
        assert!(target.is_current(second));
    }

    #[test]
    fn test_stale_commit_has_no_side_effects() {
        let target = RenderTarget::new(Recorder::default());
        let old = target.begin();
        let new = target.begin();

        let status = target.commit(
            old,
            PageOutcome::Disabled {
                feature: "Facturacion".into(),
            },
        );
        assert_eq!(status, CommitStatus::Stale);
        assert!(target.surface().events.is_empty());

        target.commit(
            new,
            PageOutcome::NotFound {
                reason: "unknown route".into(),
            },
        );
        assert_eq!(target.into_surface().events, vec!["not_found unknown route"]);
    }

    #[test]
    fn test_outcome_accessors() {
        let redirect = PageOutcome::Redirect {
            location: "/empresa-techpro/login".into(),
        };
        assert_eq!(redirect.redirect_location(), Some("/empresa-techpro/login"));
        assert!(!redirect.renders());
        assert!(redirect.plan().is_none());
    }
}
