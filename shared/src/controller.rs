//! Navbar visibility controller
//!
//! Decides between the transparent and the solid navigation bar from two independent
//! signals and writes the result onto the bar's style markers:
//!
//! - **Intersection**: a section counts when enough of its height is inside the viewport.
//!   Driven by the host's intersection notifier.
//! - **Scroll probe**: a section counts when it straddles a fixed line below the viewport
//!   top. Driven by scroll/resize events, coalesced to one run per rendering frame.
//!
//! Neither signal owns the state. Each evaluation overwrites the markers through
//! [`NavbarVisibilityController::apply_state`], so the most recent one wins.
//!
//! The host (a browser document in production, fakes in tests) plugs in through
//! [`NavbarElement`], [`TriggerSection`], [`ViewportMetrics`] and [`FrameScheduler`].

use crate::{NavbarState, SectionRect, VisibilityConfig, any_straddles_probe, any_sufficiently_visible};
use std::cell::Cell;
use std::rc::Rc;

/// The navigation bar as a set of style markers.
pub trait NavbarElement {
    fn has_marker(&self, marker: &str) -> bool;
    fn add_marker(&self, marker: &str);
    fn remove_marker(&self, marker: &str);
}

/// A page region whose visibility decides the bar's look.
pub trait TriggerSection {
    /// Current bounding rectangle in viewport coordinates. Never cached by the controller.
    fn bounding_rect(&self) -> SectionRect;
}

pub trait ViewportMetrics {
    fn viewport_height(&self) -> f64;
}

/// Runs a callback once, at the start of the next rendering frame.
pub trait FrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<(), String>;
}

impl<T: NavbarElement + ?Sized> NavbarElement for Rc<T> {
    fn has_marker(&self, marker: &str) -> bool {
        (**self).has_marker(marker)
    }

    fn add_marker(&self, marker: &str) {
        (**self).add_marker(marker)
    }

    fn remove_marker(&self, marker: &str) {
        (**self).remove_marker(marker)
    }
}

impl<T: TriggerSection + ?Sized> TriggerSection for Rc<T> {
    fn bounding_rect(&self) -> SectionRect {
        (**self).bounding_rect()
    }
}

/// Pending-frame flag: at most one scheduled evaluation per scroll/resize burst.
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: Cell<bool>,
}

impl FrameGate {
    /// Returns `true` when the caller should schedule a frame, `false` when one is already pending.
    pub fn try_acquire(&self) -> bool {
        !self.pending.replace(true)
    }

    /// Cleared when the scheduled evaluation begins, not when it ends.
    pub fn release(&self) {
        self.pending.set(false);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

pub struct NavbarVisibilityController<N, S, V> {
    navbar: N,
    sections: Vec<S>,
    viewport: V,
    config: VisibilityConfig,
    frame_gate: FrameGate,
}

impl<N, S, V> NavbarVisibilityController<N, S, V>
where
    N: NavbarElement + 'static,
    S: TriggerSection + 'static,
    V: ViewportMetrics + 'static,
{
    /// Build a controller, or `None` when the bar is missing or there are no sections.
    ///
    /// The `None` path touches nothing: callers simply skip all wiring.
    pub fn new(
        navbar: Option<N>,
        sections: Vec<S>,
        viewport: V,
        config: VisibilityConfig,
    ) -> Option<Rc<Self>> {
        let navbar = navbar?;
        if sections.is_empty() {
            return None;
        }
        Some(Rc::new(Self {
            navbar,
            sections,
            viewport,
            config,
            frame_gate: FrameGate::default(),
        }))
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    pub fn sections(&self) -> &[S] {
        &self.sections
    }

    pub fn frame_gate(&self) -> &FrameGate {
        &self.frame_gate
    }

    /// State read back from the bar's markers. `None` if the markers are not exactly one of the two.
    pub fn state(&self) -> Option<NavbarState> {
        let transparent = self.navbar.has_marker(NavbarState::TRANSPARENT_MARKER);
        let solid = self.navbar.has_marker(NavbarState::SOLID_MARKER);
        match (transparent, solid) {
            (true, false) => Some(NavbarState::Transparent),
            (false, true) => Some(NavbarState::Solid),
            _ => None,
        }
    }

    /// Run both evaluations once so the initial look matches the current scroll position.
    pub fn start(&self) {
        self.evaluate_by_intersection();
        self.evaluate_by_scroll_probe();
    }

    /// Transparent if any section has at least `visible_fraction` of its height in the viewport.
    pub fn evaluate_by_intersection(&self) -> NavbarState {
        let viewport_height = self.viewport.viewport_height();
        let want_transparent = any_sufficiently_visible(
            self.sections.iter().map(|section| section.bounding_rect()),
            viewport_height,
            &self.config,
        );
        self.apply_state(want_transparent)
    }

    /// Transparent if any section straddles the probe line `offset` pixels below the viewport top.
    pub fn evaluate_by_scroll_probe(&self) -> NavbarState {
        let want_transparent = any_straddles_probe(
            self.sections.iter().map(|section| section.bounding_rect()),
            &self.config,
        );
        self.apply_state(want_transparent)
    }

    /// Put exactly one marker on the bar. Markers already in place are left untouched.
    pub fn apply_state(&self, want_transparent: bool) -> NavbarState {
        let wanted = NavbarState::from_transparent(want_transparent);
        let stale_marker = wanted.opposite().marker();
        if self.navbar.has_marker(stale_marker) {
            self.navbar.remove_marker(stale_marker);
        }
        if !self.navbar.has_marker(wanted.marker()) {
            self.navbar.add_marker(wanted.marker());
        }
        wanted
    }

    /// Scroll/resize handler. Schedules one scroll-probe evaluation on the next frame;
    /// events arriving while one is pending are dropped.
    pub fn schedule_scroll_probe(self: &Rc<Self>, scheduler: &impl FrameScheduler) -> Result<(), String> {
        if !self.frame_gate.try_acquire() {
            return Ok(());
        }
        let controller = Rc::clone(self);
        let requested = scheduler.request_frame(Box::new(move || {
            controller.frame_gate.release();
            controller.evaluate_by_scroll_probe();
        }));
        if requested.is_err() {
            // Nothing will run, so the next event must be able to retry
            self.frame_gate.release();
        }
        requested
    }
}
