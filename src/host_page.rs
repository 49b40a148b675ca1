//! The host page the summary panel is injected into.
//!
//! Everything that depends on the third-party page layout sits here:
//! `HostPage` is the minimal document surface the components need, and
//! `InsertionStrategy` is the probe chain that picks where the panel goes.
//! Swapping either one leaves the rendering and session logic untouched.

use crate::error::DomError;
use crate::models::Notice;
use crate::summary::{Panel, PanelId};
use std::collections::HashSet;
use tracing::{debug, warn};

// ============================================================================
// Insertion Points
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// First child of the anchor.
    Prepend,
    /// Last child of the anchor.
    Append,
    /// Sibling right before the anchor.
    Before,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionPoint {
    Anchor { selector: String, placement: Placement },
    /// Nothing matched: float the panel over the page.
    FixedOverlay,
}

impl InsertionPoint {
    pub fn anchor(selector: &str, placement: Placement) -> Self {
        InsertionPoint::Anchor {
            selector: selector.to_string(),
            placement,
        }
    }
}

// ============================================================================
// Host Page
// ============================================================================

pub trait HostPage: Send {
    fn has_element(&self, selector: &str) -> bool;
    fn is_dark_mode(&self) -> bool;
    fn insert_panel(&mut self, point: InsertionPoint, panel: Panel) -> Result<(), DomError>;
    fn remove_panel(&mut self) -> Option<Panel>;
    fn panel(&self) -> Option<&Panel>;
    fn panel_mut(&mut self) -> Option<&mut Panel>;
    fn notify(&mut self, notice: Notice);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Inserted(PanelId),
    Removed(PanelId),
}

/// A host page described by the set of selectors it contains.
///
/// The local web UI renders this page; tests build it with whatever layout
/// they need.
#[derive(Debug, Default)]
pub struct StaticPage {
    elements: HashSet<String>,
    dark: bool,
    mounted: Option<(InsertionPoint, Panel)>,
    notices: Vec<Notice>,
    events: Vec<PageEvent>,
}

/// Anchors present on an ordinary watch page.
pub const WATCH_LAYOUT: &[&str] = &[
    "#primary",
    "#primary-inner",
    "#below",
    "#comments",
    "#secondary",
    "#secondary-inner",
    "#related",
    "ytd-watch-next-secondary-results-renderer",
];

impl StaticPage {
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: elements.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn watch_layout() -> Self {
        Self::new(WATCH_LAYOUT.iter().copied())
    }

    pub fn with_dark_mode(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }

    pub fn add_element(&mut self, selector: &str) {
        self.elements.insert(selector.to_string());
    }

    pub fn insertion_point(&self) -> Option<&InsertionPoint> {
        self.mounted.as_ref().map(|(point, _)| point)
    }

    pub fn events(&self) -> &[PageEvent] {
        &self.events
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl HostPage for StaticPage {
    fn has_element(&self, selector: &str) -> bool {
        self.elements.contains(selector)
    }

    fn is_dark_mode(&self) -> bool {
        self.dark
    }

    fn insert_panel(&mut self, point: InsertionPoint, panel: Panel) -> Result<(), DomError> {
        if let InsertionPoint::Anchor { ref selector, .. } = point {
            if !self.has_element(selector) {
                return Err(DomError::ElementNotFound(selector.clone()));
            }
        }
        self.remove_panel();
        self.events.push(PageEvent::Inserted(panel.id));
        self.mounted = Some((point, panel));
        Ok(())
    }

    fn remove_panel(&mut self) -> Option<Panel> {
        let (_, panel) = self.mounted.take()?;
        self.events.push(PageEvent::Removed(panel.id));
        Some(panel)
    }

    fn panel(&self) -> Option<&Panel> {
        self.mounted.as_ref().map(|(_, panel)| panel)
    }

    fn panel_mut(&mut self) -> Option<&mut Panel> {
        self.mounted.as_mut().map(|(_, panel)| panel)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

// ============================================================================
// Insertion Strategy
// ============================================================================

/// Ordered probes for a panel location. Ad slots are tried first (the panel
/// takes the ad's place), then structural anchors, then the overlay.
#[derive(Debug, Clone)]
pub struct InsertionStrategy {
    ad_slots: Vec<String>,
    anchors: Vec<(String, Placement)>,
}

const AD_SLOTS: &[&str] = &[
    "ytd-ad-slot-renderer",
    "ytd-promoted-video-renderer",
    "ytd-display-ad-renderer",
    "ytd-compact-promoted-video-renderer",
    "ytd-statement-banner-renderer",
    "ytd-in-feed-ad-layout-renderer",
    "ytd-ad-promo-renderer",
    "ytd-promoted-sparkles-web-renderer",
    "ytd-promoted-sparkles-text-search-renderer",
];

const ANCHORS: &[(&str, Placement)] = &[
    ("ytd-watch-next-secondary-results-renderer", Placement::Prepend),
    ("#secondary-inner", Placement::Prepend),
    ("#items.ytd-watch-next-secondary-results-renderer", Placement::Prepend),
    ("#secondary", Placement::Prepend),
    ("#related", Placement::Prepend),
    ("#below", Placement::Prepend),
    ("#primary-inner", Placement::Append),
    ("#primary", Placement::Append),
    ("#comments", Placement::Before),
];

impl Default for InsertionStrategy {
    fn default() -> Self {
        Self::new(
            AD_SLOTS.iter().map(|s| s.to_string()).collect(),
            ANCHORS.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
        )
    }
}

impl InsertionStrategy {
    pub fn new(ad_slots: Vec<String>, anchors: Vec<(String, Placement)>) -> Self {
        Self { ad_slots, anchors }
    }

    pub fn find<P: HostPage + ?Sized>(&self, page: &P) -> InsertionPoint {
        if let Some(slot) = self.ad_slots.iter().find(|s| page.has_element(s)) {
            debug!(selector = %slot, "inserting in place of ad slot");
            return InsertionPoint::anchor(slot, Placement::Before);
        }

        for (selector, placement) in &self.anchors {
            if page.has_element(selector) {
                debug!(selector = %selector, ?placement, "insertion anchor found");
                return InsertionPoint::anchor(selector, *placement);
            }
        }

        warn!("no insertion point matched, using fixed overlay");
        InsertionPoint::FixedOverlay
    }
}
