//! Pane kinds and their per-kind strategies.

use serde::{Deserialize, Serialize};

use crate::layout::Axis;
use crate::settings::GridSettings;

/// The panes a grid is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaneKind {
    /// Main scrolling content
    Master,
    /// Frozen columns and row headers, scrolls vertically
    Left,
    /// Frozen top rows and column headers, scrolls horizontally
    Top,
    /// Frozen bottom rows, scrolls horizontally
    Bottom,
    /// Intersection of Left and Top, never scrolls
    TopLeftCorner,
    /// Intersection of Left and Bottom, never scrolls
    BottomLeftCorner,
}

impl PaneKind {
    /// Every kind, master first.
    pub const ALL: [PaneKind; 6] = [
        PaneKind::Master,
        PaneKind::Left,
        PaneKind::Top,
        PaneKind::Bottom,
        PaneKind::TopLeftCorner,
        PaneKind::BottomLeftCorner,
    ];

    /// Order in which panes are refreshed: corners, single-axis panes, master.
    pub const REFRESH_ORDER: [PaneKind; 6] = [
        PaneKind::TopLeftCorner,
        PaneKind::BottomLeftCorner,
        PaneKind::Left,
        PaneKind::Top,
        PaneKind::Bottom,
        PaneKind::Master,
    ];

    /// Stable lowercase name (CSS class suffix, log field).
    pub fn name(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Left => "left",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::TopLeftCorner => "top-left-corner",
            Self::BottomLeftCorner => "bottom-left-corner",
        }
    }

    /// Position of the kind in [`PaneKind::REFRESH_ORDER`].
    pub fn refresh_rank(self) -> usize {
        Self::REFRESH_ORDER
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(Self::REFRESH_ORDER.len())
    }

    /// True when the pane's content stays fixed along `axis`.
    pub fn is_pinned(self, axis: Axis) -> bool {
        match self {
            Self::Master => false,
            Self::Left => axis == Axis::Horizontal,
            Self::Top | Self::Bottom => axis == Axis::Vertical,
            Self::TopLeftCorner | Self::BottomLeftCorner => true,
        }
    }

    /// Axes along which the pane's content follows the main scroll position.
    pub fn scrolling_axes(self) -> impl Iterator<Item = Axis> {
        Axis::BOTH.into_iter().filter(move |axis| !self.is_pinned(*axis))
    }

    /// Pinned on exactly one axis.
    pub fn is_single_axis(self) -> bool {
        matches!(self, Self::Left | Self::Top | Self::Bottom)
    }

    /// Axis collapsed to zero while the pane is inactive. Corners collapse both.
    pub fn varying_axis(self) -> Option<Axis> {
        match self {
            Self::Left => Some(Axis::Vertical),
            Self::Top | Self::Bottom => Some(Axis::Horizontal),
            Self::Master | Self::TopLeftCorner | Self::BottomLeftCorner => None,
        }
    }

    /// Anchored to the bottom edge of the visible content.
    pub fn is_bottom_anchored(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeftCorner)
    }

    /// Pane whose scroll-to math drives the given axis.
    pub fn scroll_controller(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::Left,
            Axis::Vertical => Self::Top,
        }
    }

    /// Whether a pane of this kind has anything to show with `settings`.
    pub fn should_be_rendered(self, settings: &GridSettings) -> bool {
        match self {
            Self::Master => true,
            Self::Left => settings.has_left_strip(),
            Self::Top => settings.has_top_strip(),
            Self::Bottom => settings.has_bottom_strip(),
            Self::TopLeftCorner => settings.has_left_strip() && settings.has_top_strip(),
            Self::BottomLeftCorner => settings.has_left_strip() && settings.has_bottom_strip(),
        }
    }
}
