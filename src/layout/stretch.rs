//! Column stretching.
//!
//! When the configured columns are narrower than the workspace, the leftover
//! width is handed to a pool of visible columns. Hidden (zero-width) columns
//! never join the pool. Pool widths are whole pixels and the rounding remainder
//! goes to the last pool column, so the pool fills the target width exactly.

use super::axis::AxisLayout;
use crate::settings::StretchPolicy;

/// Resolve stretched column sizes for the `base` column layout.
///
/// `available` is the width the columns may occupy (workspace width minus row
/// headers). Columns only ever grow. Returns `None` when nothing stretches: no
/// policy, no visible column, or the base widths already fill `available`.
pub fn stretch_axis(
    base: &AxisLayout,
    policy: StretchPolicy,
    available: f64,
) -> Option<AxisLayout> {
    if !available.is_finite() {
        return None;
    }
    let last = last_visible(base)?;
    match policy {
        StretchPolicy::None => None,
        StretchPolicy::Last => {
            let width = base.size(last);
            let target = available - (base.total() - width);
            (target > width).then(|| {
                let overrides =
                    std::iter::once((last, target)).chain(base.overrides().iter().copied());
                AxisLayout::new(base.count(), base.default_size(), overrides)
            })
        }
        StretchPolicy::All => {
            let current = base.total();
            if available <= current {
                return None;
            }
            let ratio = available / current;
            let scaled = AxisLayout::new(
                base.count(),
                (base.default_size() * ratio).floor(),
                base.overrides()
                    .iter()
                    .map(|(index, width)| (*index, (width * ratio).floor())),
            );
            let remainder = available - scaled.total();
            let overrides = std::iter::once((last, scaled.size(last) + remainder))
                .chain(scaled.overrides().iter().copied());
            Some(AxisLayout::new(base.count(), scaled.default_size(), overrides))
        }
    }
}

/// Index of the last column with a non-zero width.
fn last_visible(axis: &AxisLayout) -> Option<u32> {
    if axis.default_size() <= 0.0 {
        return axis
            .overrides()
            .iter()
            .rev()
            .find(|(_, width)| *width > 0.0)
            .map(|(index, _)| *index);
    }
    // Step back over trailing hidden columns; any index without an override is visible
    let mut index = axis.count().checked_sub(1)?;
    for (at, width) in axis.overrides().iter().rev() {
        if *at < index || *width > 0.0 {
            break;
        }
        index = index.checked_sub(1)?;
    }
    Some(index)
}
