use crate::error::{ChartError, Result};
use crate::experiment::SeriesDecl;
use crate::normalize::SeriesSet;
use std::collections::BTreeMap;

/// Line style tokens understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Marker symbols, cycled in declared-series order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Square,
    Star,
    Pentagon,
    TriangleDown,
    Cross,
    TriangleUp,
    Diamond,
    Circle,
    Plus,
    Tick,
    Octagon,
}

/// Finite marker palette with wraparound. Indexed by a series' position in
/// the declared table, never by call order, so assignment is reproducible
/// across runs and inputs.
pub const MARKER_PALETTE: [Marker; 11] = [
    Marker::Square,
    Marker::Star,
    Marker::Pentagon,
    Marker::TriangleDown,
    Marker::Cross,
    Marker::TriangleUp,
    Marker::Diamond,
    Marker::Circle,
    Marker::Plus,
    Marker::Tick,
    Marker::Octagon,
];

/// Color palette for the plotted series, indexed like the marker palette.
pub const COLOR_PALETTE: [(u8, u8, u8); 11] = [
    (66, 133, 244),  // blue
    (219, 68, 55),   // red
    (52, 168, 83),   // green
    (251, 188, 5),   // yellow
    (171, 71, 188),  // purple
    (0, 172, 193),   // cyan
    (255, 112, 67),  // orange
    (158, 157, 36),  // olive
    (92, 107, 192),  // indigo
    (240, 98, 146),  // pink
    (0, 121, 107),   // teal
];

/// Visual identity of one plotted series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescriptor {
    /// Human-readable legend label, distinct from the series key.
    pub label: &'static str,
    pub line_style: LineStyle,
    pub marker: Marker,
    pub color: (u8, u8, u8),
}

/// Assign a [`StyleDescriptor`] to every key of `set` from the declared table.
///
/// A key present in the set but absent from the table is an error; a declared
/// key absent from the set is skipped (not plotted). Marker and color follow
/// the key's position in the declared table, so an algorithm keeps its
/// appearance even when other declared series are missing from the input.
pub fn assign_styles(
    set: &SeriesSet,
    declared: &[SeriesDecl],
) -> Result<BTreeMap<String, StyleDescriptor>> {
    for key in set.keys() {
        if !declared.iter().any(|d| d.key == key) {
            return Err(ChartError::UnknownSeriesKey(key.to_string()));
        }
    }

    let mut styles = BTreeMap::new();
    for (index, decl) in declared.iter().enumerate() {
        if set.get(decl.key).is_none() {
            continue;
        }
        styles.insert(
            decl.key.to_string(),
            StyleDescriptor {
                label: decl.label,
                line_style: decl.line_style,
                marker: MARKER_PALETTE[index % MARKER_PALETTE.len()],
                color: COLOR_PALETTE[index % COLOR_PALETTE.len()],
            },
        );
    }
    Ok(styles)
}
