//! What a renderer needs to draw the map: the encoded columns for the selected hour, the
//! full list of selectable hours, and the camera and layer settings.
//!
//! Nothing here renders. These types are the hand-off to whatever draws the scene.

use crate::snapshot::{EncodedRecord, Snapshot};
use crate::timeline::TimestampIndex;
use crate::types::forecast::Forecast;
use serde::{Deserialize, Serialize};

/// Initial camera of the 3D map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    /// Camera tilt in degrees.
    pub pitch: f64,
    /// Camera rotation in degrees.
    pub bearing: f64,
}

/// Centered on Japan with the whole country in view.
impl Default for ViewState {
    fn default() -> Self {
        Self {
            latitude: 36.0,
            longitude: 138.0,
            zoom: 4.5,
            pitch: 50.0,
            bearing: 0.0,
        }
    }
}

/// Drawing settings for the extruded temperature columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayerStyle {
    /// Column radius in meters.
    pub radius: f64,
    /// Multiplier applied by the renderer on top of the encoded elevation.
    pub elevation_scale: f64,
    pub pickable: bool,
    pub extruded: bool,
}

impl Default for ColumnLayerStyle {
    fn default() -> Self {
        Self {
            radius: 25_000.0,
            elevation_scale: 1.0,
            pickable: true,
            extruded: true,
        }
    }
}

/// Everything a renderer and a time control need for one selected hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    /// All selectable hours, in first-seen order.
    pub timestamps: Vec<String>,
    /// Position of the hour closest to "now" in `timestamps`.
    pub default_index: usize,
    /// The hour the columns belong to. `None` only when there is no data at all.
    pub selected: Option<String>,
    /// One encoded column per point that has data at `selected`.
    pub columns: Vec<EncodedRecord>,
    pub view: ViewState,
    pub layer: ColumnLayerStyle,
}

impl MapFrame {
    /// Builds the frame for `selected`, or for the index's default hour when `selected`
    /// is `None`.
    ///
    /// A selection that is not in the index produces a frame without columns.
    pub fn build(forecast: &Forecast, index: TimestampIndex, selected: Option<&str>) -> Self {
        let selected = selected
            .map(str::to_string)
            .or_else(|| index.default_timestamp().map(str::to_string));
        let columns = selected
            .as_deref()
            .map(|t| forecast.snapshot(t))
            .unwrap_or_default()
            .entries;
        let (timestamps, default_index) = index.into_parts();

        Self {
            timestamps,
            default_index,
            selected,
            columns,
            view: ViewState::default(),
            layer: ColumnLayerStyle::default(),
        }
    }

    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    pub fn with_layer(mut self, layer: ColumnLayerStyle) -> Self {
        self.layer = layer;
        self
    }

    /// Whether there is anything to draw.
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timestamp: self.selected.clone().unwrap_or_default(),
            entries: self.columns.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
