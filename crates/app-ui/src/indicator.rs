//! Travel-mode indicator shown under the address input

use i18n::Translator;
use maps_client::TravelMode;

/// One segment of the indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorItem {
    /// Mode the segment selects
    pub mode: TravelMode,
    /// Localized label
    pub label: String,
    /// Whether this is the selected segment
    pub selected: bool,
}

/// Segmented walking / two-wheeler / driving selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TravelModeIndicator {
    selected: TravelMode,
}

impl TravelModeIndicator {
    /// Selected mode
    pub fn selected(&self) -> TravelMode {
        self.selected
    }

    /// Select the segment at `index` and return its mode
    pub fn select(&mut self, index: usize) -> TravelMode {
        self.selected = TravelMode::from_index(index);
        self.selected
    }

    /// Segments in display order
    pub fn items(&self, tr: &Translator) -> Vec<IndicatorItem> {
        TravelMode::ALL
            .iter()
            .map(|&mode| IndicatorItem {
                mode,
                label: tr.tr(label_id(mode)),
                selected: mode == self.selected,
            })
            .collect()
    }
}

/// Message id of a travel mode's label
pub fn label_id(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walking => "travel-mode-walking",
        TravelMode::TwoWheeler => "travel-mode-two-wheeler",
        TravelMode::Driving => "travel-mode-driving",
    }
}
