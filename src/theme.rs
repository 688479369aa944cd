/// Theme system — switchable color palettes for the display model.
///
/// The builder never reads theme state ambiently; a `DisplayTheme` is passed
/// in explicitly and its colors are baked into the produced markers.

use egui::Color32;

use crate::display::tree::AssociationStatus;
use crate::types::qc::MaskVisibilityKey;

/// Available theme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Light,
    Dark,
}

impl ThemeVariant {
    pub fn label(&self) -> &'static str {
        match self {
            ThemeVariant::Light => "Light",
            ThemeVariant::Dark => "Dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "light" => Some(ThemeVariant::Light),
            "dark" => Some(ThemeVariant::Dark),
            _ => None,
        }
    }
}

/// All colors the display model needs to bake into its markers
#[derive(Debug, Clone)]
pub struct DisplayTheme {
    // Pick markers by association status
    pub open_event_pick: Color32,
    pub complete_event_pick: Color32,
    pub other_event_pick: Color32,
    pub unassociated_pick: Color32,

    // Predicted phase markers
    pub predicted_phase: Color32,

    // Selection windows
    pub selection_fill: Color32,
    pub selection_stroke: Color32,
    pub warning_stroke: Color32,

    // Interval boundary markers
    pub boundary_marker: Color32,

    // QC mask fills by visibility key
    pub analyst_defined_mask: Color32,
    pub data_authentication_mask: Color32,
    pub long_term_mask: Color32,
    pub station_soh_mask: Color32,
    pub unprocessed_mask: Color32,
    pub waveform_mask: Color32,
    pub rejected_mask: Color32,
    pub processing_mask: Color32,

    /// Alpha applied to mask fills
    pub mask_opacity: u8,

    pub is_dark: bool,
}

impl DisplayTheme {
    pub fn from_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Light => Self::light(),
            ThemeVariant::Dark => Self::dark(),
        }
    }

    fn light() -> Self {
        Self {
            open_event_pick: Color32::from_rgb(0xD0, 0x30, 0x30),
            complete_event_pick: Color32::from_rgb(0x27, 0x8B, 0x4A),
            other_event_pick: Color32::from_rgb(0x88, 0x8C, 0x94),
            unassociated_pick: Color32::from_rgb(0x2A, 0x2E, 0x36),

            predicted_phase: Color32::from_rgb(0x3B, 0x7D, 0xC0),

            selection_fill: Color32::from_rgba_premultiplied(0x3B, 0x7D, 0xC0, 0x30),
            selection_stroke: Color32::from_rgb(0x3B, 0x7D, 0xC0),
            warning_stroke: Color32::from_rgb(0xB8, 0x8B, 0x00),

            boundary_marker: Color32::from_rgb(0x60, 0x60, 0x60),

            analyst_defined_mask: Color32::from_rgb(0xC0, 0x60, 0x40),
            data_authentication_mask: Color32::from_rgb(0x40, 0x80, 0xC0),
            long_term_mask: Color32::from_rgb(0x90, 0x40, 0xC0),
            station_soh_mask: Color32::from_rgb(0xB8, 0x8B, 0x00),
            unprocessed_mask: Color32::from_rgb(0x88, 0x8C, 0x94),
            waveform_mask: Color32::from_rgb(0x40, 0xA0, 0x60),
            rejected_mask: Color32::from_rgb(0xD0, 0x30, 0x30),
            processing_mask: Color32::from_rgb(0x20, 0x50, 0xA0),

            mask_opacity: 0x50,
            is_dark: false,
        }
    }

    fn dark() -> Self {
        Self {
            open_event_pick: Color32::from_rgb(0xFF, 0x45, 0x55),
            complete_event_pick: Color32::from_rgb(0x3C, 0xC8, 0x78),
            other_event_pick: Color32::from_rgb(0xA0, 0x9E, 0xB8),
            unassociated_pick: Color32::from_rgb(0xE0, 0xE0, 0xF0),

            predicted_phase: Color32::from_rgb(0x5B, 0x9B, 0xD5),

            selection_fill: Color32::from_rgba_premultiplied(0x5B, 0x9B, 0xD5, 0x30),
            selection_stroke: Color32::from_rgb(0x5B, 0x9B, 0xD5),
            warning_stroke: Color32::from_rgb(0xFF, 0xD6, 0x00),

            boundary_marker: Color32::from_rgb(0x8A, 0x8A, 0x9A),

            analyst_defined_mask: Color32::from_rgb(0xE0, 0x78, 0x50),
            data_authentication_mask: Color32::from_rgb(0x50, 0x98, 0xE0),
            long_term_mask: Color32::from_rgb(0xB0, 0x58, 0xE8),
            station_soh_mask: Color32::from_rgb(0xE0, 0xB0, 0x20),
            unprocessed_mask: Color32::from_rgb(0x6A, 0x68, 0x80),
            waveform_mask: Color32::from_rgb(0x50, 0xC0, 0x78),
            rejected_mask: Color32::from_rgb(0xFF, 0x45, 0x55),
            processing_mask: Color32::from_rgb(0x48, 0x70, 0xD0),

            mask_opacity: 0x60,
            is_dark: true,
        }
    }

    /// Pick-marker color for an association status.
    pub fn pick_color(&self, status: AssociationStatus) -> Color32 {
        match status {
            AssociationStatus::OpenEvent => self.open_event_pick,
            AssociationStatus::CompleteEvent => self.complete_event_pick,
            AssociationStatus::OtherEvent => self.other_event_pick,
            AssociationStatus::Unassociated => self.unassociated_pick,
        }
    }

    /// Mask fill for a visibility key, with the theme's mask opacity applied.
    pub fn mask_color(&self, key: MaskVisibilityKey) -> Color32 {
        let base = match key {
            MaskVisibilityKey::AnalystDefined => self.analyst_defined_mask,
            MaskVisibilityKey::DataAuthentication => self.data_authentication_mask,
            MaskVisibilityKey::LongTerm => self.long_term_mask,
            MaskVisibilityKey::StationSoh => self.station_soh_mask,
            MaskVisibilityKey::Unprocessed => self.unprocessed_mask,
            MaskVisibilityKey::Waveform => self.waveform_mask,
            MaskVisibilityKey::Rejected => self.rejected_mask,
            MaskVisibilityKey::ProcessingMasks => self.processing_mask,
        };
        Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), self.mask_opacity)
    }
}

impl Default for DisplayTheme {
    fn default() -> Self {
        Self::light()
    }
}
