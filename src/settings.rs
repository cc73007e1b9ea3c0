//! Viewer settings and preferences
//!
//! Persisted separately from the camera pose in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Pixels per cast column; the raycaster's downsampling knob
    pub fn column_step(&self) -> u32 {
        match self {
            QualityPreset::Low => 4,
            QualityPreset::Medium => 2,
            QualityPreset::High => 1,
        }
    }
}

/// Viewer settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === View ===
    /// Horizontal field of view in degrees
    pub fov_degrees: f32,
    /// Maximum wall distance in cells
    pub draw_cells: f32,
    /// Multiplier on pointer-travel turn rate
    pub mouse_sensitivity: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show the controls help panel while playing
    pub show_help: bool,

    // === Accessibility ===
    /// Reduced motion (freeze pattern animation)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            fov_degrees: consts::DEFAULT_FOV_DEGREES,
            draw_cells: consts::DEFAULT_DRAW_CELLS,
            mouse_sensitivity: 1.0,

            show_fps: true,
            show_help: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Field of view in radians
    pub fn fov(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    /// Maximum wall distance in world units
    pub fn draw_distance(&self) -> f32 {
        self.draw_cells * consts::CELL_SIZE
    }

    /// Cast columns for a surface width
    pub fn columns_for_width(&self, width: u32) -> u32 {
        (width / self.quality.column_step()).max(1)
    }

    /// Pattern shader time advance (frozen under reduced motion)
    pub fn pattern_animated(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "gridcast_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
