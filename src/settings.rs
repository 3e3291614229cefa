//! Game settings
//!
//! Read once at startup. In the browser they come from an optional
//! `<script id="hangman-settings" type="application/json">` element; nothing
//! is ever written back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Settings loading/validation errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Rules ===
    /// Wrong guesses allowed per round. `None` hands the loss decision to the
    /// ragdoll: the round is lost when the final stage is revealed.
    pub wrong_guess_budget: Option<u8>,
    /// Delay between a loss and the next round (ms)
    pub loss_reset_delay_ms: f64,

    // === Ragdoll ===
    /// Ragdoll size multiplier, also divides pointer coordinates
    pub ragdoll_scale: f32,
    /// Offset subtracted from scaled pointer coordinates
    pub pointer_offset: (f32, f32),
    /// Pointer pull strength, divided across active parts
    pub pointer_strength: f32,

    // === Physics ===
    pub gravity: f32,
    pub constraint_iterations: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wrong_guess_budget: None,
            loss_reset_delay_ms: LOSS_RESET_DELAY_MS,

            ragdoll_scale: RAGDOLL_SCALE,
            pointer_offset: POINTER_OFFSET,
            pointer_strength: POINTER_STRENGTH,

            gravity: GRAVITY,
            constraint_iterations: CONSTRAINT_ITERATIONS,
        }
    }
}

impl Settings {
    /// Settings for the three-strikes rule
    pub fn budgeted() -> Self {
        Self {
            wrong_guess_budget: Some(DEFAULT_WRONG_GUESS_BUDGET),
            ..Self::default()
        }
    }

    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.wrong_guess_budget == Some(0) {
            return Err(SettingsError::Invalid {
                field: "wrong_guess_budget",
                reason: "must allow at least one wrong guess",
            });
        }
        if !self.loss_reset_delay_ms.is_finite() || self.loss_reset_delay_ms < 0.0 {
            return Err(SettingsError::Invalid {
                field: "loss_reset_delay_ms",
                reason: "must be a non-negative number",
            });
        }
        if !self.ragdoll_scale.is_finite() || self.ragdoll_scale <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "ragdoll_scale",
                reason: "must be positive",
            });
        }
        let (offset_x, offset_y) = self.pointer_offset;
        if !offset_x.is_finite() || !offset_y.is_finite() {
            return Err(SettingsError::Invalid {
                field: "pointer_offset",
                reason: "must be finite",
            });
        }
        if !self.pointer_strength.is_finite() {
            return Err(SettingsError::Invalid {
                field: "pointer_strength",
                reason: "must be finite",
            });
        }
        if !self.gravity.is_finite() {
            return Err(SettingsError::Invalid {
                field: "gravity",
                reason: "must be finite",
            });
        }
        if self.constraint_iterations == 0 {
            return Err(SettingsError::Invalid {
                field: "constraint_iterations",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// DOM id of the settings element
    #[allow(dead_code)]
    const ELEMENT_ID: &'static str = "hangman-settings";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring page settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
