//! Plain-value keyboard configuration.
//!
//! Everything the core needs from the settings layer arrives as explicit
//! values - the engine never reads ambient global state.

use serde::{Deserialize, Serialize};

use crate::note::Note;

/// Black keys are narrower than white keys by this ratio.
pub const BLACK_KEY_WIDTH_RATIO: f32 = 0.75;

/// Black keys are shorter than white keys by this ratio.
pub const BLACK_KEY_HEIGHT_RATIO: f32 = 0.6;

/// Which keys get a text label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyLabels {
    #[default]
    Off,
    /// Only the C of each octave.
    COnly,
    /// Every white key.
    All,
}

impl KeyLabels {
    /// The label to draw on a key, if any. Accented keys are never labeled.
    pub fn label_for(self, note: Note) -> Option<String> {
        match self {
            KeyLabels::All if !note.accented() => Some(note.label_with_sharps()),
            KeyLabels::COnly if note.note_index() == 0 => Some(note.label_with_sharps()),
            _ => None,
        }
    }
}

/// Session-level settings supplied by the settings store.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// White key width in keyboard coordinates.
    pub key_width: f32,
    /// When true, a contact sliding across keys reassigns legato; when
    /// false the contact stays on the key it first touched.
    pub keyboard_slides: bool,
    pub key_labels: KeyLabels,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        KeyboardConfig {
            key_width: 64.0,
            keyboard_slides: false,
            key_labels: KeyLabels::Off,
        }
    }
}

/// Geometry inputs for [`crate::layout_frames`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub key_width: f32,
    /// Horizontal gap between adjacent white keys.
    pub key_spacing: f32,
    /// Full white-key height.
    pub keyboard_height: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        LayoutMetrics {
            key_width: 64.0,
            key_spacing: 2.0,
            keyboard_height: 200.0,
        }
    }
}

impl LayoutMetrics {
    pub fn from_config(config: &KeyboardConfig, keyboard_height: f32) -> Self {
        LayoutMetrics {
            key_width: config.key_width,
            keyboard_height,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_labels() {
        let c4 = Note::new(60);
        let cs4 = Note::new(61);
        let d4 = Note::new(62);

        assert_eq!(KeyLabels::Off.label_for(c4), None);
        assert_eq!(KeyLabels::All.label_for(c4), Some("C4".to_owned()));
        assert_eq!(KeyLabels::All.label_for(d4), Some("D4".to_owned()));
        assert_eq!(KeyLabels::All.label_for(cs4), None);
        assert_eq!(KeyLabels::COnly.label_for(c4), Some("C4".to_owned()));
        assert_eq!(KeyLabels::COnly.label_for(d4), None);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = KeyboardConfig {
            key_width: 48.0,
            keyboard_slides: true,
            key_labels: KeyLabels::COnly,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: KeyboardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
