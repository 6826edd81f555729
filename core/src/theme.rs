//! Presentation constants handed to the host UI.
//!
//! Plain data with a `Default`; the host reads it once and passes it down
//! its own widget tree.

/// Colors are `0xAARRGGBB`, spacing values are logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub primary: u32,
    pub secondary: u32,
    pub background: u32,
    pub surface: u32,
    pub error: u32,
    pub savings_highlight: u32,
    pub text_primary: u32,
    pub text_secondary: u32,
    pub spacing_small: f32,
    pub spacing_medium: f32,
    pub spacing_large: f32,
    pub corner_radius: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: 0xFF1E88E5,
            secondary: 0xFF43A047,
            background: 0xFFF5F7FA,
            surface: 0xFFFFFFFF,
            error: 0xFFE53935,
            savings_highlight: 0xFF2E7D32,
            text_primary: 0xFF212121,
            text_secondary: 0xFF757575,
            spacing_small: 8.0,
            spacing_medium: 16.0,
            spacing_large: 24.0,
            corner_radius: 12.0,
        }
    }
}
