use crossterm::style::Color;
use cube_core::Color as Sticker;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Panel title color
    pub title: Color,
    /// Status and label text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
    /// Message banner background
    pub banner_bg: Color,
    /// Error text
    pub error: Color,
    /// Search-produced solution
    pub success: Color,
    /// Reversal or backtrack solution
    pub fallback: Color,
    /// One color per sticker label, in label order
    pub stickers: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 20, g: 22, b: 30 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            title: Color::Rgb { r: 130, g: 140, b: 170 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
            banner_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            fallback: Color::Rgb { r: 255, g: 170, b: 60 },
            stickers: [
                Color::Rgb { r: 245, g: 245, b: 245 },
                Color::Rgb { r: 0, g: 170, b: 70 },
                Color::Rgb { r: 200, g: 20, b: 30 },
                Color::Rgb { r: 0, g: 80, b: 200 },
                Color::Rgb { r: 255, g: 120, b: 0 },
                Color::Rgb { r: 255, g: 215, b: 0 },
            ],
        }
    }

    pub fn sticker(&self, color: Sticker) -> Color {
        self.stickers[color.label() as usize]
    }
}
