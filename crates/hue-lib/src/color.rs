use std::fmt::Display;

use ecolor::Color32;
use serde::{Deserialize, Serialize};

/// One of the three colors a prompt can name or be drawn in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    /// All colors in canonical button order.
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    pub fn label(self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Green => "GREEN",
            Color::Blue => "BLUE",
        }
    }

    /// The value used when drawing this color on screen.
    pub fn display_value(self) -> Color32 {
        match self {
            Color::Red => Color32::from_rgb(0xef, 0x44, 0x44),
            Color::Green => Color32::from_rgb(0x10, 0xb9, 0x81),
            Color::Blue => Color32::from_rgb(0x3b, 0x82, 0xf6),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// On-screen order of the three answer buttons.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ButtonOrder([Color; 3]);

impl Default for ButtonOrder {
    fn default() -> Self {
        Self::canonical()
    }
}

impl ButtonOrder {
    pub const fn canonical() -> Self {
        Self(Color::ALL)
    }

    /// Moves the first button to the last position.
    pub fn rotate(&mut self) {
        self.0.rotate_left(1);
    }

    /// The color of the button in on-screen slot `position` (zero based).
    pub fn get(&self, position: usize) -> Option<Color> {
        self.0.get(position).copied()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.0
    }

    pub fn is_canonical(&self) -> bool {
        *self == Self::canonical()
    }
}
