use serde::{Deserialize, Serialize};

use crate::buffer::Rgb;

/// A palette entry: a color and the opacity it is painted with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Swatch {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Swatch { r, g, b, a }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Palette of paint colors with an optional selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatches {
    pub colors: Vec<Swatch>,
    pub selected: Option<usize>,
}

impl Default for Swatches {
    fn default() -> Self {
        Swatches {
            colors: vec![
                Swatch::new(255, 255, 255, 1.0), // eraser
                Swatch::new(0, 0, 0, 0.4),
                Swatch::new(0, 0, 0, 0.2),
                Swatch::new(0, 0, 0, 0.1),
                Swatch::new(255, 0, 175, 0.4),
                Swatch::new(255, 0, 0, 0.4),
                Swatch::new(255, 150, 0, 0.4),
                Swatch::new(255, 200, 0, 0.4),
                Swatch::new(100, 255, 0, 0.4),
                Swatch::new(0, 255, 255, 0.4),
                Swatch::new(0, 120, 255, 0.4),
                Swatch::new(40, 0, 230, 0.4),
            ],
            selected: Some(1),
        }
    }
}

impl Swatches {
    /// Select a swatch, or clear the selection. Out of range indices clear it.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.colors.len());
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.colors.len() {
            self.colors.remove(index);
        }
        self.select(None);
    }

    pub fn add(&mut self, swatch: Swatch) {
        self.colors.push(swatch);
    }

    pub fn current(&self) -> Option<Swatch> {
        self.selected.and_then(|i| self.colors.get(i).copied())
    }
}
