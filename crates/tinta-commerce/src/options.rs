//! Print job options.
//!
//! Each option enum carries its wire token (`as_str`) and a human display
//! name. Wire tokens match what the pricing collaborator expects.

use serde::{Deserialize, Serialize};

/// Color mode for a print job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColorMode {
    /// Full color printing.
    #[default]
    #[serde(rename = "color")]
    FullColor,
    /// Black and white printing.
    #[serde(rename = "bn")]
    Grayscale,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::FullColor => "color",
            ColorMode::Grayscale => "bn",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ColorMode::FullColor => "Color",
            ColorMode::Grayscale => "Blanco y negro",
        }
    }
}

/// Paper stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaperStock {
    #[default]
    #[serde(rename = "bond")]
    Bond,
    #[serde(rename = "laser")]
    Laser,
    #[serde(rename = "fotografico")]
    Photo,
}

impl PaperStock {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperStock::Bond => "bond",
            PaperStock::Laser => "laser",
            PaperStock::Photo => "fotografico",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaperStock::Bond => "Bond",
            PaperStock::Laser => "Láser",
            PaperStock::Photo => "Fotográfico",
        }
    }
}

/// Page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PageSize {
    #[default]
    #[serde(rename = "carta")]
    Carta,
    #[serde(rename = "oficio")]
    Oficio,
    #[serde(rename = "doble carta")]
    DobleCarta,
}

impl PageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::Carta => "carta",
            PageSize::Oficio => "oficio",
            PageSize::DobleCarta => "doble carta",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PageSize::Carta => "Carta",
            PageSize::Oficio => "Oficio",
            PageSize::DobleCarta => "Doble carta",
        }
    }
}

/// Single or double sided printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sides {
    #[default]
    #[serde(rename = "una cara")]
    Single,
    #[serde(rename = "dos caras")]
    Double,
}

impl Sides {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sides::Single => "una cara",
            Sides::Double => "dos caras",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sides::Single => "Una cara",
            Sides::Double => "Dos caras",
        }
    }
}

/// A free-text page range ("1-5, 8, 11-13").
///
/// Input is sanitized on construction: only digits, commas, hyphens and
/// whitespace survive. An empty range means "print everything".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PageRange(String);

impl PageRange {
    /// Sanitize raw input into a page range.
    pub fn new(raw: &str) -> Self {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '-') || c.is_whitespace())
            .collect();
        Self(cleaned.trim().to_string())
    }

    /// An empty range (print everything).
    pub fn all() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display label, falling back to "Todo (N)" when no range is set.
    pub fn display_label(&self, page_count: u32) -> String {
        if self.0.is_empty() {
            format!("Todo ({})", page_count)
        } else {
            self.0.clone()
        }
    }
}
