//! Physical page geometry of the card, in inches.

use common::requests::{Orientation, RenderFormat};

/// One face of the folded card.
pub const PANEL_WIDTH_IN: f64 = 5.125;
pub const PANEL_HEIGHT_IN: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl PageSize {
    pub const fn new(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
        }
    }

    pub fn width_css(&self) -> String {
        inches(self.width_in)
    }

    pub fn height_css(&self) -> String {
        inches(self.height_in)
    }
}

pub fn inches(value: f64) -> String {
    format!("{}in", value)
}

/// How the two halves of a sheet are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// A lone panel, no blank half.
    Single,
    /// Halves left and right; content on the right.
    SideBySide,
    /// Halves top and bottom; content at the bottom.
    Stacked,
}

/// Overall page size plus the box the card content occupies on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetGeometry {
    pub overall: PageSize,
    pub content: PageSize,
    pub arrangement: Arrangement,
}

impl SheetGeometry {
    pub fn single() -> Self {
        let panel = PageSize::new(PANEL_WIDTH_IN, PANEL_HEIGHT_IN);
        Self {
            overall: panel,
            content: panel,
            arrangement: Arrangement::Single,
        }
    }

    /// A full print sheet. Portrait transposes the landscape sheet, which
    /// turns each half into a 7in x 5.125in box.
    pub fn spread(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Landscape => Self {
                overall: PageSize::new(PANEL_WIDTH_IN * 2.0, PANEL_HEIGHT_IN),
                content: PageSize::new(PANEL_WIDTH_IN, PANEL_HEIGHT_IN),
                arrangement: Arrangement::SideBySide,
            },
            Orientation::Portrait => Self {
                overall: PageSize::new(PANEL_HEIGHT_IN, PANEL_WIDTH_IN * 2.0),
                content: PageSize::new(PANEL_HEIGHT_IN, PANEL_WIDTH_IN),
                arrangement: Arrangement::Stacked,
            },
        }
    }

    pub fn select(format: RenderFormat, spread: bool, orientation: Orientation) -> Self {
        if spread || format == RenderFormat::Production {
            Self::spread(orientation)
        } else {
            Self::single()
        }
    }

    pub fn has_blank_half(&self) -> bool {
        self.arrangement != Arrangement::Single
    }

    /// Top-left corner of the content box, `(left, top)`.
    pub fn content_origin(&self) -> (f64, f64) {
        match self.arrangement {
            Arrangement::Single => (0.0, 0.0),
            Arrangement::SideBySide => (self.overall.width_in - self.content.width_in, 0.0),
            Arrangement::Stacked => (0.0, self.overall.height_in - self.content.height_in),
        }
    }

    /// Top-left corner of the blank half, `(left, top)`.
    pub fn blank_origin(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    /// Absolute-position CSS for the content box.
    pub fn content_box_css(&self) -> String {
        let (left, top) = self.content_origin();
        box_css(left, top, self.content)
    }

    /// Absolute-position CSS for the blank half. Same size as the content box.
    pub fn blank_box_css(&self) -> String {
        let (left, top) = self.blank_origin();
        box_css(left, top, self.content)
    }
}

fn box_css(left: f64, top: f64, size: PageSize) -> String {
    format!(
        "left: {}; top: {}; width: {}; height: {};",
        inches(left),
        inches(top),
        size.width_css(),
        size.height_css()
    )
}
