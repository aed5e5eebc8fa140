//! Test fixtures and constants.

/// Puzzle ids from the embedded config.yaml
pub mod puzzles {
    pub const HEART: &str = "heart";
    pub const GIFTY: &str = "gifty";
    pub const SNOWMAN: &str = "snowman";
    pub const CLOCK: &str = "clock";
    pub const UNKNOWN: &str = "dragon";
}

/// Facts about the embedded heart.png quantized with the classic palette.
///
/// 16x16 cells: red (4) fills the heart, three near-white highlight cells
/// (5) are enclosed by red so they stay paintable, black (9) outlines it.
pub mod heart {
    pub const WIDTH: usize = 16;
    pub const HEIGHT: usize = 16;
    pub const PAINTABLE: usize = 114;
    pub const RED: usize = 79;
    pub const WHITE: usize = 3;
    pub const BLACK: usize = 32;

    /// A red cell
    pub const RED_CELL: (i64, i64) = (4, 3);
    /// A black outline cell
    pub const BLACK_CELL: (i64, i64) = (3, 2);
    /// A background corner cell
    pub const BACKGROUND_CELL: (i64, i64) = (0, 0);
}

/// JSON body for a paint request
pub fn paint_body(x: i64, y: i64, selected: Option<u8>) -> String {
    match selected {
        Some(s) => format!(r#"{{"x": {x}, "y": {y}, "selected": {s}}}"#),
        None => format!(r#"{{"x": {x}, "y": {y}}}"#),
    }
}

/// JSON body for a brush request
pub fn brush_body(x: i64, y: i64, radius: i64, selected: u8) -> String {
    format!(r#"{{"x": {x}, "y": {y}, "radius": {radius}, "selected": {selected}}}"#)
}

/// A brush request that covers the whole heart grid
pub fn fill_body(selected: u8) -> String {
    brush_body(8, 8, 16, selected)
}
