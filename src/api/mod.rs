pub mod paint;
pub mod palette;
pub mod progress;
pub mod puzzles;

pub use paint::{
    handle_advance, handle_brush, handle_color_progress, handle_paint, handle_select,
    AdvanceResponse, BrushRequest, ColorProgressResponse, PaintRequest, PaintResponse,
    SelectionRequest, SelectionResponse,
};
pub use paint::{
    __path_handle_advance, __path_handle_brush, __path_handle_color_progress,
    __path_handle_paint, __path_handle_select,
};
pub use palette::{handle_palette, PaletteColor, PaletteResponse, __path_handle_palette};
pub use progress::{handle_reset_all, ResetAllResponse, __path_handle_reset_all};
pub use puzzles::{
    handle_close, handle_grid, handle_list_puzzles, handle_open, handle_reset_puzzle,
    handle_state, CloseResponse, GridResponse, ProgressView, PuzzleListResponse, PuzzleSummary,
    SessionResponse, StatusResponse,
};
pub use puzzles::{
    __path_handle_close, __path_handle_grid, __path_handle_list_puzzles, __path_handle_open,
    __path_handle_reset_puzzle, __path_handle_state,
};
