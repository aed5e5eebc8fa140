pub mod debounce;
pub mod image_loader;
pub mod progress_store;
pub mod progress_writer;
pub mod session_manager;

pub use debounce::Debouncer;
pub use image_loader::{decode_png, load_puzzle_image};
pub use progress_store::{FileStore, MemoryStore};
pub use progress_writer::ProgressWriter;
pub use session_manager::{PaintOutcome, Session, SessionManager};
