pub mod alert;
pub mod footer;
pub mod header;
pub mod utils;

pub use alert::draw_alert;
pub use footer::draw_footer;
pub use header::draw_header;
pub use utils::{cell, due_status_color, ensure_valid_selection};
