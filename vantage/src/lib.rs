// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    generate_json_report,
    load_graph,
    render_text_report,
    save_report,
};
