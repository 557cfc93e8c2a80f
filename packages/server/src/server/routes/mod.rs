mod analyze;
mod health;
mod process_pdf;

pub use analyze::analyze_990_handler;
pub use health::health_handler;
pub use process_pdf::process_pdf_handler;
