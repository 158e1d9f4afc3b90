pub mod console;
pub mod errors;
