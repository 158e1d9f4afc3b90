pub mod containers;
pub mod error_switch;
pub mod functional;
