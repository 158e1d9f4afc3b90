//! Sinks at the end of the fetch loop processing chain.

pub mod headless;
pub mod placeholder;

#[cfg(feature = "window")]
pub mod winit;

#[cfg(test)]
mod tests;
