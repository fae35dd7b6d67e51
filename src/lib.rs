pub mod audio;
pub mod audio_api;
pub mod config;
pub mod error;
pub mod ids;
pub mod loader;
pub mod middle;
pub mod music;
pub mod pipeline;
pub mod shared;
pub mod tui;

#[cfg(test)]
mod test_support;
