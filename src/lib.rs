pub mod api;
pub mod client;
pub mod configs;
pub mod constants;
pub mod modules;
pub mod state;
pub mod utils;

pub use state::AppState;
