pub mod server;
pub mod settings;

pub use server::{app, run, AppState};
