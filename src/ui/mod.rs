mod app;
mod panels;
mod state;
mod widgets;
pub mod services;

pub use app::PredictorApp;
pub use state::AppState;
