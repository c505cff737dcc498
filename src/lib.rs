pub mod app;
pub mod assets;
pub mod catalog;
pub mod gallery;
pub mod layout;
pub mod models;
pub mod playback;
pub mod session;
pub mod thumbnails;

pub use app::run;
