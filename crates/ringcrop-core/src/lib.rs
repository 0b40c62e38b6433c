pub mod config;
pub mod consts;
pub mod editor;
pub mod error;
pub mod gallery;
pub mod geometry;
pub mod render;
pub mod session;
pub mod settings;
pub mod worker;
