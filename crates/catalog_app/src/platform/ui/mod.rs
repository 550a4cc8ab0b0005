mod constants;
mod layout;
pub mod render;
