pub mod banner;
pub mod messages;
pub mod render;
