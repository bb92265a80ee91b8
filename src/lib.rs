pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod sim;
pub mod surface;
pub mod trace;

pub use config::VizConfig;
pub use error::{RenderError, VizError, VizResult};
pub use session::Session;

#[cfg(test)]
mod test;
