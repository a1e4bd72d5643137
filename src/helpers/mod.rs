//! Helper functions shared by the renderer, the generator and the publisher

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
