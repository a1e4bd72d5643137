//! Configuration module

mod site;

pub use site::GitHubConfig;
pub use site::LlmConfig;
pub use site::SiteConfig;
