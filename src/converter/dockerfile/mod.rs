//! Dockerfile generation.

mod render;
mod template;

pub use render::{DockerfileRenderer, is_valid_env_key, is_valid_port};
pub use template::DOCKERFILE_TEMPLATE;
