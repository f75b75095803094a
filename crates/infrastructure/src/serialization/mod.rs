//! YAML serialization for TplKit config files.

mod yaml;

pub use yaml::*;
