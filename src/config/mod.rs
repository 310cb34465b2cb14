//! Configuration: types, default paths, XML loading and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{
    CONFIG_ENV_VAR, default_config_path, default_data_dir, default_log_path,
    path_has_symlink_ancestor,
};
pub use types::{Config, LogLevel};
pub use xml::{LoadResult, create_template_config, load_config_from_xml_path, load_or_init};

/// Label reported for the removable volume when none is configured.
pub const EXT_LABEL_DEFAULT: &str = "SD";
