//! Shared filesystem and list utilities used across vnfsctl modules.

pub mod files;
pub mod lists;
pub mod paths;
pub mod temp;
pub mod validate;

pub use files::{read_lines, sha256_file};
pub use lists::{add_unique_element, remove_element};
pub use paths::{find_files, is_dir, is_file};
pub use temp::{cleanup_work_dir, prepare_work_dir, swap_into_place};
pub use validate::{valid_string, validate};
