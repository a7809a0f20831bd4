pub mod downloaded_file;
pub mod encoding;
pub mod error;
pub mod history;
pub mod pieces;
pub mod search;
pub mod shared_file;
pub mod signatures;
pub mod trust;
