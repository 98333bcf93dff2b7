pub mod output;
pub use output::{source_map_path, write_result};
