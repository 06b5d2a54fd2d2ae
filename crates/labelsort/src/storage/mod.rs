pub mod filesystem;
pub mod resolver;

pub use filesystem::{ensure_directory, move_file, FileStorage, Placement};
pub use resolver::DestinationResolver;
