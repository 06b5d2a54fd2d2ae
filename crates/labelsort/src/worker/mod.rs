pub mod item;
pub mod scanner;

pub use item::ImageItem;
pub use scanner::DirectoryScanner;
