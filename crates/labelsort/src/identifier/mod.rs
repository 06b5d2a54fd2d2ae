pub mod matcher;
pub mod normalizer;

pub use matcher::PatternMatcher;
pub use normalizer::PatternNormalizer;
