pub mod pattern;
pub mod report;

pub use pattern::PatternError;
pub use report::report;
