//! Intent classification (component C): a pure, rule-based labeler.

mod classifier;
mod keywords;

pub use classifier::{classify, Classification};
pub use keywords::IntentClass;
