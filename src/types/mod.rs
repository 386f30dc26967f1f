pub mod identifiers;
pub mod reports;

pub use identifiers::{ClusterId, RootId, SemanticCategory};
pub use reports::*;
