pub mod error;
pub mod extract;
pub mod intent;
pub mod models;

pub use error::CollaboratorError;
pub use extract::{extract_identifier, Identifier, IdentifierKind};
pub use intent::{classify_intent, normalize_text, ClassifierRules};
pub use models::*;
