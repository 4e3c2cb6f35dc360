pub mod definition;
pub mod error;
pub mod mapper;
pub mod result;
pub mod rule;
pub mod schema;
pub mod utils;
pub mod validators;

// Re-export key types for easier access
pub use definition::{RuleDefinition, SchemaDefinition};
pub use error::{ErrorReason, FieldError, MapperError, Result};
pub use mapper::{Mapper, MapperBuilder};
pub use result::{BatchSummary, ProcessResult, Record};
pub use rule::{FieldRule, FieldType};
pub use schema::{RenameMap, RuleSet};
pub use validators::{
    SharedValidator, Validator, ValidatorConfig, ValidatorError, ValidatorRegistry,
    ValidatorResult, predicate,
};
