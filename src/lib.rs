/*!
# field-mapper-rs

A schema-driven validator and field mapper for reconciling batches of records from
external sources with an internal data model.

## Overview

A [`Mapper`] checks every record of a batch against a set of field rules, renames the
fields of the records that pass, and reports every problem it found. Invalid records
never abort a batch: the caller gets the clean records and a complete error log together
in a [`ProcessResult`].

## Key Components

* **FieldRule**: The contract for one field: type, maximum length, whether the key and
  the value are required, and an optional custom validator
* **RuleSet**: Ordered field rules; the order fixes the order of the error log
* **RenameMap**: Output names for schema fields
* **Mapper**: Validates and renames batches of records
* **SchemaDefinition**: Declarative JSON configuration compiled into a `Mapper`

## Usage Example

```rust
use field_mapper_rs::{FieldRule, Mapper, RenameMap, RuleSet, predicate};
use serde_json::{Value, json};

fn main() -> field_mapper_rs::Result<()> {
    let rules = RuleSet::from_rules([
        ("name", FieldRule::text().max_length(50)),
        ("phone", FieldRule::text().max_length(15).optional()),
        (
            "email",
            FieldRule::text().validator(predicate("email", |v| {
                v.as_str().is_some_and(|s| s.contains('@') && s.contains('.'))
            })),
        ),
    ])?;
    let mapper = Mapper::with_rename_map(rules, RenameMap::new().rename("email", "contact_email"))?;

    let records: Vec<_> = [
        json!({"name": "Alice", "email": "alice@example.com", "phone": "123"}),
        json!({"email": "bob-example.com"}),
    ]
    .into_iter()
    .filter_map(|v| match v {
        Value::Object(map) => Some(map),
        _ => None,
    })
    .collect();

    let result = mapper.process(&records)?;
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0]["contact_email"], "alice@example.com");

    for error in &result.errors {
        println!("{error}");
    }
    Ok(())
}
```

## Custom Validators

A validator answers `Ok(true)` to accept a value, `Ok(false)` or
[`ValidatorError::Rejected`] to reject it, and [`ValidatorError::Fault`] when it cannot
run at all. Rejections are recorded as `custom_validation_failed`; faults abort the
batch with [`MapperError::ValidatorExecution`].

## Declarative Configuration

```rust
use field_mapper_rs::{Mapper, ValidatorRegistry};

let mapper = Mapper::from_json(
    r#"{
        "fields": {
            "name":  {"type": "text", "max_length": 50},
            "phone": {"type": "text", "max_length": 15, "required": false},
            "email": {"type": "text", "validator": "email"}
        },
        "rename": {"email": "contact_email"}
    }"#,
    &ValidatorRegistry::new(),
)
.unwrap();
assert_eq!(mapper.rules().len(), 3);
```
*/

pub mod engine;

// Re-export all public APIs for easier access
pub use engine::definition::{RuleDefinition, SchemaDefinition};
pub use engine::error::{ErrorReason, FieldError, MapperError, Result};
pub use engine::mapper::{Mapper, MapperBuilder};
pub use engine::result::{BatchSummary, ProcessResult, Record};
pub use engine::rule::{FieldRule, FieldType};
pub use engine::schema::{RenameMap, RuleSet};
pub use engine::validators::{
    SharedValidator, Validator, ValidatorConfig, ValidatorError, ValidatorRegistry,
    ValidatorResult, predicate,
};
