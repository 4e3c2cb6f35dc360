use crate::engine::error::{MapperError, Result};
use crate::engine::rule::FieldRule;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Ordered set of field rules keyed by schema field name
///
/// Fields are evaluated in insertion order, which also fixes the order of
/// entries in the error log.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: IndexMap<String, FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field rule after validating it
    pub fn insert(&mut self, field: impl Into<String>, rule: FieldRule) -> Result<()> {
        let field = field.into();
        if field.is_empty() {
            return Err(MapperError::configuration("Field name cannot be empty"));
        }
        if self.rules.contains_key(&field) {
            return Err(MapperError::configuration(format!(
                "Duplicate rule for field '{field}'"
            )));
        }
        rule.check(&field)?;
        self.rules.insert(field, rule);
        Ok(())
    }

    /// Builder-style [`RuleSet::insert`]
    pub fn with_field(mut self, field: impl Into<String>, rule: FieldRule) -> Result<Self> {
        self.insert(field, rule)?;
        Ok(self)
    }

    /// Build a rule set from (field, rule) pairs, keeping their order
    pub fn from_rules<I, S>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, FieldRule)>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for (field, rule) in rules {
            set.insert(field, rule)?;
        }
        Ok(set)
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.rules.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Translation table from schema field names to output field names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    names: HashMap<String, String>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, target: impl Into<String>) {
        self.names.insert(field.into(), target.into());
    }

    /// Builder-style [`RenameMap::insert`]
    pub fn rename(mut self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.insert(field, target);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.names.get(field).map(String::as_str)
    }

    /// Output name for a field: the mapped name, or the field's own name
    pub fn output_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.get(field).unwrap_or(field)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reject entries that would lose data or reference unknown fields
    pub fn check(&self, rules: &RuleSet) -> Result<()> {
        let mut sources = self.names.keys().collect::<Vec<_>>();
        sources.sort();
        for field in sources {
            if !rules.contains(field) {
                return Err(MapperError::configuration(format!(
                    "Rename map references unknown field '{field}'"
                )));
            }
            if self.names[field].is_empty() {
                return Err(MapperError::configuration(format!(
                    "Rename target for field '{field}' cannot be empty"
                )));
            }
        }

        let mut claimed: HashMap<&str, &str> = HashMap::new();
        for field in rules.field_names() {
            let output = self.output_name(field);
            if let Some(previous) = claimed.insert(output, field) {
                return Err(MapperError::configuration(format!(
                    "Fields '{previous}' and '{field}' both map to output name '{output}'"
                )));
            }
        }

        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for RenameMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_rules() -> RuleSet {
        RuleSet::from_rules([
            ("name", FieldRule::text().max_length(50)),
            ("email", FieldRule::text()),
            ("phone", FieldRule::text().max_length(15).optional()),
        ])
        .unwrap()
    }

    #[test]
    fn test_rule_set_keeps_insertion_order() {
        let rules = contact_rules();
        let names: Vec<&str> = rules.field_names().collect();
        assert_eq!(names, vec!["name", "email", "phone"]);
        assert_eq!(rules.len(), 3);
        assert!(rules.contains("email"));
        assert!(rules.get("missing").is_none());
    }

    #[test]
    fn test_rule_set_rejects_duplicates() {
        let err = RuleSet::new()
            .with_field("name", FieldRule::text())
            .and_then(|rules| rules.with_field("name", FieldRule::integer()))
            .unwrap_err();
        assert!(err.to_string().contains("Duplicate rule for field 'name'"));
    }

    #[test]
    fn test_rule_set_rejects_empty_name() {
        assert!(RuleSet::new().with_field("", FieldRule::text()).is_err());
    }

    #[test]
    fn test_rule_set_checks_rules() {
        let result = RuleSet::from_rules([("age", FieldRule::integer().max_length(3))]);
        assert!(matches!(result, Err(MapperError::Configuration(_))));
    }

    #[test]
    fn test_rename_output_name() {
        let renames = RenameMap::new().rename("email", "contact_email");
        assert_eq!(renames.output_name("email"), "contact_email");
        assert_eq!(renames.output_name("name"), "name");
        assert!(renames.check(&contact_rules()).is_ok());
    }

    #[test]
    fn test_rename_unknown_field() {
        let renames: RenameMap = [("fax", "fax_number")].into_iter().collect();
        let err = renames.check(&contact_rules()).unwrap_err();
        assert!(err.to_string().contains("unknown field 'fax'"));
    }

    #[test]
    fn test_rename_empty_target() {
        let renames = RenameMap::new().rename("email", "");
        assert!(renames.check(&contact_rules()).is_err());
    }

    #[test]
    fn test_rename_collision_between_targets() {
        let renames = RenameMap::new()
            .rename("email", "contact")
            .rename("phone", "contact");
        let err = renames.check(&contact_rules()).unwrap_err();
        assert!(err.to_string().contains("'contact'"));
    }

    #[test]
    fn test_rename_collision_with_unrenamed_field() {
        let renames = RenameMap::new().rename("email", "name");
        let err = renames.check(&contact_rules()).unwrap_err();
        assert!(
            err.to_string()
                .contains("Fields 'name' and 'email' both map to output name 'name'")
        );
    }

    #[test]
    fn test_rename_swap_is_allowed() {
        let renames = RenameMap::new()
            .rename("name", "email")
            .rename("email", "name");
        assert!(renames.check(&contact_rules()).is_ok());
    }
}
