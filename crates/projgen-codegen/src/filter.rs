//! Field inclusion and skip policies applied before projection generation.

use crate::config::CodeGenConfig;
use crate::parser::FieldDef;

/// Keep only the fields `config` allows for `owner`.
///
/// Types without an `include_fields` entry keep every field.
pub fn filter_included_in_config<'a>(
    fields: Vec<&'a FieldDef>,
    owner: &str,
    config: &CodeGenConfig,
) -> Vec<&'a FieldDef> {
    match config.included_fields(owner) {
        Some(allowed) => fields
            .into_iter()
            .filter(|f| allowed.contains(&f.name))
            .collect(),
        None => fields,
    }
}

/// Drop fields marked `@skipcodegen`.
pub fn filter_skipped(fields: Vec<&FieldDef>) -> Vec<&FieldDef> {
    fields.into_iter().filter(|f| !f.is_skipped()).collect()
}

/// Apply both policies, preserving source order.
pub fn filter_fields<'a>(
    fields: Vec<&'a FieldDef>,
    owner: &str,
    config: &CodeGenConfig,
) -> Vec<&'a FieldDef> {
    filter_skipped(filter_included_in_config(fields, owner, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use std::collections::BTreeSet;

    const SCHEMA: &str = r#"
        type Person {
            id: ID!
            firstname: String
            lastname: String
            secret: String @skipcodegen
        }
    "#;

    fn names(fields: &[&FieldDef]) -> Vec<String> {
        fields.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn no_restriction_keeps_all_but_skipped() {
        let doc = parse(SCHEMA);
        let person = doc.definition("Person").unwrap();
        let fields = filter_fields(person.fields.iter().collect(), "Person", &CodeGenConfig::default());
        assert_eq!(names(&fields), vec!["id", "firstname", "lastname"]);
    }

    #[test]
    fn inclusion_restricts_and_keeps_order() {
        let doc = parse(SCHEMA);
        let person = doc.definition("Person").unwrap();
        let mut config = CodeGenConfig::default();
        config.include_fields.insert(
            "Person".to_string(),
            BTreeSet::from(["lastname".to_string(), "id".to_string()]),
        );
        let fields = filter_fields(person.fields.iter().collect(), "Person", &config);
        assert_eq!(names(&fields), vec!["id", "lastname"]);
    }

    #[test]
    fn skip_wins_over_inclusion() {
        let doc = parse(SCHEMA);
        let person = doc.definition("Person").unwrap();
        let mut config = CodeGenConfig::default();
        config.include_fields.insert(
            "Person".to_string(),
            BTreeSet::from(["secret".to_string(), "firstname".to_string()]),
        );
        let fields = filter_fields(person.fields.iter().collect(), "Person", &config);
        assert_eq!(names(&fields), vec!["firstname"]);
    }

    #[test]
    fn restriction_is_keyed_by_owner() {
        let doc = parse(SCHEMA);
        let person = doc.definition("Person").unwrap();
        let mut config = CodeGenConfig::default();
        config
            .include_fields
            .insert("Query".to_string(), BTreeSet::new());
        let fields = filter_included_in_config(person.fields.iter().collect(), "Person", &config);
        assert_eq!(fields.len(), 4);
        let fields = filter_included_in_config(person.fields.iter().collect(), "Query", &config);
        assert!(fields.is_empty());
    }
}
