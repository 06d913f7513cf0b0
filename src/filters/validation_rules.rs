use super::SchemaFilter;
use utoipa::openapi::schema::{Object, Schema, SchemaFormat};
use utoipa::openapi::RefOr;

/// Constraint enforced on a request property by the service's input validation
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Length { min: Option<usize>, max: Option<usize> },
    Range { min: Option<f64>, max: Option<f64> },
    Email,
    Required,
}

/// Binds a [Rule] to one property of one component schema
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRule {
    pub schema: String,
    pub property: String,
    pub rule: Rule,
}

impl PropertyRule {
    pub fn new(schema: impl Into<String>, property: impl Into<String>, rule: Rule) -> Self {
        PropertyRule {
            schema: schema.into(),
            property: property.into(),
            rule,
        }
    }
}

/// Mirrors the service's validation rules into the generated schemas, so documented
/// constraints match the ones the API enforces. Keywords already present are kept.
pub struct ValidationRulesSchemaFilter {
    rules: Vec<PropertyRule>,
}

impl ValidationRulesSchemaFilter {
    pub fn new(rules: Vec<PropertyRule>) -> Self {
        ValidationRulesSchemaFilter { rules }
    }
}

fn apply_to_property(property: &mut Object, rule: &Rule) {
    match rule {
        Rule::Length { min, max } => {
            property.min_length = property.min_length.or(*min);
            property.max_length = property.max_length.or(*max);
        }
        Rule::Range { min, max } => {
            property.minimum = property.minimum.or(*min);
            property.maximum = property.maximum.or(*max);
        }
        Rule::Email => {
            property
                .format
                .get_or_insert_with(|| SchemaFormat::Custom("email".to_owned()));
        }
        Rule::Required => {}
    }
}

impl SchemaFilter for ValidationRulesSchemaFilter {
    fn apply(&self, schema_name: &str, schema: &mut Schema) {
        let Schema::Object(object) = schema else {
            return;
        };

        for rule in self.rules.iter().filter(|rule| rule.schema == schema_name) {
            if rule.rule == Rule::Required {
                if object.properties.contains_key(&rule.property) && !object.required.contains(&rule.property) {
                    object.required.push(rule.property.clone());
                }
                continue;
            }

            if let Some(RefOr::T(Schema::Object(property))) = object.properties.get_mut(&rule.property) {
                apply_to_property(property, &rule.rule);
            }
        }
    }
}
