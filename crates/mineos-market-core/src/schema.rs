//! # Response Schemas
//!
//! Declarative shape descriptions for decoded responses and a recursive
//! validator over them.
//!
//! ## Kinds
//!
//! | Kind | Accepts |
//! |------|---------|
//! | [`Schema::Any`] | any present value |
//! | [`Schema::String`] | strings, optionally e-mail shaped |
//! | [`Schema::Number`] | integers and floats, optional integer flag and bounds |
//! | [`Schema::Boolean`] | booleans |
//! | [`Schema::Literal`] | one exact value |
//! | [`Schema::Enum`] | one of a declared set of members |
//! | [`Schema::Object`] | mappings with required/optional fields |
//! | [`Schema::Array`] | sequences, every element checked |
//! | [`Schema::Record`] | mappings, every value checked |
//! | [`Schema::Optional`] | `nil`/absent, or the inner schema |
//! | [`Schema::Union`] | the first matching alternative |
//! | [`Schema::Tagged`] | mappings whose tag field selects the variant |
//! | [`Schema::Lazy`] | a schema built on demand, for recursive shapes |
//!
//! Validation never stops at the first problem: every violation in the tree
//! is collected so a caller sees the whole picture in one pass.
//!
//! ## Example
//!
//! ```rust
//! use mineos_market_core::codec::decode;
//! use mineos_market_core::schema::{validate, NumberSchema, ObjectSchema, Schema};
//!
//! let schema = Schema::object(
//!     ObjectSchema::new()
//!         .required("id", Schema::integer())
//!         .required("rating", NumberSchema::integer().min(1.0).max(5.0).into()),
//! );
//!
//! let value = decode("{id=1,rating=9}").unwrap();
//! let violations = validate(&value, &schema).unwrap_err();
//! assert_eq!(violations[0].path.to_string(), "rating");
//! ```

use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::de::DeserializeOwned;

use crate::value::LuaValue;

/// One step into a decoded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a decoded tree, e.g. `[2].votes.total`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[PathSegment]> for FieldPath {
    fn from(segments: &[PathSegment]) -> Self {
        Self(segments.to_vec())
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }

        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A single mismatch between a value and its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: FieldPath,
    pub message: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "field {}: {}", self.path, self.message)
    }
}

/// Non-empty, ordered list of violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn single(path: FieldPath, message: impl Into<String>) -> Self {
        Self(vec![Violation {
            path,
            message: message.into(),
        }])
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl Deref for Violations {
    type Target = [Violation];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (position, violation) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Bounds and integrality for numeric fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumberSchema {
    pub integer: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberSchema {
    pub const fn any() -> Self {
        Self {
            integer: false,
            min: None,
            max: None,
        }
    }

    pub const fn integer() -> Self {
        Self {
            integer: true,
            min: None,
            max: None,
        }
    }

    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

impl From<NumberSchema> for Schema {
    fn from(number: NumberSchema) -> Self {
        Self::Number(number)
    }
}

/// A closed set of accepted values, e.g. the ids of a wire enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumSchema {
    pub name: &'static str,
    pub members: Vec<LuaValue>,
}

/// A named field of an [`ObjectSchema`].
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub required: bool,
    pub schema: Schema,
}

/// Field set of a mapping. Fields not listed are ignored.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub fields: Vec<FieldSchema>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &'static str, schema: Schema) -> Self {
        self.fields.push(FieldSchema {
            name,
            required: true,
            schema,
        });
        self
    }

    pub fn optional(mut self, name: &'static str, schema: Schema) -> Self {
        self.fields.push(FieldSchema {
            name,
            required: false,
            schema,
        });
        self
    }
}

/// Variants of a mapping told apart by the value of one field.
#[derive(Debug, Clone)]
pub struct TaggedSchema {
    pub tag: &'static str,
    pub variants: Vec<(LuaValue, Schema)>,
}

/// Expected shape of a decoded value.
#[derive(Debug, Clone)]
pub enum Schema {
    Any,
    String { email: bool },
    Number(NumberSchema),
    Boolean,
    Literal(LuaValue),
    Enum(EnumSchema),
    Object(ObjectSchema),
    Array(Box<Schema>),
    Record(Box<Schema>),
    Optional(Box<Schema>),
    Union(Vec<Schema>),
    Tagged(TaggedSchema),
    Lazy(fn() -> Schema),
}

impl Schema {
    pub const fn string() -> Self {
        Self::String { email: false }
    }

    pub const fn email() -> Self {
        Self::String { email: true }
    }

    pub const fn number() -> Self {
        Self::Number(NumberSchema::any())
    }

    pub const fn integer() -> Self {
        Self::Number(NumberSchema::integer())
    }

    pub fn literal(value: impl Into<LuaValue>) -> Self {
        Self::Literal(value.into())
    }

    pub fn enumeration(name: &'static str, members: impl IntoIterator<Item = LuaValue>) -> Self {
        Self::Enum(EnumSchema {
            name,
            members: members.into_iter().collect(),
        })
    }

    pub const fn object(object: ObjectSchema) -> Self {
        Self::Object(object)
    }

    pub fn array(item: Self) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn record(value: Self) -> Self {
        Self::Record(Box::new(value))
    }

    pub fn union(alternatives: impl IntoIterator<Item = Self>) -> Self {
        Self::Union(alternatives.into_iter().collect())
    }

    pub fn tagged(tag: &'static str, variants: impl IntoIterator<Item = (LuaValue, Self)>) -> Self {
        Self::Tagged(TaggedSchema {
            tag,
            variants: variants.into_iter().collect(),
        })
    }

    pub const fn lazy(build: fn() -> Self) -> Self {
        Self::Lazy(build)
    }

    /// Also accept `nil`/absent.
    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }

    fn expected(&self) -> String {
        match self {
            Self::Any => String::from("any value"),
            Self::String { email: false } => String::from("string"),
            Self::String { email: true } => String::from("e-mail address"),
            Self::Number(NumberSchema { integer: true, .. }) => String::from("integer"),
            Self::Number(_) => String::from("number"),
            Self::Boolean => String::from("boolean"),
            Self::Literal(value) => format!("literal {value}"),
            Self::Enum(schema) => schema.name.to_owned(),
            Self::Object(_) | Self::Tagged(_) => String::from("object"),
            Self::Array(_) => String::from("array"),
            Self::Record(_) => String::from("record"),
            Self::Optional(inner) => format!("optional {}", inner.expected()),
            Self::Union(alternatives) => alternatives
                .iter()
                .map(Self::expected)
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Lazy(build) => build().expected(),
        }
    }
}

/// Check `value` against `schema`, collecting every violation.
pub fn validate(value: &LuaValue, schema: &Schema) -> Result<(), Violations> {
    let mut checker = Checker::default();
    checker.check(value, schema);

    if checker.violations.is_empty() {
        Ok(())
    } else {
        Err(Violations(checker.violations))
    }
}

/// Validate, then turn the tree into `T`.
///
/// A value that passes the schema but still cannot be represented as `T`
/// yields a single root violation carrying the conversion message.
pub fn parse<T: DeserializeOwned>(value: LuaValue, schema: &Schema) -> Result<T, Violations> {
    validate(&value, schema)?;
    convert(value)
}

/// Turn the tree into `T` without checking any schema.
pub fn convert<T: DeserializeOwned>(value: LuaValue) -> Result<T, Violations> {
    serde_json::from_value(serde_json::Value::from(value))
        .map_err(|error| Violations::single(FieldPath::root(), error.to_string()))
}

#[derive(Default)]
struct Checker {
    path: Vec<PathSegment>,
    violations: Vec<Violation>,
}

impl Checker {
    fn report(&mut self, message: impl Into<String>) {
        self.violations.push(Violation {
            path: FieldPath::from(self.path.as_slice()),
            message: message.into(),
        });
    }

    fn mismatch(&mut self, schema: &Schema, value: &LuaValue) {
        let message = format!("expected {}, received {}", schema.expected(), value.kind_name());
        self.report(message);
    }

    fn check(&mut self, value: &LuaValue, schema: &Schema) {
        match schema {
            Schema::Any => {}
            Schema::Optional(inner) => {
                if !value.is_nil() {
                    self.check(value, inner);
                }
            }
            Schema::String { email } => match value.as_str() {
                Some(text) if *email && !looks_like_email(text) => {
                    self.report(format!("invalid e-mail address '{text}'"));
                }
                Some(_) => {}
                None => self.mismatch(schema, value),
            },
            Schema::Number(number) => self.check_number(value, *number, schema),
            Schema::Boolean => {
                if value.as_bool().is_none() {
                    self.mismatch(schema, value);
                }
            }
            Schema::Literal(expected) => {
                if !same_value(value, expected) {
                    self.report(format!("expected literal {expected}, received {value}"));
                }
            }
            Schema::Enum(enumeration) => {
                if !enumeration
                    .members
                    .iter()
                    .any(|member| same_value(value, member))
                {
                    let members = enumeration
                        .members
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    self.report(format!(
                        "invalid {} value {value}, expected one of {members}",
                        enumeration.name
                    ));
                }
            }
            Schema::Object(object) => self.check_object(value, object, schema),
            Schema::Array(item) => match value.as_sequence() {
                Some(items) => {
                    for (index, element) in items.iter().enumerate() {
                        self.path.push(PathSegment::Index(index));
                        self.check(element, item);
                        self.path.pop();
                    }
                }
                None => self.mismatch(schema, value),
            },
            Schema::Record(item) => match value.as_mapping() {
                Some(entries) => {
                    for (key, element) in entries {
                        self.path.push(PathSegment::Key(key.clone()));
                        self.check(element, item);
                        self.path.pop();
                    }
                }
                None => self.mismatch(schema, value),
            },
            Schema::Union(alternatives) => self.check_union(value, alternatives, schema),
            Schema::Tagged(tagged) => self.check_tagged(value, tagged, schema),
            Schema::Lazy(build) => {
                let built = build();
                self.check(value, &built);
            }
        }
    }

    fn check_number(&mut self, value: &LuaValue, number: NumberSchema, schema: &Schema) {
        let Some(actual) = value.as_f64() else {
            self.mismatch(schema, value);
            return;
        };

        if number.integer && actual.fract() != 0.0 {
            self.report(format!("expected integer, received {value}"));
        }
        if let Some(min) = number.min {
            if actual < min {
                self.report(format!("value {value} is less than minimum {min}"));
            }
        }
        if let Some(max) = number.max {
            if actual > max {
                self.report(format!("value {value} is greater than maximum {max}"));
            }
        }
    }

    fn check_object(&mut self, value: &LuaValue, object: &ObjectSchema, schema: &Schema) {
        let Some(entries) = value.as_mapping() else {
            self.mismatch(schema, value);
            return;
        };

        for field in &object.fields {
            self.path.push(PathSegment::Key(field.name.to_owned()));
            match entries.get(field.name) {
                Some(field_value) if !field_value.is_nil() => self.check(field_value, &field.schema),
                _ if field.required => {
                    self.report(format!("required {} is missing", field.schema.expected()));
                }
                _ => {}
            }
            self.path.pop();
        }
    }

    fn check_union(&mut self, value: &LuaValue, alternatives: &[Schema], schema: &Schema) {
        // Alternatives that already failed at the union's own level rank below
        // ones that matched the outer shape; ties go to the earliest.
        let depth = self.path.len();
        let mut closest: Option<((bool, usize), Vec<Violation>)> = None;

        for alternative in alternatives {
            let mut attempt = Checker {
                path: self.path.clone(),
                violations: Vec::new(),
            };
            attempt.check(value, alternative);

            if attempt.violations.is_empty() {
                return;
            }

            let failed_here = attempt
                .violations
                .iter()
                .any(|violation| violation.path.segments().len() == depth);
            let rank = (failed_here, attempt.violations.len());
            if closest.as_ref().is_none_or(|(best, _)| rank < *best) {
                closest = Some((rank, attempt.violations));
            }
        }

        match closest {
            Some((_, violations)) => self.violations.extend(violations),
            None => self.mismatch(schema, value),
        }
    }

    fn check_tagged(&mut self, value: &LuaValue, tagged: &TaggedSchema, schema: &Schema) {
        if value.as_mapping().is_none() {
            self.mismatch(schema, value);
            return;
        }

        let tag = value.get(tagged.tag).unwrap_or(&LuaValue::Nil);
        let variant = tagged
            .variants
            .iter()
            .find(|(expected, _)| same_value(tag, expected));

        match variant {
            Some((_, variant_schema)) => self.check(value, variant_schema),
            None => {
                let accepted = tagged
                    .variants
                    .iter()
                    .map(|(expected, _)| expected.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ");
                self.path.push(PathSegment::Key(tagged.tag.to_owned()));
                self.report(format!("expected {accepted}, received {tag}"));
                self.path.pop();
            }
        }
    }
}

fn same_value(left: &LuaValue, right: &LuaValue) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => left == right,
        _ => left == right,
    }
}

fn looks_like_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !text.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::normalize_keys;
    use crate::codec::decode;

    fn lua(text: &str) -> LuaValue {
        normalize_keys(decode(text).expect("valid literal"))
    }

    fn review_schema() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("id", Schema::integer())
                .required("userName", Schema::string())
                .required("rating", NumberSchema::integer().min(1.0).max(5.0).into())
                .optional(
                    "votes",
                    Schema::object(
                        ObjectSchema::new()
                            .required("total", Schema::integer())
                            .required("positive", Schema::integer()),
                    ),
                ),
        )
    }

    fn paths(violations: &Violations) -> Vec<String> {
        violations.iter().map(|violation| violation.path.to_string()).collect()
    }

    #[test]
    fn accepts_matching_object() {
        let value = lua(r#"{id=1,user_name="a",rating=5,votes={total=2,positive=1}}"#);
        assert!(validate(&value, &review_schema()).is_ok());
    }

    #[test]
    fn reports_out_of_range_rating() {
        let value = lua(r#"{id=1,user_name="a",rating=9}"#);
        let violations = validate(&value, &review_schema()).expect_err("must fail");

        assert_eq!(paths(&violations), vec!["rating"]);
        assert!(violations[0].message.contains("maximum 5"));
    }

    #[test]
    fn reports_missing_required_and_wrong_types_together() {
        let value = lua(r#"{user_name=7,rating="5",votes={total=1}}"#);
        let violations = validate(&value, &review_schema()).expect_err("must fail");

        assert_eq!(
            paths(&violations),
            vec!["id", "userName", "rating", "votes.positive"]
        );
        assert_eq!(violations[0].message, "required integer is missing");
        assert_eq!(violations[1].message, "expected string, received number");
    }

    #[test]
    fn array_violations_are_aggregated_across_elements() {
        let value = lua(r#"{{id=1,user_name="a",rating=0},{id=2,user_name="b",rating=3},{id=3,rating=6}}"#);
        let violations =
            validate(&value, &Schema::array(review_schema())).expect_err("must fail");

        assert_eq!(
            paths(&violations),
            vec!["[0].rating", "[2].userName", "[2].rating"]
        );
    }

    #[test]
    fn empty_table_satisfies_array_schema() {
        let value = lua("{}");
        assert!(validate(&value, &Schema::array(review_schema())).is_ok());
    }

    #[test]
    fn empty_table_does_not_satisfy_object_schema() {
        let value = lua("{}");
        let violations = validate(&value, &review_schema()).expect_err("must fail");
        assert_eq!(violations[0].message, "expected object, received array");
        assert!(violations[0].path.is_root());
    }

    #[test]
    fn enum_rejects_unknown_member() {
        let schema = Schema::enumeration(
            "category",
            [1, 2, 3, 4].into_iter().map(LuaValue::Integer),
        );

        assert!(validate(&LuaValue::Integer(2), &schema).is_ok());
        assert!(validate(&LuaValue::Float(2.0), &schema).is_ok());
        let violations = validate(&LuaValue::Integer(9), &schema).expect_err("must fail");
        assert_eq!(
            violations[0].message,
            "invalid category value 9, expected one of 1, 2, 3, 4"
        );
    }

    #[test]
    fn optional_accepts_nil_and_checks_present_values() {
        let schema = Schema::string().optional();
        assert!(validate(&LuaValue::Nil, &schema).is_ok());
        assert!(validate(&LuaValue::from("x"), &schema).is_ok());
        assert!(validate(&LuaValue::Integer(1), &schema).is_err());
    }

    #[test]
    fn record_checks_every_value() {
        let value = lua(r#"{[10]={path="a"},[20]={path=5}}"#);
        let schema = Schema::record(Schema::object(
            ObjectSchema::new().required("path", Schema::string()),
        ));
        let violations = validate(&value, &schema).expect_err("must fail");
        assert_eq!(paths(&violations), vec!["20.path"]);
    }

    #[test]
    fn union_reports_closest_alternative() {
        let schema = Schema::union([
            Schema::array(Schema::integer()),
            Schema::record(Schema::integer()),
        ]);

        assert!(validate(&lua("{1,2}"), &schema).is_ok());
        assert!(validate(&lua("{a=1}"), &schema).is_ok());

        let violations = validate(&lua(r#"{a=1,b="x"}"#), &schema).expect_err("must fail");
        assert_eq!(paths(&violations), vec!["b"]);
    }

    #[test]
    fn tagged_union_selects_variant_by_tag() {
        let schema = Schema::tagged(
            "success",
            [
                (
                    LuaValue::Boolean(true),
                    Schema::object(ObjectSchema::new().optional("result", Schema::Any)),
                ),
                (
                    LuaValue::Boolean(false),
                    Schema::object(ObjectSchema::new().optional("reason", Schema::string())),
                ),
            ],
        );

        assert!(validate(&lua("{success=true,result={1}}"), &schema).is_ok());

        let violations = validate(&lua("{success=false,reason=5}"), &schema).expect_err("must fail");
        assert_eq!(paths(&violations), vec!["reason"]);

        let violations = validate(&lua("{result=1}"), &schema).expect_err("must fail");
        assert_eq!(paths(&violations), vec!["success"]);
        assert_eq!(violations[0].message, "expected true | false, received nil");
    }

    fn comment_tree() -> Schema {
        Schema::object(
            ObjectSchema::new()
                .required("text", Schema::string())
                .optional("replies", Schema::array(Schema::lazy(comment_tree))),
        )
    }

    #[test]
    fn lazy_schema_validates_recursive_structures() {
        let value = lua(r#"{text="a",replies={{text="b",replies={{text=3}}}}}"#);
        let violations = validate(&value, &comment_tree()).expect_err("must fail");
        assert_eq!(paths(&violations), vec!["replies[0].replies[0].text"]);
    }

    #[test]
    fn email_format_is_checked() {
        assert!(validate(&LuaValue::from("user@example.com"), &Schema::email()).is_ok());
        assert!(validate(&LuaValue::from("not-an-email"), &Schema::email()).is_err());
        assert!(validate(&LuaValue::from("a@b"), &Schema::email()).is_err());
    }

    #[test]
    fn validation_does_not_mutate_value() {
        let value = lua(r#"{id=1,user_name="a",rating=9}"#);
        let before = value.clone();
        let _ = validate(&value, &review_schema());
        assert_eq!(value, before);
    }

    #[test]
    fn parse_produces_typed_value() {
        #[derive(Debug, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Row {
            id: u64,
            user_name: String,
        }

        let row: Row = parse(lua(r#"{id=4,user_name="z",rating=2}"#), &review_schema())
            .expect("valid row");
        assert_eq!(row.id, 4);
        assert_eq!(row.user_name, "z");
    }

    #[test]
    fn path_display() {
        let path = FieldPath::from(
            [
                PathSegment::Index(2),
                PathSegment::Key(String::from("votes")),
                PathSegment::Key(String::from("total")),
            ]
            .as_slice(),
        );
        assert_eq!(path.to_string(), "[2].votes.total");
        assert_eq!(FieldPath::root().to_string(), "$");
    }
}
