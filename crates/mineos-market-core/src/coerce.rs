//! Forcing textual fields back to strings.
//!
//! The service serializes a value like a user name `"1337"` as the bare
//! number `1337`. Typed consumers expect these fields to always be strings,
//! so after key normalization the pipeline rewrites numeric values of the
//! fields listed in [`STRING_FIELDS`] to their decimal text. The list is
//! exact: fields outside it keep their wire type.

use crate::value::LuaValue;

/// Normalized (camelCase) field names whose values are always text.
pub const STRING_FIELDS: &[&str] = &[
    "userName",
    "dialogUserName",
    "lastMessageUserName",
    "lastRegisteredUser",
    "mostPopularUser",
    "name",
    "publicationName",
    "initialDescription",
    "translatedDescription",
    "whatsNew",
    "comment",
    "text",
];

/// Replace numeric values of `field_names` keys with their string form,
/// anywhere in the tree.
pub fn coerce_known_fields(value: LuaValue, field_names: &[&str]) -> LuaValue {
    match value {
        LuaValue::Mapping(entries) => LuaValue::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| {
                    let value = match value.number_to_string() {
                        Some(text) if field_names.contains(&key.as_str()) => LuaValue::String(text),
                        _ => coerce_known_fields(value, field_names),
                    };
                    (key, value)
                })
                .collect(),
        ),
        LuaValue::Sequence(items) => LuaValue::Sequence(
            items
                .into_iter()
                .map(|item| coerce_known_fields(item, field_names))
                .collect(),
        ),
        leaf => leaf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::normalize_keys;
    use crate::codec::decode;

    fn coerced(text: &str) -> LuaValue {
        coerce_known_fields(normalize_keys(decode(text).expect("valid")), STRING_FIELDS)
    }

    #[test]
    fn numeric_user_names_become_strings() {
        let value = coerced("{user_name=1337,file_id=5}");
        assert_eq!(value.get("userName"), Some(&LuaValue::from("1337")));
        assert_eq!(value.get("fileId"), Some(&LuaValue::Integer(5)));
    }

    #[test]
    fn integral_floats_lose_fraction() {
        let value = coerced("{comment=12.0,text=0.25}");
        assert_eq!(value.get("comment"), Some(&LuaValue::from("12")));
        assert_eq!(value.get("text"), Some(&LuaValue::from("0.25")));
    }

    #[test]
    fn walks_nested_sequences_and_mappings() {
        let value = coerced(r#"{{user_name=1,votes={total=3}},{user_name="two",meta={name=42}}}"#);
        let items = value.as_sequence().expect("sequence");

        assert_eq!(items[0].get("userName"), Some(&LuaValue::from("1")));
        assert_eq!(
            items[0].get("votes").and_then(|votes| votes.get("total")),
            Some(&LuaValue::Integer(3))
        );
        assert_eq!(items[1].get("userName"), Some(&LuaValue::from("two")));
        assert_eq!(
            items[1].get("meta").and_then(|meta| meta.get("name")),
            Some(&LuaValue::from("42"))
        );
    }

    #[test]
    fn non_numeric_values_of_listed_fields_are_untouched() {
        let value = coerced("{name=true,text={1,2}}");
        assert_eq!(value.get("name"), Some(&LuaValue::Boolean(true)));
        assert_eq!(
            value.get("text"),
            Some(&LuaValue::Sequence(vec![LuaValue::Integer(1), LuaValue::Integer(2)]))
        );
    }

    #[test]
    fn coercion_is_idempotent() {
        let samples = [
            "{user_name=1,rating=5,comment=3.5}",
            r#"{{name=1},{name="x"},{}}"#,
            "{a={b={whats_new=2,version=3}}}",
        ];

        for sample in samples {
            let once = coerced(sample);
            let twice = coerce_known_fields(once.clone(), STRING_FIELDS);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn empty_allowlist_changes_nothing() {
        let original = normalize_keys(decode("{user_name=1}").expect("valid"));
        assert_eq!(coerce_known_fields(original.clone(), &[]), original);
    }
}
