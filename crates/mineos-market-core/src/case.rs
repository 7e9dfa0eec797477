//! snake_case → camelCase key rewriting for decoded trees.

use crate::value::LuaValue;

/// Rewrite every mapping key in the tree from `snake_case` to `camelCase`.
///
/// Underscores never survive: each run of them is dropped and the character
/// after it upper-cased, while leading and trailing runs are simply removed.
/// Sequence order and leaf values are not touched.
pub fn normalize_keys(value: LuaValue) -> LuaValue {
    match value {
        LuaValue::Mapping(entries) => LuaValue::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| (snake_to_camel(&key), normalize_keys(value)))
                .collect(),
        ),
        LuaValue::Sequence(items) => {
            LuaValue::Sequence(items.into_iter().map(normalize_keys).collect())
        }
        leaf => leaf,
    }
}

pub fn snake_to_camel(key: &str) -> String {
    let mut camel = String::with_capacity(key.len());

    for (index, word) in key.split('_').filter(|word| !word.is_empty()).enumerate() {
        let mut chars = word.chars();
        if index > 0 {
            if let Some(first) = chars.next() {
                camel.extend(first.to_uppercase());
            }
        }
        camel.push_str(chars.as_str());
    }

    camel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;

    #[test]
    fn converts_snake_case_keys() {
        assert_eq!(snake_to_camel("file_id"), "fileId");
        assert_eq!(snake_to_camel("last_message_user_name"), "lastMessageUserName");
        assert_eq!(snake_to_camel("success"), "success");
    }

    #[test]
    fn drops_every_underscore() {
        assert_eq!(snake_to_camel("value_1"), "value1");
        assert_eq!(snake_to_camel("a__b"), "aB");
        assert_eq!(snake_to_camel("_private"), "private");
        assert_eq!(snake_to_camel("trailing_"), "trailing");
        assert_eq!(snake_to_camel("file_ID"), "fileID");
        assert_eq!(snake_to_camel("__"), "");
    }

    #[test]
    fn rewrites_nested_keys_and_keeps_structure() {
        let decoded = decode(
            r#"{success=true,result={{file_id=1,user_name="a"},{file_id=2,dependencies_data={[7]={source_url="x"}}}}}"#,
        )
        .expect("valid literal");

        let normalized = normalize_keys(decoded);
        let items = normalized
            .get("result")
            .and_then(LuaValue::as_sequence)
            .expect("sequence result");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("fileId"), Some(&LuaValue::Integer(1)));
        assert_eq!(items[0].get("userName"), Some(&LuaValue::from("a")));
        assert_eq!(items[1].get("fileId"), Some(&LuaValue::Integer(2)));
        assert_eq!(
            items[1]
                .get("dependenciesData")
                .and_then(|deps| deps.get("7"))
                .and_then(|dep| dep.get("sourceUrl")),
            Some(&LuaValue::from("x"))
        );
    }

    #[test]
    fn string_values_are_not_rewritten() {
        let normalized = normalize_keys(decode(r#"{path="some_file.lua"}"#).expect("valid"));
        assert_eq!(normalized.get("path"), Some(&LuaValue::from("some_file.lua")));
    }

    fn assert_no_snake_keys(value: &LuaValue) {
        match value {
            LuaValue::Mapping(entries) => {
                for (key, value) in entries {
                    assert!(!key.contains('_'), "key {key} still contains an underscore");
                    assert_no_snake_keys(value);
                }
            }
            LuaValue::Sequence(items) => items.iter().for_each(assert_no_snake_keys),
            _ => {}
        }
    }

    #[test]
    fn normalized_trees_have_no_snake_keys() {
        let samples = [
            r#"{users_count=1,most_popular_user="x",publications_count=2}"#,
            r#"{{dialog_user_name="a",last_message_is_read=1},{dialog_user_name="b",last_message_is_read=0}}"#,
            r#"{result={votes={total=1,positive=0},user_name="c"}}"#,
            r#"{value_1=1,file_ID=2,a__b=3,trailing_=4,_private={inner__key_2=5}}"#,
            r#"{{version_2_0=true},{["spaced_key_"]="x"}}"#,
        ];

        for sample in samples {
            assert_no_snake_keys(&normalize_keys(decode(sample).expect("valid")));
        }
    }
}
