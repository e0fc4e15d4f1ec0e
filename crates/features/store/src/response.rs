//! Reading GraphQL response documents into slice values.

use scms_registry::ContentTypeDescriptor;
use serde_json::Value;
use tracing::warn;

/// Joined messages of a non-empty `errors` array.
pub(crate) fn graphql_errors(response: &Value) -> Option<String> {
    let errors = response.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }

    let messages = errors
        .iter()
        .map(|error| {
            error
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| error.to_string(), ToOwned::to_owned)
        })
        .collect::<Vec<_>>();

    Some(messages.join(" | "))
}

/// The item of an item-shaped response.
///
/// Collection types accept the plural field holding an array (first element wins); every type
/// accepts the singular field, either as an array (first element) or as the item itself.
pub(crate) fn extract_item(response: &Value, descriptor: &ContentTypeDescriptor) -> Option<Value> {
    let data = response.get("data")?;

    if !descriptor.is_single()
        && let Some(items) = data.get(descriptor.plural()).and_then(Value::as_array)
    {
        return items.first().cloned();
    }

    match data.get(descriptor.singular())? {
        Value::Null => None,
        Value::Array(items) => items.first().cloned(),
        item => Some(item.clone()),
    }
}

/// The plural field of a collection response; missing or `null` means empty.
pub(crate) fn extract_collection(response: &Value, descriptor: &ContentTypeDescriptor) -> Vec<Value> {
    match response.get("data").and_then(|data| data.get(descriptor.plural())) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => {
            warn!(
                content_type = descriptor.plural(),
                kind = json_kind(other),
                "Collection field is not an array; treating it as empty"
            );
            Vec::new()
        },
    }
}

/// String form of an item field used as a key: strings verbatim, numbers printed.
pub(crate) fn key_value(item: &Value, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::String(value) if !value.is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scms_domain::config::ContentTypeConfig;
    use serde_json::json;

    fn article() -> ContentTypeDescriptor {
        ContentTypeDescriptor::new(&ContentTypeConfig::collection("article")).expect("article")
    }

    fn homepage() -> ContentTypeDescriptor {
        ContentTypeDescriptor::new(&ContentTypeConfig::single("homepage")).expect("homepage")
    }

    #[test]
    fn joins_error_messages() {
        let response = json!({ "errors": [{ "message": "a" }, { "message": "b" }, { "code": 3 }] });
        assert_eq!(graphql_errors(&response).as_deref(), Some(r#"a | b | {"code":3}"#));
        assert_eq!(graphql_errors(&json!({ "errors": [] })), None);
        assert_eq!(graphql_errors(&json!({ "data": {} })), None);
    }

    #[test]
    fn item_prefers_plural_array() {
        let response = json!({ "data": { "articles": [{ "id": 1 }, { "id": 2 }] } });
        assert_eq!(extract_item(&response, &article()), Some(json!({ "id": 1 })));
    }

    #[test]
    fn item_from_singular_field() {
        let as_array = json!({ "data": { "article": [{ "id": 3 }] } });
        let as_object = json!({ "data": { "article": { "id": 4 } } });
        let as_null = json!({ "data": { "article": null } });
        let empty = json!({ "data": { "articles": [] } });

        assert_eq!(extract_item(&as_array, &article()), Some(json!({ "id": 3 })));
        assert_eq!(extract_item(&as_object, &article()), Some(json!({ "id": 4 })));
        assert_eq!(extract_item(&as_null, &article()), None);
        assert_eq!(extract_item(&empty, &article()), None);
        assert_eq!(extract_item(&json!({}), &article()), None);
    }

    #[test]
    fn single_types_read_only_their_field() {
        let response = json!({ "data": { "homepages": [{ "id": 1 }], "homepage": { "id": 2 } } });
        assert_eq!(extract_item(&response, &homepage()), Some(json!({ "id": 2 })));
    }

    #[test]
    fn collection_defaults_to_empty() {
        assert_eq!(extract_collection(&json!({ "data": { "articles": null } }), &article()), Vec::<Value>::new());
        assert_eq!(extract_collection(&json!({ "data": {} }), &article()), Vec::<Value>::new());
        assert_eq!(extract_collection(&json!({ "data": { "articles": {} } }), &article()), Vec::<Value>::new());
        assert_eq!(
            extract_collection(&json!({ "data": { "articles": [{ "id": 1 }] } }), &article()),
            vec![json!({ "id": 1 })]
        );
    }

    #[test]
    fn key_values() {
        assert_eq!(key_value(&json!({ "id": 7 }), "id").as_deref(), Some("7"));
        assert_eq!(key_value(&json!({ "slug": "hello" }), "slug").as_deref(), Some("hello"));
        assert_eq!(key_value(&json!({ "slug": "" }), "slug"), None);
        assert_eq!(key_value(&json!({ "id": null }), "id"), None);
        assert_eq!(key_value(&json!({}), "id"), None);
    }
}
