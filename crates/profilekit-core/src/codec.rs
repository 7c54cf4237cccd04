//! Document codec
//!
//! Converts between the three forms a resource takes:
//! - textual source documents (YAML, or JSON as a subset of it)
//! - [`UntypedDocument`], the canonical wire shape
//! - typed records implementing [`TypedResource`]
//!
//! Conversion always goes through the untyped form. Text is never sent to the
//! store directly and typed records are never built straight from text.

use serde_json::Value as JsonValue;

use crate::document::{UntypedDocument, UntypedList, value_type_name};
use crate::error::{DecodeError, Result};
use crate::identity::{GroupVersionKind, ResourceIdentity};
use crate::profile::{ResourceList, TypeMeta, TypedResource};

/// Parse a textual document and check it declares `expected`
///
/// Fails when the text is malformed (including multi-document input), the
/// root is not a mapping, the envelope is missing or names another type, or
/// `metadata.name` is absent.
pub fn decode_text(text: &str, expected: &ResourceIdentity) -> Result<UntypedDocument> {
    let value: JsonValue = serde_yaml::from_str(text)?;
    let doc = UntypedDocument::from_value(value)?;
    check_identity(&doc, expected)?;
    require_name(&doc)?;
    Ok(doc)
}

/// Project an untyped document onto a typed record, dropping unknown fields
pub fn to_typed<K: TypedResource>(doc: &UntypedDocument) -> Result<K> {
    into_typed(doc.clone())
}

/// Consuming variant of [`to_typed`]
pub fn into_typed<K: TypedResource>(doc: UntypedDocument) -> Result<K> {
    check_identity(&doc, &K::IDENTITY)?;
    require_name(&doc)?;
    Ok(serde_json::from_value(doc.into_value())?)
}

/// Project every item of a list, keeping the store's order
pub fn to_typed_list<K: TypedResource>(list: UntypedList) -> Result<ResourceList<K>> {
    let items = list
        .items
        .into_iter()
        .map(into_typed)
        .collect::<Result<Vec<K>>>()?;

    Ok(ResourceList {
        types: TypeMeta::list(&K::IDENTITY),
        metadata: list.metadata,
        items,
    })
}

/// Re-serialize a typed record into the untyped form
pub fn to_document<K: TypedResource>(record: &K) -> Result<UntypedDocument> {
    UntypedDocument::from_value(serde_json::to_value(record)?)
}

/// Serialize a typed record to wire bytes, keeping its resource version
pub fn to_wire<K: TypedResource>(record: &K) -> Result<Vec<u8>> {
    to_document(record)?.to_vec()
}

/// Check the document envelope against an identity
pub fn check_identity(doc: &UntypedDocument, expected: &ResourceIdentity) -> Result<()> {
    let api_version = required_str(doc, "apiVersion")?;
    let kind = required_str(doc, "kind")?;

    if expected.matches(api_version, kind) {
        Ok(())
    } else {
        Err(DecodeError::IdentityMismatch {
            expected: expected.gvk().to_string(),
            found: GroupVersionKind::from_api_version(api_version, kind).to_string(),
        })
    }
}

fn require_name(doc: &UntypedDocument) -> Result<()> {
    match required_str(doc, "metadata.name")? {
        "" => Err(DecodeError::MissingField {
            field: "metadata.name",
        }),
        _ => Ok(()),
    }
}

/// Read a string field by dotted path; absent and `null` count as missing
fn required_str<'a>(doc: &'a UntypedDocument, field: &'static str) -> Result<&'a str> {
    match doc.get(field) {
        None | Some(JsonValue::Null) => Err(DecodeError::MissingField { field }),
        Some(JsonValue::String(s)) => Ok(s),
        Some(other) => Err(DecodeError::InvalidField {
            field,
            found: value_type_name(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use serde_json::json;

    const PROFILE_YAML: &str = r#"
apiVersion: config.kio.kasten.io/v1alpha1
kind: Profile
metadata:
  name: cos1
  namespace: kasten-io
spec:
  type: Location
  locationSpec:
    credential:
      secretType: AwsAccessKey
      secret:
        apiVersion: v1
        kind: Secret
        name: k10secret-wshlm
        namespace: kasten-io
    type: ObjectStore
    objectStore:
      endpoint: https://cos.ap-chengdu.myqcloud.com
      name: kasten-bucket
      objectStoreType: S3
      region: ap-chengdu
"#;

    #[test]
    fn test_decode_text() {
        let doc = decode_text(PROFILE_YAML, &ResourceIdentity::PROFILE).unwrap();
        assert_eq!(doc.name(), Some("cos1"));
        assert_eq!(doc.namespace(), Some("kasten-io"));
        assert_eq!(doc.get("spec.locationSpec.objectStore.region").unwrap(), "ap-chengdu");
    }

    #[test]
    fn test_decode_json_text() {
        let text = r#"{"apiVersion":"config.kio.kasten.io/v1alpha1","kind":"Profile","metadata":{"name":"cos2"}}"#;
        let doc = decode_text(text, &ResourceIdentity::PROFILE).unwrap();
        assert_eq!(doc.name(), Some("cos2"));
        assert_eq!(doc.namespace(), None);
    }

    #[test]
    fn test_decode_rejects_other_kind() {
        let text = PROFILE_YAML.replace("kind: Profile", "kind: Policy");
        let err = decode_text(&text, &ResourceIdentity::PROFILE).unwrap_err();
        match err {
            DecodeError::IdentityMismatch { expected, found } => {
                assert_eq!(expected, "config.kio.kasten.io/v1alpha1, Kind=Profile");
                assert_eq!(found, "config.kio.kasten.io/v1alpha1, Kind=Policy");
            }
            other => panic!("expected identity mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_other_version() {
        let text = PROFILE_YAML.replace("v1alpha1", "v1beta1");
        let err = decode_text(&text, &ResourceIdentity::PROFILE).unwrap_err();
        assert!(matches!(err, DecodeError::IdentityMismatch { .. }));
    }

    #[test]
    fn test_decode_rejects_missing_envelope() {
        let text = "metadata:\n  name: cos1\n";
        let err = decode_text(text, &ResourceIdentity::PROFILE).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "apiVersion" }));

        let text = "apiVersion: config.kio.kasten.io/v1alpha1\nmetadata:\n  name: cos1\n";
        let err = decode_text(text, &ResourceIdentity::PROFILE).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "kind" }));
    }

    #[test]
    fn test_decode_rejects_missing_name() {
        let text = PROFILE_YAML.replace("  name: cos1\n", "");
        let err = decode_text(&text, &ResourceIdentity::PROFILE).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "metadata.name" }));

        let text = PROFILE_YAML.replace("name: cos1", "name: \"\"");
        let err = decode_text(&text, &ResourceIdentity::PROFILE).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "metadata.name" }));
    }

    #[test]
    fn test_decode_rejects_malformed_text() {
        let err = decode_text("apiVersion: [unclosed", &ResourceIdentity::PROFILE).unwrap_err();
        assert!(matches!(err, DecodeError::YamlParse(_)));

        let err = decode_text("- a\n- b\n", &ResourceIdentity::PROFILE).unwrap_err();
        assert!(matches!(err, DecodeError::NotAMapping { found: "sequence" }));

        let two_docs = format!("{PROFILE_YAML}\n---\n{PROFILE_YAML}");
        assert!(decode_text(&two_docs, &ResourceIdentity::PROFILE).is_err());
    }

    #[test]
    fn test_decode_rejects_non_string_kind() {
        let text = PROFILE_YAML.replace("kind: Profile", "kind: 12");
        let err = decode_text(&text, &ResourceIdentity::PROFILE).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "kind", found: "number" }));
    }

    #[test]
    fn test_to_typed_drops_unknown_fields() {
        let mut doc = decode_text(PROFILE_YAML, &ResourceIdentity::PROFILE).unwrap();
        doc.merge_patch(&json!({ "status": { "validation": "Success" }, "extra": 1 }))
            .unwrap();

        let profile: Profile = to_typed(&doc).unwrap();
        assert_eq!(profile.metadata.name.as_deref(), Some("cos1"));
        assert_eq!(profile.spec.type_, "Location");
        assert_eq!(profile.spec.location_spec["type"], "ObjectStore");

        let back = to_document(&profile).unwrap();
        assert!(back.get("status").is_none());
        assert!(back.get("extra").is_none());
    }

    #[test]
    fn test_to_typed_checks_identity_and_name() {
        let doc = UntypedDocument::from_value(json!({
            "apiVersion": "v1",
            "kind": "Secret",
            "metadata": { "name": "s" }
        }))
        .unwrap();
        assert!(matches!(
            to_typed::<Profile>(&doc),
            Err(DecodeError::IdentityMismatch { .. })
        ));

        let doc = UntypedDocument::from_value(json!({
            "apiVersion": "config.kio.kasten.io/v1alpha1",
            "kind": "Profile",
            "metadata": {}
        }))
        .unwrap();
        assert!(matches!(
            to_typed::<Profile>(&doc),
            Err(DecodeError::MissingField { field: "metadata.name" })
        ));
    }

    #[test]
    fn test_wire_round_trip_is_stable() {
        let mut profile: Profile =
            to_typed(&decode_text(PROFILE_YAML, &ResourceIdentity::PROFILE).unwrap()).unwrap();
        profile.metadata.resource_version = Some("1234".to_string());

        let wire = to_wire(&profile).unwrap();
        let again: Profile = to_typed(&UntypedDocument::from_slice(&wire).unwrap()).unwrap();
        let wire_again = to_wire(&again).unwrap();

        assert_eq!(again, profile);
        let first: JsonValue = serde_json::from_slice(&wire).unwrap();
        let second: JsonValue = serde_json::from_slice(&wire_again).unwrap();
        assert_eq!(first, second);
        assert_eq!(first["metadata"]["resourceVersion"], "1234");
    }

    #[test]
    fn test_wire_round_trip_over_varied_records() {
        // Nested location specs of growing depth, with and without a type or version
        let nestings = [
            json!({}),
            json!({ "type": "ObjectStore" }),
            json!({ "type": "ObjectStore", "objectStore": { "name": "b", "region": "r" } }),
            json!({ "credential": { "secret": { "name": "s", "namespace": "ns" } } }),
            json!({ "a": { "b": { "c": { "d": [1, "two", null, { "e": true }] } } } }),
        ];

        for (i, location) in nestings.iter().enumerate() {
            for type_ in ["", "Location"] {
                for resource_version in [None, Some("42")] {
                    let mut profile = Profile::new(&format!("p{i}"), "kasten-io", type_);
                    profile.spec.location_spec = location.as_object().unwrap().clone();
                    profile.metadata.resource_version = resource_version.map(str::to_string);

                    let wire = to_wire(&profile).unwrap();
                    let again: Profile =
                        to_typed(&UntypedDocument::from_slice(&wire).unwrap()).unwrap();
                    assert_eq!(again, profile, "record {i} type {type_:?} rv {resource_version:?}");
                    assert_eq!(to_wire(&again).unwrap(), wire);
                }
            }
        }
    }

    #[test]
    fn test_null_spec_sections_project_to_empty() {
        let text = PROFILE_YAML.split("spec:").next().unwrap().to_string() + "spec:\n";
        let doc = decode_text(&text, &ResourceIdentity::PROFILE).unwrap();
        assert!(doc.get("spec").unwrap().is_null());
        let profile: Profile = to_typed(&doc).unwrap();
        assert!(profile.spec.location_spec.is_empty());
        assert_eq!(profile.spec.type_, "");

        let text = PROFILE_YAML.split("  locationSpec:").next().unwrap().to_string()
            + "  locationSpec:\n";
        let doc = decode_text(&text, &ResourceIdentity::PROFILE).unwrap();
        assert!(doc.get("spec.locationSpec").unwrap().is_null());
        let profile: Profile = to_typed(&doc).unwrap();
        assert!(profile.spec.location_spec.is_empty());
        assert_eq!(profile.spec.type_, "Location");
    }

    #[test]
    fn test_to_typed_list_preserves_order() {
        let items = ["c", "a", "b"]
            .iter()
            .map(|name| to_document(&Profile::new(name, "kasten-io", "Location")).unwrap())
            .collect();

        let list = to_typed_list::<Profile>(UntypedList::new(items)).unwrap();
        let names: Vec<_> = list.items.iter().map(|p| p.metadata.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(list.types.kind, "ProfileList");

        let empty = to_typed_list::<Profile>(UntypedList::default()).unwrap();
        assert!(empty.is_empty());
    }
}
