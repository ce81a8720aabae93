//! Attribute routing between the object and embed tags.
//!
//! # Responsibility
//! - Decide which bag value, if any, a given tag receives for a key.
//! - Decide the attribute/parameter name that value is emitted under.
//!
//! # Invariants
//! - A key scoped to the other tag never resolves, even with a shared fallback.
//! - A key scoped to the requesting tag wins over the shared key.

use crate::model::attrs::{AttrKey, AttributeBag, TagScope};

/// One routed attribute, ready to serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttr<'a> {
    pub tag_name: &'a str,
    pub value: &'a str,
}

/// Resolves `key` for the tag identified by `scope`.
///
/// `explicit_tag_name` overrides the emitted name (the object tag emits the
/// shared `name` slot as `id`).
pub fn resolve<'a>(
    bag: &'a AttributeBag,
    scope: TagScope,
    key: &'a AttrKey,
    explicit_tag_name: Option<&'a str>,
) -> Option<ResolvedAttr<'a>> {
    if key.scope == Some(scope.other()) {
        return None;
    }

    let value = bag
        .get(&key.with_scope(scope))
        .or_else(|| bag.get(key))?;

    Some(ResolvedAttr {
        tag_name: explicit_tag_name.unwrap_or(key.name.as_str()),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::{resolve, ResolvedAttr};
    use crate::model::attrs::{AttrKey, AttributeBag, TagScope};

    fn bag(entries: &[(&str, Option<&str>)]) -> AttributeBag {
        let mut bag = AttributeBag::new();
        for (key, value) in entries {
            bag.insert(AttrKey::parse(key), value.map(str::to_string));
        }
        bag
    }

    #[test]
    fn scoped_value_takes_precedence() {
        let bag = bag(&[("width", Some("320")), ("obj#width", Some("330"))]);
        let key = AttrKey::shared("width");

        assert_eq!(
            resolve(&bag, TagScope::Object, &key, None),
            Some(ResolvedAttr {
                tag_name: "width",
                value: "330"
            })
        );
        assert_eq!(
            resolve(&bag, TagScope::Embed, &key, None).map(|attr| attr.value),
            Some("320")
        );
    }

    #[test]
    fn other_scope_key_never_falls_back() {
        let bag = bag(&[("loop", Some("true")), ("emb#loop", Some("false"))]);
        let embed_only = AttrKey::scoped("loop", TagScope::Embed);

        assert_eq!(resolve(&bag, TagScope::Object, &embed_only, None), None);
        assert_eq!(
            resolve(&bag, TagScope::Embed, &embed_only, None).map(|attr| attr.value),
            Some("false")
        );
    }

    #[test]
    fn explicit_tag_name_and_null_values() {
        let bag = bag(&[("name", Some("movie1")), ("title", None)]);

        let name = AttrKey::shared("name");
        let id = resolve(&bag, TagScope::Object, &name, Some("id")).expect("name slot resolves");
        assert_eq!(id.tag_name, "id");
        assert_eq!(id.value, "movie1");

        assert_eq!(
            resolve(&bag, TagScope::Object, &AttrKey::shared("title"), None),
            None
        );
        assert_eq!(
            resolve(&bag, TagScope::Embed, &AttrKey::shared("missing"), None),
            None
        );
    }

    #[test]
    fn scoped_key_emits_bare_name() {
        let bag = bag(&[("obj#scale", Some("tofit"))]);
        let key = AttrKey::scoped("scale", TagScope::Object);

        let resolved = resolve(&bag, TagScope::Object, &key, None).expect("scoped key resolves");
        assert_eq!(resolved.tag_name, "scale");
    }
}
