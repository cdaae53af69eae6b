//! Recursive rewrite of translatable content inside attachment trees.

use crate::model::Attachment;

/// Rewrite `text` and `description` of every node that carries a
/// translation for `language`, skipping nodes authored by the viewer.
///
/// Authorship is evaluated per node, not inherited: recursion descends
/// into children unconditionally, so a stranger's quote nested under the
/// viewer's own attachment still gets rewritten. Nodes without a matching
/// translation pass through unchanged. Total and idempotent; terminates
/// at leaf nodes.
pub fn translate_attachments(nodes: &mut [Attachment], language: &str, viewer_name: &str) {
    for node in nodes {
        let viewer_authored = node.author_name.as_deref() == Some(viewer_name);
        if !viewer_authored {
            if let Some(translated) = node.translations.get(language) {
                if node.text.is_some() {
                    node.text = Some(translated.clone());
                }
                if node.description.is_some() {
                    node.description = Some(translated.clone());
                }
            }
        }

        translate_attachments(&mut node.children, language, viewer_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn attachment(author: Option<&str>, text: Option<&str>, translations: &[(&str, &str)]) -> Attachment {
        Attachment {
            author_name: author.map(str::to_string),
            text: text.map(str::to_string),
            description: None,
            translations: translations
                .iter()
                .map(|(code, value)| (code.to_string(), value.to_string()))
                .collect(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_translates_text_when_translation_exists() {
        let mut nodes = vec![attachment(Some("other"), Some("Hello"), &[("es", "Hola")])];

        translate_attachments(&mut nodes, "es", "viewer");

        assert_eq!(nodes[0].text.as_deref(), Some("Hola"));
    }

    #[test]
    fn test_translates_description_when_present() {
        let mut node = attachment(Some("other"), None, &[("es", "Hola")]);
        node.description = Some("Hello".to_string());
        let mut nodes = vec![node];

        translate_attachments(&mut nodes, "es", "viewer");

        assert_eq!(nodes[0].description.as_deref(), Some("Hola"));
        assert_eq!(nodes[0].text, None);
    }

    #[test]
    fn test_missing_translation_passes_through() {
        let mut nodes = vec![attachment(Some("other"), Some("Hello"), &[("de", "Hallo")])];

        translate_attachments(&mut nodes, "es", "viewer");

        assert_eq!(nodes[0].text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_viewer_authored_node_untouched() {
        let mut nodes = vec![attachment(Some("viewer"), Some("Hello"), &[("es", "Hola")])];

        translate_attachments(&mut nodes, "es", "viewer");

        assert_eq!(nodes[0].text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_anonymous_node_is_translated() {
        // No author name means not the viewer
        let mut nodes = vec![attachment(None, Some("Hello"), &[("es", "Hola")])];

        translate_attachments(&mut nodes, "es", "viewer");

        assert_eq!(nodes[0].text.as_deref(), Some("Hola"));
    }

    #[test]
    fn test_recursion_descends_through_viewer_nodes() {
        // The viewer quotes someone else: the outer node stays, the inner
        // node is rewritten
        let mut outer = attachment(Some("viewer"), Some("My comment"), &[("es", "Mi comentario")]);
        outer.children = vec![attachment(Some("other"), Some("Hello"), &[("es", "Hola")])];
        let mut nodes = vec![outer];

        translate_attachments(&mut nodes, "es", "viewer");

        assert_eq!(nodes[0].text.as_deref(), Some("My comment"));
        assert_eq!(nodes[0].children[0].text.as_deref(), Some("Hola"));
    }

    #[test]
    fn test_deep_nesting() {
        let mut level3 = attachment(Some("other"), Some("deep"), &[("es", "profundo")]);
        level3.children = Vec::new();
        let mut level2 = attachment(Some("viewer"), Some("mine"), &[("es", "mio")]);
        level2.children = vec![level3];
        let mut level1 = attachment(Some("other"), Some("top"), &[("es", "cima")]);
        level1.children = vec![level2];
        let mut nodes = vec![level1];

        translate_attachments(&mut nodes, "es", "viewer");

        assert_eq!(nodes[0].text.as_deref(), Some("cima"));
        assert_eq!(nodes[0].children[0].text.as_deref(), Some("mine"));
        assert_eq!(nodes[0].children[0].children[0].text.as_deref(), Some("profundo"));
    }

    #[test]
    fn test_empty_input() {
        let mut nodes: Vec<Attachment> = Vec::new();
        translate_attachments(&mut nodes, "es", "viewer");
        assert!(nodes.is_empty());
    }

    // ==================== Property Tests ====================

    fn arb_attachment() -> impl Strategy<Value = Attachment> {
        let leaf = (
            prop_oneof![
                Just(None),
                Just(Some("viewer".to_string())),
                Just(Some("other".to_string())),
            ],
            proptest::option::of("[a-z]{1,8}"),
            proptest::option::of("[a-z]{1,8}"),
            proptest::collection::hash_map(
                prop_oneof![Just("es".to_string()), Just("de".to_string())],
                "[a-z]{1,8}",
                0..3,
            ),
        )
            .prop_map(|(author_name, text, description, translations)| Attachment {
                author_name,
                text,
                description,
                translations: translations.into_iter().collect::<HashMap<_, _>>(),
                children: Vec::new(),
            });

        leaf.prop_recursive(3, 24, 4, |inner| {
            (inner.clone(), proptest::collection::vec(inner, 0..4)).prop_map(
                |(mut node, children)| {
                    node.children = children;
                    node
                },
            )
        })
    }

    proptest! {
        #[test]
        fn prop_translate_is_idempotent(nodes in proptest::collection::vec(arb_attachment(), 0..4)) {
            let mut once = nodes.clone();
            translate_attachments(&mut once, "es", "viewer");

            let mut twice = once.clone();
            translate_attachments(&mut twice, "es", "viewer");

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_viewer_nodes_never_change(nodes in proptest::collection::vec(arb_attachment(), 0..4)) {
            fn assert_viewer_untouched(before: &[Attachment], after: &[Attachment]) {
                for (b, a) in before.iter().zip(after) {
                    if b.author_name.as_deref() == Some("viewer") {
                        assert_eq!(b.text, a.text);
                        assert_eq!(b.description, a.description);
                    }
                    assert_viewer_untouched(&b.children, &a.children);
                }
            }

            let mut translated = nodes.clone();
            translate_attachments(&mut translated, "es", "viewer");
            assert_viewer_untouched(&nodes, &translated);
        }
    }
}
