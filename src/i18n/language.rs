//! Language-tag helpers.
//!
//! Resolved codes may carry a region subtag (e.g. `pt-BR`). A regioned
//! tag is only kept when the provider supports that exact tag; otherwise
//! it is truncated to its base two-letter code.

use crate::i18n::LanguageCatalog;

/// True if the code carries a region subtag (e.g. `pt-BR`, `zh-TW`).
pub fn has_region_subtag(code: &str) -> bool {
    code.contains('-')
}

/// Base two-letter code of a language tag (`pt-BR` -> `pt`).
///
/// Codes shorter than two characters are returned unchanged.
pub fn base_code(code: &str) -> &str {
    code.get(..2).unwrap_or(code)
}

/// Normalize a resolved code against the catalog: regioned tags absent
/// from the supported set are truncated to their base code, everything
/// else passes through verbatim.
pub fn effective_code(code: &str, catalog: &LanguageCatalog) -> String {
    if has_region_subtag(code) && !catalog.is_supported(code) {
        return base_code(code).to_string();
    }
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::SupportedLanguage;

    fn catalog_with(codes: &[&str]) -> LanguageCatalog {
        let mut catalog = LanguageCatalog::new();
        catalog.set_supported(
            codes
                .iter()
                .map(|code| SupportedLanguage {
                    language: code.to_string(),
                    name: None,
                })
                .collect(),
        );
        catalog
    }

    #[test]
    fn test_has_region_subtag() {
        assert!(has_region_subtag("pt-BR"));
        assert!(has_region_subtag("zh-TW"));
        assert!(!has_region_subtag("en"));
        assert!(!has_region_subtag(""));
    }

    #[test]
    fn test_base_code() {
        assert_eq!(base_code("pt-BR"), "pt");
        assert_eq!(base_code("en"), "en");
        assert_eq!(base_code("e"), "e");
        assert_eq!(base_code(""), "");
    }

    #[test]
    fn test_effective_code_unregioned_passes_through() {
        let catalog = catalog_with(&["en", "es"]);
        assert_eq!(effective_code("es", &catalog), "es");
        // Even codes the catalog doesn't list: truncation only applies to
        // regioned tags
        assert_eq!(effective_code("fr", &catalog), "fr");
    }

    #[test]
    fn test_effective_code_supported_region_kept() {
        let catalog = catalog_with(&["en", "pt-BR"]);
        assert_eq!(effective_code("pt-BR", &catalog), "pt-BR");
    }

    #[test]
    fn test_effective_code_unsupported_region_truncated() {
        let catalog = catalog_with(&["en", "pt"]);
        assert_eq!(effective_code("pt-BR", &catalog), "pt");
    }

    #[test]
    fn test_effective_code_empty_catalog_truncates_regions() {
        let catalog = LanguageCatalog::new();
        assert_eq!(effective_code("pt-BR", &catalog), "pt");
        assert_eq!(effective_code("en", &catalog), "en");
    }
}
