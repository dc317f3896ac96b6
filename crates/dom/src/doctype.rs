//! DOCTYPE clause data, including the lazily computed translated identifier
//! pair used for dialect-specific DTD rewriting on output.

use std::sync::OnceLock;

/// One rewrite rule: a (public id, system id) pair to recognize and the
/// pair to emit instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTypeTranslation {
    pub from_public_id: Option<String>,
    pub from_system_id: Option<String>,
    pub to_public_id: Option<String>,
    pub to_system_id: Option<String>,
}

#[derive(Debug)]
pub struct DocType {
    root_element_name: String,
    public_id: Option<String>,
    system_id: Option<String>,
    // Resolved at most once per document; translation tables are
    // configuration-scoped and do not change mid-render.
    translated: OnceLock<(Option<String>, Option<String>)>,
}

impl DocType {
    pub fn new(root_element_name: &str, public_id: Option<&str>, system_id: Option<&str>) -> Self {
        DocType {
            root_element_name: root_element_name.to_string(),
            public_id: public_id.map(str::to_string),
            system_id: system_id.map(str::to_string),
            translated: OnceLock::new(),
        }
    }

    pub fn root_element_name(&self) -> &str {
        &self.root_element_name
    }

    pub fn public_id(&self) -> Option<&str> {
        self.public_id.as_deref()
    }

    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }

    /// The identifier pair to serialize, after applying the first matching
    /// translation. Computed on first use and cached for the lifetime of
    /// the document.
    pub fn translated_ids(
        &self,
        translations: &[DocTypeTranslation],
    ) -> (Option<&str>, Option<&str>) {
        let (public, system) = self.translated.get_or_init(|| {
            for t in translations {
                if t.from_public_id == self.public_id && t.from_system_id == self.system_id {
                    return (t.to_public_id.clone(), t.to_system_id.clone());
                }
            }
            (self.public_id.clone(), self.system_id.clone())
        });
        (public.as_deref(), system.as_deref())
    }
}

impl Clone for DocType {
    fn clone(&self) -> Self {
        let translated = OnceLock::new();
        if let Some(resolved) = self.translated.get() {
            let _ = translated.set(resolved.clone());
        }
        DocType {
            root_element_name: self.root_element_name.clone(),
            public_id: self.public_id.clone(),
            system_id: self.system_id.clone(),
            translated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xhtml_translation() -> DocTypeTranslation {
        DocTypeTranslation {
            from_public_id: Some("-//W3C//DTD XHTML 1.0 Strict//EN".into()),
            from_system_id: Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd".into()),
            to_public_id: None,
            to_system_id: None,
        }
    }

    #[test]
    fn translation_applies_on_exact_match() {
        let doctype = DocType::new(
            "html",
            Some("-//W3C//DTD XHTML 1.0 Strict//EN"),
            Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"),
        );
        let (public, system) = doctype.translated_ids(&[xhtml_translation()]);
        assert_eq!(public, None);
        assert_eq!(system, None);
    }

    #[test]
    fn unmatched_ids_pass_through() {
        let doctype = DocType::new("html", Some("-//OTHER//EN"), None);
        let (public, system) = doctype.translated_ids(&[xhtml_translation()]);
        assert_eq!(public, Some("-//OTHER//EN"));
        assert_eq!(system, None);
    }

    #[test]
    fn translation_is_computed_once() {
        let doctype = DocType::new(
            "html",
            Some("-//W3C//DTD XHTML 1.0 Strict//EN"),
            Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"),
        );
        let _ = doctype.translated_ids(&[xhtml_translation()]);
        // A different table on the second call does not change the result.
        let (public, _) = doctype.translated_ids(&[]);
        assert_eq!(public, None);
    }
}
