//! Navigation keys, per-locale label dictionaries and fallback chains.
//!
//! Labels for sidebar groups are not written inline. A group names a
//! [`NavigationKey`] and the label is looked up in the [`LocaleDictionary`]
//! of the requested locale, walking the fallback chain when the locale has
//! no entry for the key.
//!
//! # Dictionary Files
//!
//! Dictionaries live in one YAML file per locale (`<locale>.yaml`) mapping
//! keys to display strings:
//!
//! ```yaml
//! HHK: Get Started Kit
//! Python: Python
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::NavError;

/// Symbolic identifier of a navigation label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationKey(String);

impl NavigationKey {
    /// Create a key from any string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NavigationKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for NavigationKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for NavigationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Labels of one locale, keyed by navigation key.
///
/// Dictionaries need not be exhaustive; gaps are filled by the fallback chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleDictionary {
    labels: BTreeMap<NavigationKey, String>,
}

impl LocaleDictionary {
    /// Parse a dictionary from YAML content.
    ///
    /// Empty content yields an empty dictionary.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is not a string-to-string mapping.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Label for `key`, if this locale defines one.
    #[must_use]
    pub fn get(&self, key: &NavigationKey) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<K: Into<NavigationKey>, V: Into<String>> FromIterator<(K, V)> for LocaleDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The immutable set of locale dictionaries used for label resolution.
///
/// Constructed once and passed explicitly to the resolver.
#[derive(Clone, Debug)]
pub struct Locales {
    default_locale: String,
    /// Locales in declaration order, default first.
    order: Vec<String>,
    dictionaries: BTreeMap<String, LocaleDictionary>,
    fallbacks: BTreeMap<String, Vec<String>>,
}

impl Locales {
    /// Create a locale set containing only the default locale with an empty dictionary.
    pub fn new(default_locale: impl Into<String>) -> Self {
        let default_locale = default_locale.into();
        let mut dictionaries = BTreeMap::new();
        dictionaries.insert(default_locale.clone(), LocaleDictionary::default());
        Self {
            order: vec![default_locale.clone()],
            default_locale,
            dictionaries,
            fallbacks: BTreeMap::new(),
        }
    }

    /// Add (or replace) the dictionary of a locale.
    #[must_use]
    pub fn with_dictionary(mut self, locale: impl Into<String>, dictionary: LocaleDictionary) -> Self {
        let locale = locale.into();
        if !self.order.contains(&locale) {
            self.order.push(locale.clone());
        }
        self.dictionaries.insert(locale, dictionary);
        self
    }

    /// Set extra fallback locales consulted for `locale` before the default locale.
    #[must_use]
    pub fn with_fallback(mut self, locale: impl Into<String>, chain: Vec<String>) -> Self {
        self.fallbacks.insert(locale.into(), chain);
        self
    }

    /// Load one `<locale>.yaml` (or `.yml`) dictionary per locale from `dir`.
    ///
    /// A locale without a dictionary file gets an empty dictionary and relies
    /// entirely on its fallback chain.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Io`] or [`NavError::Parse`] when a dictionary file
    /// exists but cannot be read or parsed.
    pub fn load_dir(
        dir: &Path,
        default_locale: &str,
        locales: &[String],
        fallbacks: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, NavError> {
        let mut set = Self::new(default_locale);
        let all = std::iter::once(default_locale).chain(locales.iter().map(String::as_str));

        for locale in all {
            let dictionary = match dictionary_file(dir, locale) {
                Some(path) => {
                    let content = std::fs::read_to_string(&path).map_err(|source| NavError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    let dictionary = LocaleDictionary::from_yaml(&content)
                        .map_err(|source| NavError::Parse { path, source })?;
                    tracing::debug!(locale, labels = dictionary.len(), "Loaded navigation labels");
                    dictionary
                }
                None => {
                    tracing::warn!(locale, dir = %dir.display(), "No navigation label file for locale");
                    LocaleDictionary::default()
                }
            };
            set = set.with_dictionary(locale, dictionary);
        }

        for (locale, chain) in fallbacks {
            set = set.with_fallback(locale.clone(), chain.clone());
        }

        Ok(set)
    }

    /// The locale used when none is requested.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// All locales, default first, then in declaration order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Check whether `locale` belongs to this set.
    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.dictionaries.contains_key(locale)
    }

    /// Dictionary of a single locale.
    #[must_use]
    pub fn dictionary(&self, locale: &str) -> Option<&LocaleDictionary> {
        self.dictionaries.get(locale)
    }

    /// Locales consulted when resolving a label for `locale`, in order.
    ///
    /// The chain is the locale itself, its configured fallbacks, then the
    /// default locale, with duplicates removed.
    #[must_use]
    pub fn fallback_chain<'a>(&'a self, locale: &'a str) -> Vec<&'a str> {
        let mut chain: Vec<&str> = vec![locale];
        let configured = self.fallbacks.get(locale).into_iter().flatten();
        for next in configured
            .map(String::as_str)
            .chain(std::iter::once(self.default_locale.as_str()))
        {
            if !chain.contains(&next) {
                chain.push(next);
            }
        }
        chain
    }

    /// Resolve `key` for `locale`, walking the fallback chain.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownLocale`] for a locale outside the set and
    /// [`NavError::MissingLabel`] when no locale in the chain defines the key.
    pub fn lookup(&self, key: &NavigationKey, locale: &str) -> Result<&str, NavError> {
        if !self.contains(locale) {
            return Err(NavError::UnknownLocale(locale.to_owned()));
        }

        let chain = self.fallback_chain(locale);
        chain
            .iter()
            .find_map(|l| self.dictionaries.get(*l).and_then(|d| d.get(key)))
            .ok_or_else(|| NavError::MissingLabel {
                key: key.to_string(),
                chain: chain.iter().map(|l| (*l).to_owned()).collect(),
            })
    }
}

/// Find the dictionary file for a locale, preferring `.yaml` over `.yml`.
fn dictionary_file(dir: &Path, locale: &str) -> Option<std::path::PathBuf> {
    ["yaml", "yml"]
        .iter()
        .map(|ext| dir.join(format!("{locale}.{ext}")))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn classpad_locales() -> Locales {
        let en: LocaleDictionary = [
            ("HHK", "Get Started Kit"),
            ("Python", "Python"),
            ("Misc", "Miscellaneous"),
        ]
        .into_iter()
        .collect();
        let fr: LocaleDictionary = [("HHK", "Kit de démarrage")].into_iter().collect();
        let de: LocaleDictionary = [("Misc", "Sonstiges")].into_iter().collect();

        Locales::new("en")
            .with_dictionary("en", en)
            .with_dictionary("fr", fr)
            .with_dictionary("de", de)
            .with_fallback("de", vec!["fr".to_owned()])
    }

    #[test]
    fn test_dictionary_from_yaml() {
        let dict = LocaleDictionary::from_yaml("HHK: Get Started Kit\nHH3: HollyHock 3\n").unwrap();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(&"HHK".into()), Some("Get Started Kit"));
        assert_eq!(dict.get(&"Python".into()), None);
    }

    #[test]
    fn test_dictionary_from_empty_yaml() {
        let dict = LocaleDictionary::from_yaml("  \n").unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn test_dictionary_rejects_nested_values() {
        assert!(LocaleDictionary::from_yaml("HHK:\n  nested: true\n").is_err());
    }

    #[test]
    fn test_fallback_chain_default_locale() {
        let locales = classpad_locales();
        assert_eq!(locales.fallback_chain("en"), vec!["en"]);
    }

    #[test]
    fn test_fallback_chain_configured() {
        let locales = classpad_locales();
        assert_eq!(locales.fallback_chain("de"), vec!["de", "fr", "en"]);
        assert_eq!(locales.fallback_chain("fr"), vec!["fr", "en"]);
    }

    #[test]
    fn test_lookup_direct_hit() {
        let locales = classpad_locales();
        assert_eq!(
            locales.lookup(&"HHK".into(), "fr").unwrap(),
            "Kit de démarrage"
        );
    }

    #[test]
    fn test_lookup_walks_fallback_chain() {
        let locales = classpad_locales();
        // de -> fr has HHK
        assert_eq!(
            locales.lookup(&"HHK".into(), "de").unwrap(),
            "Kit de démarrage"
        );
        // de -> fr -> en has Python
        assert_eq!(locales.lookup(&"Python".into(), "de").unwrap(), "Python");
    }

    #[test]
    fn test_lookup_missing_label_reports_chain() {
        let locales = classpad_locales();
        let err = locales.lookup(&"HH3".into(), "de").unwrap_err();

        match &err {
            NavError::MissingLabel { key, chain } => {
                assert_eq!(key, "HH3");
                assert_eq!(chain, &vec!["de", "fr", "en"]);
            }
            other => panic!("Expected MissingLabel, got {other:?}"),
        }
        assert!(err.to_string().contains("de -> fr -> en"));
    }

    #[test]
    fn test_lookup_unknown_locale() {
        let locales = classpad_locales();
        let err = locales.lookup(&"HHK".into(), "ja").unwrap_err();
        assert!(matches!(err, NavError::UnknownLocale(ref l) if l == "ja"));
    }

    #[test]
    fn test_locales_order() {
        let locales = classpad_locales();
        let order: Vec<_> = locales.locales().collect();
        assert_eq!(order, vec!["en", "fr", "de"]);
    }

    #[test]
    fn test_load_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("en.yaml"), "HHK: Get Started Kit\n").unwrap();
        fs::write(temp_dir.path().join("fr.yml"), "HHK: Kit de démarrage\n").unwrap();

        let locales = Locales::load_dir(
            temp_dir.path(),
            "en",
            &["en".to_owned(), "fr".to_owned(), "de".to_owned()],
            &BTreeMap::new(),
        )
        .unwrap();

        assert_eq!(locales.default_locale(), "en");
        assert_eq!(locales.locales().collect::<Vec<_>>(), vec!["en", "fr", "de"]);
        assert_eq!(
            locales.lookup(&"HHK".into(), "fr").unwrap(),
            "Kit de démarrage"
        );
        // de has no file and falls back to en
        assert!(locales.dictionary("de").unwrap().is_empty());
        assert_eq!(
            locales.lookup(&"HHK".into(), "de").unwrap(),
            "Get Started Kit"
        );
    }

    #[test]
    fn test_load_dir_parse_error_names_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("en.yaml"), "- not\n- a map\n").unwrap();

        let err =
            Locales::load_dir(temp_dir.path(), "en", &["en".to_owned()], &BTreeMap::new())
                .unwrap_err();

        assert!(matches!(err, NavError::Parse { .. }));
        assert!(err.to_string().contains("en.yaml"));
    }
}
