//! Label resolution for sidebar groups.
//!
//! [`LabelResolver`] turns a [`NavigationKey`] plus a [`PartialGroup`] into a
//! complete [`NavigationGroup`]. The label comes from the active locale's
//! fallback chain; the other locales' own dictionaries provide the group's
//! translations.
//!
//! # Example
//!
//! ```
//! use cpdocs_nav::{LabelResolver, LocaleDictionary, Locales, PartialGroup};
//!
//! let en: LocaleDictionary = [("HHK", "Get Started Kit")].into_iter().collect();
//! let locales = Locales::new("en").with_dictionary("en", en);
//! let resolver = LabelResolver::new(&locales);
//!
//! let group = resolver
//!     .group(&"HHK".into(), PartialGroup::items(Vec::new()).collapsed(true))
//!     .unwrap();
//! assert_eq!(group.label, "Get Started Kit");
//! assert!(group.collapsed);
//! ```

use std::collections::BTreeMap;

use crate::{Locales, NavError, NavigationGroup, NavigationKey, PartialGroup};

/// A label in the active locale plus its translations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLabel {
    /// Label in the active locale (or the first fallback that defines it).
    pub label: String,
    /// Labels defined directly by other locales' dictionaries.
    pub translations: BTreeMap<String, String>,
}

/// Resolves navigation keys against an explicit locale set.
#[derive(Clone, Debug)]
pub struct LabelResolver<'a> {
    locales: &'a Locales,
    active: String,
}

impl<'a> LabelResolver<'a> {
    /// Resolver whose active locale is the set's default locale.
    #[must_use]
    pub fn new(locales: &'a Locales) -> Self {
        Self {
            active: locales.default_locale().to_owned(),
            locales,
        }
    }

    /// Switch the active locale.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::UnknownLocale`] if `locale` is not in the set.
    pub fn with_active_locale(mut self, locale: &str) -> Result<Self, NavError> {
        if !self.locales.contains(locale) {
            return Err(NavError::UnknownLocale(locale.to_owned()));
        }
        locale.clone_into(&mut self.active);
        Ok(self)
    }

    #[must_use]
    pub fn active_locale(&self) -> &str {
        &self.active
    }

    #[must_use]
    pub fn locales(&self) -> &Locales {
        self.locales
    }

    /// Resolve a key through the active locale's fallback chain.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::MissingLabel`] if no locale in the chain defines `key`.
    pub fn resolve(&self, key: &NavigationKey) -> Result<ResolvedLabel, NavError> {
        let label = self.locales.lookup(key, &self.active)?.to_owned();

        let translations = self
            .locales
            .locales()
            .filter(|locale| *locale != self.active)
            .filter_map(|locale| {
                self.locales
                    .dictionary(locale)
                    .and_then(|d| d.get(key))
                    .map(|text| (locale.to_owned(), text.to_owned()))
            })
            .collect();

        Ok(ResolvedLabel {
            label,
            translations,
        })
    }

    /// Build a complete group from a key and a partial definition.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::MissingLabel`] if the key cannot be resolved.
    pub fn group(
        &self,
        key: &NavigationKey,
        partial: PartialGroup,
    ) -> Result<NavigationGroup, NavError> {
        let resolved = self.resolve(key)?;
        tracing::debug!(%key, label = %resolved.label, "Resolved navigation group label");
        Ok(NavigationGroup::from_partial(
            resolved.label,
            resolved.translations,
            partial,
        ))
    }
}

/// Build a group whose label is looked up by `key`.
///
/// Shorthand for [`LabelResolver::group`].
///
/// # Errors
///
/// Returns [`NavError::MissingLabel`] if the key cannot be resolved.
pub fn build_group(
    key: impl Into<NavigationKey>,
    partial: PartialGroup,
    resolver: &LabelResolver<'_>,
) -> Result<NavigationGroup, NavError> {
    resolver.group(&key.into(), partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Badge, BadgeVariant, GroupContents, LocaleDictionary, NavigationEntry, SidebarItem,
    };
    use pretty_assertions::assert_eq;

    fn locales() -> Locales {
        let en: LocaleDictionary = [("HHK", "Get Started Kit"), ("Python", "Python")]
            .into_iter()
            .collect();
        let fr: LocaleDictionary = [("HHK", "Kit de démarrage")].into_iter().collect();
        Locales::new("en")
            .with_dictionary("en", en)
            .with_dictionary("fr", fr)
    }

    #[test]
    fn test_build_group_merges_label() {
        let en: LocaleDictionary = [("HHK", "Get Started Kit")].into_iter().collect();
        let locales = Locales::new("en").with_dictionary("en", en);
        let resolver = LabelResolver::new(&locales);

        let group = build_group("HHK", PartialGroup::items(Vec::new()).collapsed(true), &resolver)
            .unwrap();

        let mut expected = NavigationGroup::new("Get Started Kit", GroupContents::Items(Vec::new()));
        expected.collapsed = true;
        assert_eq!(group, expected);
    }

    #[test]
    fn test_group_keeps_partial_fields() {
        let locales = locales();
        let resolver = LabelResolver::new(&locales);
        let items: Vec<SidebarItem> = vec![
            NavigationEntry::link("Introduction", "/python/introduction/").into(),
            NavigationEntry::link("Optimize", "/python/optimize/").into(),
        ];
        let partial = PartialGroup::items(items.clone())
            .collapsed(true)
            .with_badge(Badge::new("New", BadgeVariant::Tip));

        let group = resolver.group(&"Python".into(), partial).unwrap();

        assert_eq!(group.label, "Python");
        assert!(group.collapsed);
        assert_eq!(group.badge, Some(Badge::new("New", BadgeVariant::Tip)));
        assert_eq!(group.items().unwrap(), items.as_slice());
    }

    #[test]
    fn test_resolve_collects_translations() {
        let locales = locales();
        let resolver = LabelResolver::new(&locales);

        let resolved = resolver.resolve(&"HHK".into()).unwrap();

        assert_eq!(resolved.label, "Get Started Kit");
        assert_eq!(
            resolved.translations,
            BTreeMap::from([("fr".to_owned(), "Kit de démarrage".to_owned())])
        );
    }

    #[test]
    fn test_resolve_skips_locales_without_own_label() {
        let locales = locales();
        let resolver = LabelResolver::new(&locales);

        let resolved = resolver.resolve(&"Python".into()).unwrap();

        assert!(resolved.translations.is_empty());
    }

    #[test]
    fn test_active_locale_switch() {
        let locales = locales();
        let resolver = LabelResolver::new(&locales)
            .with_active_locale("fr")
            .unwrap();

        let resolved = resolver.resolve(&"HHK".into()).unwrap();
        assert_eq!(resolver.active_locale(), "fr");
        assert_eq!(resolved.label, "Kit de démarrage");
        assert_eq!(resolved.translations["en"], "Get Started Kit");

        // fr falls back to en
        assert_eq!(resolver.resolve(&"Python".into()).unwrap().label, "Python");
    }

    #[test]
    fn test_active_locale_unknown() {
        let locales = locales();
        let err = LabelResolver::new(&locales)
            .with_active_locale("ja")
            .unwrap_err();
        assert!(matches!(err, NavError::UnknownLocale(_)));
    }

    #[test]
    fn test_missing_label_fails() {
        let locales = locales();
        let resolver = LabelResolver::new(&locales);

        let err = build_group("HH3", PartialGroup::items(Vec::new()), &resolver).unwrap_err();

        assert!(matches!(err, NavError::MissingLabel { ref key, .. } if key == "HH3"));
        assert!(err.to_string().contains("`HH3`"));
    }
}
