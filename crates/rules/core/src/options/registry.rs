//! Domain-keyed roll option storage.
use std::collections::{BTreeMap, BTreeSet};

/// Domain that every roll-option query includes.
pub const ALL_DOMAIN: &str = "all";

/// Mutable `domain -> option -> bool` registry rebuilt on every preparation pass.
///
/// Backed by ordered maps so iteration (and therefore every derived value) is
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollOptionRegistry {
    domains: BTreeMap<String, BTreeMap<String, bool>>,
}

impl RollOptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the `all` domain from persisted flags.
    pub fn with_all(options: impl IntoIterator<Item = (String, bool)>) -> Self {
        let mut registry = Self::new();
        registry
            .domains
            .insert(ALL_DOMAIN.to_owned(), options.into_iter().collect());
        registry
    }

    /// Sets `option` in `domain`, overwriting any previous value.
    pub fn set(&mut self, domain: &str, option: impl Into<String>, value: bool) {
        self.domains
            .entry(domain.to_owned())
            .or_default()
            .insert(option.into(), value);
    }

    /// Removes `option` from `domain`. Returns the previous value.
    pub fn remove(&mut self, domain: &str, option: &str) -> Option<bool> {
        self.domains.get_mut(domain)?.remove(option)
    }

    /// Stored value of a single option, `None` when it was never set.
    pub fn value(&self, domain: &str, option: &str) -> Option<bool> {
        self.domains.get(domain)?.get(option).copied()
    }

    /// Returns true when the option is set and true.
    pub fn is_set(&self, domain: &str, option: &str) -> bool {
        self.value(domain, option).unwrap_or(false)
    }

    /// All entries of a domain, including false ones.
    pub fn domain(&self, domain: &str) -> Option<&BTreeMap<String, bool>> {
        self.domains.get(domain)
    }

    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// True options across `domains` plus `all`, sorted and de-duplicated.
    ///
    /// Unknown domains contribute nothing.
    pub fn get(&self, domains: &[&str]) -> Vec<String> {
        self.option_set(domains).into_iter().collect()
    }

    /// Same as [`Self::get`], as a set for predicate testing.
    pub fn option_set(&self, domains: &[&str]) -> BTreeSet<String> {
        core::iter::once(ALL_DOMAIN)
            .chain(domains.iter().copied())
            .filter_map(|domain| self.domains.get(domain))
            .flat_map(|options| options.iter())
            .filter(|(_, value)| **value)
            .map(|(option, _)| option.clone())
            .collect()
    }

    /// Finds a counted option (`<option>:<n>`) in `domain` and returns `n`.
    pub fn count_of(&self, domain: &str, option: &str) -> Option<u32> {
        let prefix = format!("{option}:");
        self.domains.get(domain)?.keys().find_map(|key| {
            key.strip_prefix(&prefix)
                .and_then(|suffix| suffix.parse::<u32>().ok())
                .filter(|count| *count > 0)
        })
    }

    /// Increments the counted option `<option>:<n>` in `domain`, starting at 1.
    pub fn increment(&mut self, domain: &str, option: &str) -> u32 {
        let next = match self.count_of(domain, option) {
            Some(count) => {
                self.remove(domain, &format!("{option}:{count}"));
                count + 1
            }
            None => 1,
        };
        self.set(domain, format!("{option}:{next}"), true);
        next
    }
}

/// Strips characters that are not allowed in a domain name.
pub fn sanitize_domain(domain: &str) -> String {
    domain
        .chars()
        .filter(|c| *c == '-' || c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Normalizes an option string: keeps word characters, `-` and `:`, and
/// collapses runs of separators.
pub fn sanitize_option(option: &str) -> String {
    let mut sanitized = String::with_capacity(option.len());
    for c in option.chars() {
        let allowed = c == '-' || c == ':' || c == '_' || c.is_ascii_alphanumeric();
        if !allowed {
            continue;
        }
        if (c == ':' || c == '-') && sanitized.ends_with(c) {
            continue;
        }
        sanitized.push(c);
    }
    sanitized
}

/// Lowercase, hyphen-separated slug of a display name.
pub fn sluggify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if c != '\'' && !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
