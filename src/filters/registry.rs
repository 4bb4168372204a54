//! Filter registry for resolving filter names.

use crate::core::error::RegistryError;
use crate::core::filter::{Category, Filter, FilterMetadata};
use indexmap::IndexMap;

/// Registry entry containing the filter and its metadata.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// The filter this name resolves to.
    pub filter: Filter,
    /// Cached metadata.
    pub metadata: FilterMetadata,
}

/// Registry of all available filters, keyed by canonical name.
///
/// The registry is built once with [`FilterRegistry::with_builtins`] and is
/// read-only afterwards, so one instance can be shared by reference across
/// any number of runs. Lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    /// Filters indexed by their canonical name, in registration order.
    filters: IndexMap<String, RegistryEntry>,
    /// Filter names grouped by category.
    categories: IndexMap<Category, Vec<String>>,
}

impl FilterRegistry {
    fn empty() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry populated with every built-in filter.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        crate::filters::builtin::register_all(&mut registry);
        log::debug!("Filter registry initialised with {} filters", registry.len());
        registry
    }

    pub(crate) fn register(&mut self, filter: Filter) {
        let metadata = filter.metadata();
        let id = metadata.id.clone();
        let category = metadata.category;

        self.filters.insert(id.clone(), RegistryEntry { filter, metadata });
        self.categories.entry(category).or_default().push(id);
    }

    /// Resolve a filter by name, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<Filter, RegistryError> {
        self.get_entry(name)
            .map(|entry| entry.filter)
            .ok_or_else(|| RegistryError::UnknownFilter {
                name: name.to_string(),
                available: self.filter_ids().map(str::to_string).collect(),
            })
    }

    /// Get a registry entry.
    pub fn get_entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.filters.get(name.to_lowercase().as_str())
    }

    /// Get metadata for a filter.
    pub fn get_metadata(&self, name: &str) -> Option<&FilterMetadata> {
        self.get_entry(name).map(|e| &e.metadata)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get_entry(name).is_some()
    }

    /// Get all canonical filter names.
    pub fn filter_ids(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(|s| s.as_str())
    }

    /// Get all registered filters.
    pub fn filters(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get filters by category.
    pub fn filters_by_category(&self, category: &Category) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Search filters by name, description or tag.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.filters
            .iter()
            .filter(|(_, entry)| {
                let metadata = &entry.metadata;
                metadata.id.contains(&query)
                    || metadata.name.to_lowercase().contains(&query)
                    || metadata.description.to_lowercase().contains(&query)
                    || metadata.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Get filters grouped by category for display.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&FilterMetadata>> = IndexMap::new();

        for entry in self.filters.values() {
            grouped
                .entry(entry.metadata.category)
                .or_default()
                .push(&entry.metadata);
        }

        // Sort each category by name
        for filters in grouped.values_mut() {
            filters.sort_by(|a, b| a.name.cmp(&b.name));
        }

        grouped
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
