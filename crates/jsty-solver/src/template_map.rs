//! Template type maps: the generic bindings attached to a type.
//!
//! A map is an ordered list of `(key, value)` entries. Keys are template type
//! handles (`TypeData::Template`), compared by identity and unique within a
//! map. A missing value means the key is not instantiated yet; comparisons
//! read such a key as `?`, and substitution leaves it in place.

use smallvec::SmallVec;

use crate::types::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TemplateBinding {
    pub key: TypeId,
    pub value: Option<TypeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TemplateTypeMap {
    entries: SmallVec<[TemplateBinding; 2]>,
}

impl TemplateTypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map declaring `keys` with nothing bound.
    pub fn from_keys(keys: &[TypeId]) -> Self {
        let mut map = Self::new();
        for &key in keys {
            map.push_unique(TemplateBinding { key, value: None });
        }
        map
    }

    /// A map binding `values[i]` to `keys[i]`. Keys past the end of
    /// `values` stay unbound; surplus values are ignored.
    pub fn from_bindings(keys: &[TypeId], values: &[TypeId]) -> Self {
        let mut map = Self::new();
        for (i, &key) in keys.iter().enumerate() {
            map.push_unique(TemplateBinding {
                key,
                value: values.get(i).copied(),
            });
        }
        map
    }

    fn push_unique(&mut self, binding: TemplateBinding) {
        if !self.has_key(binding.key) {
            self.entries.push(binding);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TemplateBinding] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.entries.iter().map(|b| b.key)
    }

    pub fn has_key(&self, key: TypeId) -> bool {
        self.entries.iter().any(|b| b.key == key)
    }

    /// The bound value of `key`, if any.
    pub fn value(&self, key: TypeId) -> Option<TypeId> {
        self.entries
            .iter()
            .find(|b| b.key == key)
            .and_then(|b| b.value)
    }

    /// The value of `key` for comparison purposes: unbound and absent keys
    /// read as `?`.
    pub fn resolved_value(&self, key: TypeId) -> TypeId {
        self.value(key).unwrap_or(TypeId::UNKNOWN)
    }

    pub fn unfilled_count(&self) -> usize {
        self.entries.iter().filter(|b| b.value.is_none()).count()
    }

    pub fn has_unfilled_keys(&self) -> bool {
        self.entries.iter().any(|b| b.value.is_none())
    }

    /// The keys that are still unbound, in declaration order.
    pub fn unfilled_keys(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.entries
            .iter()
            .filter(|b| b.value.is_none())
            .map(|b| b.key)
    }

    /// Bind `key`, adding it if absent.
    pub fn bind(&mut self, key: TypeId, value: TypeId) {
        if let Some(entry) = self.entries.iter_mut().find(|b| b.key == key) {
            entry.value = Some(value);
        } else {
            self.entries.push(TemplateBinding {
                key,
                value: Some(value),
            });
        }
    }

    /// Overlay `other` on this map.
    ///
    /// `other`'s entries come first and its bound values win on a shared key.
    /// A key `other` declares but leaves unbound keeps this map's value.
    pub fn extend(&self, other: &TemplateTypeMap) -> TemplateTypeMap {
        let mut result = TemplateTypeMap::new();
        for binding in &other.entries {
            let value = binding.value.or_else(|| self.value(binding.key));
            result.entries.push(TemplateBinding {
                key: binding.key,
                value,
            });
        }
        for binding in &self.entries {
            result.push_unique(*binding);
        }
        result
    }

    /// Fill unbound keys in declaration order. Values that do not fit are
    /// dropped.
    pub fn add_values(&self, values: &[TypeId]) -> TemplateTypeMap {
        let mut result = self.clone();
        let mut values = values.iter().copied();
        for entry in result.entries.iter_mut() {
            if entry.value.is_none() {
                match values.next() {
                    Some(value) => entry.value = Some(value),
                    None => break,
                }
            }
        }
        result
    }

    /// A copy without the entries whose key matches `remove`.
    pub fn without_keys(&self, mut remove: impl FnMut(TypeId) -> bool) -> TemplateTypeMap {
        TemplateTypeMap {
            entries: self
                .entries
                .iter()
                .filter(|b| !remove(b.key))
                .copied()
                .collect(),
        }
    }

    pub fn bound_values(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.entries.iter().filter_map(|b| b.value)
    }
}

#[cfg(test)]
#[path = "tests/template_map_tests.rs"]
mod tests;
