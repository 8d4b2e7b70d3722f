// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// An ordered name to value map.
///
/// Used both for element attributes and for `style` declarations.
/// Names are unique and the insertion order is preserved,
/// so a document can be written back in the same order it was read.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Attributes(Vec::new())
    }

    /// Returns a value by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Checks that a value with the specified name is present.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(n, _)| n == name)
    }

    /// Sets a value.
    ///
    /// An existing value is replaced in place and keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Removes a value and returns it.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(idx).1)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks that the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over name/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Parses a CSS declaration list, like the content of a `style` attribute.
    ///
    /// Later declarations override earlier ones.
    pub fn from_declarations(text: &str) -> Self {
        let mut list = Attributes::new();
        for declaration in simplecss::DeclarationTokenizer::from(text) {
            list.insert(declaration.name, declaration.value);
        }

        list
    }

    /// Writes entries as a CSS declaration list.
    pub fn to_declarations(&self) -> String {
        let mut s = String::new();
        for (name, value) in self.iter() {
            if !s.is_empty() {
                s.push_str("; ");
            }

            s.push_str(name);
            s.push(':');
            s.push_str(value);
        }

        s
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = Attributes::new();
        for (name, value) in iter {
            list.insert(name, value);
        }

        list
    }
}
