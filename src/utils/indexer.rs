/*!
# Indexer

Interns arbitrary hashable keys (usually vertex names read from a file) as dense vertex ids
`0, 1, 2, ...` in order of first appearance.
*/

use std::{borrow::Borrow, hash::Hash};

use bimap::BiHashMap;

use crate::node::*;

/// Bijection between external keys and dense vertex ids
#[derive(Clone, Debug)]
pub struct Indexer<K: Eq + Hash> {
    ids: BiHashMap<K, Node>,
}

impl<K: Eq + Hash> Default for Indexer<K> {
    fn default() -> Self {
        Self {
            ids: BiHashMap::new(),
        }
    }
}

impl<K> Indexer<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `key`, assigning the next free id if `key` is new.
    ///
    /// # Example
    /// ```
    /// use sgraphs::utils::Indexer;
    ///
    /// let mut indexer: Indexer<String> = Indexer::new();
    /// assert_eq!(indexer.get_or_insert("alice"), 0);
    /// assert_eq!(indexer.get_or_insert("bob"), 1);
    /// assert_eq!(indexer.get_or_insert("alice"), 0);
    /// ```
    pub fn get_or_insert<Q>(&mut self, key: &Q) -> Node
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(&id) = self.ids.get_by_left(key) {
            return id;
        }
        let id = self.ids.len() as Node;
        self.ids.insert(key.to_owned(), id);
        id
    }

    /// Id of `key` if it was interned before
    pub fn index_of<Q>(&self, key: &Q) -> Option<Node>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.ids.get_by_left(key).copied()
    }

    /// Key that was assigned the id `id`
    pub fn key_of(&self, id: Node) -> Option<&K> {
        self.ids.get_by_right(&id)
    }

    /// Returns all `(key, id)` pairs ordered by id
    pub fn keys(&self) -> impl Iterator<Item = (&K, Node)> + '_ {
        (0..self.len()).filter_map(|id| self.key_of(id).map(|key| (key, id)))
    }

    pub fn len(&self) -> NumNodes {
        self.ids.len() as NumNodes
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn ids_follow_first_appearance() {
        let mut indexer: Indexer<String> = Indexer::new();
        let ids = ["b", "a", "b", "c", "a"]
            .iter()
            .map(|&s| indexer.get_or_insert(s))
            .collect_vec();

        assert_eq!(ids, vec![0, 1, 0, 2, 1]);
        assert_eq!(indexer.len(), 3);
        assert_eq!(indexer.index_of("c"), Some(2));
        assert_eq!(indexer.index_of(&"d".to_string()), None);
        assert_eq!(indexer.key_of(1).map(String::as_str), Some("a"));
        assert_eq!(
            indexer.keys().map(|(k, _)| k.as_str()).collect_vec(),
            vec!["b", "a", "c"]
        );
    }
}
