//! Key extraction used by [`RbTree`](crate::RbTree).
//!
//! The tree never inspects a stored value directly: a [`KeyOfValue`] picks the
//! key out of the value and a [`Compare`] from the `compare` crate orders two
//! keys. The comparator must be a total order, two keys are treated as equal
//! when it returns [`Ordering::Equal`].

use std::cmp::Ordering;

use compare::Compare;

/// Extracts the ordering key from a stored value.
pub trait KeyOfValue<V> {
    type Key;

    fn key<'a>(&self, value: &'a V) -> &'a Self::Key;
}

/// The value is its own key, as in a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Identity;

impl<V> KeyOfValue<V> for Identity {
    type Key = V;

    #[inline]
    fn key<'a>(&self, value: &'a V) -> &'a V {
        value
    }
}

/// The key is the first element of a `(key, value)` pair, as in a map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SelectFirst;

impl<K, V> KeyOfValue<(K, V)> for SelectFirst {
    type Key = K;

    #[inline]
    fn key<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }
}

/// Compares two stored values by their keys.
///
/// Returned by [`RbMap::value_comp`](crate::RbMap::value_comp).
#[derive(Debug, Clone)]
pub struct ValueCompare<C, KoV> {
    compare: C,
    key_of: KoV,
}

impl<C, KoV> ValueCompare<C, KoV> {
    pub(crate) fn new(compare: C, key_of: KoV) -> Self {
        Self { compare, key_of }
    }
}

impl<V, C, KoV> Compare<V> for ValueCompare<C, KoV>
where
    KoV: KeyOfValue<V>,
    C: Compare<KoV::Key>,
{
    #[inline]
    fn compare(&self, a: &V, b: &V) -> Ordering {
        self.compare.compare(self.key_of.key(a), self.key_of.key(b))
    }
}
