//! Benchmark inputs.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::Error;

/// Keys and values to insert into a container, and the order in which to
/// remove the keys again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Input<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    removal_order: Vec<K>,
}

impl<K: Clone, V> Input<K, V> {
    /// Pairs up `keys` and `values`. Keys are removed in insertion order
    /// unless told otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] unless there is exactly one value
    /// per key.
    pub fn new(keys: Vec<K>, values: Vec<V>) -> Result<Self, Error> {
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            removal_order: keys.clone(),
            keys,
            values,
        })
    }

    /// Sets the order in which keys are removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemovalOrder`] if `order` does not have one entry per
    /// key.
    pub fn with_removal_order(mut self, order: Vec<K>) -> Result<Self, Error> {
        if order.len() != self.keys.len() {
            return Err(Error::RemovalOrder {
                keys: self.keys.len(),
                order: order.len(),
            });
        }
        self.removal_order = order;
        Ok(self)
    }

    /// Shuffles the order in which keys are removed.
    pub fn shuffle_removal_order<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.removal_order.shuffle(rng);
        self
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn removal_order(&self) -> &[K] {
        &self.removal_order
    }

    /// Returns the key-value pairs in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys.iter().zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Input<u64, u64> {
    /// Generates `size` distinct keys in random order, random values, and a
    /// random removal order. The same `seed` always gives the same input.
    pub fn random(size: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut keys: Vec<u64> = (0..size as u64).collect();
        keys.shuffle(&mut rng);
        let values = (0..size).map(|_| rng.gen()).collect();
        let mut removal_order = keys.clone();
        removal_order.shuffle(&mut rng);
        Self {
            keys,
            values,
            removal_order,
        }
    }
}
