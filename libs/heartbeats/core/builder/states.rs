//! Type-state markers for the builder pattern
//!
//! These types are used to track whether a window capacity has been set
//! in the builder at compile-time, preventing a context without one.

use std::marker::PhantomData;

/// Marker trait for capacity state
pub trait CapacityState {}

/// Capacity has not been set
pub struct NoCapacity;
impl CapacityState for NoCapacity {}

/// Capacity has been set
pub struct HasCapacity;
impl CapacityState for HasCapacity {}

/// Phantom marker to prevent direct construction
#[derive(Debug, Clone, Copy)]
pub struct TypeState<C> {
    _capacity: PhantomData<C>,
}

impl<C> TypeState<C> {
    pub(crate) fn new() -> Self {
        Self {
            _capacity: PhantomData,
        }
    }
}

impl<C> Default for TypeState<C> {
    fn default() -> Self {
        Self::new()
    }
}
