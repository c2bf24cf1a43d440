//! # Dispatcher configuration.
//!
//! [`DispatchConfig`] defines the dispatcher's tunables: the concurrency
//! ceiling and the event bus capacity.
//!
//! # Example
//! ```
//! use taskgate::DispatchConfig;
//!
//! let mut cfg = DispatchConfig::default();
//! cfg.max_concurrent = 4;
//!
//! assert_eq!(cfg.max_concurrent, 4);
//! assert_eq!(cfg.bus_capacity, 1024);
//! ```

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
///
/// Controls the initial concurrency ceiling and the event bus capacity.
/// The ceiling can be changed later with
/// [`Dispatcher::set_max_concurrent`](crate::Dispatcher::set_max_concurrent).
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Maximum number of tasks to run concurrently (clamped to at least 1).
    pub max_concurrent: usize,
    /// Capacity of the event bus channel (clamped to at least 1).
    pub bus_capacity: usize,
}

impl Default for DispatchConfig {
    /// Provides a default configuration:
    /// - `max_concurrent = 1` (serial execution)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            bus_capacity: 1024,
        }
    }
}

impl DispatchConfig {
    /// Returns the concurrency ceiling with the minimum of 1 applied.
    ///
    /// A ceiling of zero would make the dispatch loop unable to ever admit
    /// a task, so zero is treated as 1.
    pub fn effective_max_concurrent(&self) -> usize {
        self.max_concurrent.max(1)
    }

    /// Returns the bus capacity with the minimum of 1 applied.
    pub fn effective_bus_capacity(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = DispatchConfig::default();
        assert_eq!(cfg.max_concurrent, 1);
        assert_eq!(cfg.bus_capacity, 1024);
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let cfg = DispatchConfig {
            max_concurrent: 0,
            bus_capacity: 0,
        };
        assert_eq!(cfg.effective_max_concurrent(), 1);
        assert_eq!(cfg.effective_bus_capacity(), 1);
    }

    #[test]
    fn test_explicit_values_pass_through() {
        let cfg = DispatchConfig {
            max_concurrent: 8,
            bus_capacity: 32,
        };
        assert_eq!(cfg.effective_max_concurrent(), 8);
        assert_eq!(cfg.effective_bus_capacity(), 32);
    }
}
