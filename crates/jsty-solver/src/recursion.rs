//! Recursion guard for cycle detection, depth limiting and iteration
//! bounding in the lattice's recursive walks.
//!
//! The match caches stop true cycles between structural types. The guard
//! backs them up for graphs that are acyclic but pathologically deep, and
//! for walks that have no cache at all (display, substitution).
//!
//! # Profiles
//!
//! [`RecursionProfile`] names the limit pair each walk uses:
//!
//! ```ignore
//! let guard = RecursionGuard::with_profile(RecursionProfile::SubtypeCheck);
//! ```
//!
//! # Safety
//!
//! - Dropping a guard with active entries panics in debug builds.
//! - Leaving a key that was never entered panics in debug builds.
//! - Iteration counting saturates.

use jsty_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Subtype checks, including implicit structural matches.
    ///
    /// depth = 100, iterations = 100,000
    SubtypeCheck,

    /// Equivalence checks under any policy.
    ///
    /// depth = 100, iterations = 100,000
    Equivalence,

    /// Template substitution during generic instantiation.
    ///
    /// depth = 50, iterations = 100,000
    Instantiation,

    /// Rendering a type as text.
    ///
    /// depth = 20, iterations = 100,000
    Display,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::SubtypeCheck => limits::MAX_SUBTYPE_DEPTH,
            Self::Equivalence => limits::MAX_SUBTYPE_DEPTH,
            Self::Instantiation => limits::MAX_INSTANTIATION_DEPTH,
            Self::Display => limits::MAX_DISPLAY_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::Custom { max_iterations, .. } => max_iterations,
            _ => limits::MAX_SUBTYPE_ITERATIONS,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already being visited.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks the keys on the current recursion path.
///
/// ```ignore
/// match guard.enter(key) {
///     RecursionResult::Entered => {
///         let result = do_work();
///         guard.leave(key);
///         result
///     }
///     RecursionResult::Cycle => assume_match(),
///     _ => give_up(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    max_visiting: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            max_visiting: 10_000,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter the computation for `key`. On `Entered` the caller must
    /// call [`leave`](Self::leave) with the same key.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.visiting.len() as u32 >= self.max_visiting {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }

        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);
        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not being visited"
        );
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Sticky: stays set once any limit was hit.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries",
                self.visiting.len(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// DepthCounter
// ---------------------------------------------------------------------------

/// Depth-only guard for walks that may legitimately revisit a key.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Returns `false` at the limit; do not call `leave` in that case.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave() called at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!("DepthCounter dropped at depth {}", self.depth);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_limits_follow_common_limits() {
        assert_eq!(
            RecursionProfile::SubtypeCheck.max_depth(),
            limits::MAX_SUBTYPE_DEPTH
        );
        assert_eq!(
            RecursionProfile::Instantiation.max_depth(),
            limits::MAX_INSTANTIATION_DEPTH
        );
        assert_eq!(RecursionProfile::Display.max_depth(), 20);
        let custom = RecursionProfile::Custom {
            max_depth: 7,
            max_iterations: 42,
        };
        assert_eq!(custom.max_depth(), 7);
        assert_eq!(custom.max_iterations(), 42);
    }

    #[test]
    fn enter_leave_and_cycle() {
        let mut guard = RecursionGuard::new(10, 100);
        assert_eq!(guard.enter(1u32), RecursionResult::Entered);
        assert!(guard.is_visiting(&1));
        assert_eq!(guard.enter(1), RecursionResult::Cycle);
        assert_eq!(guard.depth(), 1);
        guard.leave(1);
        assert!(!guard.is_active());
    }

    #[test]
    fn depth_limit_is_sticky() {
        let mut guard = RecursionGuard::new(2, 100);
        assert!(guard.enter(1u32).is_entered());
        assert!(guard.enter(2).is_entered());
        assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
        guard.leave(2);
        guard.leave(1);
        assert!(guard.is_exceeded());
    }

    #[test]
    fn iteration_limit() {
        let mut guard = RecursionGuard::new(10, 3);
        for key in 0u32..3 {
            assert!(guard.enter(key).is_entered());
            guard.leave(key);
        }
        assert_eq!(guard.enter(9), RecursionResult::IterationExceeded);
    }

    #[test]
    fn depth_counter_stops_at_limit() {
        let mut counter = DepthCounter::new(1);
        assert!(counter.enter());
        assert!(!counter.enter());
        assert!(counter.is_exceeded());
        counter.leave();
        assert_eq!(counter.depth(), 0);
    }
}
