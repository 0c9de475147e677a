//! The trust scoring engine.
//!
//! [`formulas`] holds the pure numeric policy (step functions, weighted
//! averages); [`TrustCalculator`] binds the formulas to the injected
//! collaborators; [`policy`] decides whether a recomputed value is worth
//! announcing.

pub mod calculator;
pub mod formulas;
pub mod policy;

pub use calculator::TrustCalculator;
pub use policy::should_publish;
