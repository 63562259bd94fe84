//! Reduced Ordered Binary Decision Diagrams with reference counting and an
//! opaque handle boundary.
//!
//! A BDD is a canonical DAG representation of a Boolean function: under a
//! fixed variable order, two functions are equal iff they are the same
//! node. [`engine::Engine`] maintains canonicity with a unique table (hash
//! consing) and keeps diagrams alive by reference counts, sweeping whole
//! subgraphs once their last owner is gone. [`session::Session`] leases
//! diagrams across an opaque boundary as generation-tagged
//! [`handle::Handle`]s that can be disposed safely in any order, any
//! number of times.
//!
//! Nodes returned by constructors and apply calls carry no implicit
//! ownership: acquire what you hold onto, release it when done.
//!
//! # Example
//!
//! ```
//! use robdd_rs::engine::Engine;
//!
//! let engine = Engine::default();
//! engine.declare_vars(2);
//!
//! let x = engine.mk_var(0);
//! let y = engine.mk_var(1);
//! let f = engine.apply_and(x, engine.apply_not(y));
//!
//! assert!(engine.evaluate(f, &[true, false]));
//! assert!(!engine.evaluate(f, &[true, true]));
//! ```
//!
//! Across the handle boundary:
//!
//! ```
//! use robdd_rs::session::Session;
//!
//! let session = Session::default();
//!
//! let a = session.create(4)?;
//! let b = session.create(4)?;
//! let c = session.and(a, b)?;
//!
//! session.dispose(a);
//! session.dispose(b);
//! session.dispose(c);
//! session.dispose(c); // disposing twice is fine
//! # Ok::<(), robdd_rs::error::EngineError>(())
//! ```

pub mod cache;
pub mod dot;
pub mod engine;
pub mod error;
pub mod handle;
pub mod node;
pub mod reference;
pub mod sat;
pub mod session;
pub mod store;
pub mod utils;
