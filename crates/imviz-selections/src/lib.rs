//! imviz-selections - Interaction selection compiler
//!
//! This crate compiles declarative *interaction selection* definitions
//! (point picks, brush intervals, toggled multi-selects bound to scales)
//! into three artifacts consumed by the reactive rendering runtime:
//!
//! - **Signals**: event-driven reactive values with explicit
//!   initialization/update/clear semantics
//! - **Stores**: named collections of currently-selected records with
//!   insert/upsert/clear mutation rules
//! - **Marks**: supplementary visuals (e.g. brush rectangles) anchored to
//!   the stores
//!
//! The compiler is a pure, single-pass transformation: it never renders,
//! never evaluates expressions, and keeps no state across invocations.
//! Behavior is contributed by an ordered registry of selection transforms
//! (`project`, `toggle`, `scales`, `interval`, `translate`, `zoom`,
//! `nearest`), each implementing up to four capability hooks.
//!
//! # Example
//!
//! ```ignore
//! use imviz_selections::{Compiler, PanelScope, SelectionMap};
//!
//! let scope = PanelScope::leaf("")
//!     .bind(Channel::X, "mass")
//!     .bind(Channel::Y, "density");
//! let select: SelectionMap = serde_json::from_str(spec_json)?;
//!
//! let output = Compiler::new().compile(&scope, &select, &[])?;
//! // output.signals / output.stores / output.marks / output.diagnostics
//! ```

pub mod artifact;
pub mod assemble;
pub mod error;
pub mod expr;
pub mod normalize;
pub mod scope;
pub mod selection;
pub mod transforms;

pub use artifact::*;
pub use assemble::*;
pub use error::*;
pub use normalize::*;
pub use scope::*;
pub use selection::*;
pub use transforms::{SelectionTransform, TransformKey, TransformRegistry};
