//! imviz-events - Event-stream selector grammar
//!
//! This crate parses the event-selector mini-grammar used by the imviz
//! selection compiler to bind interactions to pointer/keyboard streams:
//!
//! # Selector Syntax
//!
//! - **Plain events**: `click`, `mousemove`, `wheel`
//! - **Sourced events**: `window:mouseup` (a named event source)
//! - **Scoped events**: `@cell:click` (events originating inside a named
//!   group mark)
//! - **Filter predicates**: `mousedown[!eventItem().isBrush]` (opaque
//!   bracketed expressions evaluated by the runtime)
//! - **Drag gestures**: `[@cell:mousedown, window:mouseup] > window:mousemove`
//!   (a three-stage composite: start, end, middle)
//!
//! # Examples
//!
//! ```ignore
//! use imviz_events::parse_event_selector;
//!
//! let sel = parse_event_selector("@cell:click")?;
//! let sel = parse_event_selector("[@cell:mousedown[!eventItem().isBrush], window:mouseup] > window:mousemove")?;
//! ```

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::*;
