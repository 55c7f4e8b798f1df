//! # Menagerie Assembler
//!
//! Model assembly (linking) for the Menagerie agent-based simulation
//! language. Given the parsed syntax trees of a model and everything it
//! imports, the assembler produces a single
//! [`ModelDescription`](menagerie_core::model::ModelDescription): every
//! species, nested micro-species and experiment resolved, linked to its
//! parent and carrying the members it inherits.
//!
//! ## Pipeline
//!
//! 1. **Pragmas** - configure diagnostic filtering, check required plugins
//! 2. **Collect** - merge global facets, gather declarations across files
//! 3. **Graft** - splice pre-built sub-models under the primary model
//! 4. **Instantiate** - create member-less description shells
//! 5. **Resolve** - attach each description to its parent
//! 6. **Complement** - copy each declaration's members into its description
//! 7. **Inherit** - merge parent members down, in hierarchy order;
//!    experiments are finalized as soon as they are merged
//! 8. **Schedule** - move legacy global scheduling facets onto a species
//! 9. **Finalize** - validate and lock every description
//!
//! See [`Assembler`] for an example.

mod assemble;
mod collect;
mod complement;
mod context;
pub mod error;
mod finalize;
mod hierarchy;
mod inherit;
mod instantiate;
mod pragma;
mod resolve;
mod scheduler;

pub use assemble::{Assembler, AssemblyConfig, AssemblyRequest};
pub use error::AssembleError;
