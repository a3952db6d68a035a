//! Pseudo-Boolean optimization core: encodes a restricted CVRP as a linear
//! 0/1 model, serializes it to the external solver's input format, and
//! decodes its output back into routes.
//!
//! - [`model`] — variable/literal bookkeeping and constraint serialization.
//! - [`encode`] — builds the model from an [`Instance`](crate::instance::Instance)
//!   and a set of per-vehicle candidate matrices.
//! - [`decode`] — parses solver stdout into a [`decode::DecodedSolution`].

pub mod decode;
pub mod encode;
pub mod model;

pub use decode::{decode as decode_solution, DecodedSolution};
pub use encode::encode as encode_model;
pub use model::PboModel;
