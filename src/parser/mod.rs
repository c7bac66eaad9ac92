//! Hand-written line-oriented parsers for the `.obj`/`.mtl`-like scene grammar.

pub mod mtl;
pub mod obj;
