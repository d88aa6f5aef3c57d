// Block model core: header detection, block segmentation, reassembly and the
// render cycle that ties them together. Every stage is a pure function of its
// inputs; no state survives between cycles.

pub mod assemble;
pub mod cycle;
pub mod handlers;
pub mod header;
pub mod model;
pub mod segment;
