// Fleetform Kernel
//
// Converts Fleet integration policies into Terraform resource declarations.

pub mod convert;
pub mod document;
pub mod emit;
pub mod render;
