pub mod algorithms;
pub mod tagged_signature;
