pub mod agp;
pub mod anchor;
pub mod chain;
pub mod constraint;
pub mod error;
pub mod hit;
pub mod interval;
pub mod io;
pub mod pairing;
pub mod project;

pub use error::AnchainError;
