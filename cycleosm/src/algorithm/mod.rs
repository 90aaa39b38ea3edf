pub mod buffer;
pub mod classification;
pub mod extraction;
pub mod hex;
pub mod inference;
