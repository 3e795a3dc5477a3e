pub mod ayah;
pub mod token;

pub use ayah::AyahPayload;
pub use token::{IssuedToken, Token};
