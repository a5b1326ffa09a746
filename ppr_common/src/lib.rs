mod helpers;
mod money;
mod secret;

pub use helpers::parse_seconds;
pub use money::{Kobo, KoboConversionError};
pub use secret::Secret;
