//! External service integrations.

pub mod cloudflare_client {
    pub use crate::cloudflare_client::*;
}

pub mod lifecycle_client {
    pub use crate::lifecycle_client::*;
}
