//! External service integrations.

pub mod prediction_client {
    pub use crate::prediction_client::*;
}

pub mod remote_scorer {
    pub use crate::remote_scorer::*;
}
