mod error;
mod session;

pub use error::CoreError;
pub use session::{build_permalink, open, CoreSession};

#[allow(
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::empty_line_after_doc_comments,
    clippy::missing_safety_doc
)]
mod scaffolding {
    use super::{build_permalink, open, CoreError, CoreSession};
    use crate::{providers::ProviderSummary, RepositoryState};

    uniffi::include_scaffolding!("permalink_core");
}

pub use scaffolding::*;
