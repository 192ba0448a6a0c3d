mod card_state;
mod link_target;
mod ogp;

pub use card_state::{CardState, FailureReason};
pub use link_target::LinkTarget;
pub use ogp::{OgpMetadata, ProviderPreview};
