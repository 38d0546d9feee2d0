//! # Models
//!
//! Wire types exchanged with OWLDB and the client-side projections built from them.

pub mod auth;
pub mod document;
pub mod patch;
pub mod post;
pub mod reaction;

pub use auth::{CreatedResponse, LoginRequest, TokenResponse};
pub use document::{DbDocument, Meta, doc_name};
pub use patch::{PatchKind, PatchOp};
pub use post::{Extensions, NewPost, PostBody, PostDocument, PostItem, SCHEDULED_TIME_KEY};
pub use reaction::{ReactionKind, Reactions, empty_reactions, reaction_counts};
