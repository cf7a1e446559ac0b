pub mod client;
pub mod error;
pub mod normalize;
pub(crate) mod retry;
pub mod types;

pub use client::PublishedClient;
pub use error::ApiError;
pub use normalize::member_from_response;
pub use types::{MemberResponse, PublishedMember, RatingEntry};
