mod post;
mod profile;
mod user;

pub use post::Post;
pub use profile::{Education, Experience, Profile, ProfileFields, ProfileView, Social};
pub use user::{User, UserSummary};
