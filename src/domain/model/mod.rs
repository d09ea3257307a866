mod account;
mod group;

pub use account::{mask_token, AccountRecord};
pub use group::Group;
