pub mod hook_user;
pub mod invitation;
pub mod normalized_email;
