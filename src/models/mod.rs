pub mod event;
pub mod society;
pub mod user;

pub use event::{Event, EventDraft, Organizer};
pub use society::Society;
pub use user::User;
