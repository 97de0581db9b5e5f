pub mod access;
pub mod session;
pub mod event;
pub mod invitee;
pub mod organizer;
pub mod registration;
