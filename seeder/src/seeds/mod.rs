pub mod admin;
pub mod attendance_session;
pub mod roster;
