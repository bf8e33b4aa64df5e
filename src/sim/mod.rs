pub mod event;
pub mod motion;
pub mod session;
pub mod step;
