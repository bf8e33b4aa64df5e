pub mod gamepad;
pub mod input;
pub mod raycast;
pub mod renderer;
pub mod sound;
