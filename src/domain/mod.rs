pub mod cell;
pub mod collision;
pub mod generate;
pub mod goal;
pub mod grid;
pub mod navigator;
