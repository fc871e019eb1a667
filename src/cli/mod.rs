pub mod manual;
pub mod menu;
