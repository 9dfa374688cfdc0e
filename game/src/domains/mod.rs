pub mod devices;
pub mod inventory;
pub mod physiology;
