pub mod catalog;
pub mod item;
pub mod normalize;
pub mod presets;
pub mod validate;
