pub mod collector;
pub mod escalator;
pub mod reducer;
pub mod reporter;
pub mod scorer;
