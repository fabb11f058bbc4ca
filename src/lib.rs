//! # pocket-tally
//!
//! Input heuristics behind a pocket expense tracker: recognizing prices typed
//! into shopping list lines, and turning drag gestures into stepped number
//! changes with one feedback pulse per stop point.

pub mod config;
pub mod errors;
pub mod number_slider;
pub mod observability;
pub mod price_recognition;
pub mod shopping_list;
pub mod stepped_gesture;

// Re-export types for easier access
pub use price_recognition::{Price, PriceExtractor, PriceMatch, PricePattern};
pub use shopping_list::{ShoppingItem, ShoppingList};
pub use stepped_gesture::{
    FeedbackIntensity, GestureSession, StepChange, StepConfig, SteppedGestureMapper, StopPoint,
};
