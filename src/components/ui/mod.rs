pub mod alert;
pub mod button;
pub mod card;
pub mod input;
pub mod label;
pub mod spinner;

// Callers import from here: `use crate::components::ui::Button`.
pub use alert::*;
pub use button::*;
pub use card::*;
pub use input::*;
pub use label::*;
pub use spinner::*;
