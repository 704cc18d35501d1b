pub mod estimate;
pub mod forms;
pub mod item;

pub use estimate::*;
pub use forms::*;
pub use item::*;
