mod dismissed;
mod model;
mod notice;

pub use dismissed::DismissedItems;
pub use model::*;
pub use notice::Notice;
