pub mod constants;
pub mod error;
pub mod player;
pub mod seats;
pub mod session;
pub mod settings;

// Re-export commonly used items
pub use error::{GameError, GameResult};
pub use player::Player;
pub use seats::{SeatTable, TurnAdvance};
pub use session::{GameSession, NoopListener, PlayerUpdateListener, SessionEvent, SessionState};
pub use settings::GameSettings;
