/// `audio/` — azan playback.
///
/// A background Symphonia decode thread feeds a lock-free ring buffer; the
/// CPAL output callback drains it through a single `Deck`. The scheduler
/// drives all of this through the `AzanPlayer` seam so tests can substitute
/// a fake.
pub mod deck;
pub mod decoder;
pub mod engine;
pub mod library;
pub mod player;

pub use engine::CpalPlayer;
pub use library::AzanLibrary;
pub use player::AzanPlayer;
