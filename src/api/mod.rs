pub mod calendar;
pub mod live_scores;
pub mod transport;

pub use calendar::CalendarClient;
pub use live_scores::LiveScoreDirectory;
pub use transport::{decode_nested, HttpTransport, Transport};
