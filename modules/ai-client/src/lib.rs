pub mod claude;
pub mod error;
pub mod gemini;
pub mod traits;
pub mod util;

pub use claude::Claude;
pub use error::AiError;
pub use gemini::Gemini;
pub use traits::{GenerationRequest, TextGenerator};
pub use util::{parse_json_object, truncate_to_char_boundary};
