//! HS classification dialogue: wire model, heading policy, answer
//! selection and the session state machine.

pub mod headings;
pub mod machine;
pub mod model;
pub mod selection;

pub use headings::select_heading;
pub use machine::{Applied, ClassificationSession, SessionState, Ticket};
pub use model::{
    ClassifyResponse, ContinueRequest, Interaction, InteractionOption, KnownCharacteristic,
    PotentialHeading, StartRequest,
};
pub use selection::AnswerSelection;
