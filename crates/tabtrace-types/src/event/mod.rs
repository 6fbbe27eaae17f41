mod event;
mod payload;

pub use event::ActivityEvent;
pub use payload::{
    ClickDescriptor, DwellPayload, EventPayload, InteractionPayload, InteractionType,
    KeywordsPayload, SessionEndPayload,
};
