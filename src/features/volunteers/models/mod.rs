mod movement;
mod participant;

pub use movement::{CreateMovement, MovementStatus, MovementWithCount, VolunteerMovement};
pub use participant::VolunteerParticipant;
