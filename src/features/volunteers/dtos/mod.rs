mod volunteer_dto;

pub use volunteer_dto::{
    JoinMovementResponseDto, MovementResponseDto, MovementSummaryDto, StartMovementDto,
};
